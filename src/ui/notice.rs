use crate::ui::{centered_rect, theme};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warn,
    Info,
}

impl NoticeLevel {
    pub fn color(self) -> Color {
        match self {
            NoticeLevel::Error => theme::ERROR_FG,
            NoticeLevel::Warn => theme::WARN_FG,
            NoticeLevel::Info => theme::ACCENT,
        }
    }

    fn title(self) -> &'static str {
        match self {
            NoticeLevel::Error => " Error ",
            NoticeLevel::Warn => " Warning ",
            NoticeLevel::Info => " GitHub ",
        }
    }
}

/// Boxed message centred in the body: loading, error and empty states.
pub struct Notice<'a> {
    pub message: &'a str,
    pub level: NoticeLevel,
}

impl<'a> Widget for Notice<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let popup = centered_rect(60, 30, area);
        if popup.width < 4 || popup.height < 3 {
            return;
        }
        Clear.render(popup, buf);

        let color = self.level.color();
        let block = Block::default()
            .title(self.level.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        Paragraph::new(Line::from(Span::styled(
            self.message.to_string(),
            Style::default().fg(color),
        )))
        .block(block)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
    }
}
