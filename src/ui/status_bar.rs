use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    pub entity_ref: &'a str,
    pub state: &'a str,
    pub detail: Option<&'a str>,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let bg = Style::default().bg(theme::STATUS_BG);
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg);
        }

        let separator = Span::styled(
            "\u{2502}",
            Style::default().fg(theme::BORDER_COLOR).bg(theme::STATUS_BG),
        );

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.entity_ref),
                Style::default()
                    .fg(theme::KEY_COLOR)
                    .bg(theme::STATUS_BG)
                    .add_modifier(Modifier::BOLD),
            ),
            separator.clone(),
            Span::styled(
                format!(" {} ", self.state),
                Style::default().bg(theme::STATUS_BG),
            ),
        ];

        if let Some(detail) = self.detail {
            spans.push(separator);
            spans.push(Span::styled(
                format!(" {detail} "),
                Style::default().fg(theme::DIM_TEXT).bg(theme::STATUS_BG),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
