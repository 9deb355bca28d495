use crate::ui::markdown::render_markdown;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct ReadmePanel<'a> {
    pub readme: &'a str,
    pub scroll: u16,
}

fn readme_paragraph(readme: &str) -> Paragraph<'static> {
    Paragraph::new(render_markdown(readme)).wrap(Wrap { trim: false })
}

/// Rows the rendered README occupies when wrapped to `width` columns.
pub fn rendered_height(readme: &str, width: u16) -> usize {
    readme_paragraph(readme).line_count(width)
}

impl<'a> Widget for ReadmePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let block = Block::default()
            .title(Span::styled(
                " README ",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_COLOR));

        readme_paragraph(self.readme)
            .block(block)
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}
