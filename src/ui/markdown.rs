//! README markdown to styled terminal lines, driven by pulldown-cmark events.
//! Raw HTML is dropped; link targets follow the link text.

use crate::ui::theme;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

const BULLET: &str = "\u{2022} ";
const QUOTE_BAR: &str = "\u{2502} ";
const RULE_WIDTH: usize = 40;

pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut writer = LineWriter::default();
    for event in Parser::new_ext(text, options) {
        writer.event(event);
    }
    writer.finish()
}

struct OpenLink {
    dest: String,
    text: String,
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list: the next ordinal, or `None` for bullets.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    link: Option<OpenLink>,
    needs_gap: bool,
}

impl LineWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code_block => self.code_block(&text),
            Event::Text(text) => {
                let style = self.style();
                self.text(&text, style);
            }
            Event::Code(code) => {
                let style = self.style().fg(theme::CODE_FG);
                self.text(&code, style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.text(" ", style);
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.gap();
                self.lines.push(Line::from(Span::styled(
                    "\u{2500}".repeat(RULE_WIDTH),
                    Style::default().fg(theme::SEPARATOR),
                )));
                self.needs_gap = true;
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.text(marker, Style::default().fg(theme::DIM_TEXT));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            Tag::Heading { level, .. } => {
                self.gap();
                self.styles.push(heading_style(level));
            }
            Tag::BlockQuote { .. } => {
                self.gap();
                self.quote_depth += 1;
                let style = self
                    .style()
                    .fg(theme::QUOTE_FG)
                    .add_modifier(Modifier::ITALIC);
                self.styles.push(style);
            }
            Tag::CodeBlock(_) => {
                self.gap();
                self.in_code_block = true;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.gap();
                } else {
                    self.flush();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => BULLET.to_string(),
                };
                let indent = "  ".repeat(depth);
                self.text(&format!("{indent}{marker}"), Style::default());
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } => {
                let style = self
                    .style()
                    .fg(theme::LINK)
                    .add_modifier(Modifier::UNDERLINED);
                self.styles.push(style);
                self.link = Some(OpenLink {
                    dest: dest_url.into_string(),
                    text: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.needs_gap = true;
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.styles.pop();
                self.needs_gap = true;
            }
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.styles.pop();
                self.needs_gap = true;
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.needs_gap = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.needs_gap = true;
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(link) = self.link.take() {
                    if !link.dest.is_empty() && link.dest != link.text {
                        self.current.push(Span::styled(
                            format!(" ({})", link.dest),
                            Style::default().fg(theme::DIM_TEXT),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.styles.push(style);
    }

    fn text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current.push(Span::styled(
                QUOTE_BAR.repeat(self.quote_depth),
                Style::default().fg(theme::DIM_TEXT),
            ));
        }
        if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn code_block(&mut self, text: &str) {
        let style = Style::default().fg(theme::CODE_FG);
        for line in text.lines() {
            self.text(&format!("  {line}"), style);
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    /// Ends the open line and leaves one blank line after the previous block.
    fn gap(&mut self) {
        self.flush();
        if self.needs_gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.needs_gap = false;
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default()
        .fg(theme::HEADING_FG)
        .add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(theme::ACCENT).add_modifier(Modifier::UNDERLINED),
        _ => style,
    }
}
