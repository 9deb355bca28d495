use crate::summary::{commit_noun, RepositorySummary};
use crate::ui::theme;
use crate::ui::truncate_with_ellipsis;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub const NO_HUMAN_COMMITS: &str =
    "No non-automated commits found. All changes were made by automated processes.";
pub const OTHER_CONTRIBUTORS_HEADING: &str = "Other contributors in the last 30 days:";

fn card(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_COLOR))
}

fn link(text: impl Into<String>) -> Span<'static> {
    Span::styled(
        text.into(),
        Style::default()
            .fg(theme::LINK)
            .add_modifier(Modifier::UNDERLINED),
    )
}

fn url(text: &str, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", truncate_with_ellipsis(text, width.saturating_sub(2))),
        Style::default().fg(theme::DIM_TEXT),
    ))
}

/// Open issue and pull request counts.
pub struct RepositoryStatusCard<'a> {
    pub summary: &'a RepositorySummary,
}

impl<'a> Widget for RepositoryStatusCard<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let block = card("Repository Status");
        let inner = block.inner(area);
        block.render(area, buf);

        let s = self.summary;
        let width = inner.width as usize;
        let lines = vec![
            Line::from(vec![
                link("Open Issues"),
                Span::raw(format!(": {}", s.issue_count)),
            ]),
            url(&s.issues_url, width),
            Line::default(),
            Line::from(vec![
                link("Open Pull Requests"),
                Span::raw(format!(": {}", s.pr_count)),
            ]),
            url(&s.prs_url, width),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

pub struct ContributorsCard<'a> {
    pub summary: &'a RepositorySummary,
}

impl<'a> Widget for ContributorsCard<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let block = card("Recent Contributors");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = contributor_lines(self.summary, inner.width as usize);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

fn contributor_lines(summary: &RepositorySummary, width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme::DIM_TEXT);

    let Some(last) = summary.last_commit.as_ref() else {
        return vec![Line::from(Span::styled(NO_HUMAN_COMMITS, dim))];
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Latest commit: ", Style::default().add_modifier(Modifier::BOLD)),
            link(last.author.clone()),
            Span::raw(" on "),
            link(last.date.clone()),
        ]),
        url(&last.commit_url, width),
    ];

    if summary.shows_other_contributors() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            OTHER_CONTRIBUTORS_HEADING,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for contributor in summary.other_contributors() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                link(contributor.login.clone()),
                Span::styled(
                    format!(
                        " ({} {} in the last 30 days)",
                        contributor.commit_count,
                        commit_noun(contributor.commit_count)
                    ),
                    dim,
                ),
            ]));
        }
    }

    lines
}
