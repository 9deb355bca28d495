use crate::summary::{commit_noun, RepositorySummary};
use crate::ui::cards::{NO_HUMAN_COMMITS, OTHER_CONTRIBUTORS_HEADING};
use std::fmt::{self, Write};

/// Summary as plain text, section by section, for non-interactive output.
pub fn render_plain(summary: &RepositorySummary) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails.
    let _ = write_summary(&mut out, summary);
    out
}

fn write_summary(out: &mut impl Write, summary: &RepositorySummary) -> fmt::Result {
    let repo = &summary.repository;
    writeln!(out, "{}", repo.full_name)?;
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "{description}")?;
    }
    writeln!(out, "{}", repo.html_url)?;
    writeln!(out)?;

    writeln!(out, "== Repository Status ==")?;
    writeln!(out, "Open Issues: {} ({})", summary.issue_count, summary.issues_url)?;
    writeln!(out, "Open Pull Requests: {} ({})", summary.pr_count, summary.prs_url)?;
    writeln!(out)?;

    writeln!(out, "== Recent Contributors ==")?;
    match summary.last_commit.as_ref() {
        Some(last) => {
            writeln!(
                out,
                "Latest commit: {} ({}) on {} ({})",
                last.author, last.author_url, last.date, last.commit_url
            )?;
            if summary.shows_other_contributors() {
                writeln!(out, "{OTHER_CONTRIBUTORS_HEADING}")?;
                for c in summary.other_contributors() {
                    writeln!(
                        out,
                        "  {} ({} {} in the last 30 days) {}",
                        c.login,
                        c.commit_count,
                        commit_noun(c.commit_count),
                        c.profile_url
                    )?;
                }
            }
        }
        None => writeln!(out, "{NO_HUMAN_COMMITS}")?,
    }
    writeln!(out)?;

    writeln!(out, "== README ==")?;
    out.write_str(&summary.readme)?;
    if !summary.readme.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
