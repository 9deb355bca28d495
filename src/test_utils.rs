#![cfg(test)]

use crate::github::types::*;
use crate::summary::{Contributor, LastCommit, RepositorySummary};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SHA: AtomicUsize = AtomicUsize::new(1);

fn next_sha() -> String {
    format!("{:040x}", NEXT_SHA.fetch_add(1, Ordering::Relaxed))
}

pub fn make_commit(login: &str, date: DateTime<Utc>) -> CommitRecord {
    let mut commit = make_anonymous_commit(date);
    commit.author = Some(CommitAccount {
        login: login.to_string(),
        avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
        html_url: format!("https://github.com/{login}"),
    });
    commit
}

pub fn make_anonymous_commit(date: DateTime<Utc>) -> CommitRecord {
    let sha = next_sha();
    CommitRecord {
        html_url: format!("https://github.com/octo/repo/commit/{sha}"),
        sha,
        author: None,
        commit: GitCommit {
            author: GitSignature { date },
        },
    }
}

pub fn make_summary(last_author: Option<&str>, contributors: &[(&str, u32)]) -> RepositorySummary {
    let committed_at = Utc.with_ymd_and_hms(2024, 6, 14, 9, 30, 0).unwrap();
    RepositorySummary {
        repository: RepoMetadata {
            full_name: "octo/repo".to_string(),
            description: Some("An example repository".to_string()),
            html_url: "https://github.com/octo/repo".to_string(),
            default_branch: Some("main".to_string()),
            stargazers_count: 42,
            forks_count: 7,
        },
        readme: "# Octo\n\nHello.\n".to_string(),
        issue_count: 3,
        issues_url: "https://github.com/octo/repo/issues".to_string(),
        pr_count: 1,
        prs_url: "https://github.com/octo/repo/pulls".to_string(),
        last_commit: last_author.map(|login| LastCommit {
            date: "6/14/2024".to_string(),
            committed_at,
            author: login.to_string(),
            author_url: format!("https://github.com/{login}"),
            commit_url: "https://github.com/octo/repo/commit/abc123".to_string(),
            avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
        }),
        recent_contributors: contributors
            .iter()
            .map(|(login, count)| Contributor {
                login: login.to_string(),
                avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
                profile_url: format!("https://github.com/{login}"),
                commit_count: *count,
            })
            .collect(),
        fetched_at: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
    }
}

/// JSON body for one commit list entry as the commits endpoint returns it.
pub fn commit_json(login: Option<&str>, date: &str) -> serde_json::Value {
    let author = match login {
        Some(login) => serde_json::json!({
            "login": login,
            "avatar_url": format!("https://avatars.githubusercontent.com/{login}"),
            "html_url": format!("https://github.com/{login}"),
        }),
        None => serde_json::Value::Null,
    };
    let sha = next_sha();
    serde_json::json!({
        "sha": sha,
        "html_url": format!("https://github.com/octo/repo/commit/{sha}"),
        "author": author,
        "commit": { "author": { "name": "someone", "date": date } },
    })
}

pub fn buffer_lines(buf: &ratatui::buffer::Buffer) -> Vec<String> {
    let area = buf.area;
    (area.y..area.bottom())
        .map(|y| {
            (area.x..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}
