pub mod aggregate;
pub mod bot;

use crate::github::types::RepoMetadata;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub commit_count: u32,
}

/// Most recent human-authored commit, regardless of its age.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LastCommit {
    pub date: String,
    pub committed_at: DateTime<Utc>,
    pub author: String,
    pub author_url: String,
    pub commit_url: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub repository: RepoMetadata,
    pub readme: String,
    pub issue_count: usize,
    pub issues_url: String,
    pub pr_count: usize,
    pub prs_url: String,
    pub last_commit: Option<LastCommit>,
    pub recent_contributors: Vec<Contributor>,
    pub fetched_at: DateTime<Utc>,
}

impl RepositorySummary {
    /// Recent contributors other than the author of the last commit.
    pub fn other_contributors(&self) -> Vec<&Contributor> {
        let last_author = self.last_commit.as_ref().map(|c| c.author.as_str());
        self.recent_contributors
            .iter()
            .filter(|c| Some(c.login.as_str()) != last_author)
            .collect()
    }

    /// The contributor list is only shown once someone besides the latest
    /// committer could appear in it.
    pub fn shows_other_contributors(&self) -> bool {
        self.last_commit.is_some() && self.recent_contributors.len() > 1
    }
}

pub fn commit_noun(count: u32) -> &'static str {
    if count == 1 {
        "commit"
    } else {
        "commits"
    }
}
