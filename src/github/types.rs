use crate::error::{GithubInfoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `owner/repo` identifier of a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for Slug {
    type Err = GithubInfoError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || GithubInfoError::Slug(s.to_string());
        let (owner, repo) = s.split_once('/').ok_or_else(invalid)?;
        let well_formed = |part: &str| {
            !part.is_empty() && !part.contains('/') && !part.chars().any(char::is_whitespace)
        };
        if !well_formed(owner) || !well_formed(repo) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Subset of `GET /repos/{slug}` shown in the header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IssueStub {
    pub number: u64,
    pub html_url: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PullStub {
    pub number: u64,
    pub html_url: String,
}

/// Account GitHub associated with a commit. Absent when the commit email
/// matches no account.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CommitAccount {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GitSignature {
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GitCommit {
    pub author: GitSignature,
}

/// One entry of `GET /repos/{slug}/commits`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub html_url: String,
    pub author: Option<CommitAccount>,
    pub commit: GitCommit,
}

impl CommitRecord {
    pub fn date(&self) -> DateTime<Utc> {
        self.commit.author.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_parses_and_displays() {
        let slug: Slug = "octocat/hello-world".parse().unwrap();
        assert_eq!(slug.owner, "octocat");
        assert_eq!(slug.repo, "hello-world");
        assert_eq!(slug.to_string(), "octocat/hello-world");
    }

    #[test]
    fn slug_rejects_malformed_values() {
        for bad in ["", "octocat", "/repo", "owner/", "a/b/c", "own er/repo"] {
            assert!(bad.parse::<Slug>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn commit_record_with_null_author() {
        let json = r#"{
            "sha": "abc",
            "html_url": "https://github.com/o/r/commit/abc",
            "author": null,
            "commit": { "author": { "name": "x", "date": "2024-01-15T10:00:00Z" } }
        }"#;
        let record: CommitRecord = serde_json::from_str(json).unwrap();
        assert!(record.author.is_none());
        assert_eq!(record.date().to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }

    #[test]
    fn commit_record_missing_date_is_rejected() {
        let json = r#"{ "sha": "abc", "html_url": "u", "author": null, "commit": { "author": {} } }"#;
        assert!(serde_json::from_str::<CommitRecord>(json).is_err());
    }
}
