use crate::auth::{TokenProvider, REPO_SCOPE};
use crate::config::Config;
use crate::error::{GithubInfoError, Result};
use crate::github::types::{CommitRecord, IssueStub, PullStub, RepoMetadata, Slug};
use crate::summary::aggregate::aggregate;
use crate::summary::RepositorySummary;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("github-info/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// One of the REST calls that make up a summary, in the order they are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Repository,
    Readme,
    Issues,
    PullRequests,
    Commits,
}

impl Stage {
    pub fn path(self, slug: &Slug) -> String {
        match self {
            Stage::Repository => format!("/repos/{slug}"),
            Stage::Readme => format!("/repos/{slug}/readme"),
            Stage::Issues => format!("/repos/{slug}/issues"),
            Stage::PullRequests => format!("/repos/{slug}/pulls"),
            Stage::Commits => format!("/repos/{slug}/commits"),
        }
    }

    fn query(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Stage::Issues | Stage::PullRequests => &[("state", "open")],
            _ => &[],
        }
    }

    fn accept(self) -> &'static str {
        match self {
            Stage::Readme => RAW_MEDIA_TYPE,
            _ => JSON_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Stage::Repository => "Failed to fetch repository data",
            Stage::Readme => "Failed to fetch README",
            Stage::Issues => "Failed to fetch issues",
            Stage::PullRequests => "Failed to fetch pull requests",
            Stage::Commits => "Failed to fetch commits",
        };
        f.write_str(message)
    }
}

/// Thin REST client for the summary endpoints.
#[derive(Clone, Debug)]
pub struct GitHubApi {
    http: reqwest::Client,
    api_url: String,
    web_url: String,
}

impl GitHubApi {
    pub fn new(api_url: &str, web_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GithubInfoError::Config(format!("http client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, &config.web_url)
    }

    pub async fn fetch_summary(
        &self,
        slug: &Slug,
        auth: &dyn TokenProvider,
    ) -> Result<RepositorySummary> {
        self.fetch_summary_at(slug, auth, Utc::now()).await
    }

    /// Calls are sequential; the first failing stage aborts the rest.
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    pub async fn fetch_summary_at(
        &self,
        slug: &Slug,
        auth: &dyn TokenProvider,
        now: DateTime<Utc>,
    ) -> Result<RepositorySummary> {
        let token = auth.access_token(&[REPO_SCOPE]).await?;

        let repository: RepoMetadata = self.get_json(Stage::Repository, slug, &token).await?;
        let readme = self.get(Stage::Readme, slug, &token).await?;
        let issues: Vec<IssueStub> = self.get_json(Stage::Issues, slug, &token).await?;
        let pulls: Vec<PullStub> = self.get_json(Stage::PullRequests, slug, &token).await?;
        let commits: Vec<CommitRecord> = self.get_json(Stage::Commits, slug, &token).await?;

        let activity = aggregate(&commits, now);
        debug!(
            issues = issues.len(),
            pulls = pulls.len(),
            commits = commits.len(),
            contributors = activity.recent_contributors.len(),
            "summary assembled"
        );

        Ok(RepositorySummary {
            repository,
            readme,
            issue_count: issues.len(),
            issues_url: format!("{}/{slug}/issues", self.web_url),
            pr_count: pulls.len(),
            prs_url: format!("{}/{slug}/pulls", self.web_url),
            last_commit: activity.last_commit,
            recent_contributors: activity.recent_contributors,
            fetched_at: now,
        })
    }

    async fn get(&self, stage: Stage, slug: &Slug, token: &str) -> Result<String> {
        let url = format!("{}{}", self.api_url, stage.path(slug));
        debug!(%stage, %url, "requesting");

        let mut request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, stage.accept());
        if !stage.query().is_empty() {
            request = request.query(stage.query());
        }

        let response = request
            .send()
            .await
            .map_err(|source| GithubInfoError::Network { stage, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%stage, %status, "request rejected");
            return Err(GithubInfoError::Http { stage, status });
        }

        response
            .text()
            .await
            .map_err(|source| GithubInfoError::Network { stage, source })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: Stage,
        slug: &Slug,
        token: &str,
    ) -> Result<T> {
        let body = self.get(stage, slug, token).await?;
        serde_json::from_str(&body).map_err(|source| GithubInfoError::Decode { stage, source })
    }
}
