use crate::config::Config;
use crate::error::{GithubInfoError, Result};
use async_trait::async_trait;

pub const REPO_SCOPE: &str = "repo";

/// Supplies GitHub access tokens for the requested OAuth scopes.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self, scopes: &[&str]) -> Result<String>;
}

/// Token taken from configuration (`config.toml` or `GITHUB_TOKEN`).
/// Scopes are whatever the token was issued with.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigTokenProvider {
    token: Option<String>,
}

impl ConfigTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.token().map(str::to_string))
    }
}

#[async_trait]
impl TokenProvider for ConfigTokenProvider {
    async fn access_token(&self, scopes: &[&str]) -> Result<String> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(GithubInfoError::Auth(format!(
                "no GitHub token available for scopes [{}]; set GITHUB_TOKEN or github_token in config.toml",
                scopes.join(", ")
            ))),
        }
    }
}
