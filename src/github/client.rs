use crate::error::{GithubInfoError, Result};
use octocrab::models::repos::Release;
use octocrab::models::Repository;
use octocrab::Octocrab;
use tracing::error;

pub fn create_client(token: &str, api_url: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .base_uri(api_url)
        .map_err(GithubInfoError::GitHub)?
        .personal_token(token.to_string())
        .build()
        .map_err(GithubInfoError::GitHub)
}

pub async fn get_repository_info(client: &Octocrab, owner: &str, repo: &str) -> Result<Repository> {
    client.repos(owner, repo).get().await.map_err(|e| {
        error!(owner, repo, error = %e, "error fetching repository info");
        GithubInfoError::GitHub(e)
    })
}

/// Publishes a release immediately: never a draft, never a prerelease.
pub async fn create_release(
    client: &Octocrab,
    owner: &str,
    repo: &str,
    tag_name: &str,
    name: &str,
    body: &str,
) -> Result<Release> {
    client
        .repos(owner, repo)
        .releases()
        .create(tag_name)
        .name(name)
        .body(body)
        .draft(false)
        .prerelease(false)
        .send()
        .await
        .map_err(|e| {
            error!(owner, repo, tag_name, error = %e, "error creating release");
            GithubInfoError::GitHub(e)
        })
}
