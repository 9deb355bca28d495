use crate::github::api::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubInfoError {
    #[error("authentication error: {0}")]
    Auth(String),

    #[error("{stage} (HTTP {status})")]
    Http {
        stage: Stage,
        status: reqwest::StatusCode,
    },

    #[error("{stage}: {source}")]
    Network {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage}: unexpected response: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("github error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid entity: {0}")]
    Entity(String),

    #[error("invalid repository slug {0:?}: expected owner/repo")]
    Slug(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GithubInfoError>;
