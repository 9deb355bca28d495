use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WEB_URL: &str = "https://github.com";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_url: String,
    pub web_url: String,
    pub entity_path: PathBuf,
    pub refresh_interval_secs: u64,
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("web_url", &self.web_url)
            .field("entity_path", &self.entity_path)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            entity_path: PathBuf::from("catalog-info.yaml"),
            refresh_interval_secs: 0,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load(cli_entity: Option<PathBuf>) -> Self {
        Self::load_from(&config_file(), cli_entity)
    }

    pub fn load_from(config_file: &std::path::Path, cli_entity: Option<PathBuf>) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }

        figment = figment.merge(Env::prefixed("GITHUB_INFO_")).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github_token".into()),
        );

        if let Some(path) = cli_entity {
            figment = figment.merge(Serialized::default("entity_path", path));
        }

        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("warning: config parse error, using defaults: {e}");
                Config::default()
            }
        }
    }

    /// Token with surrounding whitespace removed; `None` when unset or blank.
    pub fn token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_file() -> PathBuf {
    config_dir().join("github-info").join("config.toml")
}

pub fn log_file() -> PathBuf {
    config_dir().join("github-info").join("github-info.log")
}
