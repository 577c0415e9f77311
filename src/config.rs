use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::SearchQuery;
use crate::services::SearchClientConfig;

/// Environment variable that overrides the API key from the credentials file
pub const API_KEY_ENV: &str = "LUNCH_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub files: FileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_term")]
    pub term: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            term: default_term(),
            location: default_location(),
            limit: default_limit(),
        }
    }
}

fn default_term() -> String { "lunch".to_string() }
fn default_location() -> String { "Gaithersburg, MD".to_string() }
fn default_limit() -> u16 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String { "https://api.yelp.com/v3".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_history")]
    pub history: PathBuf,
    #[serde(default = "default_credentials")]
    pub credentials: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            history: default_history(),
            credentials: default_credentials(),
        }
    }
}

fn default_history() -> PathBuf { PathBuf::from("visited.json") }
fn default_credentials() -> PathBuf { PathBuf::from("credentials.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "warn".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. `extra`, if given (must exist)
    /// 5. Environment variables (prefixed with LUNCH__)
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder
            // e.g., LUNCH__SEARCH__LOCATION -> search.location
            .add_source(
                Environment::with_prefix("LUNCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Search parameters described by these settings
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(
            self.search.term.clone(),
            self.search.location.clone(),
            self.search.limit,
        )
    }

    /// Client configuration carrying the given credentials
    pub fn client_config(&self, credentials: Credentials) -> SearchClientConfig {
        SearchClientConfig {
            endpoint: self.api.endpoint.clone(),
            credentials,
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }
}

/// Errors that can occur loading credentials
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Unable to read credentials {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse credentials {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Credentials contain an empty API key")]
    EmptyKey,
}

/// API key for the search service
///
/// Loaded once and handed to the client explicitly.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "API_KEY", alias = "api_key")]
    api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Read a JSON credentials file (`{"API_KEY": "..."}`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let credentials: Credentials =
            serde_json::from_str(&contents).map_err(|source| CredentialsError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        credentials.non_empty()
    }

    /// Use `LUNCH_API_KEY` when set, otherwise the credentials file
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self, CredentialsError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => {
                tracing::debug!("Using API key from {}", API_KEY_ENV);
                Ok(Self::new(key))
            }
            _ => Self::load(path),
        }
    }

    fn non_empty(self) -> Result<Self, CredentialsError> {
        if self.api_key.trim().is_empty() {
            return Err(CredentialsError::EmptyKey);
        }
        Ok(self)
    }
}
