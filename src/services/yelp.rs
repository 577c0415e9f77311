use crate::config::Credentials;
use crate::models::{Candidate, SearchQuery, SearchResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when searching for businesses
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid search query: {0}")]
    InvalidQuery(#[from] validator::ValidationErrors),

    #[error("Authentication rejected ({status}) on {url}")]
    Authentication {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Search failed ({status}) on {url}")]
    Query {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    /// Status, URL and response body for errors reported by the service
    pub fn http_details(&self) -> Option<(StatusCode, &str, &str)> {
        match self {
            SearchError::Authentication { status, url, body }
            | SearchError::Query { status, url, body } => {
                Some((*status, url.as_str(), body.as_str()))
            }
            _ => None,
        }
    }
}

/// Settings for building a [`SearchClient`]
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    pub endpoint: String,
    pub credentials: Credentials,
    pub timeout: Duration,
}

/// Business search API client
///
/// Authenticates every request with a static API key as a bearer token.
pub struct SearchClient {
    base_url: String,
    credentials: Credentials,
    client: Client,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(config: SearchClientConfig) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.endpoint,
            credentials: config.credentials,
            client,
        })
    }

    /// Run one search and return the businesses in the order the service ranked them
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
        query.validate()?;

        let url = format!(
            "{}/businesses/search?{}",
            self.base_url.trim_end_matches('/'),
            query.to_query_string()
        );

        tracing::debug!("Searching businesses: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.credentials.api_key())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Search failed on {}: {} - {}", url, status, body);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SearchError::Authentication { status, url, body }
                }
                _ => SearchError::Query { status, url, body },
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse businesses: {}", e)))?;

        tracing::debug!(
            "Found {} businesses (total: {})",
            parsed.businesses.len(),
            parsed.total
        );

        Ok(parsed.businesses)
    }
}
