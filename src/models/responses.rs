use serde::Deserialize;
use crate::models::domain::Candidate;

/// Body of a successful business search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Vec<Candidate>,
    #[serde(default)]
    pub total: u64,
}
