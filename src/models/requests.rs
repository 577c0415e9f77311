use validator::Validate;

/// Largest page the search API will return for a single request
pub const MAX_SEARCH_LIMIT: u16 = 50;

/// Business search parameters
#[derive(Debug, Clone, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1))]
    pub term: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 1, max = MAX_SEARCH_LIMIT))]
    pub limit: u16,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, location: impl Into<String>, limit: u16) -> Self {
        Self {
            term: term.into(),
            location: location.into(),
            limit,
        }
    }

    /// Encoded query string for the search endpoint
    pub fn to_query_string(&self) -> String {
        format!(
            "term={}&location={}&limit={}",
            urlencoding::encode(&self.term),
            urlencoding::encode(&self.location),
            self.limit
        )
    }
}
