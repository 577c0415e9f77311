use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A venue returned by the business search API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: CandidateLocation,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub url: String,
}

impl Candidate {
    /// Address lines joined into a single line
    pub fn display_address(&self) -> String {
        self.location.display_address.join(", ")
    }

    pub fn is_open(&self) -> bool {
        !self.is_closed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

/// Number of accepted visits per candidate id
///
/// Backed by a `BTreeMap` so the persisted JSON always has sorted keys.
/// Counts only ever go up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitHistory {
    visits: BTreeMap<String, u64>,
}

impl VisitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit count for a candidate, zero if it was never accepted
    pub fn visits(&self, id: &str) -> u64 {
        self.visits.get(id).copied().unwrap_or(0)
    }

    /// Record one accepted visit and return the new count
    pub fn record_visit(&mut self, id: &str) -> u64 {
        let count = self.visits.entry(id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.visits.iter().map(|(id, count)| (id.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for VisitHistory {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            visits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_from_search_payload() {
        let json = r#"{
            "id": "abc-123",
            "alias": "golden-dragon-gaithersburg",
            "name": "Golden Dragon",
            "location": {
                "address1": "1 Main St",
                "display_address": ["1 Main St", "Gaithersburg, MD 20877"]
            },
            "rating": 4.5,
            "review_count": 212,
            "is_closed": false,
            "url": "https://www.yelp.com/biz/golden-dragon"
        }"#;

        let candidate: Candidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.id, "abc-123");
        assert_eq!(candidate.display_address(), "1 Main St, Gaithersburg, MD 20877");
        assert_eq!(candidate.review_count, 212);
        assert!(candidate.is_open());
    }

    #[test]
    fn test_candidate_missing_optional_fields() {
        let candidate: Candidate = serde_json::from_str(r#"{"id": "x", "name": "X"}"#).unwrap();

        assert_eq!(candidate.display_address(), "");
        assert_eq!(candidate.rating, 0.0);
        assert!(candidate.is_open());
    }

    #[test]
    fn test_record_visit_creates_and_increments() {
        let mut history = VisitHistory::new();
        assert_eq!(history.visits("x"), 0);

        assert_eq!(history.record_visit("x"), 1);
        assert_eq!(history.record_visit("x"), 2);
        assert_eq!(history.visits("x"), 2);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_history_serializes_sorted() {
        let history: VisitHistory = vec![("b".to_string(), 1), ("a".to_string(), 3)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"{"a":3,"b":1}"#);
    }
}
