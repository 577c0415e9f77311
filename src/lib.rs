//! Lunch Roulette - pick where to eat, biased toward places you have not tried
//!
//! Queries a business search API, weights the results so that rarely visited
//! places are more likely to come up, and asks the user to accept or reject
//! each pick. Accepted picks are counted in a JSON history file.

pub mod app;
pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use app::{decide, AppError, Outcome};
pub use crate::config::{Credentials, Settings};
pub use crate::core::{selection_probabilities, Decision, DecisionState, Response};
pub use models::{Candidate, SearchQuery, VisitHistory};
pub use services::{HistoryStore, SearchClient};
