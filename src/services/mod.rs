// Service exports
pub mod history;
pub mod yelp;

pub use history::{HistoryError, HistoryStore};
pub use yelp::{SearchClient, SearchClientConfig, SearchError};
