// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Candidate, CandidateLocation, VisitHistory};
pub use requests::SearchQuery;
pub use responses::SearchResponse;
