// Core algorithm exports
pub mod decision;
pub mod weighting;

pub use decision::{present_candidate, Decision, DecisionError, DecisionState, Response};
pub use weighting::{raw_weight, selection_probabilities};
