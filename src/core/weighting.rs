use crate::models::{Candidate, VisitHistory};

/// Raw weight of a candidate: its visit count plus one
#[inline]
pub fn raw_weight(history: &VisitHistory, id: &str) -> f64 {
    history.visits(id) as f64 + 1.0
}

/// Calculate the probability of picking each candidate (sums to 1)
///
/// Weighting formula:
/// ```text
/// w(c)     = visits(c) + 1
/// p_raw(c) = w(c) / sum(w)
/// p_inv(c) = 1 - p_raw(c)        # favour the least visited
/// p(c)     = p_inv(c) / sum(p_inv)
/// ```
///
/// When every candidate carries the same weight the result is exactly
/// uniform. A zero `sum(p_inv)` (a single candidate) also falls back to
/// uniform. The result is index-aligned with `candidates`.
pub fn selection_probabilities(history: &VisitHistory, candidates: &[Candidate]) -> Vec<f64> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = candidates
        .iter()
        .map(|candidate| raw_weight(history, &candidate.id))
        .collect();

    if weights.iter().all(|w| *w == weights[0]) {
        return uniform(candidates.len());
    }

    let total: f64 = weights.iter().sum();
    let inverted: Vec<f64> = weights.iter().map(|w| 1.0 - w / total).collect();

    let inverted_total: f64 = inverted.iter().sum();
    if inverted_total <= 0.0 {
        return uniform(candidates.len());
    }

    inverted.iter().map(|p| p / inverted_total).collect()
}

#[inline]
fn uniform(len: usize) -> Vec<f64> {
    vec![1.0 / len as f64; len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> Candidate {
        serde_json::from_value(serde_json::json!({ "id": id, "name": id })).unwrap()
    }

    fn history(entries: &[(&str, u64)]) -> VisitHistory {
        entries.iter().map(|(id, n)| (id.to_string(), *n)).collect()
    }

    #[test]
    fn test_raw_weight() {
        let h = history(&[("A", 9)]);
        assert_eq!(raw_weight(&h, "A"), 10.0);
        assert_eq!(raw_weight(&h, "B"), 1.0);
    }

    #[test]
    fn test_all_unseen_is_uniform() {
        let candidates = vec![candidate("A"), candidate("B"), candidate("C")];
        let probs = selection_probabilities(&VisitHistory::new(), &candidates);

        assert_eq!(probs, vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_heavily_visited_is_disfavoured() {
        let candidates = vec![candidate("A"), candidate("B")];
        let probs = selection_probabilities(&history(&[("A", 9)]), &candidates);

        assert!((probs[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((probs[1] - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_candidate() {
        let candidates = vec![candidate("A")];

        assert_eq!(selection_probabilities(&VisitHistory::new(), &candidates), vec![1.0]);
        assert_eq!(selection_probabilities(&history(&[("A", 4)]), &candidates), vec![1.0]);
    }

    #[test]
    fn test_equal_visits_is_uniform() {
        let candidates = vec![candidate("A"), candidate("B"), candidate("C"), candidate("D")];
        let h = history(&[("A", 2), ("B", 2), ("C", 2), ("D", 2)]);

        assert_eq!(selection_probabilities(&h, &candidates), vec![0.25; 4]);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(selection_probabilities(&VisitHistory::new(), &[]).is_empty());
    }

    #[test]
    fn test_history_entries_for_absent_candidates_are_ignored() {
        let candidates = vec![candidate("A"), candidate("B")];
        let h = history(&[("Z", 50)]);

        assert_eq!(selection_probabilities(&h, &candidates), vec![0.5, 0.5]);
    }
}
