use crate::models::ScoredCandidate;

/// Maximum number of recommendations returned
pub const TOP_N: usize = 10;

/// Sort by final score (descending) and keep the best `limit`
///
/// The sort is stable: equal scores keep their input order.
pub fn rank(mut scored: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    scored.truncate(limit);
    scored
}
