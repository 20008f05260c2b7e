use crate::types::{Match, Query};

/// Scores and orders candidate records against a query.
///
/// Implementations are pure: they never mutate `candidates`, and the same
/// inputs always produce the same output. Results are sorted by descending
/// score, contain only positive scores and hold at most `limit` entries
/// (`default_limit()` when `None`).
pub trait Ranker<R>: Send + Sync {
    fn default_limit(&self) -> usize;
    fn rank<'a>(&self, query: &Query, candidates: &'a [R], limit: Option<usize>) -> Vec<Match<'a, R>>;
}
