//! Query operations over descriptor stores.
//!
//! - [`MatchingEngine::single_best_match`] returns the closest record.
//! - [`MatchingEngine::top_n_vote`] returns the majority class among the
//!   `n` closest records.
//!
//! Both rank through the metric's [`Directionality`](crate::distance::Directionality),
//! so distances and similarities are handled alike. Ties go to the record
//! inserted first.

mod matching;

pub use matching::{MatchingEngine, VectorMatch, VoteOutcome};
