//! Exhaustive matching against a descriptor store.

use std::time::Instant;

use placematch_storage::StorageEngine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMetric;
use crate::error::VectorError;
use crate::store::DescriptorStore;
use crate::types::{ensure_finite, RecordId};

/// A record scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    /// The matched record.
    pub record_id: RecordId,
    /// The matched record's class label.
    pub class_label: String,
    /// The metric value between the query and the record.
    pub score: f32,
}

/// Result of a top-N vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// The winning class label.
    pub winner: String,
    /// How many of the ranked records carry the winning label.
    pub votes: usize,
    /// The records that took part in the vote, closest first.
    pub ranked: Vec<VectorMatch>,
}

/// Matches query descriptors against every record of a store.
///
/// The engine borrows its store and runs every query in one read snapshot,
/// so it never blocks or is blocked by a writer.
pub struct MatchingEngine<'a, E: StorageEngine> {
    store: &'a DescriptorStore<E>,
    metric: DistanceMetric,
}

impl<'a, E: StorageEngine> MatchingEngine<'a, E> {
    /// Create an engine over `store` using `metric`.
    #[must_use]
    pub const fn new(store: &'a DescriptorStore<E>, metric: DistanceMetric) -> Self {
        Self { store, metric }
    }

    /// The metric this engine ranks by.
    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Find the single closest record.
    ///
    /// Returns `Ok(None)` when the store is empty. Among records with equal
    /// scores the one with the lowest id wins.
    ///
    /// # Errors
    ///
    /// - [`VectorError::InvalidValue`] if the query holds NaN or infinity
    /// - [`VectorError::DimensionMismatch`] if the query length differs from
    ///   the store dimension
    /// - [`VectorError::Storage`] if reading the store fails
    pub fn single_best_match(&self, query: &[f32]) -> Result<Option<VectorMatch>, VectorError> {
        if !self.check_query(query)? {
            return Ok(None);
        }

        let start = Instant::now();
        let direction = self.metric.directionality();
        let mut scanned = 0usize;
        let mut best: Option<VectorMatch> = None;

        self.store.for_each(|record| {
            scanned += 1;
            let score = self.metric.calculate(query, record.vector())?;
            let closer = best.as_ref().map_or(true, |b| direction.is_closer(score, b.score));
            if closer {
                best = Some(VectorMatch { record_id: record.id, class_label: record.class_label, score });
            }
            Ok(())
        })?;

        debug!(
            metric = %self.metric,
            scanned,
            matched = best.as_ref().map(|m| m.class_label.as_str()),
            elapsed_us = start.elapsed().as_micros() as u64,
            "single best match"
        );

        Ok(best)
    }

    /// Vote among the `n` closest records.
    ///
    /// Records are ranked closest first, with ties in ascending id order.
    /// The first `min(n, len)` ranked records vote with their labels. A tie
    /// in votes goes to the label that appears earliest in the ranking.
    ///
    /// # Errors
    ///
    /// - [`VectorError::InvalidArgument`] if `n` is zero
    /// - [`VectorError::InvalidValue`] if the query holds NaN or infinity
    /// - [`VectorError::EmptyStore`] if the store has no records
    /// - [`VectorError::DimensionMismatch`] if the query length differs from
    ///   the store dimension
    /// - [`VectorError::Storage`] if reading the store fails
    pub fn top_n_vote(&self, query: &[f32], n: usize) -> Result<VoteOutcome, VectorError> {
        if n == 0 {
            return Err(VectorError::InvalidArgument("n must be at least 1".to_string()));
        }
        if !self.check_query(query)? {
            return Err(VectorError::EmptyStore);
        }

        let start = Instant::now();
        let direction = self.metric.directionality();

        let mut scored = Vec::new();
        self.store.for_each(|record| {
            let score = self.metric.calculate(query, record.vector())?;
            scored.push(VectorMatch { record_id: record.id, class_label: record.class_label, score });
            Ok(())
        })?;

        if scored.is_empty() {
            return Err(VectorError::EmptyStore);
        }

        let scanned = scored.len();
        // Stable: equal scores keep ascending id order.
        scored.sort_by(|a, b| direction.compare(a.score, b.score));
        scored.truncate(n);

        let (winner, votes) = tally(&scored).ok_or(VectorError::EmptyStore)?;

        debug!(
            metric = %self.metric,
            scanned,
            n,
            winner = winner.as_str(),
            votes,
            elapsed_us = start.elapsed().as_micros() as u64,
            "top-n vote"
        );

        Ok(VoteOutcome { winner, votes, ranked: scored })
    }

    /// Returns `false` if the store has no dimension yet (it is empty).
    fn check_query(&self, query: &[f32]) -> Result<bool, VectorError> {
        ensure_finite(query)?;
        match self.store.dimension()? {
            None => Ok(false),
            Some(expected) if expected != query.len() => {
                Err(VectorError::DimensionMismatch { expected, actual: query.len() })
            }
            Some(_) => Ok(true),
        }
    }
}

/// Count labels in ranked order; the most frequent wins, earliest first on ties.
fn tally(ranked: &[VectorMatch]) -> Option<(String, usize)> {
    // Labels in order of first (best-ranked) appearance.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for m in ranked {
        match counts.iter_mut().find(|(label, _)| *label == m.class_label) {
            Some((_, count)) => *count += 1,
            None => counts.push((m.class_label.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, count)| (label.to_owned(), count))
}
