//! Place recognition queries.
//!
//! A [`Recognizer`] answers "which class does this descriptor belong to"
//! against one dataset, either by single best match or by a top-N vote.

use std::path::Path;
use std::sync::Arc;

use placematch_vector::types::ensure_finite;
use placematch_vector::{DistanceMetric, MatchingEngine, VectorMatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ingest::Extractor;
use crate::registry::StoreRegistry;

/// A query against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizeRequest {
    /// Dataset to query.
    pub dataset_name: String,
    /// Descriptor of the query image.
    pub query_vector: Vec<f32>,
    /// Metric override; the recognizer's default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<DistanceMetric>,
}

impl RecognizeRequest {
    /// Create a request using the recognizer's default metric.
    #[must_use]
    pub fn new(dataset_name: impl Into<String>, query_vector: Vec<f32>) -> Self {
        Self { dataset_name: dataset_name.into(), query_vector, metric: None }
    }

    /// Use `metric` for this request.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = Some(metric);
        self
    }
}

/// Answer to a single best match query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Class of the closest stored descriptor.
    pub best_match_class: String,
    /// Metric value between the query and that descriptor.
    pub metric_value: f32,
}

/// One ranked neighbour of a vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedClass {
    /// Class of the neighbour.
    pub class_label: String,
    /// Metric value between the query and the neighbour.
    pub metric_value: f32,
}

impl From<VectorMatch> for RankedClass {
    fn from(m: VectorMatch) -> Self {
        Self { class_label: m.class_label, metric_value: m.score }
    }
}

/// Answer to a top-N vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Winning class of the vote.
    pub best_match_class: String,
    /// The neighbours that voted, closest first.
    pub ranked_top_n: Vec<RankedClass>,
}

/// Runs recognition queries against a [`StoreRegistry`].
#[derive(Clone)]
pub struct Recognizer {
    registry: Arc<StoreRegistry>,
    metric: DistanceMetric,
    top_n: usize,
    extractor: Option<Arc<dyn Extractor>>,
}

impl Recognizer {
    /// Create a recognizer ranking by `metric` by default.
    #[must_use]
    pub fn new(registry: Arc<StoreRegistry>, metric: DistanceMetric) -> Self {
        Self { registry, metric, top_n: crate::config::DEFAULT_TOP_N, extractor: None }
    }

    /// Set the default neighbour count of [`vote`](Self::vote).
    #[must_use]
    pub const fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Set the extractor used by the image queries.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// The default neighbour count.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Return the class of the closest stored descriptor.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMatch`] if the dataset has no descriptors
    /// - [`Error::DimensionMismatch`] if the query length differs from the
    ///   dataset dimension
    /// - [`Error::InvalidArgument`] for an invalid dataset name or a query
    ///   holding NaN or infinity
    pub fn recognize(&self, request: &RecognizeRequest) -> Result<MatchResponse> {
        ensure_finite(&request.query_vector)?;
        let metric = request.metric.unwrap_or(self.metric);
        let Some(store) = self.registry.get_existing(&request.dataset_name)? else {
            return Err(Error::NoMatch);
        };

        let best = MatchingEngine::new(&store, metric)
            .single_best_match(&request.query_vector)?
            .ok_or(Error::NoMatch)?;

        debug!(
            dataset = request.dataset_name.as_str(),
            %metric,
            class = best.class_label.as_str(),
            "recognized"
        );
        Ok(MatchResponse { best_match_class: best.class_label, metric_value: best.score })
    }

    /// Vote among the `n` closest stored descriptors.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyStore`] if the dataset has no descriptors
    /// - [`Error::InvalidArgument`] if `n` is zero, the dataset name is invalid
    ///   or the query holds NaN or infinity
    /// - [`Error::DimensionMismatch`] if the query length differs from the
    ///   dataset dimension
    pub fn recognize_top_n(&self, request: &RecognizeRequest, n: usize) -> Result<VoteResponse> {
        if n == 0 {
            return Err(Error::invalid_argument("n must be at least 1"));
        }
        ensure_finite(&request.query_vector)?;
        let metric = request.metric.unwrap_or(self.metric);
        let Some(store) = self.registry.get_existing(&request.dataset_name)? else {
            return Err(Error::EmptyStore);
        };

        let outcome = MatchingEngine::new(&store, metric).top_n_vote(&request.query_vector, n)?;

        debug!(
            dataset = request.dataset_name.as_str(),
            %metric,
            n,
            class = outcome.winner.as_str(),
            votes = outcome.votes,
            "voted"
        );
        Ok(VoteResponse {
            best_match_class: outcome.winner,
            ranked_top_n: outcome.ranked.into_iter().map(RankedClass::from).collect(),
        })
    }

    /// [`recognize_top_n`](Self::recognize_top_n) with the default neighbour count.
    ///
    /// # Errors
    ///
    /// See [`recognize_top_n`](Self::recognize_top_n).
    pub fn vote(&self, request: &RecognizeRequest) -> Result<VoteResponse> {
        self.recognize_top_n(request, self.top_n)
    }

    /// Extract a descriptor from `image` and recognize it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no extractor is set, [`Error::Extraction`]
    /// if extraction fails, or any error of [`recognize`](Self::recognize).
    pub fn recognize_image(&self, dataset: &str, image: &Path) -> Result<MatchResponse> {
        let request = RecognizeRequest::new(dataset, self.extract(image)?);
        self.recognize(&request)
    }

    /// Extract a descriptor from `image` and vote with the default count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no extractor is set, [`Error::Extraction`]
    /// if extraction fails, or any error of [`vote`](Self::vote).
    pub fn vote_image(&self, dataset: &str, image: &Path) -> Result<VoteResponse> {
        let request = RecognizeRequest::new(dataset, self.extract(image)?);
        self.vote(&request)
    }

    fn extract(&self, image: &Path) -> Result<Vec<f32>> {
        let extractor =
            self.extractor.as_ref().ok_or_else(|| Error::config("no feature extractor configured"))?;
        Ok(extractor.extract(image)?)
    }
}
