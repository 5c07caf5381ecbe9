//! `placematch` Vector
//!
//! This crate provides descriptor storage, distance metrics and matching for
//! `placematch` visual place recognition.
//!
//! # Overview
//!
//! - **Descriptor storage**: an append-only store of labelled, fixed-dimension
//!   descriptors per dataset
//! - **Metric library**: euclidean, manhattan, chebyshev, minkowski,
//!   bray-curtis and cosine, each tagged with its [`Directionality`]
//! - **Matching**: single best match and top-N majority vote
//!
//! # Example
//!
//! ```ignore
//! use placematch_storage::backends::RedbEngine;
//! use placematch_vector::{DescriptorStore, Descriptor, DistanceMetric, MatchingEngine};
//!
//! let store = DescriptorStore::new(RedbEngine::in_memory()?);
//! store.append("kitchen", &Descriptor::new(vec![0.9, 0.1])?)?;
//! store.append("hall", &Descriptor::new(vec![0.1, 0.9])?)?;
//!
//! let engine = MatchingEngine::new(&store, DistanceMetric::Cosine);
//! let best = engine.single_best_match(&[1.0, 0.0])?;
//! assert_eq!(best.map(|m| m.class_label).as_deref(), Some("kitchen"));
//! ```
//!
//! # Modules
//!
//! - [`store`] - Descriptor storage
//! - [`types`] - Core types ([`Descriptor`], [`DescriptorRecord`], [`RecordId`], [`DatasetName`])
//! - [`distance`] - Metric library
//! - [`encoding`] - Key and value encoding for storage
//! - [`error`] - Error types
//! - [`ops`] - Matching ([`MatchingEngine`])

pub mod distance;
pub mod encoding;
pub mod error;
pub mod ops;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use distance::{Directionality, DistanceMetric};
pub use error::VectorError;
pub use ops::{MatchingEngine, VectorMatch, VoteOutcome};
pub use store::{DescriptorStore, DescriptorWriter, StoreStats};
pub use types::{DatasetName, Descriptor, DescriptorRecord, RecordId};
