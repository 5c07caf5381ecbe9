//! `placematch` - Visual Place Recognition
//!
//! placematch stores image descriptors per dataset and recognizes the place
//! (class) of a new image by comparing its descriptor with the stored ones.
//!
//! # Overview
//!
//! - [`StoreRegistry`] - per-dataset descriptor stores under a root directory
//! - [`IngestionPipeline`](ingest::IngestionPipeline) - describes a
//!   `<dataset>/<class>/<image>` tree into a store
//! - [`Recognizer`] - single best match and top-N vote queries
//! - [`Config`] - TOML configuration
//!
//! The feature extractor is external: anything implementing
//! [`Extractor`](ingest::Extractor) can be plugged in.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use placematch::{Config, Recognizer, RecognizeRequest, StoreRegistry};
//! use placematch::ingest::{ClassTree, CommandExtractor, IngestionPipeline};
//!
//! let config = Config::load("placematch.toml")?;
//! let registry = Arc::new(StoreRegistry::from_config(&config)?);
//!
//! let extractor = Arc::new(CommandExtractor::new("netvlad-describe"));
//! let pipeline = IngestionPipeline::new(Arc::clone(&registry), extractor);
//! pipeline.describe_dataset("campus", &ClassTree::from_dir("images/campus")?)?;
//!
//! let recognizer = Recognizer::new(registry, config.metric);
//! let answer = recognizer.recognize(&RecognizeRequest::new("campus", query))?;
//! println!("{}", answer.best_match_class);
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod recognize;
pub mod registry;

pub use config::{Config, ExtractorConfig};
pub use error::{Error, ErrorKind, Result};
pub use recognize::{MatchResponse, RankedClass, RecognizeRequest, Recognizer, VoteResponse};
pub use registry::{DatasetStore, StoreRegistry};

// Re-export the types callers need from the lower layers
pub use placematch_vector::{
    DatasetName, Descriptor, DescriptorRecord, DistanceMetric, RecordId, StoreStats,
};
