//! Dataset ingestion: extract a descriptor per image and store it.
//!
//! ```ignore
//! use std::sync::Arc;
//! use placematch::ingest::{ClassTree, CommandExtractor, IngestionPipeline};
//!
//! let pipeline = IngestionPipeline::new(registry, Arc::new(CommandExtractor::new("describe")));
//! let appended = pipeline.describe_dataset("campus", &ClassTree::from_dir("images/campus")?)?;
//! ```

mod extractor;
mod tree;

use std::sync::Arc;
use std::time::Instant;

use placematch_vector::Descriptor;
use tracing::{debug, info, trace};

pub use extractor::{CommandExtractor, ExtractionError, Extractor};
pub use tree::{is_recognized_image, ClassEntry, ClassTree, IMAGE_EXTENSIONS};

use crate::error::Result;
use crate::registry::StoreRegistry;

/// Fills dataset stores from class trees.
///
/// Ingestion is not idempotent: describing the same tree twice stores every
/// descriptor twice. Clear the dataset with
/// [`StoreRegistry::drop_store`] first for a clean re-index.
#[derive(Clone)]
pub struct IngestionPipeline {
    registry: Arc<StoreRegistry>,
    extractor: Arc<dyn Extractor>,
}

impl IngestionPipeline {
    /// Create a pipeline storing into `registry` using `extractor`.
    #[must_use]
    pub fn new(registry: Arc<StoreRegistry>, extractor: Arc<dyn Extractor>) -> Self {
        Self { registry, extractor }
    }

    /// Describe every recognized image of `tree` into `dataset`.
    ///
    /// Each image is stored under its class name. The dataset's writer is
    /// held for the whole run, so runs on one dataset never interleave while
    /// queries and other datasets proceed.
    ///
    /// Returns the number of descriptors appended.
    ///
    /// # Errors
    ///
    /// Stops at the first extraction or append failure and returns it.
    /// Descriptors appended before the failure stay in the store.
    pub fn describe_dataset(&self, dataset: &str, tree: &ClassTree) -> Result<usize> {
        let start = Instant::now();

        let (appended, skipped) = self.registry.with_writer(dataset, |writer| {
            info!(dataset, classes = tree.classes().len(), images = tree.image_count(), "describing dataset");

            let mut appended = 0usize;
            let mut skipped = 0usize;

            for class in tree.classes() {
                for file in &class.files {
                    if !is_recognized_image(file) {
                        skipped += 1;
                        trace!(dataset, path = %file.display(), "skipping non-image file");
                        continue;
                    }

                    let vector = self.extractor.extract(file)?;
                    let descriptor = Descriptor::new(vector)?;
                    let id = writer.append(&class.name, &descriptor)?;
                    appended += 1;

                    debug!(
                        dataset,
                        class = class.name.as_str(),
                        image = %file.display(),
                        record = %id,
                        "described image"
                    );
                }
            }

            Ok((appended, skipped))
        })?;

        info!(
            dataset,
            appended,
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dataset described"
        );

        Ok(appended)
    }
}
