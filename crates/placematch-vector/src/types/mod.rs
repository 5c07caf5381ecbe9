//! Core types for descriptor storage.

mod dataset;
mod descriptor;
mod id;

pub use dataset::DatasetName;
pub use descriptor::{ensure_finite, Descriptor, DescriptorRecord};
pub use id::RecordId;
