//! Descriptor storage.
//!
//! A [`DescriptorStore`] holds the append-only descriptor records of one
//! dataset, backed by any [`StorageEngine`](placematch_storage::StorageEngine).
//!
//! # Example
//!
//! ```ignore
//! use placematch_storage::backends::RedbEngine;
//! use placematch_vector::store::DescriptorStore;
//! use placematch_vector::types::Descriptor;
//!
//! let store = DescriptorStore::new(RedbEngine::in_memory()?);
//! let id = store.append("kitchen", &Descriptor::new(vec![0.1, 0.2, 0.3])?)?;
//!
//! for record in store.list_all()? {
//!     println!("{} {}", record.id, record.class_label);
//! }
//! ```

mod descriptor_store;

pub use descriptor_store::{DescriptorStore, DescriptorWriter, StoreStats};
