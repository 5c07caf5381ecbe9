//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database with ACID transactions and MVCC reads.
//! A descriptor store maps one dataset to one Redb file.
//!
//! # In-Memory Databases
//!
//! For testing, you can create an in-memory database that doesn't persist:
//!
//! ```ignore
//! let engine = RedbEngine::in_memory()?;
//! ```
//!
//! # Configuration
//!
//! ```ignore
//! use placematch_storage::backends::redb::{RedbEngine, RedbConfig};
//!
//! let config = RedbConfig::new().cache_size(64 * 1024 * 1024);
//! let engine = RedbEngine::open_with_config("paris.redb", config)?;
//! ```

mod engine;
pub mod tables;
mod transaction;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::{RedbCursor, RedbTransaction};
