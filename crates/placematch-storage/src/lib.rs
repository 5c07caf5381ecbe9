//! `placematch` Storage
//!
//! This crate provides the storage engine abstraction and backend implementations
//! for `placematch` descriptor stores.
//!
//! # Overview
//!
//! The storage layer provides a transactional key-value interface that backends
//! implement. Each dataset owns one engine instance, so exclusion and durability
//! are scoped to a single dataset.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - ACID transaction support with read/write operations
//! - [`Cursor`] - Ordered iteration over key-value pairs
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`. Every [`StorageError`] means the backing medium
//! could not be opened, read or written.
//!
//! # Example
//!
//! ```ignore
//! use placematch_storage::{StorageEngine, Transaction};
//! use placematch_storage::backends::RedbEngine;
//!
//! let engine = RedbEngine::open("paris.redb")?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put("descriptor_meta", b"dimension", &4096u32.to_le_bytes())?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! let dim = tx.get("descriptor_meta", b"dimension")?;
//! ```

pub mod backends;
pub mod engine;

pub use engine::{Cursor, CursorResult, KeyValue, StorageEngine, StorageError, StorageResult, Transaction};
