//! Storage traits and error types
//!
//! This module defines the trait interface for fact store backends and
//! associated error types.

use crate::storage::{ContactFact, FactKind};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt fact record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a save call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The fact was written
    Inserted,

    /// An identical fact already existed; nothing was written
    Duplicate,
}

/// Trait for fact store implementations
///
/// All methods take `&self` so one store can be shared by every worker of a
/// run. `exists` followed by `save` is not atomic; implementations must make
/// `save` of an already-present fact report `SaveOutcome::Duplicate` instead
/// of failing.
pub trait FactStore: Send + Sync {
    /// Checks whether a fact with this identity is already stored
    fn exists(&self, source_url: &str, kind: FactKind, value: &str) -> StorageResult<bool>;

    /// Persists a fact
    fn save(&self, fact: &ContactFact) -> StorageResult<SaveOutcome>;

    /// Returns every stored fact in store order
    fn find_all(&self) -> StorageResult<Vec<ContactFact>>;

    /// Counts stored facts per kind
    fn count_by_kind(&self) -> StorageResult<HashMap<FactKind, u64>>;

    /// Counts distinct source URLs that contributed at least one fact
    fn count_sources(&self) -> StorageResult<u64>;
}
