//! Storage module for persisting contact facts
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Existence checks used for fact deduplication
//! - Fact persistence with a uniqueness backstop
//! - Read access for the result view and statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteFactStore;
pub use traits::{FactStore, SaveOutcome, StorageError, StorageResult};

use crate::CrawlerError;
use std::fmt;
use std::path::Path;

/// Opens (or creates) a fact store database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteFactStore)` - Successfully initialized storage
/// * `Err(CrawlerError)` - Failed to initialize storage
pub fn open_store(path: &Path) -> Result<SqliteFactStore, CrawlerError> {
    Ok(SqliteFactStore::new(path)?)
}

/// The kind of contact datum a fact carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    Email,
    Phone,
    Address,
}

impl FactKind {
    pub const ALL: [FactKind; 3] = [FactKind::Email, FactKind::Phone, FactKind::Address];

    /// Column holding this kind's value in the `contact_info` table
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One extracted contact datum tied to the page it was found on
///
/// Facts are immutable once built; the store keeps at most one fact per
/// `(source_url, kind, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactFact {
    source_url: String,
    kind: FactKind,
    value: String,
}

impl ContactFact {
    pub fn new(source_url: impl Into<String>, kind: FactKind, value: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            kind,
            value: value.into(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The email field of the persisted record, if this is an email fact
    pub fn email(&self) -> Option<&str> {
        self.field(FactKind::Email)
    }

    /// The phone field of the persisted record, if this is a phone fact
    pub fn phone(&self) -> Option<&str> {
        self.field(FactKind::Phone)
    }

    /// The address field of the persisted record, if this is an address fact
    pub fn address(&self) -> Option<&str> {
        self.field(FactKind::Address)
    }

    fn field(&self, kind: FactKind) -> Option<&str> {
        (self.kind == kind).then_some(self.value.as_str())
    }
}
