//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the FactStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{FactStore, SaveOutcome, StorageError, StorageResult};
use crate::storage::{ContactFact, FactKind};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite fact store
///
/// The connection sits behind a mutex so the store can be shared across
/// workers; each call holds the lock for a single statement.
pub struct SqliteFactStore {
    conn: Mutex<Connection>,
}

impl SqliteFactStore {
    /// Opens or creates a database file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteFactStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

/// True when the error is a UNIQUE index rejection
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl FactStore for SqliteFactStore {
    fn exists(&self, source_url: &str, kind: FactKind, value: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM contact_info WHERE source_url = ?1 AND {} = ?2)",
            kind.column_name()
        );
        let found: bool = conn.query_row(&sql, params![source_url, value], |row| row.get(0))?;
        Ok(found)
    }

    fn save(&self, fact: &ContactFact) -> StorageResult<SaveOutcome> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let result = conn.execute(
            "INSERT INTO contact_info (source_url, email, phone, address, discovered_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                fact.source_url(),
                fact.email(),
                fact.phone(),
                fact.address(),
                now
            ],
        );

        match result {
            Ok(_) => Ok(SaveOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(SaveOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    fn find_all(&self) -> StorageResult<Vec<ContactFact>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, source_url, email, phone, address FROM contact_info ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, source_url, email, phone, address)| {
                match (email, phone, address) {
                    (Some(v), None, None) => Ok(ContactFact::new(source_url, FactKind::Email, v)),
                    (None, Some(v), None) => Ok(ContactFact::new(source_url, FactKind::Phone, v)),
                    (None, None, Some(v)) => {
                        Ok(ContactFact::new(source_url, FactKind::Address, v))
                    }
                    _ => Err(StorageError::CorruptRecord {
                        id,
                        reason: "expected exactly one of email, phone, address".to_string(),
                    }),
                }
            })
            .collect()
    }

    fn count_by_kind(&self) -> StorageResult<HashMap<FactKind, u64>> {
        let conn = self.lock()?;
        let mut counts = HashMap::new();

        for kind in FactKind::ALL {
            let sql = format!(
                "SELECT COUNT(*) FROM contact_info WHERE {} IS NOT NULL",
                kind.column_name()
            );
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            counts.insert(kind, count as u64);
        }

        Ok(counts)
    }

    fn count_sources(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT source_url) FROM contact_info",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
