//! Database schema definitions
//!
//! This module contains the SQL schema for the contact fact database.

/// SQL schema for the database
///
/// Each record populates exactly one of `email`, `phone`, `address`. The
/// partial unique indexes reject a second copy of the same fact for the same
/// source page.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS contact_info (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    address TEXT,
    discovered_at TEXT NOT NULL,
    CHECK ((email IS NOT NULL) + (phone IS NOT NULL) + (address IS NOT NULL) = 1)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_email
    ON contact_info(source_url, email) WHERE email IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_phone
    ON contact_info(source_url, phone) WHERE phone IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_address
    ON contact_info(source_url, address) WHERE address IS NOT NULL;
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
