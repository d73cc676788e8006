//! `SQLite` key-value store for device template associations.
//!
//! Maps a device identifier (a GUID-like string, or the device name for
//! formats without stable GUIDs) to the filesystem path of an SVG template.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, StickmapError};

/// Database wrapper for template path storage.
pub struct TemplateDb {
    conn: Connection,
}

impl TemplateDb {
    /// Opens or creates a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StickmapError::Database(format!("Failed to open database: {e}")))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Creates an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StickmapError::Database(format!("Failed to create in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initializes the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| StickmapError::Database(format!("Failed to initialize schema: {e}")))?;
        Ok(())
    }

    /// Stores or replaces the template path for a device.
    ///
    /// Returns `true` when the association was newly inserted, `false` when an
    /// existing row was updated.
    pub fn add_or_update(&self, device_id: &str, template_path: &str) -> Result<bool> {
        let existed = self.get(device_id)?.is_some();

        self.conn
            .execute(
                "INSERT INTO device_template (device_id, template_path, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(device_id) DO UPDATE SET
                     template_path = excluded.template_path,
                     updated_at = excluded.updated_at",
                params![device_id, template_path],
            )
            .map_err(|e| StickmapError::Database(format!("Failed to store template: {e}")))?;

        debug!(device_id, template_path, inserted = !existed, "Stored template association");
        Ok(!existed)
    }

    /// Looks up the stored template for a device.
    pub fn get(&self, device_id: &str) -> Result<Option<TemplateRow>> {
        self.conn
            .query_row(
                "SELECT device_id, template_path, updated_at
                 FROM device_template WHERE device_id = ?1",
                params![device_id],
                |row| {
                    Ok(TemplateRow {
                        device_id: row.get(0)?,
                        template_path: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| StickmapError::Database(format!("Failed to query template: {e}")))
    }

    /// Lists all stored associations, oldest first.
    pub fn list(&self) -> Result<Vec<TemplateRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT device_id, template_path, updated_at
                 FROM device_template ORDER BY rowid",
            )
            .map_err(|e| StickmapError::Database(format!("Failed to prepare statement: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TemplateRow {
                    device_id: row.get(0)?,
                    template_path: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })
            .map_err(|e| StickmapError::Database(format!("Failed to query templates: {e}")))?;

        let mut templates = Vec::new();
        for row in rows {
            templates
                .push(row.map_err(|e| StickmapError::Database(format!("Failed to read row: {e}")))?);
        }

        Ok(templates)
    }

    /// Removes the association for a device. Returns `true` if a row was deleted.
    pub fn remove(&self, device_id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM device_template WHERE device_id = ?1",
                params![device_id],
            )
            .map_err(|e| StickmapError::Database(format!("Failed to remove template: {e}")))?;
        Ok(deleted > 0)
    }
}

/// Row data for a stored template association.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateRow {
    pub device_id: String,
    pub template_path: String,
    pub updated_at: String,
}

/// SQL schema for the template store.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS device_template (
    device_id TEXT PRIMARY KEY,
    template_path TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_database() {
        let db = TemplateDb::in_memory().unwrap();
        assert!(db.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_then_update() {
        let db = TemplateDb::in_memory().unwrap();

        let inserted = db.add_or_update("stick-guid", "/tmp/stick.svg").unwrap();
        assert!(inserted);

        let updated = db.add_or_update("stick-guid", "/tmp/other.svg").unwrap();
        assert!(!updated);

        let row = db.get("stick-guid").unwrap().unwrap();
        assert_eq!(row.template_path, "/tmp/other.svg");
        assert_eq!(db.list().unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let db = TemplateDb::in_memory().unwrap();
        assert!(db.get("unknown").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let db = TemplateDb::in_memory().unwrap();
        db.add_or_update("a", "/tmp/a.svg").unwrap();
        db.add_or_update("b", "/tmp/b.svg").unwrap();
        db.add_or_update("c", "/tmp/c.svg").unwrap();

        let ids: Vec<String> = db.list().unwrap().into_iter().map(|r| r.device_id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove() {
        let db = TemplateDb::in_memory().unwrap();
        db.add_or_update("stick", "/tmp/stick.svg").unwrap();

        assert!(db.remove("stick").unwrap());
        assert!(!db.remove("stick").unwrap());
        assert!(db.get("stick").unwrap().is_none());
    }
}
