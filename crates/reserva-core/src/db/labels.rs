//! Custom label repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{CustomLabel, NewCustomLabel};
use rusqlite::{params, Connection};

use super::now_ms;

/// Trait for custom label storage operations
pub trait LabelRepository {
    /// Find a label by surrogate id
    fn find_by_id(&self, id: i64) -> Result<Option<CustomLabel>>;

    /// Find a label by its `(label_type, label_value)` pair
    fn find_by_key(&self, label_type: &str, label_value: &str) -> Result<Option<CustomLabel>>;

    /// List labels, grouped by type
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<CustomLabel>>;

    /// Insert a new label, returning the stored row
    fn insert(&self, new: &NewCustomLabel) -> Result<CustomLabel>;

    /// Update a label's description (the only mutable field)
    fn update_description(&self, id: i64, description: &str) -> Result<()>;

    /// Delete a label by id
    fn delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `LabelRepository`, scoped to one organization
pub struct SqliteLabelRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

const COLUMNS: &str = "id, org_id, label_type, label_value, description, created_at, updated_at";

impl<'a> SqliteLabelRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomLabel> {
        Ok(CustomLabel {
            id: row.get(0)?,
            org_id: row.get(1)?,
            label_type: row.get(2)?,
            label_value: row.get(3)?,
            description: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn find_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<CustomLabel>> {
        match self.conn.query_row(sql, params, Self::parse_row) {
            Ok(label) => Ok(Some(label)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl LabelRepository for SqliteLabelRepository<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<CustomLabel>> {
        self.find_one(
            &format!("SELECT {COLUMNS} FROM custom_labels WHERE org_id = ? AND id = ?"),
            params![self.org_id, id],
        )
    }

    fn find_by_key(&self, label_type: &str, label_value: &str) -> Result<Option<CustomLabel>> {
        self.find_one(
            &format!(
                "SELECT {COLUMNS} FROM custom_labels
                 WHERE org_id = ? AND label_type = ? AND label_value = ?"
            ),
            params![self.org_id, label_type, label_value],
        )
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<CustomLabel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM custom_labels
             WHERE org_id = ?
             ORDER BY label_type ASC, label_value ASC
             LIMIT ? OFFSET ?"
        ))?;

        let labels = stmt
            .query_map(
                params![self.org_id, limit as i64, offset as i64],
                Self::parse_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(labels)
    }

    fn insert(&self, new: &NewCustomLabel) -> Result<CustomLabel> {
        let now = now_ms();

        self.conn.execute(
            "INSERT INTO custom_labels
                 (org_id, label_type, label_value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                self.org_id,
                new.label_type,
                new.label_value,
                new.description,
                now,
                now
            ],
        )?;

        Ok(CustomLabel {
            id: self.conn.last_insert_rowid(),
            org_id: self.org_id.to_string(),
            label_type: new.label_type.clone(),
            label_value: new.label_value.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_description(&self, id: i64, description: &str) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE custom_labels SET description = ?, updated_at = ? WHERE org_id = ? AND id = ?",
            params![description, now_ms(), self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("label {id}")));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM custom_labels WHERE org_id = ? AND id = ?",
            params![self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("label {id}")));
        }

        Ok(())
    }
}
