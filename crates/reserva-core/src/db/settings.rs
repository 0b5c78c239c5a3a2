//! Organization settings repository implementation

use std::collections::HashMap;

use crate::error::{Error, Result};
use rusqlite::{params, Connection};

/// Trait for organization settings storage operations
pub trait SettingsRepository {
    /// Load all settings for the organization
    fn load(&self) -> Result<HashMap<String, String>>;

    /// Get a single setting
    fn get(&self, key: &str) -> Result<String>;

    /// Set a single setting
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Replace many settings in one transaction
    ///
    /// Either every pair is written or none is.
    fn bulk_update(&self, values: &HashMap<String, String>) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`, scoped to one organization
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<HashMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM org_settings WHERE org_id = ?")?;

        let settings = stmt
            .query_map(params![self.org_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;

        Ok(settings)
    }

    fn get(&self, key: &str) -> Result<String> {
        let result = self.conn.query_row(
            "SELECT value FROM org_settings WHERE org_id = ? AND key = ?",
            params![self.org_id, key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO org_settings (org_id, key, value) VALUES (?, ?, ?)",
            params![self.org_id, key, value],
        )?;
        Ok(())
    }

    fn bulk_update(&self, values: &HashMap<String, String>) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in values {
            tx.execute(
                "INSERT OR REPLACE INTO org_settings (org_id, key, value) VALUES (?, ?, ?)",
                params![self.org_id, key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection(), "default");
        assert!(matches!(repo.get("tz"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_set_and_load() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection(), "default");

        repo.set("tz", "UTC").unwrap();
        repo.set("tz", "Europe/Berlin").unwrap();
        repo.set("notify", "email").unwrap();

        assert_eq!(repo.get("tz").unwrap(), "Europe/Berlin");
        let all = repo.load().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("notify").map(String::as_str), Some("email"));
    }

    #[test]
    fn test_bulk_update() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection(), "default");

        let mut values = HashMap::new();
        values.insert("tz".to_string(), "UTC".to_string());
        values.insert("notify".to_string(), "sms".to_string());
        repo.bulk_update(&values).unwrap();

        assert_eq!(repo.get("notify").unwrap(), "sms");
    }

    #[test]
    fn test_bulk_update_failure_leaves_stored_settings_untouched() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection(), "default");
        repo.set("tz", "UTC").unwrap();

        // Reject one key at the storage level so the batch fails
        // partway through regardless of map iteration order.
        db.connection()
            .execute_batch(
                "CREATE TRIGGER reject_quota BEFORE INSERT ON org_settings
                 WHEN NEW.key = 'quota'
                 BEGIN SELECT RAISE(ABORT, 'quota is immutable'); END",
            )
            .unwrap();

        let mut values = HashMap::new();
        values.insert("tz".to_string(), "Asia/Tokyo".to_string());
        values.insert("quota".to_string(), "100".to_string());
        assert!(repo.bulk_update(&values).is_err());

        assert_eq!(repo.get("tz").unwrap(), "UTC");
        assert!(matches!(repo.get("quota"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_settings_are_org_scoped() {
        let db = setup();
        let repo_a = SqliteSettingsRepository::new(db.connection(), "org-a");
        let repo_b = SqliteSettingsRepository::new(db.connection(), "org-b");

        repo_a.set("tz", "UTC").unwrap();
        assert!(repo_b.get("tz").is_err());
    }
}
