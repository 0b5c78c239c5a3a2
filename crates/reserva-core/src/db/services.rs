//! Service repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{NewService, Service};
use rusqlite::{params, Connection};

use super::now_ms;

/// Trait for service storage operations
pub trait ServiceRepository {
    /// Find a service by surrogate id
    fn find_by_id(&self, id: i64) -> Result<Option<Service>>;

    /// Find a service by exact name (best effort, names are not unique)
    fn find_by_name(&self, name: &str) -> Result<Option<Service>>;

    /// List services, name order
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Service>>;

    /// Insert a new service, returning the stored row
    fn insert(&self, new: &NewService) -> Result<Service>;

    /// Overwrite a service's mutable fields
    fn update(&self, service: &Service) -> Result<()>;

    /// Delete a service by id
    fn delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `ServiceRepository`, scoped to one organization
pub struct SqliteServiceRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

const COLUMNS: &str =
    "id, org_id, name, description, duration, price, category, is_enabled, created_at, updated_at";

impl<'a> SqliteServiceRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Service> {
        Ok(Service {
            id: row.get(0)?,
            org_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            duration: row.get(4)?,
            price: row.get(5)?,
            category: row.get(6)?,
            is_enabled: row.get::<_, i64>(7)? != 0,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn find_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<Service>> {
        match self.conn.query_row(sql, params, Self::parse_row) {
            Ok(service) => Ok(Some(service)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ServiceRepository for SqliteServiceRepository<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<Service>> {
        self.find_one(
            &format!("SELECT {COLUMNS} FROM services WHERE org_id = ? AND id = ?"),
            params![self.org_id, id],
        )
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Service>> {
        // Names are not unique; take the oldest match
        self.find_one(
            &format!(
                "SELECT {COLUMNS} FROM services WHERE org_id = ? AND name = ? ORDER BY id LIMIT 1"
            ),
            params![self.org_id, name],
        )
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Service>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM services
             WHERE org_id = ?
             ORDER BY name ASC
             LIMIT ? OFFSET ?"
        ))?;

        let services = stmt
            .query_map(
                params![self.org_id, limit as i64, offset as i64],
                Self::parse_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(services)
    }

    fn insert(&self, new: &NewService) -> Result<Service> {
        let now = now_ms();

        self.conn.execute(
            "INSERT INTO services
                 (org_id, name, description, duration, price, category, is_enabled, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.org_id,
                new.name,
                new.description,
                new.duration,
                new.price,
                new.category,
                i64::from(new.is_enabled),
                now,
                now
            ],
        )?;

        Ok(Service {
            id: self.conn.last_insert_rowid(),
            org_id: self.org_id.to_string(),
            name: new.name.clone(),
            description: new.description.clone(),
            duration: new.duration,
            price: new.price,
            category: new.category.clone(),
            is_enabled: new.is_enabled,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, service: &Service) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE services
             SET name = ?, description = ?, duration = ?, price = ?, category = ?,
                 is_enabled = ?, updated_at = ?
             WHERE org_id = ? AND id = ?",
            params![
                service.name,
                service.description,
                service.duration,
                service.price,
                service.category,
                i64::from(service.is_enabled),
                now_ms(),
                self.org_id,
                service.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("service {}", service.id)));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM services WHERE org_id = ? AND id = ?",
            params![self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("service {id}")));
        }

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
    fn test_insert_and_find_by_name() {
        let db = setup();
        let repo = SqliteServiceRepository::new(db.connection(), "default");

        let service = repo.insert(&NewService::with_name("Consult")).unwrap();
        assert_eq!(service.category, "other");
        assert!(service.is_enabled);

        let found = repo.find_by_name("Consult").unwrap().unwrap();
        assert_eq!(found.id, service.id);
        assert!(repo.find_by_name("Missing").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_takes_oldest_duplicate() {
        let db = setup();
        let repo = SqliteServiceRepository::new(db.connection(), "default");

        let first = repo.insert(&NewService::with_name("Consult")).unwrap();
        repo.insert(&NewService::with_name("Consult")).unwrap();

        let found = repo.find_by_name("Consult").unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn test_update() {
        let db = setup();
        let repo = SqliteServiceRepository::new(db.connection(), "default");

        let mut service = repo.insert(&NewService::with_name("Consult")).unwrap();
        service.duration = 45;
        service.price = 99.5;
        service.is_enabled = false;
        repo.update(&service).unwrap();

        let stored = repo.find_by_id(service.id).unwrap().unwrap();
        assert_eq!(stored.duration, 45);
        assert!((stored.price - 99.5).abs() < f64::EPSILON);
        assert!(!stored.is_enabled);
    }

    #[test]
    fn test_delete() {
        let db = setup();
        let repo = SqliteServiceRepository::new(db.connection(), "default");

        let service = repo.insert(&NewService::with_name("Consult")).unwrap();
        repo.delete(service.id).unwrap();
        assert!(repo.find_by_id(service.id).unwrap().is_none());
    }
}
