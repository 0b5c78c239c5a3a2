//! Customer repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{Customer, NewCustomer};
use rusqlite::{params, Connection};

use super::now_ms;

/// Trait for customer storage operations
pub trait CustomerRepository {
    /// Find a customer by surrogate id
    fn find_by_id(&self, id: i64) -> Result<Option<Customer>>;

    /// Find a customer by email (exact match, as stored)
    fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;

    /// List customers, newest first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Customer>>;

    /// Insert a new customer, returning the stored row
    fn insert(&self, new: &NewCustomer) -> Result<Customer>;

    /// Overwrite a customer's mutable fields
    fn update(&self, customer: &Customer) -> Result<()>;

    /// Delete a customer by id
    fn delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `CustomerRepository`, scoped to one organization
pub struct SqliteCustomerRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

impl<'a> SqliteCustomerRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
        Ok(Customer {
            id: row.get(0)?,
            org_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            notes: row.get(5)?,
            total_bookings: row.get(6)?,
            last_appointment: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

const COLUMNS: &str =
    "id, org_id, name, email, phone, notes, total_bookings, last_appointment, created_at, updated_at";

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let result = self.conn.query_row(
            &format!("SELECT {COLUMNS} FROM customers WHERE org_id = ? AND id = ?"),
            params![self.org_id, id],
            Self::parse_row,
        );

        match result {
            Ok(customer) => Ok(Some(customer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let result = self.conn.query_row(
            &format!("SELECT {COLUMNS} FROM customers WHERE org_id = ? AND email = ?"),
            params![self.org_id, email],
            Self::parse_row,
        );

        match result {
            Ok(customer) => Ok(Some(customer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM customers
             WHERE org_id = ?
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))?;

        let customers = stmt
            .query_map(
                params![self.org_id, limit as i64, offset as i64],
                Self::parse_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(customers)
    }

    fn insert(&self, new: &NewCustomer) -> Result<Customer> {
        let now = now_ms();

        self.conn.execute(
            "INSERT INTO customers
                 (org_id, name, email, phone, notes, total_bookings, last_appointment, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.org_id,
                new.name,
                new.email,
                new.phone,
                new.notes,
                new.total_bookings,
                new.last_appointment,
                now,
                now
            ],
        )?;

        Ok(Customer {
            id: self.conn.last_insert_rowid(),
            org_id: self.org_id.to_string(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            notes: new.notes.clone(),
            total_bookings: new.total_bookings,
            last_appointment: new.last_appointment.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, customer: &Customer) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE customers
             SET name = ?, email = ?, phone = ?, notes = ?, total_bookings = ?,
                 last_appointment = ?, updated_at = ?
             WHERE org_id = ? AND id = ?",
            params![
                customer.name,
                customer.email,
                customer.phone,
                customer.notes,
                customer.total_bookings,
                customer.last_appointment,
                now_ms(),
                self.org_id,
                customer.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("customer {}", customer.id)));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM customers WHERE org_id = ? AND id = ?",
            params![self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("customer {id}")));
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
    fn test_insert_and_find() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        let mut new = NewCustomer::with_email("a@b.com");
        new.name = "Alice".to_string();
        let customer = repo.insert(&new).unwrap();
        assert!(customer.id > 0);

        let by_email = repo.find_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(by_email.id, customer.id);
        assert_eq!(by_email.name, "Alice");

        let by_id = repo.find_by_id(customer.id).unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
    }

    #[test]
    fn test_email_match_is_exact() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        repo.insert(&NewCustomer::with_email("a@b.com")).unwrap();
        assert!(repo.find_by_email("A@B.COM").unwrap().is_none());
    }

    #[test]
    fn test_lookups_are_org_scoped() {
        let db = setup();
        let repo_a = SqliteCustomerRepository::new(db.connection(), "org-a");
        let repo_b = SqliteCustomerRepository::new(db.connection(), "org-b");

        repo_a.insert(&NewCustomer::with_email("a@b.com")).unwrap();
        assert!(repo_b.find_by_email("a@b.com").unwrap().is_none());
    }

    #[test]
    fn test_update_overwrites_fields() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        let mut customer = repo.insert(&NewCustomer::with_email("a@b.com")).unwrap();
        customer.name = "Renamed".to_string();
        customer.total_bookings = 3;
        repo.update(&customer).unwrap();

        let stored = repo.find_by_id(customer.id).unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.total_bookings, 3);
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        let mut customer = repo.insert(&NewCustomer::with_email("a@b.com")).unwrap();
        customer.id = 999;
        assert!(matches!(
            repo.update(&customer),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_delete() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        let customer = repo.insert(&NewCustomer::with_email("a@b.com")).unwrap();
        repo.delete(customer.id).unwrap();
        assert!(repo.find_by_id(customer.id).unwrap().is_none());
        assert!(matches!(repo.delete(customer.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup();
        let repo = SqliteCustomerRepository::new(db.connection(), "default");

        repo.insert(&NewCustomer::with_email("one@x.com")).unwrap();
        repo.insert(&NewCustomer::with_email("two@x.com")).unwrap();
        repo.insert(&NewCustomer::with_email("three@x.com")).unwrap();

        let customers = repo.list(2, 0).unwrap();
        assert_eq!(customers.len(), 2);
        assert!(customers[0].created_at >= customers[1].created_at);
    }
}
