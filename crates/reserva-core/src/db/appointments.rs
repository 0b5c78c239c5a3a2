//! Appointment repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{Appointment, NewAppointment};
use rusqlite::{params, Connection};

use super::now_ms;

/// Trait for appointment storage operations
pub trait AppointmentRepository {
    /// Find an appointment by surrogate id
    fn find_by_id(&self, id: i64) -> Result<Option<Appointment>>;

    /// Find an appointment by its slot key
    /// `(customer_id, date, time, service_id-or-null)`
    fn find_by_slot(
        &self,
        customer_id: i64,
        date: &str,
        time: &str,
        service_id: Option<i64>,
    ) -> Result<Option<Appointment>>;

    /// List appointments, most recent date first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Appointment>>;

    /// Insert a new appointment, returning the stored row
    fn insert(&self, new: &NewAppointment) -> Result<Appointment>;

    /// Overwrite an appointment's mutable fields
    fn update(&self, appointment: &Appointment) -> Result<()>;

    /// Delete an appointment by id
    fn delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `AppointmentRepository`, scoped to one organization
pub struct SqliteAppointmentRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

const COLUMNS: &str = "id, org_id, customer_id, service_id, staff, date, time, status, notes, \
                       meeting_platform, meeting_link, created_at, updated_at";

impl<'a> SqliteAppointmentRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
        Ok(Appointment {
            id: row.get(0)?,
            org_id: row.get(1)?,
            customer_id: row.get(2)?,
            service_id: row.get(3)?,
            staff: row.get(4)?,
            date: row.get(5)?,
            time: row.get(6)?,
            status: row.get(7)?,
            notes: row.get(8)?,
            meeting_platform: row.get(9)?,
            meeting_link: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn find_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<Appointment>> {
        match self.conn.query_row(sql, params, Self::parse_row) {
            Ok(appointment) => Ok(Some(appointment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        self.find_one(
            &format!("SELECT {COLUMNS} FROM appointments WHERE org_id = ? AND id = ?"),
            params![self.org_id, id],
        )
    }

    fn find_by_slot(
        &self,
        customer_id: i64,
        date: &str,
        time: &str,
        service_id: Option<i64>,
    ) -> Result<Option<Appointment>> {
        // `IS` gives null-safe equality on the optional service reference
        self.find_one(
            &format!(
                "SELECT {COLUMNS} FROM appointments
                 WHERE org_id = ? AND customer_id = ? AND date = ? AND time = ?
                   AND service_id IS ?
                 ORDER BY id LIMIT 1"
            ),
            params![self.org_id, customer_id, date, time, service_id],
        )
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE org_id = ?
             ORDER BY date DESC, time DESC
             LIMIT ? OFFSET ?"
        ))?;

        let appointments = stmt
            .query_map(
                params![self.org_id, limit as i64, offset as i64],
                Self::parse_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(appointments)
    }

    fn insert(&self, new: &NewAppointment) -> Result<Appointment> {
        let now = now_ms();

        self.conn.execute(
            "INSERT INTO appointments
                 (org_id, customer_id, service_id, staff, date, time, status, notes,
                  meeting_platform, meeting_link, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.org_id,
                new.customer_id,
                new.service_id,
                new.staff,
                new.date,
                new.time,
                new.status,
                new.notes,
                new.meeting_platform,
                new.meeting_link,
                now,
                now
            ],
        )?;

        Ok(Appointment {
            id: self.conn.last_insert_rowid(),
            org_id: self.org_id.to_string(),
            customer_id: new.customer_id,
            service_id: new.service_id,
            staff: new.staff.clone(),
            date: new.date.clone(),
            time: new.time.clone(),
            status: new.status.clone(),
            notes: new.notes.clone(),
            meeting_platform: new.meeting_platform.clone(),
            meeting_link: new.meeting_link.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, appointment: &Appointment) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE appointments
             SET customer_id = ?, service_id = ?, staff = ?, date = ?, time = ?, status = ?,
                 notes = ?, meeting_platform = ?, meeting_link = ?, updated_at = ?
             WHERE org_id = ? AND id = ?",
            params![
                appointment.customer_id,
                appointment.service_id,
                appointment.staff,
                appointment.date,
                appointment.time,
                appointment.status,
                appointment.notes,
                appointment.meeting_platform,
                appointment.meeting_link,
                now_ms(),
                self.org_id,
                appointment.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("appointment {}", appointment.id)));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM appointments WHERE org_id = ? AND id = ?",
            params![self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("appointment {id}")));
        }

        Ok(())
    }
}
