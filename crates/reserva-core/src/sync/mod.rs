//! Entity reconciliation engine
//!
//! Accepts a batch of client-supplied records for five entity kinds and
//! reconciles them against stored state with idempotent upsert
//! semantics. Kinds are processed in a fixed order so that appointments
//! can link to customers created earlier in the same batch; within a
//! kind, records are processed in array order.
//!
//! A record lacking its identity fields is skipped, not rejected. Any
//! storage error aborts the whole batch; there is no per-record
//! isolation and no retry.

mod linker;
mod merge;
mod resolve;

use std::fmt;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{
    AppointmentRepository, CustomerRepository, LabelRepository, ServiceRepository,
    SqliteAppointmentRepository, SqliteCustomerRepository, SqliteLabelRepository,
    SqliteServiceRepository, SqliteTeamMemberRepository, TeamMemberRepository,
};
use crate::error::Result;
use crate::models::{
    AppointmentRecord, CustomLabelRecord, CustomerRecord, NewAppointment, NewCustomLabel,
    NewCustomer, NewService, NewTeamMember, ServiceRecord, TeamMemberRecord,
};

pub use linker::{resolve_or_create_customer, CustomerLink, CustomerRef};
pub use merge::{merge_count, merge_flag, merge_opt_text, merge_price, merge_text};
pub use resolve::Resolution;

/// A client-submitted sync batch
///
/// Any missing array is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct SyncBatch {
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub team_members: Vec<TeamMemberRecord>,
    #[serde(default)]
    pub custom_labels: Vec<CustomLabelRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

/// Insert/update counts for one entity kind
///
/// Skips are tracked for observability but stay off the wire; the
/// response contract only carries inserted/updated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityTally {
    pub inserted: u32,
    pub updated: u32,
    #[serde(skip)]
    pub skipped: u32,
}

impl EntityTally {
    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Written(WriteKind::Inserted) => self.inserted += 1,
            RecordOutcome::Written(WriteKind::Updated) => self.updated += 1,
            RecordOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Per-kind tallies for a completed batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub customers: EntityTally,
    pub services: EntityTally,
    pub team_members: EntityTally,
    pub appointments: EntityTally,
    pub custom_labels: EntityTally,
}

/// How a single record was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Inserted,
    Updated,
}

/// Why a single record was dropped from the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Customer or team member record without an email
    MissingEmail,
    /// Service record with neither a matching id nor a name
    MissingName,
    /// Label record missing `label_type` or `label_value`
    MissingLabelKey,
    /// Appointment record missing date or time
    MissingSchedule,
    /// Appointment record whose customer reference resolved to nothing
    UnresolvedCustomer,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingEmail => "missing email",
            Self::MissingName => "missing name",
            Self::MissingLabelKey => "missing label_type/label_value",
            Self::MissingSchedule => "missing date/time",
            Self::UnresolvedCustomer => "unresolvable customer reference",
        };
        f.write_str(text)
    }
}

/// Outcome of processing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Written(WriteKind),
    Skipped(SkipReason),
}

/// Engine behavior knobs
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Wrap the whole batch in one transaction, rolled back on any
    /// error. `false` reproduces commit-as-you-go behavior where a late
    /// failure leaves earlier writes in place.
    pub transactional: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            transactional: true,
        }
    }
}

/// The reconciliation engine
///
/// Constructed per batch with an explicit organization id; business
/// logic never reads the organization from ambient state.
pub struct SyncEngine<'a> {
    conn: &'a Connection,
    org_id: &'a str,
    options: SyncOptions,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine with default options
    #[must_use]
    pub fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self {
            conn,
            org_id,
            options: SyncOptions::default(),
        }
    }

    /// Override the engine options
    #[must_use]
    pub const fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Reconcile one batch, returning per-kind tallies
    pub fn run(&self, batch: &SyncBatch) -> Result<SyncSummary> {
        if self.options.transactional {
            let tx = self.conn.unchecked_transaction()?;
            let summary = self.run_on(&tx, batch)?;
            tx.commit()?;
            Ok(summary)
        } else {
            self.run_on(self.conn, batch)
        }
    }

    fn run_on(&self, conn: &Connection, batch: &SyncBatch) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        for record in &batch.customers {
            let outcome = self.upsert_customer(conn, record)?;
            log_skip("customers", outcome);
            summary.customers.record(outcome);
        }
        for record in &batch.services {
            let outcome = self.upsert_service(conn, record)?;
            log_skip("services", outcome);
            summary.services.record(outcome);
        }
        for record in &batch.team_members {
            let outcome = self.upsert_team_member(conn, record)?;
            log_skip("team_members", outcome);
            summary.team_members.record(outcome);
        }
        for record in &batch.custom_labels {
            let outcome = self.upsert_label(conn, record)?;
            log_skip("custom_labels", outcome);
            summary.custom_labels.record(outcome);
        }
        // Appointments run last: the linker depends on customer rows,
        // including ones inserted earlier in this same batch.
        for record in &batch.appointments {
            let outcome = self.upsert_appointment(conn, record, &mut summary.customers)?;
            log_skip("appointments", outcome);
            summary.appointments.record(outcome);
        }

        tracing::debug!(org = self.org_id, ?summary, "Sync batch reconciled");
        Ok(summary)
    }

    fn upsert_customer(&self, conn: &Connection, record: &CustomerRecord) -> Result<RecordOutcome> {
        let repo = SqliteCustomerRepository::new(conn, self.org_id);
        match resolve::customer(&repo, record)? {
            Resolution::Skip(reason) => Ok(RecordOutcome::Skipped(reason)),
            Resolution::Existing(mut row) => {
                row.name = merge_text(record.name.as_deref(), row.name);
                row.phone = merge_text(record.phone.as_deref(), row.phone);
                row.notes = merge_text(record.notes.as_deref(), row.notes);
                row.total_bookings = merge_count(record.total_bookings, row.total_bookings);
                row.last_appointment =
                    merge_opt_text(record.last_appointment.as_deref(), row.last_appointment);
                repo.update(&row)?;
                Ok(RecordOutcome::Written(WriteKind::Updated))
            }
            Resolution::New => {
                // Resolution guarantees the email is present here
                let mut new =
                    NewCustomer::with_email(record.email.as_deref().unwrap_or_default());
                new.name = record.name.clone().unwrap_or_default();
                new.phone = record.phone.clone().unwrap_or_default();
                new.notes = record.notes.clone().unwrap_or_default();
                new.total_bookings = record.total_bookings.unwrap_or(0);
                new.last_appointment = record.last_appointment.clone();
                repo.insert(&new)?;
                Ok(RecordOutcome::Written(WriteKind::Inserted))
            }
        }
    }

    fn upsert_service(&self, conn: &Connection, record: &ServiceRecord) -> Result<RecordOutcome> {
        let repo = SqliteServiceRepository::new(conn, self.org_id);
        match resolve::service(&repo, record)? {
            Resolution::Skip(reason) => Ok(RecordOutcome::Skipped(reason)),
            Resolution::Existing(mut row) => {
                row.name = merge_text(record.name.as_deref(), row.name);
                row.description = merge_text(record.description.as_deref(), row.description);
                row.duration = merge_count(record.duration, row.duration);
                row.price = merge_price(record.price, row.price);
                row.category = merge_text(record.category.as_deref(), row.category);
                row.is_enabled = merge_flag(record.is_enabled, row.is_enabled);
                repo.update(&row)?;
                Ok(RecordOutcome::Written(WriteKind::Updated))
            }
            Resolution::New => {
                let mut new = NewService::with_name(record.name.as_deref().unwrap_or_default());
                new.description = record.description.clone().unwrap_or_default();
                new.duration = record.duration.unwrap_or(0);
                new.price = record.price.unwrap_or(0.0);
                if let Some(category) = record.category.clone().filter(|c| !c.is_empty()) {
                    new.category = category;
                }
                new.is_enabled = record.is_enabled.unwrap_or(true);
                repo.insert(&new)?;
                Ok(RecordOutcome::Written(WriteKind::Inserted))
            }
        }
    }

    fn upsert_team_member(
        &self,
        conn: &Connection,
        record: &TeamMemberRecord,
    ) -> Result<RecordOutcome> {
        let repo = SqliteTeamMemberRepository::new(conn, self.org_id);
        match resolve::team_member(&repo, record)? {
            Resolution::Skip(reason) => Ok(RecordOutcome::Skipped(reason)),
            Resolution::Existing(mut row) => {
                row.name = merge_text(record.name.as_deref(), row.name);
                row.role = merge_text(record.role.as_deref(), row.role);
                row.avatar = merge_text(record.avatar.as_deref(), row.avatar);
                row.color = merge_text(record.color.as_deref(), row.color);
                row.is_active = merge_flag(record.is_active, row.is_active);
                repo.update(&row)?;
                Ok(RecordOutcome::Written(WriteKind::Updated))
            }
            Resolution::New => {
                let mut new =
                    NewTeamMember::with_email(record.email.as_deref().unwrap_or_default());
                new.name = record.name.clone().unwrap_or_default();
                new.role = record.role.clone().unwrap_or_default();
                new.avatar = record.avatar.clone().unwrap_or_default();
                new.color = record.color.clone().unwrap_or_default();
                new.is_active = record.is_active.unwrap_or(true);
                repo.insert(&new)?;
                Ok(RecordOutcome::Written(WriteKind::Inserted))
            }
        }
    }

    fn upsert_label(&self, conn: &Connection, record: &CustomLabelRecord) -> Result<RecordOutcome> {
        let repo = SqliteLabelRepository::new(conn, self.org_id);
        match resolve::label(&repo, record)? {
            Resolution::Skip(reason) => Ok(RecordOutcome::Skipped(reason)),
            Resolution::Existing(row) => {
                // Only the description is mutable on a label
                let description = merge_text(record.description.as_deref(), row.description);
                repo.update_description(row.id, &description)?;
                Ok(RecordOutcome::Written(WriteKind::Updated))
            }
            Resolution::New => {
                let new = NewCustomLabel {
                    label_type: record.label_type.clone().unwrap_or_default(),
                    label_value: record.label_value.clone().unwrap_or_default(),
                    description: record.description.clone().unwrap_or_default(),
                };
                repo.insert(&new)?;
                Ok(RecordOutcome::Written(WriteKind::Inserted))
            }
        }
    }

    fn upsert_appointment(
        &self,
        conn: &Connection,
        record: &AppointmentRecord,
        customer_tally: &mut EntityTally,
    ) -> Result<RecordOutcome> {
        let (Some(date), Some(time)) = (
            record.date.as_deref().filter(|d| !d.is_empty()),
            record.time.as_deref().filter(|t| !t.is_empty()),
        ) else {
            return Ok(RecordOutcome::Skipped(SkipReason::MissingSchedule));
        };

        let customers = SqliteCustomerRepository::new(conn, self.org_id);
        let reference = CustomerRef::from_record(record);
        let Some(link) = resolve_or_create_customer(&customers, &reference)? else {
            return Ok(RecordOutcome::Skipped(SkipReason::UnresolvedCustomer));
        };
        if matches!(link, CustomerLink::Created(_)) {
            customer_tally.inserted += 1;
        }
        let customer_id = link.id();

        let repo = SqliteAppointmentRepository::new(conn, self.org_id);
        match resolve::appointment(&repo, record, customer_id, date, time)? {
            Resolution::Skip(reason) => Ok(RecordOutcome::Skipped(reason)),
            Resolution::Existing(mut row) => {
                row.customer_id = customer_id;
                row.service_id = record.service_id.or(row.service_id);
                row.staff = merge_text(record.staff.as_deref(), row.staff);
                row.date = date.to_string();
                row.time = time.to_string();
                row.status = merge_text(record.status.as_deref(), row.status);
                row.notes = merge_text(record.notes.as_deref(), row.notes);
                row.meeting_platform =
                    merge_text(record.meeting_platform.as_deref(), row.meeting_platform);
                row.meeting_link = merge_text(record.meeting_link.as_deref(), row.meeting_link);
                repo.update(&row)?;
                Ok(RecordOutcome::Written(WriteKind::Updated))
            }
            Resolution::New => {
                let mut new = NewAppointment::with_slot(customer_id, date, time);
                new.service_id = record.service_id;
                new.staff = record.staff.clone().unwrap_or_default();
                if let Some(status) = record.status.clone().filter(|s| !s.is_empty()) {
                    new.status = status;
                }
                new.notes = record.notes.clone().unwrap_or_default();
                new.meeting_platform = record.meeting_platform.clone().unwrap_or_default();
                new.meeting_link = record.meeting_link.clone().unwrap_or_default();
                repo.insert(&new)?;
                Ok(RecordOutcome::Written(WriteKind::Inserted))
            }
        }
    }
}

fn log_skip(kind: &'static str, outcome: RecordOutcome) {
    if let RecordOutcome::Skipped(reason) = outcome {
        tracing::debug!(kind, %reason, "Skipped sync record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::NewService;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn engine(db: &Database) -> SyncEngine<'_> {
        SyncEngine::new(db.connection(), "default")
    }

    fn customer(email: &str) -> CustomerRecord {
        CustomerRecord {
            email: Some(email.to_string()),
            ..CustomerRecord::default()
        }
    }

    fn count(db: &Database, table: &str) -> i64 {
        db.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn customer_sync_is_idempotent() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![CustomerRecord {
                name: Some("Alice".to_string()),
                ..customer("a@b.com")
            }],
            ..SyncBatch::default()
        };

        let first = engine(&db).run(&batch).unwrap();
        assert_eq!(first.customers.inserted, 1);
        assert_eq!(first.customers.updated, 0);

        let second = engine(&db).run(&batch).unwrap();
        assert_eq!(second.customers.inserted, 0);
        assert_eq!(second.customers.updated, 1);

        assert_eq!(count(&db, "customers"), 1);
    }

    #[test]
    fn merge_preserves_unset_fields() {
        let db = setup();

        let first = SyncBatch {
            customers: vec![CustomerRecord {
                name: Some("A".to_string()),
                phone: Some("555".to_string()),
                ..customer("a@b.com")
            }],
            ..SyncBatch::default()
        };
        engine(&db).run(&first).unwrap();

        // No phone field at all: the stored phone must survive
        let second = SyncBatch {
            customers: vec![CustomerRecord {
                name: Some("B".to_string()),
                ..customer("a@b.com")
            }],
            ..SyncBatch::default()
        };
        engine(&db).run(&second).unwrap();

        let repo = SqliteCustomerRepository::new(db.connection(), "default");
        let stored = repo.find_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(stored.name, "B");
        assert_eq!(stored.phone, "555");
    }

    #[test]
    fn empty_string_does_not_clear_a_field() {
        let db = setup();

        let first = SyncBatch {
            customers: vec![CustomerRecord {
                phone: Some("555".to_string()),
                ..customer("a@b.com")
            }],
            ..SyncBatch::default()
        };
        engine(&db).run(&first).unwrap();

        let second = SyncBatch {
            customers: vec![CustomerRecord {
                phone: Some(String::new()),
                ..customer("a@b.com")
            }],
            ..SyncBatch::default()
        };
        engine(&db).run(&second).unwrap();

        let repo = SqliteCustomerRepository::new(db.connection(), "default");
        assert_eq!(
            repo.find_by_email("a@b.com").unwrap().unwrap().phone,
            "555"
        );
    }

    #[test]
    fn customer_without_email_is_skipped_not_failed() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![
                CustomerRecord {
                    name: Some("No Email".to_string()),
                    ..CustomerRecord::default()
                },
                customer("ok@x.com"),
            ],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.customers.inserted, 1);
        assert_eq!(summary.customers.skipped, 1);
        assert_eq!(count(&db, "customers"), 1);
    }

    #[test]
    fn appointment_creates_unknown_customer() {
        let db = setup();

        let batch = SyncBatch {
            appointments: vec![AppointmentRecord {
                customer_email: Some("new@x.com".to_string()),
                customer_name: Some("New Person".to_string()),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.appointments.inserted, 1);
        assert_eq!(summary.customers.inserted, 1);

        let customers = SqliteCustomerRepository::new(db.connection(), "default");
        let created = customers.find_by_email("new@x.com").unwrap().unwrap();

        let appointments = SqliteAppointmentRepository::new(db.connection(), "default");
        let stored = appointments.list(10, 0).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].customer_id, created.id);
    }

    #[test]
    fn appointment_without_customer_reference_is_dropped() {
        let db = setup();

        let batch = SyncBatch {
            appointments: vec![AppointmentRecord {
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.appointments.inserted, 0);
        assert_eq!(summary.appointments.updated, 0);
        assert_eq!(summary.appointments.skipped, 1);
        assert_eq!(count(&db, "appointments"), 0);
    }

    #[test]
    fn appointment_without_schedule_is_dropped() {
        let db = setup();

        let batch = SyncBatch {
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.appointments.skipped, 1);
        // The linker never ran, so no customer appeared either
        assert_eq!(count(&db, "customers"), 0);
    }

    #[test]
    fn label_composite_key_dedup() {
        let db = setup();

        let done = SyncBatch {
            custom_labels: vec![CustomLabelRecord {
                label_type: Some("status".to_string()),
                label_value: Some("Done".to_string()),
                ..CustomLabelRecord::default()
            }],
            ..SyncBatch::default()
        };

        let first = engine(&db).run(&done).unwrap();
        assert_eq!(first.custom_labels.inserted, 1);
        let second = engine(&db).run(&done).unwrap();
        assert_eq!(second.custom_labels.updated, 1);

        let different = SyncBatch {
            custom_labels: vec![CustomLabelRecord {
                label_type: Some("status".to_string()),
                label_value: Some("Different".to_string()),
                ..CustomLabelRecord::default()
            }],
            ..SyncBatch::default()
        };
        let third = engine(&db).run(&different).unwrap();
        assert_eq!(third.custom_labels.inserted, 1);

        assert_eq!(count(&db, "custom_labels"), 2);
    }

    #[test]
    fn service_id_precedence_renames_in_place() {
        let db = setup();

        let seeded = {
            let repo = SqliteServiceRepository::new(db.connection(), "default");
            repo.insert(&NewService::with_name("Consult")).unwrap()
        };

        let batch = SyncBatch {
            services: vec![ServiceRecord {
                id: Some(seeded.id),
                name: Some("Consult Renamed".to_string()),
                ..ServiceRecord::default()
            }],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.services.updated, 1);
        assert_eq!(summary.services.inserted, 0);

        let repo = SqliteServiceRepository::new(db.connection(), "default");
        let stored = repo.find_by_id(seeded.id).unwrap().unwrap();
        assert_eq!(stored.name, "Consult Renamed");
        assert_eq!(count(&db, "services"), 1);
    }

    #[test]
    fn end_to_end_customer_and_appointment() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![CustomerRecord {
                name: Some("A".to_string()),
                ..customer("a@b.com")
            }],
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        let summary = engine(&db).run(&batch).unwrap();
        let expected = SyncSummary {
            customers: EntityTally {
                inserted: 1,
                updated: 0,
                skipped: 0,
            },
            appointments: EntityTally {
                inserted: 1,
                updated: 0,
                skipped: 0,
            },
            ..SyncSummary::default()
        };
        assert_eq!(summary, expected);

        let customers = SqliteCustomerRepository::new(db.connection(), "default");
        let stored = customers.find_by_email("a@b.com").unwrap().unwrap();

        let appointments = SqliteAppointmentRepository::new(db.connection(), "default");
        let rows = appointments.list(10, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_id, stored.id);
        assert_eq!(count(&db, "customers"), 1);
    }

    #[test]
    fn appointment_upsert_by_slot_is_idempotent() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![customer("a@b.com")],
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                notes: Some("first".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };
        engine(&db).run(&batch).unwrap();

        let again = SyncBatch {
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                status: Some("completed".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };
        let summary = engine(&db).run(&again).unwrap();
        assert_eq!(summary.appointments.updated, 1);
        assert_eq!(count(&db, "appointments"), 1);

        let repo = SqliteAppointmentRepository::new(db.connection(), "default");
        let stored = &repo.list(10, 0).unwrap()[0];
        assert_eq!(stored.status, "completed");
        // Merge kept the notes from the first sync
        assert_eq!(stored.notes, "first");
    }

    #[test]
    fn transactional_batch_rolls_back_on_failure() {
        let db = setup();

        // The dangling service reference violates the foreign key and
        // fails the batch after the customer write already ran.
        let batch = SyncBatch {
            customers: vec![customer("a@b.com")],
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                service_id: Some(999),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        assert!(engine(&db).run(&batch).is_err());
        assert_eq!(count(&db, "customers"), 0);
        assert_eq!(count(&db, "appointments"), 0);
    }

    #[test]
    fn non_transactional_batch_keeps_earlier_writes() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![customer("a@b.com")],
            appointments: vec![AppointmentRecord {
                customer_email: Some("a@b.com".to_string()),
                service_id: Some(999),
                date: Some("2025-01-01".to_string()),
                time: Some("10:00".to_string()),
                ..AppointmentRecord::default()
            }],
            ..SyncBatch::default()
        };

        let result = engine(&db)
            .with_options(SyncOptions {
                transactional: false,
            })
            .run(&batch);

        assert!(result.is_err());
        // The customer insert committed before the failure
        assert_eq!(count(&db, "customers"), 1);
        assert_eq!(count(&db, "appointments"), 0);
    }

    #[test]
    fn batch_arrays_are_optional_on_the_wire() {
        let db = setup();

        let batch: SyncBatch =
            serde_json::from_str(r#"{"customers":[{"email":"a@b.com"}]}"#).unwrap();
        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.customers.inserted, 1);
        assert_eq!(summary.services, EntityTally::default());
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let db = setup();

        let batch: SyncBatch = serde_json::from_str(
            r#"{"customers":[{"email":"a@b.com","favorite_color":"green"}],"device":"ios"}"#,
        )
        .unwrap();
        let summary = engine(&db).run(&batch).unwrap();
        assert_eq!(summary.customers.inserted, 1);
    }

    #[test]
    fn summary_serializes_without_skip_counts() {
        let summary = SyncSummary {
            customers: EntityTally {
                inserted: 2,
                updated: 1,
                skipped: 3,
            },
            ..SyncSummary::default()
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["customers"]["inserted"], 2);
        assert_eq!(json["customers"]["updated"], 1);
        assert!(json["customers"].get("skipped").is_none());
    }

    #[test]
    fn organizations_are_isolated() {
        let db = setup();

        let batch = SyncBatch {
            customers: vec![customer("a@b.com")],
            ..SyncBatch::default()
        };
        SyncEngine::new(db.connection(), "org-a")
            .run(&batch)
            .unwrap();
        let summary = SyncEngine::new(db.connection(), "org-b")
            .run(&batch)
            .unwrap();

        // The same email in another organization is a fresh insert
        assert_eq!(summary.customers.inserted, 1);
        assert_eq!(count(&db, "customers"), 2);
    }
}
