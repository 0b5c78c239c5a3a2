//! Key resolution for sync records
//!
//! Decides, per entity kind, whether an incoming record matches a stored
//! row (update), matches nothing (insert), or lacks the identity fields
//! needed to decide at all (skip).

use crate::db::{
    AppointmentRepository, CustomerRepository, LabelRepository, ServiceRepository,
    TeamMemberRepository,
};
use crate::error::Result;
use crate::models::{
    Appointment, AppointmentRecord, CustomLabel, CustomLabelRecord, Customer, CustomerRecord,
    Service, ServiceRecord, TeamMember, TeamMemberRecord,
};

use super::SkipReason;

/// Outcome of key resolution for one incoming record
#[derive(Debug)]
pub enum Resolution<T> {
    /// A stored row matched; the record is an update
    Existing(T),
    /// No match; the record is an insert
    New,
    /// The record lacks its identity fields and is dropped
    Skip(SkipReason),
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Customers are keyed by email
pub fn customer(
    repo: &impl CustomerRepository,
    record: &CustomerRecord,
) -> Result<Resolution<Customer>> {
    let Some(email) = non_empty(record.email.as_deref()) else {
        return Ok(Resolution::Skip(SkipReason::MissingEmail));
    };

    Ok(repo
        .find_by_email(email)?
        .map_or(Resolution::New, Resolution::Existing))
}

/// Services are keyed by id when supplied, falling back to name
///
/// An id match takes precedence over any name match. A record with
/// neither a matching id nor a name cannot be inserted and is skipped.
pub fn service(
    repo: &impl ServiceRepository,
    record: &ServiceRecord,
) -> Result<Resolution<Service>> {
    if let Some(id) = record.id {
        if let Some(existing) = repo.find_by_id(id)? {
            return Ok(Resolution::Existing(existing));
        }
    }

    let Some(name) = non_empty(record.name.as_deref()) else {
        return Ok(Resolution::Skip(SkipReason::MissingName));
    };

    Ok(repo
        .find_by_name(name)?
        .map_or(Resolution::New, Resolution::Existing))
}

/// Team members are keyed by email
pub fn team_member(
    repo: &impl TeamMemberRepository,
    record: &TeamMemberRecord,
) -> Result<Resolution<TeamMember>> {
    let Some(email) = non_empty(record.email.as_deref()) else {
        return Ok(Resolution::Skip(SkipReason::MissingEmail));
    };

    Ok(repo
        .find_by_email(email)?
        .map_or(Resolution::New, Resolution::Existing))
}

/// Custom labels are keyed by the `(label_type, label_value)` pair
pub fn label(
    repo: &impl LabelRepository,
    record: &CustomLabelRecord,
) -> Result<Resolution<CustomLabel>> {
    let (Some(label_type), Some(label_value)) = (
        non_empty(record.label_type.as_deref()),
        non_empty(record.label_value.as_deref()),
    ) else {
        return Ok(Resolution::Skip(SkipReason::MissingLabelKey));
    };

    Ok(repo
        .find_by_key(label_type, label_value)?
        .map_or(Resolution::New, Resolution::Existing))
}

/// Appointments are keyed by id when supplied, falling back to the
/// `(customer_id, date, time, service_id-or-null)` slot
///
/// The customer reference must already be resolved; date and time are
/// validated by the caller before resolution runs.
pub fn appointment(
    repo: &impl AppointmentRepository,
    record: &AppointmentRecord,
    customer_id: i64,
    date: &str,
    time: &str,
) -> Result<Resolution<Appointment>> {
    if let Some(id) = record.id {
        if let Some(existing) = repo.find_by_id(id)? {
            return Ok(Resolution::Existing(existing));
        }
    }

    Ok(repo
        .find_by_slot(customer_id, date, time, record.service_id)?
        .map_or(Resolution::New, Resolution::Existing))
}
