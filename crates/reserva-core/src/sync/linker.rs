//! Cross-entity linking for appointment records
//!
//! An appointment may reference its customer by id or by embedded
//! contact fields. The link is resolved BEFORE the appointment upsert
//! runs, so that customer creation is an explicit, separately testable
//! step rather than a side effect buried in a lookup.

use crate::db::CustomerRepository;
use crate::error::Result;
use crate::models::{AppointmentRecord, NewCustomer};

/// A customer reference carried by an incoming appointment record
#[derive(Debug, Clone, Copy)]
pub struct CustomerRef<'a> {
    pub customer_id: Option<i64>,
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl<'a> CustomerRef<'a> {
    /// Extract the customer reference from an appointment record
    #[must_use]
    pub fn from_record(record: &'a AppointmentRecord) -> Self {
        Self {
            customer_id: record.customer_id,
            email: record.customer_email.as_deref(),
            name: record.customer_name.as_deref(),
            phone: record.customer_phone.as_deref(),
            notes: record.customer_notes.as_deref(),
        }
    }
}

/// A resolved customer link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerLink {
    /// The reference matched a stored customer
    Existing(i64),
    /// A customer was created from the embedded contact fields
    Created(i64),
}

impl CustomerLink {
    /// The linked customer id, however it was obtained
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }
}

/// Resolve a customer reference, creating a customer when needed
///
/// Resolution order, first success wins:
/// 1. `customer_id`, when a customer with that id exists
/// 2. `customer_email`, when a customer with that email exists
/// 3. create a new customer from the embedded fields (email required)
///
/// `None` means the reference is unresolvable; the caller drops the
/// appointment without raising an error.
pub fn resolve_or_create_customer(
    repo: &impl CustomerRepository,
    reference: &CustomerRef<'_>,
) -> Result<Option<CustomerLink>> {
    if let Some(id) = reference.customer_id {
        if repo.find_by_id(id)?.is_some() {
            return Ok(Some(CustomerLink::Existing(id)));
        }
    }

    let Some(email) = reference.email.filter(|email| !email.is_empty()) else {
        return Ok(None);
    };

    if let Some(existing) = repo.find_by_email(email)? {
        return Ok(Some(CustomerLink::Existing(existing.id)));
    }

    let mut new = NewCustomer::with_email(email);
    new.name = reference.name.unwrap_or_default().to_string();
    new.phone = reference.phone.unwrap_or_default().to_string();
    new.notes = reference.notes.unwrap_or_default().to_string();
    let created = repo.insert(&new)?;

    Ok(Some(CustomerLink::Created(created.id)))
}
