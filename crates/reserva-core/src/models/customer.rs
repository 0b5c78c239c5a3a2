//! Customer model

use serde::{Deserialize, Serialize};

/// A stored customer row
///
/// Customers are identified by email within an organization; the numeric
/// id is a storage surrogate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Surrogate id (auto-increment)
    pub id: i64,
    /// Owning organization
    pub org_id: String,
    /// Display name
    pub name: String,
    /// Identity key, unique per organization
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Free-text notes
    pub notes: String,
    /// Booking counter maintained by callers
    pub total_bookings: i64,
    /// Date of the most recent appointment, if any
    pub last_appointment: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

/// Field values for a customer insert
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    pub total_bookings: i64,
    pub last_appointment: Option<String>,
}

impl NewCustomer {
    /// Create an insert payload with the given email and defaults elsewhere
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            email: email.into(),
            phone: String::new(),
            notes: String::new(),
            total_bookings: 0,
            last_appointment: None,
        }
    }
}

/// An incoming customer record from a sync batch
///
/// Every field is optional on the wire; a record without an email is
/// skipped by the engine rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub total_bookings: Option<i64>,
    pub last_appointment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_defaults() {
        let new = NewCustomer::with_email("a@b.com");
        assert_eq!(new.email, "a@b.com");
        assert_eq!(new.total_bookings, 0);
        assert!(new.last_appointment.is_none());
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let record: CustomerRecord = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(record.email.as_deref(), Some("a@b.com"));
        assert!(record.name.is_none());
        assert!(record.total_bookings.is_none());
    }
}
