//! Appointment model

use serde::{Deserialize, Serialize};

/// Status used when an incoming appointment does not name one
///
/// Status is an open string on the wire (`upcoming`, `completed`,
/// `cancelled` by convention), not a strict enum.
pub const DEFAULT_STATUS: &str = "upcoming";

/// A stored appointment row
///
/// Always references a concrete customer; the service reference is
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub org_id: String,
    pub customer_id: i64,
    pub service_id: Option<i64>,
    /// Staff label (free text, not a team member reference)
    pub staff: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub notes: String,
    pub meeting_platform: String,
    pub meeting_link: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Field values for an appointment insert
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub customer_id: i64,
    pub service_id: Option<i64>,
    pub staff: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub notes: String,
    pub meeting_platform: String,
    pub meeting_link: String,
}

impl NewAppointment {
    /// Create an insert payload for the given slot, defaults elsewhere
    #[must_use]
    pub fn with_slot(customer_id: i64, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            customer_id,
            service_id: None,
            staff: String::new(),
            date: date.into(),
            time: time.into(),
            status: DEFAULT_STATUS.to_string(),
            notes: String::new(),
            meeting_platform: String::new(),
            meeting_link: String::new(),
        }
    }
}

/// An incoming appointment record from a sync batch
///
/// The customer may be referenced by id or by embedded contact fields;
/// the engine resolves that reference before any appointment write.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentRecord {
    pub id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_notes: Option<String>,
    pub service_id: Option<i64>,
    pub staff: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub meeting_platform: Option<String>,
    pub meeting_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_appointment_defaults() {
        let new = NewAppointment::with_slot(7, "2025-01-01", "10:00");
        assert_eq!(new.customer_id, 7);
        assert_eq!(new.status, DEFAULT_STATUS);
        assert!(new.service_id.is_none());
    }
}
