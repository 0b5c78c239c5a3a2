//! Team member model

use serde::{Deserialize, Serialize};

/// A stored team member row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub org_id: String,
    pub name: String,
    /// Identity key, unique per organization
    pub email: String,
    pub role: String,
    /// Avatar reference (URL or asset key)
    pub avatar: String,
    /// Color tag used by the admin console
    pub color: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Field values for a team member insert
#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub color: String,
    pub is_active: bool,
}

impl NewTeamMember {
    /// Create an insert payload with the given email and defaults elsewhere
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            email: email.into(),
            role: String::new(),
            avatar: String::new(),
            color: String::new(),
            is_active: true,
        }
    }
}

/// An incoming team member record from a sync batch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMemberRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub avatar: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}
