//! Service model

use serde::{Deserialize, Serialize};

/// Category used when an incoming service does not name one
pub const DEFAULT_CATEGORY: &str = "other";

/// A stored service row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub org_id: String,
    pub name: String,
    pub description: String,
    /// Duration in minutes; 0 means "not specified"
    pub duration: i64,
    pub price: f64,
    pub category: String,
    pub is_enabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Field values for a service insert
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub duration: i64,
    pub price: f64,
    pub category: String,
    pub is_enabled: bool,
}

impl NewService {
    /// Create an insert payload with the given name and defaults elsewhere
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            duration: 0,
            price: 0.0,
            category: DEFAULT_CATEGORY.to_string(),
            is_enabled: true,
        }
    }
}

/// An incoming service record from a sync batch
///
/// An `id` takes precedence over `name` when matching stored rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_service_defaults() {
        let new = NewService::with_name("Consult");
        assert_eq!(new.category, DEFAULT_CATEGORY);
        assert_eq!(new.duration, 0);
        assert!(new.is_enabled);
    }
}
