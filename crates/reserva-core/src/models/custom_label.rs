//! Custom label model

use serde::{Deserialize, Serialize};

/// A stored custom label row
///
/// Labels are identified by the `(label_type, label_value)` pair within
/// an organization; only the description is mutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLabel {
    pub id: i64,
    pub org_id: String,
    pub label_type: String,
    pub label_value: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Field values for a custom label insert
#[derive(Debug, Clone)]
pub struct NewCustomLabel {
    pub label_type: String,
    pub label_value: String,
    pub description: String,
}

/// An incoming custom label record from a sync batch
///
/// Records missing either half of the composite key are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomLabelRecord {
    pub label_type: Option<String>,
    pub label_value: Option<String>,
    pub description: Option<String>,
}
