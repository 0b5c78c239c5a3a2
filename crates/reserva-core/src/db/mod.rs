//! Database layer for Reserva

mod appointments;
mod connection;
mod customers;
mod labels;
mod migrations;
mod services;
mod settings;
mod team_members;

pub use appointments::{AppointmentRepository, SqliteAppointmentRepository};
pub use connection::Database;
pub use customers::{CustomerRepository, SqliteCustomerRepository};
pub use labels::{LabelRepository, SqliteLabelRepository};
pub use services::{ServiceRepository, SqliteServiceRepository};
pub use settings::{SettingsRepository, SqliteSettingsRepository};
pub use team_members::{SqliteTeamMemberRepository, TeamMemberRepository};

/// Current time as Unix milliseconds
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
