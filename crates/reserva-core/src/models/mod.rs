//! Data models for Reserva

mod appointment;
mod custom_label;
mod customer;
mod service;
mod team_member;

pub use appointment::{Appointment, AppointmentRecord, NewAppointment};
pub use custom_label::{CustomLabel, CustomLabelRecord, NewCustomLabel};
pub use customer::{Customer, CustomerRecord, NewCustomer};
pub use service::{NewService, Service, ServiceRecord};
pub use team_member::{NewTeamMember, TeamMember, TeamMemberRecord};
