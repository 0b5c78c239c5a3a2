//! reserva-core - Core library for Reserva
//!
//! This crate contains the shared models, database layer, and the sync
//! reconciliation engine used by the API server and the CLI.

pub mod db;
pub mod error;
pub mod models;
pub mod sync;

pub use error::{Error, Result};
pub use sync::{SyncBatch, SyncEngine, SyncOptions, SyncSummary};
