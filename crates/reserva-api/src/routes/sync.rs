use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use reserva_core::{SyncBatch, SyncEngine, SyncOptions, SyncSummary};

use super::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct SyncResponse {
    ok: bool,
    summary: SyncSummary,
}

/// Reconcile a client-submitted batch against stored state
///
/// The whole batch succeeds or fails as one response; skipped records
/// are not errors and do not appear on the wire.
pub(crate) async fn run_sync(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(batch): Json<SyncBatch>,
) -> Result<Json<SyncResponse>, AppError> {
    let db = state.database()?;
    let engine = SyncEngine::new(db.connection(), &state.config.org_id).with_options(SyncOptions {
        transactional: state.config.sync_transactional,
    });

    let summary = engine
        .run(&batch)
        .map_err(|error| AppError::SyncFailed(error.to_string()))?;

    tracing::info!(
        user = %user.user_id,
        customers = batch.customers.len(),
        services = batch.services.len(),
        team_members = batch.team_members.len(),
        custom_labels = batch.custom_labels.len(),
        appointments = batch.appointments.len(),
        "Sync batch reconciled"
    );

    Ok(Json(SyncResponse { ok: true, summary }))
}
