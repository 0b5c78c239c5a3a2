use std::collections::HashMap;

use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{SettingsRepository, SqliteSettingsRepository};

use super::{AppState, OkResponse};

pub(crate) async fn load(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, String>>, AppError> {
    let db = state.database()?;
    let repo = SqliteSettingsRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.load()?))
}

/// Replace the submitted settings in one transaction
pub(crate) async fn bulk_update(
    State(state): State<AppState>,
    Json(values): Json<HashMap<String, String>>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteSettingsRepository::new(db.connection(), &state.config.org_id);
    repo.bulk_update(&values)?;
    Ok(Json(OkResponse::OK))
}
