use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{LabelRepository, SqliteLabelRepository};
use reserva_core::models::{CustomLabel, CustomLabelRecord, NewCustomLabel};

use super::{AppState, OkResponse, Pagination};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<CustomLabel>>, AppError> {
    let db = state.database()?;
    let repo = SqliteLabelRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.list(page.limit, page.offset)?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomLabel>, AppError> {
    let db = state.database()?;
    let repo = SqliteLabelRepository::new(db.connection(), &state.config.org_id);
    let label = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("label {id}")))?;
    Ok(Json(label))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CustomLabelRecord>,
) -> Result<(StatusCode, Json<CustomLabel>), AppError> {
    let (Some(label_type), Some(label_value)) = (
        body.label_type.filter(|value| !value.is_empty()),
        body.label_value.filter(|value| !value.is_empty()),
    ) else {
        return Err(AppError::bad_request(
            "label_type and label_value are required",
        ));
    };

    let db = state.database()?;
    let repo = SqliteLabelRepository::new(db.connection(), &state.config.org_id);
    if repo.find_by_key(&label_type, &label_value)?.is_some() {
        return Err(AppError::bad_request(format!(
            "label ({label_type}, {label_value}) already exists"
        )));
    }

    let label = repo.insert(&NewCustomLabel {
        label_type,
        label_value,
        description: body.description.unwrap_or_default(),
    })?;
    Ok((StatusCode::CREATED, Json(label)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CustomLabelRecord>,
) -> Result<Json<CustomLabel>, AppError> {
    let db = state.database()?;
    let repo = SqliteLabelRepository::new(db.connection(), &state.config.org_id);
    let mut label = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("label {id}")))?;

    // The composite key is immutable; only the description can change
    if let Some(description) = body.description {
        repo.update_description(id, &description)?;
        label.description = description;
    }

    Ok(Json(label))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteLabelRepository::new(db.connection(), &state.config.org_id);
    repo.delete(id)?;
    Ok(Json(OkResponse::OK))
}
