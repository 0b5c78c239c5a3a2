use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{ServiceRepository, SqliteServiceRepository};
use reserva_core::models::{NewService, Service, ServiceRecord};

use super::{AppState, OkResponse, Pagination};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.database()?;
    let repo = SqliteServiceRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.list(page.limit, page.offset)?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, AppError> {
    let db = state.database()?;
    let repo = SqliteServiceRepository::new(db.connection(), &state.config.org_id);
    let service = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;
    Ok(Json(service))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<ServiceRecord>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let name = body
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::bad_request("name is required"))?;

    let db = state.database()?;
    let repo = SqliteServiceRepository::new(db.connection(), &state.config.org_id);

    let mut new = NewService::with_name(name);
    new.description = body.description.unwrap_or_default();
    new.duration = body.duration.unwrap_or(0);
    new.price = body.price.unwrap_or(0.0);
    if let Some(category) = body.category.filter(|category| !category.is_empty()) {
        new.category = category;
    }
    new.is_enabled = body.is_enabled.unwrap_or(true);

    let service = repo.insert(&new)?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ServiceRecord>,
) -> Result<Json<Service>, AppError> {
    let db = state.database()?;
    let repo = SqliteServiceRepository::new(db.connection(), &state.config.org_id);
    let mut service = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    if let Some(name) = body.name.filter(|name| !name.is_empty()) {
        service.name = name;
    }
    if let Some(description) = body.description {
        service.description = description;
    }
    if let Some(duration) = body.duration {
        service.duration = duration;
    }
    if let Some(price) = body.price {
        service.price = price;
    }
    if let Some(category) = body.category.filter(|category| !category.is_empty()) {
        service.category = category;
    }
    if let Some(is_enabled) = body.is_enabled {
        service.is_enabled = is_enabled;
    }

    repo.update(&service)?;
    Ok(Json(service))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteServiceRepository::new(db.connection(), &state.config.org_id);
    repo.delete(id)?;
    Ok(Json(OkResponse::OK))
}
