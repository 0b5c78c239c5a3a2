use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{SqliteTeamMemberRepository, TeamMemberRepository};
use reserva_core::models::{NewTeamMember, TeamMember, TeamMemberRecord};

use super::{AppState, OkResponse, Pagination};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    let db = state.database()?;
    let repo = SqliteTeamMemberRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.list(page.limit, page.offset)?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamMember>, AppError> {
    let db = state.database()?;
    let repo = SqliteTeamMemberRepository::new(db.connection(), &state.config.org_id);
    let member = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("team member {id}")))?;
    Ok(Json(member))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<TeamMemberRecord>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    let email = body
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::bad_request("email is required"))?;

    let db = state.database()?;
    let repo = SqliteTeamMemberRepository::new(db.connection(), &state.config.org_id);
    if repo.find_by_email(&email)?.is_some() {
        return Err(AppError::bad_request(format!(
            "team member with email {email} already exists"
        )));
    }

    let mut new = NewTeamMember::with_email(email);
    new.name = body.name.unwrap_or_default();
    new.role = body.role.unwrap_or_default();
    new.avatar = body.avatar.unwrap_or_default();
    new.color = body.color.unwrap_or_default();
    new.is_active = body.is_active.unwrap_or(true);

    let member = repo.insert(&new)?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TeamMemberRecord>,
) -> Result<Json<TeamMember>, AppError> {
    let db = state.database()?;
    let repo = SqliteTeamMemberRepository::new(db.connection(), &state.config.org_id);
    let mut member = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("team member {id}")))?;

    if let Some(name) = body.name {
        member.name = name;
    }
    if let Some(email) = body.email.filter(|email| !email.is_empty()) {
        member.email = email;
    }
    if let Some(role) = body.role {
        member.role = role;
    }
    if let Some(avatar) = body.avatar {
        member.avatar = avatar;
    }
    if let Some(color) = body.color {
        member.color = color;
    }
    if let Some(is_active) = body.is_active {
        member.is_active = is_active;
    }

    repo.update(&member)?;
    Ok(Json(member))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteTeamMemberRepository::new(db.connection(), &state.config.org_id);
    repo.delete(id)?;
    Ok(Json(OkResponse::OK))
}
