use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{CustomerRepository, SqliteCustomerRepository};
use reserva_core::models::{Customer, CustomerRecord, NewCustomer};

use super::{AppState, OkResponse, Pagination};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let db = state.database()?;
    let repo = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.list(page.limit, page.offset)?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let db = state.database()?;
    let repo = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    let customer = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(customer))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CustomerRecord>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let email = body
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::bad_request("email is required"))?;

    let db = state.database()?;
    let repo = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    if repo.find_by_email(&email)?.is_some() {
        return Err(AppError::bad_request(format!(
            "customer with email {email} already exists"
        )));
    }

    let mut new = NewCustomer::with_email(email);
    new.name = body.name.unwrap_or_default();
    new.phone = body.phone.unwrap_or_default();
    new.notes = body.notes.unwrap_or_default();
    new.total_bookings = body.total_bookings.unwrap_or(0);
    new.last_appointment = body.last_appointment;

    let customer = repo.insert(&new)?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerRecord>,
) -> Result<Json<Customer>, AppError> {
    let db = state.database()?;
    let repo = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    let mut customer = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    // Admin edits are direct overwrites of the provided fields; only
    // the sync path carries the keep-on-falsy merge rule.
    if let Some(name) = body.name {
        customer.name = name;
    }
    if let Some(email) = body.email.filter(|email| !email.is_empty()) {
        customer.email = email;
    }
    if let Some(phone) = body.phone {
        customer.phone = phone;
    }
    if let Some(notes) = body.notes {
        customer.notes = notes;
    }
    if let Some(total_bookings) = body.total_bookings {
        customer.total_bookings = total_bookings;
    }
    if let Some(last_appointment) = body.last_appointment {
        customer.last_appointment = Some(last_appointment);
    }

    repo.update(&customer)?;
    Ok(Json(customer))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    repo.delete(id)?;
    Ok(Json(OkResponse::OK))
}
