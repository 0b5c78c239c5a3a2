use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use reserva_core::db::{
    AppointmentRepository, CustomerRepository, SqliteAppointmentRepository,
    SqliteCustomerRepository,
};
use reserva_core::models::{Appointment, AppointmentRecord, NewAppointment};

use super::{AppState, OkResponse, Pagination};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let db = state.database()?;
    let repo = SqliteAppointmentRepository::new(db.connection(), &state.config.org_id);
    Ok(Json(repo.list(page.limit, page.offset)?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let db = state.database()?;
    let repo = SqliteAppointmentRepository::new(db.connection(), &state.config.org_id);
    let appointment = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
    Ok(Json(appointment))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<AppointmentRecord>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    // The admin console supplies explicit references; only the sync
    // path resolves customers from embedded contact fields.
    let customer_id = body
        .customer_id
        .ok_or_else(|| AppError::bad_request("customer_id is required"))?;
    let (Some(date), Some(time)) = (
        body.date.filter(|date| !date.is_empty()),
        body.time.filter(|time| !time.is_empty()),
    ) else {
        return Err(AppError::bad_request("date and time are required"));
    };

    let db = state.database()?;
    let customers = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
    if customers.find_by_id(customer_id)?.is_none() {
        return Err(AppError::bad_request(format!(
            "customer {customer_id} does not exist"
        )));
    }

    let mut new = NewAppointment::with_slot(customer_id, date, time);
    new.service_id = body.service_id;
    new.staff = body.staff.unwrap_or_default();
    if let Some(status) = body.status.filter(|status| !status.is_empty()) {
        new.status = status;
    }
    new.notes = body.notes.unwrap_or_default();
    new.meeting_platform = body.meeting_platform.unwrap_or_default();
    new.meeting_link = body.meeting_link.unwrap_or_default();

    let repo = SqliteAppointmentRepository::new(db.connection(), &state.config.org_id);
    let appointment = repo.insert(&new)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AppointmentRecord>,
) -> Result<Json<Appointment>, AppError> {
    let db = state.database()?;
    let repo = SqliteAppointmentRepository::new(db.connection(), &state.config.org_id);
    let mut appointment = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;

    if let Some(customer_id) = body.customer_id {
        let customers = SqliteCustomerRepository::new(db.connection(), &state.config.org_id);
        if customers.find_by_id(customer_id)?.is_none() {
            return Err(AppError::bad_request(format!(
                "customer {customer_id} does not exist"
            )));
        }
        appointment.customer_id = customer_id;
    }
    if let Some(service_id) = body.service_id {
        appointment.service_id = Some(service_id);
    }
    if let Some(staff) = body.staff {
        appointment.staff = staff;
    }
    if let Some(date) = body.date.filter(|date| !date.is_empty()) {
        appointment.date = date;
    }
    if let Some(time) = body.time.filter(|time| !time.is_empty()) {
        appointment.time = time;
    }
    if let Some(status) = body.status.filter(|status| !status.is_empty()) {
        appointment.status = status;
    }
    if let Some(notes) = body.notes {
        appointment.notes = notes;
    }
    if let Some(meeting_platform) = body.meeting_platform {
        appointment.meeting_platform = meeting_platform;
    }
    if let Some(meeting_link) = body.meeting_link {
        appointment.meeting_link = meeting_link;
    }

    repo.update(&appointment)?;
    Ok(Json(appointment))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    let db = state.database()?;
    let repo = SqliteAppointmentRepository::new(db.connection(), &state.config.org_id);
    repo.delete(id)?;
    Ok(Json(OkResponse::OK))
}
