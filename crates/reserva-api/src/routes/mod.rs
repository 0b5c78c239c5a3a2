mod appointments;
mod customers;
mod labels;
mod services;
mod settings;
mod sync;
mod team_members;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, TokenVerifier};
use crate::config::AppConfig;
use crate::error::AppError;
use reserva_core::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    verifier: Arc<TokenVerifier>,
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, database: Database) -> Self {
        Self {
            verifier: Arc::new(TokenVerifier::new(&config.jwt_secret)),
            db: Arc::new(Mutex::new(database)),
            config,
        }
    }

    /// Lock the shared database for the duration of one handler
    pub(crate) fn database(&self) -> Result<MutexGuard<'_, Database>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::internal("database lock poisoned"))
    }
}

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/sync", post(sync::run_sync))
        .route(
            "/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/customers/{id}",
            get(customers::get_one)
                .put(customers::update)
                .delete(customers::remove),
        )
        .route("/services", get(services::list).post(services::create))
        .route(
            "/services/{id}",
            get(services::get_one)
                .put(services::update)
                .delete(services::remove),
        )
        .route(
            "/team-members",
            get(team_members::list).post(team_members::create),
        )
        .route(
            "/team-members/{id}",
            get(team_members::get_one)
                .put(team_members::update)
                .delete(team_members::remove),
        )
        .route("/labels", get(labels::list).post(labels::create))
        .route(
            "/labels/{id}",
            get(labels::get_one)
                .put(labels::update)
                .delete(labels::remove),
        )
        .route(
            "/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get_one)
                .put(appointments::update)
                .delete(appointments::remove),
        )
        .route(
            "/settings",
            get(settings::load).put(settings::bulk_update),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = state.verifier.verify(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Shared list pagination query
#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

const fn default_limit() -> usize {
    50
}

/// Body for plain acknowledgement responses
#[derive(Debug, Serialize)]
pub(crate) struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub(crate) const OK: Self = Self { ok: true };
}
