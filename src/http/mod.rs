//! HTTP transport - maps REST requests onto a `UserService`.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health`: liveness, no token required.
//! - `GET /users`: list; query parameters (`firstname`, `age`, `active`, ...)
//!   become filters and are combined with AND.
//! - `GET /users/:id`, `POST /users`, `PUT /users/:id`, `PATCH /users/:id`,
//!   `DELETE /users/:id`.
//!
//! Every `/users` route requires `Authorization: Bearer <token>`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use user_records::{http, InMemoryStore, SystemClock, UserService};
//!
//! let service = Arc::new(UserService::new(InMemoryStore::new(), SystemClock));
//! let verifier = http::TokenVerifier::from_tokens(["s3cret"]);
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(service.clone(), verifier.clone());
//!
//! // Or serve directly
//! http::serve(service, verifier, "0.0.0.0:8080", std::future::pending()).await?;
//! ```

mod auth;
mod response;

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::clock::Clock;
use crate::error::ServiceError;
use crate::filter::Filter;
use crate::service::UserService;
use crate::store::UserStore;
use crate::user::{UserDraft, UserPatch};

pub use auth::{require_token, TokenVerifier};
pub use response::{
    status_code_name, Envelope, ErrorBody, HttpError, MSG_INTERNAL, MSG_INVALID_FIELDS,
    MSG_INVALID_ID, MSG_NOT_FOUND, MSG_UNAUTHORIZED,
};

/// Shared handler state. Clones share the service.
pub struct AppState<S, C> {
    service: Arc<UserService<S, C>>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Build an axum `Router` serving the user routes.
pub fn router<S, C>(service: Arc<UserService<S, C>>, verifier: TokenVerifier) -> Router
where
    S: UserStore + 'static,
    C: Clock + 'static,
{
    let state = AppState { service };
    let verifier = Arc::new(verifier);

    Router::new()
        .route("/users", get(list_users::<S, C>).post(create_user::<S, C>))
        .route(
            "/users/:id",
            get(get_user::<S, C>)
                .put(replace_user::<S, C>)
                .patch(update_user_fields::<S, C>)
                .delete(delete_user::<S, C>),
        )
        .route_layer(middleware::from_fn_with_state(verifier, require_token))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serve the user routes at `addr` until `shutdown` resolves.
pub async fn serve<S, C, F>(
    service: Arc<UserService<S, C>>,
    verifier: TokenVerifier,
    addr: &str,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    S: UserStore + 'static,
    C: Clock + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(service, verifier);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

fn parse_id(raw: &str) -> Result<u64, HttpError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(HttpError::InvalidId(raw.to_string())),
    }
}

fn decode_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| HttpError::InvalidBody(rejection.body_text()))
}

/// `GET /health`
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// `GET /users?field=value&...`
async fn list_users<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HttpError> {
    let filters = params
        .iter()
        .map(|(name, value)| Filter::parse(name, value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ServiceError::from)?;

    let users = state.service.list(&filters)?;
    Ok(Json(Envelope::new(users)))
}

/// `GET /users/:id`
async fn get_user<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let user = state.service.get(parse_id(&id)?)?;
    Ok(Json(Envelope::new(user)))
}

/// `POST /users`
async fn create_user<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    body: Result<Json<UserDraft>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let new = decode_body(body)?
        .validate()
        .map_err(ServiceError::from)?;
    let user = state.service.create(new)?;
    Ok((StatusCode::CREATED, Json(Envelope::new(user))))
}

/// `PUT /users/:id`
async fn replace_user<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    Path(id): Path<String>,
    body: Result<Json<UserDraft>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;
    let new = decode_body(body)?
        .validate()
        .map_err(ServiceError::from)?;
    let user = state.service.replace(id, new)?;
    Ok(Json(Envelope::new(user)))
}

/// `PATCH /users/:id` with `{"lastname"?, "age"?}`
async fn update_user_fields<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    Path(id): Path<String>,
    body: Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;
    let patch = decode_body(body)?;
    let user = state.service.update_fields(id, patch)?;
    Ok(Json(Envelope::new(user)))
}

/// `DELETE /users/:id`
async fn delete_user<S: UserStore, C: Clock>(
    State(state): State<AppState<S, C>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;
    state.service.delete(id)?;
    Ok(Json(Envelope::new(format!("user {} was deleted", id))))
}
