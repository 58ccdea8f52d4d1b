//! HTTP endpoint handlers. These are thin wrappers that forward to the import flow and settings.
//! Each handler is instrumented; failures come back as `{ "message": ... }` with a matching status.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{field, info, instrument, warn, Span};

use crate::config::{ConfigError, Settings, SettingsPatch};
use crate::import::ImportError;
use crate::leetcode::FetchError;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(url = field::Empty))]
pub async fn http_post_import(
  State(state): State<Arc<AppState>>,
  body: Result<Json<ImportIn>, JsonRejection>,
) -> Result<Json<ImportOut>, Response> {
  let Json(body) = body.map_err(reject_body)?;
  Span::current().record("url", field::display(&body.url));
  let outcome = state.import(&body.url).await.map_err(IntoResponse::into_response)?;
  info!(target: "import", filename = %outcome.filename, "HTTP import served");
  Ok(Json(to_out(&outcome)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
  Json(state.settings_snapshot().await)
}

#[instrument(level = "info", skip(state, patch))]
pub async fn http_put_settings(
  State(state): State<Arc<AppState>>,
  patch: Result<Json<SettingsPatch>, JsonRejection>,
) -> Result<Json<Settings>, Response> {
  let Json(patch) = patch.map_err(reject_body)?;
  let settings = state.update_settings(patch).await.map_err(IntoResponse::into_response)?;
  Ok(Json(settings))
}

/// Unreadable request bodies get the same `{ "message" }` shape as other failures.
fn reject_body(rejection: JsonRejection) -> Response {
  warn!(target: "leetnote", error = %rejection.body_text(), "Rejected request body");
  error_response(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", rejection.body_text()))
}

fn error_response(status: StatusCode, message: String) -> Response {
  (status, Json(ErrorOut { message })).into_response()
}

impl IntoResponse for ImportError {
  fn into_response(self) -> Response {
    let status = match &self {
      ImportError::EmptyUrl | ImportError::InvalidUrl => StatusCode::BAD_REQUEST,
      ImportError::Fetch(FetchError::NotFound) => StatusCode::NOT_FOUND,
      ImportError::Fetch(_) => StatusCode::BAD_GATEWAY,
      ImportError::AlreadyExists(_) => StatusCode::CONFLICT,
      ImportError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, self.to_string())
  }
}

impl IntoResponse for ConfigError {
  fn into_response(self) -> Response {
    tracing::error!(target: "leetnote", error = %self, "Settings update failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to save settings: {}", self))
  }
}
