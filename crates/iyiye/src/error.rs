use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use iyiye_core::resolver::{resolve_error_to_status_code, ResolveError};

/// Response wrapper for resolve failures.
///
/// Lets handlers use `?` on `Result<_, ResolveError>` while keeping the
/// error classification machine-readable: the body carries a stable
/// `errorType` so callers can tell an unregistered operation apart from a
/// data-level not-found (which is a `200` with `null` data).
pub struct ResolveFailure(ResolveError);

impl From<ResolveError> for ResolveFailure {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ResolveFailure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(resolve_error_to_status_code(&self.0))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "resolver failure");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }

        let mut body = json!({
            "errorType": self.0.error_type(),
            "message": self.0.to_string(),
        });
        if let ResolveError::Execution(e) = &self.0 {
            body["statementIndex"] = json!(e.statement_index);
        }

        (status, Json(body)).into_response()
    }
}
