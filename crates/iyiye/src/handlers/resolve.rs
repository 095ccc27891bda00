//! The resolve endpoint: one POST per operation invocation.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use iyiye_core::resolver::Invocation;

use crate::{error::ResolveFailure, state::AppState};

/// POST /resolve - Resolve one operation invocation.
///
/// The body is the invocation envelope (`typeName`, `fieldName`,
/// `arguments`, optional `source` and `identity`); the response wraps the
/// shaped payload as `{"data": ...}`. A data-level not-found comes back as
/// `{"data": null}` with status 200; structured failures map to their HTTP
/// status via the core error mapping.
#[axum::debug_handler]
pub async fn resolve_operation(
    State(state): State<AppState>,
    Json(invocation): Json<Invocation>,
) -> Result<Json<Value>, ResolveFailure> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "resolve",
        %request_id,
        operation = %invocation.operation_key(),
    );

    let data = state.engine.resolve(invocation).instrument(span).await?;

    Ok(Json(json!({ "data": data })))
}
