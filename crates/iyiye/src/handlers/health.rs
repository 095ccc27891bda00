//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Registry stats (operation count, registered data sources)

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Registry stats.
///
/// The registry is immutable after startup, so a healthy process always
/// reports the same numbers; a mismatch against the deployed catalog
/// points at a configuration problem.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let registry = state.engine.registry();
    let mut data_sources: Vec<&str> = registry.data_source_names().collect();
    data_sources.sort_unstable();

    Json(json!({
        "status": "ok",
        "operations": registry.len(),
        "dataSources": data_sources,
    }))
}
