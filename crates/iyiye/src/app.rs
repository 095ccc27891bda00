use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{healthz, livez},
        resolve::resolve_operation,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// The request timeout is applied outside the resolver: a timed-out batch
/// is reported to the caller as an unknown outcome, not as a rollback.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/resolve", post(resolve_operation))
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn resolve_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/resolve")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_registry() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], json!("ok"));
        assert_eq!(json["operations"], json!(7));
        assert_eq!(
            json["dataSources"],
            json!(["kitstore", "notifdb", "userfn"])
        );
    }

    #[tokio::test]
    async fn test_resolve_list_with_empty_backend() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(resolve_request(json!({
                "typeName": "Query",
                "fieldName": "inAppNotificationList",
                "arguments": {"username": "alice"}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_resolve_single_row_with_empty_backend_is_null() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(resolve_request(json!({
                "typeName": "Query",
                "fieldName": "inAppNotification",
                "arguments": {"id": 1}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({"data": null}));
    }

    #[tokio::test]
    async fn test_unregistered_operation_is_404_with_error_type() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(resolve_request(json!({
                "typeName": "Query",
                "fieldName": "doesNotExist"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["errorType"], json!("ResolverNotFoundError"));
    }

    #[tokio::test]
    async fn test_missing_required_argument_is_400() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(resolve_request(json!({
                "typeName": "Query",
                "fieldName": "inAppNotificationList",
                "arguments": {}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["errorType"], json!("TemplateResolutionError"));
        assert!(json["message"].as_str().unwrap().contains("USERNAME"));
    }
}
