use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower::util::ServiceExt;

use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig};

fn test_app() -> Router {
    let api = Router::new()
        .route("/test", get(echo_handler))
        .route("/error", get(error_handler));
    ApiIngress::new(ApiIngressConfig::default()).build_router(api)
}

async fn echo_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "request_id": request_id}))
}

async fn error_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Test error", "request_id": request_id})),
    )
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = test_app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["request_id"], header.as_str());
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/error")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    let json = body_json(response).await;
    assert_eq!(json["request_id"], "abc-123");
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_problem_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "notfound");
    assert_eq!(json["instance"], "/api/nothing-here");
}

#[tokio::test]
async fn openapi_is_hidden_unless_enabled() {
    let doc = utoipa::openapi::OpenApiBuilder::new().build();

    let hidden = ApiIngress::new(ApiIngressConfig::default())
        .with_openapi(doc.clone())
        .build_router(Router::new());
    let response = hidden
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let cfg = ApiIngressConfig {
        enable_docs: true,
        ..Default::default()
    };
    let shown = ApiIngress::new(cfg).with_openapi(doc).build_router(Router::new());
    let response = shown
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["openapi"].is_string());
}
