#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use tower::ServiceExt;

use products::config::ProductsConfig;
use products::domain::service::Services;
use products::ProductsModule;

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    ProductsModule::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_module() -> ProductsModule {
    let db = create_test_db().await;
    ProductsModule::new(db, &ProductsConfig::default()).expect("module init")
}

pub async fn create_test_services() -> Services {
    create_test_module().await.services().clone()
}

/// Module routes behind the real ingress middleware stack.
pub async fn create_test_app() -> (Router, Services) {
    let module = create_test_module().await;
    let ingress = api_ingress::ApiIngress::new(api_ingress::ApiIngressConfig::default());
    let router = ingress.build_router(module.register_rest(Router::new()));
    (router, module.services().clone())
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn merge_patch_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/merge-patch+json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn header<'a>(resp: &'a Response<Body>, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}
