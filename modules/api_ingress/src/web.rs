use axum::{
    extract::Extension,
    http::Uri,
    response::{Html, Json},
};
use http_problem::ProblemResponse;
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn serve_openapi(
    Extension(doc): Extension<Arc<utoipa::openapi::OpenApi>>,
) -> Json<utoipa::openapi::OpenApi> {
    Json((*doc).clone())
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Fridgy Products API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}

/// Unknown routes answer with a problem document instead of an empty 404.
pub async fn fallback(uri: Uri) -> ProblemResponse {
    let mut resp = http_problem::not_found(format!("No route for {}", uri.path()));
    resp.problem.instance = uri.path().to_string();
    resp
}
