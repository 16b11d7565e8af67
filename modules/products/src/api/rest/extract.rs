//! Body and principal extractors that reject with problem documents.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts, StatusCode},
    Json,
};
use http_problem::{Problem, ProblemResponse};
use serde::de::DeserializeOwned;

use crate::api::rest::RestContext;

pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// `Json<T>` whose rejections are problem documents.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(Self(v)),
            Err(rej) => {
                let status = match rej.status() {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };
                Err(malformed(status, rej.body_text(), instance))
            }
        }
    }
}

/// Body of a `PATCH` sent as `application/merge-patch+json` (RFC 7396).
/// Any other content type is rejected with 415.
pub struct MergePatch<T>(pub T);

impl<T, S> FromRequest<S> for MergePatch<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !is_merge_patch(content_type) {
            let mut resp = http_problem::unsupported_media_type(format!(
                "Expected Content-Type {MERGE_PATCH_JSON}"
            ));
            resp.problem.instance = instance;
            return Err(resp);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| malformed(StatusCode::BAD_REQUEST, e.body_text(), instance.clone()))?;
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| malformed(StatusCode::BAD_REQUEST, e.to_string(), instance))
    }
}

fn is_merge_patch(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(MERGE_PATCH_JSON))
}

fn malformed(status: StatusCode, detail: String, instance: String) -> ProblemResponse {
    let title = status.canonical_reason().unwrap_or("Bad Request");
    Problem::new(status, title, detail)
        .with_code("malformed")
        .with_instance(instance)
        .into()
}

/// Login of the authenticated principal, read from the gateway header
/// configured in `RestContext`. Missing or blank header is a 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthenticated = |instance: &str| {
            let mut resp = http_problem::unauthorized("Full authentication is required");
            resp.problem.instance = instance.to_owned();
            resp
        };

        let Some(ctx) = parts.extensions.get::<RestContext>() else {
            tracing::error!("RestContext extension missing; principal cannot be resolved");
            return Err(unauthenticated(parts.uri.path()));
        };

        parts
            .headers
            .get(ctx.principal_header())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .map(|login| Self(login.to_owned()))
            .ok_or_else(|| unauthenticated(parts.uri.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_patch_content_type_matching() {
        assert!(is_merge_patch("application/merge-patch+json"));
        assert!(is_merge_patch("application/merge-patch+json; charset=utf-8"));
        assert!(!is_merge_patch("application/json"));
        assert!(!is_merge_patch(""));
    }
}
