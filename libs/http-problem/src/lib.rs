//! RFC 9457 Problem Details for the HTTP surface.
//!
//! Handlers return `Result<_, ProblemResponse>`; the response wrapper renders
//! the problem body with `application/problem+json` and carries any extra
//! headers (entity alert headers) the caller attached.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Base for `type` URLs of problems raised by this service.
pub const PROBLEM_BASE_URL: &str = "https://fridgy.dev/problem";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// The request path this problem occurred on.
    pub instance: String,
    /// Machine-readable error key, e.g. `idexists`.
    pub code: String,
    /// Entity the failed operation addressed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// A single invalid field in a 400 problem.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[schema(title = "FieldError")]
pub struct FieldError {
    /// JSON Pointer to the invalid location (e.g., "/name").
    pub pointer: String,
    pub detail: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            entity_name: None,
            request_id: None,
            errors: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    /// Sets the error key and derives the `type` URL from it.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self.type_url = format!("{}/{}", PROBLEM_BASE_URL, self.code);
        self
    }

    pub fn with_entity_name(mut self, entity: impl Into<String>) -> Self {
        self.entity_name = Some(entity.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Static catalog entry: status, title and error key of a known problem.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: StatusCode,
    pub title: &'static str,
    pub code: &'static str,
}

impl ErrDef {
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status, self.title, detail).with_code(self.code)
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse {
    pub problem: Problem,
    pub headers: HeaderMap,
}

impl ProblemResponse {
    pub fn new(problem: Problem) -> Self {
        Self {
            problem,
            headers: HeaderMap::new(),
        }
    }

    /// Attach an extra response header; invalid values are dropped with a warning.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(_) => tracing::warn!(header = %name, "dropping non-ASCII header value"),
        }
        self
    }
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self::new(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status = self.problem.status_code();
        let mut resp = axum::Json(self.problem).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().extend(self.headers);
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

pub fn bad_request(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail).into()
}

pub fn unauthorized(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail)
        .with_code("unauthenticated")
        .into()
}

pub fn not_found(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", detail)
        .with_code("notfound")
        .into()
}

pub fn unsupported_media_type(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        "Unsupported Media Type",
        detail,
    )
    .with_code("unsupportedmediatype")
    .into()
}

pub fn internal_error(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        detail,
    )
    .with_code("internal")
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "invalid payload");
        let resp = ProblemResponse::new(p).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn code_drives_type_url() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "A new product cannot already have an ID")
            .with_code("idexists")
            .with_entity_name("productsProduct")
            .with_instance("/api/products");

        assert_eq!(p.code, "idexists");
        assert_eq!(p.type_url, "https://fridgy.dev/problem/idexists");
        assert_eq!(p.entity_name.as_deref(), Some("productsProduct"));
        assert_eq!(p.instance, "/api/products");
    }

    #[test]
    fn err_def_builds_problem() {
        let def = ErrDef {
            status: StatusCode::NOT_FOUND,
            title: "Not Found",
            code: "notfound",
        };
        let p = def.to_problem("Recipe 7 not found");
        assert_eq!(p.status, 404);
        assert_eq!(p.detail, "Recipe 7 not found");
        assert_eq!(p.code, "notfound");
    }

    #[tokio::test]
    async fn extra_headers_survive_rendering() {
        let resp = bad_request("Invalid id")
            .with_header(HeaderName::from_static("x-productsapp-error"), "error.idnull")
            .into_response();
        assert_eq!(
            resp.headers()
                .get("x-productsapp-error")
                .and_then(|v| v.to_str().ok()),
            Some("error.idnull")
        );
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["status"], 400);
        assert_eq!(v["title"], "Bad Request");
        assert!(v.get("entityName").is_none());
    }

    #[test]
    fn convenience_constructors() {
        assert_eq!(bad_request("x").problem.status, 400);
        assert_eq!(unauthorized("x").problem.code, "unauthenticated");
        assert_eq!(not_found("x").problem.status, 404);
        assert_eq!(unsupported_media_type("x").problem.status, 415);
        assert_eq!(internal_error("x").problem.title, "Internal Server Error");
    }
}
