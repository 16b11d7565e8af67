use axum::http::StatusCode;
use http_problem::{ErrDef, FieldError, ProblemResponse};

use crate::api::rest::headers::app_header;
use crate::domain::error::DomainError;

pub const ID_EXISTS: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Bad Request",
    code: "idexists",
};
pub const ID_NULL: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Invalid id",
    code: "idnull",
};
pub const ID_INVALID: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Invalid ID",
    code: "idinvalid",
};
pub const ID_NOT_FOUND: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Entity not found",
    code: "idnotfound",
};
pub const VALIDATION: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Validation error",
    code: "validation",
};
pub const NOT_FOUND: ErrDef = ErrDef {
    status: StatusCode::NOT_FOUND,
    title: "Not Found",
    code: "notfound",
};
pub const INTERNAL: ErrDef = ErrDef {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    title: "Internal error",
    code: "internal",
};

/// Map domain error to RFC9457 ProblemResponse.
///
/// Id-rule failures also carry `X-{app}-error: error.{code}` and
/// `X-{app}-params: {entity}`.
pub fn map_domain_error(e: &DomainError, instance: &str, app: &str) -> ProblemResponse {
    let def = match e {
        DomainError::IdExists { .. } => ID_EXISTS,
        DomainError::IdNull { .. } => ID_NULL,
        DomainError::IdInvalid { .. } => ID_INVALID,
        DomainError::IdNotFound { .. } => ID_NOT_FOUND,
        DomainError::Validation { .. } => VALIDATION,
        DomainError::NotFound { .. } => NOT_FOUND,
        DomainError::Database { .. } => INTERNAL,
    };

    let detail = match e {
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            "An internal database error occurred".to_string()
        }
        _ => {
            tracing::debug!(code = def.code, "{}", e);
            e.to_string()
        }
    };

    let mut problem = def.to_problem(detail).with_instance(instance);
    if let Some(entity) = e.entity() {
        problem = problem.with_entity_name(entity.name());
    }
    if let DomainError::Validation { field, message, .. } = e {
        problem = problem.with_errors(vec![FieldError {
            pointer: format!("/{field}"),
            detail: message.clone(),
        }]);
    }

    let mut resp = ProblemResponse::new(problem);
    let is_id_rule = matches!(
        e,
        DomainError::IdExists { .. }
            | DomainError::IdNull { .. }
            | DomainError::IdInvalid { .. }
            | DomainError::IdNotFound { .. }
    );
    if is_id_rule {
        if let Some(name) = app_header(app, "error") {
            resp = resp.with_header(name, &format!("error.{}", def.code));
        }
        if let (Some(name), Some(entity)) = (app_header(app, "params"), e.entity()) {
            resp = resp.with_header(name, entity.name());
        }
    }
    resp
}
