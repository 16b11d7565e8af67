use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName};
use http_problem::ProblemResponse;

use crate::api::rest::{error, headers};
use crate::contract::model::EntityKind;
use crate::domain::error::DomainError;

/// Per-router settings shared by the handlers (installed as an `Extension`).
#[derive(Debug, Clone)]
pub struct RestContext {
    app_name: Arc<str>,
    principal_header: HeaderName,
}

impl RestContext {
    pub fn new(app_name: &str, principal_header: &str) -> anyhow::Result<Self> {
        let principal_header = HeaderName::try_from(principal_header)
            .map_err(|e| anyhow::anyhow!("invalid principal header '{principal_header}': {e}"))?;
        Ok(Self {
            app_name: Arc::from(app_name),
            principal_header,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn principal_header(&self) -> &HeaderName {
        &self.principal_header
    }

    pub fn problem(&self, e: &DomainError, instance: &str) -> ProblemResponse {
        error::map_domain_error(e, instance, &self.app_name)
    }

    pub fn alert(&self, entity: EntityKind, action: &str, param: impl ToString) -> HeaderMap {
        headers::entity_alert(&self.app_name, entity, action, &param.to_string())
    }
}
