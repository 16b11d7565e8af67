use serde::{Deserialize, Serialize};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default request body limit (16 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// `modules.api_ingress` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Serve `/openapi.json` and `/docs`.
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_timeout")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: false,
            cors_enabled: false,
            request_timeout_sec: default_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT_BYTES
}
