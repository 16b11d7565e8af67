use serde::{Deserialize, Serialize};

/// Configuration for the products module (`modules.products`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Prefix of the `X-{app}-alert` / `X-{app}-error` response headers.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Header carrying the authenticated login, set by the upstream gateway.
    #[serde(default = "default_principal_header")]
    pub principal_header: String,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            application_name: default_application_name(),
            principal_header: default_principal_header(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    1000
}

fn default_application_name() -> String {
    "productsApp".to_string()
}

fn default_principal_header() -> String {
    "x-forwarded-user".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: ProductsConfig = serde_json::from_value(serde_json::json!({
            "default_page_size": 5
        }))
        .unwrap();
        assert_eq!(cfg.default_page_size, 5);
        assert_eq!(cfg.max_page_size, 1000);
        assert_eq!(cfg.application_name, "productsApp");
        assert_eq!(cfg.principal_header, "x-forwarded-user");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ProductsConfig, _> =
            serde_json::from_value(serde_json::json!({ "page_size": 5 }));
        assert!(res.is_err());
    }
}
