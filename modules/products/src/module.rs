//! Wiring of the products module: repository, services, migrations and REST.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::{openapi::ProductsApiDoc, routes, RestContext};
use crate::config::ProductsConfig;
use crate::domain::service::{ServiceConfig, Services};
use crate::infra::storage::{migrations::Migrator, SeaOrmRepository};

/// The products module with its services built on one database connection.
#[derive(Clone)]
pub struct ProductsModule {
    services: Services,
    rest: RestContext,
}

impl ProductsModule {
    pub fn new(db: DatabaseConnection, cfg: &ProductsConfig) -> anyhow::Result<Self> {
        info!("Initializing products module");
        debug!(
            "Loaded products config: default_page_size={}, max_page_size={}, principal_header={}",
            cfg.default_page_size, cfg.max_page_size, cfg.principal_header
        );

        let repo = Arc::new(SeaOrmRepository::new(db));
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        };
        let services = Services::new(repo, service_config);
        let rest = RestContext::new(&cfg.application_name, &cfg.principal_header)?;

        Ok(Self { services, rest })
    }

    /// Create or upgrade the schema.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running products database migrations");
        Migrator::up(db, None).await?;
        info!("Products database migrations completed successfully");
        Ok(())
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering products REST routes");
        routes::register_routes(router, &self.services, self.rest.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        use utoipa::OpenApi;
        ProductsApiDoc::openapi()
    }
}
