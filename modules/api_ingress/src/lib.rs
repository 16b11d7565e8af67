//! HTTP host for the service: wraps the module routers in the shared
//! middleware stack and serves them until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn, routing::get, Extension, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Owns the ingress configuration and builds the final router.
#[derive(Debug, Clone, Default)]
pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<Arc<utoipa::openapi::OpenApi>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// OpenAPI document served at `/openapi.json` when docs are enabled.
    pub fn with_openapi(mut self, doc: utoipa::openapi::OpenApi) -> Self {
        self.openapi = Some(Arc::new(doc));
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Merge `api` with the built-in routes and apply the middleware stack.
    ///
    /// Layer order, outermost first:
    /// PropagateRequestId -> SetRequestId -> push_req_id_to_extensions -> Trace
    /// -> Timeout -> CORS -> BodyLimit
    pub fn build_router(&self, api: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api)
            .fallback(web::fallback);

        if self.config.enable_docs {
            if let Some(doc) = &self.openapi {
                router = router
                    .route("/openapi.json", get(web::serve_openapi))
                    .route("/docs", get(web::serve_docs))
                    .layer(Extension(doc.clone()));
            } else {
                tracing::warn!("docs enabled but no OpenAPI document was provided");
            }
        }

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_sec,
            )))
            .layer(request_id::create_trace_layer())
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                request_id::MakeReqId,
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id))
    }

    /// Bind `addr` and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, addr: &str, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", addr, e))?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {}", e),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("HTTP server shutting down gracefully");
}
