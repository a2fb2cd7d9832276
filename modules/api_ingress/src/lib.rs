//! HTTP host: wraps the application router in the shared middleware stack,
//! publishes the OpenAPI document and runs the server until cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Extension, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
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

pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Add `/health`, the docs routes and the JSON 404 fallback to `app`, then
    /// wrap everything in the middleware stack.
    ///
    /// Layers run outermost first: set request id, propagate it to the response,
    /// trace, expose it to handlers, timeout, CORS, body limit.
    pub fn build_router(&self, app: Router, openapi: Option<utoipa::openapi::OpenApi>) -> Router {
        let mut router = app
            .route("/health", get(web::health_check))
            .fallback(web::not_found);

        match openapi {
            Some(doc) if self.config.enable_docs => {
                let ops: usize = doc.paths.paths.values().map(count_operations).sum();
                tracing::info!("Publishing OpenAPI document with {ops} operations");
                match serde_json::to_value(&doc) {
                    Ok(value) => {
                        let docs = Router::new()
                            .route("/openapi.json", get(web::openapi_json))
                            .route("/docs", get(web::serve_docs))
                            .layer(Extension(Arc::new(value)));
                        router = router.merge(docs);
                    }
                    Err(e) => tracing::error!(error = %e, "OpenAPI document is not serializable"),
                }
            }
            _ => tracing::debug!("API docs disabled"),
        }

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router
            .layer(TimeoutLayer::new(self.config.request_timeout()))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `bind_addr` and serve until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.config.bind_addr))?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        serve_listener(listener, router, cancel).await
    }
}

/// Serve on an already bound listener; in-flight requests finish after cancellation.
pub async fn serve_listener(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed")
}

fn count_operations(item: &utoipa::openapi::PathItem) -> usize {
    [
        item.get.is_some(),
        item.put.is_some(),
        item.post.is_some(),
        item.delete.is_some(),
        item.patch.is_some(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count()
}
