//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: datastore, cache and verifier wiring for either backend
//! - `routes/`: HTTP routes + handlers (one file per page)
//! - `dto.rs`: request/response DTOs and display formatting
//! - `errors.rs`: consistent error and outcome responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use invoicedash_infra::DashboardConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around already-wired services.
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(Arc::new(services))),
        )
}

/// Wire services from `config` and build the router (entrypoint used by `main.rs`).
pub async fn build_app_from_config(config: &DashboardConfig) -> anyhow::Result<Router> {
    let services = services::AppServices::from_config(config).await?;
    Ok(build_app(services))
}
