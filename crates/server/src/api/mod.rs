//! HTTP surface of the service.
//!
//! This module is organized into submodules:
//! - `pages` - Landing page (/)
//! - `profile` - Session profile endpoint (/api/profile)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration
//!
//! The login flow endpoints live in [`crate::auth`].

pub mod health;
pub mod openapi;
pub mod pages;
pub mod profile;

pub use health::MISC_TAG;
pub use profile::PROFILE_TAG;

use crate::{AppResources, auth};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Builds the application router with all routes, docs and middleware attached.
pub fn app(resources: AppResources) -> Router {
    let (router, api) = OpenApiRouter::<AppResources>::with_openapi(openapi::ApiDoc::openapi())
        .routes(routes!(pages::index))
        .routes(routes!(profile::profile))
        .routes(routes!(health::health))
        .merge(auth::router())
        .with_state(resources)
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server on `bind_address`.
#[tracing::instrument(skip(resources))]
pub async fn start_webserver(resources: AppResources, bind_address: &str) -> color_eyre::Result<()> {
    let router = app(resources);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server running");
    axum::serve(listener, router)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
