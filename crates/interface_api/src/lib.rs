//! HTTP API Layer
//!
//! This crate provides the read-only REST API for policy terms using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: search, detail lookup, health and readiness
//! - **Middleware**: request ids, tracing, request logging
//! - **DTOs**: query parameters and camelCase response shapes
//! - **Error Handling**: consistent JSON error bodies
//!
//! Handlers only see the `PolicyTermPort` trait object in [`AppState`], so
//! the same router serves the PostgreSQL adapter in production and the
//! in-memory adapter in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(Arc::new(adapter));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod seeding;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use domain_policy::PolicyTermPort;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, policy_term};
use crate::middleware::{request_logging_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub port: Arc<dyn PolicyTermPort>,
}

/// Creates the API router
///
/// Policy term routes are served both at the root and under `/api`.
pub fn create_router(port: Arc<dyn PolicyTermPort>) -> Router {
    let state = AppState { port };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    Router::new()
        .merge(public_routes)
        .merge(policy_term_routes())
        .nest("/api", policy_term_routes())
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn policy_term_routes() -> Router<AppState> {
    Router::new()
        .route("/policy-terms", get(policy_term::list_policy_terms))
        .route("/policy-terms/:term_id", get(policy_term::get_policy_term))
}
