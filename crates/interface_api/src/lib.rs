//! HTTP API Layer
//!
//! This crate provides the REST API of the salary raise service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one salary raise route per update strategy, plus health
//! - **Middleware**: request ids, tracing and latency logging
//! - **DTOs**: query string types
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_payroll::{SalaryService, UpdateStrategy};

use crate::handlers::{health, salaries};
use crate::middleware::latency_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SalaryService,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Salary service bound to a payroll port and raise rate
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: SalaryService) -> Router {
    let state = AppState { service };

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let salary_routes = Router::new()
        .route(UpdateStrategy::ObjectGraph.route(), put(salaries::increase_salaries))
        .route(UpdateStrategy::InterpolatedSql.route(), put(salaries::increase_salaries_sql))
        .route(UpdateStrategy::BoundSql.route(), put(salaries::increase_salaries_dapper));

    Router::new()
        .merge(health_routes)
        .merge(salary_routes)
        .layer(axum_middleware::from_fn(latency_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
