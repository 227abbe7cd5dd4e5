//! # Sysmap HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET    /health`                    - Health check
//! - `GET    /statistics`                - Catalog statistics rollup
//! - `GET    /systems`                   - List systems (ordered by name)
//! - `POST   /systems`                   - Catalog a new system
//! - `GET    /systems/{id}`              - Load a system
//! - `PUT    /systems/{id}`              - Replace a system's fields
//! - `DELETE /systems/{id}`              - Delete a system (+ its flows)
//! - `GET    /systems/{id}/dataflows`    - Incoming + outgoing flows
//! - `GET    /systems/{id}/dependents`   - Reverse dependency lookup
//! - `GET    /systems/{id}/parent`       - Parent system
//! - `POST   /systems/search`            - Filtered search
//! - `GET    /dataflows`                 - List every flow
//! - `POST   /dataflows`                 - Create a flow
//! - `PUT    /dataflows/{id}`            - Partial flow update
//! - `DELETE /dataflows/{id}`            - Delete a flow
//!
//! ## Configuration (Environment Variables)
//!
//! - `SYSMAP_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `SYSMAP_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `sysmap::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    create_flow_handler, create_system_handler, delete_flow_handler, delete_system_handler,
    get_system_handler, health_handler, list_flows_handler, list_systems_handler, search_handler,
    statistics_handler, system_dependents_handler, system_flows_handler, system_parent_handler,
    update_flow_handler, update_system_handler,
};
#[allow(unused_imports)]
pub use types::{
    CreateFlowRequest, DeleteResponse, ErrorResponse, FlowListResponse, FlowResponse,
    HealthResponse, SearchRequest, StatisticsResponse, SystemListResponse, SystemRequest,
    SystemResponse, UpdateFlowRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use sysmap_core::{Catalog, CatalogError};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the catalog.
#[derive(Clone)]
pub struct AppState {
    /// The catalog behind a read/write lock: concurrent readers, one
    /// writer. Each store call runs to completion under the lock.
    pub catalog: Arc<RwLock<Catalog>>,
}

impl AppState {
    /// Create new app state with a catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `SYSMAP_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SYSMAP_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (SYSMAP_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SYSMAP_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No SYSMAP_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against overload (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/statistics", get(handlers::statistics_handler))
        .route(
            "/systems",
            get(handlers::list_systems_handler).post(handlers::create_system_handler),
        )
        .route(
            "/systems/{id}",
            get(handlers::get_system_handler)
                .put(handlers::update_system_handler)
                .delete(handlers::delete_system_handler),
        )
        .route("/systems/{id}/dataflows", get(handlers::system_flows_handler))
        .route(
            "/systems/{id}/dependents",
            get(handlers::system_dependents_handler),
        )
        .route("/systems/{id}/parent", get(handlers::system_parent_handler))
        .route("/systems/search", post(handlers::search_handler))
        .route(
            "/dataflows",
            get(handlers::list_flows_handler).post(handlers::create_flow_handler),
        )
        .route(
            "/dataflows/{id}",
            axum::routing::put(handlers::update_flow_handler)
                .delete(handlers::delete_flow_handler),
        );

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, catalog: Catalog) -> Result<(), CatalogError> {
    let state = AppState::new(catalog);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CatalogError::Storage(format!("Bind failed: {}", e)))?;

    tracing::info!("Sysmap HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CatalogError::Storage(format!("Server error: {}", e)))
}
