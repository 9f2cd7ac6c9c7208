//! Router configuration for the chart API.
//!
//! # Route Structure
//!
//! ```text
//! /health                 - Health check
//! /chartas                - POST: create image
//! /chartas/{id}           - POST: write fragment, GET: read fragment,
//!                           DELETE: delete image
//! ```
//!
//! Both `/chartas` paths also accept a trailing slash.
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroU32;
//! use tilecanvas::canvas::TiledImageService;
//! use tilecanvas::server::{create_router, RouterConfig};
//! use tilecanvas::tile::MemoryTileStore;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let service = TiledImageService::new(MemoryTileStore::new(), NonZeroU32::new(1000).unwrap());
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_image_handler, delete_image_handler, get_fragment_handler, health_handler,
    set_fragment_handler, AppState,
};
use crate::canvas::TiledImageService;
use crate::tile::TileStore;

/// Default request body limit: a 5000x5000 32-bit BMP plus headers.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5_000 * 5_000 * 4 + 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    /// - Bodies up to [`DEFAULT_MAX_BODY_BYTES`] are accepted
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the request body limit.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Chart routes and the health check
/// - Request body limit
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(service: TiledImageService<S>, config: RouterConfig) -> Router
where
    S: TileStore + 'static,
{
    create_router_with_state(AppState::new(service), config)
}

/// Create the router around an existing application state.
///
/// Useful when the caller keeps its own handle on the service.
pub fn create_router_with_state<S>(app_state: AppState<S>, config: RouterConfig) -> Router
where
    S: TileStore + 'static,
{
    let cors = build_cors_layer(&config);

    let router = build_chart_router(app_state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn build_chart_router<S>(app_state: AppState<S>) -> Router
where
    S: TileStore + 'static,
{
    let image_routes = post(set_fragment_handler::<S>)
        .get(get_fragment_handler::<S>)
        .delete(delete_image_handler::<S>);

    Router::new()
        .route("/health", get(health_handler))
        .route("/chartas", post(create_image_handler::<S>))
        .route("/chartas/", post(create_image_handler::<S>))
        .route("/chartas/{id}", image_routes.clone())
        .route("/chartas/{id}/", image_routes)
        .with_state(app_state)
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
