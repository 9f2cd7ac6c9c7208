//! HTTP server layer.
//!
//! Exposes the tiled image service over HTTP with BMP fragment bodies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST|GET|DELETE /chartas/{id}?x&y&width&height           │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │         handlers         │  │           routes            │  │
//! │  │ (query parsing, BMP I/O, │  │ (router, CORS, body limit,  │  │
//! │  │  error mapping)          │  │  tracing)                   │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    create_image_handler, delete_image_handler, get_fragment_handler, health_handler,
    set_fragment_handler, AppState, CreateQueryParams, ErrorResponse, FragmentQueryParams,
    HandlerError, HealthResponse,
};
pub use routes::{create_router, create_router_with_state, RouterConfig, DEFAULT_MAX_BODY_BYTES};
