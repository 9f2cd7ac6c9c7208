//! HTTP request handlers for the chart API.
//!
//! # Endpoints
//!
//! - `POST /chartas?width&height` - Create an image
//! - `POST /chartas/{id}?x&y&width&height` - Write a BMP fragment
//! - `GET /chartas/{id}?x&y&width&height` - Read a fragment as BMP
//! - `DELETE /chartas/{id}` - Delete an image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::canvas::{TiledImageService, FRAGMENT_SIZE_LIMITS};
use crate::error::{CanvasError, CodecError, StoreError};
use crate::raster::{BmpCodec, Codec};
use crate::tile::TileStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the image service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: TileStore> {
    /// The service owning all images
    pub service: Arc<TiledImageService<S>>,

    /// Codec for fragment bodies
    pub codec: BmpCodec,
}

impl<S: TileStore> AppState<S> {
    /// Create a new application state around `service`.
    pub fn new(service: TiledImageService<S>) -> Self {
        Self::from_shared(Arc::new(service))
    }

    /// Create a state sharing an existing service.
    pub fn from_shared(service: Arc<TiledImageService<S>>) -> Self {
        Self {
            service,
            codec: BmpCodec::new(),
        }
    }
}

impl<S: TileStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            codec: self.codec,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for image creation.
#[derive(Debug, Deserialize)]
pub struct CreateQueryParams {
    pub width: u32,
    pub height: u32,
}

/// Query parameters addressing a fragment.
///
/// `x` and `y` may be negative; the fragment only has to overlap the image.
#[derive(Debug, Deserialize)]
pub struct FragmentQueryParams {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_size")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum HandlerError {
    /// Error from the image service
    Canvas(CanvasError),

    /// Missing or malformed query parameter
    InvalidQuery(String),

    /// Request body is not a decodable fragment
    InvalidFragment(CodecError),

    /// Fragment header disagrees with the `width`/`height` query
    FragmentSizeMismatch {
        expected: (u32, u32),
        got: (u32, u32),
    },

    /// Fragment could not be encoded for the response
    Encode(CodecError),
}

impl From<CanvasError> for HandlerError {
    fn from(err: CanvasError) -> Self {
        HandlerError::Canvas(err)
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        HandlerError::InvalidQuery(rejection.body_text())
    }
}

impl HandlerError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            HandlerError::Canvas(CanvasError::Size(err)) => {
                (StatusCode::BAD_REQUEST, "invalid_size", err.to_string())
            }

            HandlerError::Canvas(CanvasError::NotOverlaps) => (
                StatusCode::BAD_REQUEST,
                "not_overlaps",
                "Fragment does not overlap the image".to_string(),
            ),

            HandlerError::Canvas(CanvasError::NotExist { id }) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Image not found: {}", id),
            ),

            // A well-formed uuid never fails store validation, so anything
            // reaching the store with a bad id is unknown to us
            HandlerError::Canvas(CanvasError::Store(StoreError::InvalidImageId(id))) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Image not found: {}", id),
            ),

            HandlerError::Canvas(CanvasError::Store(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                format!("Storage error: {}", err),
            ),

            HandlerError::InvalidQuery(message) => (
                StatusCode::BAD_REQUEST,
                "invalid_query",
                message.clone(),
            ),

            HandlerError::InvalidFragment(err) => {
                (StatusCode::BAD_REQUEST, "invalid_fragment", err.to_string())
            }

            HandlerError::FragmentSizeMismatch { expected, got } => (
                StatusCode::BAD_REQUEST,
                "fragment_size_mismatch",
                format!(
                    "Fragment is {}x{} but the request declares {}x{}",
                    got.0, got.1, expected.0, expected.1
                ),
            ),

            HandlerError::Encode(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                err.to_string(),
            ),
        }
    }
}

/// Convert HandlerError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level (server errors)
/// - 404s are logged at DEBUG level
/// - other 4xx errors are logged at WARN level (client errors)
impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image creation.
///
/// # Endpoint
///
/// `POST /chartas?width={w}&height={h}`
///
/// # Response
///
/// - `201 Created`: body is the new image id as plain text
/// - `400 Bad Request`: missing parameters or size out of range
/// - `500 Internal Server Error`: tiles could not be written
pub async fn create_image_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    query: Result<Query<CreateQueryParams>, QueryRejection>,
) -> Result<Response, HandlerError> {
    let Query(params) = query?;

    let image = state.service.add_image(params.width, params.height).await?;

    Ok((StatusCode::CREATED, image.id.clone()).into_response())
}

/// Handle fragment writes.
///
/// # Endpoint
///
/// `POST /chartas/{id}?x={x}&y={y}&width={w}&height={h}`
///
/// The body is a BMP image of exactly `w` x `h` pixels.
///
/// # Response
///
/// - `200 OK`: fragment applied
/// - `400 Bad Request`: bad parameters, undecodable body, a body larger
///   than the fragment limit, size mismatch or a fragment that misses the
///   image
/// - `404 Not Found`: unknown image
/// - `500 Internal Server Error`: tile storage failed (the write may be
///   partially applied)
pub async fn set_fragment_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    query: Result<Query<FragmentQueryParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, HandlerError> {
    let Query(params) = query?;

    let image = state.service.get_image(&id).await?;

    // Size the body from its header before allocating any pixels
    let got = state
        .codec
        .dimensions(&body)
        .map_err(HandlerError::InvalidFragment)?;
    FRAGMENT_SIZE_LIMITS
        .check(got.0, got.1)
        .map_err(CanvasError::from)?;
    if got != (params.width, params.height) {
        return Err(HandlerError::FragmentSizeMismatch {
            expected: (params.width, params.height),
            got,
        });
    }

    let fragment = state
        .codec
        .decode(&body)
        .map_err(HandlerError::InvalidFragment)?;

    state
        .service
        .set_fragment(&image, params.x, params.y, fragment)
        .await?;

    Ok(StatusCode::OK.into_response())
}

/// Handle fragment reads.
///
/// # Endpoint
///
/// `GET /chartas/{id}?x={x}&y={y}&width={w}&height={h}`
///
/// # Response
///
/// - `200 OK`: BMP image of exactly `w` x `h` pixels with
///   `Content-Type: image/bmp`; areas outside the image are opaque black
/// - `400 Bad Request`: bad parameters or a region that misses the image
/// - `404 Not Found`: unknown image
/// - `500 Internal Server Error`: tile storage failed
pub async fn get_fragment_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    query: Result<Query<FragmentQueryParams>, QueryRejection>,
) -> Result<Response, HandlerError> {
    let Query(params) = query?;

    let image = state.service.get_image(&id).await?;

    let fragment = state
        .service
        .get_fragment(&image, params.x, params.y, params.width, params.height)
        .await?;

    let data = state.codec.encode(&fragment).map_err(HandlerError::Encode)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.codec.content_type())],
        Body::from(data),
    )
        .into_response())
}

/// Handle image deletion.
///
/// # Endpoint
///
/// `DELETE /chartas/{id}`
///
/// # Response
///
/// - `200 OK`: image deleted
/// - `404 Not Found`: unknown image
/// - `500 Internal Server Error`: tile files could not be removed (the
///   image is unregistered regardless)
pub async fn delete_image_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Response, HandlerError> {
    state.service.delete_image(&id).await?;

    Ok(StatusCode::OK.into_response())
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
