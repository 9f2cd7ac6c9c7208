//! Configuration management for Tilecanvas.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILECANVAS_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use tilecanvas::config::Config;
//!
//! let config = Config::parse();
//! config.validate().expect("invalid configuration");
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `TILECANVAS_DATA_DIR` - Root directory for tile files
//! - `TILECANVAS_IN_MEMORY` - Keep tiles in memory instead (default: false)
//! - `TILECANVAS_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILECANVAS_PORT` - Server port (default: 8080)
//! - `TILECANVAS_TILE_MAX_SIZE` - Tile edge bound for new images (default: 1000)
//! - `TILECANVAS_MAX_BODY_BYTES` - Request body limit
//! - `TILECANVAS_CORS_ORIGINS` - Comma-separated CORS allow-list

use std::path::PathBuf;

use clap::Parser;

use crate::canvas::DEFAULT_TILE_MAX_SIZE;
use crate::server::DEFAULT_MAX_BODY_BYTES;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Smallest accepted body limit.
pub const MIN_BODY_BYTES: usize = 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Tilecanvas - A tiled store for huge raster images.
///
/// Creates images far larger than memory, split into BMP tiles on disk, and
/// serves reads and writes of arbitrary rectangular fragments over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "tilecanvas")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Directory that holds the tile files.
    ///
    /// Required unless --in-memory is set.
    #[arg(value_name = "DATA_DIR", env = "TILECANVAS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep tiles in memory instead of on disk.
    ///
    /// All images are lost when the process exits.
    #[arg(long, default_value_t = false, env = "TILECANVAS_IN_MEMORY")]
    pub in_memory: bool,

    /// Maximum tile edge in pixels for newly created images.
    #[arg(long, default_value_t = DEFAULT_TILE_MAX_SIZE, env = "TILECANVAS_TILE_MAX_SIZE")]
    pub tile_max_size: u32,

    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILECANVAS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILECANVAS_PORT")]
    pub port: u16,

    /// Largest accepted request body in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "TILECANVAS_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TILECANVAS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.in_memory && self.data_dir.is_none() {
            return Err(
                "A data directory is required. Pass DATA_DIR or set TILECANVAS_DATA_DIR, \
                 or run with --in-memory"
                    .to_string(),
            );
        }

        if self.tile_max_size == 0 {
            return Err("tile_max_size must be greater than 0".to_string());
        }

        if self.max_body_bytes < MIN_BODY_BYTES {
            return Err(format!(
                "max_body_bytes must be at least {}",
                MIN_BODY_BYTES
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
