//! Tilecanvas - A tiled store for huge raster images.
//!
//! This binary starts the HTTP server and configures all components.

use std::num::NonZeroU32;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tilecanvas::{
    canvas::TiledImageService,
    config::Config,
    server::{create_router, RouterConfig},
    tile::{FsTileStore, MemoryTileStore, TileStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(tile_max_size) = NonZeroU32::new(config.tile_max_size) else {
        error!("Configuration error: tile_max_size must be greater than 0");
        return ExitCode::FAILURE;
    };

    info!("Tilecanvas v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Tile max size: {}px", tile_max_size);
    info!("  Body limit: {} bytes", config.max_body_bytes);

    match (&config.data_dir, config.in_memory) {
        (_, true) => {
            warn!("  Storage: IN MEMORY - images are lost on exit");
            serve(&config, MemoryTileStore::new(), tile_max_size).await
        }
        (Some(dir), false) => {
            info!("  Storage: {}", dir.display());
            match FsTileStore::new(dir).await {
                Ok(store) => serve(&config, store, tile_max_size).await,
                Err(e) => {
                    error!("Failed to open data directory: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        (None, false) => {
            error!("Configuration error: no data directory");
            ExitCode::FAILURE
        }
    }
}

async fn serve<S>(config: &Config, store: S, tile_max_size: NonZeroU32) -> ExitCode
where
    S: TileStore + 'static,
{
    let service = TiledImageService::new(store, tile_max_size);
    let router = create_router(service, build_router_config(config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl -X POST 'http://{}/chartas?width=2000&height=1500'", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tilecanvas=debug,tower_http=debug"
    } else {
        "tilecanvas=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_max_body_bytes(config.max_body_bytes);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
