//! Fleetroute service binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$FLEETROUTE_CONFIG` (default
//!    `fleetroute.yaml`), falling back to defaults when the file is absent
//! 2. Initialize structured logging (tracing)
//! 3. Create the map registry, order registry, and broadcast hub
//! 4. Import every map listed under `maps.preload`
//! 5. Serve HTTP and `WebSocket` until `Ctrl-C`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use fleetroute_core::{LoggingConfig, ServiceConfig};
use fleetroute_hub::{AppState, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Config file used when `FLEETROUTE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "fleetroute.yaml";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let (config, config_path, found) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("fleetroute-server starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        default_algorithm = %config.routing.default_algorithm,
        avg_speed_cm_s = config.routing.eta.avg_speed_cm_s,
        turn_penalty_s = config.routing.eta.turn_penalty_s,
        subscriber_buffer = config.hub.subscriber_buffer,
        "Service configuration"
    );

    // 3. Create shared state.
    let server_config = config.server.clone();
    let state = Arc::new(AppState::new(config));

    // 4. Preload maps.
    for path in &state.config.maps.preload {
        if let Err(e) = state.maps.import_file(path).await {
            warn!(path = %path.display(), "Skipping map preload: {e}");
        }
    }

    // 5. Serve.
    start_server(&server_config, state).await?;

    info!("fleetroute-server stopped");
    Ok(())
}

/// Read the config file named by `FLEETROUTE_CONFIG`, or defaults with
/// environment overrides if it does not exist.
///
/// Returns the config, the path consulted, and whether the file existed.
fn load_config() -> Result<(ServiceConfig, PathBuf, bool), AppError> {
    let path = std::env::var_os("FLEETROUTE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = ServiceConfig::from_file(&path)?;
        Ok((config, path, true))
    } else {
        let mut config = ServiceConfig::default();
        config.apply_env_overrides()?;
        Ok((config, path, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
