//! Shared application state for the HTTP and `WebSocket` handlers.

use std::sync::Arc;

use fleetroute_core::{MapRegistry, OrderRegistry, ServiceConfig};

use crate::hub::BroadcastHub;

/// Everything a request handler needs.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// registries are created once per process; tests build their own.
#[derive(Debug)]
pub struct AppState {
    /// Imported maps and their graphs.
    pub maps: MapRegistry,
    /// Orders, shared with the hub which applies telemetry to them.
    pub orders: Arc<OrderRegistry>,
    /// Live `WebSocket` subscribers.
    pub hub: BroadcastHub,
    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create empty registries sized by `config`.
    pub fn new(config: ServiceConfig) -> Self {
        let orders = Arc::new(OrderRegistry::new());
        let hub = BroadcastHub::new(Arc::clone(&orders), config.hub.subscriber_buffer);
        Self {
            maps: MapRegistry::new(),
            orders,
            hub,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}
