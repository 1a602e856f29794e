//! Error types for the `fleetroute-core` crate.

use std::path::PathBuf;

use fleetroute_graph::GraphError;
use fleetroute_types::{MapId, OrderId};

/// Errors from the map registry, order registry, and planner.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No graph has been imported under this map id.
    #[error("map_id not loaded: {0}")]
    MapNotLoaded(MapId),

    /// No order exists with this id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Graph construction or search failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A map file could not be read.
    #[error("failed to read map file {}: {source}", path.display())]
    MapFile {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A map file is not a valid map document.
    #[error("failed to parse map file {}: {source}", path.display())]
    MapParse {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
