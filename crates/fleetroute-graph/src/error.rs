//! Error types for the `fleetroute-graph` crate.

use fleetroute_types::NodeId;

/// Errors that can occur while building or searching a graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge references a node the map does not declare.
    #[error("edge {from}->{to} refers to unknown node {missing}")]
    UnknownEdgeEndpoint {
        /// Declared origin of the edge.
        from: NodeId,
        /// Declared destination of the edge.
        to: NodeId,
        /// The endpoint that could not be resolved.
        missing: NodeId,
    },

    /// The same node id is declared more than once.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// An explicit edge length is negative, NaN, or infinite.
    #[error("edge {from}->{to} has invalid length {length}")]
    InvalidEdgeLength {
        /// Declared origin of the edge.
        from: NodeId,
        /// Declared destination of the edge.
        to: NodeId,
        /// The rejected length.
        length: f64,
    },

    /// A search endpoint is not in the graph.
    #[error("node not in graph: {0}")]
    UnknownNode(NodeId),

    /// The goal is not reachable from the start.
    #[error("no path from {from} to {to}")]
    NoPath {
        /// Search start.
        from: NodeId,
        /// Search goal.
        to: NodeId,
    },
}
