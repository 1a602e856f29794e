//! Map graph: nodes with coordinates, edges as weighted adjacency.
//!
//! The [`Graph`] is built once from a [`MapData`] document and is
//! read-only afterwards. Adjacency is indexed per node as an ordered list
//! of `(neighbor, weight)` pairs, appended in edge-declaration order. A
//! bidirectional edge contributes one entry in each direction with the
//! same weight. Parallel edges between the same pair are all kept.

use std::collections::BTreeMap;

use fleetroute_types::{MapData, NodeId};
use tracing::debug;

use crate::error::GraphError;

/// A 2D coordinate in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An immutable routing graph.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Graph {
    /// Node coordinates indexed by node id.
    nodes: BTreeMap<NodeId, Point>,
    /// Outbound adjacency: node -> `(neighbor, weight)` in declaration order.
    adjacency: BTreeMap<NodeId, Vec<(NodeId, f64)>>,
    /// Number of declared edges (bidirectional edges count once).
    edge_count: usize,
}

impl Graph {
    /// Build a graph from a map document.
    ///
    /// Coordinates and explicit lengths are converted to centimetres using
    /// the map's unit. An edge's weight is its explicit length when given,
    /// otherwise the straight-line distance between its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if a node id repeats,
    /// [`GraphError::UnknownEdgeEndpoint`] if an edge references an
    /// undeclared node, or [`GraphError::InvalidEdgeLength`] if an explicit
    /// length is negative or not finite.
    pub fn build(map: &MapData) -> Result<Self, GraphError> {
        let scale = map.unit.to_cm_factor();

        let mut nodes = BTreeMap::new();
        let mut adjacency: BTreeMap<NodeId, Vec<(NodeId, f64)>> = BTreeMap::new();
        for node in &map.nodes {
            let point = Point::new(node.x * scale, node.y * scale);
            if nodes.insert(node.id.clone(), point).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
            adjacency.insert(node.id.clone(), Vec::new());
        }

        for edge in &map.edges {
            let Some(&from_pt) = nodes.get(&edge.from) else {
                return Err(GraphError::UnknownEdgeEndpoint {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: edge.from.clone(),
                });
            };
            let Some(&to_pt) = nodes.get(&edge.to) else {
                return Err(GraphError::UnknownEdgeEndpoint {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: edge.to.clone(),
                });
            };

            let weight = match edge.length {
                Some(length) if length.is_finite() && length >= 0.0 => length * scale,
                Some(length) => {
                    return Err(GraphError::InvalidEdgeLength {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        length,
                    });
                }
                None => from_pt.distance_to(to_pt),
            };

            adjacency
                .entry(edge.from.clone())
                .or_default()
                .push((edge.to.clone(), weight));
            if edge.bidirectional {
                adjacency
                    .entry(edge.to.clone())
                    .or_default()
                    .push((edge.from.clone(), weight));
            }
        }

        debug!(
            map_id = %map.map_id,
            nodes = nodes.len(),
            edges = map.edges.len(),
            "Graph built"
        );

        Ok(Self {
            nodes,
            adjacency,
            edge_count: map.edges.len(),
        })
    }

    /// Whether the node exists in the graph.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Coordinates of a node.
    pub fn point(&self, id: &NodeId) -> Option<Point> {
        self.nodes.get(id).copied()
    }

    /// Outbound `(neighbor, weight)` pairs of a node, in declaration order.
    ///
    /// Returns an empty slice for unknown nodes.
    pub fn neighbors(&self, id: &NodeId) -> &[(NodeId, f64)] {
        self.adjacency.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Straight-line distance between two nodes, if both exist.
    pub fn straight_line(&self, a: &NodeId, b: &NodeId) -> Option<f64> {
        Some(self.point(a)?.distance_to(self.point(b)?))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of declared edges.
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate over all nodes and their coordinates.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Point)> {
        self.nodes.iter()
    }
}
