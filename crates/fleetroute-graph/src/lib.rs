//! Map graph model and shortest-path search.
//!
//! A map document is compiled once into an immutable [`Graph`]: nodes with
//! 2D coordinates in centimetres and a distance-weighted adjacency list.
//! Routes are then computed over it with either Dijkstra or A*.
//!
//! # Modules
//!
//! - [`error`] -- Error types for graph construction and search.
//! - [`graph`] -- [`Graph`] construction from a [`MapData`] document.
//! - [`search`] -- [`dijkstra`], [`astar`], and the [`shortest_path`]
//!   dispatcher keyed on [`Algorithm`].
//!
//! # Edge weights
//!
//! All weights must be non-negative; the builder rejects negative or
//! non-finite explicit lengths. A* is only guaranteed optimal when every
//! edge is at least as long as the straight line between its endpoints.
//! Computed weights always satisfy this. Explicit `length` overrides
//! shorter than the straight line can make A* return a longer route than
//! Dijkstra would.
//!
//! [`MapData`]: fleetroute_types::MapData
//! [`Algorithm`]: fleetroute_types::Algorithm

pub mod error;
pub mod graph;
pub mod search;

// Re-export primary types at crate root.
pub use error::GraphError;
pub use graph::{Graph, Point};
pub use search::{ShortestPath, astar, dijkstra, shortest_path};
