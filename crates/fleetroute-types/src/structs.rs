//! Core entity structs: map documents, orders, telemetry, and the HTTP
//! request/response bodies for route orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::enums::{Algorithm, MapUnit, OrderState, RobotState};
use crate::ids::{MapId, NodeId, OrderId, RobotId};

// ---------------------------------------------------------------------------
// Map documents
// ---------------------------------------------------------------------------

/// A node (waypoint) declared in a map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Unique node identifier within the map.
    pub id: NodeId,
    /// X coordinate in the map's unit.
    pub x: f64,
    /// Y coordinate in the map's unit.
    pub y: f64,
}

/// An edge declared in a map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Origin node.
    pub from: NodeId,
    /// Destination node.
    pub to: NodeId,
    /// Whether the edge may also be traversed from `to` to `from`.
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    /// Explicit edge length in the map's unit. When absent the straight-line
    /// distance between the endpoints is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

const fn default_bidirectional() -> bool {
    true
}

/// A complete map document as supplied by the map importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Map identifier; graphs and orders reference the map by this key.
    pub map_id: MapId,
    /// Unit of coordinates and explicit edge lengths.
    #[serde(default)]
    pub unit: MapUnit,
    /// All nodes in the map.
    pub nodes: Vec<NodeDef>,
    /// All edges in the map, in declaration order.
    pub edges: Vec<EdgeDef>,
}

/// Counts reported after a map has been imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSummary {
    /// The imported map.
    pub map_id: MapId,
    /// Number of nodes.
    pub nodes: usize,
    /// Number of declared edges (a bidirectional edge counts once).
    pub edges: usize,
}

// ---------------------------------------------------------------------------
// Route orders
// ---------------------------------------------------------------------------

/// A request to compute a route and open an order for it.
///
/// This is also the JSON body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Map to route on.
    pub map_id: MapId,
    /// Start node.
    pub from_node: NodeId,
    /// Goal node.
    pub to_node: NodeId,
    /// Search algorithm; the service default (Dijkstra unless configured
    /// otherwise) when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
}

/// Response body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Newly allocated order identifier.
    pub order_id: OrderId,
    /// Map the route was computed on.
    pub map_id: MapId,
    /// Node sequence from start to goal inclusive.
    pub route: Vec<NodeId>,
    /// Total route length in centimetres.
    pub total_distance_cm: f64,
    /// Estimated travel time in seconds.
    pub eta_sec: f64,
}

impl From<&Order> for CreateOrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            map_id: order.map_id.clone(),
            route: order.route.clone(),
            total_distance_cm: order.total_distance_cm,
            eta_sec: order.eta_sec,
        }
    }
}

/// The most recent telemetry applied to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Robot that reported.
    pub robot_id: RobotId,
    /// Node the robot was at (or last passed).
    pub node: NodeId,
    /// Fraction of the route completed, in `[0, 1]`.
    pub progress: f64,
    /// Reported speed in cm/s.
    pub speed: f64,
    /// When the report was applied.
    pub reported_at: DateTime<Utc>,
}

/// A tracked route order.
///
/// Created once by a successful route computation and then mutated in
/// place by telemetry. Serialized flat: the telemetry snapshot fields
/// appear next to the order fields once the first report has arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub order_id: OrderId,
    /// Map the route belongs to.
    pub map_id: MapId,
    /// Node sequence from start to goal inclusive.
    pub route: Vec<NodeId>,
    /// Total route length in centimetres.
    pub total_distance_cm: f64,
    /// Estimated travel time in seconds.
    pub eta_sec: f64,
    /// Current lifecycle state.
    pub state: OrderState,
    /// Latest telemetry, if any has been received.
    #[serde(flatten)]
    pub telemetry: Option<TelemetrySnapshot>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last modified.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// A status report from a robot about its progress along an order.
///
/// Shape rules are checked with [`Validate`]: identifiers and node must be
/// non-empty, `progress` lies in `[0, 1]`, and `speed` is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Telemetry {
    /// Reporting robot.
    #[validate(custom(function = "non_empty_id"))]
    pub robot_id: RobotId,
    /// Order the robot is executing.
    #[validate(custom(function = "non_empty_id"))]
    pub order_id: OrderId,
    /// Current node.
    #[validate(custom(function = "non_empty_id"))]
    pub node: NodeId,
    /// Fraction of the route completed.
    #[validate(range(min = 0.0, max = 1.0))]
    pub progress: f64,
    /// Current speed in cm/s.
    #[validate(range(exclusive_min = 0.0))]
    pub speed: f64,
    /// Reported lifecycle state; `MOVING` when omitted.
    #[serde(default)]
    pub state: RobotState,
}

impl Telemetry {
    /// Project this report into the snapshot stored on an order.
    pub fn snapshot(&self, reported_at: DateTime<Utc>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            robot_id: self.robot_id.clone(),
            node: self.node.clone(),
            progress: self.progress,
            speed: self.speed,
            reported_at,
        }
    }
}

fn non_empty_id<T: AsRef<str>>(id: &T) -> Result<(), ValidationError> {
    if id.as_ref().is_empty() {
        return Err(ValidationError::new("empty").with_message("must not be empty".into()));
    }
    Ok(())
}
