//! Enumeration types shared across the routing service.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Robot and order lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state reported by a robot in a telemetry message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotState {
    /// Powered on, no order assigned.
    Idle,
    /// An order has been assigned but the robot has not started moving.
    Assigned,
    /// Travelling along the order's path.
    #[default]
    Moving,
    /// Reached the goal node.
    Arrived,
}

/// Lifecycle state of an order.
///
/// Every order starts in [`OrderState::Created`]. After that the state
/// mirrors whatever the most recent telemetry reported; no transition
/// rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Route computed, no telemetry received yet.
    Created,
    /// Last report: robot idle.
    Idle,
    /// Last report: robot assigned.
    Assigned,
    /// Last report: robot moving.
    Moving,
    /// Last report: robot arrived.
    Arrived,
}

impl From<RobotState> for OrderState {
    fn from(state: RobotState) -> Self {
        match state {
            RobotState::Idle => Self::Idle,
            RobotState::Assigned => Self::Assigned,
            RobotState::Moving => Self::Moving,
            RobotState::Arrived => Self::Arrived,
        }
    }
}

// ---------------------------------------------------------------------------
// Maps and routing
// ---------------------------------------------------------------------------

/// Length unit used by a map document.
///
/// Graphs are always stored in centimetres; maps declared in metres are
/// scaled on import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapUnit {
    /// Centimetres (native unit).
    #[default]
    Cm,
    /// Metres.
    M,
}

impl MapUnit {
    /// Multiplier that converts a length in this unit to centimetres.
    pub const fn to_cm_factor(self) -> f64 {
        match self {
            Self::Cm => 1.0,
            Self::M => 100.0,
        }
    }
}

/// Shortest-path algorithm selector for route requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Uniform-cost search.
    #[default]
    Dijkstra,
    /// A* with a straight-line distance heuristic.
    Astar,
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dijkstra => f.write_str("dijkstra"),
            Self::Astar => f.write_str("astar"),
        }
    }
}
