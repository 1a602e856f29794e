//! Shared type definitions for the Fleetroute routing service.
//!
//! This crate is the single source of truth for the types that cross crate
//! and wire boundaries: map documents, orders, telemetry reports, and the
//! `WebSocket` protocol spoken by robots and dashboards.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifier newtypes (maps, nodes, orders, robots)
//! - [`enums`] -- Lifecycle states, map units, and algorithm selectors
//! - [`structs`] -- Map documents, orders, telemetry, and route request/response bodies
//! - [`protocol`] -- Tagged `WebSocket` messages decoded at the connection boundary

pub mod enums;
pub mod ids;
pub mod protocol;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Algorithm, MapUnit, OrderState, RobotState};
pub use ids::{MapId, NodeId, OrderId, RobotId};
pub use protocol::{ClientMessage, ErrorCode, ProtocolError, ServerMessage};
pub use structs::{
    CreateOrderResponse, EdgeDef, MapData, MapSummary, NodeDef, Order,
    RouteRequest, Telemetry, TelemetrySnapshot,
};
