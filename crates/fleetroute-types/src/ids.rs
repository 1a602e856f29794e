//! Type-safe identifier wrappers around [`String`].
//!
//! Map, node, order, and robot identifiers all arrive as plain strings on
//! the wire. Wrapping each in its own newtype keeps a node id from being
//! passed where an order id is expected. All wrappers serialize
//! transparently, so the JSON shape is an ordinary string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Identifier of an imported map (one graph per map).
    MapId
}

define_id! {
    /// Identifier of a node (waypoint) within a map.
    NodeId
}

define_id! {
    /// Identifier of a route order.
    OrderId
}

define_id! {
    /// Identifier of a robot reporting telemetry.
    RobotId
}

impl OrderId {
    /// Generate a fresh random order identifier of the form `O` followed by
    /// eight lowercase hex digits, e.g. `O1a2b3c4d`.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let short: String = hex.chars().take(8).collect();
        Self(format!("O{short}"))
    }
}
