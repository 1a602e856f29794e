//! Travel-time estimate for a computed route.
//!
//! `eta = distance / avg_speed + turns * turn_penalty`, where every
//! intermediate waypoint counts as one turn.

use fleetroute_types::NodeId;
use serde::Deserialize;

/// Default average robot speed in cm/s.
pub const DEFAULT_AVG_SPEED_CM_S: f64 = 12.0;

/// Default time cost of one turn in seconds.
pub const DEFAULT_TURN_PENALTY_S: f64 = 1.2;

/// Estimate travel time in seconds.
///
/// A non-positive (or NaN) `avg_speed_cm_s` is replaced by
/// [`DEFAULT_AVG_SPEED_CM_S`]. The turn count is `path.len() - 2`, floored
/// at zero.
pub fn estimate_eta(
    path: &[NodeId],
    total_distance_cm: f64,
    avg_speed_cm_s: f64,
    turn_penalty_s: f64,
) -> f64 {
    let speed = if avg_speed_cm_s > 0.0 {
        avg_speed_cm_s
    } else {
        DEFAULT_AVG_SPEED_CM_S
    };
    let turns = turn_count(path.len());
    total_distance_cm / speed + f64::from(turns) * turn_penalty_s
}

/// One turn per intermediate waypoint.
fn turn_count(path_len: usize) -> u32 {
    u32::try_from(path_len.saturating_sub(2)).unwrap_or(u32::MAX)
}

/// Configured ETA parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EtaModel {
    /// Average robot speed in cm/s.
    #[serde(default = "default_avg_speed")]
    pub avg_speed_cm_s: f64,
    /// Seconds added per turn.
    #[serde(default = "default_turn_penalty")]
    pub turn_penalty_s: f64,
}

const fn default_avg_speed() -> f64 {
    DEFAULT_AVG_SPEED_CM_S
}

const fn default_turn_penalty() -> f64 {
    DEFAULT_TURN_PENALTY_S
}

impl EtaModel {
    /// Estimate travel time for a path with these parameters.
    pub fn estimate(&self, path: &[NodeId], total_distance_cm: f64) -> f64 {
        estimate_eta(
            path,
            total_distance_cm,
            self.avg_speed_cm_s,
            self.turn_penalty_s,
        )
    }
}

impl Default for EtaModel {
    fn default() -> Self {
        Self {
            avg_speed_cm_s: DEFAULT_AVG_SPEED_CM_S,
            turn_penalty_s: DEFAULT_TURN_PENALTY_S,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    fn path(n: usize) -> Vec<NodeId> {
        (0..n).map(|i| NodeId::new(format!("N{i}"))).collect()
    }

    #[test]
    fn four_node_path_with_defaults() {
        let p: Vec<NodeId> = ["A", "B", "C", "D"].into_iter().map(NodeId::from).collect();
        let eta = estimate_eta(&p, 700.0, DEFAULT_AVG_SPEED_CM_S, DEFAULT_TURN_PENALTY_S);
        let expected = 700.0 / 12.0 + 2.0 * 1.2;
        assert!((eta - expected).abs() < 1e-9);
        assert!((eta - 60.733_333_333).abs() < 1e-6);
    }

    #[test]
    fn two_node_zero_distance_is_zero() {
        assert_eq!(EtaModel::default().estimate(&path(2), 0.0), 0.0);
    }

    #[test]
    fn short_paths_have_no_turns() {
        let model = EtaModel::default();
        assert_eq!(model.estimate(&path(0), 24.0), 2.0);
        assert_eq!(model.estimate(&path(1), 24.0), 2.0);
        assert_eq!(model.estimate(&path(2), 24.0), 2.0);
    }

    #[test]
    fn non_positive_speed_falls_back_to_default() {
        let p = path(2);
        assert_eq!(estimate_eta(&p, 120.0, 0.0, 1.2), 10.0);
        assert_eq!(estimate_eta(&p, 120.0, -5.0, 1.2), 10.0);
        assert_eq!(estimate_eta(&p, 120.0, f64::NAN, 1.2), 10.0);
    }

    #[test]
    fn monotonic_in_distance_and_path_length() {
        let model = EtaModel::default();
        let mut previous = 0.0;
        for distance in [0.0, 1.0, 10.0, 250.0, 1_000.0] {
            let eta = model.estimate(&path(3), distance);
            assert!(eta >= previous);
            previous = eta;
        }
        let mut previous = 0.0;
        for len in 1..10 {
            let eta = model.estimate(&path(len), 100.0);
            assert!(eta >= previous);
            previous = eta;
        }
    }
}
