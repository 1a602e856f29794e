//! Shortest-path search over a [`Graph`].
//!
//! Both algorithms share one best-first loop: a min-priority queue of
//! `(priority, node)` entries with lazy deletion. Dijkstra orders by the
//! accumulated cost `g`; A* orders by `g + h` where `h` is the straight-line
//! distance to the goal. Ties are broken by insertion order so results are
//! reproducible.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use fleetroute_types::{Algorithm, NodeId};
use tracing::trace;

use crate::error::GraphError;
use crate::graph::Graph;

/// A computed route.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShortestPath {
    /// Nodes from start to goal inclusive. Never empty.
    pub path: Vec<NodeId>,
    /// Sum of edge weights along the path, in centimetres.
    pub cost: f64,
}

/// Priority queue entry.
#[derive(Debug)]
struct QueueEntry<'g> {
    /// Ordering key (`g` for Dijkstra, `g + h` for A*).
    priority: f64,
    /// Accumulated cost from the start when the entry was pushed.
    cost: f64,
    /// Insertion sequence number, for deterministic tie-breaking.
    seq: u64,
    node: &'g NodeId,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the smallest
        // priority first and the earliest insertion among equals.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path with Dijkstra's algorithm (uniform-cost search).
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] if `start` or `goal` is not in the
/// graph, or [`GraphError::NoPath`] if the goal is unreachable.
pub fn dijkstra(graph: &Graph, start: &NodeId, goal: &NodeId) -> Result<ShortestPath, GraphError> {
    search(graph, start, goal, |_| 0.0)
}

/// Find the cheapest path with A*, using straight-line distance to the goal
/// as the heuristic.
///
/// The result is optimal when every edge weight is at least the
/// straight-line distance between its endpoints. An explicit edge length
/// below that bound makes the heuristic inadmissible and the returned path
/// may be longer than the one [`dijkstra`] finds.
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] if `start` or `goal` is not in the
/// graph, or [`GraphError::NoPath`] if the goal is unreachable.
pub fn astar(graph: &Graph, start: &NodeId, goal: &NodeId) -> Result<ShortestPath, GraphError> {
    let goal_point = graph
        .point(goal)
        .ok_or_else(|| GraphError::UnknownNode(goal.clone()))?;
    search(graph, start, goal, |node| {
        graph
            .point(node)
            .map_or(0.0, |p| p.distance_to(goal_point))
    })
}

/// Run the selected algorithm.
///
/// # Errors
///
/// See [`dijkstra`] and [`astar`].
pub fn shortest_path(
    graph: &Graph,
    start: &NodeId,
    goal: &NodeId,
    algorithm: Algorithm,
) -> Result<ShortestPath, GraphError> {
    match algorithm {
        Algorithm::Dijkstra => dijkstra(graph, start, goal),
        Algorithm::Astar => astar(graph, start, goal),
    }
}

/// Best-first search shared by both algorithms.
fn search<H>(
    graph: &Graph,
    start: &NodeId,
    goal: &NodeId,
    heuristic: H,
) -> Result<ShortestPath, GraphError>
where
    H: Fn(&NodeId) -> f64,
{
    if !graph.contains(start) {
        return Err(GraphError::UnknownNode(start.clone()));
    }
    if !graph.contains(goal) {
        return Err(GraphError::UnknownNode(goal.clone()));
    }
    if start == goal {
        return Ok(ShortestPath {
            path: vec![start.clone()],
            cost: 0.0,
        });
    }

    // Best known cost from start, and predecessor for reconstruction.
    let mut best: BTreeMap<&NodeId, f64> = BTreeMap::new();
    let mut prev: BTreeMap<&NodeId, &NodeId> = BTreeMap::new();
    let mut queue = BinaryHeap::new();
    let mut seq: u64 = 0;

    best.insert(start, 0.0);
    queue.push(QueueEntry {
        priority: heuristic(start),
        cost: 0.0,
        seq,
        node: start,
    });

    let mut expanded: usize = 0;
    let mut reached = false;

    while let Some(QueueEntry { cost, node, .. }) = queue.pop() {
        // Stale entry: a cheaper route to this node was found after it was pushed.
        if best.get(node).is_some_and(|&b| cost > b) {
            continue;
        }
        if node == goal {
            reached = true;
            break;
        }
        expanded = expanded.saturating_add(1);

        for (neighbor, weight) in graph.neighbors(node) {
            let candidate = cost + weight;
            let improves = best.get(neighbor).is_none_or(|&b| candidate < b);
            if improves {
                best.insert(neighbor, candidate);
                prev.insert(neighbor, node);
                seq = seq.saturating_add(1);
                queue.push(QueueEntry {
                    priority: candidate + heuristic(neighbor),
                    cost: candidate,
                    seq,
                    node: neighbor,
                });
            }
        }
    }

    trace!(%start, %goal, expanded, reached, "Search finished");

    let Some(&cost) = best.get(goal).filter(|_| reached) else {
        return Err(GraphError::NoPath {
            from: start.clone(),
            to: goal.clone(),
        });
    };

    let mut path = vec![goal.clone()];
    let mut current = goal;
    while let Some(&predecessor) = prev.get(current) {
        path.push(predecessor.clone());
        current = predecessor;
        if current == start {
            break;
        }
    }
    path.reverse();

    Ok(ShortestPath { path, cost })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use fleetroute_types::{EdgeDef, MapData, MapUnit, NodeDef};

    use super::*;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::from(*n)).collect()
    }

    fn build(nodes: &[(&str, f64, f64)], edges: &[(&str, &str, bool, Option<f64>)]) -> Graph {
        let map = MapData {
            map_id: "test".into(),
            unit: MapUnit::Cm,
            nodes: nodes
                .iter()
                .map(|&(id, x, y)| NodeDef {
                    id: NodeId::from(id),
                    x,
                    y,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|&(from, to, bidirectional, length)| EdgeDef {
                    from: NodeId::from(from),
                    to: NodeId::from(to),
                    bidirectional,
                    length,
                })
                .collect(),
        };
        Graph::build(&map).unwrap()
    }

    /// A(0,0), B(3,0), C(3,4); A-B 3, B-C 4, optionally A-C 10.
    fn corner(with_direct: bool) -> Graph {
        let mut edges = vec![("A", "B", true, Some(3.0)), ("B", "C", true, Some(4.0))];
        if with_direct {
            edges.push(("A", "C", true, Some(10.0)));
        }
        build(&[("A", 0.0, 0.0), ("B", 3.0, 0.0), ("C", 3.0, 4.0)], &edges)
    }

    #[test]
    fn dijkstra_walks_the_corner() {
        let g = corner(false);
        let result = dijkstra(&g, &NodeId::from("A"), &NodeId::from("C")).unwrap();
        assert_eq!(result.path, ids(&["A", "B", "C"]));
        assert_eq!(result.cost, 7.0);
    }

    #[test]
    fn astar_prefers_corner_over_long_direct_edge() {
        let g = corner(true);
        let result = astar(&g, &NodeId::from("A"), &NodeId::from("C")).unwrap();
        assert_eq!(result.path, ids(&["A", "B", "C"]));
        assert_eq!(result.cost, 7.0);
    }

    #[test]
    fn reverse_direction_uses_mirrored_edges() {
        let g = corner(false);
        let result = dijkstra(&g, &NodeId::from("C"), &NodeId::from("A")).unwrap();
        assert_eq!(result.path, ids(&["C", "B", "A"]));
    }

    #[test]
    fn same_start_and_goal_is_zero_cost() {
        let g = corner(true);
        for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
            let a = NodeId::from("A");
            let result = shortest_path(&g, &a, &a, algorithm).unwrap();
            assert_eq!(result.path, ids(&["A"]));
            assert_eq!(result.cost, 0.0);
        }
    }

    #[test]
    fn disconnected_goal_has_no_path() {
        let g = build(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("Z", 50.0, 50.0)],
            &[("A", "B", true, None)],
        );
        for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
            let err = shortest_path(&g, &NodeId::from("A"), &NodeId::from("Z"), algorithm)
                .unwrap_err();
            assert!(matches!(err, GraphError::NoPath { .. }));
        }
    }

    #[test]
    fn one_way_edge_blocks_return_trip() {
        let g = build(&[("A", 0.0, 0.0), ("B", 1.0, 0.0)], &[("A", "B", false, None)]);
        assert!(dijkstra(&g, &NodeId::from("A"), &NodeId::from("B")).is_ok());
        assert!(matches!(
            dijkstra(&g, &NodeId::from("B"), &NodeId::from("A")),
            Err(GraphError::NoPath { .. })
        ));
    }

    #[test]
    fn unknown_endpoints_rejected() {
        let g = corner(false);
        for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
            let err = shortest_path(&g, &NodeId::from("Q"), &NodeId::from("A"), algorithm)
                .unwrap_err();
            assert_eq!(err, GraphError::UnknownNode(NodeId::from("Q")));
            let err = shortest_path(&g, &NodeId::from("A"), &NodeId::from("Q"), algorithm)
                .unwrap_err();
            assert_eq!(err, GraphError::UnknownNode(NodeId::from("Q")));
        }
    }

    #[test]
    fn cheapest_parallel_edge_is_used() {
        let g = build(
            &[("A", 0.0, 0.0), ("B", 3.0, 0.0)],
            &[("A", "B", false, Some(9.0)), ("A", "B", false, Some(3.5))],
        );
        for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
            let result =
                shortest_path(&g, &NodeId::from("A"), &NodeId::from("B"), algorithm).unwrap();
            assert_eq!(result.cost, 3.5);
        }
    }

    #[test]
    fn equal_cost_ties_resolve_deterministically() {
        // Two routes of equal length: A-B-D and A-C-D.
        let g = build(
            &[("A", 0.0, 0.0), ("B", 1.0, 1.0), ("C", 1.0, -1.0), ("D", 2.0, 0.0)],
            &[
                ("A", "B", true, None),
                ("A", "C", true, None),
                ("B", "D", true, None),
                ("C", "D", true, None),
            ],
        );
        let first = dijkstra(&g, &NodeId::from("A"), &NodeId::from("D")).unwrap();
        for _ in 0..10 {
            let again = dijkstra(&g, &NodeId::from("A"), &NodeId::from("D")).unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(first.path.len(), 3);
    }

    #[test]
    fn astar_can_miss_optimum_when_override_undercuts_straight_line() {
        // S-Y-G has explicit lengths of 1 each, far below the straight-line
        // distances, so the heuristic overestimates at Y.
        let g = build(
            &[("S", 0.0, 0.0), ("X", 50.0, 0.0), ("Y", 0.0, 100.0), ("G", 100.0, 0.0)],
            &[
                ("S", "X", true, None),
                ("X", "G", true, None),
                ("S", "Y", true, Some(1.0)),
                ("Y", "G", true, Some(1.0)),
            ],
        );
        let (s, goal) = (NodeId::from("S"), NodeId::from("G"));
        let exact = dijkstra(&g, &s, &goal).unwrap();
        let heuristic = astar(&g, &s, &goal).unwrap();
        assert_eq!(exact.cost, 2.0);
        assert_eq!(heuristic.cost, 100.0);
        assert_eq!(heuristic.path, ids(&["S", "X", "G"]));
    }

    #[test]
    fn stale_entries_are_skipped() {
        // B is first reached via the expensive direct edge, then improved via C.
        let g = build(
            &[("A", 0.0, 0.0), ("B", 2.0, 0.0), ("C", 1.0, 0.0), ("D", 3.0, 0.0)],
            &[
                ("A", "B", false, Some(10.0)),
                ("A", "C", false, Some(1.0)),
                ("C", "B", false, Some(1.0)),
                ("B", "D", false, Some(1.0)),
            ],
        );
        let result = dijkstra(&g, &NodeId::from("A"), &NodeId::from("D")).unwrap();
        assert_eq!(result.path, ids(&["A", "C", "B", "D"]));
        assert_eq!(result.cost, 3.0);
    }
}
