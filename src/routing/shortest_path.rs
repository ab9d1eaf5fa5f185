use tracing::trace;

use crate::domain::types::NodeId;
use crate::error::{DispatchError, Result};
use crate::routing::graph::RoadNetwork;
use crate::utils::format_path;

/// Single-source shortest path result. `None` distances are unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    pub source: NodeId,
    pub distances: Vec<Option<u64>>,
    pub predecessors: Vec<Option<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub target: NodeId,
    pub distance: u64,
    pub path: Vec<NodeId>,
}

impl Route {
    /// The path as `"0 -> 2 -> 3"`.
    pub fn display_path(&self) -> String {
        format_path(&self.path)
    }
}

/// Dijkstra with O(N^2) selection. Among equally distant unvisited nodes the
/// lowest id is settled first. A predecessor only changes on strict improvement.
pub fn shortest_paths(network: &RoadNetwork, source: NodeId) -> Result<ShortestPaths> {
    network.check_node(source)?;

    let n = network.node_count();
    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; n];
    let mut visited = vec![false; n];
    distances[source] = Some(0);

    while let Some((u, dist_u)) = closest_unvisited(&distances, &visited) {
        visited[u] = true;

        for &(v, weight) in network.neighbours(u)? {
            if visited[v] {
                continue;
            }
            let Some(candidate) = dist_u.checked_add(weight) else {
                continue;
            };
            if distances[v].map_or(true, |current| candidate < current) {
                distances[v] = Some(candidate);
                predecessors[v] = Some(u);
            }
        }
    }

    trace!("Distances from {}: {:?}", source, distances);
    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
    })
}

fn closest_unvisited(distances: &[Option<u64>], visited: &[bool]) -> Option<(NodeId, u64)> {
    let mut best: Option<(NodeId, u64)> = None;
    for (node, dist) in distances.iter().enumerate() {
        if visited[node] {
            continue;
        }
        if let Some(d) = *dist {
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((node, d));
            }
        }
    }
    best
}

/// Walk predecessor links back from `target` and return the nodes in travel
/// order. The walk stops at the first node without a predecessor, so an
/// unreachable target and the source both come back as `[target]`; use
/// [`ShortestPaths::path_to`] to tell them apart.
pub fn reconstruct_path(predecessors: &[Option<NodeId>], target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut node = target;
    while let Some(prev) = predecessors.get(node).copied().flatten() {
        if path.len() > predecessors.len() {
            break;
        }
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}

impl ShortestPaths {
    pub fn distance_to(&self, target: NodeId) -> Option<u64> {
        self.distances.get(target).copied().flatten()
    }

    pub fn is_reachable(&self, target: NodeId) -> bool {
        self.distance_to(target).is_some()
    }

    /// `None` when `target` cannot be reached, `[source]` when it is the source.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        self.distance_to(target)?;
        Some(reconstruct_path(&self.predecessors, target))
    }

    pub fn route_to(&self, target: NodeId) -> Result<Route> {
        if target >= self.distances.len() {
            return Err(DispatchError::InvalidNode {
                node: target,
                node_count: self.distances.len(),
            });
        }
        let no_path = DispatchError::NoPath {
            from: self.source,
            to: target,
        };
        let distance = self.distance_to(target).ok_or(no_path.clone())?;
        let path = self.path_to(target).ok_or(no_path)?;
        Ok(Route {
            target,
            distance,
            path,
        })
    }
}
