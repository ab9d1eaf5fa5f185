use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::constant::{MAX_EDGE_WEIGHT, MAX_NODES};
use crate::domain::types::NodeId;
use crate::error::{DispatchError, Result};

/// Undirected weighted road network with a fixed node count.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    adjacency: Vec<Vec<(NodeId, u64)>>,
}

/// Serialized network description: `{"node_count": 6, "edges": [[0, 1, 4], ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub node_count: usize,
    pub edges: Vec<(NodeId, NodeId, i64)>,
}

impl RoadNetwork {
    pub fn new(node_count: usize) -> Result<Self> {
        if node_count == 0 || node_count > MAX_NODES {
            return Err(DispatchError::InvalidSize {
                node_count,
                max: MAX_NODES,
            });
        }
        Ok(RoadNetwork {
            adjacency: vec![Vec::new(); node_count],
        })
    }

    /// Build a network from an ordered list of `(from, to, weight)` triples.
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId, i64)]) -> Result<Self> {
        let mut network = Self::new(node_count)?;
        for &(from, to, weight) in edges {
            network.connect(from, to, weight)?;
        }
        info!(
            "Built road network with {} nodes and {} edges",
            node_count,
            edges.len()
        );
        Ok(network)
    }

    pub fn from_spec(spec: &NetworkSpec) -> Result<Self> {
        Self::from_edges(spec.node_count, &spec.edges)
    }

    pub fn load_json(path: impl AsRef<Path>) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let spec: NetworkSpec = serde_json::from_str(&raw)?;
        debug!("Loaded network spec from {}", path.display());
        Ok(Self::from_spec(&spec)?)
    }

    /// Add an undirected edge. Weights must lie in `0..=MAX_EDGE_WEIGHT`.
    pub fn connect(&mut self, from: NodeId, to: NodeId, weight: i64) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        let weight = u64::try_from(weight)
            .ok()
            .filter(|&w| w <= MAX_EDGE_WEIGHT)
            .ok_or(DispatchError::InvalidWeight {
                from,
                to,
                weight,
                max: MAX_EDGE_WEIGHT,
            })?;

        self.adjacency[from].push((to, weight));
        self.adjacency[to].push((from, weight));
        trace!("Connected {} <-> {} (weight {})", from, to, weight);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Neighbours of `node` with edge weights, in insertion order.
    pub fn neighbours(&self, node: NodeId) -> Result<&[(NodeId, u64)]> {
        self.check_node(node)?;
        Ok(&self.adjacency[node])
    }

    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        if node >= self.adjacency.len() {
            return Err(DispatchError::InvalidNode {
                node,
                node_count: self.adjacency.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0; "empty")]
    #[test_case(MAX_NODES + 1; "too large")]
    fn invalid_sizes_are_rejected(node_count: usize) {
        assert_eq!(
            RoadNetwork::new(node_count).unwrap_err(),
            DispatchError::InvalidSize {
                node_count,
                max: MAX_NODES
            }
        );
    }

    #[test]
    fn largest_network_is_allowed() {
        assert_eq!(RoadNetwork::new(MAX_NODES).unwrap().node_count(), MAX_NODES);
    }

    #[test]
    fn edges_are_symmetric() {
        let edges = [(0, 1, 4), (0, 2, 2), (1, 2, 1), (1, 3, 5), (2, 3, 8), (3, 4, 3), (4, 5, 2)];
        let network = RoadNetwork::from_edges(6, &edges).unwrap();

        for u in 0..network.node_count() {
            for &(v, w) in network.neighbours(u).unwrap() {
                let back = network.neighbours(v).unwrap();
                assert!(back.contains(&(u, w)), "{v} is missing {u} with weight {w}");
            }
        }
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let mut network = RoadNetwork::new(3).unwrap();
        assert_eq!(
            network.connect(0, 3, 1),
            Err(DispatchError::InvalidNode {
                node: 3,
                node_count: 3
            })
        );
        assert!(network.neighbours(0).unwrap().is_empty());
    }

    #[test_case(-2; "negative")]
    #[test_case(MAX_EDGE_WEIGHT as i64 + 1; "just above the cap")]
    #[test_case(i64::MAX; "i64 max")]
    fn out_of_range_weight_is_rejected(weight: i64) {
        let mut network = RoadNetwork::new(3).unwrap();
        assert_eq!(
            network.connect(0, 1, weight),
            Err(DispatchError::InvalidWeight {
                from: 0,
                to: 1,
                weight,
                max: MAX_EDGE_WEIGHT
            })
        );
        assert!(network.neighbours(0).unwrap().is_empty());
    }

    #[test]
    fn heaviest_weight_is_accepted() {
        let mut network = RoadNetwork::new(2).unwrap();
        network.connect(0, 1, MAX_EDGE_WEIGHT as i64).unwrap();
        assert_eq!(network.neighbours(1).unwrap(), &[(0, MAX_EDGE_WEIGHT)]);
    }

    #[test]
    fn self_loops_and_multi_edges_are_kept() {
        let mut network = RoadNetwork::new(2).unwrap();
        network.connect(1, 1, 3).unwrap();
        network.connect(0, 1, 7).unwrap();
        network.connect(0, 1, 2).unwrap();
        assert_eq!(network.neighbours(0).unwrap(), &[(1, 7), (1, 2)]);
        assert_eq!(network.neighbours(1).unwrap(), &[(1, 3), (1, 3), (0, 7), (0, 2)]);
    }

    #[test]
    fn network_file_parses_from_json() {
        let raw = r#"{"node_count": 3, "edges": [[0, 1, 4], [1, 2, 1]]}"#;
        let spec: NetworkSpec = serde_json::from_str(raw).unwrap();
        let network = RoadNetwork::from_spec(&spec).unwrap();
        assert_eq!(network.neighbours(1).unwrap(), &[(0, 4), (2, 1)]);
    }
}
