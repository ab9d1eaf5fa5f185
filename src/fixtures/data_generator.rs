use std::collections::{HashMap, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::bin::{Bin, BinRegistry};
use crate::domain::types::{BinId, NodeId};
use crate::error::Result;
use crate::routing::graph::RoadNetwork;

pub const DEMO_NODE_COUNT: usize = 6;

pub const DEMO_EDGES: [(NodeId, NodeId, i64); 7] = [
    (0, 1, 4),
    (0, 2, 2),
    (1, 2, 1),
    (1, 3, 5),
    (2, 3, 8),
    (3, 4, 3),
    (4, 5, 2),
];

pub const DEMO_BIN_COUNT: u32 = 8;
pub const DEMO_BIN_CAPACITY: u32 = 100;

/// The six-node demo city. Node 0 is the depot.
pub fn demo_network() -> Result<RoadNetwork> {
    RoadNetwork::from_edges(DEMO_NODE_COUNT, &DEMO_EDGES)
}

/// Eight empty bins, "Sector 1" to "Sector 8", spread over the non-depot
/// nodes of `network` in turn.
pub fn demo_bins(network: &RoadNetwork) -> Result<BinRegistry> {
    let mut registry = BinRegistry::new();
    let sites = network.node_count().saturating_sub(1).max(1);

    for id in 1..=DEMO_BIN_COUNT {
        let node = if network.node_count() > 1 {
            1 + (id as usize - 1) % sites
        } else {
            0
        };
        registry.register(Bin::new(id, DEMO_BIN_CAPACITY, format!("Sector {id}"), node)?)?;
    }

    info!("Placed {} demo bins", registry.len());
    Ok(registry)
}

/// Source of fill deltas for bins, one call per bin per step.
pub trait FillSource {
    fn next_increment(&mut self, bin: BinId) -> u32;
}

/// Seeded uniform increments in `0..=max_increment`.
#[derive(Debug, Clone)]
pub struct RandomFill {
    rng: ChaCha8Rng,
    max_increment: u32,
}

impl RandomFill {
    pub fn new(seed: u64, max_increment: u32) -> Self {
        RandomFill {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_increment,
        }
    }
}

impl FillSource for RandomFill {
    fn next_increment(&mut self, _bin: BinId) -> u32 {
        self.rng.gen_range(0..=self.max_increment)
    }
}

/// Replays fixed increments per bin; bins without a script get nothing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFill {
    script: HashMap<BinId, VecDeque<u32>>,
}

impl ScriptedFill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, bin: BinId, increments: impl IntoIterator<Item = u32>) -> Self {
        self.script.entry(bin).or_default().extend(increments);
        self
    }
}

impl FillSource for ScriptedFill {
    fn next_increment(&mut self, bin: BinId) -> u32 {
        self.script
            .get_mut(&bin)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_bins_cover_every_site() {
        let network = demo_network().unwrap();
        let bins = demo_bins(&network).unwrap();
        let nodes: Vec<NodeId> = bins.iter().map(Bin::node).collect();
        assert_eq!(nodes, vec![1, 2, 3, 4, 5, 1, 2, 3]);
        assert_eq!(bins.get(8).unwrap().location(), "Sector 8");
    }

    #[test]
    fn random_fill_is_reproducible_and_bounded() {
        let mut a = RandomFill::new(64, 20);
        let mut b = RandomFill::new(64, 20);
        for bin in 0..50 {
            let x = a.next_increment(bin);
            assert_eq!(x, b.next_increment(bin));
            assert!(x <= 20);
        }
    }

    #[test]
    fn scripted_fill_runs_dry() {
        let mut fill = ScriptedFill::new().with(1, [30, 45]);
        assert_eq!(fill.next_increment(1), 30);
        assert_eq!(fill.next_increment(2), 0);
        assert_eq!(fill.next_increment(1), 45);
        assert_eq!(fill.next_increment(1), 0);
    }
}
