use thiserror::Error;

use crate::domain::types::{BinId, NodeId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid network size {node_count} (must be between 1 and {max})")]
    InvalidSize { node_count: usize, max: usize },
    #[error("node {node} is outside the network of {node_count} nodes")]
    InvalidNode { node: NodeId, node_count: usize },
    #[error("edge {from} - {to} has weight {weight} outside 0..={max}")]
    InvalidWeight {
        from: NodeId,
        to: NodeId,
        weight: i64,
        max: u64,
    },
    #[error("no path from node {from} to node {to}")]
    NoPath { from: NodeId, to: NodeId },
    #[error("priority queue is full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },
    #[error("priority queue is empty")]
    Empty,
    #[error("capacity must be positive")]
    InvalidCapacity,
    #[error("unknown bin {0}")]
    UnknownBin(BinId),
    #[error("bin {0} is already registered")]
    DuplicateBin(BinId),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
