use itertools::Itertools;

use crate::domain::types::NodeId;

pub fn format_path(path: &[NodeId]) -> String {
    path.iter().join(" -> ")
}

/// Fill percentage, rounded down. A zero capacity reads as empty.
pub fn fill_percentage(fill: u32, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    ((fill as u64 * 100) / capacity as u64) as u32
}
