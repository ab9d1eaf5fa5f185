use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

pub type NodeId = usize;
pub type BinId = u32;
pub type TruckId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinStatus {
    Empty,
    Filling,
    Urgent,
    /// A truck has arrived and the bin is waiting to be emptied by the driver.
    Collected,
}

impl fmt::Display for BinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BinStatus::Empty => "EMPTY",
            BinStatus::Filling => "FILLING",
            BinStatus::Urgent => "URGENT",
            BinStatus::Collected => "COLLECTED",
        };
        f.write_str(label)
    }
}

/// Read-only view of a bin for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSnapshot {
    pub id: BinId,
    pub location: String,
    pub current_fill: u32,
    pub capacity: u32,
    pub status: BinStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TruckState {
    Idle,
    EnRoute,
    Full,
}

#[derive(Debug, Clone)]
pub struct Truck {
    pub id: TruckId,
    pub capacity: u32,
    pub load: u32,
    pub current_node: NodeId,
    pub total_distance: u64,
    pub state: TruckState,
}

impl Truck {
    pub fn new(id: TruckId, capacity: u32, start_node: NodeId) -> Result<Self> {
        if capacity == 0 {
            return Err(DispatchError::InvalidCapacity);
        }
        Ok(Truck {
            id,
            capacity,
            load: 0,
            current_node: start_node,
            total_distance: 0,
            state: TruckState::Idle,
        })
    }

    pub fn is_full(&self) -> bool {
        self.load >= self.capacity
    }

    /// Move to `node`, travelling `distance`, and pick up one bin.
    pub(crate) fn arrive_at_bin(&mut self, node: NodeId, distance: u64) {
        self.total_distance += distance;
        self.current_node = node;
        self.load += 1;
        self.state = if self.is_full() {
            TruckState::Full
        } else {
            TruckState::EnRoute
        };
    }

    pub(crate) fn unload_at(&mut self, depot: NodeId, distance: u64) {
        self.total_distance += distance;
        self.current_node = depot;
        self.load = 0;
        self.state = TruckState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_truck_is_rejected() {
        assert_eq!(Truck::new(1, 0, 0).unwrap_err(), DispatchError::InvalidCapacity);
    }

    #[test]
    fn truck_becomes_full_on_last_pickup() {
        let mut truck = Truck::new(1, 2, 0).unwrap();
        truck.arrive_at_bin(3, 8);
        assert_eq!(truck.state, TruckState::EnRoute);
        truck.arrive_at_bin(4, 3);
        assert_eq!(truck.state, TruckState::Full);
        assert_eq!(truck.total_distance, 11);

        truck.unload_at(0, 11);
        assert_eq!(truck.load, 0);
        assert_eq!(truck.current_node, 0);
        assert_eq!(truck.state, TruckState::Idle);
        assert_eq!(truck.total_distance, 22);
    }

    #[test]
    fn status_labels() {
        assert_eq!(BinStatus::Urgent.to_string(), "URGENT");
        assert_eq!(
            serde_json::to_string(&BinStatus::Filling).unwrap(),
            "\"FILLING\""
        );
    }
}
