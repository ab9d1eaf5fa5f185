use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::constant::URGENT_THRESHOLD;
use crate::domain::types::{BinId, BinSnapshot, BinStatus, NodeId};
use crate::error::{DispatchError, Result};
use crate::priority::queue::BinQueue;
use crate::utils::fill_percentage;

#[derive(Debug, Clone)]
pub struct Bin {
    id: BinId,
    capacity: u32,
    fill: u32,
    location: String,
    node: NodeId,
    status: BinStatus,
    reported: bool,
}

impl Bin {
    pub fn new(id: BinId, capacity: u32, location: impl Into<String>, node: NodeId) -> Result<Self> {
        if capacity == 0 {
            return Err(DispatchError::InvalidCapacity);
        }
        Ok(Bin {
            id,
            capacity,
            fill: 0,
            location: location.into(),
            node,
            status: BinStatus::Empty,
            reported: false,
        })
    }

    pub fn id(&self) -> BinId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn fill(&self) -> u32 {
        self.fill
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn status(&self) -> BinStatus {
        self.status
    }

    /// Whether someone reported this bin overflowing since it was last emptied.
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Fill level as a whole percentage, rounded down.
    pub fn urgency(&self) -> u32 {
        fill_percentage(self.fill, self.capacity)
    }

    /// Add `delta` to the fill level (clamped at capacity) and recompute the
    /// status. A bin that ends up urgent is upserted into `queue` once.
    ///
    /// A bin that is waiting for its driver keeps its `Collected` status and
    /// is not queued again.
    pub fn apply_fill_increment(&mut self, delta: u32, queue: &mut BinQueue) -> Result<BinStatus> {
        self.fill = self.fill.saturating_add(delta).min(self.capacity);

        if self.status == BinStatus::Collected {
            return Ok(self.status);
        }

        self.status = self.derive_status();
        if self.status == BinStatus::Urgent {
            queue.update_priority(self)?;
        }
        Ok(self.status)
    }

    /// Flag an overflow reported from outside the fill sensor. The bin stays
    /// `Urgent` until it is emptied, queued at its current urgency. A bin
    /// the truck has already reached is left alone.
    pub fn report_overflow(&mut self, queue: &mut BinQueue) -> Result<BinStatus> {
        if self.status == BinStatus::Collected {
            return Ok(self.status);
        }

        self.reported = true;
        self.status = BinStatus::Urgent;
        queue.update_priority(self)?;
        info!("Bin {} [{}] reported overflowing", self.id, self.location);
        Ok(self.status)
    }

    /// Empty the bin and drop it from `queue`. Returns `false` when the bin
    /// was already empty and untracked.
    pub fn collect(&mut self, queue: &mut BinQueue) -> bool {
        let was_tracked = queue.remove(self.id).is_some();
        let changed = was_tracked || self.fill > 0 || self.status != BinStatus::Empty;

        self.fill = 0;
        self.reported = false;
        self.status = BinStatus::Empty;

        if changed {
            info!("Bin {} [{}] emptied", self.id, self.location);
        }
        changed
    }

    pub fn mark_collected(&mut self) {
        debug!("Bin {} awaiting pickup", self.id);
        self.status = BinStatus::Collected;
    }

    pub fn snapshot(&self) -> BinSnapshot {
        BinSnapshot {
            id: self.id,
            location: self.location.clone(),
            current_fill: self.fill,
            capacity: self.capacity,
            status: self.status,
        }
    }

    fn derive_status(&self) -> BinStatus {
        if self.reported {
            BinStatus::Urgent
        } else if self.fill == 0 {
            BinStatus::Empty
        } else if self.fill == self.capacity || self.urgency() >= URGENT_THRESHOLD {
            BinStatus::Urgent
        } else {
            BinStatus::Filling
        }
    }

    #[cfg(test)]
    pub(crate) fn set_fill(&mut self, fill: u32) {
        self.fill = fill.min(self.capacity);
        self.status = self.derive_status();
    }
}

/// Owner of every bin in a simulation, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct BinRegistry {
    bins: BTreeMap<BinId, Bin>,
}

impl BinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, bin: Bin) -> Result<()> {
        if self.bins.contains_key(&bin.id()) {
            return Err(DispatchError::DuplicateBin(bin.id()));
        }
        self.bins.insert(bin.id(), bin);
        Ok(())
    }

    pub fn get(&self, id: BinId) -> Result<&Bin> {
        self.bins.get(&id).ok_or(DispatchError::UnknownBin(id))
    }

    pub fn get_mut(&mut self, id: BinId) -> Result<&mut Bin> {
        self.bins.get_mut(&id).ok_or(DispatchError::UnknownBin(id))
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bin> {
        self.bins.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bin> {
        self.bins.values_mut()
    }

    pub fn report_overflow(&mut self, id: BinId, queue: &mut BinQueue) -> Result<BinStatus> {
        self.get_mut(id)?.report_overflow(queue)
    }

    /// The "bin emptied" signal.
    pub fn collect(&mut self, id: BinId, queue: &mut BinQueue) -> Result<bool> {
        Ok(self.get_mut(id)?.collect(queue))
    }

    pub fn snapshots(&self) -> Vec<BinSnapshot> {
        self.bins.values().map(Bin::snapshot).collect()
    }
}
