use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::constant::MAX_BINS;
use crate::domain::bin::Bin;
use crate::domain::types::BinId;
use crate::error::{DispatchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub bin: BinId,
    pub priority: u32,
}

/// Max-heap of bins keyed by urgency.
///
/// Entries refer to bins by id only; `slots` maps every tracked id to its
/// current array index and is kept in step with each swap, so update and
/// removal by identity are O(log n).
#[derive(Debug, Clone)]
pub struct BinQueue {
    entries: Vec<QueueEntry>,
    slots: HashMap<BinId, usize>,
    capacity: usize,
}

impl Default for BinQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl BinQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BINS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BinQueue {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, bin: BinId) -> bool {
        self.slots.contains_key(&bin)
    }

    pub fn priority_of(&self, bin: BinId) -> Option<u32> {
        self.slots.get(&bin).map(|&slot| self.entries[slot].priority)
    }

    pub fn peek(&self) -> Option<QueueEntry> {
        self.entries.first().copied()
    }

    /// Track `bin` at its current urgency. A bin that is already tracked
    /// takes the update path instead.
    pub fn insert(&mut self, bin: &Bin) -> Result<()> {
        if self.contains(bin.id()) {
            return self.update_priority(bin);
        }
        if self.entries.len() >= self.capacity {
            warn!("Queue full, cannot add bin {}", bin.id());
            return Err(DispatchError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let slot = self.entries.len();
        self.entries.push(QueueEntry {
            bin: bin.id(),
            priority: bin.urgency(),
        });
        self.slots.insert(bin.id(), slot);
        self.sift_up(slot);

        debug!("Queued bin {} at priority {}", bin.id(), bin.urgency());
        Ok(())
    }

    pub fn pop_max(&mut self) -> Result<QueueEntry> {
        let top = self.take_slot(0).ok_or(DispatchError::Empty)?;
        trace!("Popped bin {} (priority {})", top.bin, top.priority);
        Ok(top)
    }

    /// Re-derive the priority of `bin` and repair the heap in whichever
    /// direction the change requires. Untracked bins are inserted.
    pub fn update_priority(&mut self, bin: &Bin) -> Result<()> {
        let Some(&slot) = self.slots.get(&bin.id()) else {
            return self.insert(bin);
        };

        let old = self.entries[slot].priority;
        self.entries[slot].priority = bin.urgency();
        self.restore(slot);

        trace!("Bin {} priority {} -> {}", bin.id(), old, bin.urgency());
        Ok(())
    }

    /// Evict `bin` wherever it sits in the heap. No-op when it is not tracked.
    pub fn remove(&mut self, bin: BinId) -> Option<QueueEntry> {
        let slot = *self.slots.get(&bin)?;
        let removed = self.take_slot(slot)?;
        debug!("Removed bin {} from queue", bin);
        Some(removed)
    }

    /// (bin, priority) pairs in array order. Not sorted by priority.
    pub fn peek_all(&self) -> Vec<(BinId, u32)> {
        self.entries.iter().map(|e| (e.bin, e.priority)).collect()
    }

    fn take_slot(&mut self, slot: usize) -> Option<QueueEntry> {
        let last = self.entries.len().checked_sub(1)?;
        self.swap_entries(slot, last);

        let taken = self.entries.pop()?;
        self.slots.remove(&taken.bin);

        if slot < self.entries.len() {
            self.restore(slot);
        }
        Some(taken)
    }

    fn restore(&mut self, slot: usize) {
        if slot > 0 && self.entries[slot].priority > self.entries[(slot - 1) / 2].priority {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].priority > self.entries[parent].priority {
                self.swap_entries(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    // Equal children resolve to the left one.
    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = 2 * slot + 2;
            let mut largest = slot;

            if left < len && self.entries[left].priority > self.entries[largest].priority {
                largest = left;
            }
            if right < len && self.entries[right].priority > self.entries[largest].priority {
                largest = right;
            }

            if largest == slot {
                break;
            }
            self.swap_entries(slot, largest);
            slot = largest;
        }
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].bin, a);
        self.slots.insert(self.entries[b].bin, b);
    }
}
