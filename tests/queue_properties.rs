use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waste_dispatch::domain::bin::Bin;
use waste_dispatch::domain::types::{BinId, BinStatus};
use waste_dispatch::priority::BinQueue;
use waste_dispatch::DispatchError;

const BIN_COUNT: u32 = 30;

fn assert_heap(queue: &BinQueue) {
    let entries = queue.peek_all();
    for (i, &(bin, priority)) in entries.iter().enumerate().skip(1) {
        let (parent, parent_priority) = entries[(i - 1) / 2];
        assert!(
            parent_priority >= priority,
            "bin {parent} ({parent_priority}) sits above bin {bin} ({priority})"
        );
    }
    let unique: HashSet<BinId> = entries.iter().map(|&(bin, _)| bin).collect();
    assert_eq!(unique.len(), entries.len(), "duplicate bin in {entries:?}");
}

fn drain(queue: &mut BinQueue) -> Vec<u32> {
    let mut order = Vec::new();
    while let Ok(entry) = queue.pop_max() {
        order.push(entry.priority);
    }
    order
}

#[test]
fn random_fill_collect_and_pop_keep_the_heap_valid() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut queue = BinQueue::new();
    let mut bins: Vec<Bin> = (1..=BIN_COUNT)
        .map(|id| Bin::new(id, 100, format!("Sector {id}"), 1).unwrap())
        .collect();
    let mut expected: HashMap<BinId, u32> = HashMap::new();

    for _ in 0..3000 {
        let bin = &mut bins[rng.gen_range(0..BIN_COUNT as usize)];
        match rng.gen_range(0..10) {
            0..=5 => {
                let status = bin.apply_fill_increment(rng.gen_range(0..=25), &mut queue).unwrap();
                if status == BinStatus::Urgent {
                    expected.insert(bin.id(), bin.urgency());
                }
            }
            6 | 7 => {
                bin.collect(&mut queue);
                expected.remove(&bin.id());
            }
            _ => match queue.pop_max() {
                Ok(top) => {
                    assert_eq!(expected.values().max(), Some(&top.priority));
                    assert_eq!(expected.remove(&top.bin), Some(top.priority));
                }
                Err(e) => {
                    assert_eq!(e, DispatchError::Empty);
                    assert!(expected.is_empty());
                }
            },
        }

        assert_heap(&queue);
        assert_eq!(queue.len(), expected.len());
        for (&bin, &priority) in &expected {
            assert_eq!(queue.priority_of(bin), Some(priority));
        }
    }
}

#[test]
fn draining_yields_non_increasing_priorities() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut queue = BinQueue::new();
    for id in 1..=BIN_COUNT {
        let mut bin = Bin::new(id, 100, format!("Sector {id}"), 1).unwrap();
        bin.apply_fill_increment(rng.gen_range(70..=100), &mut queue).unwrap();
    }

    let order = drain(&mut queue);
    assert_eq!(order.len(), BIN_COUNT as usize);
    assert!(order.windows(2).all(|w| w[0] >= w[1]), "{order:?}");
    assert_eq!(queue.pop_max(), Err(DispatchError::Empty));
}

#[test]
fn bounded_queue_rejects_overflow_but_allows_updates() {
    let mut queue = BinQueue::with_capacity(2);
    let mut scratch = BinQueue::new();
    let mut bins: Vec<Bin> = (1..=3)
        .map(|id| {
            let mut bin = Bin::new(id, 100, format!("Sector {id}"), 1).unwrap();
            bin.apply_fill_increment(70 + id * 5, &mut scratch).unwrap();
            bin
        })
        .collect();

    queue.insert(&bins[0]).unwrap();
    queue.insert(&bins[1]).unwrap();
    assert_eq!(
        queue.insert(&bins[2]),
        Err(DispatchError::CapacityExceeded { capacity: 2 })
    );

    bins[0].apply_fill_increment(20, &mut queue).unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.peek().map(|e| (e.bin, e.priority)), Some((1, 95)));
}
