pub mod queue;

pub use queue::{BinQueue, QueueEntry};
