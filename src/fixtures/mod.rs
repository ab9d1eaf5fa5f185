pub mod data_generator;

pub use data_generator::{demo_bins, demo_network, FillSource, RandomFill, ScriptedFill};
