pub mod engine;
pub mod runner;

pub use engine::{DriverAction, Simulation, StepReport};
pub use runner::{run, run_with};
