pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod priority;
pub mod reporting;
pub mod routing;
pub mod simulation;
pub mod utils;

pub use error::{DispatchError, Result};
