pub mod bin;
pub mod types;
