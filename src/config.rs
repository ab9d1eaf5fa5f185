use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use thiserror::Error;
use tracing::{debug, info};

pub mod constant {
    pub const MAX_NODES: usize = 100;
    pub const MAX_BINS: usize = 100;
    /// Largest accepted edge weight. A path of `MAX_NODES` such edges still fits in a `u64`.
    pub const MAX_EDGE_WEIGHT: u64 = u64::MAX / MAX_NODES as u64;
    pub const URGENT_THRESHOLD: u32 = 70;
    pub const DEPOT_NODE: usize = 0;
    pub const TRUCK_ID: u32 = 1;
    pub const TRUCK_CAPACITY: u32 = 3;
    pub const SEED: u64 = 12345;
    pub const STEPS: usize = 40;
    pub const DISPATCHES_PER_STEP: usize = 2;
    pub const MAX_FILL_INCREMENT: u32 = 20;
    pub const ROUTE_LOG_PATH: &str = "route_output.json";
    pub const BIN_STATUS_CSV_PATH: &str = "bin_status.csv";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings for a simulation run. Defaults come from [`constant`],
/// any of them can be overridden through the environment (or a `.env` file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub steps: usize,
    pub seed: u64,
    pub truck_capacity: u32,
    pub dispatches_per_step: usize,
    pub depot: usize,
    pub network_path: Option<String>,
    pub route_log_path: String,
    pub bin_status_path: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: constant::STEPS,
            seed: constant::SEED,
            truck_capacity: constant::TRUCK_CAPACITY,
            dispatches_per_step: constant::DISPATCHES_PER_STEP,
            depot: constant::DEPOT_NODE,
            network_path: None,
            route_log_path: constant::ROUTE_LOG_PATH.to_string(),
            bin_status_path: constant::BIN_STATUS_CSV_PATH.to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            steps: parse_var("WASTE_SIM_STEPS")?.unwrap_or(defaults.steps),
            seed: parse_var("WASTE_SIM_SEED")?.unwrap_or(defaults.seed),
            truck_capacity: parse_var("WASTE_SIM_TRUCK_CAPACITY")?
                .unwrap_or(defaults.truck_capacity),
            dispatches_per_step: parse_var("WASTE_SIM_DISPATCHES_PER_STEP")?
                .unwrap_or(defaults.dispatches_per_step),
            depot: defaults.depot,
            network_path: env::var("WASTE_SIM_NETWORK").ok(),
            route_log_path: env::var("WASTE_SIM_ROUTE_LOG").unwrap_or(defaults.route_log_path),
            bin_status_path: env::var("WASTE_SIM_BIN_STATUS")
                .unwrap_or(defaults.bin_status_path),
        };

        info!(
            "Loaded simulation config: {} steps, seed {}, truck capacity {}",
            config.steps, config.seed, config.truck_capacity
        );
        debug!("{:?}", config);
        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.steps, constant::STEPS);
        assert_eq!(config.truck_capacity, constant::TRUCK_CAPACITY);
        assert_eq!(config.depot, constant::DEPOT_NODE);
        assert!(config.network_path.is_none());
    }

    #[test]
    fn unparsable_value_is_reported() {
        env::set_var("WASTE_SIM_TEST_ONLY_STEPS", "many");
        let parsed: Result<Option<usize>, _> = parse_var("WASTE_SIM_TEST_ONLY_STEPS");
        assert!(matches!(
            parsed,
            Err(ConfigError::InvalidValue { key: "WASTE_SIM_TEST_ONLY_STEPS", .. })
        ));
        env::remove_var("WASTE_SIM_TEST_ONLY_STEPS");
    }

    #[test]
    fn missing_value_falls_back() {
        let parsed: Option<u64> = parse_var("WASTE_SIM_TEST_ONLY_UNSET").unwrap();
        assert_eq!(parsed, None);
    }
}
