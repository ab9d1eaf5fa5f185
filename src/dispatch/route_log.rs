use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::types::{NodeId, TruckId};
use crate::routing::shortest_path::Route;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One truck movement, either to a bin or back to the depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub truck_id: TruckId,
    pub target_node: NodeId,
    pub distance: u64,
    pub path: String,
}

impl RouteRecord {
    pub fn new(truck_id: TruckId, route: &Route) -> Self {
        RouteRecord {
            truck_id,
            target_node: route.target,
            distance: route.distance,
            path: route.display_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLog {
    pub routes: Vec<RouteRecord>,
    pub total_distance: u64,
}

impl RouteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, truck_id: TruckId, route: &Route) {
        self.total_distance += route.distance;
        self.routes.push(RouteRecord::new(truck_id, route));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(
            "Exported {} routes ({} total distance) to {}",
            self.routes.len(),
            self.total_distance,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn route(target: NodeId, distance: u64, path: Vec<NodeId>) -> Route {
        Route {
            target,
            distance,
            path,
        }
    }

    #[test]
    fn records_accumulate_distance() {
        let mut log = RouteLog::new();
        log.record(1, &route(3, 8, vec![0, 2, 1, 3]));
        log.record(1, &route(0, 8, vec![3, 1, 2, 0]));

        assert_eq!(log.total_distance, 16);
        assert_eq!(log.routes[0].path, "0 -> 2 -> 1 -> 3");
        assert_eq!(log.routes[1].target_node, 0);
    }

    #[test]
    fn json_has_expected_shape() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("routes.json");

        let mut log = RouteLog::new();
        log.record(1, &route(4, 11, vec![0, 2, 1, 3, 4]));
        log.write_json(&file).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(value["total_distance"], 11);
        assert_eq!(value["routes"][0]["truck_id"], 1);
        assert_eq!(value["routes"][0]["target_node"], 4);
        assert_eq!(value["routes"][0]["distance"], 11);
        assert_eq!(value["routes"][0]["path"], "0 -> 2 -> 1 -> 3 -> 4");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing").join("routes.json");
        assert!(matches!(RouteLog::new().write_json(file), Err(ExportError::Io(_))));
    }
}
