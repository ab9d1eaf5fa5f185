use std::path::Path;

use colored::*;
use csv::Writer;
use tracing::info;

use crate::dispatch::route_log::ExportError;
use crate::domain::types::{BinId, BinSnapshot, BinStatus};

/// `Bin 3 [Sector 3]: 72/100 filled (URGENT)`, coloured by status.
pub fn bin_status_line(bin: &BinSnapshot) -> String {
    let status = match bin.status {
        BinStatus::Empty => bin.status.to_string().normal(),
        BinStatus::Filling => bin.status.to_string().yellow(),
        BinStatus::Urgent => bin.status.to_string().red().bold(),
        BinStatus::Collected => bin.status.to_string().green(),
    };
    format!(
        "Bin {} [{}]: {}/{} filled ({})",
        bin.id, bin.location, bin.current_fill, bin.capacity, status
    )
}

pub fn queue_lines(entries: &[(BinId, u32)]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["Queue is empty, no bins to collect.".to_string()];
    }
    let mut lines = vec![format!("Current queue (size={}):", entries.len())];
    lines.extend(
        entries
            .iter()
            .map(|(bin, priority)| format!("  Bin {} -> {}% filled", bin, priority)),
    );
    lines
}

/// Write `id,location,current_fill,capacity,status` rows.
pub fn write_bin_status_csv(bins: &[BinSnapshot], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path)?;
    for bin in bins {
        wtr.serialize(bin)?;
    }
    wtr.flush()?;

    info!("Wrote status of {} bins to {}", bins.len(), path.display());
    Ok(())
}
