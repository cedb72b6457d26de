//! Snapshot artifact persistence.
//!
//! One JSON and one CSV file per target block, both written atomically
//! (temp file + rename) so an interrupted run never leaves a partial
//! artifact. The JSON file doubles as the run's completion marker: its
//! existence is what makes a rerun for the same block a no-op, so it is
//! written last.

use std::path::{Path, PathBuf};

use llamas::ownership::OwnershipTable;

use crate::error::SnapshotError;

/// Path of the JSON artifact (and completion marker) for `block`.
#[must_use]
pub fn json_path(dir: &Path, block: u64) -> PathBuf {
    dir.join(format!("Snapshot_{block}.json"))
}

/// Path of the CSV artifact for `block`.
#[must_use]
pub fn csv_path(dir: &Path, block: u64) -> PathBuf {
    dir.join(format!("Snapshot_{block}.csv"))
}

/// Returns the existing JSON artifact for `block`, if one was already
/// written by a prior run.
#[must_use]
pub fn existing_snapshot(dir: &Path, block: u64) -> Option<PathBuf> {
    let path = json_path(dir, block);
    path.exists().then_some(path)
}

/// Write both artifacts for `block` in the table's current order.
///
/// CSV first, then JSON, each via temp file + rename; only once the JSON
/// lands is the snapshot considered complete.
///
/// # Errors
///
/// Returns an error on any I/O or serialization failure. The final paths
/// are never left half-written.
pub fn write_artifacts(
    dir: &Path,
    block: u64,
    table: &OwnershipTable,
) -> Result<(), SnapshotError> {
    std::fs::create_dir_all(dir)?;
    write_csv(&csv_path(dir, block), table)?;
    write_json(&json_path(dir, block), table)?;
    Ok(())
}

/// `{ "<address>": {"unlocked": n, "locked": n}, ... }`, pretty-printed,
/// keys in table order.
fn write_json(path: &Path, table: &OwnershipTable) -> Result<(), SnapshotError> {
    let mut map = serde_json::Map::with_capacity(table.len());
    for (address, counts) in table.iter() {
        map.insert(address.to_string(), serde_json::to_value(counts)?);
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(&map)?.as_bytes())?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// `address,unlocked,locked` rows in table order.
fn write_csv(path: &Path, table: &OwnershipTable) -> Result<(), SnapshotError> {
    let tmp = path.with_extension("csv.tmp");

    let mut writer = csv::Writer::from_path(&tmp)?;
    writer.write_record(["address", "unlocked", "locked"])?;
    for (address, counts) in table.iter() {
        writer.write_record([
            address.to_string(),
            counts.unlocked.to_string(),
            counts.locked.to_string(),
        ])?;
    }
    writer.flush()?;
    drop(writer);

    std::fs::rename(&tmp, path)?;
    Ok(())
}
