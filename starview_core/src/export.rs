//! CSV export of the diagnostic point set.
//!
//! Mirrors the download offered next to the HR diagram: a
//! `source_id,bp_rp,abs_mag` table named after the selected cluster.
//! Exporting an empty point set is a no-op, not an error.

use crate::membership::DiagnosticPoint;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Renders the diagnostic points as a CSV table.
///
/// Returns `None` for an empty point set.
pub fn csv_table(points: &[DiagnosticPoint]) -> Option<String> {
    if points.is_empty() {
        return None;
    }
    let mut table = String::from("source_id,bp_rp,abs_mag");
    for point in points {
        // Infallible for String
        let _ = write!(
            table,
            "\n{},{},{}",
            point.source_id, point.color_index, point.abs_mag
        );
    }
    Some(table)
}

/// Download filename for a cluster's diagnostic table.
pub fn export_file_name(cluster_id: i64) -> String {
    format!("cluster_{}_data.csv", cluster_id)
}

/// Writes the CSV table into `dir`, named by [`export_file_name`].
///
/// Returns the written path, or `None` without touching the filesystem
/// when the point set is empty.
pub fn write_csv(
    dir: &Path,
    cluster_id: i64,
    points: &[DiagnosticPoint],
) -> std::io::Result<Option<PathBuf>> {
    let Some(table) = csv_table(points) else {
        return Ok(None);
    };
    let path = dir.join(export_file_name(cluster_id));
    let mut file = File::create(&path)?;
    file.write_all(table.as_bytes())?;
    Ok(Some(path))
}
