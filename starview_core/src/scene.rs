//! Annotation data exposed to the rendering surface, and the seam the
//! renderer plugs into.
//!
//! The data layer never draws; it hands immutable snapshots (the render
//! buffer, cluster markers, the current highlight) to a [`SceneSink`]
//! implementation. Anything with a screen - or a recording stream - lives
//! behind that trait.

use crate::buffers::RenderBuffer;
use crate::catalog::{AnalysisArtifact, StarRecord};
use nalgebra::Vector3;
use std::collections::HashMap;

/// Per-cluster annotation for the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMarker {
    pub id: i64,

    /// Cluster centroid, parsecs
    pub pos: Vector3<f64>,

    /// Unit direction of the cluster's mean velocity; zero when the
    /// velocity itself is zero
    pub vel_dir: Vector3<f64>,

    /// Number of tidal-tail candidates flagged by the analysis
    pub tail_count: usize,

    pub label: String,
}

/// Builds one marker per cluster, in sequence order.
pub fn markers(analysis: &AnalysisArtifact) -> Vec<ClusterMarker> {
    analysis
        .clusters
        .iter()
        .map(|cluster| {
            let vel = Vector3::from(cluster.vel);
            ClusterMarker {
                id: cluster.id,
                pos: Vector3::from(cluster.pos),
                vel_dir: vel.try_normalize(0.0).unwrap_or_else(Vector3::zeros),
                tail_count: cluster.tail_members.len(),
                label: format!("Cluster {}", cluster.id),
            }
        })
        .collect()
}

/// Resolves the analysis' runaway star ids to catalog positions.
///
/// Ids with no catalog row are skipped; the annotation layer can only
/// place what it can position.
pub fn resolve_runaways(
    analysis: &AnalysisArtifact,
    stars: &[StarRecord],
) -> Vec<(u64, Vector3<f64>)> {
    let by_id: HashMap<u64, &StarRecord> =
        stars.iter().map(|star| (star.source_id, star)).collect();
    analysis
        .runaways
        .iter()
        .filter_map(|id| {
            by_id
                .get(id)
                .map(|star| (*id, Vector3::new(star.x, star.y, star.z)))
        })
        .collect()
}

/// A consumer of immutable scene snapshots.
///
/// The pipeline pushes full snapshots; implementations must not retain
/// mutable access between calls.
pub trait SceneSink {
    /// Replaces the rendered starfield with a freshly built buffer.
    fn submit_stars(&mut self, buffer: &RenderBuffer) -> Result<(), Box<dyn std::error::Error>>;

    /// Replaces the cluster annotations.
    fn submit_markers(&mut self, markers: &[ClusterMarker])
        -> Result<(), Box<dyn std::error::Error>>;

    /// Moves the selection highlight; `None` clears it.
    fn highlight(
        &mut self,
        marker: Option<&ClusterMarker>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
