//! Rerun-backed scene sink.
//!
//! This module is the thin adapter between the data layer and an actual
//! rendering surface: it pushes render-buffer and marker snapshots into a
//! Rerun viewer. Enable with the `visualization` feature flag.

use crate::buffers::RenderBuffer;
use crate::scene::{ClusterMarker, SceneSink};
use rerun::{RecordingStream, RecordingStreamBuilder};

/// Velocity arrow length in scene units (parsecs).
const VELOCITY_ARROW_LENGTH: f32 = 50.0;

/// Rerun-based renderer adapter for the star catalog scene.
pub struct RerunSceneSink {
    rec: RecordingStream,
}

impl RerunSceneSink {
    /// Creates a sink that spawns the Rerun viewer.
    pub fn new(app_id: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let rec = RecordingStreamBuilder::new(app_id).spawn()?;

        rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP())?;

        Ok(Self { rec })
    }

    /// Creates a sink that saves to a file (for later replay).
    pub fn new_to_file(app_id: &str, path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let rec = RecordingStreamBuilder::new(app_id).save(path)?;

        rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP())?;

        Ok(Self { rec })
    }
}

impl SceneSink for RerunSceneSink {
    fn submit_stars(&mut self, buffer: &RenderBuffer) -> Result<(), Box<dyn std::error::Error>> {
        let positions: Vec<[f32; 3]> = buffer
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let colors: Vec<[u8; 4]> = buffer
            .colors
            .chunks_exact(3)
            .map(|c| {
                [
                    (c[0] * 255.0) as u8,
                    (c[1] * 255.0) as u8,
                    (c[2] * 255.0) as u8,
                    204, // Slightly transparent, like the original material
                ]
            })
            .collect();

        self.rec.log(
            "world/stars",
            &rerun::Points3D::new(positions)
                .with_colors(colors)
                .with_radii(buffer.sizes.clone()),
        )?;

        Ok(())
    }

    fn submit_markers(
        &mut self,
        markers: &[ClusterMarker],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for marker in markers {
            let path = format!("world/clusters/{}", marker.id);
            let pos = [
                marker.pos.x as f32,
                marker.pos.y as f32,
                marker.pos.z as f32,
            ];

            // Core marker sphere
            self.rec.log(
                format!("{}/core", path),
                &rerun::Points3D::new([pos])
                    .with_colors([[255, 105, 180, 80]]) // Hot pink, translucent
                    .with_radii([5.0])
                    .with_labels([marker.label.as_str()]),
            )?;

            // Mean velocity direction (scaled for visibility)
            if marker.vel_dir.norm() > 0.0 {
                self.rec.log(
                    format!("{}/velocity", path),
                    &rerun::Arrows3D::from_vectors([[
                        marker.vel_dir.x as f32 * VELOCITY_ARROW_LENGTH,
                        marker.vel_dir.y as f32 * VELOCITY_ARROW_LENGTH,
                        marker.vel_dir.z as f32 * VELOCITY_ARROW_LENGTH,
                    ]])
                    .with_origins([pos])
                    .with_colors([[0, 255, 255, 255]]), // Cyan
                )?;
            }

            if marker.tail_count > 0 {
                self.rec.log(
                    format!("{}/tails", path),
                    &rerun::TextLog::new(format!(
                        "{}: {} tail candidates",
                        marker.label, marker.tail_count
                    )),
                )?;
            }
        }

        Ok(())
    }

    fn highlight(
        &mut self,
        marker: Option<&ClusterMarker>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let points = match marker {
            Some(marker) => vec![[
                marker.pos.x as f32,
                marker.pos.y as f32,
                marker.pos.z as f32,
            ]],
            None => vec![],
        };

        self.rec.log(
            "world/highlight",
            &rerun::Points3D::new(points)
                .with_colors([[255, 105, 180, 200]])
                .with_radii([8.0]),
        )?;

        Ok(())
    }
}
