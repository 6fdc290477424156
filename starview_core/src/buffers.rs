//! Render buffer construction - the star catalog as parallel GPU-ready
//! arrays.
//!
//! For `n` stars the buffer holds `3n` position floats, `3n` color floats
//! and `n` sizes, indexed identically to the input sequence. The buffer is
//! rebuilt wholesale whenever the catalog changes and is immutable
//! afterwards; consumers share it through an `Arc` so a rebuild is an atomic
//! swap, never an in-place mutation.

use crate::catalog::StarRecord;
use crate::photometry::{classify_color, point_size, MIN_POINT_SIZE};
use std::sync::Arc;

/// Parallel position/color/size arrays for the whole catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    /// Interleaved [x0, y0, z0, x1, y1, z1, ...]
    pub positions: Vec<f32>,

    /// Interleaved [r0, g0, b0, r1, g1, b1, ...], channels in 0..1
    pub colors: Vec<f32>,

    /// One point size per star
    pub sizes: Vec<f32>,
}

impl RenderBuffer {
    /// Builds the full buffer from the catalog in input order.
    ///
    /// Stars with no recorded magnitude render at the minimum point size.
    pub fn build(stars: &[StarRecord]) -> Self {
        let mut positions = Vec::with_capacity(stars.len() * 3);
        let mut colors = Vec::with_capacity(stars.len() * 3);
        let mut sizes = Vec::with_capacity(stars.len());

        for star in stars {
            positions.push(star.x as f32);
            positions.push(star.y as f32);
            positions.push(star.z as f32);

            let [r, g, b] = classify_color(star.bp_rp).rgb();
            colors.push(r);
            colors.push(g);
            colors.push(b);

            sizes.push(
                star.phot_g_mean_mag
                    .map(point_size)
                    .unwrap_or(MIN_POINT_SIZE),
            );
        }

        Self {
            positions,
            colors,
            sizes,
        }
    }

    /// Builds a shared buffer for read-only handoff to the render surface.
    pub fn build_shared(stars: &[StarRecord]) -> Arc<Self> {
        Arc::new(Self::build(stars))
    }

    /// Number of stars in the buffer.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Position of star `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[3 * i],
            self.positions[3 * i + 1],
            self.positions[3 * i + 2],
        ]
    }

    /// Color of star `i`.
    pub fn color(&self, i: usize) -> [f32; 3] {
        [
            self.colors[3 * i],
            self.colors[3 * i + 1],
            self.colors[3 * i + 2],
        ]
    }
}
