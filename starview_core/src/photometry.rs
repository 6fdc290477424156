//! Derived photometric metrics - pure functions from star records to
//! visual/physical quantities.
//!
//! All inputs are defaulted rather than validated: missing or degenerate
//! photometry degrades to a displayable value, it never errors.

/// Color index assumed when `bp_rp` is missing from the catalog.
pub const DEFAULT_BP_RP: f64 = 1.0;

/// Parallax substituted for zero/negative/missing values (milliarcseconds).
///
/// Maps to a 1 Mpc distance: very large but finite, so the star keeps a
/// well-defined absolute magnitude instead of being dropped.
pub const FALLBACK_PARALLAX_MAS: f64 = 0.001;

/// Floor for rendered point sizes, regardless of how faint the source.
pub const MIN_POINT_SIZE: f32 = 0.1;

/// Temperature bucket for starfield tinting, derived from the Bp-Rp color
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBucket {
    /// Hot: `bp_rp < 0.5`
    Blue,
    /// White/yellow: `0.5 <= bp_rp < 1.0`
    Neutral,
    /// Cool: `bp_rp >= 1.0`
    Red,
}

/// Buckets a color index for the starfield palette.
///
/// Missing values default to [`DEFAULT_BP_RP`]. The boundaries are
/// half-open: `0.5` is Neutral, `1.0` is Red.
pub fn classify_color(bp_rp: Option<f64>) -> ColorBucket {
    let bp_rp = bp_rp.unwrap_or(DEFAULT_BP_RP);
    if bp_rp < 0.5 {
        ColorBucket::Blue
    } else if bp_rp < 1.0 {
        ColorBucket::Neutral
    } else {
        ColorBucket::Red
    }
}

impl ColorBucket {
    /// RGB tint (0..1 per channel) for this bucket.
    ///
    /// The palette is defined in HSL: Blue (0.6, 1, 0.8),
    /// Neutral (0.1, 1, 0.9), Red (0.05, 1, 0.6).
    pub fn rgb(self) -> [f32; 3] {
        match self {
            ColorBucket::Blue => hsl_to_rgb(0.6, 1.0, 0.8),
            ColorBucket::Neutral => hsl_to_rgb(0.1, 1.0, 0.9),
            ColorBucket::Red => hsl_to_rgb(0.05, 1.0, 0.6),
        }
    }
}

/// Cell color for the HR-diagram scatter plot.
///
/// This is a second, independent bucketing with looser thresholds (0.8 and
/// 1.5) than the starfield tint. The two schemes are intentionally kept
/// separate; consumers rely on each verbatim.
pub fn diagram_cell_rgb(bp_rp: f64) -> [u8; 3] {
    if bp_rp < 0.8 {
        [0xaa, 0xdd, 0xff]
    } else if bp_rp > 1.5 {
        [0xff, 0xaa, 0x88]
    } else {
        [0xff, 0xff, 0xaa]
    }
}

/// Rendered point size for an apparent magnitude: brighter (lower mag)
/// means bigger, floored at [`MIN_POINT_SIZE`].
pub fn point_size(apparent_mag: f64) -> f32 {
    (((15.0 - apparent_mag) * 0.5) as f32).max(MIN_POINT_SIZE)
}

/// Absolute magnitude from apparent magnitude and parallax.
///
/// Distance is `1000 / parallax` parsecs (milliarcsecond parallax), then
/// `M = m + 5 - 5 log10(d)`. Zero, negative, non-finite, or missing
/// parallaxes substitute [`FALLBACK_PARALLAX_MAS`], so the result is finite
/// for every finite apparent magnitude.
pub fn absolute_magnitude(apparent_mag: f64, parallax_mas: Option<f64>) -> f64 {
    let parallax = match parallax_mas {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => FALLBACK_PARALLAX_MAS,
    };
    let dist_pc = 1000.0 / parallax;
    apparent_mag + 5.0 - 5.0 * dist_pc.log10()
}

/// HSL to RGB, all components in 0..1.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_color_buckets_partition_domain() {
        assert_eq!(classify_color(Some(-0.3)), ColorBucket::Blue);
        assert_eq!(classify_color(Some(0.49)), ColorBucket::Blue);
        assert_eq!(classify_color(Some(0.5)), ColorBucket::Neutral);
        assert_eq!(classify_color(Some(0.99)), ColorBucket::Neutral);
        assert_eq!(classify_color(Some(1.0)), ColorBucket::Red);
        assert_eq!(classify_color(Some(3.0)), ColorBucket::Red);
    }

    #[test]
    fn test_missing_color_defaults_to_red() {
        // Default index 1.0 lands exactly on the Red boundary
        assert_eq!(classify_color(None), ColorBucket::Red);
    }

    #[test]
    fn test_bucket_palette() {
        let [r, g, b] = ColorBucket::Blue.rgb();
        assert_relative_eq!(r, 0.6, epsilon = 1e-5);
        assert_relative_eq!(g, 0.76, epsilon = 1e-5);
        assert_relative_eq!(b, 1.0, epsilon = 1e-5);

        let [r, g, b] = ColorBucket::Red.rgb();
        assert_relative_eq!(r, 1.0, epsilon = 1e-5);
        assert_relative_eq!(g, 0.44, epsilon = 1e-5);
        assert_relative_eq!(b, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_diagram_cells_use_looser_thresholds() {
        assert_eq!(diagram_cell_rgb(0.79), [0xaa, 0xdd, 0xff]);
        assert_eq!(diagram_cell_rgb(0.8), [0xff, 0xff, 0xaa]);
        assert_eq!(diagram_cell_rgb(1.5), [0xff, 0xff, 0xaa]);
        assert_eq!(diagram_cell_rgb(1.51), [0xff, 0xaa, 0x88]);
    }

    #[test]
    fn test_point_size_floor() {
        assert_relative_eq!(point_size(5.0), 5.0);
        assert_relative_eq!(point_size(14.8), MIN_POINT_SIZE);
        // Fainter than the zero-size magnitude still renders
        assert_relative_eq!(point_size(15.0), MIN_POINT_SIZE);
        assert_relative_eq!(point_size(20.0), MIN_POINT_SIZE);
    }

    #[test]
    fn test_absolute_magnitude_example() {
        // m=10, parallax=2 mas -> d=500 pc -> M ~ 1.505
        let m = absolute_magnitude(10.0, Some(2.0));
        assert_relative_eq!(m, 1.50515, epsilon = 1e-4);
    }

    #[test]
    fn test_absolute_magnitude_degenerate_parallax() {
        // Fallback parallax of 0.001 mas -> d = 10^6 pc -> M = m - 25
        for parallax in [None, Some(0.0), Some(-1.3), Some(f64::NAN)] {
            let m = absolute_magnitude(10.0, parallax);
            assert!(m.is_finite());
            assert_relative_eq!(m, -15.0, epsilon = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_point_size_has_positive_floor(mag in -50.0f64..50.0) {
            prop_assert!(point_size(mag) >= MIN_POINT_SIZE);
        }

        #[test]
        fn prop_absolute_magnitude_finite_for_invalid_parallax(
            mag in -10.0f64..25.0,
            parallax in prop::option::of(-100.0f64..=0.0),
        ) {
            prop_assert!(absolute_magnitude(mag, parallax).is_finite());
        }
    }
}
