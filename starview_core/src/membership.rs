//! Cluster membership filtering for the HR diagnostic view.
//!
//! Produces the per-cluster point set plotted in the HR diagram: member
//! stars in catalog order, each paired with its color index and derived
//! absolute magnitude. Stars with incomplete photometry cannot be plotted
//! and are excluded.

use crate::catalog::{ClusterRecord, StarRecord};
use crate::photometry::absolute_magnitude;
use serde::Serialize;

/// One plottable star of the selected cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticPoint {
    pub source_id: u64,

    /// Bp-Rp color index (plot x-axis)
    pub color_index: f64,

    /// Derived absolute magnitude (plot y-axis, reversed: lower = brighter)
    pub abs_mag: f64,
}

/// Member stars of `cluster` present in the catalog, in catalog order.
///
/// Entries missing `bp_rp` or `phot_g_mean_mag` are dropped; a missing or
/// degenerate parallax still plots, with the degrade-gracefully distance
/// substitution of [`absolute_magnitude`].
pub fn diagnostic_points(cluster: &ClusterRecord, stars: &[StarRecord]) -> Vec<DiagnosticPoint> {
    let members = cluster.member_set();
    stars
        .iter()
        .filter(|star| members.contains(&star.source_id))
        .filter_map(|star| {
            let (bp_rp, mag) = match (star.bp_rp, star.phot_g_mean_mag) {
                (Some(bp_rp), Some(mag)) => (bp_rp, mag),
                _ => return None,
            };
            Some(DiagnosticPoint {
                source_id: star.source_id,
                color_index: bp_rp,
                abs_mag: absolute_magnitude(mag, star.parallax),
            })
        })
        .collect()
}

/// Diagnostic points for an optional selection; no selection plots nothing.
pub fn selected_diagnostics(
    selected: Option<&ClusterRecord>,
    stars: &[StarRecord],
) -> Vec<DiagnosticPoint> {
    selected
        .map(|cluster| diagnostic_points(cluster, stars))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn star(source_id: u64, bp_rp: Option<f64>, mag: Option<f64>, parallax: f64) -> StarRecord {
        StarRecord {
            source_id,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            bp_rp,
            phot_g_mean_mag: mag,
            parallax: Some(parallax),
            pmra: None,
            pmdec: None,
            radial_velocity: None,
            cluster_id: None,
            v_tot: None,
        }
    }

    fn cluster(members: &[u64]) -> ClusterRecord {
        ClusterRecord {
            id: 0,
            pos: [0.0; 3],
            vel: [0.0; 3],
            members: members.to_vec(),
            tail_members: vec![],
            count: None,
            std_pos: None,
            std_vel: None,
        }
    }

    #[test]
    fn test_incomplete_photometry_is_excluded() {
        let stars = vec![
            star(1, Some(0.4), Some(5.0), 2.0),
            star(2, None, Some(6.0), 2.0),
            star(3, Some(1.1), None, 2.0),
        ];
        let points = diagnostic_points(&cluster(&[1, 2, 3]), &stars);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].source_id, 1);
        assert_relative_eq!(points[0].color_index, 0.4);
        // m=5, parallax=2 mas -> d=500 pc
        assert_relative_eq!(points[0].abs_mag, 5.0 + 5.0 - 5.0 * 500f64.log10());
    }

    #[test]
    fn test_output_preserves_catalog_order() {
        let stars = vec![
            star(5, Some(0.1), Some(4.0), 2.0),
            star(9, Some(0.2), Some(4.0), 2.0),
            star(7, Some(0.3), Some(4.0), 2.0),
        ];
        // Membership order is irrelevant; catalog order wins
        let points = diagnostic_points(&cluster(&[7, 5]), &stars);
        let ids: Vec<u64> = points.iter().map(|p| p.source_id).collect();
        assert_eq!(ids, vec![5, 7]);
    }

    #[test]
    fn test_nonmember_stars_are_ignored() {
        let stars = vec![star(1, Some(0.4), Some(5.0), 2.0)];
        let points = diagnostic_points(&cluster(&[2]), &stars);
        assert!(points.is_empty());
    }

    #[test]
    fn test_degenerate_parallax_still_plots() {
        let mut faint = star(4, Some(1.2), Some(12.0), 0.0);
        faint.parallax = None;
        let points = diagnostic_points(&cluster(&[4]), &[faint]);
        assert_eq!(points.len(), 1);
        assert!(points[0].abs_mag.is_finite());
    }

    #[test]
    fn test_no_selection_plots_nothing() {
        let stars = vec![star(1, Some(0.4), Some(5.0), 2.0)];
        assert!(selected_diagnostics(None, &stars).is_empty());

        let c = cluster(&[1]);
        assert_eq!(selected_diagnostics(Some(&c), &stars).len(), 1);
    }
}
