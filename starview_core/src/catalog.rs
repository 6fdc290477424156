//! Catalog and analysis artifact model + loading.
//!
//! Two JSON documents drive the whole pipeline:
//! - `stars.json`: the star catalog, an array of [`StarRecord`]
//! - `analysis.json`: pre-computed cluster analysis, an [`AnalysisArtifact`]
//!
//! Both must resolve before anything downstream runs; [`SkyData::load`]
//! surfaces a single explicit error when either fails so callers never
//! operate on partial data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single star from the catalog.
///
/// Positions are equatorial Cartesian in parsecs, photometry is Gaia-style.
/// Every photometric field may be absent; consumers default or exclude per
/// their own policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarRecord {
    /// Gaia DR3 source identifier
    pub source_id: u64,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Bp-Rp color index (temperature proxy)
    #[serde(default)]
    pub bp_rp: Option<f64>,

    /// Apparent G-band magnitude (lower = brighter)
    #[serde(default)]
    pub phot_g_mean_mag: Option<f64>,

    /// Parallax in milliarcseconds; may be zero or negative in the source
    /// catalog
    #[serde(default)]
    pub parallax: Option<f64>,

    /// Proper motion in right ascension (mas/yr)
    #[serde(default)]
    pub pmra: Option<f64>,

    /// Proper motion in declination (mas/yr)
    #[serde(default)]
    pub pmdec: Option<f64>,

    /// Radial velocity (km/s)
    #[serde(default)]
    pub radial_velocity: Option<f64>,

    /// Cluster label assigned by the analysis backend (-1 = field star)
    #[serde(default)]
    pub cluster_id: Option<i64>,

    /// Total space velocity (km/s), used by the runaway flagging
    #[serde(default)]
    pub v_tot: Option<f64>,
}

/// A co-moving group found by the analysis backend.
///
/// Membership defines the cluster; `members` order is irrelevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub id: i64,

    /// Centroid position [x, y, z] in parsecs
    pub pos: [f64; 3],

    /// Mean velocity [pmra, pmdec, radial_velocity], un-normalized
    pub vel: [f64; 3],

    /// Source ids of member stars
    pub members: Vec<u64>,

    /// Tidal tail candidates, ordered by the backend; may be empty
    #[serde(default)]
    pub tail_members: Vec<u64>,

    /// Member count as reported by the backend
    #[serde(default)]
    pub count: Option<usize>,

    /// Position dispersion (standard deviation per axis)
    #[serde(default)]
    pub std_pos: Option<[f64; 3]>,

    /// Velocity dispersion (standard deviation per axis)
    #[serde(default)]
    pub std_vel: Option<[f64; 3]>,
}

impl ClusterRecord {
    /// Membership as a set, for O(1) tests against the catalog.
    pub fn member_set(&self) -> HashSet<u64> {
        self.members.iter().copied().collect()
    }
}

/// The pre-computed analysis document.
///
/// Cluster order defines the default demo-cycle order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisArtifact {
    pub clusters: Vec<ClusterRecord>,

    /// Source ids of high-velocity stars flagged by the backend
    #[serde(default)]
    pub runaways: Vec<u64>,
}

/// Errors raised while resolving the input artifacts.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Artifact file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON of the expected shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads the star catalog from a JSON array file.
pub fn load_stars(path: impl AsRef<Path>) -> Result<Vec<StarRecord>, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the cluster analysis artifact from a JSON file.
pub fn load_analysis(path: impl AsRef<Path>) -> Result<AnalysisArtifact, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Both input artifacts, resolved together.
#[derive(Debug, Clone)]
pub struct SkyData {
    pub stars: Vec<StarRecord>,
    pub analysis: AnalysisArtifact,
}

impl SkyData {
    /// Resolves both artifacts, failing if either does.
    ///
    /// The pipeline must not run on partial data, so a failure here is the
    /// single "no data" signal for the whole session.
    pub fn load(
        stars_path: impl AsRef<Path>,
        analysis_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let stars = load_stars(stars_path)?;
        let analysis = load_analysis(analysis_path)?;
        Ok(Self { stars, analysis })
    }
}
