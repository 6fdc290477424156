//! Starview Core - Stellar Catalog Scene Pipeline
//!
//! This library sits between raw Gaia-style catalog/analysis artifacts and
//! the rendering/plotting surfaces:
//! 1. **Render buffers**: star records become parallel position/color/size
//!    arrays with visual attributes derived from photometry
//! 2. **Cluster selection**: a state machine with user-driven selection and
//!    a timed demo auto-cycling mode
//! 3. **HR diagnostics**: per-cluster absolute-magnitude points with
//!    invalid-photometry filtering, plus CSV export

pub mod buffers;
pub mod catalog;
pub mod export;
pub mod membership;
pub mod photometry;
pub mod scene;
pub mod selection;

#[cfg(feature = "visualization")]
pub mod visualization;

// Re-export key types for convenience
pub use buffers::RenderBuffer;
pub use catalog::{AnalysisArtifact, CatalogError, ClusterRecord, SkyData, StarRecord};
pub use membership::{diagnostic_points, DiagnosticPoint};
pub use photometry::ColorBucket;
pub use scene::{ClusterMarker, SceneSink};
pub use selection::{Mode, SelectionController, SelectionEvent, SystemClock};
