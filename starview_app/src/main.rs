//! Starview CLI
//!
//! Loads the star catalog and cluster analysis artifacts, builds the render
//! buffers, and drives cluster selection: one-shot diagnostics for a chosen
//! cluster, or the timed demo auto-cycle.

use clap::Parser;
use starview_core::export::{csv_table, write_csv};
use starview_core::membership::selected_diagnostics;
use starview_core::scene::{markers, resolve_runaways};
use starview_core::selection::{SelectionEvent, DEMO_CYCLE_PERIOD};
use starview_core::{RenderBuffer, SelectionController, SkyData, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[cfg(feature = "visualization")]
use starview_core::scene::SceneSink;
#[cfg(feature = "visualization")]
use starview_core::visualization::RerunSceneSink;

/// Distance cut applied by the catalog query that produced `stars.json`.
const CATALOG_DISTANCE_LIMIT_PC: f64 = 650.0;

/// How often the demo loop polls the cycle timer.
const DEMO_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Starview catalog pipeline CLI
#[derive(Parser, Debug)]
#[command(name = "starview")]
#[command(about = "Render buffers and cluster diagnostics for Gaia star catalogs", long_about = None)]
struct Args {
    /// Path to the star catalog JSON
    #[arg(long, default_value = "stars.json")]
    stars: PathBuf,

    /// Path to the cluster analysis JSON
    #[arg(long, default_value = "analysis.json")]
    analysis: PathBuf,

    /// Print or export the diagnostic table for one cluster id
    #[arg(short = 'c', long)]
    select: Option<i64>,

    /// Auto-cycle through clusters in demo mode
    #[arg(long)]
    demo: bool,

    /// Demo run duration in seconds
    #[arg(short, long, default_value = "600")]
    duration: u64,

    /// Directory for per-cluster CSV exports
    #[arg(long)]
    export: Option<PathBuf>,

    /// JSON summary output instead of log lines
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Both artifacts must resolve before anything downstream runs
    let data = match SkyData::load(&args.stars, &args.analysis) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load data: {}", e);
            error!("No data to display");
            std::process::exit(1);
        }
    };

    let buffer = RenderBuffer::build_shared(&data.stars);
    let cluster_markers = markers(&data.analysis);
    let runaways = resolve_runaways(&data.analysis, &data.stars);

    if args.json {
        let summary = serde_json::json!({
            "stars": data.stars.len(),
            "buffer": {
                "positions": buffer.positions.len(),
                "colors": buffer.colors.len(),
                "sizes": buffer.sizes.len(),
            },
            "clusters": data.analysis.clusters.iter().map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "members": c.members.len(),
                    "tail_members": c.tail_members.len(),
                })
            }).collect::<Vec<_>>(),
            "runaways": data.analysis.runaways.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
        return;
    }

    info!("Starview catalog pipeline");
    info!("Stars: {} ({} buffered)", data.stars.len(), buffer.len());
    info!("Clusters found: {}", data.analysis.clusters.len());
    info!("Distance limit: {} pc", CATALOG_DISTANCE_LIMIT_PC);
    info!(
        "Runaway candidates: {} ({} with catalog positions)",
        data.analysis.runaways.len(),
        runaways.len()
    );
    for (cluster, marker) in data.analysis.clusters.iter().zip(&cluster_markers) {
        debug!(
            "  {} | members={} tails={}",
            marker.label,
            cluster.members.len(),
            marker.tail_count
        );
    }

    #[cfg(feature = "visualization")]
    let mut scene = match RerunSceneSink::new("starview") {
        Ok(mut sink) => {
            if let Err(e) = sink.submit_stars(&buffer) {
                error!("Failed to stream starfield: {}", e);
            }
            if let Err(e) = sink.submit_markers(&cluster_markers) {
                error!("Failed to stream cluster markers: {}", e);
            }
            Some(sink)
        }
        Err(e) => {
            error!("Rerun viewer unavailable: {}", e);
            None
        }
    };

    let mut selection_changes = 0u64;
    let mut on_select = |event: SelectionEvent| {
        let cluster = data
            .analysis
            .clusters
            .iter()
            .find(|c| c.id == event.cluster);
        selection_changes += 1;
        info!("Selected cluster {} ({:?})", event.cluster, event.trigger);

        let points = selected_diagnostics(cluster, &data.stars);
        debug!("  {} plottable members", points.len());

        if let Some(dir) = &args.export {
            match write_csv(dir, event.cluster, &points) {
                Ok(Some(path)) => info!("  Exported {}", path.display()),
                Ok(None) => debug!("  Nothing to export"),
                Err(e) => error!("  Export failed: {}", e),
            }
        }

        #[cfg(feature = "visualization")]
        if let Some(sink) = scene.as_mut() {
            let marker = cluster_markers.iter().find(|m| m.id == event.cluster);
            if let Err(e) = sink.highlight(marker) {
                error!("Failed to move highlight: {}", e);
            }
        }
    };

    if let Some(id) = args.select {
        let Some(cluster) = data.analysis.clusters.iter().find(|c| c.id == id) else {
            error!("No cluster with id {}", id);
            std::process::exit(1);
        };

        let points = selected_diagnostics(Some(cluster), &data.stars);
        info!("Cluster {}: {} plottable members", id, points.len());

        if let Some(dir) = &args.export {
            match write_csv(dir, id, &points) {
                Ok(Some(path)) => info!("Exported {}", path.display()),
                Ok(None) => info!("Cluster {} has no plottable members", id),
                Err(e) => {
                    error!("Export failed: {}", e);
                    std::process::exit(1);
                }
            }
        } else if let Some(table) = csv_table(&points) {
            println!("{}", table);
        } else {
            info!("Cluster {} has no plottable members", id);
        }
    }

    if args.demo {
        let analysis = Arc::new(data.analysis.clone());
        let mut controller = SelectionController::new(SystemClock::new(), analysis);

        info!(
            "Demo mode active ({}s per cluster, running for {}s)",
            DEMO_CYCLE_PERIOD.as_secs(),
            args.duration
        );
        if let Some(event) = controller.toggle_demo() {
            on_select(event);
        }

        let started = Instant::now();
        while started.elapsed() < Duration::from_secs(args.duration) {
            std::thread::sleep(DEMO_POLL_INTERVAL);
            if let Some(event) = controller.tick() {
                on_select(event);
            }
        }
        info!("Demo finished ({} selection changes)", selection_changes);
    }
}
