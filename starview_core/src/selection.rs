//! Cluster selection state machine with demo auto-cycling.
//!
//! The controller owns the only piece of mutable session state: which
//! cluster is selected and whether the session is in interactive or demo
//! mode. Demo mode arms a cooperative single-shot-rearming timer; the host
//! event loop polls [`SelectionController::tick`], so a timer fire and a
//! user action are always ordered by arrival and never race.
//!
//! Time is abstracted behind [`Clock`] so the cycle is testable with a
//! virtual clock instead of a four-minute wall wait.

use crate::catalog::{AnalysisArtifact, ClusterRecord};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Fixed demo auto-cycle period: four minutes per cluster.
pub const DEMO_CYCLE_PERIOD: Duration = Duration::from_millis(240_000);

/// Monotonic time source for the demo timer.
pub trait Clock {
    /// Time elapsed since some fixed origin.
    fn now(&self) -> Duration;
}

/// Production clock backed by `std::time::Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Virtual clock advanced manually; clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances virtual time by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// Session interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// User-driven selection; no timer armed
    Interactive,
    /// Timed auto-cycling through the cluster sequence
    Demo,
}

/// What caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTrigger {
    /// Explicit user action (marker click)
    User,
    /// Immediate selection on entering demo mode
    DemoEntry,
    /// Timer fire advanced the cycle
    DemoCycle,
}

/// Emitted whenever the selected cluster changes; consumers rebuild the
/// highlight markers and the diagnostic view from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub cluster: i64,
    pub trigger: SelectionTrigger,
}

/// The selection state machine.
///
/// Holds a reference to the analysis artifact, not ownership of the
/// clusters; `selected` is a cluster id resolved against the sequence at
/// use time, so an analysis reload cannot leave a dangling index.
pub struct SelectionController<C: Clock> {
    clock: C,
    analysis: Arc<AnalysisArtifact>,
    selected: Option<i64>,
    mode: Mode,
    /// Armed timer deadline; `None` means disarmed
    deadline: Option<Duration>,
}

impl<C: Clock> SelectionController<C> {
    /// Creates the controller in its start state: nothing selected,
    /// interactive mode, timer disarmed.
    pub fn new(clock: C, analysis: Arc<AnalysisArtifact>) -> Self {
        Self {
            clock,
            analysis,
            selected: None,
            mode: Mode::Interactive,
            deadline: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Id of the currently selected cluster, if any.
    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// The selected cluster record, if the id still resolves against the
    /// current analysis sequence.
    pub fn selected_cluster(&self) -> Option<&ClusterRecord> {
        let id = self.selected?;
        self.analysis.clusters.iter().find(|c| c.id == id)
    }

    /// Flips between interactive and demo mode.
    ///
    /// Entering demo with no current selection and a non-empty cluster
    /// sequence selects the first cluster immediately and arms the cycle
    /// timer; with an existing selection the cycle continues from it.
    /// Leaving demo disarms the timer.
    pub fn toggle_demo(&mut self) -> Option<SelectionEvent> {
        match self.mode {
            Mode::Demo => {
                self.mode = Mode::Interactive;
                self.disarm();
                None
            }
            Mode::Interactive => {
                self.mode = Mode::Demo;
                if self.analysis.clusters.is_empty() {
                    return None;
                }
                self.arm();
                if self.selected.is_none() {
                    let first = self.analysis.clusters[0].id;
                    self.selected = Some(first);
                    return Some(SelectionEvent {
                        cluster: first,
                        trigger: SelectionTrigger::DemoEntry,
                    });
                }
                None
            }
        }
    }

    /// User selection of a cluster (marker click).
    ///
    /// Always forces interactive mode and disarms the timer: manual
    /// interaction overrides demo cycling.
    pub fn select_cluster(&mut self, cluster: i64) -> SelectionEvent {
        self.mode = Mode::Interactive;
        self.disarm();
        self.selected = Some(cluster);
        SelectionEvent {
            cluster,
            trigger: SelectionTrigger::User,
        }
    }

    /// Polls the demo timer; the host event loop calls this between other
    /// events.
    ///
    /// On fire, the selection advances to the next cluster in sequence
    /// order, wrapping at the end. A selected id no longer present in the
    /// sequence (analysis reloaded) restarts the cycle at index 0.
    pub fn tick(&mut self) -> Option<SelectionEvent> {
        if self.mode != Mode::Demo {
            return None;
        }
        let deadline = self.deadline?;
        if self.clock.now() < deadline {
            return None;
        }

        let clusters = &self.analysis.clusters;
        if clusters.is_empty() {
            self.disarm();
            return None;
        }

        let current = self
            .selected
            .and_then(|id| clusters.iter().position(|c| c.id == id));
        let next = match current {
            Some(index) => (index + 1) % clusters.len(),
            None => 0,
        };
        let cluster = clusters[next].id;
        self.selected = Some(cluster);
        self.deadline = Some(self.clock.now() + DEMO_CYCLE_PERIOD);

        Some(SelectionEvent {
            cluster,
            trigger: SelectionTrigger::DemoCycle,
        })
    }

    /// Swaps in a reloaded analysis artifact.
    ///
    /// Mode and timer are untouched; a now-stale selection resolves to
    /// index 0 at the next timer fire.
    pub fn replace_analysis(&mut self, analysis: Arc<AnalysisArtifact>) {
        self.analysis = analysis;
    }

    /// Arms the cycle timer if it is not already armed.
    fn arm(&mut self) {
        if self.deadline.is_none() {
            self.deadline = Some(self.clock.now() + DEMO_CYCLE_PERIOD);
        }
    }

    /// Disarms the cycle timer; a no-op when already disarmed.
    fn disarm(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(id: i64) -> ClusterRecord {
        ClusterRecord {
            id,
            pos: [0.0; 3],
            vel: [0.0; 3],
            members: vec![],
            tail_members: vec![],
            count: None,
            std_pos: None,
            std_vel: None,
        }
    }

    fn analysis(ids: &[i64]) -> Arc<AnalysisArtifact> {
        Arc::new(AnalysisArtifact {
            clusters: ids.iter().copied().map(cluster).collect(),
            runaways: vec![],
        })
    }

    fn demo_controller(ids: &[i64]) -> (ManualClock, SelectionController<ManualClock>) {
        let clock = ManualClock::new();
        let controller = SelectionController::new(clock.clone(), analysis(ids));
        (clock, controller)
    }

    #[test]
    fn test_start_state() {
        let (_, controller) = demo_controller(&[0, 1, 2]);
        assert_eq!(controller.mode(), Mode::Interactive);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn test_demo_entry_selects_first_cluster() {
        let (_, mut controller) = demo_controller(&[10, 20, 30]);
        let event = controller.toggle_demo().unwrap();
        assert_eq!(event.cluster, 10);
        assert_eq!(event.trigger, SelectionTrigger::DemoEntry);
        assert_eq!(controller.mode(), Mode::Demo);
    }

    #[test]
    fn test_demo_cycles_in_order_and_wraps() {
        let (clock, mut controller) = demo_controller(&[10, 20, 30]);
        controller.toggle_demo();
        assert_eq!(controller.selected(), Some(10));

        // No fire before the period elapses
        clock.advance(DEMO_CYCLE_PERIOD - Duration::from_millis(1));
        assert!(controller.tick().is_none());

        clock.advance(Duration::from_millis(1));
        assert_eq!(controller.tick().unwrap().cluster, 20);

        clock.advance(DEMO_CYCLE_PERIOD);
        assert_eq!(controller.tick().unwrap().cluster, 30);

        clock.advance(DEMO_CYCLE_PERIOD);
        assert_eq!(controller.tick().unwrap().cluster, 10);
    }

    #[test]
    fn test_demo_keeps_existing_selection() {
        let (clock, mut controller) = demo_controller(&[10, 20, 30]);
        controller.select_cluster(20);

        // Entering demo with a selection emits nothing and cycles onward
        assert!(controller.toggle_demo().is_none());
        assert_eq!(controller.selected(), Some(20));

        clock.advance(DEMO_CYCLE_PERIOD);
        assert_eq!(controller.tick().unwrap().cluster, 30);
    }

    #[test]
    fn test_user_selection_overrides_demo() {
        let (clock, mut controller) = demo_controller(&[10, 20, 30]);
        controller.toggle_demo();

        let event = controller.select_cluster(30);
        assert_eq!(event.trigger, SelectionTrigger::User);
        assert_eq!(controller.mode(), Mode::Interactive);

        // Timer is disarmed: time advancement produces no auto-selection
        clock.advance(DEMO_CYCLE_PERIOD * 3);
        assert!(controller.tick().is_none());
        assert_eq!(controller.selected(), Some(30));
    }

    #[test]
    fn test_double_toggle_disarms() {
        let (clock, mut controller) = demo_controller(&[10, 20]);
        controller.toggle_demo();
        controller.toggle_demo();
        assert_eq!(controller.mode(), Mode::Interactive);

        clock.advance(DEMO_CYCLE_PERIOD * 2);
        assert!(controller.tick().is_none());

        // Re-entering demo arms exactly one fresh timer
        controller.toggle_demo();
        clock.advance(DEMO_CYCLE_PERIOD - Duration::from_millis(1));
        assert!(controller.tick().is_none());
        clock.advance(Duration::from_millis(1));
        assert!(controller.tick().is_some());
    }

    #[test]
    fn test_empty_analysis_never_cycles() {
        let (clock, mut controller) = demo_controller(&[]);
        assert!(controller.toggle_demo().is_none());
        assert_eq!(controller.mode(), Mode::Demo);
        assert_eq!(controller.selected(), None);

        clock.advance(DEMO_CYCLE_PERIOD * 2);
        assert!(controller.tick().is_none());
    }

    #[test]
    fn test_stale_selection_restarts_cycle() {
        let (clock, mut controller) = demo_controller(&[10, 20, 30]);
        controller.toggle_demo();
        clock.advance(DEMO_CYCLE_PERIOD);
        controller.tick();
        assert_eq!(controller.selected(), Some(20));

        // Reload drops the selected id from the sequence
        controller.replace_analysis(analysis(&[70, 80]));
        assert!(controller.selected_cluster().is_none());

        clock.advance(DEMO_CYCLE_PERIOD);
        assert_eq!(controller.tick().unwrap().cluster, 70);
    }

    #[test]
    fn test_selected_cluster_resolves_by_id() {
        let (_, mut controller) = demo_controller(&[10, 20]);
        controller.select_cluster(20);
        assert_eq!(controller.selected_cluster().unwrap().id, 20);

        controller.select_cluster(99);
        assert!(controller.selected_cluster().is_none());
    }
}
