//! Step progress for the orchestrators.
//!
//! Pipelines report which step is running and which file it is working on.
//! Observers subscribe to a broadcast channel; with none attached, events are
//! dropped.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    StepStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// Work on one item (usually a file) inside the current step
    Item { name: String },
    /// A stage produced nothing and downstream steps will see defaults
    Skipped { item: String, reason: String },
    Finished {
        success: bool,
        elapsed_secs: u64,
        summary: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    pub step: usize,
    pub total_steps: usize,
    pub step_name: String,
    pub current_item: String,
    pub skipped: usize,
    pub is_running: bool,
}

#[derive(Clone)]
pub struct ProgressTracker {
    state: Arc<RwLock<ProgressState>>,
    sender: broadcast::Sender<ProgressEvent>,
    started: Arc<RwLock<Option<Instant>>>,
}

impl ProgressTracker {
    pub fn new(total_steps: usize) -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            state: Arc::new(RwLock::new(ProgressState {
                total_steps,
                ..Default::default()
            })),
            sender,
            started: Arc::new(RwLock::new(None)),
        }
    }

    /// Receivers may not exist if no console is attached; that is normal.
    #[inline]
    fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    pub fn state(&self) -> ProgressState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut ProgressState)) {
        f(&mut self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()));
    }

    pub fn start_step(&self, index: usize, name: &str) {
        {
            let mut started = self
                .started
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            started.get_or_insert_with(Instant::now);
        }
        let mut total = 0;
        self.update(|s| {
            s.step = index;
            s.step_name = name.to_string();
            s.current_item.clear();
            s.is_running = true;
            total = s.total_steps;
        });
        self.emit(ProgressEvent::StepStarted {
            index,
            total,
            name: name.to_string(),
        });
    }

    pub fn item(&self, name: &str) {
        self.update(|s| s.current_item = name.to_string());
        self.emit(ProgressEvent::Item {
            name: name.to_string(),
        });
    }

    pub fn skipped(&self, item: &str, reason: &str) {
        self.update(|s| s.skipped += 1);
        self.emit(ProgressEvent::Skipped {
            item: item.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn finish(&self, success: bool, summary: &str) {
        let elapsed_secs = self
            .started
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.elapsed().as_secs())
            .unwrap_or(0);
        self.update(|s| s.is_running = false);
        self.emit(ProgressEvent::Finished {
            success,
            elapsed_secs,
            summary: summary.to_string(),
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_tracking() {
        let tracker = ProgressTracker::new(9);
        tracker.start_step(3, "Detecting formats");
        tracker.item("ORDENTRY.rpgle");

        let state = tracker.state();
        assert_eq!(state.step, 3);
        assert_eq!(state.total_steps, 9);
        assert_eq!(state.step_name, "Detecting formats");
        assert_eq!(state.current_item, "ORDENTRY.rpgle");
        assert!(state.is_running);
    }

    #[test]
    fn test_events_reach_subscribers() {
        let tracker = ProgressTracker::new(9);
        let mut rx = tracker.subscribe();

        tracker.start_step(1, "Parsing RPGLE programs");
        tracker.skipped("ORDENTRY.rpgle", "no JSON in reply");
        tracker.finish(true, "done");

        assert_eq!(
            rx.try_recv().unwrap(),
            ProgressEvent::StepStarted {
                index: 1,
                total: 9,
                name: "Parsing RPGLE programs".to_string()
            }
        );
        assert!(matches!(rx.try_recv().unwrap(), ProgressEvent::Skipped { .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            ProgressEvent::Finished { success: true, .. }
        ));
        assert_eq!(tracker.state().skipped, 1);
        assert!(!tracker.state().is_running);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let tracker = ProgressTracker::new(2);
        tracker.start_step(1, "Pseudocode");
        tracker.finish(false, "failed");
    }
}
