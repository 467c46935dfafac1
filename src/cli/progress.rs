//! Console Progress Rendering
//!
//! Prints pipeline events as they arrive: `[n/N] step` lines, the file being
//! worked on, and any stage that was skipped.

use console::style;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::pipeline::{ProgressEvent, ProgressTracker};

pub struct ConsoleRenderer {
    tracker: ProgressTracker,
    show_items: bool,
}

impl ConsoleRenderer {
    pub fn new(tracker: ProgressTracker) -> Self {
        Self {
            tracker,
            show_items: true,
        }
    }

    pub fn with_items(mut self, show: bool) -> Self {
        self.show_items = show;
        self
    }

    /// One line per event; `None` for events that are not shown
    pub fn render(&self, event: &ProgressEvent) -> Option<String> {
        match event {
            ProgressEvent::StepStarted { index, total, name } => Some(format!(
                "{} {}",
                style(format!("[{}/{}]", index, total)).cyan().bold(),
                name
            )),
            ProgressEvent::Item { name } if self.show_items => {
                Some(format!("  {} {}", style("→").dim(), name))
            }
            ProgressEvent::Item { .. } => None,
            ProgressEvent::Skipped { item, reason } => Some(format!(
                "  {} {}: {}",
                style("⚠").yellow(),
                item,
                reason
            )),
            ProgressEvent::Finished {
                success,
                elapsed_secs,
                summary,
            } => {
                let mark = if *success {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                Some(format!(
                    "{} {} ({})",
                    mark,
                    summary,
                    format_duration(*elapsed_secs)
                ))
            }
        }
    }

    /// Print events until the pipeline finishes or the tracker goes away.
    ///
    /// Subscribes before spawning so no early event is missed.
    pub fn spawn(self) -> JoinHandle<()> {
        let mut receiver = self.tracker.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Some(line) = self.render(&event) {
                            println!("{}", line);
                        }
                        if matches!(event, ProgressEvent::Finished { .. }) {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Format duration as human-readable string
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3720), "1h 2m");
    }

    #[test]
    fn test_render_step_line() {
        console::set_colors_enabled(false);
        let renderer = ConsoleRenderer::new(ProgressTracker::new(9));
        let line = renderer
            .render(&ProgressEvent::StepStarted {
                index: 4,
                total: 9,
                name: "Extracting metadata".to_string(),
            })
            .unwrap();
        assert_eq!(line, "[4/9] Extracting metadata");
    }

    #[test]
    fn test_items_can_be_hidden() {
        let renderer = ConsoleRenderer::new(ProgressTracker::new(1)).with_items(false);
        let event = ProgressEvent::Item {
            name: "ORDENTRY.rpgle".to_string(),
        };
        assert!(renderer.render(&event).is_none());
    }

    #[tokio::test]
    async fn test_spawn_stops_on_finish() {
        let tracker = ProgressTracker::new(2);
        let handle = ConsoleRenderer::new(tracker.clone()).spawn();
        tracker.start_step(1, "Pseudocode");
        tracker.finish(true, "done");
        handle.await.unwrap();
    }
}
