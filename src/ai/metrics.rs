//! Run Metrics Collection
//!
//! Aggregates LLM usage across one command run: calls, failures, tokens and
//! latency, plus a per-stage log so the final summary can name the stages
//! that were skipped.
//!
//! ## Usage
//!
//! ```ignore
//! let metrics = MetricsCollector::new("run-123");
//! metrics.record_response("parse:ORDENTRY.rpgle", &response);
//! println!("{}", metrics.summary().display());
//! ```

use crate::ai::provider::LlmResponse;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;

// =============================================================================
// Metrics Collector
// =============================================================================

/// Metrics collector shared by the gateway and the command layer.
pub struct MetricsCollector {
    run_id: String,
    start_time: Instant,
    api_calls: AtomicU32,
    failed_calls: AtomicU32,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    total_latency_ms: AtomicU64,
    stages: RwLock<Vec<StageMetrics>>,
}

/// Outcome of one LLM-backed stage
#[derive(Debug, Clone)]
pub struct StageMetrics {
    pub name: String,
    pub succeeded: bool,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub duration_ms: u64,
}

/// Summary statistics for a run
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub run_id: String,
    pub total_duration_ms: u64,
    pub api_calls: u32,
    pub failed_calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub avg_latency_ms: f64,
    pub stages: Vec<StageMetrics>,
}

impl MetricsCollector {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_time: Instant::now(),
            api_calls: AtomicU32::new(0),
            failed_calls: AtomicU32::new(0),
            input_tokens: AtomicU64::new(0),
            output_tokens: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            stages: RwLock::new(Vec::new()),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Record a successful call
    pub fn record_response(&self, stage: &str, response: &LlmResponse) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        self.input_tokens
            .fetch_add(response.usage.input_tokens as u64, Ordering::Relaxed);
        self.output_tokens
            .fetch_add(response.usage.output_tokens as u64, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(response.timing.total_ms, Ordering::Relaxed);

        self.push_stage(StageMetrics {
            name: stage.to_string(),
            succeeded: true,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            duration_ms: response.timing.total_ms,
        });
    }

    /// Record a call that produced no usable result
    pub fn record_failure(&self, stage: &str, duration_ms: u64) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(duration_ms, Ordering::Relaxed);

        self.push_stage(StageMetrics {
            name: stage.to_string(),
            succeeded: false,
            input_tokens: 0,
            output_tokens: 0,
            duration_ms,
        });
    }

    fn push_stage(&self, stage: StageMetrics) {
        let mut stages = self.stages.write().unwrap_or_else(|poisoned| {
            tracing::error!("Metrics stages RwLock poisoned, recovering");
            poisoned.into_inner()
        });
        stages.push(stage);
    }

    /// Get current metrics snapshot
    pub fn summary(&self) -> MetricsSummary {
        let api_calls = self.api_calls.load(Ordering::Relaxed);
        let input_tokens = self.input_tokens.load(Ordering::Relaxed);
        let output_tokens = self.output_tokens.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if api_calls > 0 {
            total_latency as f64 / api_calls as f64
        } else {
            0.0
        };

        let stages = self
            .stages
            .read()
            .unwrap_or_else(|poisoned| {
                tracing::error!("Metrics stages RwLock poisoned on read, recovering");
                poisoned.into_inner()
            })
            .clone();

        MetricsSummary {
            run_id: self.run_id.clone(),
            total_duration_ms: self.start_time.elapsed().as_millis() as u64,
            api_calls,
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            avg_latency_ms: avg_latency,
            stages,
        }
    }
}

impl MetricsSummary {
    /// Names of stages whose LLM call failed
    pub fn skipped_stages(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|s| !s.succeeded)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Format summary for display
    pub fn display(&self) -> String {
        format!(
            "Run: {}\n\
             Duration: {:.1}s\n\
             LLM Calls: {} ({} failed)\n\
             Tokens: {} (input: {}, output: {})\n\
             Avg Latency: {:.0}ms",
            self.run_id,
            self.total_duration_ms as f64 / 1000.0,
            self.api_calls,
            self.failed_calls,
            self.total_tokens,
            self.input_tokens,
            self.output_tokens,
            self.avg_latency_ms,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
