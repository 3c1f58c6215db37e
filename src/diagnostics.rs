//! Diagnostics sink: call timers and structured failure records.
//!
//! The client never reaches for global state. It is handed an
//! `Arc<dyn DiagnosticsSink>` at construction, and every operation:
//! - opens a [`Stopwatch`], which reports exactly once when dropped
//! - emits one [`DiagnosticRecord`] through [`DiagnosticsSink::warning`] on failure
//!
//! [`TracingSink`] is the production sink. It records durations as
//! `metrics` histograms and failures as `tracing` warnings.

use metrics::{counter, histogram};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

use crate::errors::ErrorKind;

/// Metric name for call latency (seconds).
pub const DURATION_METRIC: &str = "dynamodb_control_duration_seconds";

/// Metric name for failed calls.
pub const FAILURE_METRIC: &str = "dynamodb_control_failures_total";

/// Receiver for timing and failure diagnostics.
pub trait DiagnosticsSink: Send + Sync {
    /// A timer with this label was started.
    fn timer_started(&self, label: &'static str);

    /// The timer with this label finished after `elapsed`.
    fn timer_ended(&self, label: &'static str, elapsed: Duration);

    /// A call failed.
    fn warning(&self, record: &DiagnosticRecord);
}

/// Structured failure record.
///
/// Serializes to the JSON object logged by [`TracingSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub class: &'static str,
    pub function: &'static str,
    /// Debug rendering of the request, for operations that require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    pub error_kind: ErrorKind,
    /// Whether a later retry of the same request could succeed.
    pub transient: bool,
    pub error: String,
}

impl DiagnosticRecord {
    /// Pretty JSON with two-space padding.
    pub fn to_json(&self) -> String {
        match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(_) => format!("{:?}", self),
        }
    }
}

/// Scoped duration measurement.
///
/// Starting notifies the sink; dropping reports the elapsed time. Drop runs on
/// every exit path, including early `?` returns and cancelled futures.
pub struct Stopwatch<'a> {
    sink: &'a dyn DiagnosticsSink,
    label: &'static str,
    start: Instant,
}

impl<'a> Stopwatch<'a> {
    /// Start timing `label`.
    ///
    /// # Arguments
    ///
    /// * `sink` - Receives `timer_started` now and `timer_ended` on drop
    /// * `label` - Timer label, e.g. `DynamoDB.describe_table`
    pub fn start(sink: &'a dyn DiagnosticsSink, label: &'static str) -> Self {
        sink.timer_started(label);
        Self {
            sink,
            label,
            start: Instant::now(),
        }
    }

    /// The label this stopwatch reports under.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Time since the stopwatch started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        self.sink.timer_ended(self.label, self.start.elapsed());
    }
}

/// Production sink backed by `tracing` and `metrics`.
///
/// Without an installed metrics recorder the histogram and counter calls are
/// no-ops, so this is safe to use everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn timer_started(&self, label: &'static str) {
        trace!(timer = label, "DynamoDB call started");
    }

    fn timer_ended(&self, label: &'static str, elapsed: Duration) {
        histogram!(DURATION_METRIC, "operation" => label).record(elapsed.as_secs_f64());
        trace!(
            timer = label,
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            "DynamoDB call finished"
        );
    }

    fn warning(&self, record: &DiagnosticRecord) {
        counter!(FAILURE_METRIC, "operation" => record.function).increment(1);
        warn!(
            class = record.class,
            function = record.function,
            error_kind = %record.error_kind,
            transient = record.transient,
            "{}",
            record.to_json()
        );
    }
}
