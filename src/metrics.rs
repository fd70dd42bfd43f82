//! Prometheus metrics collection for vigil.
//!
//! The guard's error policy is fail-silent toward the platform, so the
//! counters here are the only operator-visible record of swallowed
//! failures. Exposed on the keep-alive HTTP endpoint under `/metrics`.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Guard events observed, by event kind.
pub static EVENTS_OBSERVED: OnceLock<IntCounterVec> = OnceLock::new();

/// Enforcement outcomes, labeled `banned` or `suppressed`.
pub static ENFORCEMENTS: OnceLock<IntCounterVec> = OnceLock::new();

/// Platform errors swallowed under the fail-silent policy, by operation.
pub static SWALLOWED_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Text commands processed, by command name.
pub static COMMANDS: OnceLock<IntCounterVec> = OnceLock::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; re-registration failures are logged and
/// ignored (happens in tests where the registry outlives a single init).
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(
        EVENTS_OBSERVED,
        IntCounterVec::new(
            Opts::new("vigil_events_total", "Guard events observed by kind"),
            &["kind"]
        )
    );
    register!(
        ENFORCEMENTS,
        IntCounterVec::new(
            Opts::new("vigil_enforcements_total", "Enforcement outcomes"),
            &["outcome"]
        )
    );
    register!(
        SWALLOWED_ERRORS,
        IntCounterVec::new(
            Opts::new(
                "vigil_swallowed_errors_total",
                "Platform errors swallowed by the fail-silent policy"
            ),
            &["op"]
        )
    );
    register!(
        COMMANDS,
        IntCounterVec::new(
            Opts::new("vigil_commands_total", "Text commands processed"),
            &["command"]
        )
    );
}

/// Encode all registered metrics in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

pub fn inc_event(kind: &str) {
    if let Some(c) = EVENTS_OBSERVED.get() {
        c.with_label_values(&[kind]).inc();
    }
}

pub fn inc_enforcement(outcome: &str) {
    if let Some(c) = ENFORCEMENTS.get() {
        c.with_label_values(&[outcome]).inc();
    }
}

pub fn inc_swallowed(op: &str) {
    if let Some(c) = SWALLOWED_ERRORS.get() {
        c.with_label_values(&[op]).inc();
    }
}

pub fn inc_command(name: &str) {
    if let Some(c) = COMMANDS.get() {
        c.with_label_values(&[name]).inc();
    }
}
