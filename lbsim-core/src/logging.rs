//! Structured logging for dispatch simulations
//!
//! Logging goes through `tracing`. Binaries call one of the init functions
//! once; library code only emits events.
//!
//! # Controlling output
//!
//! ```bash
//! # Default (info level)
//! lbsim 4 roundrobin 10 1000
//!
//! # Every dispatch decision and admission
//! RUST_LOG=trace lbsim 4 utilbased 10 1000
//!
//! # Only the engine
//! RUST_LOG=lbsim_components::simulation=debug lbsim 4 random 10 1000
//! ```
//!
//! ## Log level guidelines
//! - **TRACE**: per-job dispatch, admission and rejection
//! - **DEBUG**: queue draining and configuration details
//! - **INFO**: run start and completion
//! - **WARN**: degenerate configurations (e.g. nodes that processed nothing)
//! - **ERROR**: fatal configuration or reporting failures

use crate::time::Seconds;
use tracing::{info, trace, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at `info`.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level.
///
/// `RUST_LOG`, when set, takes precedence over `level`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
///
/// # Example
/// ```rust
/// use lbsim_core::logging::init_simulation_logging_with_level;
///
/// init_simulation_logging_with_level("debug");
/// ```
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{level},lbsim_core={level},lbsim_components={level},lbsim_metrics={level}"
        )
        .into()
    });

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Span covering one simulation run.
pub fn simulation_span(model: &str, policy: &str) -> Span {
    tracing::info_span!("simulation", model = model, policy = policy)
}

/// Span covering work on a single service node.
pub fn node_span(node_id: usize) -> Span {
    tracing::trace_span!("node", id = node_id)
}

/// Logging utilities for common simulation events
pub mod events {
    use super::*;

    pub fn simulation_started(model: &str, policy: &str, nodes: usize, queue_capacity: usize, jobs: u64) {
        info!(
            model = model,
            policy = policy,
            nodes = nodes,
            queue_capacity = queue_capacity,
            jobs = jobs,
            "Simulation started"
        );
    }

    pub fn simulation_completed(model: &str, policy: &str, jobs: u64, rejected: u64, final_arrival: Seconds) {
        info!(
            model = model,
            policy = policy,
            jobs = jobs,
            rejected = rejected,
            final_arrival = final_arrival,
            "Simulation completed"
        );
    }

    pub fn job_dispatched(arrival: Seconds, service: Seconds, node: usize) {
        trace!(arrival = arrival, service = service, node = node, "Job dispatched");
    }

    pub fn job_admitted(node: usize, arrival: Seconds, delay: Seconds, departure: Seconds) {
        trace!(
            node = node,
            arrival = arrival,
            delay = delay,
            departure = departure,
            "Job admitted"
        );
    }

    pub fn job_rejected(node: usize, arrival: Seconds) {
        trace!(node = node, arrival = arrival, "Job rejected by node");
    }

    pub fn shared_queue_rejected(arrival: Seconds, queue_len: usize) {
        trace!(arrival = arrival, queue_len = queue_len, "Shared queue full, job rejected");
    }

    pub fn queue_drained(node: usize, now: Seconds, evicted: usize, remaining: usize) {
        trace!(
            node = node,
            now = now,
            evicted = evicted,
            remaining = remaining,
            "Queue drained"
        );
    }
}

/// Log with the simulated time attached as a field.
#[macro_export]
macro_rules! sim_log_with_time {
    ($level:ident, $time:expr, $($arg:tt)*) => {
        tracing::$level!(time = $time, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_initialization_is_idempotent() {
        init_simulation_logging_with_level("debug");
        init_simulation_logging();
        tracing::info!("Test info message");
    }

    #[test]
    fn test_span_creation() {
        let _sim = simulation_span("mqms", "roundrobin");
        let _node = node_span(3);
    }

    #[test]
    fn test_event_logging() {
        events::simulation_started("mqms", "random", 4, 10, 100);
        events::job_dispatched(1.0, 2.0, 0);
        events::job_admitted(0, 1.0, 0.0, 3.0);
        events::job_rejected(1, 4.0);
        events::shared_queue_rejected(5.0, 10);
        events::queue_drained(0, 6.0, 2, 1);
        events::simulation_completed("mqms", "random", 100, 3, 360_000.0);
    }

    #[test]
    fn test_log_with_time() {
        sim_log_with_time!(info, 12.5, "Test with time context");
        sim_log_with_time!(debug, 3.0, node = 1, "Test with fields");
    }
}
