//! Metrics collection and export for the shell.
//!
//! Uses the `metrics` crate for instrumentation and exports
//! to Prometheus format when enabled.

use anyhow::{Context, Result};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use parlor_core::RoomStats;
use std::net::SocketAddr;
use tracing::info;

/// Metric names.
pub mod names {
    pub const COMMANDS_TOTAL: &str = "parlor_commands_total";
    pub const PARTICIPANTS_ACTIVE: &str = "parlor_participants_active";
    pub const MESSAGES_STORED: &str = "parlor_messages_stored";
    pub const ERRORS_TOTAL: &str = "parlor_errors_total";
}

/// Initialize the metrics system.
pub fn init_metrics() {
    metrics::describe_counter!(names::COMMANDS_TOTAL, "Total number of room commands applied");
    metrics::describe_gauge!(
        names::PARTICIPANTS_ACTIVE,
        "Current number of roster entries"
    );
    metrics::describe_gauge!(names::MESSAGES_STORED, "Current timeline length");
    metrics::describe_counter!(names::ERRORS_TOTAL, "Total number of rejected input lines");

    info!("Metrics initialized");
}

/// Start the Prometheus exporter.
///
/// # Errors
///
/// Returns an error if the exporter cannot be installed.
pub fn start_metrics_server(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Metrics server listening on {}", addr);
    Ok(())
}

/// Record an applied room command.
pub fn record_command(command: &'static str) {
    counter!(names::COMMANDS_TOTAL, "command" => command).increment(1);
}

/// Update room gauges.
pub fn set_room_gauges(stats: &RoomStats) {
    gauge!(names::PARTICIPANTS_ACTIVE).set(stats.participant_count as f64);
    gauge!(names::MESSAGES_STORED).set(stats.message_count as f64);
}

/// Record a rejected input line.
pub fn record_error(error_type: &'static str) {
    counter!(names::ERRORS_TOTAL, "type" => error_type).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        // No recorder installed: calls are no-ops.
        record_command("add_user");
        record_error("parse");
        set_room_gauges(&RoomStats {
            participant_count: 1,
            message_count: 2,
            listener_count: 0,
            watcher_count: 0,
        });
    }
}
