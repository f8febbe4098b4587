// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> Result<(), BuildError> {
    let initialised = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "herostats_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    if initialised.is_err() {
        tracing::warn!("Tracing subscriber already installed");
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!("herostats_matches_total", "Match submissions by outcome");
    metrics::describe_counter!("herostats_aggregate_updates_total", "Aggregate record updates by result");
    metrics::describe_counter!("herostats_txn_conflicts_total", "Conditional writes lost to a concurrent writer");
    metrics::describe_histogram!("herostats_submission_duration_seconds", "Time from receipt to response for a match submission");
    metrics::describe_gauge!("herostats_snapshot_size_bytes", "Size of the last saved store snapshot in bytes");

    metrics::gauge!("herostats_node_up", 1.0);
    Ok(())
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
