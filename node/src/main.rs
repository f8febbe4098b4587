// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use herostats_node::config::{NodeConfig, StoreBackend};
use herostats_node::server::{build_router, AppState};
use herostats_node::store::{KeyedStore, MemoryStore, RtdbStore};
use herostats_node::telemetry;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry().context("failed to install metrics recorder")?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing herostats node with config: {:?}", cfg);

    let roster = cfg.load_roster()?;
    let mut memory = None;
    let store: Arc<dyn KeyedStore> = match cfg.backend {
        StoreBackend::Memory => {
            let mem = Arc::new(MemoryStore::new());
            if let Some(path) = &cfg.snapshot_path {
                if path.exists() {
                    tracing::info!("Found snapshot at {:?}. Loading...", path);
                    mem.load_snapshot(path)
                        .with_context(|| format!("failed to restore snapshot {:?}", path))?;
                    tracing::info!("Snapshot restored: {} entries", mem.len()?);
                }
            }
            memory = Some(mem.clone());
            mem as Arc<dyn KeyedStore>
        }
        StoreBackend::Rtdb => {
            let url = cfg.rtdb_url.as_deref().context("RTDB_URL is not set")?;
            Arc::new(RtdbStore::new(url, cfg.rtdb_auth.clone())?)
        }
    };

    // Spawn Persistence Task
    if let (Some(mem), Some(path), Some(secs)) =
        (memory.clone(), cfg.snapshot_path.clone(), cfg.auto_snapshot_interval_secs)
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                save_snapshot(&mem, &path);
            }
        });
    }

    let state = AppState::new(store, roster, &cfg);
    let app = build_router(state, cfg.static_dir.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let (Some(mem), Some(path)) = (memory, cfg.snapshot_path) {
        save_snapshot(&mem, &path);
    }
    Ok(())
}

fn save_snapshot(store: &MemoryStore, path: &Path) {
    match store.save_snapshot(path) {
        Ok(bytes) => {
            metrics::gauge!("herostats_snapshot_size_bytes", bytes as f64);
            tracing::info!("Snapshot saved to {:?}", path);
        }
        Err(e) => tracing::error!("Snapshot failed: {}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
