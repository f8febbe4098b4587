// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use herostats_kernel::{Category, MatchResult, Roster};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api::SubmitMatchResponse;
use crate::config::NodeConfig;
use crate::errors::ApiError;
use crate::orchestrator::MatchSubmitter;
use crate::reader::StatsReader;
use crate::store::KeyedStore;

/// Shared handler state. The store handle is injected here once and cloned
/// into every request.
#[derive(Clone)]
pub struct AppState {
    pub submitter: Arc<MatchSubmitter>,
    pub reader: StatsReader,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyedStore>, roster: Roster, cfg: &NodeConfig) -> Self {
        let submitter = MatchSubmitter::new(
            store.clone(),
            Arc::new(roster),
            cfg.retry_policy(),
            cfg.update_concurrency,
        )
        .with_max_team_size(cfg.max_team_size);
        Self {
            submitter: Arc::new(submitter),
            reader: StatsReader::new(store),
        }
    }
}

pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .route("/api/match", post(submit_match))
        .route("/api/history", stats_route(Category::MatchHistory))
        .route("/api/matchups", stats_route(Category::MatchUp))
        .route("/api/synergy", stats_route(Category::Synergy))
        .route("/api/maps", stats_route(Category::MapPerformance))
        // Observability
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state);

    if let Some(dir) = static_dir {
        tracing::info!("Serving static files from {:?}", dir);
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(&dir).fallback(index));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

async fn submit_match(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitMatchResponse>, ApiError> {
    let m: MatchResult = serde_json::from_slice(&body)?;
    let receipt = state.submitter.submit(m).await?;
    Ok(Json(SubmitMatchResponse {
        id: receipt.history_key,
        map_performance_updates: receipt.counts.map_performance,
        matchup_updates: receipt.counts.matchups,
        synergy_updates: receipt.counts.synergy,
    }))
}

fn stats_route(category: Category) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move { read_stats(state, category).await })
}

async fn read_stats(state: AppState, category: Category) -> Result<Json<BTreeMap<String, Value>>, ApiError> {
    let snapshot = state.reader.read(category).await?;
    Ok(Json(snapshot))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
