// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Match submission: validate, append to history, then update aggregates.
//!
//! ```text
//! Received -> Validated -> Persisted -> AggregatesUpdated -> Done
//!     |           |            |
//!     |           +--> Failed <+
//!     +--> Rejected / Failed
//! ```
//!
//! Aggregate updates are best effort. Every derived update is attempted even
//! after one fails, and nothing already written is rolled back: a crash or
//! failure part way leaves some records counted and others not, and a
//! resubmitted match is counted twice.

use futures::stream::{self, StreamExt};
use herostats_kernel::config::MAX_TEAM_SIZE;
use herostats_kernel::{check, check_team_size, derive_updates, Category, MatchResult, Rejection, Roster, UpdateCounts};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::store::{KeyedStore, RetryPolicy, StoreError};
use crate::updater::{AggregateUpdater, UpdateError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Received,
    Validated,
    Persisted,
    AggregatesUpdated,
    Done,
    Rejected,
    Failed,
}

impl SubmissionState {
    pub fn can_move_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Received, Rejected)
                | (Received, Failed)
                | (Validated, Persisted)
                | (Validated, Failed)
                | (Persisted, AggregatesUpdated)
                | (Persisted, Failed)
                | (AggregatesUpdated, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Done | SubmissionState::Rejected | SubmissionState::Failed)
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("match rejected: {0}")]
    Validation(#[from] Rejection),

    #[error("failed to append match to history: {0}")]
    Persistence(#[source] StoreError),

    #[error("{} of {} aggregate updates failed", .failures.len(), .attempted)]
    AggregateUpdate {
        history_key: String,
        attempted: usize,
        failures: Vec<UpdateError>,
    },
}

/// A match that went all the way to `Done`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Generated key of the raw record under `matchHistory`.
    pub history_key: String,
    pub counts: UpdateCounts,
}

struct Tracker {
    state: SubmissionState,
}

impl Tracker {
    fn new() -> Self {
        Self { state: SubmissionState::Received }
    }

    fn advance(&mut self, next: SubmissionState) {
        debug_assert!(self.state.can_move_to(next), "{:?} -> {:?}", self.state, next);
        tracing::debug!(from = ?self.state, to = ?next, "submission state");
        self.state = next;
    }
}

pub struct MatchSubmitter {
    store: Arc<dyn KeyedStore>,
    roster: Arc<Roster>,
    updater: AggregateUpdater,
    concurrency: usize,
    max_team_size: usize,
}

impl MatchSubmitter {
    /// `concurrency` bounds the aggregate updates in flight for one match.
    pub fn new(store: Arc<dyn KeyedStore>, roster: Arc<Roster>, policy: RetryPolicy, concurrency: usize) -> Self {
        Self {
            updater: AggregateUpdater::new(store.clone(), policy),
            store,
            roster,
            concurrency: concurrency.max(1),
            max_team_size: MAX_TEAM_SIZE,
        }
    }

    /// Overrides the per-team hero limit (default `MAX_TEAM_SIZE`).
    pub fn with_max_team_size(mut self, max: usize) -> Self {
        self.max_team_size = max;
        self
    }

    pub async fn submit(&self, m: MatchResult) -> Result<Receipt, SubmitError> {
        let start = Instant::now();
        let result = self.run(m).await;

        let outcome = match &result {
            Ok(_) => "accepted",
            Err(SubmitError::Validation(_)) => "rejected",
            Err(_) => "failed",
        };
        metrics::increment_counter!("herostats_matches_total", "outcome" => outcome);
        metrics::histogram!("herostats_submission_duration_seconds", start.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, m: MatchResult) -> Result<Receipt, SubmitError> {
        let mut tracker = Tracker::new();

        let checked = check_team_size(&m, self.max_team_size).and_then(|_| check(&self.roster, &m));
        if let Err(rejection) = checked {
            tracker.advance(SubmissionState::Rejected);
            tracing::info!(%rejection, "match rejected");
            return Err(rejection.into());
        }
        tracker.advance(SubmissionState::Validated);

        let raw = match serde_json::to_value(&m) {
            Ok(raw) => raw,
            Err(e) => {
                tracker.advance(SubmissionState::Failed);
                return Err(SubmitError::Persistence(e.into()));
            }
        };
        let history_key = match self.store.push(Category::MatchHistory.prefix(), raw).await {
            Ok(key) => key,
            Err(e) => {
                tracker.advance(SubmissionState::Failed);
                tracing::error!(error = %e, "failed to append match to history");
                return Err(SubmitError::Persistence(e));
            }
        };
        tracker.advance(SubmissionState::Persisted);

        let updates = derive_updates(&m);
        let counts = UpdateCounts::of(&updates);
        tracing::debug!(
            history_key = %history_key,
            map_performance = counts.map_performance,
            matchups = counts.matchups,
            synergy = counts.synergy,
            "applying aggregate updates"
        );

        let pending: Vec<_> = updates.iter().map(|update| self.updater.apply(update)).collect();
        let failures: Vec<UpdateError> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .filter_map(|result| async move { result.err() })
            .collect()
            .await;

        if !failures.is_empty() {
            tracker.advance(SubmissionState::Failed);
            tracing::error!(
                history_key = %history_key,
                failed = failures.len(),
                attempted = updates.len(),
                "aggregates partially applied"
            );
            return Err(SubmitError::AggregateUpdate {
                history_key,
                attempted: updates.len(),
                failures,
            });
        }
        tracker.advance(SubmissionState::AggregatesUpdated);
        tracker.advance(SubmissionState::Done);
        tracing::info!(history_key = %history_key, map = %m.map, updates = counts.total(), "match recorded");

        Ok(Receipt { history_key, counts })
    }
}
