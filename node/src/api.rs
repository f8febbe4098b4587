// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/match`.
#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitMatchResponse {
    pub id: String,
    pub map_performance_updates: usize,
    pub matchup_updates: usize,
    pub synergy_updates: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
