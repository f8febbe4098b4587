// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submitted match outcome.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// One game outcome as submitted by a client.
///
/// Team sizes are not fixed and duplicate hero picks are allowed. Absent
/// fields decode as empty, so a body missing `map` fails validation rather
/// than decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default)]
    pub map: String,
    #[serde(rename = "winning-team", default)]
    pub winning_team: Vec<String>,
    #[serde(rename = "losing-team", default)]
    pub losing_team: Vec<String>,
}

impl MatchResult {
    pub fn new<M, W, L>(map: M, winning_team: W, losing_team: L) -> Self
    where
        M: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            map: map.into(),
            winning_team: winning_team.into_iter().map(Into::into).collect(),
            losing_team: losing_team.into_iter().map(Into::into).collect(),
        }
    }
}
