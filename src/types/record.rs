// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Counter buckets and the increments applied to them.

use serde::{Deserialize, Serialize};

/// A `{total, wins}` counter stored under one aggregate key.
///
/// `wins` is optional because the loser side of a matchup is created as
/// `{total}` only. A record that later receives a win gains the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRecord {
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u64>,
}

impl AggregateRecord {
    /// The `{total: 0, wins: 0}` default for records that track wins.
    pub const fn zeroed() -> Self {
        Self { total: 0, wins: Some(0) }
    }

    /// The `{total: 0}` default for loser-side matchup records.
    pub const fn total_only() -> Self {
        Self { total: 0, wins: None }
    }

    pub fn wins(&self) -> u64 {
        self.wins.unwrap_or(0)
    }

    /// Fraction of games won, `None` before the first game.
    pub fn win_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.wins() as f64 / self.total as f64)
        }
    }
}

/// The delta one match contributes to one aggregate record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Increment {
    /// `total += 1, wins += 1`.
    Win,
    /// `total += 1`; a missing record starts at `{total: 0, wins: 0}`.
    Loss,
    /// `total += 1`; a missing record starts at `{total: 0}`.
    Played,
}

impl Increment {
    /// Applies this increment to the current value, synthesising the zero
    /// record when the key has never been written.
    pub fn apply(self, current: Option<AggregateRecord>) -> AggregateRecord {
        match self {
            Increment::Win => {
                let base = current.unwrap_or_else(AggregateRecord::zeroed);
                AggregateRecord {
                    total: base.total.saturating_add(1),
                    wins: Some(base.wins().saturating_add(1)),
                }
            }
            Increment::Loss => {
                let base = current.unwrap_or_else(AggregateRecord::zeroed);
                AggregateRecord {
                    total: base.total.saturating_add(1),
                    wins: base.wins,
                }
            }
            Increment::Played => {
                let base = current.unwrap_or_else(AggregateRecord::total_only);
                AggregateRecord {
                    total: base.total.saturating_add(1),
                    wins: base.wins,
                }
            }
        }
    }
}
