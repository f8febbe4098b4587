// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Maps a validated match onto the aggregate records it touches.
//!
//! For winners `W` and losers `L` on map `m`:
//! - `mapPerformance/{h}-on-{m}` for every hero, `Win` or `Loss`
//! - `matchUp/{a}-vs-{b}` (`Win`) and `matchUp/{b}-vs-{a}` (`Played`) for
//!   every `(a, b)` in `W x L`
//! - `synergy/{a}-with-{b}` and `synergy/{b}-with-{a}` for every teammate
//!   pair `i < j`, `Win` for `W` and `Loss` for `L`
//!
//! Output order is fixed so the same match always yields the same sequence.

use alloc::vec::Vec;

use crate::types::key::{AggregateKey, Category};
use crate::types::matches::MatchResult;
use crate::types::record::Increment;

/// One increment to apply to one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregateUpdate {
    pub key: AggregateKey,
    pub increment: Increment,
}

impl AggregateUpdate {
    pub fn new(key: AggregateKey, increment: Increment) -> Self {
        Self { key, increment }
    }
}

/// Number of updates per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub map_performance: usize,
    pub matchups: usize,
    pub synergy: usize,
}

impl UpdateCounts {
    /// What a match with `winners` and `losers` heroes should produce.
    pub fn expected(winners: usize, losers: usize) -> Self {
        Self {
            map_performance: winners + losers,
            matchups: 2 * winners * losers,
            synergy: 2 * (pairs(winners) + pairs(losers)),
        }
    }

    pub fn of(updates: &[AggregateUpdate]) -> Self {
        let mut counts = Self::default();
        for update in updates {
            match update.key.category() {
                Category::MapPerformance => counts.map_performance += 1,
                Category::MatchUp => counts.matchups += 1,
                Category::Synergy => counts.synergy += 1,
                Category::MatchHistory => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.map_performance + self.matchups + self.synergy
    }
}

fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Computes every `(key, increment)` pair a match contributes.
///
/// The output grows with the square of team size; bound teams with
/// [`check_team_size`](crate::validate::check_team_size) first.
pub fn derive_updates(m: &MatchResult) -> Vec<AggregateUpdate> {
    let winners = &m.winning_team;
    let losers = &m.losing_team;
    let mut updates = Vec::with_capacity(UpdateCounts::expected(winners.len(), losers.len()).total());

    for hero in winners {
        updates.push(AggregateUpdate::new(
            AggregateKey::map_performance(hero, &m.map),
            Increment::Win,
        ));
    }
    for hero in losers {
        updates.push(AggregateUpdate::new(
            AggregateKey::map_performance(hero, &m.map),
            Increment::Loss,
        ));
    }

    for winner in winners {
        for loser in losers {
            updates.push(AggregateUpdate::new(AggregateKey::matchup(winner, loser), Increment::Win));
            updates.push(AggregateUpdate::new(AggregateKey::matchup(loser, winner), Increment::Played));
        }
    }

    push_synergy(&mut updates, winners, Increment::Win);
    push_synergy(&mut updates, losers, Increment::Loss);

    updates
}

fn push_synergy<S: AsRef<str>>(updates: &mut Vec<AggregateUpdate>, team: &[S], increment: Increment) {
    for (i, first) in team.iter().enumerate() {
        for second in &team[i + 1..] {
            let (a, b) = (first.as_ref(), second.as_ref());
            updates.push(AggregateUpdate::new(AggregateKey::synergy(a, b), increment));
            updates.push(AggregateUpdate::new(AggregateKey::synergy(b, a), increment));
        }
    }
}
