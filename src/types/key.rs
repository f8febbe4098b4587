// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Aggregate categories and composite keys.

use alloc::format;
use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::config::{
    MAP_PERFORMANCE_PREFIX, MATCH_HISTORY_PREFIX, MATCH_UP_PREFIX, ON_SEPARATOR, SYNERGY_PREFIX,
    VS_SEPARATOR, WITH_SEPARATOR,
};

/// Top-level key prefix in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Append-only raw match log.
    MatchHistory,
    /// Directional hero-vs-hero records.
    MatchUp,
    /// Directional teammate-pair records.
    Synergy,
    /// Per hero per map records.
    MapPerformance,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::MatchHistory,
        Category::MatchUp,
        Category::Synergy,
        Category::MapPerformance,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            Category::MatchHistory => MATCH_HISTORY_PREFIX,
            Category::MatchUp => MATCH_UP_PREFIX,
            Category::Synergy => SYNERGY_PREFIX,
            Category::MapPerformance => MAP_PERFORMANCE_PREFIX,
        }
    }

    /// True for the three `{total, wins}` categories.
    pub const fn is_counter(self) -> bool {
        !matches!(self, Category::MatchHistory)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A counter key: `{category}/{subject}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregateKey {
    category: Category,
    subject: String,
}

impl AggregateKey {
    /// `mapPerformance/{hero}-on-{map}`
    pub fn map_performance(hero: &str, map: &str) -> Self {
        Self {
            category: Category::MapPerformance,
            subject: format!("{}{}{}", hero, ON_SEPARATOR, map),
        }
    }

    /// `matchUp/{hero}-vs-{opponent}`
    pub fn matchup(hero: &str, opponent: &str) -> Self {
        Self {
            category: Category::MatchUp,
            subject: format!("{}{}{}", hero, VS_SEPARATOR, opponent),
        }
    }

    /// `synergy/{hero}-with-{teammate}`
    pub fn synergy(hero: &str, teammate: &str) -> Self {
        Self {
            category: Category::Synergy,
            subject: format!("{}{}{}", hero, WITH_SEPARATOR, teammate),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The part after the category prefix, e.g. `Tracer-vs-Widowmaker`.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Full store path, e.g. `matchUp/Tracer-vs-Widowmaker`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.category.prefix(), self.subject)
    }
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.prefix(), self.subject)
    }
}
