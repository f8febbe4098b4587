// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Match validation against the roster.

use alloc::string::{String, ToString};
use core::fmt;

use crate::types::matches::MatchResult;
use crate::types::roster::Roster;

/// Why a match was refused. Only the first offending name is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    UnknownMap(String),
    UnknownHero(String),
    TeamTooLarge { size: usize, max: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownMap(name) => write!(f, "unknown map {:?}", name),
            Rejection::UnknownHero(name) => write!(f, "unknown hero {:?}", name),
            Rejection::TeamTooLarge { size, max } => {
                write!(f, "team of {} heroes exceeds the limit of {}", size, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Rejection {}

/// Checks the map, then the losing team, then the winning team.
/// Empty teams pass; team size is not enforced here.
pub fn check(roster: &Roster, m: &MatchResult) -> Result<(), Rejection> {
    if !roster.is_map(&m.map) {
        return Err(Rejection::UnknownMap(m.map.clone()));
    }
    if let Some(hero) = m
        .losing_team
        .iter()
        .chain(m.winning_team.iter())
        .find(|h| !roster.is_hero(h))
    {
        return Err(Rejection::UnknownHero(hero.to_string()));
    }
    Ok(())
}

/// Refuses a match when either team has more than `max` heroes.
pub fn check_team_size(m: &MatchResult, max: usize) -> Result<(), Rejection> {
    let size = m.winning_team.len().max(m.losing_team.len());
    if size > max {
        return Err(Rejection::TeamTooLarge { size, max });
    }
    Ok(())
}

/// True when every name in the match is on the roster.
pub fn validate(roster: &Roster, m: &MatchResult) -> bool {
    check(roster, m).is_ok()
}
