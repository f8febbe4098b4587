// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Legal map and hero names.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};

use crate::config::{FORBIDDEN_PATH_CHARS, RESERVED_SEPARATORS};
use crate::error::{KernelResult, NameKind, RosterError};

/// Current map pool.
pub const STANDARD_MAPS: &[&str] = &[
    // Control
    "Antarctic Peninsula",
    "Busan",
    "Ilios",
    "Lijiang Tower",
    "Nepal",
    "Oasis",
    "Samoa",
    // Escort
    "Circuit Royal",
    "Dorado",
    "Havana",
    "Junkertown",
    "Rialto",
    "Route 66",
    "Shambali Monastery",
    "Watchpoint: Gibraltar",
    // Hybrid
    "Blizzard World",
    "Eichenwalde",
    "Hollywood",
    "King's Row",
    "Midtown",
    "Numbani",
    "Paraiso",
    // Push
    "Colosseo",
    "Esperanca",
    "New Queen Street",
    "Runasapi",
    // Flashpoint
    "New Junk City",
    "Suravasa",
    // Clash
    "Hanaoka",
    "Throne of Anubis",
];

/// Current hero pool. `DVa` is spelled without the dot, which the store
/// rejects in path segments.
pub const STANDARD_HEROES: &[&str] = &[
    // Tank
    "DVa",
    "Doomfist",
    "Hazard",
    "Junker Queen",
    "Mauga",
    "Orisa",
    "Ramattra",
    "Reinhardt",
    "Roadhog",
    "Sigma",
    "Winston",
    "Wrecking Ball",
    "Zarya",
    // Damage
    "Ashe",
    "Bastion",
    "Cassidy",
    "Echo",
    "Genji",
    "Hanzo",
    "Junkrat",
    "Mei",
    "Pharah",
    "Reaper",
    "Sojourn",
    "Soldier: 76",
    "Sombra",
    "Symmetra",
    "Torbjorn",
    "Tracer",
    "Venture",
    "Widowmaker",
    // Support
    "Ana",
    "Baptiste",
    "Brigitte",
    "Illari",
    "Juno",
    "Kiriko",
    "Lifeweaver",
    "Lucio",
    "Mercy",
    "Moira",
    "Zenyatta",
];

/// The fixed sets a submitted match is checked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    maps: BTreeSet<String>,
    heroes: BTreeSet<String>,
}

impl Roster {
    /// Builds a roster, refusing any name that could not be embedded in a key
    /// without ambiguity.
    pub fn new<M, H>(maps: M, heroes: H) -> KernelResult<Self>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        let mut roster = Self {
            maps: BTreeSet::new(),
            heroes: BTreeSet::new(),
        };
        for name in maps {
            let name = name.as_ref();
            check_name(NameKind::Map, name)?;
            roster.maps.insert(name.to_string());
        }
        for name in heroes {
            let name = name.as_ref();
            check_name(NameKind::Hero, name)?;
            roster.heroes.insert(name.to_string());
        }
        Ok(roster)
    }

    /// The built-in map and hero pool.
    pub fn standard() -> Self {
        Self {
            maps: STANDARD_MAPS.iter().map(|m| m.to_string()).collect(),
            heroes: STANDARD_HEROES.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn is_map(&self, name: &str) -> bool {
        self.maps.contains(name)
    }

    pub fn is_hero(&self, name: &str) -> bool {
        self.heroes.contains(name)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rejects names that are empty, contain a key separator, or contain a
/// character that is illegal in a store path segment.
pub fn check_name(kind: NameKind, name: &str) -> KernelResult<()> {
    if name.trim().is_empty() {
        return Err(RosterError::EmptyName { kind });
    }
    if let Some(separator) = RESERVED_SEPARATORS
        .iter()
        .copied()
        .find(|sep| name.contains(sep))
    {
        return Err(RosterError::ReservedSeparator {
            kind,
            name: name.to_string(),
            separator,
        });
    }
    if let Some(ch) = name
        .chars()
        .find(|c| FORBIDDEN_PATH_CHARS.contains(c) || c.is_control())
    {
        return Err(RosterError::ForbiddenCharacter {
            kind,
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}
