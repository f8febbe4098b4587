// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use alloc::string::String;
use core::fmt;

/// Which roster table a rejected name came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameKind {
    Map,
    Hero,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Map => f.write_str("map"),
            NameKind::Hero => f.write_str("hero"),
        }
    }
}

/// A roster name that cannot be safely embedded in an aggregate key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterError {
    /// Name is empty or only whitespace.
    EmptyName { kind: NameKind },
    /// Name contains one of the key separators (`-on-`, `-vs-`, `-with-`).
    ReservedSeparator {
        kind: NameKind,
        name: String,
        separator: &'static str,
    },
    /// Name contains a character the store does not allow in a path segment.
    ForbiddenCharacter { kind: NameKind, name: String, ch: char },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::EmptyName { kind } => write!(f, "empty {} name", kind),
            RosterError::ReservedSeparator { kind, name, separator } => {
                write!(f, "{} name {:?} contains reserved separator {:?}", kind, name, separator)
            }
            RosterError::ForbiddenCharacter { kind, name, ch } => {
                write!(f, "{} name {:?} contains forbidden character {:?}", kind, name, ch)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RosterError {}

pub type KernelResult<T> = core::result::Result<T, RosterError>;
