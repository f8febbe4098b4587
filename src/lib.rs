// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! herostats-kernel: pure match validation and aggregate key derivation for
//! hero shooter match statistics.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod types;
pub mod validate;
pub mod derive;

pub use derive::{derive_updates, AggregateUpdate, UpdateCounts};
pub use error::{KernelResult, RosterError};
pub use types::key::{AggregateKey, Category};
pub use types::matches::MatchResult;
pub use types::record::{AggregateRecord, Increment};
pub use types::roster::Roster;
pub use validate::{check, check_team_size, validate, Rejection};

#[cfg(test)]
pub mod tests;
