// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod key;
pub mod matches;
pub mod record;
pub mod roster;
