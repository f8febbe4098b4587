// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Key layout constants.

/// Joins a hero and a map in a map-performance key.
pub const ON_SEPARATOR: &str = "-on-";

/// Joins two opposing heroes in a matchup key.
pub const VS_SEPARATOR: &str = "-vs-";

/// Joins two teammates in a synergy key.
pub const WITH_SEPARATOR: &str = "-with-";

/// Separators that must never appear inside a roster name, otherwise two
/// different pairs could render to the same key.
pub const RESERVED_SEPARATORS: [&str; 3] = [ON_SEPARATOR, VS_SEPARATOR, WITH_SEPARATOR];

/// Characters that cannot appear in a single store path segment.
pub const FORBIDDEN_PATH_CHARS: [char; 6] = ['/', '.', '$', '#', '[', ']'];

pub const MATCH_HISTORY_PREFIX: &str = "matchHistory";
pub const MATCH_UP_PREFIX: &str = "matchUp";
pub const SYNERGY_PREFIX: &str = "synergy";
pub const MAP_PERFORMANCE_PREFIX: &str = "mapPerformance";

/// Largest team a submission may carry. Derived updates grow with the
/// square of team size.
pub const MAX_TEAM_SIZE: usize = 6;
