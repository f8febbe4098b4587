// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::MAX_TEAM_SIZE;
use crate::types::matches::MatchResult;
use crate::types::roster::{Roster, STANDARD_HEROES, STANDARD_MAPS};
use crate::validate::{check, check_team_size, validate, Rejection};

#[test]
fn test_every_roster_name_is_accepted() {
    let roster = Roster::standard();
    for (i, map) in STANDARD_MAPS.iter().enumerate() {
        let winners: Vec<&str> = STANDARD_HEROES.iter().copied().skip(i).take(5).collect();
        let losers: Vec<&str> = STANDARD_HEROES.iter().copied().rev().skip(i).take(5).collect();
        let m = MatchResult::new(*map, winners, losers);
        assert!(validate(&roster, &m), "rejected {:?}", m);
    }
}

#[test]
fn test_single_illegal_name_rejects_whole_match() {
    let roster = Roster::standard();

    let bad_map = MatchResult::new("Nowhereville", ["Tracer"], ["Widowmaker"]);
    assert_eq!(check(&roster, &bad_map), Err(Rejection::UnknownMap("Nowhereville".into())));

    let bad_winner = MatchResult::new("Dorado", ["Tracer", "Gandalf"], ["Widowmaker"]);
    assert_eq!(check(&roster, &bad_winner), Err(Rejection::UnknownHero("Gandalf".into())));

    let bad_loser = MatchResult::new("Dorado", ["Tracer"], ["Widowmaker", "tracer"]);
    assert!(!validate(&roster, &bad_loser));
}

#[test]
fn test_empty_teams_are_vacuously_valid() {
    let roster = Roster::standard();
    let empty: [String; 0] = [];
    let m = MatchResult::new("Ilios", empty.clone(), empty);
    assert!(validate(&roster, &m));

    let missing_map = MatchResult::default();
    assert!(!validate(&roster, &missing_map));
}

#[test]
fn test_duplicate_heroes_are_allowed() {
    let roster = Roster::standard();
    let m = MatchResult::new("Busan", ["Mercy", "Mercy"], ["Mercy"]);
    assert!(validate(&roster, &m));
}

#[test]
fn test_decodes_hyphenated_wire_fields() {
    let body = r#"{"map":"Dorado","winning-team":["Tracer"],"losing-team":["Ana"]}"#;
    let m: MatchResult = serde_json::from_str(body).unwrap();
    assert_eq!(m, MatchResult::new("Dorado", ["Tracer"], ["Ana"]));

    let partial: MatchResult = serde_json::from_str(r#"{"winning-team":["Tracer"]}"#).unwrap();
    assert!(partial.map.is_empty());
    assert!(partial.losing_team.is_empty());
}

#[test]
fn test_team_size_limit() {
    let six = ["Ana", "Mei", "Sigma", "Genji", "Mercy", "Pharah"];
    let m = MatchResult::new("Dorado", six, six);
    assert_eq!(check_team_size(&m, MAX_TEAM_SIZE), Ok(()));

    let crowd: Vec<&str> = core::iter::repeat("Ana").take(40_000).collect();
    let huge = MatchResult::new("Dorado", crowd, ["Mei"]);
    assert!(validate(&Roster::standard(), &huge));
    assert_eq!(
        check_team_size(&huge, MAX_TEAM_SIZE),
        Err(Rejection::TeamTooLarge { size: 40_000, max: MAX_TEAM_SIZE })
    );

    let seven_losers = MatchResult::new("Dorado", ["Ana"], ["Mei"; 7]);
    assert!(check_team_size(&seven_losers, MAX_TEAM_SIZE).is_err());
}
