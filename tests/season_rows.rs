use std::fs;
use std::path::PathBuf;

use epl_season_dash::aggregate::team_summary;
use epl_season_dash::records::{RawSeason, RecordError};
use epl_season_dash::season::{FullTimeResult, Season};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn small_season() -> Season {
    let raw: RawSeason =
        serde_json::from_str(&read_fixture("season_small.json")).expect("fixture should parse");
    Season::from_raw(raw).expect("fixture rows should validate")
}

#[test]
fn fixture_rows_become_typed_records() {
    let season = small_season();
    assert_eq!(season.matches.len(), 9);
    let sept = &season.matches[3];
    assert_eq!(sept.date.to_string(), "2023-09-02");
    assert_eq!(sept.result, FullTimeResult::Draw);
    assert_eq!(season.matches[4].away_team, "Luton");
}

#[test]
fn discipline_tables_are_joined_on_trimmed_names() {
    let season = small_season();
    let city = season.discipline.get("Man City").expect("city row");
    assert_eq!(city.total_fouls, 310);
    assert_eq!(city.yellow_cards, 64);
    assert_eq!(city.red_cards, 0);
    let arsenal = season.discipline.get("Arsenal").expect("arsenal row");
    assert_eq!(arsenal.red_cards, 3);
}

#[test]
fn team_missing_from_discipline_reports_zero() {
    let season = small_season();
    assert!(season.discipline.get("Luton").is_none());
    let summary = team_summary(&season.matches, &season.discipline, "Luton");
    assert_eq!(summary.matches, 3);
    assert_eq!(summary.total_fouls, 0);
    assert_eq!(summary.yellow_cards, 0);
    assert_eq!(summary.red_cards, 0);
    assert_eq!(summary.goals_scored, 1);
    assert_eq!(summary.goals_conceded, 10);
}

#[test]
fn unknown_result_code_stops_the_load() {
    let raw = r#"{
        "matches": [
            {"Date": "2023-08-12", "HomeTeam": "Arsenal", "AwayTeam": "Forest",
             "FullTimeHomeTeamGoals": 2, "FullTimeAwayTeamGoals": 1,
             "HomeTeamShotsOnTarget": 5, "AwayTeamShotsOnTarget": 2,
             "FullTimeResult": "?"}
        ]
    }"#;
    let raw: RawSeason = serde_json::from_str(raw).expect("json should parse");
    let err = Season::from_raw(raw).unwrap_err();
    match err {
        RecordError::Row { index, source } => {
            assert_eq!(index, 0);
            assert_eq!(*source, RecordError::UnknownResult("?".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}
