use chrono::NaiveDate;

use epl_season_dash::aggregate::longest_win_streak;
use epl_season_dash::season::{FullTimeResult, MatchRecord};

fn played(day: u32, opponent: &str, for_goals: u32, against: u32, at_home: bool) -> MatchRecord {
    let (home_team, away_team, home_goals, away_goals) = if at_home {
        ("T", opponent, for_goals, against)
    } else {
        (opponent, "T", against, for_goals)
    };
    MatchRecord {
        date: NaiveDate::from_ymd_opt(2023, 8, day).unwrap(),
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_goals,
        away_goals,
        home_shots_on_target: home_goals + 1,
        away_shots_on_target: away_goals + 1,
        result: FullTimeResult::from_goals(home_goals, away_goals),
    }
}

fn wins_wins_draw_wins_wins_wins_loss() -> Vec<MatchRecord> {
    vec![
        played(1, "A", 2, 0, true),
        played(2, "B", 1, 0, false),
        played(3, "C", 1, 1, true),
        played(4, "D", 3, 2, false),
        played(5, "E", 2, 1, true),
        played(6, "F", 4, 0, false),
        played(7, "G", 0, 1, true),
    ]
}

#[test]
fn longest_run_after_a_draw_wins() {
    let streak = longest_win_streak(&wins_wins_draw_wins_wins_wins_loss(), "T");
    assert_eq!(streak.length, 3);
    let opponents: Vec<&str> = streak
        .matches
        .iter()
        .map(|m| if m.home_team == "T" { m.away_team.as_str() } else { m.home_team.as_str() })
        .collect();
    assert_eq!(opponents, ["D", "E", "F"]);
}

#[test]
fn unsorted_input_gives_the_same_streak() {
    let sorted = wins_wins_draw_wins_wins_wins_loss();
    let mut shuffled = sorted.clone();
    shuffled.swap(0, 6);
    shuffled.swap(2, 4);
    assert_eq!(
        longest_win_streak(&shuffled, "T"),
        longest_win_streak(&sorted, "T")
    );
}

#[test]
fn run_still_going_at_season_end_counts() {
    let mut matches = wins_wins_draw_wins_wins_wins_loss();
    matches.pop();
    matches.push(played(8, "H", 1, 0, true));
    assert_eq!(longest_win_streak(&matches, "T").length, 4);
}

#[test]
fn all_wins_and_no_matches() {
    let all: Vec<MatchRecord> = (1..=6).map(|d| played(d, "X", 1, 0, d % 2 == 0)).collect();
    assert_eq!(longest_win_streak(&all, "T").length, all.len());
    let none = longest_win_streak(&all, "Nobody");
    assert_eq!(none.length, 0);
    assert!(none.matches.is_empty());
}
