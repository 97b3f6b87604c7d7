use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Month};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::season::{DisciplinaryTable, FullTimeResult, MatchRecord};

pub const DEFAULT_RECENT_COUNT: usize = 5;

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

/// Months a league season spans, in calendar order from kickoff.
pub const SEASON_MONTHS: [Month; 10] = [
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: usize,
    pub team: String,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRow {
    pub team: String,
    pub goals: u32,
    pub shots_on_target: u32,
    pub conversion_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub matches: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub goal_difference: i64,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub total_fouls: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn letter(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Draw => 'D',
            Self::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentResult {
    pub record: MatchRecord,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub team: String,
    pub length: usize,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeBreakdown {
    pub team: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: Month,
    pub matches: u32,
}

/// Every team that appears on either side of a fixture, in first-seen order.
pub fn team_roster(matches: &[MatchRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut roster = Vec::new();
    for m in matches {
        for team in [&m.home_team, &m.away_team] {
            if seen.insert(team.as_str()) {
                roster.push(team.clone());
            }
        }
    }
    roster
}

pub fn sorted_team_names(matches: &[MatchRecord]) -> Vec<String> {
    let mut names = team_roster(matches);
    names.sort();
    names
}

pub fn compute_standings(matches: &[MatchRecord]) -> Vec<StandingsRow> {
    let roster = team_roster(matches);
    let mut tallies: HashMap<&str, (u32, u32, u32)> = roster
        .iter()
        .map(|team| (team.as_str(), (0, 0, 0)))
        .collect();

    for m in matches {
        let (home_delta, away_delta) = match m.result {
            FullTimeResult::HomeWin => ((1, 0, 0), (0, 0, 1)),
            FullTimeResult::Draw => ((0, 1, 0), (0, 1, 0)),
            FullTimeResult::AwayWin => ((0, 0, 1), (1, 0, 0)),
        };
        for (team, delta) in [(&m.home_team, home_delta), (&m.away_team, away_delta)] {
            if let Some(t) = tallies.get_mut(team.as_str()) {
                t.0 += delta.0;
                t.1 += delta.1;
                t.2 += delta.2;
            }
        }
    }

    let mut rows: Vec<StandingsRow> = roster
        .iter()
        .map(|team| {
            let (wins, draws, losses) = tallies.get(team.as_str()).copied().unwrap_or_default();
            StandingsRow {
                rank: 0,
                team: team.clone(),
                matches: wins + draws + losses,
                wins,
                draws,
                losses,
                points: wins * POINTS_PER_WIN + draws * POINTS_PER_DRAW,
            }
        })
        .collect();

    // Stable: equal (points, wins) keeps roster order.
    rows.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    debug!("standings computed for {} teams", rows.len());
    rows
}

pub fn rank_of(standings: &[StandingsRow], team: &str) -> Option<usize> {
    standings.iter().find(|row| row.team == team).map(|row| row.rank)
}

pub fn ordinal_label(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

pub fn team_summary(
    matches: &[MatchRecord],
    discipline: &DisciplinaryTable,
    team: &str,
) -> TeamSummary {
    let mut played = 0u32;
    let mut scored = 0u32;
    let mut conceded = 0u32;
    for m in matches.iter().filter(|m| m.involves(team)) {
        let (goals_for, goals_against) = m.goals_for_against(team);
        played += 1;
        scored += goals_for;
        conceded += goals_against;
    }

    let card = discipline.get(team).cloned().unwrap_or_default();
    TeamSummary {
        team: team.to_string(),
        matches: played,
        goals_scored: scored,
        goals_conceded: conceded,
        goal_difference: i64::from(scored) - i64::from(conceded),
        home_fouls: card.home_fouls,
        away_fouls: card.away_fouls,
        total_fouls: card.total_fouls,
        yellow_cards: card.yellow_cards,
        red_cards: card.red_cards,
    }
}

/// League-wide goals and shots on target per team, built in one pass.
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    totals: HashMap<String, (u32, u32)>,
    order: Vec<String>,
}

impl ConversionTable {
    pub fn build(matches: &[MatchRecord]) -> Self {
        let mut table = Self::default();
        for m in matches {
            table.add(&m.home_team, m.home_goals, m.home_shots_on_target);
            table.add(&m.away_team, m.away_goals, m.away_shots_on_target);
        }
        table
    }

    fn add(&mut self, team: &str, goals: u32, shots: u32) {
        if !self.totals.contains_key(team) {
            self.order.push(team.to_string());
        }
        let entry = self.totals.entry(team.to_string()).or_default();
        entry.0 += goals;
        entry.1 += shots;
    }

    pub fn row(&self, team: &str) -> ConversionRow {
        let (goals, shots_on_target) = self.totals.get(team).copied().unwrap_or_default();
        ConversionRow {
            team: team.to_string(),
            goals,
            shots_on_target,
            conversion_pct: conversion_pct(goals, shots_on_target),
        }
    }

    pub fn rate(&self, team: &str) -> f64 {
        self.row(team).conversion_pct
    }

    /// Rows in first-seen team order.
    pub fn rows(&self) -> Vec<ConversionRow> {
        self.order.iter().map(|team| self.row(team)).collect()
    }
}

fn conversion_pct(goals: u32, shots_on_target: u32) -> f64 {
    if shots_on_target == 0 {
        return 0.0;
    }
    let pct = f64::from(goals) / f64::from(shots_on_target) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Goals per shot on target, in percent. Own goals count as goals for the
/// scoring side without a shot, so the rate can exceed 100.
pub fn conversion_rate(matches: &[MatchRecord], team: &str) -> f64 {
    ConversionTable::build(matches).rate(team)
}

/// All teams, best conversion first.
pub fn conversion_table(matches: &[MatchRecord]) -> Vec<ConversionRow> {
    let mut rows = ConversionTable::build(matches).rows();
    rows.sort_by(|a, b| {
        b.conversion_pct
            .partial_cmp(&a.conversion_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    rows
}

/// Outcome from `team`'s side, judged on goals.
pub fn classify_result(record: &MatchRecord, team: &str) -> MatchOutcome {
    let (goals_for, goals_against) = record.goals_for_against(team);
    match goals_for.cmp(&goals_against) {
        Ordering::Greater => MatchOutcome::Win,
        Ordering::Equal => MatchOutcome::Draw,
        Ordering::Less => MatchOutcome::Loss,
    }
}

/// Last `n` of `team`'s matches in the slice's own order.
pub fn recent_results(matches: &[MatchRecord], team: &str, n: usize) -> Vec<RecentResult> {
    let played: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(team)).collect();
    let start = played.len().saturating_sub(n);
    played[start..]
        .iter()
        .map(|m| RecentResult {
            record: (*m).clone(),
            outcome: classify_result(m, team),
        })
        .collect()
}

/// Longest run of consecutive wins by date. Draws break a run. On equal
/// length the earlier run is kept.
pub fn longest_win_streak(matches: &[MatchRecord], team: &str) -> StreakResult {
    let mut played: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(team)).collect();
    played.sort_by_key(|m| m.date);

    let mut best: Vec<&MatchRecord> = Vec::new();
    let mut current: Vec<&MatchRecord> = Vec::new();
    for m in played {
        if m.is_win_for(team) {
            current.push(m);
        } else {
            if current.len() > best.len() {
                best = std::mem::take(&mut current);
            }
            current.clear();
        }
    }
    if current.len() > best.len() {
        best = current;
    }

    StreakResult {
        team: team.to_string(),
        length: best.len(),
        matches: best.into_iter().cloned().collect(),
    }
}

pub fn outcome_breakdown(matches: &[MatchRecord], team: &str) -> OutcomeBreakdown {
    let mut wins = 0u32;
    let mut draws = 0u32;
    let mut total = 0u32;
    for m in matches.iter().filter(|m| m.involves(team)) {
        total += 1;
        if m.is_win_for(team) {
            wins += 1;
        } else if m.result == FullTimeResult::Draw {
            draws += 1;
        }
    }
    OutcomeBreakdown {
        team: team.to_string(),
        wins,
        draws,
        losses: total - wins - draws,
        total,
    }
}

/// Matches per month over [`SEASON_MONTHS`]; June and July fixtures are not
/// counted.
pub fn monthly_distribution(matches: &[MatchRecord], team: &str) -> Vec<MonthlyCount> {
    let mut counts: HashMap<u32, u32> = HashMap::new();
    for m in matches.iter().filter(|m| m.involves(team)) {
        *counts.entry(m.date.month()).or_default() += 1;
    }
    SEASON_MONTHS
        .iter()
        .map(|month| MonthlyCount {
            month: *month,
            matches: counts.get(&month.number_from_month()).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::season::DisciplinaryRecord;

    fn fixture(day: u32, home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap() + chrono::Duration::days(day as i64),
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: hg,
            away_goals: ag,
            home_shots_on_target: hg + 2,
            away_shots_on_target: ag + 1,
            result: FullTimeResult::from_goals(hg, ag),
        }
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            fixture(0, "Arsenal", "Chelsea", 2, 0),
            fixture(1, "Chelsea", "Spurs", 1, 1),
            fixture(2, "Spurs", "Arsenal", 0, 3),
            fixture(3, "Chelsea", "Arsenal", 2, 2),
            fixture(4, "Arsenal", "Spurs", 0, 1),
            fixture(5, "Spurs", "Chelsea", 2, 1),
        ]
    }

    #[test]
    fn standings_points_and_totals_line_up() {
        let rows = compute_standings(&sample());
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.wins + row.draws + row.losses, row.matches);
            assert_eq!(row.points, 3 * row.wins + row.draws);
        }
        assert_eq!(rows[0].team, "Arsenal");
        assert_eq!(rows[0].points, 7);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].team, "Spurs");
        assert_eq!(rows[1].points, 7);
        assert_eq!(rows[2].team, "Chelsea");
        assert_eq!(rows[2].rank, 3);
    }

    #[test]
    fn standings_include_away_only_teams() {
        let matches = vec![fixture(0, "Arsenal", "Luton", 1, 2)];
        let rows = compute_standings(&matches);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team, "Luton");
        assert_eq!(rows[0].points, 3);
    }

    #[test]
    fn standings_ties_keep_each_team_once() {
        let matches = vec![
            fixture(0, "Arsenal", "Chelsea", 1, 0),
            fixture(1, "Chelsea", "Arsenal", 1, 0),
        ];
        let rows = compute_standings(&matches);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].points, rows[1].points);
        assert_eq!(rows[0].wins, rows[1].wins);
        assert_ne!(rows[0].team, rows[1].team);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn standings_of_nothing_is_empty() {
        assert!(compute_standings(&[]).is_empty());
    }

    #[test]
    fn ordinal_labels() {
        let labels: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 20, 21, 22, 23, 101, 111]
            .into_iter()
            .map(ordinal_label)
            .collect();
        assert_eq!(
            labels,
            [
                "1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "20th", "21st", "22nd",
                "23rd", "101st", "111th"
            ]
        );
    }

    #[test]
    fn summary_counts_goals_from_both_sides() {
        let mut discipline = DisciplinaryTable::new();
        discipline.insert(DisciplinaryRecord {
            team: "Arsenal".to_string(),
            home_fouls: 10,
            away_fouls: 12,
            total_fouls: 22,
            yellow_cards: 5,
            red_cards: 1,
        });
        let summary = team_summary(&sample(), &discipline, "Arsenal");
        assert_eq!(summary.matches, 4);
        assert_eq!(summary.goals_scored, 7);
        assert_eq!(summary.goals_conceded, 3);
        assert_eq!(summary.goal_difference, 4);
        assert_eq!(summary.total_fouls, 22);
        assert_eq!(summary.red_cards, 1);
    }

    #[test]
    fn summary_without_discipline_row_is_zero() {
        let summary = team_summary(&sample(), &DisciplinaryTable::new(), "Chelsea");
        assert_eq!(summary.home_fouls, 0);
        assert_eq!(summary.away_fouls, 0);
        assert_eq!(summary.total_fouls, 0);
        assert_eq!(summary.yellow_cards, 0);
        assert_eq!(summary.red_cards, 0);
        assert_eq!(summary.goal_difference, -3);
    }

    #[test]
    fn conversion_rounds_to_two_places() {
        let matches = vec![MatchRecord {
            home_shots_on_target: 3,
            ..fixture(0, "Arsenal", "Chelsea", 1, 0)
        }];
        assert_eq!(conversion_rate(&matches, "Arsenal"), 33.33);
    }

    #[test]
    fn conversion_is_zero_without_shots() {
        let matches = vec![MatchRecord {
            away_shots_on_target: 0,
            ..fixture(0, "Arsenal", "Chelsea", 1, 0)
        }];
        assert_eq!(conversion_rate(&matches, "Chelsea"), 0.0);
        assert_eq!(conversion_rate(&matches, "Nobody"), 0.0);
    }

    #[test]
    fn own_goals_can_lift_conversion_past_a_hundred() {
        let mut m = fixture(0, "Luton", "Burnley", 2, 0);
        m.home_shots_on_target = 1;
        assert_eq!(conversion_rate(&[m], "Luton"), 200.0);
    }

    #[test]
    fn conversion_table_is_sorted_best_first() {
        let rows = conversion_table(&sample());
        assert_eq!(rows.len(), 3);
        for pair in rows.windows(2) {
            assert!(pair[0].conversion_pct >= pair[1].conversion_pct);
        }
        for row in &rows {
            assert!((0.0..=100.0).contains(&row.conversion_pct));
        }
    }

    #[test]
    fn recent_results_keep_slice_order() {
        let recent = recent_results(&sample(), "Arsenal", 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record.home_team, "Chelsea");
        assert_eq!(recent[0].outcome, MatchOutcome::Draw);
        assert_eq!(recent[1].outcome, MatchOutcome::Loss);

        let all = recent_results(&sample(), "Arsenal", DEFAULT_RECENT_COUNT);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].outcome, MatchOutcome::Win);
    }

    #[test]
    fn streak_prefers_longest_run_and_checks_the_tail() {
        let opponents = ["A", "B", "C", "D", "E", "F", "G"];
        let scores = [(1, 0), (2, 0), (1, 1), (3, 1), (1, 0), (4, 2), (0, 1)];
        let matches: Vec<MatchRecord> = opponents
            .iter()
            .zip(scores)
            .enumerate()
            .map(|(i, (opp, (hg, ag)))| fixture(i as u32, "T", opp, hg, ag))
            .collect();
        let streak = longest_win_streak(&matches, "T");
        assert_eq!(streak.length, 3);
        let opps: Vec<&str> = streak.matches.iter().map(|m| m.away_team.as_str()).collect();
        assert_eq!(opps, ["D", "E", "F"]);

        let ongoing: Vec<MatchRecord> = matches[..6].to_vec();
        assert_eq!(longest_win_streak(&ongoing, "T").length, 3);
    }

    #[test]
    fn streak_sorts_by_date_first() {
        let mut matches = vec![
            fixture(0, "T", "A", 1, 0),
            fixture(1, "T", "B", 0, 0),
            fixture(2, "T", "C", 1, 0),
            fixture(3, "T", "D", 1, 0),
        ];
        matches.reverse();
        let streak = longest_win_streak(&matches, "T");
        assert_eq!(streak.length, 2);
        assert_eq!(streak.matches[0].away_team, "C");
    }

    #[test]
    fn streak_edges() {
        assert_eq!(longest_win_streak(&sample(), "Nobody").length, 0);
        assert!(longest_win_streak(&sample(), "Nobody").matches.is_empty());

        let all_wins = vec![
            fixture(0, "T", "A", 1, 0),
            fixture(1, "B", "T", 0, 2),
            fixture(2, "T", "C", 5, 0),
        ];
        assert_eq!(longest_win_streak(&all_wins, "T").length, 3);
    }

    #[test]
    fn breakdown_matches_standings() {
        let matches = sample();
        let breakdown = outcome_breakdown(&matches, "Spurs");
        let row = compute_standings(&matches)
            .into_iter()
            .find(|r| r.team == "Spurs")
            .unwrap();
        assert_eq!(breakdown.wins, row.wins);
        assert_eq!(breakdown.draws, row.draws);
        assert_eq!(breakdown.losses, row.losses);
        assert_eq!(breakdown.total, row.matches);
    }

    #[test]
    fn monthly_distribution_covers_season_window() {
        let mut matches = sample();
        matches.push(MatchRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            ..fixture(0, "Arsenal", "Spurs", 1, 0)
        });
        let months = monthly_distribution(&matches, "Arsenal");
        assert_eq!(months.len(), 10);
        assert_eq!(months[0].month, Month::August);
        assert_eq!(months[1].month, Month::September);
        assert_eq!(months[1].matches, 4);
        assert_eq!(months.iter().map(|m| m.matches).sum::<u32>(), 4);
    }

    #[test]
    fn aggregations_leave_input_untouched() {
        let matches = sample();
        let before = matches.clone();
        let first = compute_standings(&matches);
        let _ = longest_win_streak(&matches, "Arsenal");
        let _ = monthly_distribution(&matches, "Arsenal");
        let _ = recent_results(&matches, "Arsenal", 5);
        assert_eq!(matches, before);
        assert_eq!(compute_standings(&matches), first);
    }
}
