use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{self, ConversionRow, StandingsRow};
use crate::dashboard::TeamReport;
use crate::season::Season;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub standings: usize,
    pub conversion: usize,
    pub team_rows: usize,
}

/// Writes `Standings` and `Conversion` sheets, plus a `Team` sheet when a
/// report is given.
pub fn export_season_workbook(
    path: &Path,
    season: &Season,
    report: Option<&TeamReport>,
) -> Result<ExportReport> {
    let standings = aggregate::compute_standings(&season.matches);
    let conversion = aggregate::conversion_table(&season.matches);

    let mut standings_rows = vec![vec![
        "Rank".to_string(),
        "Team".to_string(),
        "Matches".to_string(),
        "Wins".to_string(),
        "Draws".to_string(),
        "Losses".to_string(),
        "Points".to_string(),
    ]];
    standings_rows.extend(standings.iter().map(standings_row));

    let mut conversion_rows = vec![vec![
        "Team".to_string(),
        "Goals".to_string(),
        "Shots on Target".to_string(),
        "Conversion Rate (%)".to_string(),
    ]];
    conversion_rows.extend(conversion.iter().map(conversion_row));

    let team_rows = report.map(team_rows).unwrap_or_default();

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings").context("name standings sheet")?;
        write_rows(sheet, &standings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Conversion").context("name conversion sheet")?;
        write_rows(sheet, &conversion_rows)?;
    }
    if !team_rows.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Team").context("name team sheet")?;
        write_rows(sheet, &team_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    info!("exported season workbook to {}", path.display());
    Ok(ExportReport {
        standings: standings.len(),
        conversion: conversion.len(),
        team_rows: team_rows.len(),
    })
}

fn standings_row(row: &StandingsRow) -> Vec<String> {
    vec![
        row.rank.to_string(),
        row.team.clone(),
        row.matches.to_string(),
        row.wins.to_string(),
        row.draws.to_string(),
        row.losses.to_string(),
        row.points.to_string(),
    ]
}

fn conversion_row(row: &ConversionRow) -> Vec<String> {
    vec![
        row.team.clone(),
        row.goals.to_string(),
        row.shots_on_target.to_string(),
        format!("{:.2}", row.conversion_pct),
    ]
}

fn team_rows(report: &TeamReport) -> Vec<Vec<String>> {
    let s = &report.summary;
    let pair = |k: &str, v: String| vec![k.to_string(), v];
    let mut rows = vec![
        pair("Team", report.team.clone()),
        pair("Position", report.rank_label()),
        pair("Goals Scored", s.goals_scored.to_string()),
        pair("Goals Conceded", s.goals_conceded.to_string()),
        pair("Goal Difference", s.goal_difference.to_string()),
        pair("Home Fouls", s.home_fouls.to_string()),
        pair("Away Fouls", s.away_fouls.to_string()),
        pair("Total Fouls", s.total_fouls.to_string()),
        pair(
            "Shot Conversion Rate (%)",
            format!("{:.2}", report.conversion.conversion_pct),
        ),
        pair("Yellow Cards", s.yellow_cards.to_string()),
        pair("Red Cards", s.red_cards.to_string()),
        pair("Longest Win Streak", report.streak.length.to_string()),
        Vec::new(),
        vec![
            "Recent".to_string(),
            "Date".to_string(),
            "Home".to_string(),
            "Away".to_string(),
            "Home Goals".to_string(),
            "Away Goals".to_string(),
        ],
    ];
    for r in &report.recent {
        rows.push(vec![
            r.outcome.letter().to_string(),
            r.record.date.format("%Y-%m-%d").to_string(),
            r.record.home_team.clone(),
            r.record.away_team.clone(),
            r.record.home_goals.to_string(),
            r.record.away_goals.to_string(),
        ]);
    }
    rows.push(Vec::new());
    rows.push(vec!["Win Streak".to_string()]);
    for m in &report.streak.matches {
        rows.push(vec![
            "W".to_string(),
            m.date.format("%Y-%m-%d").to_string(),
            m.home_team.clone(),
            m.away_team.clone(),
            m.home_goals.to_string(),
            m.away_goals.to_string(),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
