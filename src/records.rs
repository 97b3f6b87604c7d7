use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::season::{
    DisciplinaryRecord, DisciplinaryTable, FullTimeResult, MatchRecord, Season,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unparseable match date {0:?}")]
    InvalidDate(String),
    #[error("unknown full-time result code {0:?}")]
    UnknownResult(String),
    #[error("result {code} disagrees with score {home_goals}-{away_goals}")]
    InconsistentResult {
        code: char,
        home_goals: u32,
        away_goals: u32,
    },
    #[error("empty team name")]
    EmptyTeam,
    #[error("match row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<RecordError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatchRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "HomeTeam")]
    pub home_team: String,
    #[serde(rename = "AwayTeam")]
    pub away_team: String,
    #[serde(rename = "FullTimeHomeTeamGoals")]
    pub home_goals: u32,
    #[serde(rename = "FullTimeAwayTeamGoals")]
    pub away_goals: u32,
    #[serde(rename = "HomeTeamShotsOnTarget")]
    pub home_shots_on_target: u32,
    #[serde(rename = "AwayTeamShotsOnTarget")]
    pub away_shots_on_target: u32,
    #[serde(rename = "FullTimeResult")]
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFoulsRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "HomeFouls")]
    pub home_fouls: u32,
    #[serde(rename = "AwayFouls")]
    pub away_fouls: u32,
    #[serde(rename = "TotalFouls")]
    pub total_fouls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawYellowRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "TotalYellows")]
    pub total_yellows: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRedRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "TotalReds")]
    pub total_reds: u32,
}

/// Snapshot of all four source tables as handed over by a loader. Rows are
/// validated into the typed records in [`crate::season`] by [`Season::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSeason {
    pub matches: Vec<RawMatchRow>,
    #[serde(default)]
    pub fouls: Vec<RawFoulsRow>,
    #[serde(default)]
    pub yellows: Vec<RawYellowRow>,
    #[serde(default)]
    pub reds: Vec<RawRedRow>,
}

/// Two-digit years are tried before four-digit ones; chrono's `%Y` would
/// otherwise read `23` as the year 23.
pub fn parse_match_date(raw: &str) -> Result<NaiveDate, RecordError> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let cleaned = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Ok(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Ok(dt.date());
        }
    }
    Err(RecordError::InvalidDate(raw.to_string()))
}

fn clean_team(raw: &str) -> Result<String, RecordError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecordError::EmptyTeam);
    }
    Ok(trimmed.to_string())
}

impl TryFrom<RawMatchRow> for MatchRecord {
    type Error = RecordError;

    fn try_from(row: RawMatchRow) -> Result<Self, Self::Error> {
        let date = parse_match_date(&row.date)?;
        let home_team = clean_team(&row.home_team)?;
        let away_team = clean_team(&row.away_team)?;
        let result = FullTimeResult::from_code(&row.result)
            .ok_or_else(|| RecordError::UnknownResult(row.result.clone()))?;
        if FullTimeResult::from_goals(row.home_goals, row.away_goals) != result {
            return Err(RecordError::InconsistentResult {
                code: result.code(),
                home_goals: row.home_goals,
                away_goals: row.away_goals,
            });
        }

        Ok(MatchRecord {
            date,
            home_team,
            away_team,
            home_goals: row.home_goals,
            away_goals: row.away_goals,
            home_shots_on_target: row.home_shots_on_target,
            away_shots_on_target: row.away_shots_on_target,
            result,
        })
    }
}

impl DisciplinaryTable {
    /// Joins the three per-team tables. A team absent from one table keeps
    /// zeros for that table's fields.
    pub fn from_tables(
        fouls: &[RawFoulsRow],
        yellows: &[RawYellowRow],
        reds: &[RawRedRow],
    ) -> Self {
        let mut table = DisciplinaryTable::new();
        for row in fouls {
            let entry = table.entry_mut(&row.team);
            entry.home_fouls = row.home_fouls;
            entry.away_fouls = row.away_fouls;
            entry.total_fouls = row.total_fouls;
        }
        for row in yellows {
            table.entry_mut(&row.team).yellow_cards = row.total_yellows;
        }
        for row in reds {
            table.entry_mut(&row.team).red_cards = row.total_reds;
        }
        table
    }

    pub fn to_raw_tables(&self) -> (Vec<RawFoulsRow>, Vec<RawYellowRow>, Vec<RawRedRow>) {
        let records: Vec<&DisciplinaryRecord> = self.records();
        let fouls = records
            .iter()
            .map(|r| RawFoulsRow {
                team: r.team.clone(),
                home_fouls: r.home_fouls,
                away_fouls: r.away_fouls,
                total_fouls: r.total_fouls,
            })
            .collect();
        let yellows = records
            .iter()
            .map(|r| RawYellowRow {
                team: r.team.clone(),
                total_yellows: r.yellow_cards,
            })
            .collect();
        let reds = records
            .iter()
            .map(|r| RawRedRow {
                team: r.team.clone(),
                total_reds: r.red_cards,
            })
            .collect();
        (fouls, yellows, reds)
    }
}

impl Season {
    pub fn from_raw(raw: RawSeason) -> Result<Self, RecordError> {
        let discipline = DisciplinaryTable::from_tables(&raw.fouls, &raw.yellows, &raw.reds);
        let mut matches = Vec::with_capacity(raw.matches.len());
        for (index, row) in raw.matches.into_iter().enumerate() {
            let record = MatchRecord::try_from(row).map_err(|source| RecordError::Row {
                index,
                source: Box::new(source),
            })?;
            matches.push(record);
        }
        Ok(Season::new(matches, discipline))
    }
}
