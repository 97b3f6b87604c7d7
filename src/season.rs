use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullTimeResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl FullTimeResult {
    /// Source tables use the single-letter codes `H`, `D` and `A`.
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "H" | "h" => Some(Self::HomeWin),
            "D" | "d" => Some(Self::Draw),
            "A" | "a" => Some(Self::AwayWin),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::HomeWin => 'H',
            Self::Draw => 'D',
            Self::AwayWin => 'A',
        }
    }

    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            Self::HomeWin
        } else if home_goals < away_goals {
            Self::AwayWin
        } else {
            Self::Draw
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_shots_on_target: u32,
    pub away_shots_on_target: u32,
    pub result: FullTimeResult,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Goals (for, against) from `team`'s side. Assumes `team` played.
    pub fn goals_for_against(&self, team: &str) -> (u32, u32) {
        if self.home_team == team {
            (self.home_goals, self.away_goals)
        } else {
            (self.away_goals, self.home_goals)
        }
    }

    /// Win judged from the recorded result code, not the goals.
    pub fn is_win_for(&self, team: &str) -> bool {
        if self.home_team == team {
            self.result == FullTimeResult::HomeWin
        } else if self.away_team == team {
            self.result == FullTimeResult::AwayWin
        } else {
            false
        }
    }

    pub fn opponent_of(&self, team: &str) -> &str {
        if self.home_team == team {
            &self.away_team
        } else {
            &self.home_team
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplinaryRecord {
    pub team: String,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub total_fouls: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl DisciplinaryRecord {
    pub fn empty(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }
}

/// Per-team disciplinary totals keyed by trimmed team name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplinaryTable {
    rows: HashMap<String, DisciplinaryRecord>,
}

impl DisciplinaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut record: DisciplinaryRecord) {
        record.team = record.team.trim().to_string();
        self.rows.insert(record.team.clone(), record);
    }

    pub fn get(&self, team: &str) -> Option<&DisciplinaryRecord> {
        self.rows.get(team.trim())
    }

    /// Entry for `team`, created with zeroed totals if absent.
    pub fn entry_mut(&mut self, team: &str) -> &mut DisciplinaryRecord {
        let key = team.trim().to_string();
        self.rows
            .entry(key.clone())
            .or_insert_with(|| DisciplinaryRecord::empty(&key))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records sorted by team name.
    pub fn records(&self) -> Vec<&DisciplinaryRecord> {
        let mut out = self.rows.values().collect::<Vec<_>>();
        out.sort_by(|a, b| a.team.cmp(&b.team));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub matches: Vec<MatchRecord>,
    pub discipline: DisciplinaryTable,
}

impl Season {
    pub fn new(matches: Vec<MatchRecord>, discipline: DisciplinaryTable) -> Self {
        Self {
            matches,
            discipline,
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.matches.iter().map(|m| m.date).min()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.matches.iter().map(|m| m.date).max()
    }
}
