use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::season::{DisciplinaryRecord, DisciplinaryTable, FullTimeResult, MatchRecord, Season};

pub const DEFAULT_DEMO_SEED: u64 = 2324;

pub const DEMO_TEAMS: [&str; 20] = [
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Liverpool",
    "Luton",
    "Man City",
    "Man United",
    "Newcastle",
    "Nott'm Forest",
    "Sheffield United",
    "Tottenham",
    "West Ham",
    "Wolves",
];

const SHOT_SCORE_CHANCE: f64 = 0.32;

fn season_kickoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 8, 12).unwrap_or_default()
}

/// Double round robin over `teams`, one round per week from mid-August.
/// The same seed always yields the same season.
pub fn generate_demo_season(seed: u64, teams: &[&str]) -> Season {
    let mut rng = StdRng::seed_from_u64(seed);
    let kickoff = season_kickoff();

    let mut matches = Vec::new();
    let first_half = round_robin_pairs(teams.len());
    let rounds = first_half.len();
    for (round, pairs) in first_half.iter().enumerate() {
        for &(home, away) in pairs {
            let date = kickoff + Duration::weeks(round as i64);
            matches.push(random_match(&mut rng, date, teams[home], teams[away]));
        }
    }
    for (round, pairs) in first_half.iter().enumerate() {
        for &(home, away) in pairs {
            let date = kickoff + Duration::weeks((rounds + round) as i64);
            matches.push(random_match(&mut rng, date, teams[away], teams[home]));
        }
    }

    let mut discipline = DisciplinaryTable::new();
    for team in teams {
        let home_fouls = rng.gen_range(140..=230);
        let away_fouls = rng.gen_range(140..=230);
        discipline.insert(DisciplinaryRecord {
            team: (*team).to_string(),
            home_fouls,
            away_fouls,
            total_fouls: home_fouls + away_fouls,
            yellow_cards: rng.gen_range(45..=110),
            red_cards: rng.gen_range(0..=6),
        });
    }

    Season::new(matches, discipline)
}

fn random_match(rng: &mut StdRng, date: NaiveDate, home: &str, away: &str) -> MatchRecord {
    let home_shots_on_target = rng.gen_range(1..=10);
    let away_shots_on_target = rng.gen_range(0..=8);
    let home_goals = scored_from(rng, home_shots_on_target);
    let away_goals = scored_from(rng, away_shots_on_target);
    MatchRecord {
        date,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_goals,
        away_goals,
        home_shots_on_target,
        away_shots_on_target,
        result: FullTimeResult::from_goals(home_goals, away_goals),
    }
}

fn scored_from(rng: &mut StdRng, shots_on_target: u32) -> u32 {
    (0..shots_on_target)
        .filter(|_| rng.gen_bool(SHOT_SCORE_CHANCE))
        .count() as u32
}

/// Circle-method pairings by index. An odd team count gets a bye slot that
/// never appears in the output.
fn round_robin_pairs(n: usize) -> Vec<Vec<(usize, usize)>> {
    if n < 2 {
        return Vec::new();
    }
    let slots = if n % 2 == 0 { n } else { n + 1 };
    let mut ring: Vec<usize> = (0..slots).collect();
    let mut rounds = Vec::with_capacity(slots - 1);
    for round in 0..slots - 1 {
        let mut pairs = Vec::with_capacity(slots / 2);
        for i in 0..slots / 2 {
            let (a, b) = (ring[i], ring[slots - 1 - i]);
            if a >= n || b >= n {
                continue;
            }
            // Alternate sides so nobody is at home every week.
            if (round + i) % 2 == 0 {
                pairs.push((a, b));
            } else {
                pairs.push((b, a));
            }
        }
        rounds.push(pairs);
        ring[1..].rotate_right(1);
    }
    rounds
}
