use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::{Connection, OptionalExtension, params};

use crate::season::{DisciplinaryRecord, DisciplinaryTable, FullTimeResult, MatchRecord, Season};

const CACHE_DIR: &str = "epl_season_dash";
const DB_FILE: &str = "season.sqlite";
const DATE_FMT: &str = "%Y-%m-%d";

static SHARED_SEASON: OnceCell<Season> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub label: String,
    pub matches_stored: usize,
    pub teams_with_discipline: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            match_date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_goals INTEGER NOT NULL,
            away_goals INTEGER NOT NULL,
            home_shots_on_target INTEGER NOT NULL,
            away_shots_on_target INTEGER NOT NULL,
            result TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (match_date, home_team, away_team)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(match_date);

        CREATE TABLE IF NOT EXISTS discipline (
            team TEXT PRIMARY KEY,
            home_fouls INTEGER NOT NULL,
            away_fouls INTEGER NOT NULL,
            total_fouls INTEGER NOT NULL,
            yellow_cards INTEGER NOT NULL,
            red_cards INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            label TEXT NOT NULL,
            matches_stored INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replaces the stored season with `season` in one transaction.
pub fn store_season(
    conn: &mut Connection,
    db_path: PathBuf,
    season: &Season,
    label: &str,
) -> Result<IngestSummary> {
    let started_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin store transaction")?;
    tx.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, label, matches_stored)
         VALUES (?1, NULL, ?2, 0)",
        params![started_at, label],
    )
    .context("insert ingest run")?;
    let run_id = tx.last_insert_rowid();

    tx.execute("DELETE FROM matches", [])
        .context("clear stored matches")?;
    tx.execute("DELETE FROM discipline", [])
        .context("clear stored discipline")?;

    for m in &season.matches {
        upsert_match(&tx, m)?;
    }
    for record in season.discipline.records() {
        upsert_discipline(&tx, record)?;
    }
    let matches_stored: i64 = tx
        .query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
        .context("count stored matches")?;
    if matches_stored as usize != season.matches.len() {
        warn!(
            "{} duplicate fixtures collapsed on store",
            season.matches.len() - matches_stored as usize
        );
    }

    tx.execute(
        "UPDATE ingest_runs SET finished_at = ?1, matches_stored = ?2 WHERE run_id = ?3",
        params![
            Utc::now().to_rfc3339(),
            matches_stored,
            run_id
        ],
    )
    .context("update ingest run")?;
    tx.commit().context("commit store transaction")?;

    info!(
        "stored {} matches and {} discipline rows ({label})",
        matches_stored,
        season.discipline.len()
    );
    Ok(IngestSummary {
        db_path,
        label: label.to_string(),
        matches_stored: matches_stored as usize,
        teams_with_discipline: season.discipline.len(),
        first_date: season.first_date(),
        last_date: season.last_date(),
    })
}

pub fn load_season(conn: &Connection) -> Result<Season> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                match_date, home_team, away_team, home_goals, away_goals,
                home_shots_on_target, away_shots_on_target, result
            FROM matches
            ORDER BY match_date ASC, home_team ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, u32>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .context("query load matches")?;

    let mut matches = Vec::new();
    for row in rows {
        let (date, home_team, away_team, hg, ag, hs, aws, code) =
            row.context("decode match row")?;
        let date = NaiveDate::parse_from_str(&date, DATE_FMT)
            .with_context(|| format!("stored date {date:?}"))?;
        let result = FullTimeResult::from_code(&code)
            .ok_or_else(|| anyhow!("stored result code {code:?}"))?;
        matches.push(MatchRecord {
            date,
            home_team,
            away_team,
            home_goals: hg,
            away_goals: ag,
            home_shots_on_target: hs,
            away_shots_on_target: aws,
            result,
        });
    }

    let discipline = load_discipline(conn)?;
    info!(
        "loaded {} matches and {} discipline rows",
        matches.len(),
        discipline.len()
    );
    Ok(Season::new(matches, discipline))
}

fn load_discipline(conn: &Connection) -> Result<DisciplinaryTable> {
    let mut stmt = conn
        .prepare(
            "SELECT team, home_fouls, away_fouls, total_fouls, yellow_cards, red_cards
             FROM discipline ORDER BY team ASC",
        )
        .context("prepare load discipline query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DisciplinaryRecord {
                team: row.get(0)?,
                home_fouls: row.get(1)?,
                away_fouls: row.get(2)?,
                total_fouls: row.get(3)?,
                yellow_cards: row.get(4)?,
                red_cards: row.get(5)?,
            })
        })
        .context("query load discipline")?;

    let mut table = DisciplinaryTable::new();
    for row in rows {
        table.insert(row.context("decode discipline row")?);
    }
    Ok(table)
}

/// Loads the season once per process; later calls return the first load
/// regardless of `path`.
pub fn shared_season(path: &Path) -> Result<&'static Season> {
    SHARED_SEASON.get_or_try_init(|| {
        let conn = open_db(path)?;
        load_season(&conn)
    })
}

pub fn last_ingest_label(conn: &Connection) -> Result<Option<String>> {
    let label = conn
        .query_row(
            "SELECT label FROM ingest_runs WHERE finished_at IS NOT NULL
             ORDER BY run_id DESC LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("query last ingest label")?;
    Ok(label)
}

fn upsert_match(tx: &rusqlite::Transaction<'_>, m: &MatchRecord) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO matches (
            match_date, home_team, away_team, home_goals, away_goals,
            home_shots_on_target, away_shots_on_target, result, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(match_date, home_team, away_team) DO UPDATE SET
            home_goals = excluded.home_goals,
            away_goals = excluded.away_goals,
            home_shots_on_target = excluded.home_shots_on_target,
            away_shots_on_target = excluded.away_shots_on_target,
            result = excluded.result,
            updated_at = excluded.updated_at
        "#,
        params![
            m.date.format(DATE_FMT).to_string(),
            m.home_team,
            m.away_team,
            m.home_goals,
            m.away_goals,
            m.home_shots_on_target,
            m.away_shots_on_target,
            m.result.code().to_string(),
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert match")?;
    Ok(())
}

fn upsert_discipline(tx: &rusqlite::Transaction<'_>, r: &DisciplinaryRecord) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO discipline (team, home_fouls, away_fouls, total_fouls, yellow_cards, red_cards)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(team) DO UPDATE SET
            home_fouls = excluded.home_fouls,
            away_fouls = excluded.away_fouls,
            total_fouls = excluded.total_fouls,
            yellow_cards = excluded.yellow_cards,
            red_cards = excluded.red_cards
        "#,
        params![
            r.team,
            r.home_fouls,
            r.away_fouls,
            r.total_fouls,
            r.yellow_cards,
            r.red_cards
        ],
    )
    .context("upsert discipline")?;
    Ok(())
}
