use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use epl_season_dash::config::DashboardConfig;
use epl_season_dash::demo_season::{self, DEMO_TEAMS};
use epl_season_dash::records::RawSeason;
use epl_season_dash::season::Season;
use epl_season_dash::season_db;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = DashboardConfig::load(&args);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db_path = cfg
        .resolved_db_path()
        .context("unable to resolve sqlite path")?;
    let label = parse_string_arg(&args, "--label").unwrap_or_else(|| cfg.season_label.clone());

    let season = if let Some(rows_path) = parse_string_arg(&args, "--rows") {
        let rows_path = PathBuf::from(rows_path);
        let raw = fs::read_to_string(&rows_path)
            .with_context(|| format!("read row snapshot {}", rows_path.display()))?;
        let raw: RawSeason = serde_json::from_str(&raw).context("invalid row snapshot json")?;
        Season::from_raw(raw).context("validate row snapshot")?
    } else if cfg.demo {
        demo_season::generate_demo_season(cfg.demo_seed, &DEMO_TEAMS)
    } else {
        bail!("nothing to ingest; pass --demo or --rows <snapshot.json>");
    };

    let mut conn = season_db::open_db(&db_path)?;
    let summary = season_db::store_season(&mut conn, db_path.clone(), &season, &label)?;

    println!("Season ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!("Label: {}", summary.label);
    println!("Matches stored: {}", summary.matches_stored);
    println!("Teams with discipline rows: {}", summary.teams_with_discipline);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("Dates: {first} .. {last}");
    }
    Ok(())
}

fn parse_string_arg(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
