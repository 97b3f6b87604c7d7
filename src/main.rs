use std::borrow::Cow;

use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;

use epl_season_dash::aggregate::{self, StandingsRow};
use epl_season_dash::config::DashboardConfig;
use epl_season_dash::dashboard::{self, TeamReport};
use epl_season_dash::demo_season::{self, DEMO_TEAMS};
use epl_season_dash::export;
use epl_season_dash::season::Season;
use epl_season_dash::season_db;

#[derive(Serialize)]
struct DashboardJson<'a> {
    standings: &'a [StandingsRow],
    report: &'a TeamReport,
}

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = DashboardConfig::load(&args);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let season = load_season(&cfg)?;
    if season.matches.is_empty() {
        bail!("no matches stored yet; run `season_ingest --demo` or pass --demo");
    }

    let standings = aggregate::compute_standings(&season.matches);
    let Some(team) = dashboard::pick_team(&season, cfg.team.as_deref()) else {
        bail!("season has no teams");
    };
    info!("building report for {team}");
    let report = TeamReport::build(
        &season,
        &standings,
        &team,
        cfg.recent_count,
        &cfg.season_label,
        &cfg.logo_dir,
    );

    if let Some(path) = &cfg.export_path {
        let out = export::export_season_workbook(path, &season, Some(&report))?;
        println!("Export written: {}", path.display());
        println!(
            "Standings rows: {} | Conversion rows: {} | Team rows: {}",
            out.standings, out.conversion, out.team_rows
        );
    }

    if cfg.json {
        let json = serde_json::to_string_pretty(&DashboardJson {
            standings: &standings,
            report: &report,
        })
        .context("serialize dashboard json")?;
        println!("{json}");
        return Ok(());
    }

    if cfg.export_path.is_none() {
        dashboard::draw_once(&report, &standings, cfg.show_streak)
            .context("render dashboard")?;
    }
    Ok(())
}

fn load_season(cfg: &DashboardConfig) -> Result<Cow<'static, Season>> {
    if cfg.demo {
        info!("using generated demo season (seed {})", cfg.demo_seed);
        return Ok(Cow::Owned(demo_season::generate_demo_season(
            cfg.demo_seed,
            &DEMO_TEAMS,
        )));
    }
    let db_path = cfg
        .resolved_db_path()
        .context("unable to resolve sqlite path")?;
    let season = season_db::shared_season(&db_path)
        .with_context(|| format!("load season from {}", db_path.display()))?;
    Ok(Cow::Borrowed(season))
}
