use std::path::PathBuf;

use crate::aggregate::DEFAULT_RECENT_COUNT;
use crate::demo_season::DEFAULT_DEMO_SEED;
use crate::season_db;

pub const DEFAULT_SEASON_LABEL: &str = "Premier League 2023–24";
pub const DEFAULT_LOGO_DIR: &str = "team_logos";
const MAX_RECENT_COUNT: usize = 38;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub db_path: Option<PathBuf>,
    pub season_label: String,
    pub logo_dir: PathBuf,
    pub recent_count: usize,
    pub demo_seed: u64,
    pub team: Option<String>,
    pub show_streak: bool,
    pub json: bool,
    pub export_path: Option<PathBuf>,
    pub demo: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            season_label: DEFAULT_SEASON_LABEL.to_string(),
            logo_dir: PathBuf::from(DEFAULT_LOGO_DIR),
            recent_count: DEFAULT_RECENT_COUNT,
            demo_seed: DEFAULT_DEMO_SEED,
            team: None,
            show_streak: false,
            json: false,
            export_path: None,
            demo: false,
        }
    }
}

impl DashboardConfig {
    /// Reads `.env.local`, `.env`, the process environment and then `args`
    /// (without the program name). Later sources win.
    pub fn load(args: &[String]) -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let mut cfg = Self::from_env();
        cfg.apply_args(args);
        cfg
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(path) = env_nonempty("SEASON_DB_PATH") {
            cfg.db_path = Some(PathBuf::from(path));
        }
        if let Some(label) = env_nonempty("SEASON_LABEL") {
            cfg.season_label = label;
        }
        if let Some(dir) = env_nonempty("SEASON_LOGO_DIR") {
            cfg.logo_dir = PathBuf::from(dir);
        }
        if let Some(n) = env_nonempty("SEASON_RECENT_COUNT").and_then(|v| v.parse().ok()) {
            cfg.recent_count = clamp_recent(n);
        }
        if let Some(seed) = env_nonempty("SEASON_DEMO_SEED").and_then(|v| v.parse().ok()) {
            cfg.demo_seed = seed;
        }
        cfg
    }

    pub fn apply_args(&mut self, args: &[String]) {
        let mut idx = 0;
        while idx < args.len() {
            let arg = args[idx].as_str();
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = || {
                inline.clone().or_else(|| {
                    let next = args.get(idx + 1).filter(|v| !v.starts_with("--")).cloned();
                    if next.is_some() {
                        idx += 1;
                    }
                    next
                })
            };
            match flag {
                "--db" => {
                    if let Some(v) = value().filter(|v| !v.trim().is_empty()) {
                        self.db_path = Some(PathBuf::from(v.trim()));
                    }
                }
                "--team" => {
                    if let Some(v) = value().filter(|v| !v.trim().is_empty()) {
                        self.team = Some(v.trim().to_string());
                    }
                }
                "--recent" => {
                    if let Some(n) = value().and_then(|v| v.trim().parse().ok()) {
                        self.recent_count = clamp_recent(n);
                    }
                }
                "--seed" => {
                    if let Some(seed) = value().and_then(|v| v.trim().parse().ok()) {
                        self.demo_seed = seed;
                    }
                }
                "--logos" => {
                    if let Some(v) = value().filter(|v| !v.trim().is_empty()) {
                        self.logo_dir = PathBuf::from(v.trim());
                    }
                }
                "--export" => {
                    if let Some(v) = value().filter(|v| !v.trim().is_empty()) {
                        self.export_path = Some(PathBuf::from(v.trim()));
                    }
                }
                "--show-streak" => self.show_streak = true,
                "--json" => self.json = true,
                "--demo" => self.demo = true,
                _ => {}
            }
            idx += 1;
        }
    }

    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        self.db_path.clone().or_else(season_db::default_db_path)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clamp_recent(n: usize) -> usize {
    n.clamp(1, MAX_RECENT_COUNT)
}
