use std::io;
use std::path::{Path, PathBuf};

use chrono::Month;
use crossterm::terminal;
use log::warn;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Terminal, TerminalOptions, Viewport};
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    self, ConversionRow, MatchOutcome, MonthlyCount, OutcomeBreakdown, RecentResult,
    StandingsRow, StreakResult, TeamSummary,
};
use crate::season::{MatchRecord, Season};

const INLINE_HEIGHT: u16 = 30;
const MIN_INLINE_HEIGHT: u16 = 12;

/// Every aggregate a team page shows. Whether the streak matches are listed
/// is an argument of the text and render calls, never part of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub season_label: String,
    pub team: String,
    pub rank: Option<usize>,
    pub summary: TeamSummary,
    pub conversion: ConversionRow,
    pub recent: Vec<RecentResult>,
    pub outcomes: OutcomeBreakdown,
    pub monthly: Vec<MonthlyCount>,
    pub streak: StreakResult,
    pub logo: Option<PathBuf>,
}

impl TeamReport {
    pub fn build(
        season: &Season,
        standings: &[StandingsRow],
        team: &str,
        recent_n: usize,
        season_label: &str,
        logo_dir: &Path,
    ) -> Self {
        let matches = &season.matches;
        let mut by_date: Vec<MatchRecord> = matches.clone();
        by_date.sort_by_key(|m| m.date);

        Self {
            season_label: season_label.to_string(),
            team: team.to_string(),
            rank: aggregate::rank_of(standings, team),
            summary: aggregate::team_summary(matches, &season.discipline, team),
            conversion: aggregate::ConversionTable::build(matches).row(team),
            recent: aggregate::recent_results(&by_date, team, recent_n),
            outcomes: aggregate::outcome_breakdown(matches, team),
            monthly: aggregate::monthly_distribution(matches, team),
            streak: aggregate::longest_win_streak(matches, team),
            logo: logo_path(logo_dir, team),
        }
    }

    pub fn rank_label(&self) -> String {
        match self.rank {
            Some(rank) => format!(
                "{} in the {}",
                aggregate::ordinal_label(rank),
                league_name(&self.season_label)
            ),
            None => "N/A".to_string(),
        }
    }
}

/// `<logo_dir>/<team>.png` when that file exists.
pub fn logo_path(logo_dir: &Path, team: &str) -> Option<PathBuf> {
    let path = logo_dir.join(format!("{team}.png"));
    if path.is_file() {
        Some(path)
    } else {
        warn!("logo not found for {team} at {}", path.display());
        None
    }
}

/// Team picked from `requested` (case-insensitive) or the first name
/// alphabetically.
pub fn pick_team(season: &Season, requested: Option<&str>) -> Option<String> {
    let names = aggregate::sorted_team_names(&season.matches);
    if let Some(wanted) = requested {
        let wanted = wanted.trim();
        if let Some(found) = names.iter().find(|n| n.eq_ignore_ascii_case(wanted)) {
            return Some(found.clone());
        }
        warn!("team {wanted:?} not in this season, falling back to the first team");
    }
    names.into_iter().next()
}

fn league_name(label: &str) -> &str {
    // "Premier League 2023–24" -> "Premier League"
    match label.rsplit_once(' ') {
        Some((name, season)) if season.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            name
        }
        _ => label,
    }
}

pub fn header_text(report: &TeamReport) -> String {
    format!(
        "{} | {} | {}",
        report.season_label,
        report.team,
        report.rank_label()
    )
}

pub fn summary_text(report: &TeamReport) -> String {
    let s = &report.summary;
    [
        format!("Goals Scored: {}", s.goals_scored),
        format!("Goals Conceded: {}", s.goals_conceded),
        format!("Goal Difference: {:+}", s.goal_difference),
        format!("Home Fouls: {}", s.home_fouls),
        format!("Away Fouls: {}", s.away_fouls),
        format!("Total Fouls: {}", s.total_fouls),
        format!(
            "Shot Conversion Rate (%): {:.2}",
            report.conversion.conversion_pct
        ),
        format!("Yellow Cards: {}", s.yellow_cards),
        format!("Red Cards: {}", s.red_cards),
    ]
    .join("\n")
}

pub fn match_line(record: &MatchRecord) -> String {
    format!(
        "{} {} {}-{} {}",
        record.date.format("%Y-%m-%d"),
        record.home_team,
        record.home_goals,
        record.away_goals,
        record.away_team
    )
}

pub fn recent_text(report: &TeamReport) -> String {
    if report.recent.is_empty() {
        return "No matches played".to_string();
    }
    report
        .recent
        .iter()
        .map(|r| format!("[{}] {}", r.outcome.letter(), match_line(&r.record)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn outcome_text(report: &TeamReport) -> String {
    let o = &report.outcomes;
    let pct = |n: u32| {
        if o.total == 0 {
            0.0
        } else {
            f64::from(n) / f64::from(o.total) * 100.0
        }
    };
    [
        format!("Wins: {} ({:.1}%)", o.wins, pct(o.wins)),
        format!("Draws: {} ({:.1}%)", o.draws, pct(o.draws)),
        format!("Losses: {} ({:.1}%)", o.losses, pct(o.losses)),
    ]
    .join("\n")
}

pub fn monthly_text(report: &TeamReport) -> String {
    report
        .monthly
        .iter()
        .map(|m| format!("{:<10} {:>2}", month_label(m.month), m.matches))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn streak_text(report: &TeamReport, show_streak: bool) -> String {
    let mut lines = vec![format!("Longest Win Streak: {}", report.streak.length)];
    if !show_streak {
        if report.streak.length > 0 {
            lines.push("(run with --show-streak to list the matches)".to_string());
        }
        return lines.join("\n");
    }
    for m in &report.streak.matches {
        lines.push(match_line(m));
    }
    lines.join("\n")
}

pub fn standings_text(standings: &[StandingsRow], highlight: Option<&str>) -> String {
    let mut lines = vec![format!(
        "{:>3} {:<18} {:>2} {:>2} {:>2} {:>2} {:>3}",
        "#", "Team", "P", "W", "D", "L", "Pts"
    )];
    for row in standings {
        let marker = if highlight == Some(row.team.as_str()) {
            ">"
        } else {
            " "
        };
        lines.push(format!(
            "{marker}{:>2} {:<18} {:>2} {:>2} {:>2} {:>2} {:>3}",
            row.rank, row.team, row.matches, row.wins, row.draws, row.losses, row.points
        ));
    }
    lines.join("\n")
}

fn month_label(month: Month) -> &'static str {
    month.name()
}

pub fn outcome_color(outcome: MatchOutcome) -> Color {
    match outcome {
        MatchOutcome::Win => Color::Green,
        MatchOutcome::Draw => Color::Gray,
        MatchOutcome::Loss => Color::Red,
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    report: &TeamReport,
    standings: &[StandingsRow],
    show_streak: bool,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let header = Paragraph::new(header_text(report))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(40),
            Constraint::Min(36),
            Constraint::Length(34),
        ])
        .split(rows[1]);

    render_standings(frame, columns[0], standings, &report.team);

    let middle = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(4)])
        .split(columns[1]);
    let summary = Paragraph::new(summary_text(report))
        .block(Block::default().title("Season Stats").borders(Borders::ALL));
    frame.render_widget(summary, middle[0]);
    render_recent(frame, middle[1], report);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Min(3),
        ])
        .split(columns[2]);
    let outcomes = Paragraph::new(outcome_text(report))
        .block(Block::default().title("Match Results").borders(Borders::ALL));
    frame.render_widget(outcomes, right[0]);
    let monthly = Paragraph::new(monthly_text(report))
        .block(Block::default().title("Matches per Month").borders(Borders::ALL));
    frame.render_widget(monthly, right[1]);
    let streak = Paragraph::new(streak_text(report, show_streak))
        .block(Block::default().title("Win Streak").borders(Borders::ALL));
    frame.render_widget(streak, right[2]);
}

fn render_standings(frame: &mut Frame, area: Rect, standings: &[StandingsRow], team: &str) {
    let text = standings_text(standings, Some(team));
    let lines: Vec<Line> = text
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let selected = idx > 0 && standings.get(idx - 1).is_some_and(|r| r.team == team);
            let style = if idx == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(line.to_string(), style))
        })
        .collect();
    let table =
        Paragraph::new(lines).block(Block::default().title("Table").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_recent(frame: &mut Frame, area: Rect, report: &TeamReport) {
    let block = Block::default()
        .title(format!("Last {} Matches", report.recent.len()))
        .borders(Borders::ALL);
    if report.recent.is_empty() {
        frame.render_widget(Paragraph::new("No matches played").block(block), area);
        return;
    }
    let lines: Vec<Line> = report
        .recent
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::styled(
                    format!("[{}]", r.outcome.letter()),
                    Style::default()
                        .fg(outcome_color(r.outcome))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(match_line(&r.record)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draws one inline frame below the cursor and returns.
pub fn draw_once(
    report: &TeamReport,
    standings: &[StandingsRow],
    show_streak: bool,
) -> io::Result<()> {
    let height = terminal::size()
        .map(|(_, rows)| rows.saturating_sub(1).min(INLINE_HEIGHT))
        .unwrap_or(INLINE_HEIGHT)
        .max(MIN_INLINE_HEIGHT);
    let backend = CrosstermBackend::new(io::stdout());
    let mut term = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )?;
    term.draw(|f| {
        let area = f.size();
        render(f, area, report, standings, show_streak)
    })?;
    println!();
    Ok(())
}
