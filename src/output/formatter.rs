use std::cmp::Ordering;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{ScoringConfig, Session};
use crate::season::{team_rgb, RaceResult, Round};
use crate::standings::{earned_points, Progression, Standing, Standings, StandingsTable};

/// Which entity a standings table ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Drivers,
    Teams,
}

impl TableKind {
    fn heading(self) -> &'static str {
        match self {
            TableKind::Drivers => "Driver",
            TableKind::Teams => "Team",
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Terminal width, None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate to fit available width, counting chars rather than bytes
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Movement between the official and the custom championship position.
/// "▲2" means two places higher under the custom scheme.
pub fn format_movement(custom_position: usize, official_position: Option<usize>) -> String {
    match official_position {
        None => "new".to_string(),
        Some(official) => match official.cmp(&custom_position) {
            Ordering::Greater => format!("▲{}", official - custom_position),
            Ordering::Less => format!("▼{}", custom_position - official),
            Ordering::Equal => "=".to_string(),
        },
    }
}

fn paint_team(name: &str, padded: &str, use_colors: bool) -> String {
    if use_colors {
        let (r, g, b) = team_rgb(name);
        padded.truecolor(r, g, b).to_string()
    } else {
        padded.to_string()
    }
}

/// Standings as an aligned table.
///
/// With `official` set, two extra columns show the official points and how
/// far each entry moved relative to the official order.
pub fn format_standings_table(
    table: &StandingsTable,
    official: Option<&StandingsTable>,
    kind: TableKind,
    use_colors: bool,
) -> String {
    if table.is_empty() {
        return "No results for this season.".to_string();
    }

    let longest = table.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    let fixed_width = 4 + 2 + 6 + if official.is_some() { 2 + 8 + 2 + 5 } else { 0 };
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width - 2),
        Some(_) => longest.min(20),
        None => longest,
    }
    .max(kind.heading().len());

    let mut lines = Vec::with_capacity(table.len() + 1);
    let mut header = format!(
        "{:>4}  {:<name_width$}  {:>6}",
        "Pos",
        kind.heading(),
        "Pts",
        name_width = name_width
    );
    if official.is_some() {
        header.push_str(&format!("  {:>8}  {:>5}", "Official", "Move"));
    }
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, standing) in table.iter().enumerate() {
        lines.push(format_standing_row(
            idx + 1,
            standing,
            official,
            kind,
            name_width,
            use_colors,
        ));
    }

    lines.join("\n")
}

fn format_standing_row(
    position: usize,
    standing: &Standing,
    official: Option<&StandingsTable>,
    kind: TableKind,
    name_width: usize,
    use_colors: bool,
) -> String {
    let index_str = format!("{:>3}.", position);
    let name = format!(
        "{:<name_width$}",
        truncate_name(&standing.name, name_width),
        name_width = name_width
    );
    let name = match kind {
        TableKind::Teams => paint_team(&standing.name, &name, use_colors),
        TableKind::Drivers if use_colors && position == 1 => name.bold().to_string(),
        TableKind::Drivers => name,
    };
    let points = format!("{:>6}", standing.points);

    let mut line = if use_colors {
        format!("{}  {}  {}", index_str.dimmed(), name, points.bold())
    } else {
        format!("{}  {}  {}", index_str, name, points)
    };

    if let Some(official) = official {
        let official_points = official
            .points_of(&standing.key)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let movement = format_movement(position, official.position_of(&standing.key));
        let movement = format!("{:>5}", movement);
        let movement = if !use_colors {
            movement
        } else if movement.contains('▲') {
            movement.green().to_string()
        } else if movement.contains('▼') {
            movement.red().to_string()
        } else {
            movement.dimmed().to_string()
        };
        line.push_str(&format!("  {:>8}  {}", official_points, movement));
    }

    line
}

/// Standings as tab-separated values: position, name, points[, official points]
pub fn format_standings_tsv(table: &StandingsTable, official: Option<&StandingsTable>) -> String {
    table
        .iter()
        .enumerate()
        .map(|(idx, standing)| {
            let mut row = format!("{}\t{}\t{}", idx + 1, standing.name, standing.points);
            if let Some(official) = official {
                let points = official.points_of(&standing.key).unwrap_or(0);
                row.push_str(&format!("\t{}", points));
            }
            row
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All four tables as pretty JSON
pub fn format_standings_json(standings: &Standings) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(standings)
}

/// Drivers ranked by final total, ties in first-seen order
fn ranked_series(progression: &Progression) -> Vec<&crate::standings::DriverSeries> {
    let mut series: Vec<_> = progression.series.iter().collect();
    series.sort_by(|a, b| b.final_total().cmp(&a.final_total()));
    series
}

/// Cumulative totals per round, one row per driver.
///
/// Rounds a driver's series does not cover print as "-". On narrow terminals
/// only the most recent rounds that fit are shown.
pub fn format_progression_table(progression: &Progression, use_colors: bool) -> String {
    if progression.series.is_empty() {
        return "No results for this season.".to_string();
    }

    let rounds = progression.round_count();
    let name_width = progression
        .series
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(6, 24);
    let cell_width = 5;
    let visible = match get_terminal_width() {
        Some(width) if width > name_width + cell_width => {
            ((width - name_width) / cell_width).clamp(1, rounds.max(1))
        }
        Some(_) => 1,
        None => rounds,
    };
    let first = rounds.saturating_sub(visible);

    let mut header = format!("{:<name_width$}", "Driver", name_width = name_width);
    for idx in first..rounds {
        header.push_str(&format!("{:>cell_width$}", format!("R{}", idx + 1), cell_width = cell_width));
    }
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for series in ranked_series(progression) {
        let mut row = format!(
            "{:<name_width$}",
            truncate_name(&series.name, name_width),
            name_width = name_width
        );
        for idx in first..rounds {
            let cell = series
                .value_at(idx)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("{:>cell_width$}", cell, cell_width = cell_width));
        }
        lines.push(row);
    }

    lines.join("\n")
}

/// Progression as TSV: driver followed by one column per round, empty when uncovered
pub fn format_progression_tsv(progression: &Progression) -> String {
    let rounds = progression.round_count();
    let mut lines = Vec::with_capacity(progression.series.len() + 1);
    let mut header = vec!["driver".to_string()];
    header.extend(progression.labels.iter().cloned());
    lines.push(header.join("\t"));
    for series in ranked_series(progression) {
        let mut row = vec![series.name.clone()];
        row.extend((0..rounds).map(|idx| {
            series
                .value_at(idx)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

/// "25" or "25 (+1 FL, +1 pole)" for a single row
fn format_earned(result: &RaceResult, round: &Round, config: &ScoringConfig, session: Session) -> String {
    let earned = earned_points(result, round, config, session);
    let mut extras = Vec::new();
    if earned.fastest_lap > 0 {
        extras.push(format!("+{} FL", earned.fastest_lap));
    }
    if earned.pole > 0 {
        extras.push(format!("+{} pole", earned.pole));
    }
    if extras.is_empty() {
        earned.total().to_string()
    } else {
        format!("{} ({})", earned.total(), extras.join(", "))
    }
}

fn format_session_rows(
    rows: &[RaceResult],
    round: &Round,
    config: &ScoringConfig,
    session: Session,
    use_colors: bool,
) -> Vec<String> {
    let driver_width = rows
        .iter()
        .map(|r| r.driver.name.chars().count())
        .max()
        .unwrap_or(0);
    let team_width = rows
        .iter()
        .map(|r| r.constructor.name.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| {
            let team = format!("{:<team_width$}", row.constructor.name, team_width = team_width);
            let team = paint_team(&row.constructor.name, &team, use_colors);
            let fl = if row.fastest_lap { "FL" } else { "  " };
            format!(
                "  {:>4}  {:<driver_width$}  {}  {}  {}",
                row.position.label(),
                row.driver.name,
                team,
                fl,
                format_earned(row, round, config, session),
                driver_width = driver_width
            )
        })
        .collect()
}

/// One block per round: header line, race rows with the points each earned
/// under `config`, then sprint rows when the weekend had a sprint.
pub fn format_round_results(rounds: &[Round], config: &ScoringConfig, use_colors: bool) -> String {
    if rounds.is_empty() {
        return "No results for this season.".to_string();
    }

    rounds
        .iter()
        .map(|round| {
            let title = format!("R{} {}", round.number, round.label());
            let mut lines = vec![if use_colors {
                title.bold().to_string()
            } else {
                title
            }];
            lines.extend(format_session_rows(
                &round.results,
                round,
                config,
                Session::Race,
                use_colors,
            ));
            if round.has_sprint() {
                lines.push(if use_colors {
                    "  Sprint".italic().to_string()
                } else {
                    "  Sprint".to_string()
                });
                lines.extend(format_session_rows(
                    round.sprint_results(),
                    round,
                    config,
                    Session::Sprint,
                    use_colors,
                ));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
