use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use gridpoints::config::{self, Config};
use gridpoints::ergast::ErgastClient;
use gridpoints::output::{self, TableKind};
use gridpoints::scoring::{parse_points_list, ScoringConfig, Session};
use gridpoints::season::{current_season, FIRST_SEASON};
use gridpoints::session::SeasonSession;
use gridpoints::tui::{self, App, Loader, ThemeColors};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive standings editor (default if no subcommand)
    Tui,
    /// Print championship standings under the custom scheme
    Standings {
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Show constructors instead of drivers
        #[arg(long)]
        teams: bool,
        /// Show the official standings only
        #[arg(long)]
        official: bool,
    },
    /// Print cumulative points per driver after each round
    Progression {
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Print race results with the points each finish earns
    Results {
        /// Only this round
        #[arg(long)]
        round: Option<u32>,
    },
    /// Create a config file interactively
    Init,
}

/// One-off changes to the configured scheme
#[derive(Args, Debug, Default)]
struct ScoringOverrides {
    /// Race points from P1 down, e.g. "10,6,4,3,2,1"
    #[arg(long, global = true)]
    race_points: Option<String>,

    /// Sprint points from P1 down
    #[arg(long, global = true)]
    sprint_points: Option<String>,

    /// Bonus for the driver who qualified on pole
    #[arg(long, global = true)]
    pole: Option<u32>,

    /// Bonus for the fastest lap of the race
    #[arg(long, global = true)]
    fastest_lap: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(name = "gridpoints")]
#[command(about = "Re-score a Formula 1 season with your own points system", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gridpoints/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Season to load (defaults to the config value, then the current year)
    #[arg(short, long, global = true)]
    season: Option<u32>,

    #[command(flatten)]
    overrides: ScoringOverrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Configured scheme with command-line overrides applied
fn effective_scoring(config: &Config, overrides: &ScoringOverrides) -> Result<ScoringConfig, String> {
    let base = config.scoring();
    if overrides.race_points.is_none()
        && overrides.sprint_points.is_none()
        && overrides.pole.is_none()
        && overrides.fastest_lap.is_none()
    {
        return Ok(base);
    }

    let race = match &overrides.race_points {
        Some(list) => parse_points_list(list).map_err(|e| format!("--race-points: {}", e))?,
        None => base.mapping(Session::Race).clone(),
    };
    let sprint = match &overrides.sprint_points {
        Some(list) => parse_points_list(list).map_err(|e| format!("--sprint-points: {}", e))?,
        None => base.mapping(Session::Sprint).clone(),
    };
    Ok(ScoringConfig::from_parts(
        race,
        sprint,
        overrides.pole.unwrap_or(base.pole_bonus()),
        overrides.fastest_lap.unwrap_or(base.fastest_lap_bonus()),
    ))
}

#[tokio::main]
async fn main() {
    // rustls 0.23 needs a process-wide provider; Err only means one is installed already
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    gridpoints::logging::init(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();

    if let Commands::Init = command {
        if let Err(e) = config::run_init_wizard(cli.config) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scoring = match effective_scoring(&config, &cli.overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid scoring override {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let season = cli.season.or(config.season).unwrap_or_else(current_season);
    if !(FIRST_SEASON..=current_season()).contains(&season) {
        eprintln!(
            "Season {} is out of range ({}..={}).",
            season,
            FIRST_SEASON,
            current_season()
        );
        std::process::exit(EXIT_CONFIG);
    }

    // Validated above
    let timeout = config
        .request_timeout()
        .unwrap_or(std::time::Duration::from_secs(20));
    let load_timeout = config
        .load_timeout()
        .unwrap_or(std::time::Duration::from_secs(180));

    let client = match ErgastClient::new(&config.api_base_url, timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    tracing::debug!(
        season,
        base_url = %config.api_base_url,
        customized = scoring.is_customized(),
        "Starting"
    );

    let mut session = SeasonSession::new(scoring, config.progression);

    if let Commands::Tui = command {
        let app = App::new(
            session,
            season,
            cli.config,
            ThemeColors::for_theme(tui::resolve_theme()),
        );
        let loader = Loader {
            source: Arc::new(client),
            options: config.load_options(),
            timeout: load_timeout,
        };
        if let Err(e) = tui::run_tui(app, loader).await {
            eprintln!("TUI error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let rounds =
        match gridpoints::fetch::load_season(&client, season, &config.load_options()).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to load season {}: {}", season, e);
                std::process::exit(EXIT_NETWORK);
            }
        };
    tracing::info!(
        season,
        rounds = rounds.len(),
        elapsed = ?start_time.elapsed(),
        "Season loaded"
    );

    let ticket = session.begin_load(season);
    session.finish_load(ticket, rounds);
    let snapshot = session.recompute().clone();
    let use_colors = output::should_use_colors();

    match command {
        Commands::Standings {
            format,
            teams,
            official,
        } => {
            let standings = &snapshot.standings;
            let kind = if teams { TableKind::Teams } else { TableKind::Drivers };
            let (custom, official_table) = match kind {
                TableKind::Drivers => (&standings.driver_custom, &standings.driver_official),
                TableKind::Teams => (&standings.team_custom, &standings.team_official),
            };
            let (table, reference) = if official {
                (official_table, None)
            } else {
                (custom, Some(official_table))
            };
            let out = match format {
                Format::Table => output::format_standings_table(table, reference, kind, use_colors),
                Format::Tsv => output::format_standings_tsv(table, reference),
                Format::Json => match output::format_standings_json(standings) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to serialize standings: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            };
            println!("{}", out);
        }
        Commands::Progression { format } => {
            let progression = &snapshot.progression;
            let out = match format {
                Format::Table => output::format_progression_table(progression, use_colors),
                Format::Tsv => output::format_progression_tsv(progression),
                Format::Json => match serde_json::to_string_pretty(progression) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to serialize progression: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            };
            println!("{}", out);
        }
        Commands::Results { round } => {
            let rounds: Vec<_> = session
                .rounds()
                .iter()
                .filter(|r| round.map_or(true, |n| r.number == n))
                .cloned()
                .collect();
            if let Some(n) = round {
                if rounds.is_empty() {
                    eprintln!("Round {} not found in {}.", n, season);
                    std::process::exit(EXIT_CONFIG);
                }
            }
            println!(
                "{}",
                output::format_round_results(&rounds, session.scoring(), use_colors)
            );
        }
        Commands::Tui | Commands::Init => {}
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "Done");
    std::process::exit(EXIT_SUCCESS);
}
