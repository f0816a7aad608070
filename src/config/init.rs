use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::scoring::{format_points_list, parse_points_list, ScoringConfig, Session};
use crate::season::{current_season, FIRST_SEASON};
use crate::standings::ProgressionPolicy;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt with a default shown in brackets; empty input takes the default.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn prompt_points_list(message: &str, default: &BTreeMap<u32, u32>) -> Result<BTreeMap<u32, u32>> {
    loop {
        let input = prompt_with_default(message, &format_points_list(default))?;
        match parse_points_list(&input) {
            Ok(mapping) if !mapping.is_empty() => return Ok(mapping),
            Ok(_) => println!("  At least one position needs points. Try again."),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn prompt_bonus(message: &str) -> Result<u32> {
    loop {
        let input = prompt_with_default(message, "0")?;
        match input.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("  Invalid: must be a non-negative integer. Try again."),
        }
    }
}

/// Interactive setup of the config file.
///
/// `default_path` pre-fills the save location; otherwise
/// ~/.config/gridpoints/config.yaml is offered.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("gridpoints configuration");
    println!("========================");
    println!();

    let latest = current_season();
    let season = loop {
        let input = prompt_with_default(
            "Season to open at startup (blank follows the current year)",
            "current",
        )?;
        if input == "current" {
            break None;
        }
        match input.parse::<u32>() {
            Ok(year) if (FIRST_SEASON..=latest).contains(&year) => break Some(year),
            _ => println!("  Invalid: enter a year from {} to {}.", FIRST_SEASON, latest),
        }
    };

    println!();
    let official = ScoringConfig::official();
    let scoring = if prompt_yes_no("Customize the points system? (n keeps the official one)", true)? {
        println!();
        println!("Points are listed from P1 down, comma separated.");
        println!(
            "The official race table is {} with no pole or fastest lap bonus.",
            format_points_list(official.mapping(Session::Race))
        );
        let race = prompt_points_list("Race points", official.mapping(Session::Race))?;
        let sprint = prompt_points_list("Sprint points", official.mapping(Session::Sprint))?;
        println!();
        let pole = prompt_bonus("Pole position bonus")?;
        let fastest_lap = prompt_bonus("Fastest lap bonus")?;
        Some(ScoringConfig::from_parts(race, sprint, pole, fastest_lap))
    } else {
        None
    };

    println!();
    let zero_padded = prompt_yes_no(
        "Start every driver's progression line at round one (drivers who join late show zeros)?",
        false,
    )?;
    let progression = if zero_padded {
        ProgressionPolicy::ZeroPadded
    } else {
        ProgressionPolicy::Ragged
    };

    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        season,
        progression,
        scoring: scoring.filter(ScoringConfig::is_customized),
        ..Config::default()
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    if config.scoring.is_none() {
        println!(
            "Official points ({}) will be used.",
            format_points_list(official.mapping(Session::Race))
        );
    }
    println!("Run `gridpoints` to get started.");

    Ok(())
}

