//! Builders shared by unit tests across modules.

use crate::season::{Constructor, Driver, Position, QualifyingResult, RaceResult, Round};

/// Split "Given Family" on the first space so test names read naturally.
fn driver(name: &str) -> Driver {
    match name.split_once(' ') {
        Some((given, family)) => Driver::new(given, family),
        None => Driver::new(name, ""),
    }
}

pub fn race_row(pos: u32, driver_name: &str, team: &str, fastest_lap: bool) -> RaceResult {
    RaceResult {
        driver: driver(driver_name),
        constructor: Constructor::new(team),
        position: if pos == 0 {
            Position::Unclassified("R".to_string())
        } else {
            Position::Classified(pos)
        },
        fastest_lap,
        status: None,
        grid: None,
    }
}

pub fn quali_row(pos: u32, driver_name: &str) -> QualifyingResult {
    QualifyingResult {
        driver: driver(driver_name),
        position: Position::Classified(pos),
    }
}

pub fn round_with(number: u32, results: Vec<RaceResult>) -> Round {
    let mut round = Round::new(number, format!("Round {} Grand Prix", number));
    round.results = results;
    round
}
