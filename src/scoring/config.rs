use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::input::{coerce_points, parse_points_input};
use crate::season::Position;

/// Official race points, P1 through P10.
pub const OFFICIAL_RACE_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Official sprint points, P1 through P8.
pub const OFFICIAL_SPRINT_POINTS: [u32; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

/// A scored session. Qualifying is never scored directly; it only feeds the pole bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Race,
    Sprint,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Race => f.write_str("Race"),
            Session::Sprint => f.write_str("Sprint"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("position must be 1 or greater, got {0}")]
    InvalidPosition(u32),
}

fn official_race_points() -> BTreeMap<u32, u32> {
    to_mapping(&OFFICIAL_RACE_POINTS)
}

fn official_sprint_points() -> BTreeMap<u32, u32> {
    to_mapping(&OFFICIAL_SPRINT_POINTS)
}

fn to_mapping(points: &[u32]) -> BTreeMap<u32, u32> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i as u32 + 1, p))
        .collect()
}

/// Points scheme: sparse position→points maps for race and sprint plus bonuses.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   race: { 1: 25, 2: 18, 3: 15 }
///   sprint: { 1: 8, 2: 7 }
///   pole_bonus: 1
///   fastest_lap_bonus: 1
/// ```
///
/// Omitted maps fall back to the official tables. Every mutation bumps
/// [`ScoringConfig::revision`], which callers use to detect stale standings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default = "official_race_points")]
    race: BTreeMap<u32, u32>,

    #[serde(default = "official_sprint_points")]
    sprint: BTreeMap<u32, u32>,

    #[serde(default)]
    pole_bonus: u32,

    #[serde(default)]
    fastest_lap_bonus: u32,

    #[serde(skip)]
    revision: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::official()
    }
}

// Revision is bookkeeping, not part of the scheme
impl PartialEq for ScoringConfig {
    fn eq(&self, other: &Self) -> bool {
        self.race == other.race
            && self.sprint == other.sprint
            && self.pole_bonus == other.pole_bonus
            && self.fastest_lap_bonus == other.fastest_lap_bonus
    }
}

impl ScoringConfig {
    /// The fixed official scheme: no pole or fastest-lap bonus.
    pub fn official() -> Self {
        Self {
            race: official_race_points(),
            sprint: official_sprint_points(),
            pole_bonus: 0,
            fastest_lap_bonus: 0,
            revision: 0,
        }
    }

    /// Build a scheme from explicit maps (mostly for tests and CLI overrides)
    pub fn from_parts(
        race: BTreeMap<u32, u32>,
        sprint: BTreeMap<u32, u32>,
        pole_bonus: u32,
        fastest_lap_bonus: u32,
    ) -> Self {
        Self {
            race,
            sprint,
            pole_bonus,
            fastest_lap_bonus,
            revision: 0,
        }
    }

    pub fn mapping(&self, session: Session) -> &BTreeMap<u32, u32> {
        match session {
            Session::Race => &self.race,
            Session::Sprint => &self.sprint,
        }
    }

    /// Points for a 1-based position. Total: unmapped, zero, negative and
    /// out-of-range positions all score 0.
    pub fn points_for(&self, position: i64, session: Session) -> u32 {
        u32::try_from(position)
            .ok()
            .and_then(|p| self.mapping(session).get(&p).copied())
            .unwrap_or(0)
    }

    /// Points for a reported position; non-finishing codes score 0.
    pub fn points_for_position(&self, position: &Position, session: Session) -> u32 {
        position
            .number()
            .map(|p| self.points_for(i64::from(p), session))
            .unwrap_or(0)
    }

    pub fn pole_bonus(&self) -> u32 {
        self.pole_bonus
    }

    pub fn fastest_lap_bonus(&self) -> u32 {
        self.fastest_lap_bonus
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Overwrite one entry. Negative values are stored as 0.
    pub fn set_points(
        &mut self,
        position: u32,
        session: Session,
        value: i64,
    ) -> Result<u64, ScoringError> {
        if position == 0 {
            return Err(ScoringError::InvalidPosition(position));
        }
        let points = coerce_points(value);
        match session {
            Session::Race => self.race.insert(position, points),
            Session::Sprint => self.sprint.insert(position, points),
        };
        Ok(self.bump())
    }

    /// Overwrite one entry from free text; non-numeric input stores 0.
    pub fn set_points_from_input(
        &mut self,
        position: u32,
        session: Session,
        input: &str,
    ) -> Result<u64, ScoringError> {
        self.set_points(position, session, i64::from(parse_points_input(input)))
    }

    pub fn set_pole_bonus(&mut self, value: i64) -> u64 {
        self.pole_bonus = coerce_points(value);
        self.bump()
    }

    pub fn set_pole_bonus_from_input(&mut self, input: &str) -> u64 {
        self.set_pole_bonus(i64::from(parse_points_input(input)))
    }

    pub fn set_fastest_lap_bonus(&mut self, value: i64) -> u64 {
        self.fastest_lap_bonus = coerce_points(value);
        self.bump()
    }

    pub fn set_fastest_lap_bonus_from_input(&mut self, input: &str) -> u64 {
        self.set_fastest_lap_bonus(i64::from(parse_points_input(input)))
    }

    /// Restore the official tables and clear bonuses
    pub fn reset_to_official(&mut self) -> u64 {
        let revision = self.revision;
        *self = Self::official();
        self.revision = revision;
        self.bump()
    }

    /// True when the scheme differs from the official one in any way
    pub fn is_customized(&self) -> bool {
        *self != Self::official()
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}
