use chrono::NaiveDate;
use serde::Serialize;

use super::colors::team_color;
use super::identity::{canonical_key, display_name, driver_key, EntityKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub name: String,
    #[serde(skip)]
    pub key: EntityKey,
}

impl Driver {
    pub fn new(given_name: &str, family_name: &str) -> Self {
        Self {
            name: display_name(&format!("{} {}", given_name, family_name)),
            key: driver_key(given_name, family_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constructor {
    pub name: String,
    #[serde(skip)]
    pub key: EntityKey,
}

impl Constructor {
    pub fn new(name: &str) -> Self {
        Self {
            name: display_name(name),
            key: canonical_key(name),
        }
    }

    pub fn color(&self) -> &'static str {
        team_color(&self.name)
    }
}

/// Finishing or qualifying position as reported by the API.
///
/// Classified positions are 1-based. Anything that does not parse as a
/// positive integer ("R", "D", "W", "") is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Position {
    Classified(u32),
    Unclassified(String),
}

impl Position {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Position::Classified(n),
            _ => Position::Unclassified(raw.trim().to_string()),
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            Position::Classified(n) => Some(*n),
            Position::Unclassified(_) => None,
        }
    }

    /// Short label for tiles: "P3", or the raw code for unclassified rows
    pub fn label(&self) -> String {
        match self {
            Position::Classified(n) => format!("P{}", n),
            Position::Unclassified(code) if code.is_empty() => "-".to_string(),
            Position::Unclassified(code) => code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResult {
    pub driver: Driver,
    pub constructor: Constructor,
    pub position: Position,
    pub fastest_lap: bool,
    pub status: Option<String>,
    pub grid: Option<u32>,
}

/// Sprint rows carry the same fields as race rows; only the points mapping differs.
pub type SprintResult = RaceResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifyingResult {
    pub driver: Driver,
    pub position: Position,
}

/// One race entry as it appears on a single results page.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceEntry {
    pub round: u32,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub url: Option<String>,
    pub results: Vec<RaceResult>,
}

/// One page of the paginated season results endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RacePage {
    pub races: Vec<RaceEntry>,
}

impl RacePage {
    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }
}

/// A race weekend with everything needed for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub number: u32,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub url: Option<String>,
    pub results: Vec<RaceResult>,
    pub qualifying: Option<Vec<QualifyingResult>>,
    pub sprint: Option<Vec<SprintResult>>,
}

impl Round {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            date: None,
            url: None,
            results: Vec::new(),
            qualifying: None,
            sprint: None,
        }
    }

    /// Key of the driver who qualified P1, if qualifying data is present
    pub fn pole_sitter(&self) -> Option<&EntityKey> {
        self.qualifying
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|q| q.position == Position::Classified(1))
            .map(|q| &q.driver.key)
    }

    pub fn sprint_results(&self) -> &[SprintResult] {
        self.sprint.as_deref().unwrap_or_default()
    }

    pub fn has_sprint(&self) -> bool {
        !self.sprint_results().is_empty()
    }

    /// "Name (YYYY-MM-DD)" when the date is known
    pub fn label(&self) -> String {
        match self.date {
            Some(date) => format!("{} ({})", self.name, date.format("%Y-%m-%d")),
            None => self.name.clone(),
        }
    }
}

impl From<RaceEntry> for Round {
    fn from(entry: RaceEntry) -> Self {
        Self {
            number: entry.round,
            name: entry.name,
            date: entry.date,
            url: entry.url,
            results: entry.results,
            qualifying: None,
            sprint: None,
        }
    }
}
