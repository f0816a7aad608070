//! Wire format of the Ergast-compatible API (`MRData` envelopes).
//!
//! Every numeric field arrives as a string. Conversion into the domain types
//! happens here so nothing else sees the envelope.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::season::{
    Constructor, Driver, Position, QualifyingResult, RaceEntry, RacePage, RaceResult,
};

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Deserialize)]
pub struct MrData {
    #[serde(default)]
    pub total: Option<String>,
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<RawRace>,
}

#[derive(Debug, Deserialize)]
pub struct RawRace {
    pub round: String,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<RawResult>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<RawQualifying>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
pub struct RawResult {
    pub position: String,
    #[serde(rename = "Driver")]
    pub driver: RawDriver,
    #[serde(rename = "Constructor")]
    pub constructor: RawConstructor,
    #[serde(default)]
    pub grid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<RawFastestLap>,
}

#[derive(Debug, Deserialize)]
pub struct RawFastestLap {
    #[serde(default)]
    pub rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawQualifying {
    pub position: String,
    #[serde(rename = "Driver")]
    pub driver: RawDriver,
}

#[derive(Debug, Deserialize)]
pub struct RawDriver {
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawConstructor {
    pub name: String,
}

impl RawResult {
    /// The API attaches lap data to most classified drivers; only rank 1 is
    /// the fastest lap of the race.
    fn has_fastest_lap(&self) -> bool {
        self.fastest_lap
            .as_ref()
            .and_then(|fl| fl.rank.as_deref())
            .map(|rank| rank.trim() == "1")
            .unwrap_or(false)
    }

    pub fn into_domain(self) -> RaceResult {
        let fastest_lap = self.has_fastest_lap();
        RaceResult {
            driver: Driver::new(&self.driver.given_name, &self.driver.family_name),
            constructor: Constructor::new(&self.constructor.name),
            position: Position::parse(&self.position),
            fastest_lap,
            status: self.status.filter(|s| !s.is_empty()),
            grid: self.grid.and_then(|g| g.trim().parse().ok()),
        }
    }
}

impl RawQualifying {
    pub fn into_domain(self) -> QualifyingResult {
        QualifyingResult {
            driver: Driver::new(&self.driver.given_name, &self.driver.family_name),
            position: Position::parse(&self.position),
        }
    }
}

impl RawRace {
    /// Convert into a page entry. Fails only when the round number is not an integer.
    pub fn into_entry(self) -> Result<RaceEntry, String> {
        let round = self
            .round
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid round number '{}'", self.round))?;
        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(RaceEntry {
            round,
            name: self.race_name,
            date,
            url: self.url,
            results: self.results.into_iter().map(RawResult::into_domain).collect(),
        })
    }
}

impl Envelope {
    pub fn into_page(self) -> Result<RacePage, String> {
        let races = self
            .mr_data
            .race_table
            .races
            .into_iter()
            .map(RawRace::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RacePage { races })
    }

    /// Qualifying rows of the first (only) race in a per-round response
    pub fn into_qualifying(self) -> Vec<QualifyingResult> {
        self.mr_data
            .race_table
            .races
            .into_iter()
            .next()
            .map(|race| {
                race.qualifying_results
                    .into_iter()
                    .map(RawQualifying::into_domain)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sprint rows of the first (only) race in a per-round response
    pub fn into_sprint(self) -> Vec<RaceResult> {
        self.mr_data
            .race_table
            .races
            .into_iter()
            .next()
            .map(|race| {
                race.sprint_results
                    .into_iter()
                    .map(RawResult::into_domain)
                    .collect()
            })
            .unwrap_or_default()
    }
}
