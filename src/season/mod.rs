pub mod colors;
pub mod identity;
pub mod repository;
pub mod types;

use chrono::Datelike;

pub use colors::{team_color, team_rgb, DEFAULT_TEAM_COLOR};
pub use identity::{canonical_key, display_name, driver_key, EntityKey};
pub use repository::{max_result_len, ResultsRepository};
pub use types::{
    Constructor, Driver, Position, QualifyingResult, RaceEntry, RacePage, RaceResult, Round,
    SprintResult,
};

/// First season of the world championship.
pub const FIRST_SEASON: u32 = 1950;

/// The calendar year, used as the default season.
pub fn current_season() -> u32 {
    u32::try_from(chrono::Utc::now().year()).unwrap_or(FIRST_SEASON)
}

/// Clamp a requested season into the range the API serves.
pub fn clamp_season(season: u32) -> u32 {
    season.clamp(FIRST_SEASON, current_season())
}
