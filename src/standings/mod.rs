pub mod engine;
pub mod progression;
pub mod table;

pub use engine::{compute_standings, earned_points, PointsBreakdown, Standings};
pub use progression::{build_progression, DriverSeries, Progression, ProgressionPolicy};
pub use table::{Standing, StandingsTable};
