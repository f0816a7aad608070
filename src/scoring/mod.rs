pub mod config;
pub mod input;
pub mod validation;

pub use config::*;
pub use input::{coerce_points, format_points_list, parse_points_input, parse_points_list};
pub use validation::validate_scoring;
