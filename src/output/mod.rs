pub mod formatter;

pub use formatter::{
    format_movement, format_progression_table, format_progression_tsv, format_round_results,
    format_standings_json, format_standings_table, format_standings_tsv, should_use_colors,
    truncate_name, TableKind,
};
