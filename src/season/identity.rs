//! Canonical identity keys for drivers and constructors.
//!
//! Every component that groups rows by driver or team goes through
//! [`canonical_key`], so "Max  Verstappen" and "max verstappen" land in the
//! same aggregation bucket.

use serde::Serialize;
use std::fmt;

/// Normalized identity of a driver or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collapse runs of whitespace into single spaces and trim both ends.
/// Case is preserved; this is the form shown to users.
pub fn display_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the identity key for a display string.
pub fn canonical_key(raw: &str) -> EntityKey {
    EntityKey(display_name(raw).to_lowercase())
}

/// Identity key for a driver given the name parts the API reports.
pub fn driver_key(given_name: &str, family_name: &str) -> EntityKey {
    canonical_key(&format!("{} {}", given_name, family_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_collapses_whitespace() {
        assert_eq!(display_name("  Lewis   Hamilton "), "Lewis Hamilton");
        assert_eq!(display_name("Red\tBull"), "Red Bull");
    }

    #[test]
    fn test_canonical_key_ignores_case_and_spacing() {
        assert_eq!(canonical_key("Max Verstappen"), canonical_key(" max  VERSTAPPEN"));
        assert_ne!(canonical_key("Max Verstappen"), canonical_key("Jos Verstappen"));
    }

    #[test]
    fn test_driver_key_matches_full_name_key() {
        assert_eq!(driver_key("Charles", "Leclerc"), canonical_key("Charles Leclerc"));
        // Trailing space in a name part must not split the bucket
        assert_eq!(driver_key("Charles ", "Leclerc"), canonical_key("Charles Leclerc"));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(canonical_key("   ").as_str(), "");
    }
}
