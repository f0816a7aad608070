use super::config::{ScoringConfig, Session};

/// Validate a scoring configuration loaded from disk.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for session in [Session::Race, Session::Sprint] {
        let field = match session {
            Session::Race => "race",
            Session::Sprint => "sprint",
        };
        if config.mapping(session).contains_key(&0) {
            errors.push(format!(
                "scoring.{}: position 0 is not valid, positions start at 1",
                field
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
