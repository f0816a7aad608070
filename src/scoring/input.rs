//! Normalization of user-typed point values.
//!
//! Point editors accept free text. Anything that is not a non-negative
//! integer becomes 0 instead of an error.

use std::collections::BTreeMap;

/// Clamp a signed value into the valid points range.
pub fn coerce_points(value: i64) -> u32 {
    if value <= 0 {
        0
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

/// Parse the leading integer of `input`.
///
/// Leading whitespace and one sign character are accepted, parsing stops at
/// the first non-digit ("12pts" is 12). No digits, or a negative number,
/// yields 0. Values beyond `u32::MAX` saturate.
pub fn parse_points_input(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || negative {
        return 0;
    }

    digits.parse::<u64>().map_or(u32::MAX, |v| {
        u32::try_from(v).unwrap_or(u32::MAX)
    })
}

/// Parse a comma-separated points list where the n-th value is for P(n),
/// e.g. "25, 18, 15". Unlike editor input this is strict: every value must
/// be a non-negative integer.
pub fn parse_points_list(input: &str) -> Result<BTreeMap<u32, u32>, String> {
    let mut mapping = BTreeMap::new();
    if input.trim().is_empty() {
        return Ok(mapping);
    }
    for (i, part) in input.split(',').enumerate() {
        let value = part.trim();
        let points = value
            .parse::<u32>()
            .map_err(|_| format!("P{}: '{}' is not a non-negative integer", i + 1, value))?;
        mapping.insert(i as u32 + 1, points);
    }
    Ok(mapping)
}

/// Inverse of [`parse_points_list`], for prompts and display.
/// Gaps in the mapping are written as 0.
pub fn format_points_list(mapping: &BTreeMap<u32, u32>) -> String {
    let last = mapping.keys().next_back().copied().unwrap_or(0);
    (1..=last)
        .map(|pos| mapping.get(&pos).copied().unwrap_or(0).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_points_input("25"), 25);
        assert_eq!(parse_points_input("  7"), 7);
        assert_eq!(parse_points_input("+3"), 3);
        assert_eq!(parse_points_input("0"), 0);
    }

    #[test]
    fn test_parse_non_numeric_is_zero() {
        assert_eq!(parse_points_input(""), 0);
        assert_eq!(parse_points_input("abc"), 0);
        assert_eq!(parse_points_input("-"), 0);
        assert_eq!(parse_points_input(" x12"), 0);
    }

    #[test]
    fn test_parse_leading_digits() {
        assert_eq!(parse_points_input("12pts"), 12);
        assert_eq!(parse_points_input("4.5"), 4);
    }

    #[test]
    fn test_parse_negative_is_zero() {
        assert_eq!(parse_points_input("-5"), 0);
        assert_eq!(parse_points_input("  -100"), 0);
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(parse_points_input("99999999999999999999999"), u32::MAX);
        assert_eq!(parse_points_input("4294967296"), u32::MAX);
    }

    #[test]
    fn test_coerce_points() {
        assert_eq!(coerce_points(-1), 0);
        assert_eq!(coerce_points(0), 0);
        assert_eq!(coerce_points(18), 18);
        assert_eq!(coerce_points(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_parse_points_list() {
        let mapping = parse_points_list("25, 18,15").unwrap();
        assert_eq!(mapping.get(&1), Some(&25));
        assert_eq!(mapping.get(&3), Some(&15));
        assert_eq!(mapping.len(), 3);
        assert!(parse_points_list("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_points_list_rejects_garbage() {
        let err = parse_points_list("25, x, 15").unwrap_err();
        assert!(err.starts_with("P2"));
        assert!(parse_points_list("10, -1").is_err());
    }

    #[test]
    fn test_format_points_list_fills_gaps() {
        let mapping = BTreeMap::from([(1, 10), (3, 4)]);
        assert_eq!(format_points_list(&mapping), "10, 0, 4");
        assert_eq!(format_points_list(&BTreeMap::new()), "");
    }
}
