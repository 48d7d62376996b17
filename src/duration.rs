use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid duration {0:?}: expected seconds or segments like 1d, 2h, 30m, 15s")]
    Invalid(String),

    #[error("duration of {0} seconds is out of range")]
    OutOfRange(i64),
}

fn composite() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:-?[0-9]+[dhms])+$").unwrap())
}

fn segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(-?[0-9]+)([dhms])").unwrap())
}

fn unit_seconds(unit: &str) -> i64 {
    match unit {
        "d" => 86_400,
        "h" => 3_600,
        "m" => 60,
        _ => 1,
    }
}

/// Parses `"3600"` or `"1h30m"` style durations into seconds.
///
/// The composite grammar is tried first; anything it does not match in full
/// falls back to a plain integer.
pub fn parse_seconds(input: &str) -> Result<i64, ParseError> {
    let lowered = input.to_lowercase();
    if composite().is_match(&lowered) {
        return segment()
            .captures_iter(&lowered)
            .try_fold(0i64, |total, caps| {
                let n: i64 = caps[1].parse().ok()?;
                n.checked_mul(unit_seconds(&caps[2]))
                    .and_then(|s| total.checked_add(s))
            })
            .ok_or_else(|| ParseError::Invalid(input.to_string()));
    }

    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::Invalid(input.to_string()))
}
