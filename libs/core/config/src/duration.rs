//! Go-style duration strings for configuration values.
//!
//! Accepts a sequence of `<number><unit>` pairs (`"300ms"`, `"30s"`, `"1h30m"`,
//! `"1.5h"`) with units `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`. A bare integer
//! is read as a number of seconds.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration '{0}'")]
    Invalid(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },
}

pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseDurationError::Empty);
    }
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut total = Duration::ZERO;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        if number_len == 0 {
            return Err(ParseDurationError::Invalid(trimmed.to_string()));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| ParseDurationError::Invalid(trimmed.to_string()))?;
        rest = &rest[number_len..];

        let unit_len = rest.find(is_number).unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            "" => return Err(ParseDurationError::MissingUnit(trimmed.to_string())),
            other => {
                return Err(ParseDurationError::UnknownUnit {
                    unit: other.to_string(),
                    input: trimmed.to_string(),
                })
            }
        };

        total += Duration::from_nanos((value * nanos_per_unit).round() as u64);
    }

    Ok(total)
}

/// Serde adapter: `#[serde(deserialize_with = "core_config::duration::deserialize")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a duration such as \"30s\" or a number of seconds")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_secs)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        parse_duration(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize")]
        value: Duration,
    }

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15µs").unwrap(), Duration::from_micros(15));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("1m0.5s").unwrap(), Duration::from_millis(60_500));
    }

    #[test]
    fn test_bare_integer_is_seconds() {
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_duration("  "), Err(ParseDurationError::Empty));
        assert_eq!(
            parse_duration("1.5"),
            Err(ParseDurationError::MissingUnit("1.5".to_string()))
        );
        assert!(matches!(
            parse_duration("3d"),
            Err(ParseDurationError::UnknownUnit { ref unit, .. }) if unit == "d"
        ));
        assert!(matches!(
            parse_duration("s"),
            Err(ParseDurationError::Invalid(_))
        ));
    }

    #[test]
    fn test_deserialize_string_and_number() {
        let holder: Holder = serde_json::from_str(r#"{"value": "5m"}"#).unwrap();
        assert_eq!(holder.value, Duration::from_secs(300));

        let holder: Holder = serde_json::from_str(r#"{"value": 45}"#).unwrap();
        assert_eq!(holder.value, Duration::from_secs(45));

        assert!(serde_json::from_str::<Holder>(r#"{"value": -1}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"value": "soon"}"#).is_err());
    }
}
