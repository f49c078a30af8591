//! Unit-suffixed numeric conversion for timeout-style values.
//!
//! Accepts `<number><unit?>` where the number is `0` or a non-zero-leading
//! integer with up to two decimal digits, and the unit is one of the
//! configured suffixes. A missing unit means seconds.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{ConfigError, DurationError};

/// Converts `<number><unit>` tokens into seconds.
///
/// # Examples
///
/// ```
/// use wperf_args_core::DurationParser;
///
/// let parser = DurationParser::with_default_units();
/// assert_eq!(parser.to_seconds("2m").unwrap(), 120.0);
/// assert_eq!(parser.to_seconds("1.5").unwrap(), 1.5);
/// assert!(parser.to_seconds("5x").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DurationParser {
    units: BTreeMap<String, f64>,
    pattern: Regex,
}

/// Default unit table: milliseconds, seconds, minutes, hours and days.
pub fn default_time_units() -> BTreeMap<String, f64> {
    [
        ("ms", 0.001),
        ("s", 1.0),
        ("m", 60.0),
        ("h", 3600.0),
        ("d", 86400.0),
    ]
    .into_iter()
    .map(|(unit, multiplier)| (unit.to_string(), multiplier))
    .collect()
}

impl DurationParser {
    /// Builds a converter for the given unit table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUnit`] for an empty suffix, a suffix
    /// containing digits or `.`, or a multiplier that is not a positive
    /// finite number.
    pub fn new(units: BTreeMap<String, f64>) -> Result<Self, ConfigError> {
        for (unit, multiplier) in &units {
            if unit.is_empty() {
                return Err(ConfigError::InvalidUnit {
                    unit: unit.clone(),
                    reason: "unit suffix cannot be empty".to_string(),
                });
            }
            if unit.chars().any(|ch| ch.is_ascii_digit() || ch == '.') {
                return Err(ConfigError::InvalidUnit {
                    unit: unit.clone(),
                    reason: "unit suffix cannot contain digits or '.'".to_string(),
                });
            }
            if !multiplier.is_finite() || *multiplier <= 0.0 {
                return Err(ConfigError::InvalidUnit {
                    unit: unit.clone(),
                    reason: format!("multiplier {multiplier} must be positive"),
                });
            }
        }

        // Longest suffix first so `ms` is tried before `m`.
        let mut suffixes: Vec<&str> = units.keys().map(String::as_str).collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = suffixes
            .iter()
            .map(|unit| regex::escape(unit))
            .collect::<Vec<_>>()
            .join("|");

        let source = if alternation.is_empty() {
            r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$".to_string()
        } else {
            format!(r"^(0|[1-9][0-9]*)(\.[0-9]{{1,2}})?({alternation})?$")
        };
        let pattern = Regex::new(&source)?;

        Ok(Self { units, pattern })
    }

    /// Converter over [`default_time_units`].
    pub fn with_default_units() -> Self {
        let units = default_time_units();
        Self::new(units).expect("default unit table must be valid")
    }

    /// Returns `true` when `value` matches the numeric grammar and unit table.
    pub fn is_valid(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    /// Converts `value` into seconds.
    ///
    /// # Errors
    ///
    /// Returns [`DurationError::InvalidTimeout`] when the value is malformed
    /// or names a unit outside the table.
    pub fn to_seconds(&self, value: &str) -> Result<f64, DurationError> {
        let invalid = || DurationError::InvalidTimeout(value.to_string());

        if !self.is_valid(value) {
            return Err(invalid());
        }

        let split = value
            .find(|ch: char| !ch.is_ascii_digit() && ch != '.')
            .unwrap_or(value.len());
        let (number, suffix) = value.split_at(split);

        let number: f64 = number.parse().map_err(|_| invalid())?;
        if suffix.is_empty() {
            return Ok(number);
        }

        // Unreachable while the pattern is derived from the same table.
        let multiplier = self.units.get(suffix).ok_or_else(invalid)?;
        Ok(number * multiplier)
    }

    /// The configured unit table.
    pub fn units(&self) -> &BTreeMap<String, f64> {
        &self.units
    }
}
