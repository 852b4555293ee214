use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Serialize, Serializer};

/// A `yyyy/mm/dd` folder under the sessions root
///
/// Segments are kept as the original fixed-width digit strings so that the key
/// round-trips to the on-disk folder names exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateKey {
    year: String,
    month: String,
    day: String,
}

impl DateKey {
    /// Build a key from folder segments, returning `None` unless the segments are
    /// all digits with widths 4/2/2
    pub fn parse(year: &str, month: &str, day: &str) -> Option<Self> {
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return None;
        }
        if !is_digits(year) || !is_digits(month) || !is_digits(day) {
            return None;
        }
        Some(Self { year: year.to_string(), month: month.to_string(), day: day.to_string() })
    }

    /// Relative folder path, `yyyy/mm/dd`
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.year, self.month, self.day)
    }

    fn numeric(&self) -> (u32, u32, u32) {
        (
            self.year.parse().unwrap_or(0),
            self.month.parse().unwrap_or(0),
            self.day.parse().unwrap_or(0),
        )
    }
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// Chronological order: numeric (year, month, day), then the string form on ties
impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| self.to_string().cmp(&other.to_string()))
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parses the `yyyy-mm-dd` display form
impl FromStr for DateKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            bail!("Invalid date '{}': expected yyyy-mm-dd", s);
        }
        match DateKey::parse(parts[0], parts[1], parts[2]) {
            Some(key) => Ok(key),
            None => bail!("Invalid date '{}': expected yyyy-mm-dd", s),
        }
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
