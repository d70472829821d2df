use crate::errors::DomainError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const KEYWORDS: &[(&str, u32)] = &[
    ("today", 1),
    ("yesterday", 1),
    ("week", 7),
    ("lastweek", 7),
    ("month", 30),
    ("lastmonth", 30),
];

/// Longest window accepted, in days.
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Time range accepted by the allocation API.
///
/// Three forms are accepted:
/// - relative durations such as `24h`, `7d`, `2w` or `90m`
/// - the keywords `today`, `yesterday`, `week`, `lastweek`, `month`, `lastmonth`
/// - an explicit `start,end` pair of RFC 3339 timestamps
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CostWindow {
    raw: Arc<str>,
    days: u32,
}

impl CostWindow {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidWindow("window is empty".to_string()));
        }

        if let Some(&(keyword, days)) = KEYWORDS.iter().find(|(k, _)| *k == raw) {
            return Ok(Self {
                raw: Arc::from(keyword),
                days,
            });
        }

        if let Some((start, end)) = raw.split_once(',') {
            let start = parse_timestamp(start)?;
            let end = parse_timestamp(end)?;
            return Self::range(start, end);
        }

        let days = parse_relative_days(raw)?;
        Ok(Self {
            raw: Arc::from(raw),
            days,
        })
    }

    /// Explicit `[start, end)` window.
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidWindow(format!(
                "window end {} is not after start {}",
                end, start
            )));
        }
        let seconds = (end - start).num_seconds();
        let days = u32::try_from(((seconds + 86_399) / 86_400).max(1))
            .ok()
            .filter(|days| *days <= MAX_WINDOW_DAYS)
            .ok_or_else(|| too_long(&format!("{},{}", start, end)))?;
        let raw = format!(
            "{},{}",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        Ok(Self {
            raw: Arc::from(raw.as_str()),
            days,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of whole days the window covers, rounded up, at least 1.
    pub fn days(&self) -> u32 {
        self.days
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::InvalidWindow(format!("bad timestamp '{}': {}", value, e)))
}

fn parse_relative_days(raw: &str) -> Result<u32, DomainError> {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| DomainError::InvalidWindow(format!("'{}' has no unit", raw)))?;
    let (digits, unit) = raw.split_at(split);

    let amount: u32 = digits
        .parse()
        .map_err(|_| DomainError::InvalidWindow(format!("'{}' has no amount", raw)))?;
    if amount == 0 {
        return Err(DomainError::InvalidWindow(format!(
            "'{}' must be greater than zero",
            raw
        )));
    }

    let days = match unit {
        "m" => 1,
        "h" => amount.div_ceil(24),
        "d" => amount,
        "w" => amount.saturating_mul(7),
        other => {
            return Err(DomainError::InvalidWindow(format!(
                "unknown unit '{}' in '{}'",
                other, raw
            )))
        }
    };
    if days > MAX_WINDOW_DAYS {
        return Err(too_long(raw));
    }
    Ok(days.max(1))
}

fn too_long(raw: &str) -> DomainError {
    DomainError::InvalidWindow(format!(
        "'{}' is longer than {} days",
        raw, MAX_WINDOW_DAYS
    ))
}

impl fmt::Display for CostWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for CostWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CostWindow {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CostWindow> for String {
    fn from(window: CostWindow) -> Self {
        window.raw.to_string()
    }
}
