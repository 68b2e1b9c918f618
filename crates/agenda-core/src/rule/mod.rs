//! Recurrence rule engine.
//!
//! Parses rule text of the form
//! `FREQ={DAILY|WEEKLY|MONTHLY|YEARLY}[;INTERVAL=N][;BYDAY=D1,D2,...][;BYMONTHDAY=N]`
//! into a [`Rule`] and enumerates occurrence date-times phased from an
//! anchor ("dtstart"). The rule text itself carries no start date; the
//! anchor comes from the owning task (due date if present, else creation).
//!
//! # Module layout
//!
//! - [`Rule::parse`] / [`Rule::from_str`] — grammar (this module).
//! - [`occurrences`] — anchor-phased enumeration.
//! - [`describe`] — locale-specific human rendering.

pub mod describe;
pub mod occurrences;

pub use describe::Locale;
pub use occurrences::Occurrences;

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four supported frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(RuleParseError::InvalidFrequency(other.to_string())),
        }
    }
}

/// Weekday codes for `BYDAY`, Monday-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Mo,
        Self::Tu,
        Self::We,
        Self::Th,
        Self::Fr,
        Self::Sa,
        Self::Su,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mo => "MO",
            Self::Tu => "TU",
            Self::We => "WE",
            Self::Th => "TH",
            Self::Fr => "FR",
            Self::Sa => "SA",
            Self::Su => "SU",
        }
    }

    /// Offset from Monday in days, 0–6.
    #[must_use]
    pub const fn days_from_monday(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Mo,
            chrono::Weekday::Tue => Self::Tu,
            chrono::Weekday::Wed => Self::We,
            chrono::Weekday::Thu => Self::Th,
            chrono::Weekday::Fri => Self::Fr,
            chrono::Weekday::Sat => Self::Sa,
            chrono::Weekday::Sun => Self::Su,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MO" => Ok(Self::Mo),
            "TU" => Ok(Self::Tu),
            "WE" => Ok(Self::We),
            "TH" => Ok(Self::Th),
            "FR" => Ok(Self::Fr),
            "SA" => Ok(Self::Sa),
            "SU" => Ok(Self::Su),
            other => Err(RuleParseError::InvalidWeekday(other.to_string())),
        }
    }
}

/// Errors from parsing rule text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleParseError {
    /// The rule text is empty or whitespace.
    #[error("empty rule text")]
    Empty,

    /// A part is not in `KEY=VALUE` form.
    #[error("malformed rule part '{0}': expected KEY=VALUE")]
    MalformedPart(String),

    /// A key appeared more than once.
    #[error("duplicate rule key '{0}'")]
    DuplicateKey(String),

    /// A key is not one of FREQ, INTERVAL, BYDAY, BYMONTHDAY.
    #[error("unknown rule key '{0}'")]
    UnknownKey(String),

    /// The rule has no FREQ part.
    #[error("missing FREQ")]
    MissingFrequency,

    /// FREQ is not one of DAILY, WEEKLY, MONTHLY, YEARLY.
    #[error("invalid FREQ '{0}'")]
    InvalidFrequency(String),

    /// INTERVAL is not a positive integer.
    #[error("invalid INTERVAL '{0}': expected a positive integer")]
    InvalidInterval(String),

    /// A BYDAY entry is not a two-letter weekday code.
    #[error("invalid BYDAY entry '{0}': expected one of MO,TU,WE,TH,FR,SA,SU")]
    InvalidWeekday(String),

    /// BYMONTHDAY is outside 1–31.
    #[error("invalid BYMONTHDAY '{0}': expected 1-31")]
    InvalidMonthDay(String),
}

impl RuleParseError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::RuleParseError
    }
}

/// A parsed recurrence rule.
///
/// `by_day` only affects WEEKLY enumeration and `by_month_day` only
/// MONTHLY; both parse on any frequency and are ignored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub frequency: Frequency,
    /// Cycle length in frequency units, at least 1.
    pub interval: u32,
    /// Weekday set for WEEKLY, sorted Monday-first and de-duplicated.
    pub by_day: Vec<Weekday>,
    /// Day-of-month 1–31 for MONTHLY.
    pub by_month_day: Option<u32>,
}

impl Rule {
    /// Parse rule text. Whitespace around parts is tolerated; keys and
    /// values are case-sensitive upper-case as produced by the extraction
    /// collaborator.
    pub fn parse(text: &str) -> Result<Self, RuleParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RuleParseError::Empty);
        }

        let mut frequency = None;
        let mut interval = None;
        let mut by_day: Option<Vec<Weekday>> = None;
        let mut by_month_day = None;

        for part in trimmed.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RuleParseError::MalformedPart(part.to_string()))?;

            match key {
                "FREQ" => {
                    if frequency.is_some() {
                        return Err(RuleParseError::DuplicateKey(key.to_string()));
                    }
                    frequency = Some(value.parse::<Frequency>()?);
                }
                "INTERVAL" => {
                    if interval.is_some() {
                        return Err(RuleParseError::DuplicateKey(key.to_string()));
                    }
                    let n: u32 = value
                        .parse()
                        .map_err(|_| RuleParseError::InvalidInterval(value.to_string()))?;
                    if n == 0 {
                        return Err(RuleParseError::InvalidInterval(value.to_string()));
                    }
                    interval = Some(n);
                }
                "BYDAY" => {
                    if by_day.is_some() {
                        return Err(RuleParseError::DuplicateKey(key.to_string()));
                    }
                    let mut days = value
                        .split(',')
                        .map(|d| d.trim().parse::<Weekday>())
                        .collect::<Result<Vec<_>, _>>()?;
                    if days.is_empty() {
                        return Err(RuleParseError::InvalidWeekday(value.to_string()));
                    }
                    days.sort_unstable();
                    days.dedup();
                    by_day = Some(days);
                }
                "BYMONTHDAY" => {
                    if by_month_day.is_some() {
                        return Err(RuleParseError::DuplicateKey(key.to_string()));
                    }
                    let n: u32 = value
                        .parse()
                        .map_err(|_| RuleParseError::InvalidMonthDay(value.to_string()))?;
                    if !(1..=31).contains(&n) {
                        return Err(RuleParseError::InvalidMonthDay(value.to_string()));
                    }
                    by_month_day = Some(n);
                }
                other => return Err(RuleParseError::UnknownKey(other.to_string())),
            }
        }

        Ok(Self {
            frequency: frequency.ok_or(RuleParseError::MissingFrequency)?,
            interval: interval.unwrap_or(1),
            by_day: by_day.unwrap_or_default(),
            by_month_day,
        })
    }
}

impl fmt::Display for Rule {
    /// Canonical rule text; parsing the output yields an equal rule.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if !self.by_day.is_empty() {
            write!(f, ";BYDAY=")?;
            for (i, day) in self.by_day.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{day}")?;
            }
        }
        if let Some(day) = self.by_month_day {
            write!(f, ";BYMONTHDAY={day}")?;
        }
        Ok(())
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
