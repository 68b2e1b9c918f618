use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three priority levels, ordered high to low.
///
/// Serialized as the integers 1–3 used by the store and the extraction
/// contract. An unset priority is `Option::None` and sorts after all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Rank used for instance ordering; `None` priorities rank after `Low`.
    #[must_use]
    pub const fn rank(priority: Option<Self>) -> u8 {
        match priority {
            Some(p) => p as u8,
            None => 4,
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p as Self
    }
}

impl TryFrom<u8> for Priority {
    type Error = ParseEnumError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(ParseEnumError {
                expected: "priority",
                got: other.to_string(),
            }),
        }
    }
}

/// The two lifecycle states of a stored task.
///
/// For a recurring task this field never means "all occurrences done":
/// per-occurrence completion lives in completion records, and a completed
/// recurring task keeps enumerating future occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// A stored task row, mirrored from the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque id assigned by the store.
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub priority: Option<Priority>,
    /// Due date-time with its timezone offset. For a recurring task this
    /// supplies only the enumeration anchor and time-of-day.
    pub due_date: Option<DateTime<FixedOffset>>,
    /// Recurrence rule text in `FREQ=...` form; at most one per task.
    pub recurrence_rule: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<FixedOffset>,
}

impl Task {
    /// The anchor ("dtstart") that fixes phase for rule enumeration: the
    /// due date if present, else the creation timestamp.
    #[must_use]
    pub fn anchor(&self) -> DateTime<FixedOffset> {
        self.due_date.unwrap_or(self.created_at)
    }

    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some()
    }
}

/// Error returned when parsing an enum value from text or an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "1" => Ok(Self::High),
            "medium" | "2" => Ok(Self::Medium),
            "low" | "3" => Ok(Self::Low),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}
