#![forbid(unsafe_code)]
//! agenda-nlp library.
//!
//! Validates responses from the natural-language task extraction
//! collaborator. The extractor returns JSON (possibly wrapped in prose)
//! shaped as `{title, priority: 1|2|3|null, dueDate, recurrenceRule}`, with
//! any due date expressed in the requester's wall-clock time without an
//! offset. This crate extracts the JSON object, checks the shape, stamps
//! wall-clock dates with the requester's zone, and degrades the optional
//! fields rather than the whole response: an unparseable date or rule
//! becomes `None` with a `warn!`, while a malformed shape or empty title
//! fails the response outright.
//!
//! # Conventions
//!
//! - **Errors**: per-module error enums; callers get `Result` + `?`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

use agenda_core::{ErrorCode, Priority, Rule};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

/// A validated extraction result, ready to become a [`agenda_core::Task`]
/// draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTask {
    pub title: String,
    pub priority: Option<Priority>,
    /// Stamped with the requester's zone offset at the parsed wall-clock
    /// instant.
    pub due_date: Option<DateTime<FixedOffset>>,
    /// Canonical rule text, re-rendered from the parsed rule.
    pub recurrence_rule: Option<String>,
}

/// The extraction response could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The response text contains no `{...}` object at all.
    #[error("no JSON object in extraction response")]
    NoJsonObject,

    /// The object is not valid JSON or does not match the expected shape.
    #[error("malformed extraction response: {0}")]
    Malformed(String),

    /// Priority outside 1..=3.
    #[error("extraction priority out of range: {0}")]
    PriorityOutOfRange(u8),

    /// The title is empty after trimming.
    #[error("extraction produced an empty title")]
    EmptyTitle,
}

impl ExtractionError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::ExtractionParseError
    }
}

/// Wire shape of the extractor's JSON object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawResponse {
    title: String,
    #[serde(default)]
    priority: Option<u8>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    recurrence_rule: Option<String>,
}

/// Validate a raw extraction response against the contract.
///
/// `raw` is the collaborator's full output text; the first `{...}` span is
/// treated as the response object, so surrounding prose is tolerated.
/// `tz` is the requester's IANA zone, used to stamp offset-less due dates.
pub fn parse_response(raw: &str, tz: Tz) -> Result<ParsedTask, ExtractionError> {
    let object = extract_json_object(raw).ok_or(ExtractionError::NoJsonObject)?;
    let parsed: RawResponse =
        serde_json::from_str(object).map_err(|err| ExtractionError::Malformed(err.to_string()))?;

    let title = parsed.title.trim().to_string();
    if title.is_empty() {
        return Err(ExtractionError::EmptyTitle);
    }

    let priority = parsed
        .priority
        .map(|value| Priority::try_from(value).map_err(|_| ExtractionError::PriorityOutOfRange(value)))
        .transpose()?;

    let due_date = parsed.due_date.as_deref().and_then(|text| {
        let stamped = stamp_local(text, tz);
        if stamped.is_none() {
            warn!(due_date = text, "dropping unparseable due date from extraction");
        }
        stamped
    });

    let recurrence_rule = parsed.recurrence_rule.as_deref().and_then(|text| match Rule::parse(text) {
        Ok(rule) => Some(rule.to_string()),
        Err(err) => {
            warn!(rule = text, %err, "dropping malformed recurrence rule from extraction");
            None
        }
    });

    Ok(ParsedTask {
        title,
        priority,
        due_date,
        recurrence_rule,
    })
}

/// The first `{...}` span of `raw`: from the first `{` to the last `}`.
/// Extraction models sometimes wrap the object in prose or code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Interpret a date-time string, stamping wall-clock values with `tz`.
///
/// Accepted forms, tried in order: RFC 3339 with an explicit offset (kept
/// as-is), `YYYY-MM-DDTHH:MM:SS` wall-clock, and bare `YYYY-MM-DD` (taken
/// as midnight). A wall-clock time skipped by a DST transition resolves to
/// the earlier valid mapping.
#[must_use]
pub fn stamp_local(text: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(local.fixed_offset())
}
