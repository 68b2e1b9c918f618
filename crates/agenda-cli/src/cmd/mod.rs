//! Command handlers, one module per subcommand group.

pub mod add;
pub mod describe;
pub mod done;
pub mod parse;
pub mod rm;
pub mod view;

use agenda_core::config::ProjectConfig;
use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Resolve the configured IANA timezone.
pub fn timezone(config: &ProjectConfig) -> Result<Tz> {
    Tz::from_str(&config.display.timezone)
        .map_err(|_| anyhow::anyhow!("Unknown timezone '{}'", config.display.timezone))
}

/// The zone's UTC offset on `date`, taken at midday to dodge DST edges.
pub fn offset_on(tz: Tz, date: NaiveDate) -> FixedOffset {
    date.and_hms_opt(12, 0, 0)
        .and_then(|noon| tz.from_local_datetime(&noon).earliest())
        .map_or_else(|| Utc.fix(), |dt| dt.offset().fix())
}

/// Today's date in the given zone.
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse a `--date` argument, defaulting to today.
pub fn resolve_date(arg: Option<NaiveDate>, tz: Tz) -> NaiveDate {
    arg.unwrap_or_else(|| today(tz))
}

/// Parse a `--due` argument: wall-clock date-time stamped with the
/// configured zone.
pub fn parse_due(text: &str, tz: Tz) -> Result<chrono::DateTime<FixedOffset>> {
    agenda_nlp::stamp_local(text, tz)
        .with_context(|| format!("Invalid date-time '{text}': expected YYYY-MM-DD[THH:MM:SS]"))
}

/// Validate rule text early so a bad rule fails the command instead of
/// silently expanding to nothing later.
pub fn validate_rule(text: &str) -> Result<String> {
    let rule = agenda_core::Rule::parse(text)
        .with_context(|| format!("Invalid recurrence rule '{text}'"))?;
    Ok(rule.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_tracks_dst() {
        let ny = chrono_tz::America::New_York;
        let winter = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let summer = NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date");
        assert_eq!(offset_on(ny, winter).local_minus_utc(), -5 * 3600);
        assert_eq!(offset_on(ny, summer).local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn rule_validation_canonicalizes() {
        assert_eq!(
            validate_rule("FREQ=WEEKLY;BYDAY=FR,MO").expect("valid"),
            "FREQ=WEEKLY;BYDAY=MO,FR"
        );
        assert!(validate_rule("FREQ=SOMETIMES").is_err());
    }
}
