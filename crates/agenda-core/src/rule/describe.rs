//! Locale-specific human rendering of recurrence rules.
//!
//! The phrase table mirrors what the product surfaces verbatim, so no rule
//! ever displays as raw `FREQ=...` text.

use crate::rule::{Frequency, Rule, Weekday};

/// Supported display locales, Spanish-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

const DAY_NAMES_ES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const DAY_NAMES_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn day_name(day: Weekday, locale: Locale) -> &'static str {
    let names = match locale {
        Locale::Es => &DAY_NAMES_ES,
        Locale::En => &DAY_NAMES_EN,
    };
    names[day.days_from_monday() as usize]
}

/// Join day names with commas, the last joined with "and"/"y".
fn join_days(days: &[Weekday], locale: Locale) -> String {
    let names: Vec<&str> = days.iter().map(|d| day_name(*d, locale)).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => {
            let conjunction = match locale {
                Locale::Es => "y",
                Locale::En => "and",
            };
            format!("{} {conjunction} {last}", init.join(", "))
        }
    }
}

impl Rule {
    /// Render the rule as a human phrase in the given locale.
    #[must_use]
    pub fn describe(&self, locale: Locale) -> String {
        let es = matches!(locale, Locale::Es);
        match self.frequency {
            Frequency::Daily => {
                if self.interval > 1 {
                    if es {
                        format!("Cada {} días", self.interval)
                    } else {
                        format!("Every {} days", self.interval)
                    }
                } else if es {
                    "Todos los días".to_string()
                } else {
                    "Every day".to_string()
                }
            }
            Frequency::Weekly => {
                if !self.by_day.is_empty() {
                    let days = join_days(&self.by_day, locale);
                    if es {
                        format!("Cada {days}")
                    } else {
                        format!("Every {days}")
                    }
                } else if self.interval > 1 {
                    if es {
                        format!("Cada {} semanas", self.interval)
                    } else {
                        format!("Every {} weeks", self.interval)
                    }
                } else if es {
                    "Cada semana".to_string()
                } else {
                    "Every week".to_string()
                }
            }
            Frequency::Monthly => {
                if let Some(day) = self.by_month_day {
                    if es {
                        format!("El día {day} de cada mes")
                    } else {
                        format!("On day {day} of each month")
                    }
                } else if self.interval > 1 {
                    if es {
                        format!("Cada {} meses", self.interval)
                    } else {
                        format!("Every {} months", self.interval)
                    }
                } else if es {
                    "Cada mes".to_string()
                } else {
                    "Every month".to_string()
                }
            }
            // The yearly phrase has no interval variant; the product
            // renders every yearly rule the same way.
            Frequency::Yearly => {
                if es {
                    "Cada año".to_string()
                } else {
                    "Every year".to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(text: &str) -> Rule {
        Rule::parse(text).expect("valid rule")
    }

    #[test]
    fn daily_phrases() {
        assert_eq!(rule("FREQ=DAILY").describe(Locale::En), "Every day");
        assert_eq!(rule("FREQ=DAILY").describe(Locale::Es), "Todos los días");
        assert_eq!(
            rule("FREQ=DAILY;INTERVAL=3").describe(Locale::En),
            "Every 3 days"
        );
        assert_eq!(
            rule("FREQ=DAILY;INTERVAL=3").describe(Locale::Es),
            "Cada 3 días"
        );
    }

    #[test]
    fn weekly_phrases() {
        assert_eq!(rule("FREQ=WEEKLY").describe(Locale::En), "Every week");
        assert_eq!(
            rule("FREQ=WEEKLY;INTERVAL=2").describe(Locale::En),
            "Every 2 weeks"
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO").describe(Locale::En),
            "Every Monday"
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO").describe(Locale::Es),
            "Cada lunes"
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO,WE,FR").describe(Locale::En),
            "Every Monday, Wednesday and Friday"
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO,WE,FR").describe(Locale::Es),
            "Cada lunes, miércoles y viernes"
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=SA,SU").describe(Locale::En),
            "Every Saturday and Sunday"
        );
    }

    #[test]
    fn monthly_phrases() {
        assert_eq!(rule("FREQ=MONTHLY").describe(Locale::Es), "Cada mes");
        assert_eq!(
            rule("FREQ=MONTHLY;BYMONTHDAY=15").describe(Locale::En),
            "On day 15 of each month"
        );
        assert_eq!(
            rule("FREQ=MONTHLY;BYMONTHDAY=15").describe(Locale::Es),
            "El día 15 de cada mes"
        );
        assert_eq!(
            rule("FREQ=MONTHLY;INTERVAL=2").describe(Locale::En),
            "Every 2 months"
        );
    }

    #[test]
    fn yearly_phrase_ignores_interval() {
        assert_eq!(rule("FREQ=YEARLY").describe(Locale::En), "Every year");
        assert_eq!(rule("FREQ=YEARLY").describe(Locale::Es), "Cada año");
        assert_eq!(
            rule("FREQ=YEARLY;INTERVAL=2").describe(Locale::En),
            "Every year"
        );
        assert_eq!(
            rule("FREQ=YEARLY;INTERVAL=2").describe(Locale::Es),
            "Cada año"
        );
    }
}
