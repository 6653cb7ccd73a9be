use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::FormatError;

pub const DEFAULT_LOCALE: &str = "en-US";

/// Short-month / numeric-day / numeric-year layout of one locale.
///
/// The month names approximate the CLDR abbreviated months for each locale.
/// They are written by hand, not generated from CLDR data, and can drift
/// from what a browser renders.
struct LocaleFormat {
    tag: &'static str,
    months: [&'static str; 12],
    render: fn(month: &str, day: u32, year: i32) -> String,
}

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static LOCALES: &[LocaleFormat] = &[
    LocaleFormat {
        tag: "en-US",
        months: EN_MONTHS,
        render: |m, d, y| format!("{m} {d}, {y}"),
    },
    LocaleFormat {
        tag: "en-GB",
        months: [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
        ],
        render: |m, d, y| format!("{d} {m} {y}"),
    },
    LocaleFormat {
        tag: "de-DE",
        months: [
            "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
            "Dez.",
        ],
        render: |m, d, y| format!("{d}. {m} {y}"),
    },
    LocaleFormat {
        tag: "fr-FR",
        months: [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ],
        render: |m, d, y| format!("{d} {m} {y}"),
    },
    LocaleFormat {
        tag: "es-ES",
        months: [
            "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
        ],
        render: |m, d, y| format!("{d} {m} {y}"),
    },
];

/// Render a date as short month, numeric day, numeric year for `locale`.
///
/// Accepts a calendar date (`2023-09-15`) or an RFC 3339 timestamp, which is
/// read in UTC. Unknown locales fall back to `en-US`; tags match
/// case-insensitively and `_` is accepted in place of `-`.
pub fn format_date_to_local(date: &str, locale: &str) -> Result<String, FormatError> {
    let date = parse_date(date)?;
    let format = lookup(locale);
    let month = format.months[date.month0() as usize];
    Ok((format.render)(month, date.day(), date.year()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| FormatError::InvalidDate(raw.to_string()))
}

fn lookup(locale: &str) -> &'static LocaleFormat {
    let wanted = locale.replace('_', "-");
    LOCALES
        .iter()
        .find(|l| l.tag.eq_ignore_ascii_case(&wanted))
        .unwrap_or(&LOCALES[0])
}
