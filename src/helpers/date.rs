//! Date helper functions

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// Display locale for month and weekday names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR", alias = "pt-br", alias = "pt_BR")]
    PtBr,
    #[serde(rename = "en", alias = "en-US", alias = "en_US")]
    En,
}

const PT_BR_MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];
const PT_BR_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];
const PT_BR_WEEKDAYS: [&str; 7] = [
    "Domingo",
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
];
const PT_BR_WEEKDAYS_SHORT: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EN_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const EN_WEEKDAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl Locale {
    fn month(self, month0: u32, short: bool) -> &'static str {
        let names = match (self, short) {
            (Locale::PtBr, false) => &PT_BR_MONTHS,
            (Locale::PtBr, true) => &PT_BR_MONTHS_SHORT,
            (Locale::En, false) => &EN_MONTHS,
            (Locale::En, true) => &EN_MONTHS_SHORT,
        };
        names[month0 as usize % 12]
    }

    fn weekday(self, from_sunday: u32, short: bool) -> &'static str {
        let names = match (self, short) {
            (Locale::PtBr, false) => &PT_BR_WEEKDAYS,
            (Locale::PtBr, true) => &PT_BR_WEEKDAYS_SHORT,
            (Locale::En, false) => &EN_WEEKDAYS,
            (Locale::En, true) => &EN_WEEKDAYS_SHORT,
        };
        names[from_sunday as usize % 7]
    }

    /// BCP 47 tag, used for the `lang` attribute
    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }
}

/// Moment.js tokens, longest first within each family, with their chrono
/// equivalent. `None` marks names chrono cannot print in every locale.
const TOKENS: [(&str, Option<&str>); 14] = [
    ("YYYY", Some("%Y")),
    ("YY", Some("%y")),
    ("MMMM", None),
    ("MMM", None),
    ("MM", Some("%m")),
    ("DD", Some("%d")),
    ("D", Some("%-d")),
    ("HH", Some("%H")),
    ("hh", Some("%I")),
    ("mm", Some("%M")),
    ("ss", Some("%S")),
    ("dddd", None),
    ("ddd", None),
    ("ZZ", Some("%z")),
];

/// Format a date using a Moment.js-compatible pattern in the given locale
///
/// Text inside `[...]` is copied as is.
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", Locale::PtBr) // -> "19 Mai 2023"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, pattern: &str, locale: Locale) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(date, pattern, locale);
    date.format(&chrono_format).to_string()
}

/// Translate a Moment.js pattern into a chrono format string
///
/// Month and weekday names are resolved here and embedded as literals.
fn moment_to_chrono_format<Tz: TimeZone>(
    date: &DateTime<Tz>,
    pattern: &str,
    locale: Locale,
) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        if let Some((literal, tail)) = rest
            .strip_prefix('[')
            .and_then(|inner| inner.split_once(']'))
        {
            push_literal(&mut out, literal);
            rest = tail;
            continue;
        }

        for (token, spec) in TOKENS {
            let Some(tail) = rest.strip_prefix(token) else {
                continue;
            };
            match spec {
                Some(spec) => out.push_str(spec),
                None => {
                    let weekday = date.weekday().num_days_from_sunday();
                    let name = match token {
                        "MMMM" => locale.month(date.month0(), false),
                        "MMM" => locale.month(date.month0(), true),
                        "dddd" => locale.weekday(weekday, false),
                        _ => locale.weekday(weekday, true),
                    };
                    push_literal(&mut out, name);
                }
            }
            rest = tail;
            continue 'scan;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            push_literal(&mut out, c.encode_utf8(&mut [0; 4]));
        }
        rest = chars.as_str();
    }

    out
}

fn push_literal(out: &mut String, text: &str) {
    out.push_str(&text.replace('%', "%%"));
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Parse a content API timestamp
///
/// Accepts RFC 3339 as well as the `2023-05-19T00:00:00+0000` form the
/// Prismic API emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Format an optional publication date, falling back to a label when absent
pub fn format_publication_date(
    date: Option<&DateTime<FixedOffset>>,
    pattern: &str,
    locale: Locale,
    fallback: &str,
) -> String {
    match date {
        Some(date) => format_date(date, pattern, locale),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date_pt_br() {
        let date = Utc.with_ymd_and_hms(2023, 5, 19, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "DD MMM YYYY", Locale::PtBr), "19 Mai 2023");
        assert_eq!(
            format_date(&date, "dddd, D [de] MMMM", Locale::PtBr),
            "Sexta-feira, 19 de Maio"
        );
    }

    #[test]
    fn test_format_date_literals() {
        let date = Utc.with_ymd_and_hms(2023, 5, 9, 7, 5, 0).unwrap();
        // Bracketed text is not tokenized
        assert_eq!(
            format_date(&date, "[Day] D [of] MMMM", Locale::En),
            "Day 9 of May"
        );
        assert_eq!(format_date(&date, "DD% [MM]", Locale::En), "09% MM");
        assert_eq!(format_date(&date, "hh:mm [YYYY", Locale::En), "07:05 [2023");
        assert_eq!(format_date(&date, "ddd YY ZZ", Locale::PtBr), "Ter 23 +0000");
    }

    #[test]
    fn test_format_date_en() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD", Locale::En), "2024-01-05");
        assert_eq!(format_date(&date, "DD MMM YYYY", Locale::En), "05 Jan 2024");
        assert_eq!(format_date(&date, "HH:mm:ss", Locale::En), "10:30:00");
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let rfc = parse_timestamp("2023-05-19T00:00:00Z").unwrap();
        let prismic = parse_timestamp("2023-05-19T00:00:00+0000").unwrap();
        assert_eq!(rfc, prismic);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_publication_date_fallback() {
        assert_eq!(
            format_publication_date(None, "DD MMM YYYY", Locale::PtBr, "Não publicado"),
            "Não publicado"
        );
        let date = parse_timestamp("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(
            format_publication_date(Some(&date), "DD MMM YYYY", Locale::PtBr, "-"),
            "25 Mar 2021"
        );
    }

    #[test]
    fn test_date_xml() {
        let date = parse_timestamp("2023-05-19T08:15:00-03:00").unwrap();
        assert_eq!(date_xml(&date), "2023-05-19T08:15:00-03:00");
    }
}
