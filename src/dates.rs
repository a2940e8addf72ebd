//! Birth and death dates from obituary body text.
//!
//! Two house styles are supported. Guardian obituaries close with a
//! `born 11 July 1934; died 4 September 2025` line; Independent obituaries
//! carry a factfile with `born London 21 October 1933, ... died London 5 July
//! 1992`. Extraction never fails: anything that does not parse is `None`.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

use crate::subject::SourceId;
use crate::TARGET_NAME;

const GUARDIAN_WINDOW: usize = 60;
const BORN_MARKER: &str = " born ";

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

lazy_static! {
    static ref GUARDIAN_DATES: Regex = Regex::new(
        r"(?i)(?P<dob>(?:\d{1,2}\s+[A-Za-z]+|\b[A-Za-z]+\s+\d{1,2}),?\s+\d{4})\s*;\s*died\s+(?P<dod>(?:\d{1,2}\s+[A-Za-z]+|\b[A-Za-z]+\s+\d{1,2}),?\s+\d{4})"
    )
    .unwrap();
    static ref DAY_MONTH_YEAR: Regex =
        Regex::new(r"^(?P<day>\d{1,2})\s+(?P<month>[A-Za-z]+),?\s+(?P<year>\d{4})$").unwrap();
    static ref MONTH_DAY_YEAR: Regex =
        Regex::new(r"^(?P<month>[A-Za-z]+)\s+(?P<day>\d{1,2}),?\s+(?P<year>\d{4})$").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref INDEPENDENT_BORN: Regex = independent_pattern("born");
    static ref INDEPENDENT_DIED: Regex = independent_pattern("died");
}

fn independent_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\b{}\b[^;:.]*?(?:(?P<day>\d{{1,2}})\s+)?\b(?P<month>{})\s+(?P<year>\d{{4}})\b",
        keyword, MONTHS
    ))
    .unwrap()
}

/// House style of the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    Guardian,
    Independent,
}

impl DateStyle {
    /// NYTimes bodies are never fetched; they fall back to the Guardian style.
    pub fn for_source(source: SourceId) -> Self {
        match source {
            SourceId::Independent => DateStyle::Independent,
            SourceId::Guardian | SourceId::NYTimes => DateStyle::Guardian,
        }
    }

    pub fn extract(&self, text: &str) -> LifeDates {
        let dates = match self {
            DateStyle::Guardian => extract_guardian(text),
            DateStyle::Independent => extract_independent(text),
        };
        debug!(target: TARGET_NAME, "Resolved {:?} dates: {:?}", self, dates);
        dates
    }
}

/// Birth and death date of a subject; `None` when unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifeDates {
    pub birth: Option<NaiveDate>,
    pub death: Option<NaiveDate>,
}

impl LifeDates {
    /// Birth and death year when both are known.
    pub fn years(&self) -> Option<(i32, i32)> {
        Some((self.birth?.year(), self.death?.year()))
    }
}

/// `... born 11 July 1934; died 4 September 2025` at the end of the text.
pub fn extract_guardian(text: &str) -> LifeDates {
    let Some(marker) = text.rfind(BORN_MARKER) else {
        return LifeDates::default();
    };

    let window: String = text[marker + BORN_MARKER.len()..]
        .chars()
        .take(GUARDIAN_WINDOW)
        .collect();
    if !window.contains(" died ") {
        debug!(target: TARGET_NAME, "No ' died ' after last ' born ': {}", window);
        return LifeDates::default();
    }

    match GUARDIAN_DATES.captures(&window) {
        Some(captures) => LifeDates {
            birth: parse_date(&captures["dob"]),
            death: parse_date(&captures["dod"]),
        },
        None => LifeDates::default(),
    }
}

/// `born London 21 October 1933, ... died London 5 July 1992` anywhere in the text.
pub fn extract_independent(text: &str) -> LifeDates {
    if text.trim().is_empty() {
        return LifeDates::default();
    }

    let text = text.replace(['\r', '\n'], " ");
    let text = PARENTHETICAL.replace_all(&text, "");

    LifeDates {
        birth: INDEPENDENT_BORN
            .captures(&text)
            .and_then(|captures| date_from_parts(&captures)),
        death: INDEPENDENT_DIED
            .captures(&text)
            .and_then(|captures| date_from_parts(&captures)),
    }
}

fn date_from_parts(captures: &Captures) -> Option<NaiveDate> {
    let day = captures
        .name("day")
        .map_or(Some(1), |day| day.as_str().parse().ok())?;
    let month = month_number(captures.name("month")?.as_str())?;
    let year = captures.name("year")?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse `11 July 1934`, `July 11 1934` or `July 11, 1934`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let captures = DAY_MONTH_YEAR
        .captures(text)
        .or_else(|| MONTH_DAY_YEAR.captures(text))?;
    date_from_parts(&captures)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
