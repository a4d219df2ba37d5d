//! Turn raw AlAdhan monthly calendars into [`DayRecord`]s.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::{day_record, DayRecord, DayTimes, RamadanWindow};
use crate::{Error, Result};

/// One `/calendar/{year}/{month}` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyPayload {
    pub code: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<RawDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDay {
    pub timings: RawTimings,
    pub date: RawDate,
}

/// Timing strings as sent by the source, e.g. `"05:12 (+07)"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTimings {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDate {
    pub gregorian: RawGregorian,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGregorian {
    /// `DD-MM-YYYY`
    pub date: String,
}

/// Parse a `DD-MM-YYYY` date.
pub fn parse_gregorian(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y")
        .map_err(|e| Error::DataFormatError(format!("bad gregorian date {:?}: {}", s, e)))
}

/// Keep only the leading `HH:MM` of a timing string.
pub fn strip_timezone(t: &str) -> &str {
    t.split_whitespace().next().unwrap_or("")
}

/// Merge the payloads, keep the dates inside `window` and number them from 1
/// in date order. Payload order does not matter; a date present in more than
/// one payload is kept once.
pub fn normalize(payloads: &[MonthlyPayload], window: &RamadanWindow) -> Result<Vec<DayRecord>> {
    let mut dated = Vec::new();
    for payload in payloads {
        if payload.code != 200 {
            return Err(Error::SourceStatus { code: payload.code, status: payload.status.clone() });
        }
        for raw in &payload.data {
            let date = parse_gregorian(&raw.date.gregorian.date)?;
            if window.contains(date) {
                dated.push((date, raw));
            }
        }
    }
    dated.sort_by_key(|(date, _)| *date);
    dated.dedup_by_key(|(date, _)| *date);

    dated
        .into_iter()
        .enumerate()
        .map(|(i, (date, raw))| {
            let t = &raw.timings;
            let times = DayTimes {
                fajr: clean_time(&t.fajr, "Fajr", date)?,
                sunrise: clean_time(&t.sunrise, "Sunrise", date)?,
                dhuhr: clean_time(&t.dhuhr, "Dhuhr", date)?,
                asr: clean_time(&t.asr, "Asr", date)?,
                maghrib: clean_time(&t.maghrib, "Maghrib", date)?,
                isha: clean_time(&t.isha, "Isha", date)?,
            };
            let weekday = date.weekday().num_days_from_sunday();
            Ok(day_record(i as u32 + 1, date, weekday, times))
        })
        .collect()
}

fn clean_time(raw: &str, name: &str, date: NaiveDate) -> Result<String> {
    let t = strip_timezone(raw);
    if t.is_empty() {
        return Err(Error::DataFormatError(format!("empty {} time on {}", name, date)));
    }
    Ok(t.to_string())
}
