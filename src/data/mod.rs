//! Day records and how they are obtained.
//!
//! A wallpaper is drawn from an ordered run of [`DayRecord`]s covering one
//! Ramadan window. Records come either from the AlAdhan calendar API
//! ([`aladhan`], shaped by [`normalize`]) or from the deterministic
//! [`fallback`] generator when the source is unreachable. [`acquire`] hides
//! that choice from callers and only reports it through
//! [`Acquisition::fallback`].

pub mod aladhan;
pub mod fallback;
pub mod locations;
pub mod normalize;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub use aladhan::{AladhanClient, SourceConfig};
pub use fallback::FallbackParams;
pub use locations::ResolvedLocation;

/// Month labels indexed by 0-based Gregorian month.
pub const MONTH_LABELS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.นา", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

/// Weekday labels, index 0 = Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["อา", "จ", "อ", "พ", "พฤ", "ศ", "ส"];

/// One calendar day inside the active window.
///
/// Field names serialise in camelCase so the JSON matches what the web
/// front-end consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// 1-based position inside the window
    pub ramadan_day: u32,
    /// Gregorian day of month
    pub date: u32,
    pub month: String,
    /// 0-based Gregorian month
    pub month_index: u32,
    pub year: i32,
    pub day_of_week: String,
    /// 0-based, 0 = first label of the week (Sunday)
    pub day_of_week_index: u32,
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suhoor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iftar: Option<String>,
}

impl DayRecord {
    /// Suhoor time, falling back to Fajr when the record carries none.
    pub fn suhoor_time(&self) -> &str {
        self.suhoor.as_deref().unwrap_or(&self.fajr)
    }

    /// Iftar time, falling back to Maghrib when the record carries none.
    pub fn iftar_time(&self) -> &str {
        self.iftar.as_deref().unwrap_or(&self.maghrib)
    }
}

/// The six prayer markers of one day, already reduced to `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTimes {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

/// Build a record for `date` with the given sequence number and weekday.
///
/// `weekday` is taken from the caller rather than the date: the fallback
/// generator pins its own weekday sequence.
pub(crate) fn day_record(ramadan_day: u32, date: NaiveDate, weekday: u32, times: DayTimes) -> DayRecord {
    let month_index = date.month0();
    let weekday = weekday % 7;
    DayRecord {
        ramadan_day,
        date: date.day(),
        month: MONTH_LABELS[month_index as usize].to_string(),
        month_index,
        year: date.year(),
        day_of_week: WEEKDAY_LABELS[weekday as usize].to_string(),
        day_of_week_index: weekday,
        suhoor: Some(times.fajr.clone()),
        iftar: Some(times.maghrib.clone()),
        fajr: times.fajr,
        sunrise: times.sunrise,
        dhuhr: times.dhuhr,
        asr: times.asr,
        maghrib: times.maghrib,
        isha: times.isha,
    }
}

/// Format minutes since midnight as zero-padded 24-hour `HH:MM`.
pub fn format_minutes(minutes: i32) -> String {
    let m = minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Inclusive Gregorian date range a wallpaper covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamadanWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for RamadanWindow {
    /// Ramadan 1447H as observed in Thailand: 19 Feb – 20 Mar 2026.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2026, 2, 19).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date"),
        }
    }
}

impl RamadanWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the window (inclusive).
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// The `(year, month)` pairs the window touches, in order. Month is 1-based.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let (mut y, mut m) = (self.start.year(), self.start.month());
        let last = (self.end.year(), self.end.month());
        loop {
            out.push((y, m));
            if (y, m) == last {
                break;
            }
            if m == 12 {
                y += 1;
                m = 1;
            } else {
                m += 1;
            }
        }
        out
    }
}

/// Day records together with where they came from.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub location: ResolvedLocation,
    pub days: Vec<DayRecord>,
    /// True when the source failed and the fallback generator was used
    pub fallback: bool,
    /// Human-readable reason for the fallback, if any
    pub notice: Option<String>,
}

/// Fetch records for `location`, substituting generated data on any source
/// failure. Never fails: rendering always receives a well-formed sequence.
pub async fn acquire(client: &AladhanClient, location: &ResolvedLocation, window: &RamadanWindow) -> Acquisition {
    match client.fetch_window(location.lat, location.lng, window).await {
        Ok(days) if !days.is_empty() => {
            log::info!(
                "Loaded {} days for {} from prayer-time source",
                days.len(),
                location.display_name()
            );
            Acquisition { location: location.clone(), days, fallback: false, notice: None }
        }
        Ok(_) => fallback_acquisition(location, window, "source returned no days inside the window".to_string()),
        Err(e) => fallback_acquisition(location, window, e.to_string()),
    }
}

/// Generated records for `location` without touching the network, starting
/// on the first day of `window`.
pub fn offline(location: &ResolvedLocation, window: &RamadanWindow) -> Acquisition {
    let params = FallbackParams::for_latitude(location.lat).starting_on(window.start);
    Acquisition {
        location: location.clone(),
        days: fallback::generate(&params),
        fallback: true,
        notice: None,
    }
}

fn fallback_acquisition(location: &ResolvedLocation, window: &RamadanWindow, reason: String) -> Acquisition {
    log::warn!(
        "Prayer-time source failed for {} ({}); using generated data",
        location.display_name(),
        reason
    );
    Acquisition { notice: Some(reason), ..offline(location, window) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_minutes_pads_both_fields() {
        assert_eq!(format_minutes(5 * 60 + 7), "05:07");
        assert_eq!(format_minutes(19 * 60 + 45), "19:45");
        assert_eq!(format_minutes(0), "00:00");
    }

    #[test]
    fn offline_days_start_with_the_window() {
        let window = RamadanWindow {
            start: NaiveDate::from_ymd_opt(2027, 2, 8).unwrap(),
            end: NaiveDate::from_ymd_opt(2027, 3, 9).unwrap(),
        };
        let acq = offline(&locations::default_location(), &window);
        assert!(acq.fallback);
        assert_eq!(acq.days.len(), 30);
        let first = &acq.days[0];
        assert_eq!((first.date, first.month_index, first.year), (8, 1, 2027));
        assert_eq!(first.day_of_week_index, window.start.weekday().num_days_from_sunday());
        let last = acq.days.last().unwrap();
        assert_eq!((last.date, last.month_index, last.year), (9, 2, 2027));

        let default = offline(&locations::default_location(), &RamadanWindow::default());
        assert_eq!((default.days[0].date, default.days[0].year), (19, 2026));
        assert_eq!(default.days[0].day_of_week_index, 4);
    }

    #[test]
    fn default_window_spans_thirty_days_over_two_months() {
        let w = RamadanWindow::default();
        assert_eq!(w.len(), 30);
        assert_eq!(w.months(), vec![(2026, 2), (2026, 3)]);
    }

    #[test]
    fn window_months_cross_year_boundary() {
        let w = RamadanWindow {
            start: NaiveDate::from_ymd_opt(2030, 12, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2031, 1, 18).unwrap(),
        };
        assert_eq!(w.months(), vec![(2030, 12), (2031, 1)]);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let w = RamadanWindow::default();
        assert!(w.contains(NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()));
        assert!(w.contains(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(2026, 3, 21).unwrap()));
    }

    #[test]
    fn suhoor_and_iftar_fall_back_to_fajr_and_maghrib() {
        let json = r#"{"ramadanDay":1,"date":19,"month":"ก.พ.","monthIndex":1,"year":2026,
            "dayOfWeek":"พฤ","dayOfWeekIndex":4,"fajr":"05:20","sunrise":"06:35",
            "dhuhr":"12:22","asr":"15:41","maghrib":"18:30","isha":"19:45"}"#;
        let d: DayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(d.suhoor_time(), "05:20");
        assert_eq!(d.iftar_time(), "18:30");
    }
}
