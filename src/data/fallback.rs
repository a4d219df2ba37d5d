//! Deterministic 30-day schedule used when the prayer-time source is down.
//!
//! The drift terms below (`i * 0.33` minutes earlier Fajr per day, `i * 0.034`
//! for Maghrib, `i * 0.2` for sunrise) are an empirical approximation of
//! seasonal drift around 7°N in February–March. They are kept as-is; they are
//! not derived from solar position.

use chrono::{Datelike, Days, NaiveDate};

use super::{day_record, format_minutes, DayRecord, DayTimes};

/// Number of records the generator produces.
pub const FALLBACK_DAYS: u32 = 30;

/// Latitude the base times are authored for.
pub const REFERENCE_LATITUDE: f64 = 7.0;

const BASE_FAJR: i32 = 5 * 60 + 20;
const BASE_MAGHRIB: i32 = 18 * 60 + 30;
const BASE_SUNRISE: i32 = 6 * 60 + 35;
const DHUHR: i32 = 12 * 60 + 22;
const ASR: i32 = 15 * 60 + 41;
const ISHA: i32 = 19 * 60 + 45;

/// Inputs of the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackParams {
    /// Fajr on day 1, minutes after midnight
    pub base_fajr_minutes: i32,
    /// Maghrib on day 1, minutes after midnight
    pub base_maghrib_minutes: i32,
    /// Weekday index of day 1 (0 = Sunday)
    pub start_weekday: u32,
    pub start_date: NaiveDate,
}

impl Default for FallbackParams {
    fn default() -> Self {
        Self {
            base_fajr_minutes: BASE_FAJR,
            base_maghrib_minutes: BASE_MAGHRIB,
            // 19 Feb 2026 is a Thursday
            start_weekday: 4,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 19).expect("valid date"),
        }
    }
}

impl FallbackParams {
    /// Shift the base times linearly with distance from [`REFERENCE_LATITUDE`].
    ///
    /// Fajr moves 1.2 minutes per degree, Maghrib half that in the opposite
    /// direction; results are rounded to whole minutes. This is a rough
    /// approximation, not an astronomical computation.
    pub fn for_latitude(lat: f64) -> Self {
        let adj = (REFERENCE_LATITUDE - lat) * 1.2;
        Self {
            base_fajr_minutes: (BASE_FAJR as f64 + adj).round() as i32,
            base_maghrib_minutes: (BASE_MAGHRIB as f64 - adj * 0.5).round() as i32,
            ..Self::default()
        }
    }

    /// Start the schedule on `date`, taking the weekday from the calendar.
    pub fn starting_on(self, date: NaiveDate) -> Self {
        Self { start_date: date, start_weekday: date.weekday().num_days_from_sunday(), ..self }
    }
}

/// Produce [`FALLBACK_DAYS`] records from `params` alone. No clock, no I/O:
/// identical inputs always give identical output.
pub fn generate(params: &FallbackParams) -> Vec<DayRecord> {
    (0..FALLBACK_DAYS)
        .map(|i| {
            let date = params
                .start_date
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(params.start_date);
            let step = i as i32;
            // floor(i * 0.33), floor(i * 0.034), floor(i * 0.2) in integer form
            let fajr = params.base_fajr_minutes - step * 33 / 100;
            let maghrib = params.base_maghrib_minutes - step * 34 / 1000;
            let sunrise = BASE_SUNRISE - step / 5;
            let times = DayTimes {
                fajr: format_minutes(fajr),
                sunrise: format_minutes(sunrise),
                dhuhr: format_minutes(DHUHR),
                asr: format_minutes(ASR),
                maghrib: format_minutes(maghrib),
                isha: format_minutes(ISHA),
            };
            day_record(i + 1, date, params.start_weekday + i, times)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_and_weekdays_follow_the_start() {
        let days = generate(&FallbackParams::default());
        assert_eq!(days.len(), 30);
        for (i, d) in days.iter().enumerate() {
            assert_eq!(d.ramadan_day, i as u32 + 1);
            assert_eq!(d.day_of_week_index, (4 + i as u32) % 7);
        }
    }

    #[test]
    fn dates_roll_over_into_march() {
        let days = generate(&FallbackParams::default());
        assert_eq!((days[0].date, days[0].month_index, days[0].year), (19, 1, 2026));
        assert_eq!(days[0].month, "ก.พ.");
        // Feb 2026 has 28 days: day 11 is 1 March
        assert_eq!((days[10].date, days[10].month_index), (1, 2));
        assert_eq!(days[10].month, "มี.นา");
        assert_eq!((days[29].date, days[29].month_index), (20, 2));
    }

    #[test]
    fn times_drift_per_formula() {
        let days = generate(&FallbackParams::default());
        assert_eq!(days[0].fajr, "05:20");
        assert_eq!(days[0].maghrib, "18:30");
        assert_eq!(days[0].sunrise, "06:35");
        // floor(29 * 0.33) = 9, floor(29 * 0.2) = 5
        assert_eq!(days[29].fajr, "05:11");
        assert_eq!(days[29].sunrise, "06:30");
        assert_eq!(days[29].maghrib, "18:30");
        assert!(days.iter().all(|d| d.dhuhr == "12:22" && d.asr == "15:41" && d.isha == "19:45"));
        assert!(days.iter().all(|d| d.suhoor_time() == d.fajr && d.iftar_time() == d.maghrib));
    }

    #[test]
    fn generation_is_deterministic() {
        let p = FallbackParams::for_latitude(6.5413);
        let a = serde_json::to_vec(&generate(&p)).unwrap();
        let b = serde_json::to_vec(&generate(&p)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn latitude_shifts_base_times() {
        assert_eq!(FallbackParams::for_latitude(7.0), FallbackParams::default());
        // Bangkok, ~6.76 degrees north of the reference
        let p = FallbackParams::for_latitude(13.7563);
        assert_eq!(p.base_fajr_minutes, 320 - 8);
        assert_eq!(p.base_maghrib_minutes, 1110 + 4);
    }
}
