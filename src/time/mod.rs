//! # Time scales and calendar arithmetic
//!
//! The engine counts time in **Julian Days**. A [`JulianDay`] is a plain continuous day count;
//! whether it is read on the UT1 or the TT scale depends on the caller (the observer keeps both,
//! `jd` in UT and `jde = jd + ΔT` in TT).
//!
//! ## Calendar
//!
//! Conversions follow the classical Meeus algorithm with the Julian → Gregorian switch on
//! **1582-10-15**: earlier dates are read in the (proleptic) Julian calendar, later ones in the
//! Gregorian calendar. Negative years use astronomical numbering (year 0 = 1 BC).
//!
//! ## Modules
//!
//! * [`delta_t`] – selectable ΔT (TT − UT) models.
//! * [`sidereal`] – mean and apparent Greenwich sidereal time.
//!
//! Civil instants enter through [`hifitime::Epoch`] via [`JulianDay::from_epoch`].

pub mod delta_t;
pub mod sidereal;

use std::fmt;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000, SECONDS_PER_DAY, SIDEREAL_DAY};

/// Julian Day of the first Gregorian date, 1582-10-15 00:00.
const GREGORIAN_CUTOVER_JD: f64 = 2_299_160.5;

/// Mean lengths of the recurring periods used in calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Second,
    Minute,
    Hour,
    SolarDay,
    SiderealDay,
    Week,
    SynodicMonth,
    SiderealMonth,
    TropicalMonth,
    AnomalisticMonth,
    DraconicMonth,
    JulianYear,
    TropicalYear,
    SiderealYear,
    Saros,
    MetonicCycle,
    JulianCentury,
}

impl Period {
    /// Length of the period in mean solar days.
    pub fn days(self) -> f64 {
        match self {
            Period::Second => 1.0 / SECONDS_PER_DAY,
            Period::Minute => 1.0 / 1440.0,
            Period::Hour => 1.0 / 24.0,
            Period::SolarDay => 1.0,
            Period::SiderealDay => SIDEREAL_DAY,
            Period::Week => 7.0,
            Period::SynodicMonth => 29.530_588_853,
            Period::SiderealMonth => 27.321_661_547,
            Period::TropicalMonth => 27.321_582_241,
            Period::AnomalisticMonth => 27.554_549_878,
            Period::DraconicMonth => 27.212_220_817,
            Period::JulianYear => 365.25,
            Period::TropicalYear => 365.242_190_4,
            Period::SiderealYear => 365.256_363_004,
            // 223 synodic months
            Period::Saros => 6_585.321_314,
            // 235 synodic months
            Period::MetonicCycle => 6_939.688_388,
            Period::JulianCentury => DAYS_PER_JULIAN_CENTURY,
        }
    }
}

/// A broken-down calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl CalendarDate {
    /// Day of month including the fraction of day.
    pub fn fractional_day(&self) -> f64 {
        self.day as f64
            + (self.hour as f64 + (self.minute as f64 + self.second / 60.0) / 60.0) / 24.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A continuous count of days since −4712-01-01 12:00 (Julian calendar).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDay(f64);

impl JulianDay {
    pub const J2000: JulianDay = JulianDay(J2000);

    pub const fn new(value: f64) -> Self {
        JulianDay(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Build a Julian Day from a calendar date and time of day.
    ///
    /// Dates before 1582-10-15 are interpreted in the Julian calendar; negative years are
    /// astronomical (year 0 exists).
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::InvalidCalendarDate`] when a field is out of range.
    pub fn from_calendar(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
    ) -> Result<Self, AlmagestError> {
        if !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
            || hour > 23
            || minute > 59
            || !(0.0..61.0).contains(&second)
        {
            return Err(AlmagestError::InvalidCalendarDate(format!(
                "{year}-{month}-{day} {hour}:{minute}:{second}"
            )));
        }
        let fraction = (hour as f64 + (minute as f64 + second / 60.0) / 60.0) / 24.0;
        Ok(JulianDay(julian_day_number(year, month, day as f64 + fraction)))
    }

    /// Decode into a calendar date (Julian calendar before the 1582 cutover).
    pub fn to_calendar(self) -> CalendarDate {
        let jd = self.0 + 0.5;
        let z = jd.floor();
        let f = jd - z;

        let a = if z < 2_299_161.0 {
            z
        } else {
            let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
            z + 1.0 + alpha - (alpha / 4.0).floor()
        };
        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = (b - d - (30.6001 * e).floor()) as u8;
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 } as u8;
        let year = if month > 2 { c - 4716.0 } else { c - 4715.0 } as i32;

        let seconds_of_day = f * SECONDS_PER_DAY;
        let hour = (seconds_of_day / 3600.0).floor().min(23.0);
        let minute = ((seconds_of_day - hour * 3600.0) / 60.0).floor().min(59.0);
        let second = seconds_of_day - hour * 3600.0 - minute * 60.0;

        CalendarDate {
            year,
            month,
            day,
            hour: hour as u8,
            minute: minute as u8,
            second,
        }
    }

    /// Convert a [`hifitime::Epoch`] to a UTC Julian Day.
    pub fn from_epoch(epoch: &Epoch) -> Self {
        JulianDay(epoch.to_jde_utc_days())
    }

    /// Interpret this Julian Day as UTC and build a [`hifitime::Epoch`].
    pub fn to_epoch(self) -> Epoch {
        Epoch::from_jde_utc(self.0)
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn julian_centuries(self) -> f64 {
        (self.0 - J2000) / DAYS_PER_JULIAN_CENTURY
    }

    /// Calendar year with the elapsed fraction of that year.
    pub fn decimal_year(self) -> f64 {
        let date = self.to_calendar();
        let start = julian_day_number(date.year, 1, 1.0);
        let end = julian_day_number(date.year + 1, 1, 1.0);
        date.year as f64 + (self.0 - start) / (end - start)
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(self) -> u8 {
        (self.0 + 1.5).floor().rem_euclid(7.0) as u8
    }

    /// Shift by `amount` periods of the given kind.
    pub fn add(self, amount: f64, period: Period) -> Self {
        JulianDay(self.0 + amount * period.days())
    }

    /// Shift by whole calendar months, keeping the time of day and clamping the day of month to
    /// the length of the target month.
    pub fn add_months(self, months: i32) -> Self {
        let date = self.to_calendar();
        let total = date.year * 12 + (date.month as i32 - 1) + months;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u8;
        let day = date.day.min(days_in_month(year, month));
        let fraction = date.fractional_day() - date.day as f64;
        JulianDay(julian_day_number(year, month, day as f64 + fraction))
    }

    /// Shift by whole calendar years (29 February clamps to 28 February).
    pub fn add_years(self, years: i32) -> Self {
        self.add_months(years * 12)
    }

    /// Days elapsed from `other` to `self`.
    pub fn days_since(self, other: JulianDay) -> f64 {
        self.0 - other.0
    }

    /// Shift by a fraction of days.
    pub fn plus_days(self, days: f64) -> Self {
        JulianDay(self.0 + days)
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

/// Meeus' calendar → Julian Day algorithm with the 1582 switchover.
fn julian_day_number(year: i32, month: u8, day: f64) -> f64 {
    let gregorian = (year, month, day.floor() as i64) >= (1582, 10, 15);
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let b = if gregorian {
        let a = (y / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

fn is_leap_year(year: i32) -> bool {
    if year > 1582 {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    } else {
        year.rem_euclid(4) == 0
    }
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Check that a Julian Day lies on or after the Gregorian reform.
pub fn is_gregorian(jd: JulianDay) -> bool {
    jd.value() >= GREGORIAN_CUTOVER_JD
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::TimeScale;

    #[test]
    fn test_j2000_from_calendar() {
        let jd = JulianDay::from_calendar(2000, 1, 1, 12, 0, 0.0).unwrap();
        assert_eq!(jd, JulianDay::J2000);
    }

    #[test]
    fn test_meeus_reference_dates() {
        let cases = [
            (1957, 10, 4.81, 2_436_116.31),
            (333, 1, 27.5, 1_842_713.0),
            (1987, 6, 19.5, 2_446_966.0),
            (1600, 1, 1.0, 2_305_447.5),
            (837, 4, 10.3, 2_026_871.8),
            (-1000, 7, 12.5, 1_356_001.0),
            (-1001, 8, 17.9, 1_355_671.4),
            (-4712, 1, 1.5, 0.0),
        ];
        for (year, month, day, expected) in cases {
            assert_relative_eq!(julian_day_number(year, month, day), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gregorian_cutover() {
        let last_julian = JulianDay::from_calendar(1582, 10, 4, 0, 0, 0.0).unwrap();
        let first_gregorian = JulianDay::from_calendar(1582, 10, 15, 0, 0, 0.0).unwrap();
        assert_eq!(first_gregorian.value() - last_julian.value(), 1.0);
        assert!(is_gregorian(first_gregorian));
        assert!(!is_gregorian(last_julian));
    }

    #[test]
    fn test_calendar_round_trip() {
        for jd in [0.0, 1_355_671.4, 2_299_159.5, 2_299_160.5, 2_451_545.0, 2_459_251.0] {
            let date = JulianDay::new(jd).to_calendar();
            let back = JulianDay::from_calendar(
                date.year,
                date.month,
                date.day,
                date.hour,
                date.minute,
                date.second,
            )
            .unwrap();
            assert_relative_eq!(back.value(), jd, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_negative_year_decoding() {
        let date = JulianDay::new(1_356_001.0).to_calendar();
        assert_eq!((date.year, date.month, date.day, date.hour), (-1000, 7, 12, 12));
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert!(JulianDay::from_calendar(2020, 13, 1, 0, 0, 0.0).is_err());
        assert!(JulianDay::from_calendar(2020, 1, 1, 24, 0, 0.0).is_err());
    }

    #[test]
    fn test_epoch_interop() {
        let epoch = Epoch::from_gregorian(2021, 2, 5, 12, 0, 0, 0, TimeScale::UTC);
        let jd = JulianDay::from_epoch(&epoch);
        assert_relative_eq!(jd.value(), 2_459_251.0, epsilon = 1e-8);
        assert_relative_eq!(
            JulianDay::from_epoch(&jd.to_epoch()).value(),
            2_459_251.0,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_period_arithmetic() {
        let jd = JulianDay::J2000;
        assert_relative_eq!(jd.add(1.0, Period::Saros).days_since(jd), 6_585.321_314, epsilon = 1e-9);
        assert_relative_eq!(
            jd.add(2.0, Period::SiderealDay).days_since(jd),
            2.0 * SIDEREAL_DAY,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            jd.add(12.0, Period::SynodicMonth).days_since(jd),
            354.367_066_236,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_add_months_clamps_day() {
        let jan31 = JulianDay::from_calendar(2021, 1, 31, 6, 0, 0.0).unwrap();
        let date = jan31.add_months(1).to_calendar();
        assert_eq!((date.year, date.month, date.day, date.hour), (2021, 2, 28, 6));
        let date = jan31.add_months(-2).to_calendar();
        assert_eq!((date.year, date.month, date.day), (2020, 11, 30));
        let leap = JulianDay::from_calendar(2020, 2, 29, 0, 0, 0.0).unwrap();
        assert_eq!(leap.add_years(1).to_calendar().day, 28);
    }

    #[test]
    fn test_day_of_week_and_decimal_year() {
        // 2000-01-01 was a Saturday
        assert_eq!(JulianDay::J2000.day_of_week(), 6);
        let mid = JulianDay::from_calendar(2021, 7, 2, 12, 0, 0.0).unwrap();
        assert_relative_eq!(mid.decimal_year(), 2021.5, epsilon = 1e-3);
        assert_relative_eq!(JulianDay::J2000.julian_centuries(), 0.0);
    }
}
