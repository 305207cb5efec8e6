//! # Constants and type definitions for Almagest
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Epochs and mean rates used by the time and Earth-orientation modules
//! - Core type aliases used across the crate
//!
//! The values tagged *exact* below are shared with other ephemeris engines and must not be
//! rounded: positions computed from them are compared bit-for-bit in regression tests.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (exact)
pub const AU: f64 = 149_597_870.699_626_2;

/// Astronomical Unit in meters
pub const AU_METERS: f64 = AU * 1000.0;

/// One parsec expressed in astronomical units (648000/π)
pub const PARSEC_AU: f64 = 648_000.0 / std::f64::consts::PI;

/// One light-year expressed in kilometers (Julian year of 365.25 days)
pub const LIGHT_YEAR_KM: f64 = SPEED_OF_LIGHT * SECONDS_PER_DAY * DAYS_PER_JULIAN_YEAR;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00:00 TT, exact)
pub const J2000: f64 = 2_451_545.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Mean obliquity of the ecliptic at J2000.0 in degrees (exact)
pub const EPS_0_DEG: f64 = 23.439_280_305_555_555_6;

/// Mean obliquity of the ecliptic at J2000.0 in radians
pub const EPS_0: f64 = EPS_0_DEG * RADEG;

/// Speed of light in km/s (exact)
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = SPEED_OF_LIGHT / AU * SECONDS_PER_DAY;

/// Gaussian gravitational constant k (used in classical orbit dynamics)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// k², often used in Kepler’s third law
pub const GAUSS_GRAV_SQUARED: f64 = GAUSS_GRAV * GAUSS_GRAV;

/// Earth equatorial radius in kilometers (IERS 2003)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.1366;

/// Earth flattening used by the eclipse geometry
pub const EARTH_FLATTENING: f64 = 1.0 / 298.256_42;

/// Sun equatorial radius in kilometers
pub const SUN_RADIUS_KM: f64 = 696_000.0;

/// Moon mean radius in kilometers
pub const MOON_RADIUS_KM: f64 = 1_737.4;

/// Ratio of the Earth mass to the Moon mass
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_57;

/// Length of the mean sidereal day in mean solar days
pub const SIDEREAL_DAY: f64 = 0.997_269_566_3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Ephemeris Day (TT scale, days)
pub type JDE = f64;

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_light_speed_in_au_per_day() {
        assert!((VLIGHT_AU - 173.144_632_674).abs() < 1e-6);
    }

    #[test]
    fn test_obliquity_radians() {
        assert!((EPS_0 - 0.409_092_804_222_329).abs() < 1e-12);
    }
}
