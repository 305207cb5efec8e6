//! Greenwich sidereal time.
//!
//! The mean sidereal time follows the IAU 1982 expression in its Meeus form (eq. 12.4): the
//! rotation term uses the UT Julian day while the slow polynomial uses Julian centuries TT.
//! Apparent sidereal time adds the equation of the equinoxes.

use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000, JDE};
use crate::earth_orientation::equation_of_equinoxes;
use crate::units::Angle;

/// Greenwich mean sidereal time, normalised to `[0°, 360°)`.
///
/// Arguments
/// ---------
/// * `jd`: Julian day in UT.
/// * `jde`: the same instant as a Julian ephemeris day (TT).
pub fn mean_sidereal_time(jd: f64, jde: JDE) -> Angle {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let degrees = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    Angle::from_degrees(degrees).normalized()
}

/// Greenwich apparent sidereal time: mean sidereal time plus `Δψ·cos(ε_A + Δε)`.
pub fn apparent_sidereal_time(jd: f64, jde: JDE) -> Angle {
    (mean_sidereal_time(jd, jde) + Angle::from_radians(equation_of_equinoxes(jde))).normalized()
}
