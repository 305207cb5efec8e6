//! # Angle and distance value types
//!
//! Immutable scalars with unit-converting views. Angles are stored in **radians** and distances in
//! **astronomical units**; degrees, hours and kilometres only appear at the API edges.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, Kilometer, Radian, AU, DPI, LIGHT_YEAR_KM, PARSEC_AU, RADEG, RADH, RADSEC,
};

/// A plane angle.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle(Radian);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub const fn from_radians(radians: Radian) -> Self {
        Angle(radians)
    }

    pub fn from_degrees(degrees: Degree) -> Self {
        Angle(degrees * RADEG)
    }

    pub fn from_arcsec(arcsec: f64) -> Self {
        Angle(arcsec * RADSEC)
    }

    pub fn from_hours(hours: f64) -> Self {
        Angle(hours * RADH)
    }

    /// Sexagesimal constructor; the sign is taken from `degrees` (use a negative zero for
    /// angles between −1° and 0°).
    pub fn from_dms(degrees: f64, minutes: f64, seconds: f64) -> Self {
        let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
        Angle::from_degrees(magnitude.copysign(degrees))
    }

    pub const fn radians(self) -> Radian {
        self.0
    }

    pub fn degrees(self) -> Degree {
        self.0 / RADEG
    }

    pub fn arcsec(self) -> f64 {
        self.0 / RADSEC
    }

    pub fn hours(self) -> f64 {
        self.0 / RADH
    }

    /// Wrap into `[0, 2π)`.
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(DPI);
        // rem_euclid can round up to exactly 2π for tiny negative inputs
        Angle(if wrapped >= DPI { 0.0 } else { wrapped })
    }

    /// Wrap into `(−π, π]`.
    pub fn normalized_signed(self) -> Self {
        let wrapped = self.normalized().0;
        Angle(if wrapped > std::f64::consts::PI {
            wrapped - DPI
        } else {
            wrapped
        })
    }

    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    pub fn tan(self) -> f64 {
        self.0.tan()
    }

    pub fn abs(self) -> Self {
        Angle(self.0.abs())
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.degrees())
    }
}

/// A length, typically a distance between bodies or a body radius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub const fn from_au(au: f64) -> Self {
        Distance(au)
    }

    pub fn from_kilometers(km: Kilometer) -> Self {
        Distance(km / AU)
    }

    pub fn from_meters(meters: f64) -> Self {
        Distance::from_kilometers(meters / 1000.0)
    }

    pub fn from_light_years(ly: f64) -> Self {
        Distance::from_kilometers(ly * LIGHT_YEAR_KM)
    }

    pub fn from_parsecs(pc: f64) -> Self {
        Distance(pc * PARSEC_AU)
    }

    pub const fn au(self) -> f64 {
        self.0
    }

    pub fn kilometers(self) -> Kilometer {
        self.0 * AU
    }

    pub fn meters(self) -> f64 {
        self.kilometers() * 1000.0
    }

    pub fn light_years(self) -> f64 {
        self.kilometers() / LIGHT_YEAR_KM
    }

    pub fn parsecs(self) -> f64 {
        self.0 / PARSEC_AU
    }
}

impl Add for Distance {
    type Output = Distance;
    fn add(self, rhs: Distance) -> Distance {
        Distance(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Distance;
    fn sub(self, rhs: Distance) -> Distance {
        Distance(self.0 - rhs.0)
    }
}

impl Mul<f64> for Distance {
    type Output = Distance;
    fn mul(self, rhs: f64) -> Distance {
        Distance(self.0 * rhs)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9} AU", self.0)
    }
}
