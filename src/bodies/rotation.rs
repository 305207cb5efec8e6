//! # Body rotation models
//!
//! Each body carries a [`RotationModel`] that yields two things for an instant:
//!
//! * the rotation from its own equatorial frame to its parent's frame,
//! * its sidereal time, i.e. the angle of the prime meridian from the equinox-like origin
//!   of that equatorial frame.
//!
//! The Earth uses the full precession–nutation model; every other body rotates uniformly
//! about a fixed pole.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian, J2000, JDE, RADEG, SIDEREAL_DAY};
use crate::earth_orientation::mat_equ_of_date_to_vsop87;
use crate::math::{xrotation, zrotation};
use crate::ref_system::mat_j2000_to_vsop87;
use crate::time::sidereal::{apparent_sidereal_time, mean_sidereal_time};
use crate::units::Angle;

/// Frame the pole angles of a [`RotationElements`] are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationReference {
    /// Pole given by right ascension and declination on the J2000 equator.
    J2000Equator,
    /// Pole given relative to the parent body's equatorial frame.
    ParentEquator,
}

/// Uniform rotation about a fixed pole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationElements {
    /// Tilt of the equator on the reference plane.
    pub obliquity: Radian,
    /// Longitude of the equator's ascending node on the reference plane.
    pub ascending_node: Radian,
    /// Prime meridian angle at J2000.0.
    pub prime_meridian: Radian,
    /// Rotation rate in radians per day; negative for retrograde rotators.
    pub rate: Radian,
    pub reference: RotationReference,
}

impl RotationElements {
    /// Elements from the IAU WGCCRE pole `(α₀, δ₀)` and prime meridian `W = W₀ + Ẇ·d`.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: pole right ascension and declination at J2000 (degrees).
    /// * `w0`: prime meridian at J2000 (degrees).
    /// * `rate`: `Ẇ` in degrees per day.
    pub fn from_iau_pole(ra: Degree, dec: Degree, w0: Degree, rate: Degree) -> Self {
        RotationElements {
            obliquity: (90.0 - dec) * RADEG,
            ascending_node: (ra + 90.0) * RADEG,
            prime_meridian: w0 * RADEG,
            rate: rate * RADEG,
            reference: RotationReference::J2000Equator,
        }
    }

    /// Rotation from the body's equatorial frame to the frame its pole is given in.
    ///
    /// For [`RotationReference::J2000Equator`] the result is already expressed in VSOP87.
    pub fn mat_local_to_parent(&self) -> Matrix4<f64> {
        let tilt = zrotation(self.ascending_node) * xrotation(self.obliquity);
        match self.reference {
            RotationReference::J2000Equator => mat_j2000_to_vsop87() * tilt,
            RotationReference::ParentEquator => tilt,
        }
    }

    /// Prime meridian angle at `jde`.
    pub fn sidereal_time(&self, jde: JDE) -> Angle {
        Angle::from_radians(self.prime_meridian + self.rate * (jde - J2000)).normalized()
    }
}

/// How a body's equator is oriented and how fast it spins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationModel {
    /// Precession, nutation and Greenwich sidereal time of the Earth.
    EarthOrientation,
    Uniform(RotationElements),
    /// No meaningful rotation; the equatorial frame is the parent frame.
    Fixed,
}

impl RotationModel {
    /// Rotation from the body's equatorial frame to its parent's frame at `jde`.
    ///
    /// For the Earth the parent frame is VSOP87 and `with_nutation` selects the true rather
    /// than the mean equator of date.
    pub fn mat_local_to_parent(&self, jde: JDE, with_nutation: bool) -> Matrix4<f64> {
        match self {
            RotationModel::EarthOrientation => mat_equ_of_date_to_vsop87(jde, with_nutation),
            RotationModel::Uniform(elements) => elements.mat_local_to_parent(),
            RotationModel::Fixed => Matrix4::identity(),
        }
    }

    /// Whether the parent's own orientation must be composed on top of
    /// [`RotationModel::mat_local_to_parent`] to reach VSOP87.
    pub fn is_parent_relative(&self) -> bool {
        matches!(
            self,
            RotationModel::Uniform(RotationElements {
                reference: RotationReference::ParentEquator,
                ..
            }) | RotationModel::Fixed
        )
    }

    /// Sidereal time of the body's prime meridian.
    ///
    /// Arguments
    /// ---------
    /// * `jd`: instant in UT, used by the Earth's rotation term.
    /// * `jde`: the same instant in TT.
    /// * `with_nutation`: apparent rather than mean sidereal time for the Earth.
    pub fn sidereal_time(&self, jd: f64, jde: JDE, with_nutation: bool) -> Angle {
        match self {
            RotationModel::EarthOrientation if with_nutation => apparent_sidereal_time(jd, jde),
            RotationModel::EarthOrientation => mean_sidereal_time(jd, jde),
            RotationModel::Uniform(elements) => elements.sidereal_time(jde),
            RotationModel::Fixed => Angle::ZERO,
        }
    }

    /// Ratio of the sidereal to the mean solar day.
    ///
    /// `orbital_period` is the sidereal orbital period in days, when known.
    pub fn day_ratio(&self, orbital_period: Option<f64>) -> f64 {
        match (self, orbital_period) {
            (RotationModel::EarthOrientation, _) => SIDEREAL_DAY,
            (RotationModel::Uniform(elements), Some(period)) if elements.rate != 0.0 => {
                let orbital_rate = crate::constants::DPI / period;
                (elements.rate - orbital_rate) / elements.rate
            }
            _ => 1.0,
        }
    }
}
