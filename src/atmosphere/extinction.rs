//! Atmospheric extinction: magnitude loss proportional to the airmass along the line of sight.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Below this `cos z` (about two degrees under the horizon) the airmass formulas blow up
/// and the input is reflected back above it.
const UNDERGROUND_COS_Z: f64 = -0.035;

/// Default extinction coefficient in magnitudes per airmass.
pub const DEFAULT_EXTINCTION_COEFFICIENT: f64 = 0.13;

/// Relative optical path length for a zenith distance `z` given by its cosine.
///
/// * `apparent_z = true`: Rozenberg (1966), for the refracted zenith distance.
/// * `apparent_z = false`: Young (1994), for the geometric zenith distance.
///
/// Values of `cos z` below −0.035 are mirrored about that limit.
pub fn airmass(cos_z: f64, apparent_z: bool) -> f64 {
    let c = if cos_z < UNDERGROUND_COS_Z {
        (2.0 * UNDERGROUND_COS_Z - cos_z).min(1.0)
    } else {
        cos_z
    };
    if apparent_z {
        1.0 / (c + 0.025 * (-11.0 * c).exp())
    } else {
        let nom = (1.002_432 * c + 0.148_386) * c + 0.009_646_7;
        let denom = ((c + 0.149_864) * c + 0.010_296_3) * c + 0.000_303_978;
        nom / denom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extinction {
    /// Magnitudes per airmass.
    pub coefficient: f64,
}

impl Default for Extinction {
    fn default() -> Self {
        Extinction {
            coefficient: DEFAULT_EXTINCTION_COEFFICIENT,
        }
    }
}

impl Extinction {
    pub fn new(coefficient: f64) -> Self {
        Extinction { coefficient }
    }

    fn cos_z(alt_az: &Vector3<f64>) -> Option<f64> {
        let length = alt_az.norm();
        (length > 0.0).then(|| alt_az.z / length)
    }

    /// Magnitude as seen through the atmosphere, for a geometric AltAz direction.
    pub fn forward(&self, alt_az: &Vector3<f64>, magnitude: f64) -> f64 {
        match Self::cos_z(alt_az) {
            Some(c) => magnitude + airmass(c, false) * self.coefficient,
            None => magnitude,
        }
    }

    /// Magnitude above the atmosphere of an object observed with `magnitude`.
    pub fn backward(&self, alt_az: &Vector3<f64>, magnitude: f64) -> f64 {
        match Self::cos_z(alt_az) {
            Some(c) => magnitude - airmass(c, false) * self.coefficient,
            None => magnitude,
        }
    }
}
