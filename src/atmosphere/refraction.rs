//! # Atmospheric refraction
//!
//! Forward refraction (geometric → apparent) uses Saemundsson's formula and backward
//! refraction (apparent → geometric) Bennett's, both scaled by pressure and temperature.
//! Each direction splits the altitude range in three:
//!
//! ```text
//!  90° ┬──────────────────────── formula
//!      │
//! MIN  ┼──────────────────────── linear ramp down to zero correction
//!      │  transition band
//!      ┴──────────────────────── untouched below
//! ```
//!
//! The ramp keeps the correction continuous where the formulas would otherwise be cut.

use nalgebra::Vector3;

use crate::constants::{Degree, RADEG};

/// Lowest geometric altitude at which Saemundsson's formula is applied.
const MIN_GEO_ALTITUDE_DEG: Degree = -3.54;
/// Width of the forward transition band below [`MIN_GEO_ALTITUDE_DEG`].
const TRANSITION_WIDTH_GEO_DEG: Degree = 1.46;
/// Lowest apparent altitude at which the backward polynomial is applied.
const MIN_APP_ALTITUDE_DEG: Degree = -3.21783;
/// Width of the backward transition band below [`MIN_APP_ALTITUDE_DEG`].
const TRANSITION_WIDTH_APP_DEG: Degree = 1.78217;
/// Above this apparent altitude Bennett's formula is used, below it a polynomial fit.
const BENNETT_MIN_ALTITUDE_DEG: Degree = 0.22879;

/// Refraction for a given pressure and temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    /// Pressure in millibar; zero or negative disables refraction.
    pressure: f64,
    /// Temperature in °C.
    temperature: f64,
    /// `P/1010 · 283/(273+T)`, divided by 60 to turn arcminutes into degrees.
    press_temp_corr: f64,
}

impl Default for Refraction {
    fn default() -> Self {
        Refraction::new(1013.25, 15.0)
    }
}

impl Refraction {
    pub fn new(pressure: f64, temperature: f64) -> Self {
        Refraction {
            pressure,
            temperature,
            press_temp_corr: pressure / 1010.0 * 283.0 / (273.0 + temperature) / 60.0,
        }
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn is_enabled(&self) -> bool {
        self.pressure > 0.0
    }

    fn saemundsson(&self, alt: Degree) -> Degree {
        self.press_temp_corr * (1.02 / ((alt + 10.3 / (alt + 5.11)) * RADEG).tan() + 0.001_927_9)
    }

    fn backward_polynomial(alt: Degree) -> f64 {
        (((((0.0444 * alt + 0.7662) * alt + 4.9746) * alt + 13.599) * alt + 8.052) * alt - 11.308)
            * alt
            + 34.341
    }

    /// Apparent altitude of an object at geometric altitude `alt`.
    pub fn forward_altitude(&self, alt: Degree) -> Degree {
        if !self.is_enabled() {
            return alt;
        }
        if alt > MIN_GEO_ALTITUDE_DEG {
            (alt + self.saemundsson(alt)).min(90.0)
        } else if alt > MIN_GEO_ALTITUDE_DEG - TRANSITION_WIDTH_GEO_DEG {
            let r_min = self.saemundsson(MIN_GEO_ALTITUDE_DEG);
            alt + r_min * (alt - (MIN_GEO_ALTITUDE_DEG - TRANSITION_WIDTH_GEO_DEG))
                / TRANSITION_WIDTH_GEO_DEG
        } else {
            alt
        }
    }

    /// Geometric altitude of an object seen at apparent altitude `alt`.
    pub fn backward_altitude(&self, alt: Degree) -> Degree {
        if !self.is_enabled() {
            return alt;
        }
        if alt > BENNETT_MIN_ALTITUDE_DEG {
            alt - self.press_temp_corr
                * (1.0 / ((alt + 7.31 / (alt + 4.4)) * RADEG).tan() + 0.001_351_5)
        } else if alt > MIN_APP_ALTITUDE_DEG {
            alt - Self::backward_polynomial(alt) * self.press_temp_corr
        } else if alt > MIN_APP_ALTITUDE_DEG - TRANSITION_WIDTH_APP_DEG {
            let r_min = Self::backward_polynomial(MIN_APP_ALTITUDE_DEG);
            alt - r_min * self.press_temp_corr
                * (alt - (MIN_APP_ALTITUDE_DEG - TRANSITION_WIDTH_APP_DEG))
                / TRANSITION_WIDTH_APP_DEG
        } else {
            alt
        }
    }

    /// Refract an AltAz vector (z towards the zenith), keeping its length.
    pub fn forward(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.apply(v, |alt| self.forward_altitude(alt))
    }

    /// Undo [`Refraction::forward`] on an AltAz vector.
    pub fn backward(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.apply(v, |alt| self.backward_altitude(alt))
    }

    fn apply(&self, v: &Vector3<f64>, correct: impl Fn(Degree) -> Degree) -> Vector3<f64> {
        let length = v.norm();
        if length == 0.0 || !self.is_enabled() {
            return *v;
        }
        let sin_before = (v.z / length).clamp(-1.0, 1.0);
        let alt = sin_before.asin() / RADEG;
        let corrected = correct(alt);
        if corrected == alt {
            return *v;
        }
        let sin_after = (corrected * RADEG).sin();
        // shrink x and y so the vector keeps its length
        let shorten = if sin_before.abs() >= 1.0 {
            1.0
        } else {
            ((1.0 - sin_after * sin_after) / (1.0 - sin_before * sin_before)).sqrt()
        };
        Vector3::new(v.x * shorten, v.y * shorten, sin_after * length)
    }

    /// Geometric altitude of an object whose refracted image touches the mathematical
    /// horizon, for rise and set computations.
    pub fn horizon_altitude(&self) -> Degree {
        self.backward_altitude(0.0)
    }
}
