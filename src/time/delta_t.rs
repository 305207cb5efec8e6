//! # ΔT (TT − UT) models
//!
//! ΔT converts a Julian Day read on the UT axis into a Julian Ephemeris Day on the TT axis:
//! `jde = jd + ΔT / 86400`. Several published models are available through [`TimeCorrection`];
//! the observer configuration selects one.
//!
//! ## Lunar secular acceleration
//!
//! Every ΔT model was fitted against lunar observations reduced with a particular value of the
//! Moon's tidal acceleration ṅ. When the lunar theory used for positions has a different ṅ, the
//! model is corrected by
//!
//! ```text
//! c = −0.91072 · (ṅ_eph + |ṅ_model|) · u²     u = (year − 1955.5) / 100
//! ```
//!
//! seconds. Models that declare no ṅ opt out of the correction.
//!
//! All models are total: any finite `jd` yields a finite ΔT.

use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;
use crate::time::JulianDay;

/// Tidal acceleration of the Moon (″/cy²) built into the lunar theory.
pub const EPHEMERIS_NDOT: f64 = -23.8946;

/// Selectable ΔT model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum TimeCorrection {
    /// Espenak & Meeus (2006) piecewise polynomials, ṅ = −25.858.
    #[default]
    EspenakMeeus,
    /// Espenak & Meeus (2006) polynomials without the lunar-acceleration correction.
    EspenakMeeusZeroMoonAccel,
    /// Meeus (1998) biennial table for 1620–1992 with his polynomial extrapolations, ṅ = −26.
    Meeus1998,
    /// Stephenson & Morrison (2004) long-term parabola, ṅ = −26.
    StephensonMorrison2004,
    /// User parabola `a + b·u + c·u²` with `u = (year − year0) / 100`.
    Custom {
        year: f64,
        ndot: f64,
        a: f64,
        b: f64,
        c: f64,
    },
    /// ΔT = 0.
    None,
}

impl TimeCorrection {
    /// ΔT in seconds for a UT Julian Day, including the secular correction when the model
    /// declares a ṅ.
    pub fn delta_t(&self, jd: JulianDay) -> f64 {
        let year = jd.decimal_year();
        let raw = match *self {
            TimeCorrection::EspenakMeeus | TimeCorrection::EspenakMeeusZeroMoonAccel => {
                espenak_meeus(year)
            }
            TimeCorrection::Meeus1998 => meeus_1998(jd.value(), year),
            TimeCorrection::StephensonMorrison2004 => long_term_parabola(year),
            TimeCorrection::Custom { year: y0, a, b, c, .. } => {
                let u = (year - y0) / 100.0;
                a + (b + c * u) * u
            }
            TimeCorrection::None => 0.0,
        };
        match self.ndot() {
            Some(ndot) => raw + secular_acceleration_correction(year, ndot),
            None => raw,
        }
    }

    /// Lunar tidal acceleration the model was fitted with, `None` when the model opts out of
    /// the secular correction.
    pub fn ndot(&self) -> Option<f64> {
        match *self {
            TimeCorrection::EspenakMeeus => Some(-25.858),
            TimeCorrection::Meeus1998 | TimeCorrection::StephensonMorrison2004 => Some(-26.0),
            TimeCorrection::Custom { ndot, .. } => Some(ndot),
            TimeCorrection::EspenakMeeusZeroMoonAccel | TimeCorrection::None => None,
        }
    }

    /// Convert a UT Julian Day into a TT Julian Ephemeris Day.
    pub fn ut_to_tt(&self, jd: JulianDay) -> JulianDay {
        jd.plus_days(self.delta_t(jd) / SECONDS_PER_DAY)
    }
}

/// Correction in seconds for a model fitted with lunar acceleration `ndot`.
pub fn secular_acceleration_correction(year: f64, ndot: f64) -> f64 {
    let u = (year - 1955.5) / 100.0;
    -0.91072 * (EPHEMERIS_NDOT + ndot.abs()) * u * u
}

fn long_term_parabola(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

fn horner(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Espenak & Meeus (2006), as published for the NASA Five Millennium Canon of eclipses.
fn espenak_meeus(y: f64) -> f64 {
    match y {
        y if y < -500.0 => long_term_parabola(y),
        y if y < 500.0 => horner(
            y / 100.0,
            &[
                10583.6,
                -1014.41,
                33.78311,
                -5.952053,
                -0.1798452,
                0.022174192,
                0.0090316521,
            ],
        ),
        y if y < 1600.0 => horner(
            (y - 1000.0) / 100.0,
            &[
                1574.2,
                -556.01,
                71.23472,
                0.319781,
                -0.8503463,
                -0.005050998,
                0.0083572073,
            ],
        ),
        y if y < 1700.0 => horner(y - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7129.0]),
        y if y < 1800.0 => horner(
            y - 1700.0,
            &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0],
        ),
        y if y < 1860.0 => horner(
            y - 1800.0,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        ),
        y if y < 1900.0 => horner(
            y - 1860.0,
            &[
                7.62,
                0.5737,
                -0.251754,
                0.01680668,
                -0.0004473624,
                1.0 / 233_174.0,
            ],
        ),
        y if y < 1920.0 => horner(
            y - 1900.0,
            &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
        ),
        y if y < 1941.0 => horner(y - 1920.0, &[21.20, 0.84493, -0.076100, 0.0020936]),
        y if y < 1961.0 => horner(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]),
        y if y < 1986.0 => horner(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]),
        y if y < 2005.0 => horner(
            y - 2000.0,
            &[
                63.86,
                0.3345,
                -0.060374,
                0.0017275,
                0.000651814,
                0.00002373599,
            ],
        ),
        y if y < 2050.0 => horner(y - 2000.0, &[62.92, 0.32217, 0.005589]),
        y if y < 2150.0 => long_term_parabola(y) - 0.5628 * (2150.0 - y),
        y => long_term_parabola(y),
    }
}

/// First Julian Day covered by [`MEEUS_TABLE`] (1620-01-01).
const MEEUS_TABLE_START: f64 = 2_312_752.5;
/// Spacing of [`MEEUS_TABLE`] entries in days (two Julian years).
const MEEUS_TABLE_STEP: f64 = 730.5;

/// Biennial ΔT values (s) for 1620–1992, Meeus (1998) table 10.A.
#[rustfmt::skip]
const MEEUS_TABLE: [f64; 187] = [
    124.0, 115.0, 106.0,  98.0,  91.0,  85.0,  79.0,  74.0,  70.0,  65.0,
     62.0,  58.0,  55.0,  53.0,  50.0,  48.0,  46.0,  44.0,  42.0,  40.0,
     37.0,  35.0,  33.0,  31.0,  28.0,  26.0,  24.0,  22.0,  20.0,  18.0,
     16.0,  14.0,  13.0,  12.0,  11.0,  10.0,   9.0,   9.0,   9.0,   9.0,
      9.0,   9.0,   9.0,   9.0,  10.0,  10.0,  10.0,  10.0,  10.0,  11.0,
     11.0,  11.0,  11.0,  11.0,  11.0,  11.0,  12.0,  12.0,  12.0,  12.0,
     12.0,  12.0,  13.0,  13.0,  13.0,  13.0,  14.0,  14.0,  14.0,  15.0,
     15.0,  15.0,  15.0,  16.0,  16.0,  16.0,  16.0,  16.0,  17.0,  17.0,
     17.0,  17.0,  17.0,  17.0,  17.0,  17.0,  16.0,  16.0,  15.0,  14.0,
     13.7,  13.1,  12.7,  12.5,  12.5,  12.5,  12.5,  12.5,  12.5,  12.3,
     12.0,  11.4,  10.6,   9.6,   8.6,   7.5,   6.6,   6.0,   5.7,   5.6,
      5.7,   5.9,   6.2,   6.5,   6.8,   7.1,   7.3,   7.5,   7.7,   7.8,
      7.9,   7.5,   6.4,   5.4,   2.9,   1.6,  -1.0,  -2.7,  -3.6,  -4.7,
     -5.4,  -5.2,  -5.5,  -5.6,  -5.8,  -5.9,  -6.2,  -6.4,  -6.1,  -4.7,
     -2.7,   0.0,   2.6,   5.4,   7.7,  10.5,  13.4,  16.0,  18.2,  20.2,
     21.2,  22.4,  23.5,  23.9,  24.3,  24.0,  23.9,  23.9,  23.7,  24.0,
     24.3,  25.3,  26.2,  27.3,  28.2,  29.1,  30.0,  30.7,  31.4,  32.2,
     33.1,  34.0,  35.0,  36.5,  38.3,  40.2,  42.2,  44.5,  46.5,  48.5,
     50.5,  52.2,  53.8,  54.9,  55.8,  56.9,  58.3,
];

/// Meeus (1998): tabulated values inside 1620–1992, his quadratic fits outside.
fn meeus_1998(jd: f64, year: f64) -> f64 {
    let table_end = MEEUS_TABLE_START + MEEUS_TABLE_STEP * (MEEUS_TABLE.len() - 1) as f64;
    let t = (year - 2000.0) / 100.0;
    if year < 948.0 {
        2177.0 + 497.0 * t + 44.1 * t * t
    } else if jd < MEEUS_TABLE_START {
        102.0 + 102.0 * t + 25.3 * t * t
    } else if jd <= table_end {
        meeus_table_interpolation(jd)
    } else if year < 2000.0 {
        // bridge the table end to the 2000.0 value of the quadratic fit
        let last = MEEUS_TABLE[MEEUS_TABLE.len() - 1];
        let fraction = (year - 1992.0) / 8.0;
        last + (102.0 - last) * fraction
    } else if year < 2100.0 {
        102.0 + 102.0 * t + 25.3 * t * t + 0.37 * (year - 2100.0)
    } else {
        102.0 + 102.0 * t + 25.3 * t * t
    }
}

/// Three-point (Bessel) interpolation inside the biennial table.
fn meeus_table_interpolation(jd: f64) -> f64 {
    let position = (jd - MEEUS_TABLE_START) / MEEUS_TABLE_STEP;
    let i = (position.floor() as usize).min(MEEUS_TABLE.len() - 3);
    let a = MEEUS_TABLE[i + 1] - MEEUS_TABLE[i];
    let b = MEEUS_TABLE[i + 2] - MEEUS_TABLE[i + 1];
    let c = b - a;
    let n = position - (i + 1) as f64;
    MEEUS_TABLE[i + 1] + n / 2.0 * (a + b + n * c)
}
