//! # IAU 1980 nutation
//!
//! Nutation in longitude `Δψ` and in obliquity `Δε`, from the 63 largest terms of the
//! IAU 1980 (Wahr) series. The five Delaunay-style arguments are the mean elongation of the
//! Moon `D`, the mean anomalies of the Sun `M` and Moon `M′`, the Moon's argument of latitude
//! `F` and the longitude of the lunar ascending node `Ω`.
//!
//! The truncation error is below 0.01″ over a few centuries around J2000.

use std::cell::Cell;

use nalgebra::Matrix3;

use crate::constants::{Radian, DAYS_PER_JULIAN_CENTURY, J2000, JDE, RADEG, RADSEC};
use crate::math::{rotation3, Axis};

/// One periodic term. Multipliers of `(D, M, M′, F, Ω)` then the sine coefficient of `Δψ`
/// and the cosine coefficient of `Δε`, each `(constant, rate per century)` in units of
/// 0.0001″.
struct NutationTerm {
    args: [i8; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [i8; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const TERMS: [NutationTerm; 63] = [
    term([ 0,  0,  0,  0,  1], (-171_996.0, -174.2), (92_025.0,  8.9)),
    term([-2,  0,  0,  2,  2], ( -13_187.0,   -1.6), ( 5_736.0, -3.1)),
    term([ 0,  0,  0,  2,  2], (  -2_274.0,   -0.2), (   977.0, -0.5)),
    term([ 0,  0,  0,  0,  2], (   2_062.0,    0.2), (  -895.0,  0.5)),
    term([ 0,  1,  0,  0,  0], (   1_426.0,   -3.4), (    54.0, -0.1)),
    term([ 0,  0,  1,  0,  0], (     712.0,    0.1), (    -7.0,  0.0)),
    term([-2,  1,  0,  2,  2], (    -517.0,    1.2), (   224.0, -0.6)),
    term([ 0,  0,  0,  2,  1], (    -386.0,   -0.4), (   200.0,  0.0)),
    term([ 0,  0,  1,  2,  2], (    -301.0,    0.0), (   129.0, -0.1)),
    term([-2, -1,  0,  2,  2], (     217.0,   -0.5), (   -95.0,  0.3)),
    term([-2,  0,  1,  0,  0], (    -158.0,    0.0), (     0.0,  0.0)),
    term([-2,  0,  0,  2,  1], (     129.0,    0.1), (   -70.0,  0.0)),
    term([ 0,  0, -1,  2,  2], (     123.0,    0.0), (   -53.0,  0.0)),
    term([ 2,  0,  0,  0,  0], (      63.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0,  1,  0,  1], (      63.0,    0.1), (   -33.0,  0.0)),
    term([ 2,  0, -1,  2,  2], (     -59.0,    0.0), (    26.0,  0.0)),
    term([ 0,  0, -1,  0,  1], (     -58.0,   -0.1), (    32.0,  0.0)),
    term([ 0,  0,  1,  2,  1], (     -51.0,    0.0), (    27.0,  0.0)),
    term([-2,  0,  2,  0,  0], (      48.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0, -2,  2,  1], (      46.0,    0.0), (   -24.0,  0.0)),
    term([ 2,  0,  0,  2,  2], (     -38.0,    0.0), (    16.0,  0.0)),
    term([ 0,  0,  2,  2,  2], (     -31.0,    0.0), (    13.0,  0.0)),
    term([ 0,  0,  2,  0,  0], (      29.0,    0.0), (     0.0,  0.0)),
    term([-2,  0,  1,  2,  2], (      29.0,    0.0), (   -12.0,  0.0)),
    term([ 0,  0,  0,  2,  0], (      26.0,    0.0), (     0.0,  0.0)),
    term([-2,  0,  0,  2,  0], (     -22.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0, -1,  2,  1], (      21.0,    0.0), (   -10.0,  0.0)),
    term([ 0,  2,  0,  0,  0], (      17.0,   -0.1), (     0.0,  0.0)),
    term([ 2,  0, -1,  0,  1], (      16.0,    0.0), (    -8.0,  0.0)),
    term([-2,  2,  0,  2,  2], (     -16.0,    0.1), (     7.0,  0.0)),
    term([ 0,  1,  0,  0,  1], (     -15.0,    0.0), (     9.0,  0.0)),
    term([-2,  0,  1,  0,  1], (     -13.0,    0.0), (     7.0,  0.0)),
    term([ 0, -1,  0,  0,  1], (     -12.0,    0.0), (     6.0,  0.0)),
    term([ 0,  0,  2, -2,  0], (      11.0,    0.0), (     0.0,  0.0)),
    term([ 2,  0, -1,  2,  1], (     -10.0,    0.0), (     5.0,  0.0)),
    term([ 2,  0,  1,  2,  2], (      -8.0,    0.0), (     3.0,  0.0)),
    term([ 0,  1,  0,  2,  2], (       7.0,    0.0), (    -3.0,  0.0)),
    term([-2,  1,  1,  0,  0], (      -7.0,    0.0), (     0.0,  0.0)),
    term([ 0, -1,  0,  2,  2], (      -7.0,    0.0), (     3.0,  0.0)),
    term([ 2,  0,  0,  2,  1], (      -7.0,    0.0), (     3.0,  0.0)),
    term([ 2,  0,  1,  0,  0], (       6.0,    0.0), (     0.0,  0.0)),
    term([-2,  0,  2,  2,  2], (       6.0,    0.0), (    -3.0,  0.0)),
    term([-2,  0,  1,  2,  1], (       6.0,    0.0), (    -3.0,  0.0)),
    term([ 2,  0, -2,  0,  1], (      -6.0,    0.0), (     3.0,  0.0)),
    term([ 2,  0,  0,  0,  1], (      -6.0,    0.0), (     3.0,  0.0)),
    term([ 0, -1,  1,  0,  0], (       5.0,    0.0), (     0.0,  0.0)),
    term([-2, -1,  0,  2,  1], (      -5.0,    0.0), (     3.0,  0.0)),
    term([-2,  0,  0,  0,  1], (      -5.0,    0.0), (     3.0,  0.0)),
    term([ 0,  0,  2,  2,  1], (      -5.0,    0.0), (     3.0,  0.0)),
    term([-2,  0,  2,  0,  1], (       4.0,    0.0), (     0.0,  0.0)),
    term([-2,  1,  0,  2,  1], (       4.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0,  1, -2,  0], (       4.0,    0.0), (     0.0,  0.0)),
    term([-1,  0,  1,  0,  0], (      -4.0,    0.0), (     0.0,  0.0)),
    term([-2,  1,  0,  0,  0], (      -4.0,    0.0), (     0.0,  0.0)),
    term([ 1,  0,  0,  0,  0], (      -4.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0,  1,  2,  0], (       3.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0, -2,  2,  2], (      -3.0,    0.0), (     0.0,  0.0)),
    term([-1, -1,  1,  0,  0], (      -3.0,    0.0), (     0.0,  0.0)),
    term([ 0,  1,  1,  0,  0], (      -3.0,    0.0), (     0.0,  0.0)),
    term([ 0, -1,  1,  2,  2], (      -3.0,    0.0), (     0.0,  0.0)),
    term([ 2, -1, -1,  2,  2], (      -3.0,    0.0), (     0.0,  0.0)),
    term([ 0,  0,  3,  2,  2], (      -3.0,    0.0), (     0.0,  0.0)),
    term([ 2, -1,  0,  2,  2], (      -3.0,    0.0), (     0.0,  0.0)),
];

/// Nutation angles at one date, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub delta_psi: Radian,
    pub delta_epsilon: Radian,
}

thread_local! {
    static LAST_NUTATION: Cell<Option<(JDE, Nutation)>> = const { Cell::new(None) };
}

/// Fundamental arguments `[D, M, M′, F, Ω]` in radians for `t` Julian centuries TT.
fn fundamental_arguments(t: f64) -> [Radian; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        297.850_36 + 445_267.111_480 * t - 0.001_914_2 * t2 + t3 / 189_474.0,
        357.527_72 + 35_999.050_340 * t - 0.000_160_3 * t2 - t3 / 300_000.0,
        134.962_98 + 477_198.867_398 * t + 0.008_697_2 * t2 + t3 / 56_250.0,
        93.271_91 + 483_202.017_538 * t - 0.003_682_5 * t2 + t3 / 327_270.0,
        125.044_52 - 1_934.136_261 * t + 0.002_070_8 * t2 + t3 / 450_000.0,
    ]
    .map(|deg| (deg % 360.0) * RADEG)
}

fn compute(jde: JDE) -> Nutation {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let fundamentals = fundamental_arguments(t);

    let (psi, eps) = TERMS.iter().fold((0.0, 0.0), |(psi, eps), term| {
        let argument: f64 = term
            .args
            .iter()
            .zip(fundamentals.iter())
            .map(|(&k, &value)| f64::from(k) * value)
            .sum();
        let (s, c) = argument.sin_cos();
        (
            psi + (term.psi.0 + term.psi.1 * t) * s,
            eps + (term.eps.0 + term.eps.1 * t) * c,
        )
    });

    Nutation {
        delta_psi: psi * 1e-4 * RADSEC,
        delta_epsilon: eps * 1e-4 * RADSEC,
    }
}

/// Nutation at `jde`, reusing the last result computed on this thread for the same date.
pub fn nutation(jde: JDE) -> Nutation {
    LAST_NUTATION.with(|last| {
        if let Some((cached_jde, cached)) = last.get() {
            if cached_jde == jde {
                return cached;
            }
        }
        let fresh = compute(jde);
        last.set(Some((jde, fresh)));
        fresh
    })
}

/// Rotation from the mean equatorial frame of date to the true equatorial frame of date.
///
/// Arguments
/// ---------
/// * `mean_obliquity`: mean obliquity of the ecliptic of date `ε_A`, in radians.
/// * `nut`: nutation angles of the same date.
pub fn mat_mean_to_true_equ(mean_obliquity: Radian, nut: &Nutation) -> Matrix3<f64> {
    rotation3(Axis::X, mean_obliquity + nut.delta_epsilon)
        * rotation3(Axis::Z, nut.delta_psi)
        * rotation3(Axis::X, -mean_obliquity)
}
