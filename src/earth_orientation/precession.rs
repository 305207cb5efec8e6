//! # Long-term precession (Vondrák, Capitaine & Wallace 2011)
//!
//! The model expresses the motion of the **ecliptic pole** and of the **equator pole** as
//! cubic polynomials plus a handful of long-period harmonics in Julian centuries TT since
//! J2000. It stays within a few arcseconds over ±200 millennia, which is why it is used here
//! instead of the IAU 1976 polynomial angles.
//!
//! The classic precession angles `ψ_A`, `ω_A`, `χ_A` and `ε_A` are read back from the
//! resulting rotation matrix so that callers needing angles and callers needing a matrix see
//! the same precession.
//!
//! Results are memoized per thread for the last requested date.

use std::cell::Cell;

use nalgebra::{Matrix3, Vector3};

use crate::constants::{Radian, DAYS_PER_JULIAN_CENTURY, DPI, EPS_0, J2000, JDE, RADSEC};
use crate::math::{angle_between, rotation3, safe_normalize, Axis};

/// Obliquity at J2000 used by the ecliptic pole series, in arcseconds.
const VONDRAK_EPS0_ARCSEC: f64 = 84_381.406;

/// Polynomial coefficients (arcsec) of the ecliptic pole components `P_A` and `Q_A`.
const PQ_POLY: [[f64; 4]; 2] = [
    [5_851.607_687, -0.118_900_0, -0.000_289_13, 0.000_000_101],
    [-1_600.886_300, 1.168_981_8, -0.000_000_20, -0.000_000_437],
];

/// Periodic terms of the ecliptic pole: `(period in centuries, C_P, C_Q, S_P, S_Q)`.
const PQ_PERIODIC: [[f64; 5]; 8] = [
    [708.15, -5_486.751_211, -684.661_560, 667.666_730, -5_523.863_691],
    [2_309.00, -17.127_623, 2_446.283_880, -2_354.886_252, -549.747_450],
    [1_620.00, -617.517_403, 399.671_049, -428.152_441, -310.998_056],
    [492.20, 413.442_940, -356.652_376, 376.202_861, 421.535_876],
    [1_183.00, 78.614_193, -186.387_003, 184.778_874, -36.776_172],
    [622.00, -180.732_815, -316.800_070, 335.321_713, -145.278_396],
    [882.00, -87.676_083, 198.296_701, -185.138_669, -34.744_450],
    [547.00, 46.140_315, 101.135_679, -120.972_830, 22.885_731],
];

/// Polynomial coefficients (arcsec) of the equator pole components `X` and `Y`.
const XY_POLY: [[f64; 4]; 2] = [
    [5_453.282_155, 0.425_284_1, -0.000_371_73, -0.000_000_152],
    [-73_750.930_350, -0.767_545_2, -0.000_187_25, 0.000_000_231],
];

/// Periodic terms of the equator pole: `(period in centuries, C_X, C_Y, S_X, S_Y)`.
const XY_PERIODIC: [[f64; 5]; 14] = [
    [256.75, -819.940_624, 75_004.344_875, 81_491.287_984, 1_558.515_853],
    [708.15, -8_444.676_815, 624.033_993, 787.163_481, 7_774.939_698],
    [274.20, 2_600.009_459, 1_251.136_893, 1_251.296_102, -2_219.534_038],
    [241.45, 2_755.175_630, -1_102.212_834, -1_257.950_837, -2_523.969_396],
    [2_309.00, -167.659_835, -2_660.664_980, -2_966.799_730, 247.850_422],
    [492.20, 871.855_056, 699.291_817, 639.744_522, -846.485_643],
    [396.10, 44.769_698, 153.167_220, 131.600_209, -1_393.124_055],
    [288.90, -512.313_065, -950.865_637, -445.040_117, 368.526_116],
    [231.10, -819.415_595, 499.754_645, 584.522_874, 749.045_012],
    [1_610.00, -538.071_099, -145.188_210, -89.756_563, 444.704_518],
    [620.00, -189.793_622, 558.116_553, 524.429_630, 235.934_465],
    [157.87, -402.922_932, -23.923_029, -13.549_067, 374.049_623],
    [220.30, 179.516_345, -165.405_086, -210.157_124, -171.330_180],
    [1_200.00, -9.814_756, 9.344_131, -44.919_798, -22.899_655],
];

/// The four classic precession angles, all in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecessionAngles {
    /// Luni-solar precession in longitude.
    pub psi_a: Radian,
    /// Inclination of the mean equator of date on the J2000 ecliptic.
    pub omega_a: Radian,
    /// Planetary precession along the equator.
    pub chi_a: Radian,
    /// Mean obliquity of the ecliptic of date.
    pub epsilon_a: Radian,
}

/// Precession at one date: the angles and the rotation from the J2000 mean equator and
/// equinox to the mean equator and equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precession {
    pub angles: PrecessionAngles,
    pub mat_j2000_to_mean_equ: Matrix3<f64>,
}

thread_local! {
    static LAST_PRECESSION: Cell<Option<(JDE, Precession)>> = const { Cell::new(None) };
}

fn julian_centuries(jde: JDE) -> f64 {
    (jde - J2000) / DAYS_PER_JULIAN_CENTURY
}

/// Evaluate a cubic and its harmonic terms for two paired components.
///
/// Each periodic row is `(period, C_a, C_b, S_a, S_b)` and contributes
/// `C·cos(2πt/P) + S·sin(2πt/P)`.
fn pole_series<const N: usize>(t: f64, poly: &[[f64; 4]; 2], periodic: &[[f64; 5]; N]) -> (f64, f64) {
    let (mut a, mut b) = periodic.iter().fold((0.0, 0.0), |(a, b), row| {
        let (s, c) = (DPI * t / row[0]).sin_cos();
        (a + c * row[1] + s * row[3], b + c * row[2] + s * row[4])
    });

    let mut w = 1.0;
    for k in 0..4 {
        a += poly[0][k] * w;
        b += poly[1][k] * w;
        w *= t;
    }
    (a * RADSEC, b * RADSEC)
}

/// Unit vector of the ecliptic pole of date, in J2000 mean equatorial coordinates.
pub fn ecliptic_pole(jde: JDE) -> Vector3<f64> {
    let (p, q) = pole_series(julian_centuries(jde), &PQ_POLY, &PQ_PERIODIC);
    let (s, c) = (VONDRAK_EPS0_ARCSEC * RADSEC).sin_cos();
    let w = (1.0 - p * p - q * q).max(0.0).sqrt();
    Vector3::new(p, -q * c - w * s, -q * s + w * c)
}

/// Unit vector of the mean equator pole of date, in J2000 mean equatorial coordinates.
pub fn equator_pole(jde: JDE) -> Vector3<f64> {
    let (x, y) = pole_series(julian_centuries(jde), &XY_POLY, &XY_PERIODIC);
    let w = x * x + y * y;
    Vector3::new(x, y, if w < 1.0 { (1.0 - w).sqrt() } else { 0.0 })
}

fn compute(jde: JDE) -> Precession {
    let eq_pole = equator_pole(jde);
    let ecl_pole = ecliptic_pole(jde);

    let equinox = safe_normalize(&eq_pole.cross(&ecl_pole));
    let middle = eq_pole.cross(&equinox);
    let mat = Matrix3::from_rows(&[equinox.transpose(), middle.transpose(), eq_pole.transpose()]);

    // J2000 ecliptic to mean equator of date, factored as R3(χ)·R1(−ω)·R3(−ψ) in frame terms
    let q = mat * rotation3(Axis::X, EPS_0);
    let angles = PrecessionAngles {
        psi_a: q[(2, 0)].atan2(q[(2, 1)]),
        omega_a: q[(2, 0)].hypot(q[(2, 1)]).atan2(q[(2, 2)]),
        chi_a: (-q[(0, 2)]).atan2(-q[(1, 2)]),
        epsilon_a: angle_between(&eq_pole, &ecl_pole),
    };

    Precession {
        angles,
        mat_j2000_to_mean_equ: mat,
    }
}

/// Precession at `jde`, reusing the last result computed on this thread for the same date.
pub fn precession(jde: JDE) -> Precession {
    LAST_PRECESSION.with(|last| {
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

/// Shorthand for `precession(jde).angles`.
pub fn precession_angles(jde: JDE) -> PrecessionAngles {
    precession(jde).angles
}

/// Rotation from the J2000 mean equatorial frame to the mean equatorial frame of date.
pub fn mat_j2000_to_mean_equ(jde: JDE) -> Matrix3<f64> {
    precession(jde).mat_j2000_to_mean_equ
}

#[cfg(test)]
mod precession_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_at_j2000() {
        let p = precession(J2000);
        assert_abs_diff_eq!(p.mat_j2000_to_mean_equ, Matrix3::identity(), epsilon = 1e-6);
        assert_abs_diff_eq!(p.angles.psi_a, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.angles.chi_a, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.angles.epsilon_a / RADSEC, VONDRAK_EPS0_ARCSEC, epsilon = 0.05);
    }

    #[test]
    fn test_rates_over_one_century() {
        let angles = precession_angles(J2000 + DAYS_PER_JULIAN_CENTURY);
        // ψ_A ≈ 5038.48″/cy and ε_A ≈ 84381.406″ − 46.84″/cy
        assert_abs_diff_eq!(angles.psi_a / RADSEC, 5_038.48, epsilon = 1.0);
        assert_abs_diff_eq!(angles.epsilon_a / RADSEC, 84_381.406 - 46.84, epsilon = 0.5);
        assert_abs_diff_eq!(angles.omega_a / RADSEC, 84_381.406, epsilon = 1.0);
    }

    /// IAU 2006 (P03) angles in arcseconds, Capitaine et al. 2003 eqs. 37 and 39.
    fn p03_angles(t: f64) -> [f64; 4] {
        let poly = |c: [f64; 6]| c.iter().rev().fold(0.0, |acc, k| acc * t + k);
        [
            poly([0.0, 5_038.481_507, -1.079_006_9, -0.001_140_45, 0.000_132_851, -0.000_000_095_1]),
            poly([84_381.406, -0.025_754, 0.051_262_3, -0.007_725_03, -0.000_000_467, 0.000_000_333_7]),
            poly([0.0, 10.556_403, -2.381_429_2, -0.001_211_97, 0.000_170_663, -0.000_000_056]),
            poly([84_381.406, -46.836_769, -0.000_183_1, 0.002_003_40, -0.000_000_576, -0.000_000_043_4]),
        ]
    }

    #[test]
    fn test_angles_agree_with_iau2006_polynomials() {
        for (centuries, tolerance) in [(-10.0, 0.1), (-1.0, 0.005), (1.0, 0.005), (10.0, 0.1)] {
            let a = precession_angles(J2000 + centuries * DAYS_PER_JULIAN_CENTURY);
            let got = [a.psi_a, a.omega_a, a.chi_a, a.epsilon_a].map(|v| v / RADSEC);
            for (g, e) in got.iter().zip(p03_angles(centuries)) {
                assert_abs_diff_eq!(*g, e, epsilon = tolerance);
            }
        }
    }

    #[test]
    fn test_angles_ten_millennia_away() {
        // the polynomials no longer hold here; the obliquity stays inside its 41 kyr swing and
        // the equinox keeps drifting by about 50″ a year
        let past = precession_angles(J2000 - 100.0 * DAYS_PER_JULIAN_CENTURY);
        let future = precession_angles(J2000 + 100.0 * DAYS_PER_JULIAN_CENTURY);
        assert!((24.15..24.3).contains(&(past.epsilon_a / RADEG)), "{past:?}");
        assert!((22.55..22.7).contains(&(future.epsilon_a / RADEG)), "{future:?}");
        assert_abs_diff_eq!(past.psi_a / RADSEC, -503_460.6, epsilon = 1.0);
        assert_abs_diff_eq!(future.psi_a / RADSEC, 502_294.5, epsilon = 1.0);
        assert_abs_diff_eq!(future.chi_a / RADSEC, -10_351.2, epsilon = 1.0);
    }

    #[test]
    fn test_matrix_is_orthonormal() {
        let m = mat_j2000_to_mean_equ(J2000 - 40.0 * DAYS_PER_JULIAN_CENTURY);
        assert_abs_diff_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_memoized_value_matches_fresh() {
        let jde = 2_460_000.5;
        let first = precession(jde);
        let _ = precession(jde + 1.0);
        assert_eq!(precession(jde), first);
        assert_eq!(compute(jde), first);
    }
}
