//! # Earth orientation
//!
//! Precession and nutation of the Earth's equator, and the derived quantities the rest of the
//! engine needs:
//!
//! * the mean and true obliquity of the ecliptic,
//! * the equation of the equinoxes (apparent minus mean sidereal time),
//! * the rotation from the Earth's true (or mean) equatorial frame of date to VSOP87.
//!
//! ## Frames
//!
//! ```text
//! J2000 equatorial ──P──▶ mean equatorial of date ──N──▶ true equatorial of date
//!        ▲
//!        └── Rx(ε₀) ── VSOP87 (J2000 ecliptic)
//! ```

pub mod nutation;
pub mod precession;

use nalgebra::{Matrix3, Matrix4};

use crate::constants::{Radian, EPS_0, JDE};
use crate::math::{homogeneous, xrotation};

use self::nutation::{mat_mean_to_true_equ, nutation};
use self::precession::precession;

/// Mean obliquity of the ecliptic of date `ε_A`.
pub fn mean_obliquity(jde: JDE) -> Radian {
    precession(jde).angles.epsilon_a
}

/// True obliquity of the ecliptic of date, `ε_A + Δε`.
pub fn true_obliquity(jde: JDE) -> Radian {
    mean_obliquity(jde) + nutation(jde).delta_epsilon
}

/// Equation of the equinoxes `Δψ·cos(ε_A + Δε)`, in radians.
pub fn equation_of_equinoxes(jde: JDE) -> Radian {
    let nut = nutation(jde);
    nut.delta_psi * (mean_obliquity(jde) + nut.delta_epsilon).cos()
}

/// Rotation from the J2000 mean equatorial frame to the equatorial frame of date.
///
/// With `with_nutation` the target is the true equator and equinox of date, otherwise the
/// mean equator and equinox of date.
pub fn mat_j2000_to_equ_of_date(jde: JDE, with_nutation: bool) -> Matrix3<f64> {
    let prec = precession(jde);
    if with_nutation {
        mat_mean_to_true_equ(prec.angles.epsilon_a, &nutation(jde)) * prec.mat_j2000_to_mean_equ
    } else {
        prec.mat_j2000_to_mean_equ
    }
}

/// Rotation taking the Earth's equatorial frame of date into the VSOP87 frame.
pub fn mat_equ_of_date_to_vsop87(jde: JDE, with_nutation: bool) -> Matrix4<f64> {
    xrotation(-EPS_0) * homogeneous(&mat_j2000_to_equ_of_date(jde, with_nutation).transpose())
}
