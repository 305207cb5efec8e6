//! # Static reference frames and spherical coordinates
//!
//! The fixed rotations between the inertial frames the engine knows about:
//!
//! | Frame | Definition |
//! |-------|------------|
//! | `J2000` | mean equator and equinox of J2000.0 (ICRS-aligned) |
//! | `VSOP87` | mean ecliptic and equinox of J2000.0, the heliocentric working frame |
//! | `Galactic` | IAU 1958 galactic system, Hipparcos realisation |
//! | `Supergalactic` | de Vaucouleurs supergalactic system |
//!
//! All matrices are active rotations named `mat_<from>_to_<to>`.

use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::constants::EPS_0;
use crate::math::{homogeneous, xrotation};
use crate::units::Angle;

/// J2000 equatorial to VSOP87 ecliptic: a tilt of `−ε₀` about the common X axis.
pub fn mat_j2000_to_vsop87() -> Matrix4<f64> {
    xrotation(-EPS_0)
}

/// VSOP87 ecliptic to J2000 equatorial.
pub fn mat_vsop87_to_j2000() -> Matrix4<f64> {
    xrotation(EPS_0)
}

/// J2000 equatorial to galactic (Hipparcos, ESA SP-1200 vol. 1 §1.5.3).
#[rustfmt::skip]
pub fn mat_j2000_to_galactic() -> Matrix4<f64> {
    homogeneous(&Matrix3::new(
        -0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2,
         0.494_109_427_875_583_7, -0.444_829_629_960_011_2,  0.746_982_244_497_218_9,
        -0.867_666_149_019_004_7, -0.198_076_373_431_201_5,  0.455_983_776_175_066_9,
    ))
}

/// Galactic to supergalactic.
#[rustfmt::skip]
pub fn mat_galactic_to_supergalactic() -> Matrix4<f64> {
    homogeneous(&Matrix3::new(
        -0.735_742_574_804_374_9,  0.677_261_296_413_894_3, 0.0,
        -0.074_553_778_365_233_7, -0.080_991_471_306_976_7, 0.993_922_590_399_774_9,
         0.673_145_302_109_207_6,  0.731_271_165_816_964_5, 0.110_081_262_224_782_1,
    ))
}

/// Convert a rectangular vector into `(longitude, latitude)`.
///
/// The longitude is measured counter-clockwise from +X in `[0, 2π)`; the latitude in
/// `[−π/2, π/2]`. A zero vector maps to `(0, 0)`.
///
/// Arguments
/// ---------
/// * `v`: any non-normalised direction or position.
///
/// Returns
/// --------
/// * `(lng, lat)` as [`Angle`]s.
pub fn rect_to_sphe(v: &Vector3<f64>) -> (Angle, Angle) {
    let lng = Angle::from_radians(v.y.atan2(v.x)).normalized();
    let lat = Angle::from_radians(v.z.atan2(v.x.hypot(v.y)));
    (lng, lat)
}

/// Unit vector pointing at `(lng, lat)`.
pub fn sphe_to_rect(lng: Angle, lat: Angle) -> Vector3<f64> {
    let (sl, cl) = lng.radians().sin_cos();
    let (sb, cb) = lat.radians().sin_cos();
    Vector3::new(cl * cb, sl * cb, sb)
}
