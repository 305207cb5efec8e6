//! # Visual magnitude models
//!
//! Reduced-to-apparent magnitude conversions for every body kind, driven by a
//! [`PhaseGeometry`] built from three heliocentric distances.
//!
//! Major planets use empirical phase-curve fits selected by [`ApparentMagnitudeAlgorithm`]:
//!
//! | Algorithm | Source |
//! |-----------|--------|
//! | `Mueller1893` | G. Müller, photometry published 1893 |
//! | `AstronomicalAlmanac1984` | *Astronomical Almanac* 1984 |
//! | `ExplanatorySupplement1992` | *Explanatory Supplement*, 2nd ed. |
//! | `ExplanatorySupplement2013` | *Explanatory Supplement*, 3rd ed. |
//! | `Generic` | albedo and Lambert phase law only |
//!
//! Minor planets use the IAU H–G system and comets the total-magnitude law `M1 + K1·log r`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, Radian, AU, RADEG};
use crate::units::Distance;

/// Magnitude returned for a body in total shadow.
pub const INVISIBLE_MAGNITUDE: f64 = 100.0;

/// Mean geocentric lunar distance, normalising the Moon's magnitude law.
const MOON_MEAN_DISTANCE_KM: Kilometer = 384_400.0;

/// Empirical phase-curve family used for the major planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApparentMagnitudeAlgorithm {
    Mueller1893,
    AstronomicalAlmanac1984,
    ExplanatorySupplement1992,
    #[default]
    ExplanatorySupplement2013,
    Generic,
}

/// Planets with dedicated phase-curve fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MajorPlanet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// How a body's brightness is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MagnitudeModel {
    Sun,
    MajorPlanet(MajorPlanet),
    Moon,
    /// IAU H–G system for minor planets.
    Asteroid { absolute_magnitude: f64, slope: f64 },
    /// Total-magnitude law of comets.
    Comet { m1: f64, k1: f64 },
    /// Geometric albedo with a Lambert phase law.
    Albedo,
}

/// Sun–body–observer geometry needed by every magnitude law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseGeometry {
    /// Body–Sun distance `r` (AU).
    pub sun_distance: f64,
    /// Body–observer distance `Δ` (AU).
    pub observer_distance: f64,
    /// Sun–observer distance `R` (AU).
    pub sun_observer_distance: f64,
    /// Phase angle `i` (Sun–body–observer).
    pub phase_angle: Radian,
}

impl PhaseGeometry {
    /// Geometry from heliocentric positions of the body and of the observer (same frame).
    pub fn new(body: &Vector3<f64>, observer: &Vector3<f64>) -> Self {
        let r2 = body.norm_squared();
        let d2 = (body - observer).norm_squared();
        let big_r2 = observer.norm_squared();
        let (r, d) = (r2.sqrt(), d2.sqrt());
        let cos_phase = if r > 0.0 && d > 0.0 {
            ((r2 + d2 - big_r2) / (2.0 * r * d)).clamp(-1.0, 1.0)
        } else {
            1.0
        };
        PhaseGeometry {
            sun_distance: r,
            observer_distance: d,
            sun_observer_distance: big_r2.sqrt(),
            phase_angle: cos_phase.acos(),
        }
    }

    /// Illuminated fraction of the disk, `(1 + cos i)/2`.
    pub fn illuminated_fraction(&self) -> f64 {
        0.5 * (1.0 + self.phase_angle.cos())
    }

    /// Elongation of the body from the Sun as seen by the observer.
    pub fn elongation(&self) -> Radian {
        let (r, d, big_r) = (self.sun_distance, self.observer_distance, self.sun_observer_distance);
        if d == 0.0 || big_r == 0.0 {
            return 0.0;
        }
        ((big_r * big_r + d * d - r * r) / (2.0 * big_r * d))
            .clamp(-1.0, 1.0)
            .acos()
    }

    /// `5·log10(r·Δ)`, the distance modulus common to every reduced magnitude.
    fn distance_modulus(&self) -> f64 {
        5.0 * (self.sun_distance * self.observer_distance).log10()
    }
}

/// Orientation of Saturn's rings towards the observer and the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingTilt {
    /// Saturnicentric latitude of the observer over the ring plane `B`.
    pub observer_latitude: Radian,
    /// Difference of the Sun's and observer's saturnicentric longitudes `ΔU`.
    pub longitude_difference: Radian,
}

impl RingTilt {
    /// Tilt from the ring pole and the Saturn→observer and Saturn→Sun directions.
    pub fn new(pole: &Vector3<f64>, to_observer: &Vector3<f64>, to_sun: &Vector3<f64>) -> Self {
        let pole = pole.normalize();
        let project = |v: &Vector3<f64>| v - pole * pole.dot(v);
        let latitude = |v: &Vector3<f64>| (pole.dot(v) / v.norm()).clamp(-1.0, 1.0).asin();
        RingTilt {
            observer_latitude: latitude(to_observer),
            longitude_difference: crate::math::angle_between(&project(to_observer), &project(to_sun)),
        }
    }

    fn brightening(&self) -> f64 {
        let sin_b = self.observer_latitude.sin();
        -2.60 * sin_b.abs() + 1.25 * sin_b * sin_b
    }
}

/// Physical properties entering the albedo-based laws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photometry {
    pub radius: Distance,
    pub albedo: f64,
}

impl MagnitudeModel {
    /// Apparent magnitude before atmospheric extinction and shadowing.
    pub fn apparent(
        &self,
        geometry: &PhaseGeometry,
        algorithm: ApparentMagnitudeAlgorithm,
        photometry: Photometry,
        ring: Option<RingTilt>,
    ) -> f64 {
        match *self {
            MagnitudeModel::Sun => -26.74 + 5.0 * geometry.observer_distance.log10(),
            MagnitudeModel::Moon => moon_magnitude(geometry),
            MagnitudeModel::Asteroid {
                absolute_magnitude,
                slope,
            } => asteroid_magnitude(geometry, absolute_magnitude, slope),
            MagnitudeModel::Comet { m1, k1 } => {
                m1 + 5.0 * geometry.observer_distance.log10() + k1 * geometry.sun_distance.log10()
            }
            MagnitudeModel::Albedo => albedo_magnitude(geometry, photometry),
            MagnitudeModel::MajorPlanet(planet) => match algorithm {
                ApparentMagnitudeAlgorithm::Generic => albedo_magnitude(geometry, photometry),
                _ => planet_magnitude(planet, algorithm, geometry, ring.unwrap_or_default())
                    .unwrap_or_else(|| albedo_magnitude(geometry, photometry)),
            },
        }
    }
}

/// Lambert phase law with geometric albedo, scaled to the Sun's magnitude at 1 AU.
pub fn albedo_magnitude(geometry: &PhaseGeometry, photometry: Photometry) -> f64 {
    let i = geometry.phase_angle;
    let phase = (1.0 - i / std::f64::consts::PI) * i.cos() + i.sin() / std::f64::consts::PI;
    let radius = photometry.radius.au();
    let flux = 2.0 * photometry.albedo * radius * radius * phase
        / (3.0
            * geometry.sun_distance
            * geometry.sun_distance
            * geometry.observer_distance
            * geometry.observer_distance);
    -26.73 - 2.5 * flux.log10()
}

/// IAU H–G magnitude.
pub fn asteroid_magnitude(geometry: &PhaseGeometry, h: f64, g: f64) -> f64 {
    let half_tan = (geometry.phase_angle / 2.0).tan();
    let phi1 = (-3.33 * half_tan.powf(0.63)).exp();
    let phi2 = (-1.87 * half_tan.powf(1.22)).exp();
    h + geometry.distance_modulus() - 2.5 * ((1.0 - g) * phi1 + g * phi2).log10()
}

fn moon_magnitude(geometry: &PhaseGeometry) -> f64 {
    let i = geometry.phase_angle / RADEG;
    let d_km = geometry.observer_distance * AU;
    -12.73
        + 0.026 * i.abs()
        + 4e-9 * i.powi(4)
        + 5.0 * (geometry.sun_distance * d_km / MOON_MEAN_DISTANCE_KM).log10()
}

/// Phase-curve fit for a major planet, `None` when the algorithm has no entry for it.
fn planet_magnitude(
    planet: MajorPlanet,
    algorithm: ApparentMagnitudeAlgorithm,
    geometry: &PhaseGeometry,
    ring: RingTilt,
) -> Option<f64> {
    use ApparentMagnitudeAlgorithm::*;
    use MajorPlanet::*;

    let i = geometry.phase_angle / RADEG;
    let x = i / 100.0;
    let delta_u = ring.longitude_difference.abs() / RADEG;

    let reduced = match (algorithm, planet) {
        (_, Earth) => return None,

        (Mueller1893, Mercury) => -0.42 + 0.0380 * i - 0.000_273 * i * i + 0.000_002 * i.powi(3),
        (Mueller1893, Venus) => -4.40 + 0.0009 * i + 0.000_239 * i * i - 0.000_000_65 * i.powi(3),
        (Mueller1893, Mars) => -1.52 + 0.016 * i,
        (Mueller1893, Jupiter) => -9.40 + 0.005 * i,
        (Mueller1893, Saturn) => -8.88 + 0.044 * delta_u + ring.brightening(),
        (Mueller1893, Uranus) => -7.19,
        (Mueller1893, Neptune) => -6.87,

        (AstronomicalAlmanac1984, Mercury) => -0.36 + 0.027 * i + 2.2e-13 * i.powi(6),
        (AstronomicalAlmanac1984, Venus) => -4.34 + 0.013 * i + 4.2e-7 * i.powi(3),
        (AstronomicalAlmanac1984, Mars) => -1.51 + 0.016 * i,
        (AstronomicalAlmanac1984, Jupiter) => -9.25 + 0.005 * i,
        (AstronomicalAlmanac1984, Saturn) => -9.00 + 0.044 * delta_u + ring.brightening(),
        (AstronomicalAlmanac1984, Uranus) => -7.15 + 0.001 * i,
        (AstronomicalAlmanac1984, Neptune) => -6.90 + 0.001 * i,

        (ExplanatorySupplement2013, Mercury) => -0.60 + 4.98 * x - 4.88 * x * x + 3.02 * x.powi(3),
        (ExplanatorySupplement2013, Venus) if i < 163.7 => {
            -4.47 + 1.03 * x + 0.57 * x * x + 0.13 * x.powi(3)
        }
        // forward scattering near inferior conjunction
        (ExplanatorySupplement2013, Venus) => 0.98 - 1.02 * x,

        (ExplanatorySupplement1992, Mercury) => -0.42 + 3.80 * x - 2.73 * x * x + 2.00 * x.powi(3),
        (ExplanatorySupplement1992, Venus) => -4.40 + 0.09 * x + 2.39 * x * x - 0.65 * x.powi(3),
        (ExplanatorySupplement1992 | ExplanatorySupplement2013, Mars) => -1.52 + 1.60 * x,
        (ExplanatorySupplement1992 | ExplanatorySupplement2013, Jupiter) => -9.40 + 0.5 * x,
        (ExplanatorySupplement1992 | ExplanatorySupplement2013, Saturn) => {
            -8.88 + 0.044 * i + ring.brightening()
        }
        (ExplanatorySupplement1992 | ExplanatorySupplement2013, Uranus) => -7.19,
        (ExplanatorySupplement1992 | ExplanatorySupplement2013, Neptune) => -6.87,

        (Generic, _) => return None,
    };
    Some(reduced + geometry.distance_modulus())
}

/// Fraction of the solar disk left visible to a body by an occulting parent.
///
/// Arguments
/// ---------
/// * `body`, `parent`: heliocentric positions of the shadowed body and of the occulter (AU).
/// * `sun_radius`, `parent_radius`: physical radii of the Sun and of the occulter.
///
/// Returns
/// --------
/// * `1.0` in full sunlight, `0.0` in the umbra, the visible area fraction in between.
pub fn shadow_factor(
    body: &Vector3<f64>,
    parent: &Vector3<f64>,
    sun_radius: Distance,
    parent_radius: Distance,
) -> f64 {
    let to_sun = -body;
    let to_parent = parent - body;
    let sun_distance = to_sun.norm();
    let parent_distance = to_parent.norm();
    // occulter must sit between the body and the Sun
    if parent_distance == 0.0 || parent_distance >= sun_distance || to_sun.dot(&to_parent) <= 0.0 {
        return 1.0;
    }

    let rs = (sun_radius.au() / sun_distance).min(1.0).asin();
    let rp = (parent_radius.au() / parent_distance).min(1.0).asin();
    let d = crate::math::angle_between(&to_sun, &to_parent);

    if d >= rs + rp {
        return 1.0;
    }
    if d <= rp - rs {
        return 0.0;
    }
    let sun_area = std::f64::consts::PI * rs * rs;
    if d <= rs - rp {
        return 1.0 - std::f64::consts::PI * rp * rp / sun_area;
    }
    1.0 - lens_area(rs, rp, d) / sun_area
}

/// Area of intersection of two circles of radii `r1`, `r2` with centres `d` apart
/// (small-angle, flat approximation).
fn lens_area(r1: f64, r2: f64, d: f64) -> f64 {
    let a1 = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let a2 = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let k = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2)).max(0.0).sqrt();
    r1 * r1 * a1 + r2 * r2 * a2 - 0.5 * k
}

#[cfg(test)]
mod magnitude_test {
    use super::*;
    use crate::constants::{EARTH_EQUATORIAL_RADIUS_KM, SUN_RADIUS_KM};
    use approx::assert_abs_diff_eq;

    fn photometry() -> Photometry {
        Photometry {
            radius: Distance::from_kilometers(71_492.0),
            albedo: 0.52,
        }
    }

    #[test]
    fn test_phase_geometry_at_opposition() {
        let geometry = PhaseGeometry::new(&Vector3::new(5.2, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(geometry.sun_distance, 5.2, epsilon = 1e-15);
        assert_abs_diff_eq!(geometry.observer_distance, 4.2, epsilon = 1e-15);
        assert_abs_diff_eq!(geometry.phase_angle, 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(geometry.illuminated_fraction(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.elongation(), std::f64::consts::PI, epsilon = 1e-7);
    }

    #[test]
    fn test_jupiter_at_opposition() {
        let geometry = PhaseGeometry::new(&Vector3::new(5.2, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        let model = MagnitudeModel::MajorPlanet(MajorPlanet::Jupiter);
        let m = model.apparent(&geometry, ApparentMagnitudeAlgorithm::ExplanatorySupplement2013, photometry(), None);
        assert_abs_diff_eq!(m, -9.40 + 5.0 * (5.2_f64 * 4.2).log10(), epsilon = 1e-6);
        assert!(m < -2.0 && m > -3.0);
    }

    #[test]
    fn test_generic_algorithm_uses_albedo() {
        let geometry = PhaseGeometry::new(&Vector3::new(5.2, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        let model = MagnitudeModel::MajorPlanet(MajorPlanet::Jupiter);
        let m = model.apparent(&geometry, ApparentMagnitudeAlgorithm::Generic, photometry(), None);
        assert_abs_diff_eq!(m, albedo_magnitude(&geometry, photometry()), epsilon = 1e-12);
        // the Lambert law lands within a magnitude of the empirical fit
        assert!((m + 2.7).abs() < 1.0);
    }

    #[test]
    fn test_asteroid_hg_at_zero_phase() {
        let geometry = PhaseGeometry {
            sun_distance: 2.0,
            observer_distance: 1.0,
            sun_observer_distance: 1.0,
            phase_angle: 0.0,
        };
        let m = MagnitudeModel::Asteroid {
            absolute_magnitude: 3.3,
            slope: 0.12,
        }
        .apparent(&geometry, ApparentMagnitudeAlgorithm::default(), photometry(), None);
        assert_abs_diff_eq!(m, 3.3 + 5.0 * 2.0_f64.log10(), epsilon = 1e-12);
    }

    #[test]
    fn test_comet_total_magnitude() {
        let geometry = PhaseGeometry {
            sun_distance: 10.0,
            observer_distance: 10.0,
            sun_observer_distance: 1.0,
            phase_angle: 0.0,
        };
        let m = MagnitudeModel::Comet { m1: 5.5, k1: 8.0 }.apparent(
            &geometry,
            ApparentMagnitudeAlgorithm::default(),
            photometry(),
            None,
        );
        assert_abs_diff_eq!(m, 5.5 + 5.0 + 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_moon_magnitude() {
        let geometry = PhaseGeometry {
            sun_distance: 1.0,
            observer_distance: MOON_MEAN_DISTANCE_KM / AU,
            sun_observer_distance: 1.0,
            phase_angle: 0.0,
        };
        let m = MagnitudeModel::Moon.apparent(&geometry, ApparentMagnitudeAlgorithm::default(), photometry(), None);
        assert_abs_diff_eq!(m, -12.73, epsilon = 1e-9);
    }

    #[test]
    fn test_saturn_rings_brighten() {
        let geometry = PhaseGeometry::new(&Vector3::new(9.5, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        let model = MagnitudeModel::MajorPlanet(MajorPlanet::Saturn);
        let edge_on = model.apparent(&geometry, ApparentMagnitudeAlgorithm::Mueller1893, photometry(), None);
        let open = model.apparent(
            &geometry,
            ApparentMagnitudeAlgorithm::Mueller1893,
            photometry(),
            Some(RingTilt {
                observer_latitude: 26.0 * RADEG,
                longitude_difference: 0.0,
            }),
        );
        assert!(open < edge_on);
    }

    #[test]
    fn test_venus_near_inferior_conjunction() {
        let model = MagnitudeModel::MajorPlanet(MajorPlanet::Venus);
        let at_phase = |deg: f64| {
            let geometry = PhaseGeometry {
                sun_distance: 0.72,
                observer_distance: 0.28,
                sun_observer_distance: 0.99,
                phase_angle: deg * RADEG,
            };
            let m = model.apparent(
                &geometry,
                ApparentMagnitudeAlgorithm::ExplanatorySupplement2013,
                photometry(),
                None,
            );
            m - geometry.distance_modulus()
        };

        assert_abs_diff_eq!(at_phase(170.0), 0.98 - 1.02 * 1.7, epsilon = 1e-12);
        assert_abs_diff_eq!(at_phase(50.0), -4.47 + 0.515 + 0.1425 + 0.01625, epsilon = 1e-12);
        // both fits meet at the switch-over phase
        assert!((at_phase(163.69) - at_phase(163.71)).abs() < 0.01);
    }

    #[test]
    fn test_ring_tilt_geometry() {
        let tilt = RingTilt::new(
            &Vector3::z(),
            &Vector3::new(1.0, 0.0, 1.0),
            &Vector3::new(0.0, 1.0, 0.0),
        );
        assert_abs_diff_eq!(tilt.observer_latitude, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_abs_diff_eq!(tilt.longitude_difference, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_shadow_factor_regimes() {
        let sun = Distance::from_kilometers(SUN_RADIUS_KM);
        let earth = Distance::from_kilometers(EARTH_EQUATORIAL_RADIUS_KM);
        let earth_pos = Vector3::new(1.0, 0.0, 0.0);

        // Moon straight behind the Earth: umbra
        let moon = Vector3::new(1.0 + 384_400.0 / AU, 0.0, 0.0);
        assert_eq!(shadow_factor(&moon, &earth_pos, sun, earth), 0.0);

        // Moon in front of the Earth: full sunlight
        let moon = Vector3::new(1.0 - 384_400.0 / AU, 0.0, 0.0);
        assert_eq!(shadow_factor(&moon, &earth_pos, sun, earth), 1.0);

        // offset sideways by roughly one Earth radius: partial
        let moon = Vector3::new(1.0 + 384_400.0 / AU, 6_400.0 / AU, 0.0);
        let f = shadow_factor(&moon, &earth_pos, sun, earth);
        assert!(f > 0.0 && f < 1.0, "got {f}");
    }

    #[test]
    fn test_lens_area_limits() {
        // identical concentric circles overlap entirely
        assert_abs_diff_eq!(lens_area(1.0, 1.0, 1e-9), std::f64::consts::PI, epsilon = 1e-6);
        // tangent circles do not overlap
        assert_abs_diff_eq!(lens_area(1.0, 1.0, 2.0), 0.0, epsilon = 1e-12);
    }
}
