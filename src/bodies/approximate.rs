//! # Built-in low-precision theory
//!
//! A [`SeriesProvider`] good to about an arcminute for the planets between 1800 and 2050 and
//! a few arcminutes for the Moon, so the engine works without external coefficient tables.
//!
//! * Planets and the Earth–Moon barycentre: JPL "approximate positions of the planets"
//!   mean elements (Standish), propagated as two-body orbits at the requested date.
//! * Moon: the low-precision geocentric formulae of the *Astronomical Almanac*, precessed
//!   from the ecliptic of date to the J2000 ecliptic.
//! * Earth: barycentre minus the Moon's share of the geocentric lunar vector.

use nalgebra::Vector3;

use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, EARTH_EQUATORIAL_RADIUS_KM, EARTH_MOON_MASS_RATIO, J2000, JDE, RADEG,
};
use crate::orbit::kepler::{KeplerElements, KeplerOrbit};
use crate::orbit::{Orbit, SeriesProvider, StateVector};
use crate::units::Distance;

pub const MERCURY: usize = 0;
pub const VENUS: usize = 1;
pub const EARTH: usize = 2;
pub const MARS: usize = 3;
pub const JUPITER: usize = 4;
pub const SATURN: usize = 5;
pub const URANUS: usize = 6;
pub const NEPTUNE: usize = 7;
/// Geocentric Moon.
pub const MOON: usize = 8;
pub const EARTH_MOON_BARYCENTER: usize = 9;

/// Step of the central difference giving the Moon's velocity (days).
const MOON_VELOCITY_STEP: f64 = 0.01;

/// Mean elements at J2000 and their rates per Julian century:
/// `[a (AU), e, I, L, ϖ, Ω]`, angles in degrees.
struct MeanElements {
    at_epoch: [f64; 6],
    rates: [f64; 6],
}

#[rustfmt::skip]
const MEAN_ELEMENTS: [MeanElements; 9] = [
    // Mercury
    MeanElements {
        at_epoch: [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
        rates: [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
    },
    // Venus
    MeanElements {
        at_epoch: [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
        rates: [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
    },
    // Earth-Moon barycentre
    MeanElements {
        at_epoch: [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
        rates: [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
    },
    // Mars
    MeanElements {
        at_epoch: [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
        rates: [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
    },
    // Jupiter
    MeanElements {
        at_epoch: [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
        rates: [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
    },
    // Saturn
    MeanElements {
        at_epoch: [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
        rates: [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
    },
    // Uranus
    MeanElements {
        at_epoch: [19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03],
        rates: [-0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89],
    },
    // Neptune
    MeanElements {
        at_epoch: [30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74],
        rates: [0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64],
    },
    // Pluto, osculating at J2000 only
    MeanElements {
        at_epoch: [39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84],
        rates: [0.0; 6],
    },
];

/// Index of Pluto's J2000 elements in the mean-element table.
const PLUTO_ELEMENTS: usize = 8;

/// Table row used for a public body index.
fn table_row(index: usize) -> Option<usize> {
    match index {
        MERCURY | VENUS => Some(index),
        EARTH_MOON_BARYCENTER => Some(2),
        MARS..=NEPTUNE => Some(index),
        _ => None,
    }
}

/// Kepler elements of a mean-element row evaluated at `jde`.
fn osculating(row: &MeanElements, jde: JDE) -> KeplerElements {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let el: Vec<f64> = row
        .at_epoch
        .iter()
        .zip(row.rates.iter())
        .map(|(value, rate)| value + rate * t)
        .collect();
    KeplerElements::from_mean_longitude(
        el[0],
        el[1],
        el[2] * RADEG,
        el[3] * RADEG,
        el[4] * RADEG,
        el[5] * RADEG,
        jde,
    )
}

fn propagate(elements: KeplerElements, jde: JDE) -> StateVector {
    match KeplerOrbit::new(elements) {
        Ok(orbit) => orbit.state_at(jde),
        Err(err) => {
            log::error!("mean elements rejected at JDE {jde}: {err}");
            StateVector::default()
        }
    }
}

/// Pluto's J2000 osculating elements, for a heliocentric Kepler orbit.
pub fn pluto_elements() -> KeplerElements {
    osculating(&MEAN_ELEMENTS[PLUTO_ELEMENTS], J2000)
}

/// Geocentric Moon in VSOP87 (AU), *Astronomical Almanac* low-precision formulae.
pub fn moon_position(jde: JDE) -> Vector3<f64> {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let sin_deg = |x: f64| (x * RADEG).sin();
    let cos_deg = |x: f64| (x * RADEG).cos();

    let lambda = 218.32 + 481_267.881 * t
        + 6.29 * sin_deg(135.0 + 477_198.87 * t)
        - 1.27 * sin_deg(259.3 - 413_335.36 * t)
        + 0.66 * sin_deg(235.7 + 890_534.22 * t)
        + 0.21 * sin_deg(269.9 + 954_397.74 * t)
        - 0.19 * sin_deg(357.5 + 35_999.05 * t)
        - 0.11 * sin_deg(186.5 + 966_404.03 * t);
    let beta = 5.13 * sin_deg(93.3 + 483_202.02 * t)
        + 0.28 * sin_deg(228.2 + 960_400.89 * t)
        - 0.28 * sin_deg(318.3 + 6_003.15 * t)
        - 0.17 * sin_deg(217.6 - 407_332.21 * t);
    let parallax = 0.9508
        + 0.0518 * cos_deg(135.0 + 477_198.87 * t)
        + 0.0095 * cos_deg(259.3 - 413_335.36 * t)
        + 0.0078 * cos_deg(235.7 + 890_534.22 * t)
        + 0.0028 * cos_deg(269.9 + 954_397.74 * t);

    // ecliptic of date to J2000 ecliptic: remove the general precession in longitude
    let lambda_j2000 = lambda - (1.396_971_278 * t + 0.000_308_6 * t * t);
    let distance = Distance::from_kilometers(EARTH_EQUATORIAL_RADIUS_KM / sin_deg(parallax)).au();

    let (sl, cl) = (lambda_j2000 * RADEG).sin_cos();
    let (sb, cb) = (beta * RADEG).sin_cos();
    Vector3::new(cb * cl, cb * sl, sb) * distance
}

fn moon_state(jde: JDE) -> StateVector {
    let h = MOON_VELOCITY_STEP;
    let velocity = (moon_position(jde + h) - moon_position(jde - h)) / (2.0 * h);
    StateVector::new(moon_position(jde), velocity)
}

/// The built-in provider. Stateless; share it behind an `Arc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateSeries;

impl ApproximateSeries {
    fn state_vector(&self, jde: JDE, index: usize) -> StateVector {
        match index {
            MOON => moon_state(jde),
            EARTH => {
                let emb = self.state_vector(jde, EARTH_MOON_BARYCENTER);
                let moon = moon_state(jde);
                let share = 1.0 / (1.0 + EARTH_MOON_MASS_RATIO);
                StateVector::new(
                    emb.position - moon.position * share,
                    emb.velocity - moon.velocity * share,
                )
            }
            _ => match table_row(index) {
                Some(row) => propagate(osculating(&MEAN_ELEMENTS[row], jde), jde),
                None => {
                    log::warn!("approximate series has no body with index {index}");
                    StateVector::default()
                }
            },
        }
    }
}

impl SeriesProvider for ApproximateSeries {
    fn state(&self, jde: JDE, index: usize) -> [f64; 6] {
        let s = self.state_vector(jde, index);
        [
            s.position.x,
            s.position.y,
            s.position.z,
            s.velocity.x,
            s.velocity.y,
            s.velocity.z,
        ]
    }
}

#[cfg(test)]
mod approximate_test {
    use super::*;
    use crate::constants::AU;
    use crate::ref_system::rect_to_sphe;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_earth_distance_in_early_january() {
        let earth = ApproximateSeries.state_vector(J2000, EARTH);
        assert!((0.982..0.986).contains(&earth.position.norm()));
        // orbital speed close to 2π AU per year
        assert_abs_diff_eq!(earth.velocity.norm(), 0.0175, epsilon = 0.0005);
    }

    #[test]
    fn test_sun_longitude_meeus_example_25a() {
        // 1992 October 13.0 TD: geometric solar longitude 199.907372° on the ecliptic of date,
        // plus 0.1008° of precession back to J2000
        let earth = ApproximateSeries.state_vector(2_448_908.5, EARTH);
        let (lng, lat) = rect_to_sphe(&-earth.position);
        assert_abs_diff_eq!(lng.degrees(), 200.008, epsilon = 0.02);
        assert!(lat.degrees().abs() < 0.01);
    }

    #[test]
    fn test_moon_distance_meeus_example_47a() {
        // 1992 April 12.0 TD: Δ = 368409.7 km, geocentric latitude −3.229°
        let moon = moon_position(2_448_724.5);
        assert_abs_diff_eq!(moon.norm() * AU, 368_409.7, epsilon = 2_000.0);
        let (_, lat) = rect_to_sphe(&moon);
        assert_abs_diff_eq!(lat.degrees(), -3.229, epsilon = 0.2);
    }

    #[test]
    fn test_unknown_index_is_zero() {
        assert_eq!(ApproximateSeries.state(J2000, 42), [0.0; 6]);
    }

    #[test]
    fn test_pluto_elements_are_valid() {
        let orbit = KeplerOrbit::new(pluto_elements()).unwrap();
        let r = orbit.state_at(J2000).position.norm();
        assert!((29.0..50.0).contains(&r));
    }
}
