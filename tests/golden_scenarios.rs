mod common;

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use almagest::bodies::approximate::{self, ApproximateSeries};
use almagest::bodies::catalog::solar_system_with_provider;
use almagest::celestial::{CelestialObject, Planet};
use almagest::constants::J2000;
use almagest::eclipse::LunarEclipse;
use almagest::observers::Location;
use almagest::orbit::kepler::{KeplerElements, KeplerOrbit};
use almagest::orbit::{Orbit, SeriesProvider};
use almagest::time::sidereal::mean_sidereal_time;
use almagest::units::Distance;

use common::{angle_diff_deg, jd, observer_at, pico_dos_dias, solar_system};

#[test]
fn sun_seen_from_pico_dos_dias() {
    let system = solar_system();
    let obs = observer_at(&system, pico_dos_dias(), jd(2021, 2, 5, 12, 0));
    let sun = Planet::find(&system, "Sun").unwrap();
    let (az, alt) = sun.az_alt(&obs, false);
    // the built-in mean elements and the rounded site put the Sun about 15 arcseconds off
    assert!(angle_diff_deg(az.degrees(), 90.7432) < 0.01, "azimuth {az}");
    assert_abs_diff_eq!(alt.degrees(), 43.3413, epsilon = 0.01);

    let (_, apparent_alt) = sun.az_alt(&obs, true);
    assert!(apparent_alt > alt);
}

/// Earth from the VSOP87D series rotated to the J2000 ecliptic, linear around one instant.
/// Every other body comes from the built-in series.
#[derive(Debug)]
struct ReferenceEarth {
    epoch: f64,
    state: [f64; 6],
}

impl SeriesProvider for ReferenceEarth {
    fn state(&self, jde: f64, index: usize) -> [f64; 6] {
        if index != approximate::EARTH {
            return ApproximateSeries.state(jde, index);
        }
        let dt = jde - self.epoch;
        let [x, y, z, vx, vy, vz] = self.state;
        [x + vx * dt, y + vy * dt, z + vz * dt, vx, vy, vz]
    }
}

#[test]
fn sun_seen_from_pico_dos_dias_with_reference_earth() {
    let earth = ReferenceEarth {
        epoch: 2_459_251.000_826_795,
        state: [
            -0.716_604_899_853,
            0.677_245_683_517,
            -0.000_030_650_159,
            -1.210_341_562_591e-2,
            -1.256_485_604_262e-2,
            1.222_773_354_792e-6,
        ],
    };
    let system = solar_system_with_provider(Arc::new(earth)).unwrap();
    // 22°32'04" S, 45°34'57" W
    let site = Location::new("Pico dos Dias", -22.534_444_444, -45.582_5, 1864.0).unwrap();
    let obs = observer_at(&system, site, jd(2021, 2, 5, 12, 0));
    let sun = Planet::find(&system, "Sun").unwrap();
    let (az, alt) = sun.az_alt(&obs, false);
    assert!(angle_diff_deg(az.degrees(), 90.7432) < 1e-4, "azimuth {az}");
    assert_abs_diff_eq!(alt.degrees(), 43.3413, epsilon = 1e-4);
}

#[test]
fn astronomical_unit_in_kilometres() {
    assert_abs_diff_eq!(
        Distance::from_au(1.0).kilometers(),
        149_597_870.699_626_2,
        epsilon = 1e-3
    );
}

#[test]
fn circular_orbit_closes_after_one_period() {
    let orbit = KeplerOrbit::new(KeplerElements::heliocentric(
        1.5,
        0.0,
        0.2,
        1.1,
        0.4,
        J2000,
    ))
    .unwrap();
    let period = orbit.sidereal_period().unwrap();
    let start = orbit.state_at(J2000 + 17.25);
    let end = orbit.state_at(J2000 + 17.25 + period);
    assert_abs_diff_eq!(start.position, end.position, epsilon = 1e-6);
    assert_relative_eq!(start.position.norm(), 1.5, epsilon = 1e-12);
}

#[test]
fn mean_sidereal_time_at_j2000() {
    assert_abs_diff_eq!(
        mean_sidereal_time(J2000, J2000).degrees(),
        280.460_618_37,
        epsilon = 1e-6
    );
}

#[test]
fn total_lunar_eclipse_of_january_2019() {
    let system = solar_system();
    // greatest eclipse 2019-01-21 05:12 UT, umbral magnitude 1.195
    let obs = observer_at(&system, pico_dos_dias(), jd(2019, 1, 21, 5, 12));
    let eclipse = LunarEclipse::compute(&obs).unwrap();
    assert!(eclipse.is_eclipsing());
    assert!(eclipse.umbral_magnitude > 0.0);
    assert!(eclipse.umbral_magnitude < eclipse.penumbral_magnitude);
}
