//! Default solar system: the Sun, the eight planets, the Moon, Pluto and comet 1P/Halley.
//!
//! Planet and Moon positions come from a [`SeriesProvider`], by default the built-in
//! [`ApproximateSeries`]; pass an accurate provider (VSOP87, ELP) with
//! [`solar_system_with_provider`] for sub-arcsecond work. Provider indices follow
//! [`approximate`](crate::bodies::approximate).

use std::sync::Arc;

use crate::almagest_errors::AlmagestError;
use crate::bodies::approximate::{self, ApproximateSeries};
use crate::bodies::magnitude::{MagnitudeModel, MajorPlanet};
use crate::bodies::rotation::{RotationElements, RotationModel};
use crate::bodies::{Body, BodyKind, Ring, SolarSystem};
use crate::constants::{
    Degree, EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING, MOON_RADIUS_KM, RADEG, SUN_RADIUS_KM,
};
use crate::orbit::kepler::{KeplerElements, KeplerOrbit};
use crate::orbit::{SeriesOrbit, SeriesProvider};
use crate::units::Distance;

/// Per-planet constants: provider index, radius (km), flattening, geometric albedo,
/// sidereal period (days) and IAU pole `(α₀, δ₀, W₀, Ẇ)`.
struct PlanetData {
    name: &'static str,
    index: usize,
    planet: MajorPlanet,
    radius_km: f64,
    oblateness: f64,
    albedo: f64,
    period: f64,
    pole: [Degree; 4],
}

#[rustfmt::skip]
const PLANETS: [PlanetData; 8] = [
    PlanetData { name: "Mercury", index: approximate::MERCURY, planet: MajorPlanet::Mercury, radius_km: 2_439.7, oblateness: 0.0, albedo: 0.142, period: 87.9691, pole: [281.0103, 61.4155, 329.5988, 6.138_510_8] },
    PlanetData { name: "Venus", index: approximate::VENUS, planet: MajorPlanet::Venus, radius_km: 6_051.8, oblateness: 0.0, albedo: 0.689, period: 224.701, pole: [272.76, 67.16, 160.20, -1.481_368_8] },
    PlanetData { name: "Earth", index: approximate::EARTH, planet: MajorPlanet::Earth, radius_km: EARTH_EQUATORIAL_RADIUS_KM, oblateness: EARTH_FLATTENING, albedo: 0.434, period: 365.256_363, pole: [0.0, 90.0, 190.147, 360.985_623_5] },
    PlanetData { name: "Mars", index: approximate::MARS, planet: MajorPlanet::Mars, radius_km: 3_396.19, oblateness: 0.005_89, albedo: 0.17, period: 686.980, pole: [317.269_202, 54.432_516, 176.049_863, 350.891_982_443_297] },
    PlanetData { name: "Jupiter", index: approximate::JUPITER, planet: MajorPlanet::Jupiter, radius_km: 71_492.0, oblateness: 0.064_87, albedo: 0.538, period: 4_332.589, pole: [268.056_595, 64.495_303, 284.95, 870.536] },
    PlanetData { name: "Saturn", index: approximate::SATURN, planet: MajorPlanet::Saturn, radius_km: 60_268.0, oblateness: 0.097_96, albedo: 0.499, period: 10_759.22, pole: [40.589, 83.537, 38.90, 810.793_902_4] },
    PlanetData { name: "Uranus", index: approximate::URANUS, planet: MajorPlanet::Uranus, radius_km: 25_559.0, oblateness: 0.022_93, albedo: 0.488, period: 30_688.5, pole: [257.311, -15.175, 203.81, -501.160_092_8] },
    PlanetData { name: "Neptune", index: approximate::NEPTUNE, planet: MajorPlanet::Neptune, radius_km: 24_764.0, oblateness: 0.017_08, albedo: 0.442, period: 60_182.0, pole: [299.36, 43.46, 249.978, 541.139_775_7] },
];

fn iau_rotation(pole: [Degree; 4]) -> RotationModel {
    RotationModel::Uniform(RotationElements::from_iau_pole(pole[0], pole[1], pole[2], pole[3]))
}

/// The default solar system backed by the built-in low-precision theory.
pub fn default_solar_system() -> Result<SolarSystem, AlmagestError> {
    solar_system_with_provider(Arc::new(ApproximateSeries))
}

/// The default solar system with planet and Moon positions from `provider`.
pub fn solar_system_with_provider(
    provider: Arc<dyn SeriesProvider>,
) -> Result<SolarSystem, AlmagestError> {
    let mut system = SolarSystem::new();

    let sun = system.add(
        Body::new("Sun", BodyKind::Star)
            .with_figure(Distance::from_kilometers(SUN_RADIUS_KM), 0.0, 0.0)
            .with_rotation(iau_rotation([286.13, 63.87, 84.176, 14.1844]))
            .with_magnitude(MagnitudeModel::Sun),
    )?;

    let mut earth = None;
    for data in &PLANETS {
        let orbit = SeriesOrbit::new(Arc::clone(&provider), data.index).with_period(data.period);
        let rotation = match data.planet {
            MajorPlanet::Earth => RotationModel::EarthOrientation,
            _ => iau_rotation(data.pole),
        };
        let mut body = Body::new(data.name, BodyKind::Planet)
            .with_parent(sun)
            .with_orbit(orbit)
            .with_rotation(rotation)
            .with_figure(Distance::from_kilometers(data.radius_km), data.oblateness, data.albedo)
            .with_magnitude(MagnitudeModel::MajorPlanet(data.planet));
        if data.planet == MajorPlanet::Saturn {
            body = body.with_ring(Ring {
                inner_radius: Distance::from_kilometers(74_658.0),
                outer_radius: Distance::from_kilometers(140_220.0),
            });
        }
        let id = system.add(body)?;
        if data.planet == MajorPlanet::Earth {
            earth = Some(id);
        }
    }

    if let Some(earth) = earth {
        system.add(
            Body::new("Moon", BodyKind::Moon)
                .with_parent(earth)
                .with_orbit(SeriesOrbit::new(Arc::clone(&provider), approximate::MOON).with_period(27.321_661))
                .with_rotation(iau_rotation([269.9949, 66.5392, 38.3213, 13.176_358_15]))
                .with_figure(Distance::from_kilometers(MOON_RADIUS_KM), 0.0012, 0.12)
                .with_magnitude(MagnitudeModel::Moon),
        )?;
    }

    system.add(
        Body::new("Pluto", BodyKind::MinorPlanet)
            .with_parent(sun)
            .with_orbit(KeplerOrbit::new(approximate::pluto_elements())?)
            .with_rotation(iau_rotation([132.993, -6.163, 302.695, 56.362_522_5]))
            .with_figure(Distance::from_kilometers(1_188.3), 0.0, 0.52)
            .with_magnitude(MagnitudeModel::Asteroid {
                absolute_magnitude: -0.7,
                slope: 0.15,
            }),
    )?;

    let halley = KeplerElements::heliocentric(
        0.587_103_5,
        0.967_276_0,
        162.242_20 * RADEG,
        58.860_01 * RADEG,
        111.868_89 * RADEG,
        2_446_470.958_91,
    );
    system.add(
        Body::new("1P/Halley", BodyKind::Comet)
            .with_parent(sun)
            .with_orbit(KeplerOrbit::new(halley)?)
            .with_figure(Distance::from_kilometers(5.5), 0.0, 0.04)
            .with_magnitude(MagnitudeModel::Comet { m1: 5.5, k1: 8.0 }),
    )?;

    log::info!("default solar system ready with {} bodies", system.len());
    Ok(system)
}
