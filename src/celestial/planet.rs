//! Solar-system bodies as celestial objects.

use nalgebra::Vector3;

use crate::almagest_errors::AlmagestError;
use crate::bodies::magnitude::{shadow_factor, PhaseGeometry, RingTilt, INVISIBLE_MAGNITUDE};
use crate::bodies::{BodyId, BodyKind, SolarSystem};
use crate::celestial::CelestialObject;
use crate::math::transform_vector;
use crate::observers::Observer;
use crate::units::Angle;

/// A body of the observer's [`SolarSystem`], positioned with light time and parallax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Planet {
    id: BodyId,
}

impl Planet {
    pub fn new(id: BodyId) -> Self {
        Planet { id }
    }

    /// Look a body up by name.
    pub fn find(system: &SolarSystem, name: &str) -> Result<Self, AlmagestError> {
        system.find(name).map(Planet::new)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Sun–body–observer geometry from light-time-corrected positions.
    pub fn phase_geometry(&self, observer: &Observer<'_>) -> PhaseGeometry {
        let state = observer.body_state(self.id);
        PhaseGeometry::new(&state.position, &observer.heliocentric_position())
    }

    pub fn phase_angle(&self, observer: &Observer<'_>) -> Angle {
        Angle::from_radians(self.phase_geometry(observer).phase_angle)
    }

    pub fn elongation(&self, observer: &Observer<'_>) -> Angle {
        Angle::from_radians(self.phase_geometry(observer).elongation())
    }

    pub fn illuminated_fraction(&self, observer: &Observer<'_>) -> f64 {
        self.phase_geometry(observer).illuminated_fraction()
    }

    /// Fraction of the solar disk visible from the body's centre, past its parent.
    ///
    /// Bodies orbiting a star, and the root itself, are always fully lit.
    pub fn shadow_factor(&self, observer: &Observer<'_>) -> f64 {
        let system = observer.system();
        let body = &system[self.id];
        let Some(parent) = body.parent() else {
            return 1.0;
        };
        if system[parent].kind() == BodyKind::Star {
            return 1.0;
        }
        let Some(root) = system.ancestors(self.id).last() else {
            return 1.0;
        };
        let state = observer.body_state(self.id);
        let parent_position = system
            .heliocentric_state(parent, state.jde, observer.cache())
            .position;
        shadow_factor(
            &state.position,
            &parent_position,
            system[root].equatorial_radius,
            system[parent].equatorial_radius,
        )
    }

    /// Ring opening towards the observer and the Sun, for ringed bodies.
    pub fn ring_tilt(&self, observer: &Observer<'_>) -> Option<RingTilt> {
        observer.system()[self.id].ring()?;
        let state = observer.body_state(self.id);
        let pole = transform_vector(&state.mat_equatorial_to_vsop87, &Vector3::z());
        Some(RingTilt::new(
            &pole,
            &(observer.heliocentric_position() - state.position),
            &-state.position,
        ))
    }
}

impl CelestialObject for Planet {
    fn j2000_equatorial_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.helio_to_j2000(&observer.body_state(self.id).position)
    }

    fn visual_magnitude(&self, observer: &Observer<'_>) -> f64 {
        let body = &observer.system()[self.id];
        let magnitude = body.magnitude_model().apparent(
            &self.phase_geometry(observer),
            observer.config().apparent_magnitude_algorithm,
            body.photometry(),
            self.ring_tilt(observer),
        );
        let shadow = self.shadow_factor(observer);
        if shadow <= 0.0 {
            return INVISIBLE_MAGNITUDE;
        }
        magnitude - 2.5 * shadow.log10()
    }

    /// Apparent diameter of the body, rings included.
    fn angular_size(&self, observer: &Observer<'_>) -> Angle {
        let body = &observer.system()[self.id];
        let radius = body
            .ring()
            .map_or(body.equatorial_radius, |ring| ring.outer_radius)
            .au();
        let distance = self.j2000_equatorial_position(observer).norm();
        if distance == 0.0 {
            return Angle::from_radians(std::f64::consts::PI);
        }
        Angle::from_radians(2.0 * (radius / distance).atan())
    }

    /// The upper limb touches the refracted horizon.
    fn rts_horizon(&self, observer: &Observer<'_>) -> Angle {
        let refracted = Angle::from_degrees(observer.refraction().horizon_altitude());
        let body = &observer.system()[self.id];
        let distance = self.j2000_equatorial_position(observer).norm();
        if distance == 0.0 {
            return refracted;
        }
        refracted - Angle::from_radians((body.equatorial_radius.au() / distance).asin())
    }
}

#[cfg(test)]
mod planet_test {
    use super::*;
    use crate::bodies::catalog::default_solar_system;
    use crate::observers::{Location, ObserverConfig};
    use crate::time::JulianDay;
    use approx::assert_abs_diff_eq;

    fn observer(system: &SolarSystem, y: i32, m: u8, d: u8, h: u8, min: u8) -> Observer<'_> {
        let site = Location::new("Greenwich", 51.4769, 0.0, 46.0).unwrap();
        let jd = JulianDay::from_calendar(y, m, d, h, min, 0.0).unwrap();
        Observer::on_earth(system, site, jd, ObserverConfig::default()).unwrap()
    }

    #[test]
    fn test_sun_magnitude_and_size() {
        let system = default_solar_system().unwrap();
        let obs = observer(&system, 2021, 6, 21, 12, 0);
        let sun = Planet::find(&system, "Sun").unwrap();
        assert_abs_diff_eq!(sun.visual_magnitude(&obs), -26.74, epsilon = 0.05);
        // about 31.5 arcminutes around the June aphelion season
        assert_abs_diff_eq!(sun.angular_size(&obs).degrees() * 60.0, 31.5, epsilon = 0.3);
        assert_abs_diff_eq!(sun.shadow_factor(&obs), 1.0);
        // high noon at midsummer
        let (_, alt) = sun.az_alt(&obs, false);
        assert_abs_diff_eq!(alt.degrees(), 90.0 - 51.4769 + 23.44, epsilon = 0.3);
    }

    #[test]
    fn test_full_moon_is_bright_and_fully_lit() {
        let system = default_solar_system().unwrap();
        // full Moon of 2021-05-26, mid-eclipse at 11:19 UT
        let obs = observer(&system, 2021, 5, 26, 11, 19);
        let moon = Planet::find(&system, "Moon").unwrap();
        assert!(moon.illuminated_fraction(&obs) > 0.98);
        assert!(moon.elongation(&obs).degrees() > 170.0);
        // total lunar eclipse: the Earth hides most of the Sun from the Moon
        let shadow = moon.shadow_factor(&obs);
        assert!(shadow < 0.5, "shadow factor {shadow}");
        assert!(moon.visual_magnitude(&obs) > -12.0);
    }

    #[test]
    fn test_saturn_ring_is_counted_in_size_and_brightness() {
        let system = default_solar_system().unwrap();
        let obs = observer(&system, 2020, 7, 20, 23, 0);
        let saturn = Planet::find(&system, "Saturn").unwrap();
        assert!(saturn.ring_tilt(&obs).is_some());
        // opposition 2020: about 18.5″ disk, 42″ ring
        let size = saturn.angular_size(&obs).arcsec();
        assert!((40.0..46.0).contains(&size), "size {size}″");
        let mag = saturn.visual_magnitude(&obs);
        assert!((-0.5..0.6).contains(&mag), "magnitude {mag}");
        assert!(Planet::find(&system, "Mars").unwrap().ring_tilt(&obs).is_none());
    }

    #[test]
    fn test_planet_distance_and_light_time() {
        let system = default_solar_system().unwrap();
        let obs = observer(&system, 2020, 10, 13, 23, 0);
        let mars = Planet::find(&system, "Mars").unwrap();
        // Mars at opposition 2020: 0.42 AU
        let d = mars.distance(&obs).unwrap().au();
        assert!((0.40..0.44).contains(&d), "distance {d} AU");
        assert!(mars.rts(&obs).transit >= 0.0);
    }
}
