//! Catalogue stars: J2000 position at an epoch, linear proper motion and annual parallax.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::celestial::CelestialObject;
use crate::constants::{DAYS_PER_JULIAN_YEAR, J2000, JDE, RADSEC};
use crate::math::transform_vector;
use crate::observers::Observer;
use crate::ref_system::{mat_vsop87_to_j2000, sphe_to_rect};
use crate::units::{Angle, Distance};

/// Milliarcseconds to radians.
const MAS: f64 = RADSEC / 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub name: String,
    /// Right ascension on the J2000 equator at [`Star::epoch`].
    pub ra: Angle,
    /// Declination on the J2000 equator at [`Star::epoch`].
    pub dec: Angle,
    /// Catalogue epoch of the position.
    pub epoch: JDE,
    /// Proper motion in right ascension, `μα·cos δ`, in mas/yr.
    pub pm_ra: f64,
    /// Proper motion in declination, in mas/yr.
    pub pm_dec: f64,
    /// Annual parallax in mas; zero when unknown.
    pub parallax: f64,
    pub magnitude: f64,
    /// `B − V` colour index.
    pub color_index: f64,
}

impl Star {
    pub fn new(name: impl Into<String>, ra: Angle, dec: Angle, magnitude: f64) -> Self {
        Star {
            name: name.into(),
            ra,
            dec,
            epoch: J2000,
            pm_ra: 0.0,
            pm_dec: 0.0,
            parallax: 0.0,
            magnitude,
            color_index: 0.0,
        }
    }

    pub fn with_proper_motion(mut self, pm_ra: f64, pm_dec: f64) -> Self {
        self.pm_ra = pm_ra;
        self.pm_dec = pm_dec;
        self
    }

    pub fn with_parallax(mut self, parallax: f64) -> Self {
        self.parallax = parallax;
        self
    }

    pub fn with_epoch(mut self, epoch: JDE) -> Self {
        self.epoch = epoch;
        self
    }

    /// Heliocentric J2000 unit direction at `jde`, proper motion applied.
    pub fn catalog_direction(&self, jde: JDE) -> Vector3<f64> {
        let years = (jde - self.epoch) / DAYS_PER_JULIAN_YEAR;
        let dec = self.dec + Angle::from_radians(self.pm_dec * MAS * years);
        let cos_dec = self.dec.cos();
        let ra = if cos_dec.abs() > f64::EPSILON {
            self.ra + Angle::from_radians(self.pm_ra * MAS * years / cos_dec)
        } else {
            self.ra
        };
        sphe_to_rect(ra, dec)
    }

    /// Distance from the Sun, from the parallax.
    pub fn heliocentric_distance(&self) -> Option<Distance> {
        (self.parallax > 0.0).then(|| Distance::from_au(1.0 / (self.parallax * MAS)))
    }
}

impl CelestialObject for Star {
    /// With a parallax, the observer-relative position in AU; otherwise the catalogue unit
    /// direction.
    fn j2000_equatorial_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        let direction = self.catalog_direction(observer.jde());
        match self.heliocentric_distance() {
            Some(distance) => {
                let site =
                    transform_vector(&mat_vsop87_to_j2000(), &observer.heliocentric_position());
                direction * distance.au() - site
            }
            None => direction,
        }
    }

    fn visual_magnitude(&self, _observer: &Observer<'_>) -> f64 {
        self.magnitude
    }

    fn angular_size(&self, _observer: &Observer<'_>) -> Angle {
        Angle::ZERO
    }

    fn distance(&self, observer: &Observer<'_>) -> Option<Distance> {
        self.heliocentric_distance()
            .map(|_| Distance::from_au(self.j2000_equatorial_position(observer).norm()))
    }
}
