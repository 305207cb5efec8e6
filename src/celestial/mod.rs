//! # Celestial objects
//!
//! [`CelestialObject`] is the capability shared by solar-system bodies ([`Planet`]), stars
//! ([`Star`]) and deep-sky objects ([`Nebula`]). Each implementor supplies three primitives:
//!
//! * [`CelestialObject::j2000_equatorial_position`]: observer-relative J2000 vector,
//! * [`CelestialObject::visual_magnitude`]: magnitude above the atmosphere,
//! * [`CelestialObject::angular_size`]: apparent diameter.
//!
//! Every other coordinate and quantity is derived from those and an [`Observer`]:
//!
//! | Quantity | Derivation |
//! |----------|------------|
//! | equinox-equatorial | J2000 → home equator of date |
//! | AltAz geometric / apparent | J2000 → AltAz, optionally refracted |
//! | sidereal (hour-angle) frame | equinox-equatorial rotated by `−LST` |
//! | J2000 ecliptic, ecliptic of date | tilt by `ε₀` / by the obliquity of date |
//! | galactic, supergalactic | static rotations of J2000 |
//! | airmass, extinction | from the AltAz elevation |
//! | rise / transit / set | [`rts`] |
//!
//! ## See also
//! ------------
//! * [`Observer`] – frames and atmosphere models.
//! * [`rts::rise_transit_set`] – the rise and set computation itself.

pub mod nebula;
pub mod planet;
pub mod rts;
pub mod star;

use nalgebra::Vector3;

use crate::atmosphere::extinction::airmass;
use crate::math::{transform_vector, zrotation};
use crate::observers::{Frame, Observer};
use crate::ref_system::{mat_j2000_to_vsop87, rect_to_sphe};
use crate::units::{Angle, Distance};

pub use nebula::{Nebula, NebulaKind};
pub use planet::Planet;
pub use rts::RiseTransitSet;
pub use star::Star;

/// Azimuth (from the north through the east) and altitude of an AltAz vector.
pub fn az_alt(alt_az: &Vector3<f64>) -> (Angle, Angle) {
    let (lng, alt) = rect_to_sphe(alt_az);
    let az = (Angle::from_radians(std::f64::consts::PI) - lng).normalized();
    (az, alt)
}

pub trait CelestialObject {
    /// Position relative to the observer, J2000 equatorial. AU for solar-system objects;
    /// catalogue objects without a distance return a unit vector.
    fn j2000_equatorial_position(&self, observer: &Observer<'_>) -> Vector3<f64>;

    /// Visual magnitude above the atmosphere.
    fn visual_magnitude(&self, observer: &Observer<'_>) -> f64;

    /// Apparent diameter.
    fn angular_size(&self, observer: &Observer<'_>) -> Angle;

    /// Distance from the observer, when known.
    fn distance(&self, observer: &Observer<'_>) -> Option<Distance> {
        Some(Distance::from_au(self.j2000_equatorial_position(observer).norm()))
    }

    fn equinox_equatorial_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.j2000_to_equinox_equ(&self.j2000_equatorial_position(observer))
    }

    /// Equinox-equatorial position of the refracted image.
    fn equinox_equatorial_position_apparent(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.altaz_to_equinox_equ(&self.altaz_position_apparent(observer), false)
    }

    fn altaz_position_geometric(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.j2000_to_altaz(&self.j2000_equatorial_position(observer), false)
    }

    fn altaz_position_apparent(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.j2000_to_altaz(&self.j2000_equatorial_position(observer), true)
    }

    /// Position in the local hour-angle frame.
    fn sidereal_position_geometric(&self, observer: &Observer<'_>) -> Vector3<f64> {
        let mat = zrotation(-observer.local_sidereal_time().radians());
        transform_vector(&mat, &self.equinox_equatorial_position(observer))
    }

    fn sidereal_position_apparent(&self, observer: &Observer<'_>) -> Vector3<f64> {
        let mat = zrotation(-observer.local_sidereal_time().radians());
        transform_vector(&mat, &self.equinox_equatorial_position_apparent(observer))
    }

    fn j2000_ecliptic_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        transform_vector(&mat_j2000_to_vsop87(), &self.j2000_equatorial_position(observer))
    }

    fn ecliptic_of_date_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        transform_vector(
            &observer.mat_equinox_equ_to_ecliptic_of_date(),
            &self.equinox_equatorial_position(observer),
        )
    }

    fn galactic_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.transform(&self.j2000_equatorial_position(observer), Frame::J2000, Frame::Galactic, false)
    }

    fn supergalactic_position(&self, observer: &Observer<'_>) -> Vector3<f64> {
        observer.transform(
            &self.j2000_equatorial_position(observer),
            Frame::J2000,
            Frame::Supergalactic,
            false,
        )
    }

    /// Right ascension and declination on the J2000 equator.
    fn ra_dec_j2000(&self, observer: &Observer<'_>) -> (Angle, Angle) {
        rect_to_sphe(&self.j2000_equatorial_position(observer))
    }

    /// Right ascension and declination on the equator of date, of the refracted image when
    /// `apparent`.
    fn ra_dec_of_date(&self, observer: &Observer<'_>, apparent: bool) -> (Angle, Angle) {
        if apparent {
            rect_to_sphe(&self.equinox_equatorial_position_apparent(observer))
        } else {
            rect_to_sphe(&self.equinox_equatorial_position(observer))
        }
    }

    /// Hour angle in `(−π, π]`, positive west of the meridian, and declination of date.
    fn hour_angle_dec(&self, observer: &Observer<'_>) -> (Angle, Angle) {
        let (lng, dec) = rect_to_sphe(&self.sidereal_position_geometric(observer));
        ((-lng).normalized_signed(), dec)
    }

    fn az_alt(&self, observer: &Observer<'_>, apparent: bool) -> (Angle, Angle) {
        if apparent {
            az_alt(&self.altaz_position_apparent(observer))
        } else {
            az_alt(&self.altaz_position_geometric(observer))
        }
    }

    /// Rozenberg airmass of the refracted line of sight, `None` below the horizon.
    fn airmass(&self, observer: &Observer<'_>) -> Option<f64> {
        let v = self.altaz_position_apparent(observer);
        let length = v.norm();
        if length == 0.0 || v.z < 0.0 {
            return None;
        }
        Some(airmass(v.z / length, true))
    }

    /// Visual magnitude dimmed by the observer's extinction model.
    fn visual_magnitude_with_extinction(&self, observer: &Observer<'_>) -> f64 {
        observer
            .extinction()
            .forward(&self.altaz_position_geometric(observer), self.visual_magnitude(observer))
    }

    /// Altitude of the object's centre at rise and set: the refraction-derived horizon.
    fn rts_horizon(&self, observer: &Observer<'_>) -> Angle {
        Angle::from_degrees(observer.refraction().horizon_altitude())
    }

    fn rts(&self, observer: &Observer<'_>) -> RiseTransitSet {
        let ut_hours = (observer.jd().value() + 0.5).rem_euclid(1.0) * 24.0;
        rts::rise_transit_set(
            &self.sidereal_position_geometric(observer),
            observer.location().latitude,
            ut_hours,
            observer.day_ratio(),
            self.rts_horizon(observer),
        )
    }
}

#[cfg(test)]
mod celestial_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_az_alt_convention() {
        // x south, y east, z zenith
        let (az, alt) = az_alt(&Vector3::new(-1.0, 0.0, 0.0));
        assert_abs_diff_eq!(az.degrees(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(alt.degrees(), 0.0, epsilon = 1e-12);
        let (az, _) = az_alt(&Vector3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(az.degrees(), 90.0, epsilon = 1e-12);
        let (az, _) = az_alt(&Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(az.degrees(), 180.0, epsilon = 1e-12);
        let (az, alt) = az_alt(&Vector3::new(0.0, -1.0, 1.0));
        assert_abs_diff_eq!(az.degrees(), 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(alt.degrees(), 45.0, epsilon = 1e-12);
    }
}
