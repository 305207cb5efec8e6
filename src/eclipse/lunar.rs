//! Lunar eclipses: the Moon against the Earth's penumbral and umbral shadow cones.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::celestial::{CelestialObject, Planet};
use crate::constants::{AU, EARTH_EQUATORIAL_RADIUS_KM, MOON_RADIUS_KM, SUN_RADIUS_KM};
use crate::eclipse::RA_PREFILTER;
use crate::observers::Observer;
use crate::ref_system::rect_to_sphe;
use crate::units::Angle;

/// Danjon's enlargement of the Earth's parallax for the atmosphere.
const DANJON_ENLARGEMENT: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarEclipseKind {
    None,
    Penumbral,
    Partial,
    Total,
}

/// Circumstances of a lunar eclipse at one instant.
///
/// Magnitudes are the fraction of the Moon's diameter inside each shadow; zero when the Moon is
/// clear of it, above one when fully immersed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarEclipse {
    pub penumbral_magnitude: f64,
    pub umbral_magnitude: f64,
    pub kind: LunarEclipseKind,
}

impl LunarEclipse {
    /// No eclipse at all.
    pub const NONE: LunarEclipse = LunarEclipse {
        penumbral_magnitude: 0.0,
        umbral_magnitude: 0.0,
        kind: LunarEclipseKind::None,
    };

    /// Lunar eclipse seen by `observer` at its instant, from the centre of the Earth.
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::BodyNotFound`] when the observer's system has no "Sun" or "Moon".
    pub fn compute(observer: &Observer<'_>) -> Result<Self, AlmagestError> {
        let system = observer.system();
        let sun = Planet::find(system, "Sun")?;
        let moon = Planet::find(system, "Moon")?;
        let geocentric = observer.geocentric();
        Ok(Self::from_positions(
            &sun.equinox_equatorial_position(&geocentric),
            &moon.equinox_equatorial_position(&geocentric),
        ))
    }

    /// Eclipse geometry from geocentric equatorial positions of the Sun and the Moon, in AU.
    ///
    /// The shadow axis points opposite to the Sun. Both cone radii are angular, as seen from
    /// the Earth's centre at the Moon's distance:
    ///
    /// ```text
    /// penumbra = 1.01·π_moon + π_sun + s_sun
    /// umbra    = 1.01·π_moon + π_sun − s_sun
    /// ```
    pub fn from_positions(sun: &Vector3<f64>, moon: &Vector3<f64>) -> Self {
        let (sun_ra, sun_dec) = rect_to_sphe(sun);
        let (moon_ra, moon_dec) = rect_to_sphe(moon);
        let shadow_ra = sun_ra + Angle::from_radians(std::f64::consts::PI);
        let shadow_dec = -sun_dec;

        let delta_ra = (moon_ra - shadow_ra).normalized_signed();
        if delta_ra.abs() > RA_PREFILTER {
            return Self::NONE;
        }

        let sun_km = sun.norm() * AU;
        let moon_km = moon.norm() * AU;
        if sun_km <= 0.0 || moon_km <= EARTH_EQUATORIAL_RADIUS_KM {
            return Self::NONE;
        }
        let moon_parallax = (EARTH_EQUATORIAL_RADIUS_KM / moon_km).asin();
        let sun_parallax = (EARTH_EQUATORIAL_RADIUS_KM / sun_km).asin();
        let sun_semidiameter = (SUN_RADIUS_KM / sun_km).asin();
        let moon_semidiameter = (MOON_RADIUS_KM / moon_km).asin();

        let penumbra = DANJON_ENLARGEMENT * moon_parallax + sun_parallax + sun_semidiameter;
        let umbra = DANJON_ENLARGEMENT * moon_parallax + sun_parallax - sun_semidiameter;

        // Moon centre on the plane tangent to the sky at the shadow axis
        let x = moon_dec.cos() * delta_ra.sin();
        let y = moon_dec.sin() * shadow_dec.cos()
            - moon_dec.cos() * shadow_dec.sin() * delta_ra.cos();
        let separation = x.hypot(y);

        let magnitude = |radius: f64| {
            ((radius + moon_semidiameter - separation) / (2.0 * moon_semidiameter)).max(0.0)
        };
        let penumbral_magnitude = magnitude(penumbra);
        let umbral_magnitude = magnitude(umbra);

        let kind = if umbral_magnitude >= 1.0 {
            LunarEclipseKind::Total
        } else if umbral_magnitude > 0.0 {
            LunarEclipseKind::Partial
        } else if penumbral_magnitude > 0.0 {
            LunarEclipseKind::Penumbral
        } else {
            LunarEclipseKind::None
        };

        LunarEclipse {
            penumbral_magnitude,
            umbral_magnitude,
            kind,
        }
    }

    pub fn is_eclipsing(&self) -> bool {
        self.penumbral_magnitude > 0.0
    }
}
