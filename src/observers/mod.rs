//! # Observer: one site, one instant, every frame
//!
//! An [`Observer`] is the aggregation root of the engine. Given a home body, a [`Location`] on it,
//! a UT instant and an [`ObserverConfig`], it derives once and for all the frame transforms
//! needed to turn heliocentric body positions and catalogue directions into what the site sees.
//!
//! ## Frames
//!
//! ```text
//!  AltAz ──Rz(LST)·Ry(90°−φ)──▶ Equinox-equatorial ──(home orientation)──▶ J2000 ──Rx(−ε₀)──▶ VSOP87
//!    │                                                                        │
//!    └───────── translation by the site offset and the home position ─────────┴──▶ heliocentric
//! ```
//!
//! * **AltAz**: x to the south, y to the east, z to the zenith. Azimuths are reported from the
//!   north through the east.
//! * **Equinox-equatorial**: the home body's equator of date (for the Earth, the true or mean
//!   equator and equinox depending on [`ObserverConfig::use_nutation`]).
//! * **J2000**: mean equator and equinox of J2000.0.
//! * **VSOP87**: mean ecliptic of J2000.0, the frame of every heliocentric position.
//! * **Galactic**, **Supergalactic**: static rotations of J2000.
//!
//! ## Construction order
//!
//! 1. `jde = jd + ΔT(jd)` with the configured [`TimeCorrection`](crate::time::delta_t::TimeCorrection).
//! 2. Local sidereal time = home sidereal time + east longitude.
//! 3. AltAz → equinox-equatorial, then equinox-equatorial → J2000 from the home body's equatorial
//!    orientation, composed into AltAz → J2000.
//! 4. With [`ObserverConfig::use_topocentric_coordinates`], the site's offset from the body
//!    centre (closed-form geodetic reduction) is folded into AltAz → heliocentric.
//! 5. With [`ObserverConfig::use_light_travel_time`], the Sun's light-time-corrected position.
//!
//! An observer is cheap to build; rebuild it rather than mutate it. It owns the position cache
//! used for every body query made through it, so the [`SolarSystem`] it borrows stays immutable.
//!
//! ## See also
//! ------------
//! * [`CelestialObject`](crate::celestial::CelestialObject) – derived coordinates built on these frames.
//! * [`Refraction`], [`Extinction`] – atmosphere models configured here.

pub mod config;
pub mod location;

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Vector3};

use crate::almagest_errors::AlmagestError;
use crate::atmosphere::{Extinction, Refraction};
use crate::bodies::cache::PositionCache;
use crate::bodies::{Body, BodyId, SolarSystem};
use crate::constants::{JDE, VLIGHT_AU};
use crate::earth_orientation::{mean_obliquity, nutation::nutation};
use crate::math::{
    inverse_or_identity, transform_point, transform_vector, translation, xrotation, yrotation,
    zrotation,
};
use crate::orbit::StateVector;
use crate::ref_system::{
    mat_galactic_to_supergalactic, mat_j2000_to_galactic, mat_j2000_to_vsop87,
    mat_vsop87_to_j2000,
};
use crate::time::JulianDay;
use crate::units::Angle;

pub use config::{ObserverConfig, RefractionConfig};
pub use location::{geodetic_to_parallax, Location};

/// Reference frames an [`Observer`] can convert between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    AltAz,
    EquinoxEquatorial,
    J2000,
    Vsop87,
    Galactic,
    Supergalactic,
}

/// A body's heliocentric state as seen by an observer, after the optional light-time
/// correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Heliocentric VSOP87 position (AU).
    pub position: Vector3<f64>,
    /// Heliocentric VSOP87 velocity (AU/day).
    pub velocity: Vector3<f64>,
    /// Date the state was evaluated at: the observer's JDE minus the light time.
    pub jde: JDE,
    /// Body equator to VSOP87 at [`BodyState::jde`].
    pub mat_equatorial_to_vsop87: Matrix4<f64>,
}

#[derive(Debug)]
pub struct Observer<'a> {
    system: &'a SolarSystem,
    home: BodyId,
    location: Location,
    config: ObserverConfig,
    jd: JulianDay,
    jde: JDE,
    home_sidereal_time: Angle,
    local_sidereal_time: Angle,
    home_state: StateVector,
    /// Site position, heliocentric VSOP87.
    position: Vector3<f64>,
    sun_light_time_position: Vector3<f64>,
    mat_altaz_to_equinox_equ: Matrix4<f64>,
    mat_equinox_equ_to_j2000: Matrix4<f64>,
    mat_altaz_to_j2000: Matrix4<f64>,
    mat_altaz_to_helio: Matrix4<f64>,
    mat_helio_to_altaz: Matrix4<f64>,
    refraction: Refraction,
    extinction: Extinction,
    cache: PositionCache,
}

/// Offset of the site from its body's centre, in the site's AltAz frame (AU).
fn site_offset(body: &Body, location: &Location) -> Vector3<f64> {
    let radius = body.equatorial_radius;
    let rho = geodetic_to_parallax(
        location.latitude.radians(),
        location.altitude.kilometers(),
        radius.kilometers(),
        body.oblateness,
    );
    let rho_len = rho.norm();
    if rho_len == 0.0 {
        return Vector3::zeros();
    }
    // the geocentric radius leans towards the equator, i.e. towards +x (south) in the north
    let sigma = location.latitude.radians() - rho.x.atan2(rho.y);
    Vector3::new(sigma.sin(), 0.0, sigma.cos()) * (rho_len * radius.au())
}

impl<'a> Observer<'a> {
    /// Build the observer snapshot.
    ///
    /// Arguments
    /// ---------
    /// * `system`: the body hierarchy, shared and never mutated.
    /// * `home`: body the site stands on.
    /// * `location`: the site.
    /// * `jd`: the instant in UT.
    /// * `config`: frame and model switches.
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::BodyNotFound`] when `home` is not part of `system`.
    pub fn new(
        system: &'a SolarSystem,
        home: BodyId,
        location: Location,
        jd: JulianDay,
        config: ObserverConfig,
    ) -> Result<Self, AlmagestError> {
        if system.get(home).is_none() {
            return Err(AlmagestError::BodyNotFound(format!(
                "no body with id {} in a system of {}",
                home.index(),
                system.len()
            )));
        }
        Ok(Self::build(system, home, location, jd, config))
    }

    /// Observer standing on the body named "Earth".
    pub fn on_earth(
        system: &'a SolarSystem,
        location: Location,
        jd: JulianDay,
        config: ObserverConfig,
    ) -> Result<Self, AlmagestError> {
        let earth = system.find("Earth")?;
        Self::new(system, earth, location, jd, config)
    }

    fn build(
        system: &'a SolarSystem,
        home: BodyId,
        location: Location,
        jd: JulianDay,
        config: ObserverConfig,
    ) -> Self {
        let body = &system[home];
        let with_nutation = config.use_nutation;
        let jde = config.time_correction.ut_to_tt(jd).value();
        let cache = PositionCache::new();

        let home_sidereal_time = body.rotation().sidereal_time(jd.value(), jde, with_nutation);
        let local_sidereal_time = (home_sidereal_time + location.longitude).normalized();

        let mat_altaz_to_equinox_equ = zrotation(local_sidereal_time.radians())
            * yrotation(FRAC_PI_2 - location.latitude.radians());
        let mat_equinox_equ_to_j2000 =
            mat_vsop87_to_j2000() * system.mat_equatorial_to_vsop87(home, jde, with_nutation);
        let mat_altaz_to_j2000 = mat_equinox_equ_to_j2000 * mat_altaz_to_equinox_equ;

        let home_state = system.heliocentric_state(home, jde, &cache);
        let offset = if config.use_topocentric_coordinates {
            site_offset(body, &location)
        } else {
            Vector3::zeros()
        };
        let mat_altaz_to_helio = translation(&home_state.position)
            * mat_j2000_to_vsop87()
            * mat_altaz_to_j2000
            * translation(&offset);
        let mat_helio_to_altaz = inverse_or_identity(&mat_altaz_to_helio);
        let position = transform_point(&mat_altaz_to_helio, &Vector3::zeros());

        let sun_light_time_position = if config.use_light_travel_time {
            let light_time = home_state.position.norm() / VLIGHT_AU;
            home_state.position - system.heliocentric_state(home, jde - light_time, &cache).position
        } else {
            Vector3::zeros()
        };

        log::debug!(
            "observer on {} at '{}' ({}, {}): JD {} JDE {:.6} LST {}",
            body.name(),
            location.name,
            location.latitude,
            location.longitude,
            jd.value(),
            jde,
            local_sidereal_time
        );

        Observer {
            system,
            home,
            refraction: config.refraction(),
            extinction: config.extinction(),
            location,
            config,
            jd,
            jde,
            home_sidereal_time,
            local_sidereal_time,
            home_state,
            position,
            sun_light_time_position,
            mat_altaz_to_equinox_equ,
            mat_equinox_equ_to_j2000,
            mat_altaz_to_j2000,
            mat_altaz_to_helio,
            mat_helio_to_altaz,
            cache,
        }
    }

    /// Same site and instant seen from the centre of the home body.
    pub fn geocentric(&self) -> Observer<'a> {
        let config = ObserverConfig {
            use_topocentric_coordinates: false,
            ..self.config
        };
        Self::build(self.system, self.home, self.location.clone(), self.jd, config)
    }

    /// Same site and configuration at another instant.
    pub fn at(&self, jd: JulianDay) -> Observer<'a> {
        Self::build(self.system, self.home, self.location.clone(), jd, self.config)
    }

    pub fn system(&self) -> &'a SolarSystem {
        self.system
    }

    pub fn home(&self) -> BodyId {
        self.home
    }

    pub fn home_body(&self) -> &'a Body {
        &self.system[self.home]
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn jd(&self) -> JulianDay {
        self.jd
    }

    pub fn jde(&self) -> JDE {
        self.jde
    }

    /// Sidereal time of the home body's prime meridian (Greenwich for the Earth).
    pub fn home_sidereal_time(&self) -> Angle {
        self.home_sidereal_time
    }

    pub fn local_sidereal_time(&self) -> Angle {
        self.local_sidereal_time
    }

    /// Heliocentric VSOP87 state of the home body's centre.
    pub fn home_state(&self) -> StateVector {
        self.home_state
    }

    /// Heliocentric VSOP87 position of the site (AU).
    pub fn heliocentric_position(&self) -> Vector3<f64> {
        self.position
    }

    /// Apparent heliocentric position of the Sun once light time is accounted for:
    /// `home(t) − home(t − τ)`. Zero without light-time correction.
    pub fn sun_light_time_position(&self) -> Vector3<f64> {
        self.sun_light_time_position
    }

    pub fn refraction(&self) -> &Refraction {
        &self.refraction
    }

    pub fn extinction(&self) -> &Extinction {
        &self.extinction
    }

    /// Ratio of the home body's sidereal to solar day.
    pub fn day_ratio(&self) -> f64 {
        self.home_body().day_ratio()
    }

    pub fn mat_altaz_to_equinox_equ(&self) -> Matrix4<f64> {
        self.mat_altaz_to_equinox_equ
    }

    pub fn mat_equinox_equ_to_j2000(&self) -> Matrix4<f64> {
        self.mat_equinox_equ_to_j2000
    }

    pub fn mat_altaz_to_j2000(&self) -> Matrix4<f64> {
        self.mat_altaz_to_j2000
    }

    /// AltAz (site-centred) to heliocentric VSOP87, translations included.
    pub fn mat_altaz_to_helio(&self) -> Matrix4<f64> {
        self.mat_altaz_to_helio
    }

    pub fn mat_helio_to_altaz(&self) -> Matrix4<f64> {
        self.mat_helio_to_altaz
    }

    /// Equinox-equatorial to the ecliptic of date: a tilt by the mean obliquity of date, plus
    /// the nutation in obliquity when enabled.
    pub fn mat_equinox_equ_to_ecliptic_of_date(&self) -> Matrix4<f64> {
        let mut obliquity = mean_obliquity(self.jde);
        if self.config.use_nutation {
            obliquity += nutation(self.jde).delta_epsilon;
        }
        xrotation(-obliquity)
    }

    /// Rotation from `frame` to J2000.
    pub fn mat_frame_to_j2000(&self, frame: Frame) -> Matrix4<f64> {
        match frame {
            Frame::AltAz => self.mat_altaz_to_j2000,
            Frame::EquinoxEquatorial => self.mat_equinox_equ_to_j2000,
            Frame::J2000 => Matrix4::identity(),
            Frame::Vsop87 => mat_vsop87_to_j2000(),
            Frame::Galactic => mat_j2000_to_galactic().transpose(),
            Frame::Supergalactic => {
                (mat_galactic_to_supergalactic() * mat_j2000_to_galactic()).transpose()
            }
        }
    }

    /// Rotation from `from` to `to`. Every matrix involved is orthonormal, so the inverse
    /// leg is a transpose.
    pub fn mat_between(&self, from: Frame, to: Frame) -> Matrix4<f64> {
        if from == to {
            return Matrix4::identity();
        }
        self.mat_frame_to_j2000(to).transpose() * self.mat_frame_to_j2000(from)
    }

    /// Rotate the direction `v` from `from` to `to`.
    ///
    /// With `refraction`, an AltAz input is treated as apparent (refraction is removed first)
    /// and an AltAz output is returned apparent (refraction is applied last).
    pub fn transform(
        &self,
        v: &Vector3<f64>,
        from: Frame,
        to: Frame,
        refraction: bool,
    ) -> Vector3<f64> {
        let input = if refraction && from == Frame::AltAz {
            self.refraction.backward(v)
        } else {
            *v
        };
        let output = transform_vector(&self.mat_between(from, to), &input);
        if refraction && to == Frame::AltAz {
            self.refraction.forward(&output)
        } else {
            output
        }
    }

    pub fn j2000_to_altaz(&self, v: &Vector3<f64>, refraction: bool) -> Vector3<f64> {
        self.transform(v, Frame::J2000, Frame::AltAz, refraction)
    }

    pub fn altaz_to_j2000(&self, v: &Vector3<f64>, refraction: bool) -> Vector3<f64> {
        self.transform(v, Frame::AltAz, Frame::J2000, refraction)
    }

    pub fn j2000_to_equinox_equ(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.transform(v, Frame::J2000, Frame::EquinoxEquatorial, false)
    }

    pub fn equinox_equ_to_j2000(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.transform(v, Frame::EquinoxEquatorial, Frame::J2000, false)
    }

    pub fn altaz_to_equinox_equ(&self, v: &Vector3<f64>, refraction: bool) -> Vector3<f64> {
        self.transform(v, Frame::AltAz, Frame::EquinoxEquatorial, refraction)
    }

    pub fn equinox_equ_to_altaz(&self, v: &Vector3<f64>, refraction: bool) -> Vector3<f64> {
        self.transform(v, Frame::EquinoxEquatorial, Frame::AltAz, refraction)
    }

    /// Heliocentric VSOP87 point to a site-relative J2000 vector.
    pub fn helio_to_j2000(&self, p: &Vector3<f64>) -> Vector3<f64> {
        transform_vector(&mat_vsop87_to_j2000(), &(p - self.position))
    }

    /// Heliocentric VSOP87 point to a site-relative AltAz vector.
    pub fn helio_to_altaz(&self, p: &Vector3<f64>) -> Vector3<f64> {
        transform_point(&self.mat_helio_to_altaz, p)
    }

    /// Heliocentric VSOP87 state of `id` at the observer's instant, through the observer's
    /// cache.
    pub fn heliocentric_state(&self, id: BodyId) -> StateVector {
        self.system.heliocentric_state(id, self.jde, &self.cache)
    }

    /// Heliocentric state of `id` corrected for light time.
    ///
    /// With light time enabled the distance from the home body gives a single delay `τ` and
    /// the body is re-evaluated at `jde − τ`; the correction is not iterated. The root body
    /// (the Sun) uses [`Observer::sun_light_time_position`] instead. The home body itself is
    /// never corrected.
    pub fn body_state(&self, id: BodyId) -> BodyState {
        let with_nutation = self.config.use_nutation;
        let geometric = self.heliocentric_state(id);
        let at = |state: StateVector, jde: JDE| BodyState {
            position: state.position,
            velocity: state.velocity,
            jde,
            mat_equatorial_to_vsop87: self.system.mat_equatorial_to_vsop87(id, jde, with_nutation),
        };

        if !self.config.use_light_travel_time || id == self.home {
            return at(geometric, self.jde);
        }
        if self.system[id].parent().is_none() {
            return at(
                StateVector::new(self.sun_light_time_position, geometric.velocity),
                self.jde,
            );
        }
        let light_time = (geometric.position - self.home_state.position).norm() / VLIGHT_AU;
        let jde = self.jde - light_time;
        at(self.system.heliocentric_state(id, jde, &self.cache), jde)
    }

    pub(crate) fn cache(&self) -> &PositionCache {
        &self.cache
    }
}
