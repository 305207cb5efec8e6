//! Solar eclipses: Besselian elements of the lunar shadow and its central line on the
//! Earth's ellipsoid.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::celestial::{CelestialObject, Planet};
use crate::constants::{AU, EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING, SUN_RADIUS_KM};
use crate::eclipse::RA_PREFILTER;
use crate::observers::{Location, Observer};
use crate::ref_system::rect_to_sphe;
use crate::units::Angle;

/// Moon radius in Earth equatorial radii, the IAU value used for Besselian elements.
const MOON_EARTH_RADIUS_RATIO: f64 = 0.272_507_6;

/// Besselian elements of the lunar shadow at one instant.
///
/// The fundamental plane passes through the Earth's centre, perpendicular to the shadow axis of
/// direction `(a, d)`. Lengths are in Earth equatorial radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BesselianElements {
    /// Shadow axis on the fundamental plane, towards the east.
    pub x: f64,
    /// Shadow axis on the fundamental plane, towards the north.
    pub y: f64,
    /// Declination of the shadow axis.
    pub d: Angle,
    /// Greenwich hour angle of the shadow axis.
    pub mu: Angle,
    /// Penumbral cone radius on the fundamental plane.
    pub l1: f64,
    /// Umbral cone radius on the fundamental plane; negative for a total eclipse.
    pub l2: f64,
    /// Half-angle of the penumbral cone.
    pub f1: Angle,
    /// Half-angle of the umbral cone.
    pub f2: Angle,
}

impl BesselianElements {
    /// Elements from geocentric equatorial positions (AU) of the Sun and the Moon and the
    /// Greenwich apparent sidereal time.
    ///
    /// Returns
    /// --------
    /// * `None` when the right-ascension separation exceeds the pre-filter.
    pub fn from_positions(sun: &Vector3<f64>, moon: &Vector3<f64>, gast: Angle) -> Option<Self> {
        let (sun_ra, sun_dec) = rect_to_sphe(sun);
        let (moon_ra, moon_dec) = rect_to_sphe(moon);
        let delta_ra = (moon_ra - sun_ra).normalized_signed();
        if delta_ra.abs() > RA_PREFILTER {
            return None;
        }

        let rss = sun.norm() * AU / EARTH_EQUATORIAL_RADIUS_KM;
        let mde = moon.norm() * AU / EARTH_EQUATORIAL_RADIUS_KM;
        let b = mde / rss;

        let a = sun_ra - delta_ra * (b * moon_dec.cos() / ((1.0 - b) * sun_dec.cos()));
        let d = sun_dec - (moon_dec - sun_dec) * (b / (1.0 - b));
        let h = moon_ra - a;

        let x = mde * moon_dec.cos() * h.sin();
        let y = mde * (d.cos() * moon_dec.sin() - moon_dec.cos() * d.sin() * h.cos());
        let z = mde * (moon_dec.sin() * d.sin() + moon_dec.cos() * d.cos() * h.cos());

        let s = SUN_RADIUS_KM / EARTH_EQUATORIAL_RADIUS_KM;
        let k = MOON_EARTH_RADIUS_RATIO;
        let f1 = ((s + k) / (rss * (1.0 - b))).asin();
        let f2 = ((s - k) / (rss * (1.0 - b))).asin();
        let l1 = z * f1.tan() + k / f1.cos();
        let l2 = z * f2.tan() - k / f2.cos();

        Some(BesselianElements {
            x,
            y,
            d,
            mu: (gast - a).normalized(),
            l1,
            l2,
            f1: Angle::from_radians(f1),
            f2: Angle::from_radians(f2),
        })
    }

    /// Where the shadow axis meets the ellipsoid, with the eclipse magnitude there.
    ///
    /// Returns
    /// --------
    /// * `None` when the axis misses the Earth.
    pub fn central_point(&self) -> Option<(GroundPosition, f64)> {
        let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
        let axis_ratio = (1.0 - e2).sqrt();
        let (sin_d, cos_d) = (self.d.sin(), self.d.cos());

        let rho1 = (1.0 - e2 * cos_d * cos_d).sqrt();
        let rho2 = (1.0 - e2 * sin_d * sin_d).sqrt();
        let y1 = self.y / rho1;
        let sd1 = sin_d / rho1;
        let cd1 = axis_ratio * cos_d / rho1;
        let sd1d2 = e2 * sin_d * cos_d / (rho1 * rho2);
        let cd1d2 = (1.0 - sd1d2 * sd1d2).sqrt();

        let p = 1.0 - self.x * self.x - y1 * y1;
        if p <= 0.0 {
            return None;
        }
        let zeta1 = p.sqrt();
        let zeta = rho2 * (zeta1 * cd1d2 - y1 * sd1d2);

        let theta = self.x.atan2(-y1 * sd1 + zeta1 * cd1);
        let longitude = (Angle::from_radians(theta) - self.mu).normalized_signed();
        let sfn1 = y1 * cd1 + zeta1 * sd1;
        let latitude = (sfn1 / (axis_ratio * (1.0 - sfn1 * sfn1).sqrt())).atan();

        let l1 = self.l1 - zeta * self.f1.tan();
        let l2 = self.l2 - zeta * self.f2.tan();
        let magnitude = l1 / (l1 + l2);

        Some((
            GroundPosition {
                latitude: Angle::from_radians(latitude),
                longitude,
            },
            magnitude,
        ))
    }
}

/// A point of the Earth's surface; east-positive longitude in `(−π, π]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPosition {
    pub latitude: Angle,
    pub longitude: Angle,
}

impl GroundPosition {
    /// Great-circle distance on the equatorial-radius sphere, in kilometres.
    pub fn distance_km(&self, other: &GroundPosition) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        let h = (dlat.radians() / 2.0).sin().powi(2)
            + self.latitude.cos() * other.latitude.cos() * (dlon.radians() / 2.0).sin().powi(2);
        2.0 * EARTH_EQUATORIAL_RADIUS_KM * h.sqrt().min(1.0).asin()
    }

    /// Initial bearing towards `other`, from the north through the east.
    pub fn azimuth_to(&self, other: &GroundPosition) -> Angle {
        let dlon = other.longitude - self.longitude;
        let y = dlon.sin() * other.latitude.cos();
        let x = self.latitude.cos() * other.latitude.sin()
            - self.latitude.sin() * other.latitude.cos() * dlon.cos();
        Angle::from_radians(y.atan2(x)).normalized()
    }
}

impl From<&Location> for GroundPosition {
    fn from(location: &Location) -> Self {
        GroundPosition {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Circumstances of a solar eclipse at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEclipse {
    pub elements: BesselianElements,
    /// Where the shadow axis meets the ground.
    pub ground_position: GroundPosition,
    /// `L1/(L1 + L2)` at the ground point: above one for a total eclipse, below for annular.
    pub magnitude: f64,
    /// From the site to the ground point, when a site is given.
    pub distance_km: Option<f64>,
    pub azimuth: Option<Angle>,
}

impl SolarEclipse {
    /// Solar eclipse at the observer's instant, with the distance and bearing from its site to
    /// the central line.
    ///
    /// Returns
    /// --------
    /// * `Ok(None)` when the Sun and the Moon are too far apart in right ascension or when the
    ///   shadow axis misses the Earth.
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::BodyNotFound`] when the observer's system has no "Sun" or "Moon".
    pub fn compute(observer: &Observer<'_>) -> Result<Option<Self>, AlmagestError> {
        let system = observer.system();
        let sun = Planet::find(system, "Sun")?;
        let moon = Planet::find(system, "Moon")?;
        let geocentric = observer.geocentric();
        let Some(elements) = BesselianElements::from_positions(
            &sun.equinox_equatorial_position(&geocentric),
            &moon.equinox_equatorial_position(&geocentric),
            geocentric.home_sidereal_time(),
        ) else {
            return Ok(None);
        };
        Ok(Self::from_elements(elements, Some(observer.location())))
    }

    /// Eclipse circumstances from Besselian elements, optionally relative to a site.
    pub fn from_elements(elements: BesselianElements, site: Option<&Location>) -> Option<Self> {
        let (ground_position, magnitude) = elements.central_point()?;
        let site = site.map(GroundPosition::from);
        Some(SolarEclipse {
            elements,
            ground_position,
            magnitude,
            distance_km: site.map(|s| s.distance_km(&ground_position)),
            azimuth: site.map(|s| s.azimuth_to(&ground_position)),
        })
    }

    /// Total eclipse on the central line; annular when false.
    pub fn is_total(&self) -> bool {
        self.magnitude >= 1.0
    }
}

#[cfg(test)]
mod solar_test {
    use super::*;
    use crate::bodies::catalog::default_solar_system;
    use crate::observers::ObserverConfig;
    use crate::time::JulianDay;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_moon_on_the_sun_earth_line() {
        let sun = Vector3::x();
        let moon = Vector3::x() * (360_000.0 / AU);
        let elements = BesselianElements::from_positions(&sun, &moon, Angle::ZERO).unwrap();
        assert_abs_diff_eq!(elements.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(elements.y, 0.0, epsilon = 1e-12);
        assert!(elements.l2 < 0.0);

        let site = Location::new("Equator 10E", 0.0, 10.0, 0.0).unwrap();
        let eclipse = SolarEclipse::from_elements(elements, Some(&site)).unwrap();
        assert_abs_diff_eq!(eclipse.ground_position.latitude.degrees(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(eclipse.ground_position.longitude.degrees(), 0.0, epsilon = 1e-9);
        assert!(eclipse.is_total());
        // ten degrees of the equator, due west
        let expected = 10.0_f64.to_radians() * EARTH_EQUATORIAL_RADIUS_KM;
        assert_abs_diff_eq!(eclipse.distance_km.unwrap(), expected, epsilon = 1e-6);
        assert_abs_diff_eq!(eclipse.azimuth.unwrap().degrees(), 270.0, epsilon = 1e-9);
    }

    fn elements(x: f64, y: f64, d: f64, mu: f64) -> BesselianElements {
        BesselianElements {
            x,
            y,
            d: Angle::from_degrees(d),
            mu: Angle::from_degrees(mu),
            l1: 0.54,
            l2: -0.008,
            f1: Angle::from_radians(0.004_668_3_f64.atan()),
            f2: Angle::from_radians(0.004_645_0_f64.atan()),
        }
    }

    /// Shadow axis intersected with the ellipsoid in Earth-fixed axes: geodetic latitude and
    /// longitude in degrees, and the height of the point above the fundamental plane.
    fn axis_on_ellipsoid(el: &BesselianElements) -> (f64, f64, f64) {
        let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
        let (sd, cd) = (el.d.sin(), el.d.cos());
        let (sm, cm) = (el.mu.sin(), el.mu.cos());
        let zeta = Vector3::new(cd * cm, -cd * sm, sd);
        let xi = Vector3::new(sm, cm, 0.0);
        let eta = Vector3::new(-sd * cm, sd * sm, cd);
        let origin = xi * el.x + eta * el.y;

        let w = Vector3::new(1.0, 1.0, 1.0 / (1.0 - e2));
        let a = w.dot(&zeta.component_mul(&zeta));
        let b = 2.0 * w.dot(&origin.component_mul(&zeta));
        let c = w.dot(&origin.component_mul(&origin)) - 1.0;
        let t = (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);
        let p = origin + zeta * t;

        let latitude = (p.z / ((1.0 - e2) * p.x.hypot(p.y))).atan().to_degrees();
        (latitude, p.y.atan2(p.x).to_degrees(), t)
    }

    #[test]
    fn test_central_point_on_the_ellipsoid() {
        // axis through the Earth's centre: geodetic latitude from tan φ = tan d / (1 − e²)
        let through_centre = elements(0.0, 0.0, 20.0, 30.0);
        let (ground, magnitude) = through_centre.central_point().unwrap();
        assert_abs_diff_eq!(ground.latitude.degrees(), 20.124_007, epsilon = 1e-6);
        assert_abs_diff_eq!(ground.longitude.degrees(), -30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(magnitude, 1.024_189, epsilon = 1e-6);

        // southern declination, axis off centre towards the east and the south
        let offset = elements(0.3, -0.4, -15.0, 250.0);
        let (ground, magnitude) = offset.central_point().unwrap();
        let (latitude, longitude, height) = axis_on_ellipsoid(&offset);
        assert_abs_diff_eq!(latitude, -37.841_321, epsilon = 1e-6);
        assert_abs_diff_eq!(longitude, 132.296_899, epsilon = 1e-6);
        assert_abs_diff_eq!(ground.latitude.degrees(), latitude, epsilon = 1e-9);
        assert_abs_diff_eq!(ground.longitude.degrees(), longitude, epsilon = 1e-9);

        let l1 = offset.l1 - height * offset.f1.tan();
        let l2 = offset.l2 - height * offset.f2.tan();
        assert_abs_diff_eq!(magnitude, l1 / (l1 + l2), epsilon = 1e-12);
        assert_abs_diff_eq!(magnitude, 1.022_933, epsilon = 1e-6);
    }

    #[test]
    fn test_bearing_quadrants() {
        let origin = GroundPosition {
            latitude: Angle::ZERO,
            longitude: Angle::ZERO,
        };
        let at = |lat: f64, lon: f64| GroundPosition {
            latitude: Angle::from_degrees(lat),
            longitude: Angle::from_degrees(lon),
        };
        assert_abs_diff_eq!(origin.azimuth_to(&at(10.0, 0.0)).degrees(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.azimuth_to(&at(0.0, 10.0)).degrees(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.azimuth_to(&at(-10.0, 0.0)).degrees(), 180.0, epsilon = 1e-9);
        // atan2(sin 45° cos 45°, sin 45°)
        assert_abs_diff_eq!(
            origin.azimuth_to(&at(45.0, 45.0)).degrees(),
            35.264_390,
            epsilon = 1e-6
        );
        let quarter = std::f64::consts::FRAC_PI_2 * EARTH_EQUATORIAL_RADIUS_KM;
        assert_abs_diff_eq!(origin.distance_km(&at(90.0, 0.0)), quarter, epsilon = 1e-6);
    }

    #[test]
    fn test_far_moon_gives_an_annular_eclipse() {
        let sun = Vector3::x();
        let moon = Vector3::x() * (405_000.0 / AU);
        let elements = BesselianElements::from_positions(&sun, &moon, Angle::ZERO).unwrap();
        let eclipse = SolarEclipse::from_elements(elements, None).unwrap();
        assert!(!eclipse.is_total());
        assert!(eclipse.magnitude > 0.9);
        assert!(eclipse.distance_km.is_none() && eclipse.azimuth.is_none());
    }

    #[test]
    fn test_shadow_axis_missing_the_earth() {
        let sun = Vector3::x();
        // two Earth radii north of the axis
        let moon = Vector3::new(360_000.0, 0.0, 2.0 * EARTH_EQUATORIAL_RADIUS_KM) / AU;
        let elements = BesselianElements::from_positions(&sun, &moon, Angle::ZERO).unwrap();
        assert!(elements.y > 1.0);
        assert!(SolarEclipse::from_elements(elements, None).is_none());
    }

    #[test]
    fn test_great_american_eclipse_2024() {
        let system = default_solar_system().unwrap();
        let site = Location::new("Dallas", 32.7767, -96.7970, 140.0).unwrap();
        let jd = JulianDay::from_calendar(2024, 4, 8, 18, 17, 20.0).unwrap();
        let obs = Observer::on_earth(&system, site, jd, ObserverConfig::default()).unwrap();
        let eclipse = SolarEclipse::compute(&obs).unwrap().expect("eclipse in progress");
        // greatest eclipse at 25.3N 104.1W, magnitude 1.0566; the built-in lunar theory is
        // only good to a fraction of a degree
        assert!((0.98..1.12).contains(&eclipse.magnitude), "{eclipse:?}");
        assert_abs_diff_eq!(eclipse.ground_position.latitude.degrees(), 25.3, epsilon = 12.0);
        assert_abs_diff_eq!(eclipse.ground_position.longitude.degrees(), -104.1, epsilon = 15.0);
        assert!(eclipse.distance_km.unwrap() < 3000.0);
    }

    #[test]
    fn test_no_solar_eclipse_at_full_moon() {
        let system = default_solar_system().unwrap();
        let jd = JulianDay::from_calendar(2024, 4, 23, 23, 49, 0.0).unwrap();
        let obs = Observer::on_earth(&system, Location::default(), jd, ObserverConfig::default())
            .unwrap();
        assert!(SolarEclipse::compute(&obs).unwrap().is_none());
    }
}
