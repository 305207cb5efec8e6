//! Deep-sky objects: galaxies, clusters and nebulae at fixed J2000 positions.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::celestial::CelestialObject;
use crate::observers::Observer;
use crate::ref_system::sphe_to_rect;
use crate::units::{Angle, Distance};

/// Magnitude reported when a catalogue entry carries neither a V nor a B magnitude.
pub const UNKNOWN_MAGNITUDE: f64 = 99.0;

/// Morphological class of a deep-sky object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NebulaKind {
    Galaxy,
    ActiveGalaxy,
    RadioGalaxy,
    InteractingGalaxy,
    Quasar,
    GalaxyCluster,
    OpenCluster,
    GlobularCluster,
    StellarAssociation,
    StarCloud,
    Nebula,
    PlanetaryNebula,
    DarkNebula,
    ReflectionNebula,
    BipolarNebula,
    EmissionNebula,
    ClusterWithNebulosity,
    HydrogenRegion,
    SupernovaRemnant,
    InterstellarMatter,
    EmissionObject,
    BlLacertae,
    Blazar,
    MolecularCloud,
    YoungStellarObject,
    PossibleQuasar,
    PossiblePlanetaryNebula,
    ProtoplanetaryNebula,
    #[default]
    Unknown,
}

impl NebulaKind {
    pub fn is_galaxy(self) -> bool {
        matches!(
            self,
            NebulaKind::Galaxy
                | NebulaKind::ActiveGalaxy
                | NebulaKind::RadioGalaxy
                | NebulaKind::InteractingGalaxy
                | NebulaKind::Quasar
                | NebulaKind::BlLacertae
                | NebulaKind::Blazar
                | NebulaKind::PossibleQuasar
        )
    }

    pub fn is_cluster(self) -> bool {
        matches!(
            self,
            NebulaKind::GalaxyCluster
                | NebulaKind::OpenCluster
                | NebulaKind::GlobularCluster
                | NebulaKind::StellarAssociation
                | NebulaKind::StarCloud
                | NebulaKind::ClusterWithNebulosity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nebula {
    /// Catalogue designation, e.g. `M 31` or `NGC 7000`.
    pub name: String,
    pub ra: Angle,
    pub dec: Angle,
    pub v_magnitude: Option<f64>,
    pub b_magnitude: Option<f64>,
    pub major_axis: Angle,
    pub minor_axis: Angle,
    pub kind: NebulaKind,
}

impl Nebula {
    pub fn new(name: impl Into<String>, ra: Angle, dec: Angle, kind: NebulaKind) -> Self {
        Nebula {
            name: name.into(),
            ra,
            dec,
            v_magnitude: None,
            b_magnitude: None,
            major_axis: Angle::ZERO,
            minor_axis: Angle::ZERO,
            kind,
        }
    }

    pub fn with_magnitudes(mut self, v: Option<f64>, b: Option<f64>) -> Self {
        self.v_magnitude = v;
        self.b_magnitude = b;
        self
    }

    pub fn with_axes(mut self, major: Angle, minor: Angle) -> Self {
        self.major_axis = major;
        self.minor_axis = minor;
        self
    }

    /// V magnitude, else B, else [`UNKNOWN_MAGNITUDE`].
    pub fn magnitude(&self) -> f64 {
        self.v_magnitude
            .or(self.b_magnitude)
            .unwrap_or(UNKNOWN_MAGNITUDE)
    }

    /// Mean surface brightness in mag/arcmin² over the elliptical outline, when both the
    /// magnitude and the axes are known.
    pub fn surface_brightness(&self) -> Option<f64> {
        let magnitude = self.v_magnitude.or(self.b_magnitude)?;
        let major = self.major_axis.degrees() * 60.0;
        let minor = self.minor_axis.degrees() * 60.0;
        if major <= 0.0 || minor <= 0.0 {
            return None;
        }
        let area = std::f64::consts::FRAC_PI_4 * major * minor;
        Some(magnitude + 2.5 * area.log10())
    }
}

impl CelestialObject for Nebula {
    fn j2000_equatorial_position(&self, _observer: &Observer<'_>) -> Vector3<f64> {
        sphe_to_rect(self.ra, self.dec)
    }

    fn visual_magnitude(&self, _observer: &Observer<'_>) -> f64 {
        self.magnitude()
    }

    fn angular_size(&self, _observer: &Observer<'_>) -> Angle {
        self.major_axis
    }

    fn distance(&self, _observer: &Observer<'_>) -> Option<Distance> {
        None
    }
}

#[cfg(test)]
mod nebula_test {
    use super::*;
    use crate::bodies::catalog::default_solar_system;
    use crate::observers::{Location, ObserverConfig};
    use crate::time::JulianDay;
    use approx::assert_abs_diff_eq;

    fn andromeda() -> Nebula {
        Nebula::new(
            "M 31",
            Angle::from_hours(0.712_306),
            Angle::from_degrees(41.269_065),
            NebulaKind::Galaxy,
        )
        .with_axes(Angle::from_degrees(190.0 / 60.0), Angle::from_degrees(60.0 / 60.0))
    }

    #[test]
    fn test_magnitude_fallback() {
        let m31 = andromeda();
        assert_eq!(m31.magnitude(), UNKNOWN_MAGNITUDE);
        assert!(m31.surface_brightness().is_none());
        let m31 = m31.with_magnitudes(None, Some(4.36));
        assert_eq!(m31.magnitude(), 4.36);
        let m31 = m31.with_magnitudes(Some(3.44), Some(4.36));
        assert_eq!(m31.magnitude(), 3.44);
        // 3.44 + 2.5·log10(π/4·190·60)
        assert_abs_diff_eq!(m31.surface_brightness().unwrap(), 13.320, epsilon = 1e-3);
    }

    #[test]
    fn test_nebula_as_celestial_object() {
        let system = default_solar_system().unwrap();
        let site = Location::new("Paris", 48.8566, 2.3522, 35.0).unwrap();
        let jd = JulianDay::from_calendar(2022, 10, 1, 22, 0, 0.0).unwrap();
        let obs = Observer::on_earth(&system, site, jd, ObserverConfig::default()).unwrap();
        let m31 = andromeda();
        assert!(m31.distance(&obs).is_none());
        assert_abs_diff_eq!(m31.angular_size(&obs).degrees(), 190.0 / 60.0, epsilon = 1e-12);
        let (ra, dec) = m31.ra_dec_j2000(&obs);
        assert_abs_diff_eq!(ra.hours(), 0.712_306, epsilon = 1e-9);
        assert_abs_diff_eq!(dec.degrees(), 41.269_065, epsilon = 1e-9);
        // high in the east-north-east sky on an autumn evening
        let (_, alt) = m31.az_alt(&obs, false);
        assert!(alt.degrees() > 30.0, "altitude {alt}");
        assert!(m31.airmass(&obs).is_some());
        assert!(m31.kind.is_galaxy() && !m31.kind.is_cluster());
    }
}
