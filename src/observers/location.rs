//! Observing sites on the surface of a body.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::constants::{Degree, Kilometer, Radian};
use crate::units::{Angle, Distance};

/// A named site: geodetic latitude, east-positive longitude and altitude above the
/// reference ellipsoid of its home body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: Angle,
    pub longitude: Angle,
    pub altitude: Distance,
}

impl Location {
    /// Build and validate a site.
    ///
    /// Arguments
    /// ---------
    /// * `name`: free-form label.
    /// * `latitude`: geodetic latitude in degrees, within `[−90°, 90°]`.
    /// * `longitude`: east longitude in degrees; any finite value, stored in `(−180°, 180°]`.
    /// * `altitude`: height above the ellipsoid in metres.
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::InvalidLocation`] for a latitude outside `[−90°, 90°]` or a
    ///   non-finite coordinate.
    pub fn new(
        name: impl Into<String>,
        latitude: Degree,
        longitude: Degree,
        altitude: f64,
    ) -> Result<Self, AlmagestError> {
        let name = name.into();
        if !(latitude.is_finite() && longitude.is_finite() && altitude.is_finite()) {
            return Err(AlmagestError::InvalidLocation(format!(
                "{name}: non-finite coordinate ({latitude}, {longitude}, {altitude} m)"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AlmagestError::InvalidLocation(format!(
                "{name}: latitude {latitude}° outside [-90°, 90°]"
            )));
        }
        Ok(Location {
            name,
            latitude: Angle::from_degrees(latitude),
            longitude: Angle::from_degrees(longitude).normalized_signed(),
            altitude: Distance::from_meters(altitude),
        })
    }
}

impl Default for Location {
    /// The centre of the body, at sea level.
    fn default() -> Self {
        Location {
            name: String::from("Null Island"),
            latitude: Angle::ZERO,
            longitude: Angle::ZERO,
            altitude: Distance::ZERO,
        }
    }
}

/// Geocentric parallax constants of a site on an oblate body.
///
/// The closed-form reduction from geodetic to geocentric coordinates (Meeus ch. 11), generalised
/// to any body through its equatorial radius and flattening.
///
/// Arguments
/// ---------
/// * `lat`: geodetic latitude in radians.
/// * `height`: altitude above the ellipsoid in kilometres.
/// * `equatorial_radius`: body equatorial radius in kilometres.
/// * `flattening`: `(a − c)/a`.
///
/// Returns
/// --------
/// * `(ρ·sinφ′, ρ·cosφ′)` in units of the equatorial radius.
pub fn geodetic_to_parallax(
    lat: Radian,
    height: Kilometer,
    equatorial_radius: Kilometer,
    flattening: f64,
) -> Vector2<f64> {
    let axis_ratio = 1.0 - flattening;
    let h = if equatorial_radius > 0.0 {
        height / equatorial_radius
    } else {
        0.0
    };
    // reduced latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());
    Vector2::new(
        axis_ratio * u.sin() + h * lat.sin(),
        u.cos() + h * lat.cos(),
    )
}
