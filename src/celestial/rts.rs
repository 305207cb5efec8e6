//! Rise, transit and set times from the hour angle and declination of an object.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::ref_system::rect_to_sphe;
use crate::units::Angle;

/// Rise and set value reported for an object that never sets.
pub const CIRCUMPOLAR: f64 = 100.0;
/// Rise and set value reported for an object that never rises.
pub const NEVER_RISES: f64 = -100.0;

/// Event times in UT hours within `[0, 24)`, or the sentinels above for rise and set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiseTransitSet {
    pub rise: f64,
    pub transit: f64,
    pub set: f64,
}

impl RiseTransitSet {
    pub fn is_circumpolar(&self) -> bool {
        self.rise == CIRCUMPOLAR && self.set == CIRCUMPOLAR
    }

    pub fn never_rises(&self) -> bool {
        self.rise == NEVER_RISES && self.set == NEVER_RISES
    }
}

/// Rise, transit and set around the current day.
///
/// Arguments
/// ---------
/// * `sidereal`: position in the local hour-angle frame, i.e. the equinox-equatorial position
///   rotated by `−LST`; its longitude is minus the hour angle.
/// * `latitude`: site latitude.
/// * `ut_hours`: time of day of the observer's instant, in UT hours.
/// * `day_ratio`: sidereal over solar day of the home body.
/// * `horizon`: altitude of the object's centre at rise and set.
///
/// Returns
/// --------
/// * The transit is always defined. Rise and set are both [`CIRCUMPOLAR`] when `cos H < −1`
///   and both [`NEVER_RISES`] when `cos H > 1`.
pub fn rise_transit_set(
    sidereal: &Vector3<f64>,
    latitude: Angle,
    ut_hours: f64,
    day_ratio: f64,
    horizon: Angle,
) -> RiseTransitSet {
    let (lng, dec) = rect_to_sphe(sidereal);
    let hour_angle = (-lng).normalized_signed();
    let to_solar_hours = 12.0 / std::f64::consts::PI * day_ratio;

    let transit = (ut_hours - hour_angle.radians() * to_solar_hours).rem_euclid(24.0);

    let cos_h = (horizon.sin() - latitude.sin() * dec.sin()) / (latitude.cos() * dec.cos());
    let (rise, set) = if cos_h < -1.0 {
        (CIRCUMPOLAR, CIRCUMPOLAR)
    } else if cos_h > 1.0 {
        (NEVER_RISES, NEVER_RISES)
    } else {
        let half_arc = cos_h.acos() * to_solar_hours;
        (
            (transit - half_arc).rem_euclid(24.0),
            (transit + half_arc).rem_euclid(24.0),
        )
    };
    RiseTransitSet { rise, transit, set }
}
