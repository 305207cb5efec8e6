#![allow(dead_code)]

use almagest::bodies::catalog::default_solar_system;
use almagest::bodies::SolarSystem;
use almagest::observers::{Location, Observer, ObserverConfig};
use almagest::time::JulianDay;

/// Pico dos Dias observatory, Brazil.
pub fn pico_dos_dias() -> Location {
    Location::new("Pico dos Dias", -22.53, -45.58, 1864.0).unwrap()
}

pub fn greenwich() -> Location {
    Location::new("Greenwich", 51.4769, 0.0, 46.0).unwrap()
}

pub fn solar_system() -> SolarSystem {
    default_solar_system().unwrap()
}

pub fn jd(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> JulianDay {
    JulianDay::from_calendar(year, month, day, hour, minute, 0.0).unwrap()
}

pub fn observer_at(system: &SolarSystem, site: Location, jd: JulianDay) -> Observer<'_> {
    Observer::on_earth(system, site, jd, ObserverConfig::default()).unwrap()
}

/// Absolute difference of two angles in degrees, across the 0/360 wrap.
pub fn angle_diff_deg(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
