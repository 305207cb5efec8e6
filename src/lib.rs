//! # Almagest
//!
//! An ephemeris and reference-frame engine. For an observer (a site on a body and an instant),
//! it computes where solar-system bodies, stars and deep-sky objects appear, how bright they
//! are, when they rise, transit and set, and the circumstances of solar and lunar eclipses.
//!
//! ## Layers
//!
//! * [`time`], [`earth_orientation`], [`ref_system`]: time scales, precession and nutation,
//!   sidereal time and the static frames.
//! * [`orbit`], [`bodies`]: Kepler orbits, series providers and the body hierarchy producing
//!   heliocentric positions.
//! * [`observers`]: the [`Observer`](observers::Observer) snapshot holding every frame transform
//!   for one site and instant.
//! * [`atmosphere`]: refraction and extinction.
//! * [`celestial`], [`eclipse`]: the quantities an observer asks for.
//!
//! ## Example
//!
//! ```rust
//! use almagest::bodies::catalog::default_solar_system;
//! use almagest::celestial::{CelestialObject, Planet};
//! use almagest::observers::{Location, Observer, ObserverConfig};
//! use almagest::time::JulianDay;
//!
//! let system = default_solar_system()?;
//! let site = Location::new("Greenwich", 51.4769, 0.0, 46.0)?;
//! let jd = JulianDay::from_calendar(2024, 3, 20, 12, 0, 0.0)?;
//! let observer = Observer::on_earth(&system, site, jd, ObserverConfig::default())?;
//!
//! let sun = Planet::find(&system, "Sun")?;
//! let (azimuth, altitude) = sun.az_alt(&observer, true);
//! assert!(altitude.degrees() > 30.0);
//! assert!((150.0..210.0).contains(&azimuth.degrees()));
//! # Ok::<(), almagest::almagest_errors::AlmagestError>(())
//! ```

pub mod almagest_errors;
pub mod atmosphere;
pub mod bodies;
pub mod celestial;
pub mod constants;
pub mod earth_orientation;
pub mod eclipse;
pub mod math;
pub mod observers;
pub mod orbit;
pub mod ref_system;
pub mod time;
pub mod units;
