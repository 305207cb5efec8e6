//! # Orbits
//!
//! An [`Orbit`] answers one question: where is a body, relative to its parent, at a given
//! Julian Ephemeris Day. Positions are in **AU** and velocities in **AU/day**, expressed in
//! the parent's reference frame (VSOP87 for heliocentric orbits).
//!
//! Two implementations ship with the crate:
//!
//! * [`kepler::KeplerOrbit`] – classical two-body elements, all three conic regimes,
//! * [`SeriesOrbit`] – delegates to an external coefficient-series theory through the
//!   [`SeriesProvider`] seam (VSOP87, ELP, satellite theories, …).

pub mod kepler;

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::constants::JDE;

/// Position and velocity of a body relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateVector {
    /// Position (AU).
    pub position: Vector3<f64>,
    /// Velocity (AU/day).
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    /// Build from a packed `[x, y, z, vx, vy, vz]` array.
    pub fn from_array(xyz: &[f64; 6]) -> Self {
        StateVector {
            position: Vector3::new(xyz[0], xyz[1], xyz[2]),
            velocity: Vector3::new(xyz[3], xyz[4], xyz[5]),
        }
    }
}

/// Capability "position and velocity at a JDE".
///
/// Implementations must be pure: two calls with the same `jde` return identical vectors.
pub trait Orbit: Send + Sync + fmt::Debug {
    /// State relative to the parent body at `jde`.
    fn state_at(&self, jde: JDE) -> StateVector;

    /// Sidereal period in days, when the orbit is closed.
    fn sidereal_period(&self) -> Option<f64> {
        None
    }
}

/// An external coefficient-series theory.
///
/// Given a JDE and a body index within the theory, returns `[x, y, z, vx, vy, vz]` in AU and
/// AU/day in the body parent's frame.
pub trait SeriesProvider: Send + Sync + fmt::Debug {
    fn state(&self, jde: JDE, index: usize) -> [f64; 6];
}

/// One body of a [`SeriesProvider`], exposed as an [`Orbit`].
#[derive(Debug, Clone)]
pub struct SeriesOrbit {
    provider: Arc<dyn SeriesProvider>,
    index: usize,
    period: Option<f64>,
}

impl SeriesOrbit {
    pub fn new(provider: Arc<dyn SeriesProvider>, index: usize) -> Self {
        SeriesOrbit {
            provider,
            index,
            period: None,
        }
    }

    /// Attach a nominal sidereal period (days), used for display and rise/set day ratios.
    pub fn with_period(mut self, days: f64) -> Self {
        self.period = Some(days);
        self
    }
}

impl Orbit for SeriesOrbit {
    fn state_at(&self, jde: JDE) -> StateVector {
        StateVector::from_array(&self.provider.state(jde, self.index))
    }

    fn sidereal_period(&self) -> Option<f64> {
        self.period
    }
}
