//! # Eclipses
//!
//! Instantaneous eclipse circumstances for an [`Observer`](crate::observers::Observer) on the
//! Earth, from geocentric positions of the Sun and the Moon:
//!
//! * [`LunarEclipse`]: penumbral and umbral magnitudes of the Moon in the Earth's shadow.
//! * [`SolarEclipse`]: Besselian elements of the lunar shadow, the point where its axis meets
//!   the ellipsoid and the central magnitude there.
//!
//! Both skip the full geometry when the bodies are more than [`RA_PREFILTER`] away from the
//! required alignment in right ascension.

pub mod lunar;
pub mod solar;

use crate::constants::RADEG;
use crate::units::Angle;

pub use lunar::{LunarEclipse, LunarEclipseKind};
pub use solar::{BesselianElements, GroundPosition, SolarEclipse};

/// Right-ascension window outside of which no eclipse is possible.
pub const RA_PREFILTER: Angle = Angle::from_radians(3.0 * RADEG);
