//! # Atmosphere
//!
//! Pure corrections applied to AltAz directions: [`refraction`] bends the line of sight
//! towards the zenith, [`extinction`] dims objects according to the airmass they are seen
//! through.

pub mod extinction;
pub mod refraction;

pub use extinction::Extinction;
pub use refraction::Refraction;
