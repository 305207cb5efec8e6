//! Observer configuration.
//!
//! One immutable value carries every switch that changes how an
//! [`Observer`](crate::observers::Observer) builds its frames. Hosts can deserialise it from
//! any serde format; missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::atmosphere::extinction::DEFAULT_EXTINCTION_COEFFICIENT;
use crate::atmosphere::{Extinction, Refraction};
use crate::bodies::magnitude::ApparentMagnitudeAlgorithm;
use crate::time::delta_t::TimeCorrection;

/// Pressure and temperature feeding the refraction model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefractionConfig {
    /// Millibar; zero or negative disables refraction.
    pub pressure_mbar: f64,
    pub temperature_c: f64,
}

impl Default for RefractionConfig {
    fn default() -> Self {
        RefractionConfig {
            pressure_mbar: 1013.25,
            temperature_c: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Apply the site's offset from the body centre (diurnal parallax).
    pub use_topocentric_coordinates: bool,
    /// True rather than mean equator and sidereal time.
    pub use_nutation: bool,
    /// One-pass light-time correction of body positions.
    pub use_light_travel_time: bool,
    pub time_correction: TimeCorrection,
    pub apparent_magnitude_algorithm: ApparentMagnitudeAlgorithm,
    pub refraction: RefractionConfig,
    /// Magnitudes per airmass.
    pub extinction_coefficient: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        ObserverConfig {
            use_topocentric_coordinates: true,
            use_nutation: true,
            use_light_travel_time: true,
            time_correction: TimeCorrection::default(),
            apparent_magnitude_algorithm: ApparentMagnitudeAlgorithm::default(),
            refraction: RefractionConfig::default(),
            extinction_coefficient: DEFAULT_EXTINCTION_COEFFICIENT,
        }
    }
}

impl ObserverConfig {
    pub fn refraction(&self) -> Refraction {
        Refraction::new(self.refraction.pressure_mbar, self.refraction.temperature_c)
    }

    pub fn extinction(&self) -> Extinction {
        Extinction::new(self.extinction_coefficient)
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObserverConfig::default();
        assert!(config.use_topocentric_coordinates && config.use_nutation && config.use_light_travel_time);
        assert_eq!(config.time_correction, TimeCorrection::EspenakMeeus);
        assert_eq!(
            config.apparent_magnitude_algorithm,
            ApparentMagnitudeAlgorithm::ExplanatorySupplement2013
        );
        assert_eq!(config.refraction().pressure(), 1013.25);
        assert_eq!(config.extinction().coefficient, 0.13);
    }

    #[test]
    fn test_json_round_trip_and_partial_input() {
        let config = ObserverConfig {
            use_nutation: false,
            time_correction: TimeCorrection::Custom {
                year: 1820.0,
                ndot: -26.0,
                a: -20.0,
                b: 0.0,
                c: 32.0,
            },
            ..ObserverConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ObserverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: ObserverConfig =
            serde_json::from_str(r#"{"use_light_travel_time": false, "refraction": {"pressure_mbar": 0.0}}"#)
                .unwrap();
        assert!(!partial.use_light_travel_time);
        assert!(partial.use_topocentric_coordinates);
        assert!(!partial.refraction().is_enabled());
        assert_eq!(partial.refraction.temperature_c, 15.0);
    }
}
