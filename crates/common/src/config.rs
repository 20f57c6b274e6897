//! Run configuration for the simulation.
//!
//! Defaults reproduce the reference benchmark run. A configuration is validated
//! once, before any random draw, and is never mutated by the simulation.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors rejected before a simulation starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    ZeroDimension { field: &'static str, value: u32 },
    #[error("initial_entities must be positive")]
    NoInitialEntities,
    #[error("solid_probability must lie in [0, 1], got {0}")]
    SolidProbabilityOutOfRange(f64),
    #[error("dt must be finite and positive, got {0}")]
    InvalidTimestep(f64),
    #[error("{field} must be finite, got {value}")]
    NonFiniteParameter { field: &'static str, value: f64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Entities spawned before the first frame.
    pub initial_entities: u32,
    /// Entities spawned at the start of every frame.
    pub spawn_per_frame: u32,
    /// Tile grid width in cells.
    pub width: u32,
    /// Tile grid height in cells.
    pub height: u32,
    /// Initial xorshift32 state.
    pub seed: u32,
    /// Fixed timestep in seconds.
    pub dt: f64,
    /// Downward acceleration, cells per second squared.
    pub gravity: f64,
    /// Horizontal damping factor applied while grounded.
    pub friction: f64,
    /// Chance that any given cell is solid.
    pub solid_probability: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: 3600,
            initial_entities: 300,
            spawn_per_frame: 3,
            width: 128,
            height: 72,
            seed: 123_456_789,
            dt: 1.0 / 60.0,
            gravity: 18.0,
            friction: 8.0,
            solid_probability: 0.18,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file. The result is not validated yet.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every parameter. `frames == 0` is accepted and yields an empty run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension {
                field: "width",
                value: self.width,
            });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                field: "height",
                value: self.height,
            });
        }
        if self.initial_entities == 0 {
            return Err(ConfigError::NoInitialEntities);
        }
        if !(0.0..=1.0).contains(&self.solid_probability) {
            return Err(ConfigError::SolidProbabilityOutOfRange(
                self.solid_probability,
            ));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        for (field, value) in [("gravity", self.gravity), ("friction", self.friction)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_run() {
        let c = SimConfig::default();
        assert_eq!(c.frames, 3600);
        assert_eq!(c.initial_entities, 300);
        assert_eq!(c.spawn_per_frame, 3);
        assert_eq!((c.width, c.height), (128, 72));
        assert_eq!(c.seed, 123_456_789);
        assert_eq!(c.dt, 1.0 / 60.0);
        assert_eq!(c.gravity, 18.0);
        assert_eq!(c.friction, 8.0);
        assert_eq!(c.solid_probability, 0.18);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        let c = SimConfig {
            width: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ZeroDimension { field: "width", .. })
        ));
    }

    #[test]
    fn zero_height_rejected() {
        let c = SimConfig {
            height: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ZeroDimension {
                field: "height",
                ..
            })
        ));
    }

    #[test]
    fn zero_initial_entities_rejected() {
        let c = SimConfig {
            initial_entities: 0,
            ..SimConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::NoInitialEntities)));
    }

    #[test]
    fn zero_frames_accepted() {
        let c = SimConfig {
            frames: 0,
            ..SimConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn solid_probability_bounds() {
        for p in [0.0, 0.5, 1.0] {
            let c = SimConfig {
                solid_probability: p,
                ..SimConfig::default()
            };
            assert!(c.validate().is_ok(), "p={p} should be valid");
        }
        for p in [-0.01, 1.01, f64::NAN] {
            let c = SimConfig {
                solid_probability: p,
                ..SimConfig::default()
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::SolidProbabilityOutOfRange(_))
            ));
        }
    }

    #[test]
    fn bad_timestep_rejected() {
        for dt in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let c = SimConfig {
                dt,
                ..SimConfig::default()
            };
            assert!(matches!(c.validate(), Err(ConfigError::InvalidTimestep(_))));
        }
    }

    #[test]
    fn non_finite_gravity_rejected() {
        let c = SimConfig {
            gravity: f64::INFINITY,
            ..SimConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFiniteParameter {
                field: "gravity",
                ..
            })
        ));
    }

    #[test]
    fn zero_seed_accepted() {
        let c = SimConfig {
            seed: 0,
            ..SimConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn json_missing_fields_take_defaults() {
        let c = SimConfig::from_json_str(r#"{ "frames": 10, "seed": 7 }"#).unwrap();
        assert_eq!(c.frames, 10);
        assert_eq!(c.seed, 7);
        assert_eq!(c.width, 128);
        assert_eq!(c.dt, 1.0 / 60.0);
    }

    #[test]
    fn json_unknown_field_rejected() {
        let err = SimConfig::from_json_str(r#"{ "frame": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_file_roundtrip() {
        let config = SimConfig {
            frames: 42,
            width: 16,
            height: 9,
            ..SimConfig::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&config).unwrap().as_bytes())
            .unwrap();
        let loaded = SimConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::from_json_file("/nonexistent/tilesim.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
