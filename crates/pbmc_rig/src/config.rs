//! Rig configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `PBMC_CONFIG=/path/to/rig.toml`
//! 2. Config file in the working directory: `pbmc.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! tick_rate = 90.0
//!
//! [follower]
//! control_type = "position"
//! linear = { p = 300.0, i = 0.0, d = 50.0, max = 9000.0 }
//!
//! [grasp]
//! max_mass = 15.0
//! weld_fixation = true
//!
//! [right_hand]
//! start = [20.0, 0.0, 60.0]
//! shape = { type = "sphere", radius = 2.0 }
//!
//! [[props]]
//! name = "mug"
//! mass = 0.4
//! position = [20.0, 0.0, 5.0]
//! shape = { type = "box", half_extents = [3.0, 3.0, 5.0] }
//! ```

use pbmc_control::FollowerConfig;
use pbmc_grasp::GraspConfig;
use pbmc_physics::{ColliderShape, PhysicsConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PBMC_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pbmc.toml";

/// Errors from config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// One tracked hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Collision shape of the hand body
    pub shape: ColliderShape,
    /// Spawn position
    pub start: [f32; 3],
    /// Grasp volume center relative to the hand body
    pub volume_offset: [f32; 3],
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            shape: ColliderShape::sphere(2.0),
            start: [0.0, 0.0, 100.0],
            volume_offset: [0.0, 0.0, 0.0],
        }
    }
}

impl HandConfig {
    fn at(start: [f32; 3]) -> Self {
        Self {
            start,
            ..Default::default()
        }
    }
}

/// A prop placed in the scene at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropConfig {
    pub name: String,
    pub shape: ColliderShape,
    /// Mass in kilograms
    pub mass: f32,
    pub position: [f32; 3],
}

impl PropConfig {
    pub fn new(name: impl Into<String>, shape: ColliderShape, mass: f32, position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            shape,
            mass,
            position,
        }
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Host ticks per second
    pub tick_rate: f32,
    pub physics: PhysicsConfig,
    pub follower: FollowerConfig,
    pub grasp: GraspConfig,
    pub left_hand: HandConfig,
    pub right_hand: HandConfig,
    /// Add a fixed floor with its top face at z = 0
    pub ground: bool,
    pub props: Vec<PropConfig>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            tick_rate: 90.0,
            physics: PhysicsConfig::default(),
            follower: FollowerConfig::default(),
            grasp: GraspConfig::default(),
            left_hand: HandConfig::at([-20.0, 0.0, 60.0]),
            right_hand: HandConfig::at([20.0, 0.0, 60.0]),
            ground: true,
            props: vec![
                PropConfig::new("mug", ColliderShape::cuboid(3.0, 3.0, 5.0), 0.4, [20.0, 0.0, 5.0]),
                PropConfig::new("brick", ColliderShape::cuboid(5.0, 10.0, 3.0), 2.5, [-20.0, 0.0, 3.0]),
                PropConfig::new("anvil", ColliderShape::cuboid(15.0, 8.0, 10.0), 60.0, [0.0, 40.0, 10.0]),
            ],
        }
    }
}

impl RigConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                log::info!("Loading rig config from {} ({})", path, CONFIG_ENV);
                return Self::load_from_file(&path);
            }
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            log::info!("Loading rig config from {}", DEFAULT_CONFIG_FILE);
            return Self::load_from_file(DEFAULT_CONFIG_FILE);
        }

        log::info!("No rig config found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Seconds per host tick
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::Validation(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        self.physics
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if !self.follower.is_valid() {
            return Err(ConfigError::Validation(
                "follower gains must be finite with a non-negative max".into(),
            ));
        }
        self.grasp
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        for (name, hand) in [("left_hand", &self.left_hand), ("right_hand", &self.right_hand)] {
            if !hand.shape.is_valid() {
                return Err(ConfigError::Validation(format!("{}: invalid shape", name)));
            }
        }
        for prop in &self.props {
            if !prop.shape.is_valid() {
                return Err(ConfigError::Validation(format!("prop '{}': invalid shape", prop.name)));
            }
            if !(prop.mass.is_finite() && prop.mass > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "prop '{}': mass must be positive, got {}",
                    prop.name, prop.mass
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RigConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.props.len(), 3);
        assert!((config.tick_interval() - 1.0 / 90.0).abs() < 1e-7);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = RigConfig::parse("").unwrap();
        assert_eq!(config, RigConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = RigConfig::load_from_file("/nonexistent/pbmc.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = RigConfig::parse("tick_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
