//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quality::QualityTier;

/// Top-level Terrella configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Character physics tuning.
    pub physics: PhysicsConfig,
    /// Spatial grid settings.
    pub grid: GridConfig,
    /// Graphics/optimizer settings.
    pub graphics: GraphicsConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Character physics tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s².
    pub gravity: f32,
    /// Instant upward velocity applied on jump, in units/s.
    pub jump_impulse: f32,
    /// Height of the character origin above the ground surface.
    pub ground_offset: f32,
    /// Fixed simulation timestep in seconds.
    pub fixed_dt: f32,
}

/// Spatial grid settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one grid cell.
    pub cell_size: f32,
    /// Meshes whose AABB exceeds this on any axis are excluded from the
    /// grid entirely (they would flood it with cells).
    pub max_mesh_extent: f32,
}

/// Graphics/optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Quality tier consumed by the shadow throttle and culling pass.
    pub quality_tier: QualityTier,
    /// Extra bounding-sphere radius for shadow-casting meshes during
    /// frustum tests, in world units.
    pub shadow_margin: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log grid statistics after every build.
    pub log_grid_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            jump_impulse: 4.5,
            ground_offset: 1.0,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 6.0,
            max_mesh_extent: 100.0,
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            quality_tier: QualityTier::HIGHEST,
            shadow_margin: 2.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_grid_stats: true,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Default config directory (`<platform config dir>/terrella`).
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("terrella"))
    }
}
