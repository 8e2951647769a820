//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`NDV_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use ndview_core::rotation::parse_plane_name;
use ndview_core::{BackendKind, KernelSettings, PolytopeKind, TrigMode};
use ndview_projection::{DEFAULT_MARGIN, DEFAULT_PROJECTION_DISTANCE};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Kernel backend configuration
    #[serde(default)]
    pub kernel: KernelConfig,
    /// Projection configuration
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Animation configuration
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`NDV_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // NDV_PROJECTION__DISTANCE=6 -> projection.distance = 6
        figment = figment.merge(Env::prefixed("NDV_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the kernel cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim = self.animation.dimension;
        if dim < 3 {
            return Err(ConfigError::invalid(format!(
                "animation.dimension must be at least 3, got {}",
                dim
            )));
        }
        if self.projection.margin <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "projection.margin must be positive, got {}",
                self.projection.margin
            )));
        }
        if self.animation.time_step <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "animation.time_step must be positive, got {}",
                self.animation.time_step
            )));
        }
        for plane in &self.animation.planes {
            let (_, j) = parse_plane_name(&plane.plane)
                .map_err(|e| ConfigError::invalid(format!("animation.planes: {}", e)))?;
            if j >= dim {
                return Err(ConfigError::invalid(format!(
                    "animation.planes: {} needs at least {} dimensions, animation.dimension is {}",
                    plane.plane,
                    j + 1,
                    dim
                )));
            }
        }
        Ok(())
    }

    /// Kernel settings derived from the `kernel` and `projection` sections
    pub fn kernel_settings(&self) -> KernelSettings {
        KernelSettings {
            backend: self.kernel.backend,
            trig: if self.kernel.fast_trig { TrigMode::Fast } else { TrigMode::Exact },
            projection_distance: if self.projection.auto_distance {
                None
            } else {
                Some(self.projection.distance)
            },
            margin: self.projection.margin,
        }
    }
}

/// Kernel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Rotation composition backend (reference, givens)
    pub backend: BackendKind,
    /// Use the parabolic sin/cos approximation for animation
    pub fast_trig: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Reference,
            fast_trig: false,
        }
    }
}

/// Projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Fixed projection distance, used when `auto_distance` is off
    pub distance: f64,
    /// Margin for the automatic distance heuristic
    pub margin: f64,
    /// Pick the distance from the rotated vertices every frame
    pub auto_distance: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_PROJECTION_DISTANCE,
            margin: DEFAULT_MARGIN,
            auto_distance: true,
        }
    }
}

/// One animated rotation plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpeed {
    /// Plane name such as `XW` or `A6A7`
    pub plane: String,
    /// Angular speed in radians per second
    pub speed: f64,
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Dimension of the animated object
    pub dimension: usize,
    /// Object to animate (hypercube, simplex, roots_a, roots_d, roots_e8)
    pub object: PolytopeKind,
    /// Edge length of the object
    pub size: f64,
    /// Number of frames the headless driver runs
    pub frames: u32,
    /// Seconds per frame
    pub time_step: f64,
    /// Planes in application order
    pub planes: Vec<PlaneSpeed>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            dimension: 4,
            object: PolytopeKind::Hypercube,
            size: 2.0,
            frames: 120,
            time_step: 1.0 / 60.0,
            planes: vec![
                PlaneSpeed { plane: "XW".to_string(), speed: 0.5 },
                PlaneSpeed { plane: "YZ".to_string(), speed: 0.3 },
            ],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: String) -> Self {
        ConfigError { message }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.animation.dimension, 4);
        assert_eq!(config.kernel.backend, BackendKind::Reference);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("backend = \"reference\""));
        assert!(toml.contains("[[animation.planes]]"));

        let back: AppConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back.animation.planes, config.animation.planes);
    }

    #[test]
    fn test_kernel_settings() {
        let mut config = AppConfig::default();
        assert_eq!(config.kernel_settings().projection_distance, None);

        config.projection.auto_distance = false;
        config.projection.distance = 7.5;
        config.kernel.fast_trig = true;
        config.kernel.backend = BackendKind::Givens;
        let settings = config.kernel_settings();
        assert_eq!(settings.projection_distance, Some(7.5));
        assert_eq!(settings.trig, TrigMode::Fast);
        assert_eq!(settings.backend, BackendKind::Givens);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.animation.dimension = 2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.projection.margin = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.animation.time_step = -1.0;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("time_step"));
    }

    #[test]
    fn test_validate_checks_planes_against_dimension() {
        // Default planes include XW, which 3D does not have
        let mut config = AppConfig::default();
        config.animation.dimension = 3;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("XW"), "{}", message);

        config.animation.planes = vec![PlaneSpeed { plane: "ZX".to_string(), speed: 1.0 }];
        assert!(config.validate().is_ok());

        config.animation.planes.push(PlaneSpeed { plane: "XQ".to_string(), speed: 1.0 });
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("XQ"), "{}", message);

        let mut config = AppConfig::default();
        config.animation.dimension = 8;
        config.animation.planes = vec![PlaneSpeed { plane: "A6A7".to_string(), speed: 0.2 }];
        assert!(config.validate().is_ok());
    }
}
