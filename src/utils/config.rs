use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::DEFAULT_DEVICE_HEIGHT_M;

/// Session-wide placement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Device height applied to nodes the session creates (meters)
    pub default_device_height_m: f64,
    /// Whether session-created nodes extrapolate between fixes
    pub interpolate_motion: bool,
    /// Longest time a node is extrapolated past its last fix (milliseconds)
    pub max_extrapolation_ms: Option<u64>,
    /// Re-anchor once the device is this far from the origin (meters)
    pub reanchor_distance_m: Option<f64>,
    /// Yaw of the scene's zero direction relative to true north (degrees)
    pub north_offset_deg: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_device_height_m: DEFAULT_DEVICE_HEIGHT_M,
            interpolate_motion: false,
            max_extrapolation_ms: None,
            reanchor_distance_m: None,
            north_offset_deg: 0.0,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Loads, validates and stores the session configuration
pub struct ConfigManager {
    config: SessionConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        Self::first_error(Self::validate(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SessionConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        let validation = Self::validate(&config);
        for warning in &validation.warnings {
            log::warn!("{}: {}", path_str, warning);
        }
        Self::first_error(validation)?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = self.config_file_path.clone() {
            self.save_to_file(path)
        } else {
            Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            })
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate a session configuration
    pub fn validate(config: &SessionConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let height = config.default_device_height_m;
        if !height.is_finite() || !(0.0..=10.0).contains(&height) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "default_device_height_m".to_string(),
                value: height.to_string(),
                reason: "Device height must be between 0 and 10 meters".to_string(),
            });
        }

        if let Some(window) = config.max_extrapolation_ms {
            if window == 0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "max_extrapolation_ms".to_string(),
                    value: window.to_string(),
                    reason: "Extrapolation window must be positive".to_string(),
                });
            } else if window > 30_000 {
                warnings.push("Extrapolating more than 30s past a fix may overshoot badly".to_string());
            }
        }

        if let Some(distance) = config.reanchor_distance_m {
            if !distance.is_finite() || distance <= 0.0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "reanchor_distance_m".to_string(),
                    value: distance.to_string(),
                    reason: "Re-anchor distance must be positive".to_string(),
                });
            } else if distance > 1_000.0 {
                warnings.push("Tangent-plane error is noticeable beyond a few hundred meters".to_string());
            }
        }

        if !config.north_offset_deg.is_finite() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "north_offset_deg".to_string(),
                value: config.north_offset_deg.to_string(),
                reason: "North offset must be a finite angle".to_string(),
            });
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn first_error(validation: ValidationResult) -> Result<(), ConfigError> {
        match validation.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
