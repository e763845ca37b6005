//! Session configuration
//!
//! Static for the lifetime of a session. Loaded from JSON (every field optional,
//! missing fields fall back to the defaults in [`crate::consts`]).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::Size;

/// Errors raised while loading or validating a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reference resolution must be positive, got {width}x{height}")]
    Resolution { width: f64, height: f64 },
    #[error("{name} must be a non-negative finite number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("collision radius {collision} exceeds relevance radius {relevance}")]
    RadiusOrder { collision: f64, relevance: f64 },
    #[error("zoom range is inverted: min {min} > max {max}")]
    ZoomRange { min: f64, max: f64 },
    #[error("zoom smoothing must be in (0, 1], got {0}")]
    Smoothing(f64),
}

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: f64,
    pub height: f64,
}

impl Resolution {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
        }
    }
}

/// Camera zoom response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub min: f64,
    pub max: f64,
    /// Zoom added at distance zero, before clamping
    pub gain: f64,
    /// Fraction of the remaining gap closed per reference frame
    pub smoothing: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: ZOOM_MIN,
            max: ZOOM_MAX,
            gain: ZOOM_GAIN,
            smoothing: ZOOM_SMOOTHING,
        }
    }
}

/// Which movement directions play the walking animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimateMovement {
    pub forward: bool,
    pub backward: bool,
    /// Seconds per walk cycle
    pub duration: f64,
}

impl Default for AnimateMovement {
    fn default() -> Self {
        Self {
            forward: true,
            backward: true,
            duration: 0.75,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Virtual camera resolution everything is designed against
    pub reference_resolution: Resolution,

    // === Movement ===
    pub base_move_speed: f64,
    pub rotation_increment: f64,
    pub escape_adjustment_ratio: f64,

    // === Proximity ===
    pub relevance_radius: f64,
    pub collision_radius: f64,

    // === Terrain ===
    pub base_tile_size: f64,
    pub terrain_scale_factor: f64,
    pub inclination_angle: f64,

    // === Camera ===
    pub zoom: ZoomSettings,
    /// Rotate the scene so the character always faces up
    pub camera_follows_heading: bool,

    // === Presentation ===
    pub animate_movement: AnimateMovement,
    /// Emit obstacle overlays for debug gizmos
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_resolution: Resolution::default(),

            base_move_speed: BASE_MOVE_SPEED,
            rotation_increment: ROTATION_INCREMENT,
            escape_adjustment_ratio: ESCAPE_ADJUSTMENT_RATIO,

            relevance_radius: RELEVANCE_RADIUS,
            collision_radius: COLLISION_RADIUS,

            base_tile_size: BASE_TILE_SIZE,
            terrain_scale_factor: TERRAIN_SCALE_FACTOR,
            inclination_angle: INCLINATION_ANGLE,

            zoom: ZoomSettings::default(),
            camera_follows_heading: true,

            animate_movement: AnimateMovement::default(),
            debug: false,
        }
    }
}

impl Config {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}, using default config");
                Self::default()
            }
        }
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants every formula in `sim` relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Resolution { width, height } = self.reference_resolution;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::Resolution { width, height });
        }

        for (name, value) in [
            ("base_move_speed", self.base_move_speed),
            ("rotation_increment", self.rotation_increment),
            ("escape_adjustment_ratio", self.escape_adjustment_ratio),
            ("relevance_radius", self.relevance_radius),
            ("collision_radius", self.collision_radius),
            ("base_tile_size", self.base_tile_size),
            ("terrain_scale_factor", self.terrain_scale_factor),
            ("zoom.gain", self.zoom.gain),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.collision_radius > self.relevance_radius {
            return Err(ConfigError::RadiusOrder {
                collision: self.collision_radius,
                relevance: self.relevance_radius,
            });
        }
        if !(self.zoom.min <= self.zoom.max) {
            return Err(ConfigError::ZoomRange {
                min: self.zoom.min,
                max: self.zoom.max,
            });
        }
        if !(self.zoom.smoothing > 0.0 && self.zoom.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(self.zoom.smoothing));
        }
        Ok(())
    }

    /// Blocked-move nudge for a given effective move speed
    pub fn escape_adjustment(&self, move_speed: f64) -> f64 {
        move_speed * self.escape_adjustment_ratio
    }
}
