//! Terrain Walk - a top-down character walking over a scaled terrain
//!
//! Core modules:
//! - `sim`: Pure simulation (scale resolution, spatial cache, proximity, movement, zoom)
//! - `config`: Session configuration
//! - `level`: Static level geometry (terrain picture, start tile, obstacles)
//! - `platform`: Renderer adapters (logging, DOM)

pub mod config;
pub mod level;
pub mod platform;
pub mod sim;

pub use config::Config;
pub use level::Level;
pub use sim::Simulation;

use glam::DVec2;

/// Default configuration constants
pub mod consts {
    /// Design-time virtual camera resolution
    pub const REFERENCE_WIDTH: f64 = 1024.0;
    pub const REFERENCE_HEIGHT: f64 = 768.0;

    /// Movement step per input at reference resolution (pixels)
    pub const BASE_MOVE_SPEED: f64 = 20.0;
    /// Heading change per rotate input (degrees)
    pub const ROTATION_INCREMENT: f64 = 5.0;
    /// Fraction of the move speed applied as a nudge on a blocked move
    pub const ESCAPE_ADJUSTMENT_RATIO: f64 = 0.1;

    /// Obstacles closer than this affect zoom and labels
    pub const RELEVANCE_RADIUS: f64 = 80.0;
    /// Obstacles closer than this block movement
    pub const COLLISION_RADIUS: f64 = 40.0;

    /// Size of one tile in the terrain picture (pixels)
    pub const BASE_TILE_SIZE: f64 = 16.0;
    /// Terrain container size relative to the game container
    pub const TERRAIN_SCALE_FACTOR: f64 = 3.0;
    /// Terrain tilt for the pseudo-3D view (degrees)
    pub const INCLINATION_ANGLE: f64 = 75.0;

    /// Zoom range and response
    pub const ZOOM_MIN: f64 = 0.8;
    pub const ZOOM_MAX: f64 = 2.0;
    pub const ZOOM_GAIN: f64 = 0.5;
    pub const ZOOM_SMOOTHING: f64 = 0.1;
    /// Frame duration the smoothing factor is expressed in (60 Hz)
    pub const REFERENCE_FRAME_DT: f64 = 1.0 / 60.0;

    /// Vertical distance between a label anchor and the top of its obstacle
    pub const LABEL_LIFT: f64 = 20.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees (0 = up, clockwise, screen y down)
#[inline]
pub fn heading_vector(degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(sin, -cos)
}

/// Divide, returning 0 when the denominator is zero, negative or not finite
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > f64::EPSILON && denominator.is_finite() && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-5.0), 355.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_heading_vector() {
        let up = heading_vector(0.0);
        assert!(up.x.abs() < 1e-12);
        assert!((up.y + 1.0).abs() < 1e-12);

        let right = heading_vector(90.0);
        assert!((right.x - 1.0).abs() < 1e-12);
        assert!(right.y.abs() < 1e-12);
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(10.0, 2.0), 5.0);
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(safe_ratio(10.0, -1.0), 0.0);
        assert_eq!(safe_ratio(f64::NAN, 1.0), 0.0);
        assert_eq!(safe_ratio(1.0, f64::INFINITY), 0.0);
    }
}
