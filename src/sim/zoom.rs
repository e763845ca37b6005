//! Camera zoom driven by obstacle proximity
//!
//! The target zoom grows linearly as the nearest relevant obstacle gets closer
//! and is exactly 1.0 at the relevance radius. The current zoom follows the
//! target through a first-order low-pass filter, one step per reference frame.

use serde::{Deserialize, Serialize};

use super::proximity::Proximity;
use crate::config::ZoomSettings;
use crate::consts::REFERENCE_FRAME_DT;

/// Target zoom for a nearest-obstacle distance
///
/// `clamp(1 + max(0, (R - d) / R) * gain, min, max)`
pub fn target_for_distance(distance: f64, relevance_radius: f64, settings: &ZoomSettings) -> f64 {
    if !(relevance_radius > 0.0) || !distance.is_finite() {
        return 1.0;
    }
    let factor = ((relevance_radius - distance) / relevance_radius).max(0.0);
    (1.0 + factor * settings.gain).clamp(settings.min, settings.max)
}

/// Target zoom for a proximity snapshot; 1.0 when nothing is relevant
pub fn target_zoom(proximity: &Proximity, relevance_radius: f64, settings: &ZoomSettings) -> f64 {
    match proximity.nearest() {
        Some(nearest) => target_for_distance(nearest.distance(), relevance_radius, settings),
        None => 1.0,
    }
}

/// Smoothed camera zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomController {
    pub current: f64,
    pub target: f64,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            current: 1.0,
            target: 1.0,
        }
    }
}

impl ZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the target from the latest proximity snapshot
    pub fn retarget(&mut self, proximity: &Proximity, relevance_radius: f64, settings: &ZoomSettings) {
        self.target = target_zoom(proximity, relevance_radius, settings);
    }

    /// One reference-frame filter step: `current += (target - current) * smoothing`
    pub fn step(&mut self, smoothing: f64) {
        self.current += (self.target - self.current) * smoothing;
    }

    /// Advance by `dt` seconds
    ///
    /// The smoothing factor is defined per 60 Hz frame; other frame times use the
    /// equivalent exponential rate so a 1/60 s tick is exactly one [`step`](Self::step).
    pub fn tick(&mut self, dt: f64, smoothing: f64) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        let frames = dt / REFERENCE_FRAME_DT;
        let alpha = 1.0 - (1.0 - smoothing).powf(frames);
        self.current += (self.target - self.current) * alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ZoomSettings {
        ZoomSettings::default()
    }

    #[test]
    fn test_target_at_fifty_units() {
        let target = target_for_distance(50.0, 80.0, &settings());
        assert!((target - 1.1875).abs() < 1e-12);
    }

    #[test]
    fn test_target_at_radius_and_beyond() {
        assert_eq!(target_for_distance(80.0, 80.0, &settings()), 1.0);
        assert_eq!(target_for_distance(200.0, 80.0, &settings()), 1.0);
    }

    #[test]
    fn test_target_at_zero_distance() {
        // Raw factor 1.0 with the default gain stays inside the range
        assert_eq!(target_for_distance(0.0, 80.0, &settings()), 1.5);

        let strong = ZoomSettings {
            gain: 2.0,
            ..settings()
        };
        assert_eq!(target_for_distance(0.0, 80.0, &strong), 2.0);
    }

    #[test]
    fn test_empty_proximity_targets_one() {
        assert_eq!(target_zoom(&Proximity::default(), 80.0, &settings()), 1.0);
    }

    #[test]
    fn test_degenerate_radius() {
        assert_eq!(target_for_distance(0.0, 0.0, &settings()), 1.0);
    }

    #[test]
    fn test_step_is_low_pass() {
        let mut zoom = ZoomController {
            current: 1.0,
            target: 2.0,
        };
        zoom.step(0.1);
        assert!((zoom.current - 1.1).abs() < 1e-12);
        // No overshoot
        for _ in 0..50 {
            zoom.step(0.1);
            assert!(zoom.current < 2.0);
        }
    }

    #[test]
    fn test_reference_tick_matches_step() {
        let mut stepped = ZoomController {
            current: 0.8,
            target: 1.7,
        };
        let mut ticked = stepped;
        stepped.step(0.1);
        ticked.tick(REFERENCE_FRAME_DT, 0.1);
        assert!((stepped.current - ticked.current).abs() < 1e-12);
    }

    #[test]
    fn test_converges() {
        let mut zoom = ZoomController {
            current: 0.8,
            target: 2.0,
        };
        for _ in 0..200 {
            zoom.step(0.1);
        }
        assert!((zoom.current - zoom.target).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut zoom = ZoomController {
            current: 1.0,
            target: 2.0,
        };
        zoom.tick(0.0, 0.1);
        zoom.tick(-1.0, 0.1);
        zoom.tick(f64::NAN, 0.1);
        assert_eq!(zoom.current, 1.0);
    }
}
