//! Renderer-facing snapshot
//!
//! The simulation never draws. It hands the renderer one of these per frame
//! and the renderer turns it into transforms, overlays and labels.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Layout, TerrainGrid};
use super::movement::{Direction, MotionState};
use super::proximity::{Label, ObstacleOverlay};
use super::state::Simulation;

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Character position on the terrain (terrain pixels)
    pub offset: DVec2,
    /// Character heading (degrees)
    pub heading: f64,
    /// Scene rotation around the character (degrees)
    pub scene_rotation: f64,
    /// Smoothed camera zoom
    pub zoom: f64,
    pub tile_size: f64,
    pub terrain_scale: f64,
    /// Terrain tilt (degrees)
    pub inclination: f64,
    pub layout: Layout,
    /// Play the walking animation
    pub walking: bool,
    /// Seconds per walk cycle
    pub walk_cycle: f64,
    /// Draw debug gizmos from `overlays` and the tile grid from `grid`
    pub debug: bool,
    pub grid: TerrainGrid,
    pub overlays: Vec<ObstacleOverlay>,
    pub labels: Vec<Label>,
}

impl Simulation {
    /// Snapshot the state the renderer paints from
    pub fn frame(&self) -> RenderFrame {
        let animate = &self.config.animate_movement;
        let walking = match self.character.motion {
            MotionState::Moving(Direction::Forward) => animate.forward,
            MotionState::Moving(Direction::Backward) => animate.backward,
            _ => false,
        };

        RenderFrame {
            offset: self.character.offset,
            heading: self.character.heading,
            scene_rotation: self.scene_rotation(),
            zoom: self.zoom.current,
            tile_size: self.layout.scale.tile_size,
            terrain_scale: self.layout.scale.terrain_scale,
            inclination: self.config.inclination_angle,
            layout: self.layout,
            walking,
            walk_cycle: animate.duration,
            debug: self.config.debug,
            grid: self.grid,
            overlays: self.proximity.overlays(&self.cache),
            labels: self.proximity.labels(),
        }
    }
}
