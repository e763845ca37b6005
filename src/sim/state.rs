//! Simulation state
//!
//! All mutable state lives in one owned [`Simulation`]: no globals. The host
//! feeds it input and resize events and calls `tick` once per frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Layout, Size, TerrainGrid, resolve_layout};
use super::movement::MotionState;
use super::proximity::{Proximity, classify};
use super::spatial::{SceneTransform, SpatialCache};
use super::zoom::ZoomController;
use crate::config::Config;
use crate::level::{Level, Tile};

/// Character placement on the terrain
///
/// The character is drawn at the camera center; `offset` is where it stands on
/// the terrain (terrain pixels), so the terrain is drawn shifted by `-offset`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterState {
    pub offset: DVec2,
    /// Degrees in [0, 360), 0 = up, clockwise
    pub heading: f64,
    pub motion: MotionState,
}

impl CharacterState {
    /// Stand a quarter tile right of the tile's left edge, vertically centered
    pub fn at_tile(tile: Tile, tile_size: f64) -> Self {
        Self {
            offset: DVec2::new(
                (tile.col as f64 + 0.25) * tile_size,
                (tile.row as f64 + 0.5) * tile_size,
            ),
            ..Default::default()
        }
    }
}

/// The whole simulation: static inputs, derived layout and per-update caches
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(super) config: Config,
    pub(super) level: Level,
    pub(super) grid: TerrainGrid,
    pub(super) layout: Layout,
    pub(super) character: CharacterState,
    pub(super) cache: SpatialCache,
    pub(super) proximity: Proximity,
    pub(super) zoom: ZoomController,
}

impl Simulation {
    /// Create a simulation for a window, with the character on the level's start tile
    pub fn new(config: Config, level: Level, window: Size) -> Self {
        let grid = level.grid(config.base_tile_size);
        let layout = resolve_layout(window, &config, grid);
        let character = CharacterState::at_tile(level.start, layout.scale.tile_size);

        log::info!(
            "Simulation started: {} obstacles, {}x{} tiles, tile size {:.2}",
            level.obstacles.len(),
            grid.columns,
            grid.rows,
            layout.scale.tile_size
        );

        let mut sim = Self {
            config,
            level,
            grid,
            layout,
            character,
            cache: SpatialCache::new(),
            proximity: Proximity::default(),
            zoom: ZoomController::new(),
        };
        sim.refresh();
        sim
    }

    /// Scene rotation: the world turns against the heading when the camera follows it
    pub fn scene_rotation(&self) -> f64 {
        if self.config.camera_follows_heading {
            -self.character.heading
        } else {
            0.0
        }
    }

    /// Current terrain-to-screen transform
    pub fn scene_transform(&self) -> SceneTransform {
        SceneTransform::new(
            self.layout.pivot(),
            self.character.offset,
            self.scene_rotation(),
            self.layout.scale.tile_size,
        )
    }

    /// Character center on screen
    pub fn character_center(&self) -> DVec2 {
        self.layout.pivot()
    }

    /// Effective move speed for the current viewport
    pub fn move_speed(&self) -> f64 {
        self.layout.move_speed(self.config.base_move_speed)
    }

    /// Relevance radius for the current viewport
    pub fn relevance_radius(&self) -> f64 {
        self.layout.scale_length(self.config.relevance_radius)
    }

    /// Collision radius for the current viewport
    pub fn collision_radius(&self) -> f64 {
        self.layout.scale_length(self.config.collision_radius)
    }

    /// Rebuild the spatial cache and reclassify proximity
    pub fn refresh(&mut self) {
        let transform = self.scene_transform();
        self.cache.refresh(&self.level.obstacles, &transform);
        self.proximity = classify(
            &self.cache,
            transform.pivot,
            self.relevance_radius(),
            self.collision_radius(),
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> TerrainGrid {
        self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn cache(&self) -> &SpatialCache {
        &self.cache
    }

    pub fn proximity(&self) -> &Proximity {
        &self.proximity
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Obstacle, TerrainPicture};

    fn level(obstacles: Vec<Obstacle>) -> Level {
        Level::new(
            TerrainPicture {
                width: 1024.0,
                height: 768.0,
            },
            Tile { row: 9, col: 11 },
            obstacles,
        )
    }

    #[test]
    fn test_start_position() {
        let sim = Simulation::new(Config::default(), level(vec![]), Size::new(1024.0, 768.0));
        assert_eq!(sim.layout().scale.tile_size, 48.0);
        assert_eq!(sim.character().offset, DVec2::new(11.25 * 48.0, 9.5 * 48.0));
        assert_eq!(sim.character().heading, 0.0);
        assert_eq!(sim.character().motion, MotionState::Idle);
        assert_eq!(sim.move_speed(), 20.0);
        assert_eq!(sim.relevance_radius(), 80.0);
        assert_eq!(sim.collision_radius(), 40.0);
    }

    #[test]
    fn test_initial_refresh_classifies() {
        // The character stands on (9, 11), 12 px left of its center; the tile
        // above is about 49.5 px away
        let sim = Simulation::new(
            Config::default(),
            level(vec![
                Obstacle::new("here", 9, 11),
                Obstacle::new("above", 8, 11),
                Obstacle::new("far", 40, 60),
            ]),
            Size::new(1024.0, 768.0),
        );
        assert_eq!(sim.cache().len(), 3);
        assert!(sim.proximity().is_colliding("here"));
        assert!(sim.proximity().is_relevant("above"));
        assert!(!sim.proximity().is_colliding("above"));
        assert!(!sim.proximity().is_relevant("far"));
    }

    #[test]
    fn test_scene_rotation_follows_heading() {
        let mut sim = Simulation::new(Config::default(), level(vec![]), Size::new(1024.0, 768.0));
        sim.character.heading = 30.0;
        assert_eq!(sim.scene_rotation(), -30.0);

        sim.config.camera_follows_heading = false;
        assert_eq!(sim.scene_rotation(), 0.0);
    }
}
