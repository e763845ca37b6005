//! Input handling, viewport changes and the frame tick
//!
//! Two cadences drive the simulation. Input and resize events are handled
//! synchronously and rebuild the spatial cache and proximity sets. The host's
//! frame loop calls [`Simulation::tick`], which only smooths the zoom.

use serde::{Deserialize, Serialize};

use super::geometry::{Layout, Size, resolve_layout};
use super::movement::{Direction, MotionState, MoveContext, Turn, try_move, turn};
use super::state::{CharacterState, Simulation};

/// Discrete input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
    ReleaseMove,
}

impl InputEvent {
    /// Map a key press; unknown keys yield `None`
    pub fn from_key_down(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(InputEvent::MoveForward),
            "ArrowDown" => Some(InputEvent::MoveBackward),
            "ArrowLeft" => Some(InputEvent::RotateLeft),
            "ArrowRight" => Some(InputEvent::RotateRight),
            _ => None,
        }
    }

    /// Map a key release; only releasing a move key matters
    pub fn from_key_up(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "ArrowDown" => Some(InputEvent::ReleaseMove),
            _ => None,
        }
    }
}

/// Character state after an input, plus what happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputOutcome {
    pub event: InputEvent,
    pub character: CharacterState,
    /// A move input was rejected by a colliding obstacle
    pub blocked: bool,
}

impl Simulation {
    /// Apply one input event
    pub fn handle_input(&mut self, event: InputEvent) -> InputOutcome {
        let mut blocked = false;

        match event {
            InputEvent::MoveForward | InputEvent::MoveBackward => {
                let direction = if event == InputEvent::MoveForward {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                let speed = self.move_speed();
                let ctx = MoveContext {
                    transform: self.scene_transform(),
                    speed,
                    escape_adjustment: self.config.escape_adjustment(speed),
                };
                let outcome = try_move(
                    direction,
                    self.character.heading,
                    self.character.offset,
                    &self.proximity.colliding,
                    &ctx,
                );
                self.character.offset = outcome.offset;
                if outcome.moved {
                    self.character.motion = MotionState::Moving(direction);
                } else {
                    blocked = true;
                }
            }
            InputEvent::RotateLeft => {
                self.character.heading =
                    turn(self.character.heading, Turn::Left, self.config.rotation_increment);
            }
            InputEvent::RotateRight => {
                self.character.heading =
                    turn(self.character.heading, Turn::Right, self.config.rotation_increment);
            }
            InputEvent::ReleaseMove => {
                self.character.motion = MotionState::Idle;
            }
        }

        if event != InputEvent::ReleaseMove {
            self.refresh();
        }

        InputOutcome {
            event,
            character: self.character,
            blocked,
        }
    }

    /// Map and apply a key press; unknown keys change nothing
    pub fn handle_key_down(&mut self, key: &str) -> Option<InputOutcome> {
        InputEvent::from_key_down(key).map(|event| self.handle_input(event))
    }

    /// Map and apply a key release; unknown keys change nothing
    pub fn handle_key_up(&mut self, key: &str) -> Option<InputOutcome> {
        InputEvent::from_key_up(key).map(|event| self.handle_input(event))
    }

    /// Recompute camera, terrain and scale values for a new window size
    ///
    /// Tile size, terrain scale, move speed and the proximity radii change
    /// together. The character offset is rescaled with the tile size so it keeps
    /// its place on the terrain.
    pub fn on_viewport_changed(&mut self, window: Size) -> Layout {
        let old_tile = self.layout.scale.tile_size;
        let layout = resolve_layout(window, &self.config, self.grid);
        let new_tile = layout.scale.tile_size;

        if old_tile > 0.0 && new_tile > 0.0 {
            self.character.offset *= new_tile / old_tile;
        }
        self.layout = layout;
        self.refresh();

        log::debug!(
            "Viewport {}x{}: tile {:.2}, terrain scale {:.3}, speed scale {:.3}",
            window.width,
            window.height,
            layout.scale.tile_size,
            layout.scale.terrain_scale,
            layout.scale.move_speed_scale
        );
        layout
    }

    /// Advance the frame-driven part (zoom smoothing) by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        self.zoom
            .retarget(&self.proximity, self.relevance_radius(), &self.config.zoom);
        self.zoom.tick(dt, self.config.zoom.smoothing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::consts::REFERENCE_FRAME_DT;
    use crate::level::{Level, Obstacle, TerrainPicture, Tile};
    use glam::DVec2;

    const WINDOW: Size = Size::new(1024.0, 768.0);

    fn sim(obstacles: Vec<Obstacle>) -> Simulation {
        let level = Level::new(
            TerrainPicture {
                width: 1024.0,
                height: 768.0,
            },
            Tile { row: 20, col: 20 },
            obstacles,
        );
        Simulation::new(Config::default(), level, WINDOW)
    }

    #[test]
    fn test_forward_then_release() {
        let mut sim = sim(vec![]);
        let start = sim.character().offset;

        let outcome = sim.handle_input(InputEvent::MoveForward);
        assert!(!outcome.blocked);
        assert_eq!(outcome.character.motion, MotionState::Moving(Direction::Forward));
        assert_eq!(outcome.character.offset, start + DVec2::new(0.0, -20.0));

        let outcome = sim.handle_input(InputEvent::ReleaseMove);
        assert_eq!(outcome.character.motion, MotionState::Idle);
        assert_eq!(outcome.character.offset, start + DVec2::new(0.0, -20.0));
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut sim = sim(vec![]);
        sim.handle_input(InputEvent::RotateLeft);
        assert_eq!(sim.character().heading, 355.0);
        assert_eq!(sim.character().motion, MotionState::Idle);
        sim.handle_input(InputEvent::RotateRight);
        assert_eq!(sim.character().heading, 0.0);
    }

    #[test]
    fn test_blocked_move_nudges_and_keeps_state() {
        // Start tile (20, 20) with 48 px tiles: character at (972, 984). The tile
        // above spans y 912..960 and its center is ~49.5 px away. The first step
        // brings it within the collision radius, the second would land inside it.
        let mut sim = sim(vec![Obstacle::new("wall", 19, 20)]);
        assert!(sim.proximity().is_relevant("wall"));
        assert!(!sim.proximity().is_colliding("wall"));

        assert!(!sim.handle_input(InputEvent::MoveForward).blocked);
        assert!(sim.proximity().is_colliding("wall"));
        sim.handle_input(InputEvent::ReleaseMove);
        let start = sim.character().offset;

        let outcome = sim.handle_input(InputEvent::MoveForward);
        assert!(outcome.blocked);
        assert_eq!(outcome.character.motion, MotionState::Idle);
        let nudge = outcome.character.offset - start;
        assert!((nudge - DVec2::new(0.0, -2.0)).length() < 1e-9);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut sim = sim(vec![]);
        let before = *sim.character();
        assert!(sim.handle_key_down("a").is_none());
        assert!(sim.handle_key_up("ArrowLeft").is_none());
        assert_eq!(*sim.character(), before);

        assert!(sim.handle_key_down("ArrowUp").is_some());
        assert!(sim.character().motion.is_moving());
        sim.handle_key_up("ArrowUp");
        assert_eq!(sim.character().motion, MotionState::Idle);
    }

    #[test]
    fn test_viewport_change_rescales_together() {
        let mut sim = sim(vec![]);
        let start = sim.character().offset;

        let layout = sim.on_viewport_changed(Size::new(2048.0, 1536.0));
        assert!((layout.scale.tile_size - 96.0).abs() < 1e-9);
        assert!((layout.scale.terrain_scale - 6.0).abs() < 1e-9);
        assert!((sim.move_speed() - 40.0).abs() < 1e-9);
        assert!((sim.relevance_radius() - 160.0).abs() < 1e-9);
        assert!((sim.collision_radius() - 80.0).abs() < 1e-9);
        assert!((sim.character().offset - start * 2.0).length() < 1e-9);
    }

    #[test]
    fn test_walls_block_at_every_window_size() {
        // Wall two tiles up: three free steps, the fourth lands inside it
        for factor in [1.0, 2.0, 3.0] {
            let mut sim = sim(vec![Obstacle::new("wall", 18, 20)]);
            sim.on_viewport_changed(Size::new(1024.0 * factor, 768.0 * factor));

            for step in 0..3 {
                let outcome = sim.handle_input(InputEvent::MoveForward);
                assert!(!outcome.blocked, "window x{factor}, step {step}");
            }
            assert!(sim.proximity().is_colliding("wall"), "window x{factor}");
            assert!(sim.handle_input(InputEvent::MoveForward).blocked, "window x{factor}");
        }
    }

    #[test]
    fn test_zero_viewport_stays_finite() {
        let mut sim = sim(vec![Obstacle::new("rock", 3, 3)]);
        let layout = sim.on_viewport_changed(Size::ZERO);
        assert!(layout.scale.tile_size.is_finite());
        assert!(sim.character().offset.is_finite());
        sim.handle_input(InputEvent::MoveForward);
        assert!(sim.character().offset.is_finite());
    }

    #[test]
    fn test_tick_zooms_toward_nearest_obstacle() {
        let mut sim = sim(vec![Obstacle::new("wall", 19, 20)]);
        let nearest = sim.proximity().nearest().unwrap().distance();
        let expected = 1.0 + (80.0 - nearest) / 80.0 * 0.5;

        sim.tick(REFERENCE_FRAME_DT);
        assert!((sim.zoom().target - expected).abs() < 1e-12);
        assert!(sim.zoom().current > 1.0 && sim.zoom().current < expected);

        for _ in 0..300 {
            sim.tick(REFERENCE_FRAME_DT);
        }
        assert!((sim.zoom().current - expected).abs() < 1e-6);
    }

    #[test]
    fn test_tick_without_obstacles_keeps_zoom() {
        let mut sim = sim(vec![]);
        sim.tick(REFERENCE_FRAME_DT);
        assert_eq!(sim.zoom().target, 1.0);
        assert_eq!(sim.zoom().current, 1.0);
    }
}
