//! Discrete character movement and rotation
//!
//! Every move input is one fixed step along the heading. The predicted center is
//! tested against the colliding obstacles; a blocked move still nudges the
//! character a little along its heading so it cannot wedge against geometry.
//! The nudge is not checked against other obstacles.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::proximity::NearbyObstacle;
use super::spatial::SceneTransform;
use crate::{heading_vector, normalize_degrees};

/// Movement direction relative to the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    Stationary,
}

impl Direction {
    /// +1 forward, -1 backward, 0 stationary
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::Stationary => 0.0,
        }
    }
}

/// Character motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Idle,
    Moving(Direction),
}

impl MotionState {
    pub fn direction(self) -> Direction {
        match self {
            MotionState::Idle => Direction::Stationary,
            MotionState::Moving(direction) => direction,
        }
    }

    pub fn is_moving(self) -> bool {
        matches!(self, MotionState::Moving(_))
    }
}

/// Rotation input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

/// Apply a turn, wrapping to [0, 360)
pub fn turn(heading: f64, turn: Turn, increment: f64) -> f64 {
    match turn {
        Turn::Left => normalize_degrees(heading - increment),
        Turn::Right => normalize_degrees(heading + increment),
    }
}

/// Terrain-space step for one move input
///
/// `dx = sign * speed * sin(heading)`, `dy = -sign * speed * cos(heading)`.
#[inline]
pub fn displacement(direction: Direction, heading: f64, speed: f64) -> DVec2 {
    heading_vector(heading) * (direction.sign() * speed)
}

/// Everything a move test needs besides the character state
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Current scene transform; its pivot is the character center
    pub transform: SceneTransform,
    /// Effective move speed
    pub speed: f64,
    /// Nudge distance applied on a blocked move
    pub escape_adjustment: f64,
}

/// Result of a move attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub offset: DVec2,
    pub moved: bool,
}

/// Try one step; commit it, or nudge along the heading when blocked
pub fn try_move(
    direction: Direction,
    heading: f64,
    offset: DVec2,
    colliding: &[NearbyObstacle],
    ctx: &MoveContext,
) -> MoveOutcome {
    if direction == Direction::Stationary {
        return MoveOutcome {
            offset,
            moved: false,
        };
    }

    let step = displacement(direction, heading, ctx.speed);
    // The cache lives in screen space, so the step is rotated with the scene
    let future = ctx.transform.pivot + ctx.transform.apply_vector(step);

    if let Some(blocker) = colliding.iter().find(|o| o.rect.contains_exclusive(future)) {
        log::debug!("Move {direction:?} blocked by `{}`", blocker.id);
        return MoveOutcome {
            offset: offset + heading_vector(heading) * ctx.escape_adjustment,
            moved: false,
        };
    }

    MoveOutcome {
        offset: offset + step,
        moved: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;

    fn ctx(rotation: f64) -> MoveContext {
        MoveContext {
            transform: SceneTransform::new(DVec2::ZERO, DVec2::ZERO, rotation, 16.0),
            speed: 20.0,
            escape_adjustment: 2.0,
        }
    }

    fn blocker(rect: Rect) -> NearbyObstacle {
        NearbyObstacle {
            id: "wall".into(),
            rect,
            center: rect.center(),
            interactable: false,
            distance_sq: rect.center().length_squared(),
        }
    }

    #[test]
    fn test_forward_at_heading_zero_moves_up() {
        let step = displacement(Direction::Forward, 0.0, 20.0);
        assert_eq!(step.x, 0.0);
        assert_eq!(step.y, -20.0);

        let outcome = try_move(Direction::Forward, 0.0, DVec2::ZERO, &[], &ctx(0.0));
        assert!(outcome.moved);
        assert_eq!(outcome.offset, DVec2::new(0.0, -20.0));
    }

    #[test]
    fn test_backward_is_inverse() {
        let forward = displacement(Direction::Forward, 30.0, 20.0);
        let backward = displacement(Direction::Backward, 30.0, 20.0);
        assert!((forward + backward).length() < 1e-12);
    }

    #[test]
    fn test_stationary_never_moves() {
        let outcome = try_move(Direction::Stationary, 45.0, DVec2::new(3.0, 4.0), &[], &ctx(0.0));
        assert!(!outcome.moved);
        assert_eq!(outcome.offset, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn test_blocked_move_applies_escape_nudge() {
        let wall = blocker(Rect::new(-10.0, -30.0, 20.0, 20.0));
        let outcome = try_move(Direction::Forward, 0.0, DVec2::new(100.0, 100.0), &[wall], &ctx(0.0));
        assert!(!outcome.moved);
        let nudge = outcome.offset - DVec2::new(100.0, 100.0);
        assert!((nudge.length() - 2.0).abs() < 1e-12);
        assert!((nudge - heading_vector(0.0) * 2.0).length() < 1e-12);
    }

    #[test]
    fn test_edge_contact_is_not_a_collision() {
        // Predicted center (0, -20) lies exactly on the bottom edge
        let wall = blocker(Rect::new(-10.0, -40.0, 20.0, 20.0));
        let outcome = try_move(Direction::Forward, 0.0, DVec2::ZERO, &[wall], &ctx(0.0));
        assert!(outcome.moved);
    }

    #[test]
    fn test_rotated_scene_tests_screen_up() {
        // Camera follows a 90 degree heading: forward is still screen-up
        let wall = blocker(Rect::new(-10.0, -30.0, 20.0, 20.0));
        let outcome = try_move(Direction::Forward, 90.0, DVec2::ZERO, &[wall.clone()], &ctx(-90.0));
        assert!(!outcome.moved);

        // Without the rotation the step goes right and passes
        let outcome = try_move(Direction::Forward, 90.0, DVec2::ZERO, &[wall], &ctx(0.0));
        assert!(outcome.moved);
        assert!((outcome.offset - DVec2::new(20.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_turn_wraps() {
        assert_eq!(turn(0.0, Turn::Left, 5.0), 355.0);
        assert_eq!(turn(355.0, Turn::Right, 5.0), 0.0);
        assert_eq!(turn(turn(120.0, Turn::Left, 5.0), Turn::Right, 5.0), 120.0);
    }

    #[test]
    fn test_motion_state() {
        assert_eq!(MotionState::Idle.direction(), Direction::Stationary);
        assert!(MotionState::Moving(Direction::Backward).is_moving());
        assert_eq!(Direction::Backward.sign(), -1.0);
    }
}
