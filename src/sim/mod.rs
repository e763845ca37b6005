//! Simulation core
//!
//! Pure and presentation-free:
//! - No rendering, DOM or platform dependencies
//! - Single owner, no globals, no interior mutability
//! - Stable iteration order (level order of obstacles)

pub mod frame;
pub mod geometry;
pub mod movement;
pub mod proximity;
pub mod spatial;
pub mod state;
pub mod tick;
pub mod zoom;

pub use frame::RenderFrame;
pub use geometry::{CameraFit, Layout, Rect, ScaleInfo, Size, TerrainGrid, fit_camera, resolve_layout, resolve_scale};
pub use movement::{Direction, MotionState, MoveContext, MoveOutcome, Turn, displacement, try_move, turn};
pub use proximity::{Label, NearbyObstacle, ObstacleOverlay, Proximity, classify};
pub use spatial::{CachedObstacle, SceneTransform, SpatialCache};
pub use state::{CharacterState, Simulation};
pub use tick::{InputEvent, InputOutcome};
pub use zoom::{ZoomController, target_for_distance, target_zoom};
