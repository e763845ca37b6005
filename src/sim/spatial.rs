//! Screen-space snapshot of the obstacle set
//!
//! Obstacles are static tiles, but the scene is translated and rotated around
//! the character, so their screen rects change on every move, turn and resize.
//! The cache is rebuilt from scratch each time: obstacle counts are in the tens.

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, TerrainGrid};
use crate::level::Obstacle;

/// Maps terrain-local points to screen space
///
/// `screen = pivot + R(rotation) * (p - offset)`, with `p` in terrain pixels.
/// The character sits at `offset` on the terrain and at `pivot` on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTransform {
    pub pivot: DVec2,
    pub offset: DVec2,
    /// Scene rotation around the pivot (degrees, clockwise on screen)
    pub rotation_degrees: f64,
    /// Rendered tile size, converts tile coordinates to terrain pixels
    pub tile_size: f64,
}

impl SceneTransform {
    pub fn new(pivot: DVec2, offset: DVec2, rotation_degrees: f64, tile_size: f64) -> Self {
        Self {
            pivot,
            offset,
            rotation_degrees,
            tile_size,
        }
    }

    #[inline]
    fn rotation(&self) -> DMat2 {
        DMat2::from_angle(self.rotation_degrees.to_radians())
    }

    /// Terrain-local point to screen
    #[inline]
    pub fn apply_point(&self, point: DVec2) -> DVec2 {
        self.pivot + self.rotation() * (point - self.offset)
    }

    /// Terrain-local direction to screen (rotation only)
    #[inline]
    pub fn apply_vector(&self, vector: DVec2) -> DVec2 {
        self.rotation() * vector
    }

    /// Screen-space bounding box of a terrain-local rect
    pub fn project_rect(&self, rect: &Rect) -> Rect {
        let rotation = self.rotation();
        let corners = rect
            .corners()
            .map(|corner| self.pivot + rotation * (corner - self.offset));
        Rect::bounding(&corners)
    }
}

/// An obstacle projected into screen space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedObstacle {
    pub id: String,
    pub rect: Rect,
    pub center: DVec2,
    pub interactable: bool,
}

/// Per-update snapshot of every obstacle's screen rect, in level order
#[derive(Debug, Clone, Default)]
pub struct SpatialCache {
    entries: Vec<CachedObstacle>,
}

impl SpatialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding precomputed entries
    pub fn from_entries(entries: Vec<CachedObstacle>) -> Self {
        Self { entries }
    }

    /// Rebuild every entry for the given transform
    pub fn refresh(&mut self, obstacles: &[Obstacle], transform: &SceneTransform) {
        self.entries.clear();
        self.entries.extend(obstacles.iter().map(|obstacle| {
            let local = TerrainGrid::cell_rect(obstacle.row, obstacle.col, transform.tile_size);
            let rect = transform.project_rect(&local);
            CachedObstacle {
                id: obstacle.id.clone(),
                rect,
                center: rect.center(),
                interactable: obstacle.interactable,
            }
        }));
    }

    pub fn entries(&self) -> &[CachedObstacle] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CachedObstacle> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
