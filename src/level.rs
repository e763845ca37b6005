//! Level geometry
//!
//! A level is a terrain picture cut into square tiles, a start tile for the
//! character, and the tiles occupied by obstacles. Obstacles never move; only
//! their screen projection changes.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::geometry::TerrainGrid;

/// Errors raised while loading or validating a [`Level`]
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("terrain picture must be non-empty, got {width}x{height}")]
    EmptyTerrain { width: f64, height: f64 },
    #[error("duplicate obstacle id `{0}`")]
    DuplicateObstacle(String),
}

/// Pixel size of the terrain picture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPicture {
    pub width: f64,
    pub height: f64,
}

/// A tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
}

/// Parse a row or column index from markup
///
/// Only non-negative integers are tile indices; `-1`, `2.5` or `abc` are `None`.
pub fn parse_tile_index(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// A static obstacle occupying one tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Stable identity, also used as label text
    pub id: String,
    pub row: u32,
    pub col: u32,
    /// Interactable obstacles get a floating label while relevant
    #[serde(default)]
    pub interactable: bool,
}

impl Obstacle {
    pub fn new(id: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            interactable: false,
        }
    }

    pub fn interactable(mut self) -> Self {
        self.interactable = true;
        self
    }
}

/// Static level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub terrain: TerrainPicture,
    #[serde(default)]
    pub start: Tile,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl Level {
    pub fn new(terrain: TerrainPicture, start: Tile, obstacles: Vec<Obstacle>) -> Self {
        Self {
            terrain,
            start,
            obstacles,
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json_str(&json)?;
        log::info!(
            "Loaded level from {} ({} obstacles)",
            path.as_ref().display(),
            level.obstacles.len()
        );
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let TerrainPicture { width, height } = self.terrain;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(LevelError::EmptyTerrain { width, height });
        }

        let mut seen = HashSet::with_capacity(self.obstacles.len());
        for obstacle in &self.obstacles {
            if !seen.insert(obstacle.id.as_str()) {
                return Err(LevelError::DuplicateObstacle(obstacle.id.clone()));
            }
        }
        Ok(())
    }

    /// Tile grid of the terrain picture
    pub fn grid(&self, base_tile_size: f64) -> TerrainGrid {
        TerrainGrid::from_picture(self.terrain.width, self.terrain.height, base_tile_size)
    }

    /// Built-in level used when no level file is given
    pub fn demo() -> Self {
        Self::new(
            TerrainPicture {
                width: 1024.0,
                height: 768.0,
            },
            Tile { row: 9, col: 11 },
            vec![
                Obstacle::new("well", 5, 11).interactable(),
                Obstacle::new("rock-1", 9, 14),
                Obstacle::new("rock-2", 10, 14),
                Obstacle::new("fence-1", 13, 9),
                Obstacle::new("fence-2", 13, 10),
                Obstacle::new("fence-3", 13, 11),
                Obstacle::new("signpost", 8, 6).interactable(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let json = r#"{
            "terrain": { "width": 320, "height": 160 },
            "start": { "row": 2, "col": 3 },
            "obstacles": [
                { "id": "chest", "row": 1, "col": 1, "interactable": true },
                { "id": "wall", "row": 1, "col": 2 }
            ]
        }"#;
        let level = Level::from_json_str(json).unwrap();
        assert_eq!(level.start, Tile { row: 2, col: 3 });
        assert_eq!(level.obstacles.len(), 2);
        assert!(level.obstacles[0].interactable);
        assert!(!level.obstacles[1].interactable);

        let grid = level.grid(16.0);
        assert_eq!(grid.columns, 20.0);
        assert_eq!(grid.rows, 10.0);
    }

    #[test]
    fn test_defaults_when_omitted() {
        let level = Level::from_json_str(r#"{ "terrain": { "width": 16, "height": 16 } }"#).unwrap();
        assert_eq!(level.start, Tile::default());
        assert!(level.obstacles.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{
            "terrain": { "width": 32, "height": 32 },
            "obstacles": [
                { "id": "a", "row": 0, "col": 0 },
                { "id": "a", "row": 1, "col": 1 }
            ]
        }"#;
        let err = Level::from_json_str(json).unwrap_err();
        assert!(matches!(err, LevelError::DuplicateObstacle(id) if id == "a"));
    }

    #[test]
    fn test_rejects_empty_terrain() {
        let err = Level::from_json_str(r#"{ "terrain": { "width": 0, "height": 16 } }"#).unwrap_err();
        assert!(matches!(err, LevelError::EmptyTerrain { .. }));
    }

    #[test]
    fn test_parse_tile_index() {
        assert_eq!(parse_tile_index("7"), Some(7));
        assert_eq!(parse_tile_index(" 12 "), Some(12));
        assert_eq!(parse_tile_index("0"), Some(0));
        assert_eq!(parse_tile_index("-1"), None);
        assert_eq!(parse_tile_index("2.5"), None);
        assert_eq!(parse_tile_index(""), None);
        assert_eq!(parse_tile_index("abc"), None);
        assert_eq!(parse_tile_index("99999999999"), None);
    }

    #[test]
    fn test_demo_is_valid() {
        assert!(Level::demo().validate().is_ok());
    }
}
