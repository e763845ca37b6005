//! Viewport geometry and scale resolution
//!
//! Everything derived from the window size lives here: the letterboxed camera,
//! the game container, the terrain tile size, the terrain scale and the
//! movement speed scale. All of it is recomputed together on a resize.
//!
//! Degenerate inputs (zero, negative or non-finite sizes) never produce NaN or
//! Infinity: every ratio goes through [`safe_ratio`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::safe_ratio;

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace negative or non-finite dimensions with zero
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(clean(self.width), clean(self.height))
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Width over height, 0 when the height is degenerate
    #[inline]
    pub fn aspect(&self) -> f64 {
        safe_ratio(self.width, self.height)
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    #[inline]
    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            min: DVec2::new(left, top),
            max: DVec2::new(left + width, top + height),
        }
    }

    /// Smallest rect containing every point (empty input gives a zero rect)
    pub fn bounding(points: &[DVec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };
        let (min, max) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self { min, max }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.max.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Strict containment: a point on an edge is outside
    #[inline]
    pub fn contains_exclusive(&self, point: DVec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }
}

/// The letterboxed camera inside the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFit {
    /// Camera rect in window coordinates
    pub rect: Rect,
    /// Size of the game container drawn inside the camera
    pub game_size: Size,
}

/// Fit the largest rect with the reference aspect ratio into the window, centered
///
/// The game container keeps the reference size while the camera is smaller than
/// the reference in either dimension, and follows the camera otherwise.
pub fn fit_camera(window: Size, reference: Size) -> CameraFit {
    let window = window.sanitized();
    let reference = reference.sanitized();
    let aspect = reference.aspect();

    let (width, height) = if aspect == 0.0 || window.height == 0.0 {
        (0.0, 0.0)
    } else if window.aspect() > aspect {
        // Wider than the reference: height bound
        (window.height * aspect, window.height)
    } else {
        // Taller than the reference: width bound
        (window.width, safe_ratio(window.width, aspect))
    };

    let rect = Rect::new(
        (window.width - width) / 2.0,
        (window.height - height) / 2.0,
        width,
        height,
    );
    let game_size = if width < reference.width || height < reference.height {
        reference
    } else {
        Size::new(width, height)
    };

    CameraFit { rect, game_size }
}

/// Column/row counts of the terrain picture
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub columns: f64,
    pub rows: f64,
}

impl TerrainGrid {
    pub fn from_picture(width: f64, height: f64, base_tile_size: f64) -> Self {
        Self {
            columns: safe_ratio(width, base_tile_size),
            rows: safe_ratio(height, base_tile_size),
        }
    }

    /// Terrain-local rect of a tile
    pub fn cell_rect(row: u32, col: u32, tile_size: f64) -> Rect {
        Rect::new(
            col as f64 * tile_size,
            row as f64 * tile_size,
            tile_size,
            tile_size,
        )
    }

    /// Every tile of the grid as `(row, col, rect)`, column by column
    ///
    /// A partial last column or row still gets a cell.
    pub fn cells(&self, tile_size: f64) -> impl Iterator<Item = (u32, u32, Rect)> {
        let columns = self.columns.max(0.0).ceil() as u32;
        let rows = self.rows.max(0.0).ceil() as u32;
        (0..columns)
            .flat_map(move |col| (0..rows).map(move |row| (row, col, Self::cell_rect(row, col, tile_size))))
    }
}

/// Scale values derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    /// Rendered size of one terrain tile
    pub tile_size: f64,
    /// Terrain size relative to the reference resolution, never below 1
    pub terrain_scale: f64,
    /// Multiplier applied to the base move speed
    pub move_speed_scale: f64,
}

impl Default for ScaleInfo {
    fn default() -> Self {
        Self {
            tile_size: 0.0,
            terrain_scale: 1.0,
            move_speed_scale: 0.0,
        }
    }
}

/// Derive tile size, terrain scale and movement speed scale
///
/// `game` is the game container size. The terrain container is `game` times
/// `terrain_scale_factor` and the terrain grows with it; movement (and every
/// length tuned at the reference resolution) follows the game container.
pub fn resolve_scale(game: Size, reference: Size, terrain_scale_factor: f64, grid: TerrainGrid) -> ScaleInfo {
    let game = game.sanitized();
    let reference = reference.sanitized();
    let container = game.scaled(terrain_scale_factor).sanitized();

    let width_scale = safe_ratio(container.width, reference.width);
    let height_scale = safe_ratio(container.height, reference.height);
    // Grow to fill the container, never shrink below the reference size
    let terrain_scale = width_scale.min(height_scale).max(1.0);

    let move_speed_scale = safe_ratio(game.diagonal(), reference.diagonal());

    let terrain = reference.scaled(terrain_scale);
    let tile_size = safe_ratio(terrain.width, grid.columns).min(safe_ratio(terrain.height, grid.rows));

    ScaleInfo {
        tile_size,
        terrain_scale,
        move_speed_scale,
    }
}

/// Everything the renderer needs to size the scene, derived in one pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub window: Size,
    pub camera: CameraFit,
    /// Container the terrain is centered in (game size times the terrain scale factor)
    pub terrain_container: Size,
    /// Rendered terrain picture size
    pub terrain_size: Size,
    pub scale: ScaleInfo,
}

impl Layout {
    /// Screen position of the character: the camera center
    #[inline]
    pub fn pivot(&self) -> DVec2 {
        self.camera.rect.center()
    }

    /// Screen length of a distance tuned at the reference resolution
    #[inline]
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.scale.move_speed_scale
    }

    /// Effective move speed for a base speed
    #[inline]
    pub fn move_speed(&self, base_move_speed: f64) -> f64 {
        self.scale_length(base_move_speed)
    }
}

/// Resolve the full layout for a window size
pub fn resolve_layout(window: Size, config: &Config, grid: TerrainGrid) -> Layout {
    let window = window.sanitized();
    let reference = config.reference_resolution.size();
    let camera = fit_camera(window, reference);
    let scale = resolve_scale(camera.game_size, reference, config.terrain_scale_factor, grid);

    Layout {
        window,
        camera,
        terrain_container: camera.game_size.scaled(config.terrain_scale_factor).sanitized(),
        terrain_size: reference.scaled(scale.terrain_scale),
        scale,
    }
}
