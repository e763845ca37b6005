//! Platform adapters
//!
//! The simulation only computes values; adapters apply them to a surface:
//! - `Renderer`: the seam every presentation surface implements
//! - `LogRenderer`: headless renderer that logs what would be drawn
//! - `web`: DOM renderer and event wiring (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::RenderFrame;

/// A presentation surface
pub trait Renderer {
    fn present(&mut self, frame: &RenderFrame);
}

/// Renderer for headless runs: logs label changes and a per-frame summary
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    visible_labels: Vec<String>,
    /// Columns, rows and tile size the debug grid was last built for
    grid_key: Option<(f64, f64, f64)>,
    grid_cells: usize,
    grid_builds: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ids of the labels shown by the last presented frame
    pub fn visible_labels(&self) -> &[String] {
        &self.visible_labels
    }

    /// Cell count of the current debug grid (0 outside debug mode)
    pub fn grid_cells(&self) -> usize {
        self.grid_cells
    }

    pub fn grid_builds(&self) -> u64 {
        self.grid_builds
    }

    fn update_grid(&mut self, frame: &RenderFrame) {
        if !frame.debug {
            self.grid_key = None;
            self.grid_cells = 0;
            return;
        }
        let key = (frame.grid.columns, frame.grid.rows, frame.tile_size);
        if self.grid_key == Some(key) {
            return;
        }
        self.grid_key = Some(key);
        self.grid_cells = frame.grid.cells(frame.tile_size).count();
        self.grid_builds += 1;
        log::debug!("Debug grid: {} cells of {:.1} px", self.grid_cells, frame.tile_size);
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &RenderFrame) {
        self.frames += 1;

        let labels: Vec<String> = frame.labels.iter().map(|l| l.id.clone()).collect();
        for id in labels.iter().filter(|id| !self.visible_labels.contains(id)) {
            log::info!("Label shown: {id}");
        }
        for id in self.visible_labels.iter().filter(|id| !labels.contains(id)) {
            log::info!("Label hidden: {id}");
        }
        self.visible_labels = labels;

        log::debug!(
            "Frame {}: offset ({:.1}, {:.1}) heading {:.0} zoom {:.3} walking {}",
            self.frames,
            frame.offset.x,
            frame.offset.y,
            frame.heading,
            frame.zoom,
            frame.walking
        );
        self.update_grid(frame);
        if frame.debug {
            for overlay in frame.overlays.iter().filter(|o| o.in_relevance) {
                log::debug!(
                    "  {} at ({:.1}, {:.1}){}",
                    overlay.id,
                    overlay.rect.center().x,
                    overlay.rect.center().y,
                    if overlay.in_collision { " [colliding]" } else { "" }
                );
            }
        }
    }
}
