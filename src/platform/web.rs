//! Browser adapter: reads the level from the DOM and applies frames as CSS
//!
//! Expected markup:
//! - `#camera-container > #game-container > #terrain-container > #terrain`
//! - `#terrain` carries `data-width`, `data-height`, `data-start-row`, `data-start-col`
//! - obstacles are `.collision` elements with an `id` and `data-row` / `data-col`,
//!   plus the `interactable` class when they should get a label
//! - `#character` is the sprite drawn at the camera center
//! - in debug mode a `#grid` of `.grid-cell` elements is added to `#terrain`

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::Renderer;
use crate::level::{Level, Obstacle, TerrainPicture, Tile, parse_tile_index};
use crate::sim::RenderFrame;

fn element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn data_number(el: &HtmlElement, key: &str) -> Option<f64> {
    el.dataset().get(key).and_then(|v| v.parse().ok())
}

/// Tile index from a `data-*` attribute; `Err` holds the rejected text
fn data_index(el: &HtmlElement, key: &str) -> Option<Result<u32, String>> {
    el.dataset()
        .get(key)
        .map(|v| parse_tile_index(&v).ok_or(v))
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

fn set_size(el: &HtmlElement, width: f64, height: f64) {
    set_style(el, "width", &format!("{width}px"));
    set_style(el, "height", &format!("{height}px"));
}

/// Build the level from the terrain and `.collision` elements
pub fn level_from_dom(document: &Document) -> Option<Level> {
    let terrain = element(document, "terrain")?;
    let picture = TerrainPicture {
        width: data_number(&terrain, "width")?,
        height: data_number(&terrain, "height")?,
    };
    let start_index = |key: &str| match data_index(&terrain, key) {
        Some(Ok(index)) => index,
        Some(Err(value)) => {
            log::warn!("#terrain has an invalid {key} `{value}`, using 0");
            0
        }
        None => 0,
    };
    let start = Tile {
        row: start_index("startRow"),
        col: start_index("startCol"),
    };

    let nodes = document.get_elements_by_class_name("collision");
    let mut obstacles = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|el| el.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let (row, col) = match (data_index(&el, "row"), data_index(&el, "col")) {
            (Some(Ok(row)), Some(Ok(col))) => (row, col),
            (None, _) | (_, None) => {
                log::warn!("Obstacle `{}` has no data-row/data-col, skipped", el.id());
                continue;
            }
            _ => {
                log::warn!("Obstacle `{}` has a negative or fractional data-row/data-col, skipped", el.id());
                continue;
            }
        };
        obstacles.push(Obstacle {
            id: el.id(),
            row,
            col,
            interactable: el.class_list().contains("interactable"),
        });
    }

    let level = Level::new(picture, start, obstacles);
    match level.validate() {
        Ok(()) => Some(level),
        Err(err) => {
            log::error!("Invalid level markup: {err}");
            None
        }
    }
}

/// Applies frames to the DOM with CSS transforms
pub struct DomRenderer {
    document: Document,
    camera: HtmlElement,
    game: HtmlElement,
    terrain_container: HtmlElement,
    terrain: HtmlElement,
    character: HtmlElement,
    obstacles: Vec<(HtmlElement, u32, u32)>,
    labels: HashMap<String, HtmlElement>,
    grid: Option<HtmlElement>,
    /// Columns, rows and tile size the debug grid was built for
    grid_key: Option<(f64, f64, f64)>,
}

impl DomRenderer {
    pub fn new(document: Document, level: &Level) -> Option<Self> {
        let obstacles = level
            .obstacles
            .iter()
            .filter_map(|o| element(&document, &o.id).map(|el| (el, o.row, o.col)))
            .collect();
        Some(Self {
            camera: element(&document, "camera-container")?,
            game: element(&document, "game-container")?,
            terrain_container: element(&document, "terrain-container")?,
            terrain: element(&document, "terrain")?,
            character: element(&document, "character")?,
            obstacles,
            labels: HashMap::new(),
            grid: None,
            grid_key: None,
            document,
        })
    }

    fn create_div(&self) -> Option<HtmlElement> {
        self.document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn apply_layout(&self, frame: &RenderFrame) {
        let layout = &frame.layout;
        let rect = layout.camera.rect;
        set_size(&self.camera, rect.width(), rect.height());
        set_style(&self.camera, "left", &format!("{}px", rect.left()));
        set_style(&self.camera, "top", &format!("{}px", rect.top()));

        let game = layout.camera.game_size;
        set_size(&self.game, game.width, game.height);
        set_style(&self.game, "transform", &format!("scale({})", frame.zoom));

        let container = layout.terrain_container;
        set_size(&self.terrain_container, container.width, container.height);
        set_style(
            &self.terrain_container,
            "transform",
            &format!(
                "translate(-50%, -50%) rotateX({}deg) rotate({}deg)",
                frame.inclination, frame.scene_rotation
            ),
        );

        // Put the character's terrain position at the container center
        set_size(&self.terrain, layout.terrain_size.width, layout.terrain_size.height);
        set_style(&self.terrain, "left", "0px");
        set_style(&self.terrain, "top", "0px");
        set_style(
            &self.terrain,
            "transform",
            &format!(
                "translate({}px, {}px)",
                container.width / 2.0 - frame.offset.x,
                container.height / 2.0 - frame.offset.y
            ),
        );

        if let Some(root) = self.document.document_element() {
            if let Ok(root) = root.dyn_into::<HtmlElement>() {
                set_style(&root, "--tile-size", &format!("{}px", frame.tile_size));
            }
        }

        for (el, row, col) in &self.obstacles {
            set_style(el, "left", &format!("{}px", *col as f64 * frame.tile_size));
            set_style(el, "top", &format!("{}px", *row as f64 * frame.tile_size));
            set_size(el, frame.tile_size, frame.tile_size);
        }
    }

    fn apply_character(&self, frame: &RenderFrame) {
        let classes = self.character.class_list();
        let _ = classes.toggle_with_force("walking", frame.walking);
        set_style(
            &self.character,
            "animation-duration",
            &format!("{}s", frame.walk_cycle),
        );
    }

    fn apply_overlays(&self, frame: &RenderFrame) {
        for overlay in &frame.overlays {
            let Some(el) = element(&self.document, &overlay.id) else {
                continue;
            };
            let classes = el.class_list();
            let _ = classes.toggle_with_force("relevant", frame.debug && overlay.in_relevance);
            let _ = classes.toggle_with_force("colliding", frame.debug && overlay.in_collision);
        }
    }

    fn apply_labels(&mut self, frame: &RenderFrame) {
        for label in &frame.labels {
            let el = match self.labels.get(&label.id) {
                Some(el) => el.clone(),
                None => {
                    let Some(el) = self.create_div() else {
                        continue;
                    };
                    el.set_id(&format!("label-{}", label.id));
                    el.set_class_name("interactable-label-fixed");
                    el.set_text_content(Some(&label.id));
                    if let Some(body) = self.document.body() {
                        let _ = body.append_child(&el);
                    }
                    self.labels.insert(label.id.clone(), el.clone());
                    el
                }
            };
            set_style(&el, "left", &format!("{}px", label.anchor.x));
            set_style(&el, "top", &format!("{}px", label.anchor.y));
        }

        // Drop labels for obstacles that left the relevance radius
        self.labels.retain(|id, el| {
            let keep = frame.labels.iter().any(|l| &l.id == id);
            if !keep {
                el.remove();
            }
            keep
        });
    }

    /// Debug tile grid: one labelled cell per tile, rebuilt when the tiles change
    fn apply_grid(&mut self, frame: &RenderFrame) {
        if !frame.debug {
            if let Some(grid) = self.grid.take() {
                grid.remove();
            }
            self.grid_key = None;
            return;
        }
        let key = (frame.grid.columns, frame.grid.rows, frame.tile_size);
        if self.grid_key == Some(key) {
            return;
        }
        if let Some(grid) = self.grid.take() {
            grid.remove();
        }
        let Some(grid) = self.create_div() else {
            return;
        };
        grid.set_id("grid");

        for (row, col, rect) in frame.grid.cells(frame.tile_size) {
            let Some(cell) = self.create_div() else {
                continue;
            };
            cell.set_class_name("grid-cell");
            let _ = cell.set_attribute("data-row", &row.to_string());
            let _ = cell.set_attribute("data-col", &col.to_string());
            set_style(&cell, "left", &format!("{}px", rect.left()));
            set_style(&cell, "top", &format!("{}px", rect.top()));
            if let Some(text) = self.create_div() {
                text.set_class_name("grid-cell-text");
                text.set_text_content(Some(&format!("{col}, {row}")));
                let _ = cell.append_child(&text);
            }
            let _ = grid.append_child(&cell);
        }

        let _ = self.terrain.append_child(&grid);
        log::debug!("Debug grid rebuilt for {:.1} px tiles", frame.tile_size);
        self.grid = Some(grid);
        self.grid_key = Some(key);
    }
}

impl Renderer for DomRenderer {
    fn present(&mut self, frame: &RenderFrame) {
        self.apply_layout(frame);
        self.apply_character(frame);
        self.apply_overlays(frame);
        self.apply_grid(frame);
        self.apply_labels(frame);
    }
}
