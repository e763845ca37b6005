//! Terrain Walk entry point
//!
//! In the browser, wires DOM events and the animation-frame loop to the
//! simulation. Natively, runs a scripted headless walk and logs every frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use terrain_walk::platform::Renderer;
    use terrain_walk::platform::web::{DomRenderer, level_from_dom};
    use terrain_walk::sim::{Simulation, Size};
    use terrain_walk::{Config, Level};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        renderer: DomRenderer,
        last_time: f64,
    }

    impl Game {
        fn present(&mut self) {
            let frame = self.sim.frame();
            self.renderer.present(&frame);
        }
    }

    fn window_size(window: &web_sys::Window) -> Size {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(read(window.inner_width()), read(window.inner_height()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Terrain Walk starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let level = level_from_dom(&document).unwrap_or_else(|| {
            log::warn!("No level markup found, using the demo level");
            Level::demo()
        });
        let renderer = DomRenderer::new(document, &level).ok_or("missing scene elements")?;
        let sim = Simulation::new(Config::default(), level, window_size(&window));

        let game = Rc::new(RefCell::new(Game {
            sim,
            renderer,
            last_time: 0.0,
        }));
        game.borrow_mut().present();

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.sim.on_viewport_changed(window_size(&window));
                g.present();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.sim.handle_key_down(&event.key()).is_some() {
                    event.prevent_default();
                    g.present();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.sim.handle_key_up(&event.key()).is_some() {
                    g.present();
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) / 1000.0
            } else {
                terrain_walk::consts::REFERENCE_FRAME_DT
            };
            g.last_time = time;

            g.sim.tick(dt);
            g.present();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use terrain_walk::consts::REFERENCE_FRAME_DT;
    use terrain_walk::platform::{LogRenderer, Renderer};
    use terrain_walk::sim::{InputEvent, Simulation, Size};
    use terrain_walk::{Config, Level};

    env_logger::init();
    log::info!("Terrain Walk (headless) starting...");

    // Usage: terrain-walk [config.json] [level.json]
    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map(Config::load_or_default)
        .unwrap_or_default();
    let level = match args.next() {
        Some(path) => match Level::load(&path) {
            Ok(level) => level,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Level::demo(),
    };

    let reference = config.reference_resolution.size();
    let mut sim = Simulation::new(config, level, reference);
    let mut renderer = LogRenderer::new();

    // Walk toward the well, turn around, then resize the window mid-walk
    let script = [
        (InputEvent::MoveForward, 3),
        (InputEvent::MoveForward, 3),
        (InputEvent::MoveForward, 3),
        (InputEvent::ReleaseMove, 30),
        (InputEvent::RotateRight, 1),
        (InputEvent::RotateRight, 1),
        (InputEvent::MoveForward, 3),
        (InputEvent::MoveBackward, 3),
        (InputEvent::ReleaseMove, 30),
    ];

    for (step, (event, frames)) in script.into_iter().enumerate() {
        let outcome = sim.handle_input(event);
        if outcome.blocked {
            log::info!("{event:?} blocked at heading {:.0}", outcome.character.heading);
        }
        if step == 4 {
            let layout = sim.on_viewport_changed(Size::new(reference.width * 1.5, reference.height * 1.5));
            log::info!("Resized: tile size {:.1}", layout.scale.tile_size);
        }
        for _ in 0..frames {
            sim.tick(REFERENCE_FRAME_DT);
            renderer.present(&sim.frame());
        }
    }

    let character = sim.character();
    println!(
        "Walked to ({:.1}, {:.1}) facing {:.0} deg, zoom {:.3}, {} frames",
        character.offset.x,
        character.offset.y,
        character.heading,
        sim.zoom().current,
        renderer.frames()
    );
}
