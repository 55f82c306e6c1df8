//! Monster Whack entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{MouseEvent, TouchEvent};

    use monster_whack::audio::AudioManager;
    use monster_whack::consts::SIM_DT;
    use monster_whack::web::{DomUi, SceneBridge, session_seed};
    use monster_whack::{Game, Tuning};

    type BrowserGame = Game<SceneBridge, AudioManager, DomUi>;

    /// Game plus frame timing
    struct App {
        game: BrowserGame,
        last_time: f64,
    }

    fn window_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (1.0, 1.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        (w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Monster Whack starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let seed = session_seed();
        let mut game = Game::new(
            seed,
            Tuning::default(),
            SceneBridge::new(),
            AudioManager::new(),
            DomUi::new(),
        );
        let (w, h) = window_size();
        game.resize(w, h);
        let app = Rc::new(RefCell::new(App {
            game,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, app.clone());
        setup_buttons(&document, app.clone());

        request_animation_frame(app);

        log::info!("Monster Whack running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Mouse click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let outcome = a
                    .game
                    .pointer_down(event.client_x() as f32, event.client_y() as f32);
                log::debug!("mousedown -> {:?}", outcome);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start, first touch point only
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                event.prevent_default();
                let mut a = app.borrow_mut();
                let outcome = a
                    .game
                    .pointer_down(touch.client_x() as f32, touch.client_y() as f32);
                log::debug!("touchstart -> {:?}", outcome);
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (w, h) = window_size();
                app.borrow_mut().game.resize(w, h);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("start-button") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Don't let the click fall through to the scene
                event.stop_propagation();
                let mut a = app.borrow_mut();
                a.game.audio_mut().resume();
                a.game.start_session();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("#start-button missing");
        }

        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut a = app.borrow_mut();
                a.game.restart_session();
                a.last_time = 0.0;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("#restart-button missing");
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.game.frame(dt);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Monster Whack (native) starting...");
    log::info!("Native mode runs a headless session - serve the wasm build for the real game");

    headless_demo(std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(2024));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a seeded session with a scripted clicker until game over or time runs out
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(seed: u64) {
    use monster_whack::consts::SIM_DT;
    use monster_whack::platform::Headless;
    use monster_whack::sim::{Camera, HitOutcome, MonsterState};
    use monster_whack::{Game, Tuning};

    let tuning = match std::env::var("MONSTER_WHACK_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad tuning file {}: {} - using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Can't read {}: {} - using defaults", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };
    match tuning.to_json() {
        Ok(json) => log::debug!("effective tuning:\n{}", json),
        Err(e) => log::warn!("Can't serialize tuning: {}", e),
    }

    let mut game = Game::new(seed, tuning, Headless::default(), Headless::default(), Headless::default());
    game.start_session();

    // Ten simulated minutes; click a good monster about twice a second
    let mut misses = 0u32;
    for frame in 0..36_000u32 {
        game.frame(SIM_DT);
        if game.state.is_over() {
            break;
        }
        if frame % 30 != 0 {
            continue;
        }

        let viewport = game.viewport();
        let camera = Camera::orbit(game.state.camera_angle, viewport.aspect());
        let target = game
            .state
            .good
            .iter()
            .filter(|m| m.state == MonsterState::Active && !m.is_bouncing)
            .find_map(|m| camera.project(m.pose().position));
        let Some(ndc) = target else { continue };

        let point = viewport.to_screen(ndc);
        match game.pointer_down(point.x, point.y) {
            HitOutcome::Good { score, .. } => log::debug!("frame {}: hit, score {}", frame, score),
            HitOutcome::Bad { score, .. } => log::debug!("frame {}: oops, score {}", frame, score),
            _ => misses += 1,
        }
    }

    log::info!(
        "Session over after {:.1}s: score {}, difficulty {}, {} monsters on field, {} misses",
        game.state.clock(),
        game.state.score,
        game.state.difficulty,
        game.state.monster_count(),
        misses
    );
    println!("final score: {}", game.ui().score);
}
