//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use road_rush::audio::AudioManager;
    use road_rush::platform::FrameClock;
    use road_rush::renderer::CanvasSurface;
    use road_rush::sim::{GameObserver, Sound, StatsDelta};
    use road_rush::{CarCatalog, GameConfig, GameSession};

    /// Forwards simulation events to the DOM HUD and the speakers
    struct HostObserver {
        document: Document,
        audio: AudioManager,
        score: u64,
        distance: f64,
        level: u32,
    }

    impl HostObserver {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
            }
        }
    }

    impl GameObserver for HostObserver {
        fn score_changed(&mut self, score: u64) {
            self.score = score;
            self.set_text("#hud-score .hud-value", &score.to_string());
        }

        fn lives_changed(&mut self, lives: u8) {
            self.set_text("#hud-lives .hud-value", &lives.to_string());
        }

        fn level_changed(&mut self, level: u32) {
            self.level = level;
            self.set_text("#hud-level .hud-value", &level.to_string());
        }

        fn game_over(&mut self) {
            self.set_text("#final-distance", &format!("{:.1}", self.distance));
            self.set_text("#final-level", &self.level.to_string());
            self.set_text("#final-score", &self.score.to_string());
            self.set_hidden("game-over", false);
        }

        fn play_sound(&mut self, sound: Sound) {
            self.audio.play(sound);
        }

        fn stats_updated(&mut self, delta: &StatsDelta) {
            if let Some(distance) = delta.distance {
                self.distance = distance;
            }
            log::debug!("Stats: {:?}", delta);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession<HostObserver>,
        surface: CanvasSurface,
        clock: FrameClock,
        /// Whether a frame callback is scheduled
        looping: bool,
    }

    impl Game {
        fn toggle_pause(&mut self) {
            self.session.toggle_pause();
            if !self.session.is_paused() {
                self.clock.reset();
            }
            self.session
                .observer()
                .set_hidden("pause-menu", !self.session.is_paused());
        }

        fn auto_pause(&mut self, reason: &str) {
            if !self.session.is_paused() && !self.session.is_game_over() {
                self.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    /// Car id and day/night flag from `?car=<id>&night=1`
    fn launch_options(window: &web_sys::Window) -> (String, bool) {
        let search = window.location().search().unwrap_or_default();
        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return (String::new(), false);
        };
        let car = params.get("car").unwrap_or_default();
        let night = params
            .get("night")
            .is_some_and(|v| v == "1" || v == "true");
        (car, night)
    }

    fn new_session(
        document: &Document,
        audio: AudioManager,
        car_id: &str,
        night: bool,
    ) -> Result<GameSession<HostObserver>, JsValue> {
        let catalog = CarCatalog::default();
        let car = catalog.get_or_default(car_id).clone();
        let config = GameConfig::default();
        let seed = js_sys::Date::now() as u64;

        let observer = HostObserver {
            document: document.clone(),
            audio,
            score: 0,
            distance: 0.0,
            level: 1,
        };
        observer.set_text("#hud-score .hud-value", "0");
        observer.set_text("#hud-lives .hud-value", &config.starting_lives.to_string());
        observer.set_text("#hud-level .hud-value", "1");
        observer.set_hidden("game-over", true);
        observer.set_hidden("pause-menu", true);

        log::info!("Game initialized with seed: {}", seed);
        GameSession::new(config, car, !night, seed, observer)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Road Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (car_id, night) = launch_options(&window);
        let session = new_session(&document, AudioManager::new(), &car_id, night)?;
        canvas.set_width(session.config().canvas_width as u32);
        canvas.set_height(session.config().canvas_height as u32);

        let game = Rc::new(RefCell::new(Game {
            session,
            surface: CanvasSurface::from_canvas(&canvas)?,
            clock: FrameClock::new(),
            looping: true,
        }));

        setup_keyboard(&window, game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(&document, game.clone(), car_id, night);
        setup_auto_pause(&window, &document, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Road Rush running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.toggle_pause(),
                    "m" | "M" => {
                        let muted = g.session.observer_mut().audio.toggle_muted();
                        log::info!("Muted: {}", muted);
                    }
                    key => {
                        g.session.observer().audio.resume();
                        if g.session.input_mut().key_down(key) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            game.borrow_mut().session.input_mut().key_up(&event.key());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.session.observer().audio.resume();
                    g.session
                        .input_mut()
                        .touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .session
                        .input_mut()
                        .touch_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
            game.borrow_mut().session.input_mut().touch_end();
        });
        let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
        closure.forget();
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
            if !g.session.wants_frames() {
                g.looping = false;
                log::info!("Frame loop stopped");
                return;
            }

            let Game {
                session,
                surface,
                clock,
                ..
            } = &mut *g;
            let elapsed = clock.elapsed_ms(time);
            session.frame(elapsed, surface);
        }

        request_animation_frame(game);
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>, car_id: String, night: bool) {
        // Resume button
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Quit button
        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.stop();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let restart_loop = {
                    let mut g = game.borrow_mut();
                    // Keep the existing AudioContext; browsers cap how many a page may open
                    let audio = std::mem::replace(
                        &mut g.session.observer_mut().audio,
                        AudioManager::disabled(),
                    );
                    g.session = match new_session(&document, audio, &car_id, night) {
                        Ok(s) => s,
                        Err(e) => {
                            log::error!("Restart failed: {:?}", e);
                            return;
                        }
                    };
                    g.clock.reset();
                    let idle = !g.looping;
                    g.looping = true;
                    idle
                };
                if restart_loop {
                    request_animation_frame(game.clone());
                }
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            game.borrow_mut().auto_pause("window blur");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use road_rush::renderer::RecordingSurface;
    use road_rush::sim::GameEvent;
    use road_rush::{CarCatalog, GameConfig, GameSession};

    env_logger::init();
    log::info!("Road Rush (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable game");

    let car_id = std::env::args().nth(1).unwrap_or_default();
    let car = CarCatalog::default().get_or_default(&car_id).clone();

    let mut session = match GameSession::new(GameConfig::default(), car, true, 2024, Vec::new()) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Could not start session: {e}");
            std::process::exit(1);
        }
    };

    // Floor it and weave between lanes until the run ends or two minutes pass
    let mut surface = RecordingSurface::default();
    session.input_mut().key_down("ArrowUp");
    let mut frames = 0u32;
    while session.wants_frames() && frames < 60 * 120 {
        let steer = if (frames / 90) % 2 == 0 { "ArrowLeft" } else { "ArrowRight" };
        session.input_mut().key_down(steer);
        session.frame(1000.0 / 60.0, &mut surface);
        session.input_mut().key_up(steer);
        frames += 1;

        for event in session.observer_mut().drain(..) {
            match event {
                GameEvent::ScoreChanged(_) => {}
                other => log::info!("{:?}", other),
            }
        }
    }
    session.stop();

    let stats = &session.state().stats;
    println!(
        "\n{} frames: score {}, level {}, distance {:.2}, lives {}, crashes {} ({} draw calls in the last frame)",
        frames,
        stats.score,
        stats.level,
        stats.distance,
        stats.lives,
        stats.crashes,
        surface.commands.len()
    );
}
