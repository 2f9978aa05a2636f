//! Stick Balance entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use stick_balance::Settings;
    use stick_balance::audio::AudioManager;
    use stick_balance::consts::*;
    use stick_balance::renderer::{RenderState, build_scene};
    use stick_balance::sim::{GameEvent, GamePhase, GameState, PowerUpKind, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        /// Unsimulated frame time (ms)
        accumulator: f64,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, settings.tuning.clone()),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(MAX_FRAME_MS);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                // Pointer, pause and click are all consumed by one tick
                let input = self.input.take();
                tick(&mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                log_event(&event);
                self.audio.handle(&event);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };
            let vertices = build_scene(&self.state.snapshot(), &self.settings);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snapshot = self.state.snapshot();

            if let Some(el) = document.get_element_by_id("hud") {
                match snapshot.hud_lines() {
                    Some([time, score, best]) => {
                        let _ = el.set_attribute("class", "");
                        set_text(&document, "hud-time", &time);
                        set_text(&document, "hud-score", &score);
                        set_text(&document, "hud-best", &best);
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            let effects: Vec<String> = snapshot
                .effects
                .iter()
                .map(|e| {
                    let name = match e.kind {
                        PowerUpKind::WindShield => "Wind Shield",
                        PowerUpKind::StickFreeze => "Stick Freeze",
                    };
                    format!("{} {:.1}s", name, e.remaining_ms / 1000.0)
                })
                .collect();
            set_text(&document, "hud-effects", &effects.join("  "));

            if let Some(el) = document.get_element_by_id("overlay") {
                if snapshot.overlay.is_empty() {
                    let _ = el.set_attribute("class", "hidden");
                } else {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&snapshot.overlay.join("\n")));
                }
            }
        }

        /// Adopt a new canvas layout size
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let logical = Vec2::new(client_w as f32, client_h as f32);
            self.state.set_canvas_size(logical.x, logical.y);
            // A pending pointer is in the old layout
            self.input.pointer_x = None;
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, logical);
            }
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::PowerUpCollected { kind, bonus } => {
                log::debug!("Collected {:?} (+{})", kind, bonus)
            }
            GameEvent::GameOver { score, new_record: true } => {
                log::info!("New best score: {}", score)
            }
            other => log::trace!("{:?}", other),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stick Balance starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        game.borrow_mut().resize(&canvas);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let logical = game.borrow().state.canvas;
        match RenderState::new(surface, &adapter, width, height, logical).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device, rendering disabled: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Stick Balance running!");
    }

    /// Keep `handler` attached to `target` for the lifetime of the page
    fn listen(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    /// Pointer x relative to the canvas, from a mouse or touch event
    fn pointer_x(canvas: &HtmlCanvasElement, event: &web_sys::Event) -> Option<f32> {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            return Some(mouse.offset_x() as f32);
        }
        let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(touch.client_x() as f32 - rect.left() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Disc follows the pointer
        for name in ["mousemove", "touchmove"] {
            let game = game.clone();
            let el = canvas.clone();
            listen(canvas, name, move |event| {
                if event.type_() == "touchmove" {
                    event.prevent_default();
                }
                if let Some(x) = pointer_x(&el, &event) {
                    game.borrow_mut().input.pointer_x = Some(x);
                }
            });
        }

        // Press or tap starts and restarts; first gesture also unlocks audio
        for name in ["mousedown", "touchstart"] {
            let game = game.clone();
            let el = canvas.clone();
            listen(canvas, name, move |event| {
                if event.type_() == "touchstart" {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.input.click = true;
                if let Some(x) = pointer_x(&el, &event) {
                    g.input.pointer_x = Some(x);
                }
                g.audio.resume();
            });
        }

        let Some(window) = web_sys::window() else { return };
        listen(&window, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            if matches!(key.key().as_str(), " " | "Escape") {
                // Space would scroll the page
                key.prevent_default();
                game.borrow_mut().input.pause = true;
            }
        });
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        listen(&window, "resize", move |_| game.borrow_mut().resize(&canvas));
    }

    /// Queue a pause if a round is running and no pause is already pending
    fn request_auto_pause(game: &RefCell<Game>, reason: &str) {
        let mut g = game.borrow_mut();
        if g.state.phase == GamePhase::Running && !g.input.pause {
            g.input.pause = true;
            log::info!("Auto-paused ({})", reason);
        }
    }

    /// Pause when the tab is hidden or the window loses focus
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        {
            let game = game.clone();
            let doc = document.clone();
            listen(&document, "visibilitychange", move |_| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    request_auto_pause(&game, "tab hidden");
                }
            });
        }

        listen(&window, "blur", move |_| request_auto_pause(&game, "window blur"));
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stick Balance (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let settings = stick_balance::Settings::load();
    let seed = settings.seed.unwrap_or(0x5eed);
    println!("\nRunning a scripted round (seed {seed})...");
    let state = headless_round(seed, settings.tuning);
    println!(
        "Balanced for {:.1}s, score {} ({:?})",
        state.time.elapsed_ms() / 1000.0,
        state.time.score,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with a simple PD controller on the disc for up to a minute
#[cfg(not(target_arch = "wasm32"))]
fn headless_round(
    seed: u64,
    tuning: stick_balance::Tuning,
) -> stick_balance::sim::GameState {
    use stick_balance::consts::{SIM_DT_MS, STICK_UPRIGHT};
    use stick_balance::sim::{GamePhase, GameState, TickInput, tick};

    const MAX_TICKS: u32 = 60 * 60;
    // Pixels of disc travel per radian of lean / per rad-per-tick of spin
    const LEAN_GAIN: f32 = 40.0;
    const SPIN_GAIN: f32 = 600.0;

    let mut state = GameState::new(seed, tuning);
    tick(
        &mut state,
        &TickInput {
            click: true,
            ..Default::default()
        },
        SIM_DT_MS,
    );

    for _ in 0..MAX_TICKS {
        if state.phase != GamePhase::Running {
            break;
        }
        let lean = state.stick.angle - STICK_UPRIGHT;
        let push = LEAN_GAIN * lean + SPIN_GAIN * state.stick.angular_vel;
        let input = TickInput {
            pointer_x: Some(state.disc.x - push),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);

        for event in state.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    state
}
