//! Skate Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use skate_dash::renderer::{RenderError, RenderState, build_scene};
    use skate_dash::sim::Viewport;
    use skate_dash::{GameSession, Outfit, SessionPhase, Settings, Tuning};

    type Owner = Box<dyn FnMut(u32)>;

    /// Game instance holding the session and everything around it
    struct Game {
        session: GameSession<Owner>,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        outfit: Outfit,
        settings: Settings,
        tuning: Tuning,
        /// Pending requestAnimationFrame callback
        raf_handle: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    /// Session owner: show the game-over panel with the final score
    fn end_of_run_owner() -> Owner {
        Box::new(|final_score: u32| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&final_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        })
    }

    /// CSS-pixel viewport of the canvas
    fn css_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, settings: Settings) -> Self {
            let mut tuning = Tuning::default();
            settings.apply_to(&mut tuning);
            let viewport = css_viewport(&canvas);
            Self {
                session: GameSession::new(end_of_run_owner(), seed, viewport, tuning.clone()),
                render_state: None,
                canvas,
                outfit: Outfit::default(),
                settings,
                tuning,
                raf_handle: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Dispose of the current session and start a fresh one
        fn restart(&mut self, seed: u64) {
            self.cancel_frame();
            self.session.teardown();
            let idle = self.session.idle_mode();
            let viewport = css_viewport(&self.canvas);
            self.session =
                GameSession::new(end_of_run_owner(), seed, viewport, self.tuning.clone());
            self.session.set_idle_mode(idle);
            self.session.start();
            log::info!("Game restarted with seed: {}", seed);
        }

        fn cancel_frame(&mut self) {
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample is the one about to be overwritten
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let viewport = css_viewport(&self.canvas);
            let width = (viewport.width as f64 * dpr) as u32;
            let height = (viewport.height as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.session.resize(viewport.width, viewport.height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, viewport);
            }
            log::debug!("Resized to {}x{} ({}x{} px)", viewport.width, viewport.height, width, height);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };
            let vertices = build_scene(self.session.state(), &self.outfit, &self.settings, time);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    let viewport = render_state.viewport;
                    render_state.resize(w, h, viewport);
                }
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
            let state = self.session.state();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.floored_score().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                let class = if self.settings.show_fps { "hud-item" } else { "hud-item hidden" };
                let _ = el.set_attribute("class", class);
            }

            banner(&document, "combo-banner", &state.combo.text, state.combo.alpha, state.combo.scale);
            banner(&document, "milestone-banner", &state.milestone.text, state.milestone.alpha, 1.0);

            let power_ups = &state.power_ups;
            for (id, on) in [
                ("pu-double", power_ups.double_score.active()),
                ("pu-magnet", power_ups.magnet.active()),
                ("pu-shield", power_ups.shield),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if on { "power-up" } else { "power-up hidden" });
                }
            }

            if let Some(el) = document.get_element_by_id("idle-badge") {
                let _ = el.set_attribute("class", if self.session.idle_mode() { "" } else { "hidden" });
            }
        }
    }

    /// Fading text banner; hidden while empty
    fn banner(document: &web_sys::Document, id: &str, text: &str, alpha: f32, scale: f32) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        if text.is_empty() || alpha <= 0.0 {
            let _ = el.set_attribute("class", "banner hidden");
            return;
        }
        let _ = el.set_attribute("class", "banner");
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
        if let Ok(html) = el.dyn_into::<HtmlElement>() {
            let style = html.style();
            let _ = style.set_property("opacity", &format!("{:.3}", alpha));
            let _ = style.set_property("transform", &format!("scale({:.3})", scale));
        }
    }

    fn hide_game_over() {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-over"))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        viewport: Viewport,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        RenderState::new(surface, &adapter, width, height, viewport).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skate Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let viewport = css_viewport(&canvas);
        let width = (viewport.width as f64 * dpr) as u32;
        let height = (viewport.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone(), settings)));
        log::info!("Game initialized with seed: {}", seed);

        // The sim runs without a renderer; frames just aren't drawn
        match init_renderer(&canvas, width, height, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Renderer unavailable: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(game.clone());
        setup_restart_button(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        game.borrow_mut().session.start();
        request_animation_frame(game);

        log::info!("Skate Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.jump_press();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.jump_release();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.jump_press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.jump_release();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        if !event.repeat() {
                            game.borrow_mut().session.jump_press();
                        }
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        let idle = !g.session.idle_mode();
                        g.session.set_idle_mode(idle);
                        log::info!("Idle mode: {}", idle);
                    }
                    "f" | "F" => {
                        let mut g = game.borrow_mut();
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "Enter" => {
                        let ended = game.borrow().session.phase() == SessionPhase::Ended;
                        if ended {
                            restart(game.clone());
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp") {
                    game.borrow_mut().session.jump_release();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().handle_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn restart(game: Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        game.borrow_mut().restart(seed);
        hide_game_over();
        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle_owner = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => handle_owner.borrow_mut().raf_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            g.track_fps(time);
            let keep_going = g.session.frame(time);
            g.render(time);
            g.update_hud();
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
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
    log::info!("Skate Dash (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    headless_autoplay();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot play a seeded run at a fixed 60 Hz and report the score
#[cfg(not(target_arch = "wasm32"))]
fn headless_autoplay() {
    use skate_dash::sim::Viewport;
    use skate_dash::{GameSession, Tuning};

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut final_score = None;
    let mut session = GameSession::new(
        |score: u32| final_score = Some(score),
        seed,
        Viewport::default(),
        Tuning::default(),
    );
    session.set_idle_mode(true);
    session.start();

    let frame_ms = 1000.0 / 60.0;
    let max_frames = 60 * 60 * 5;
    let mut frames = 0;
    while frames < max_frames && session.frame(frames as f64 * frame_ms) {
        frames += 1;
    }
    let live_score = session.state().floored_score();
    drop(session);

    match final_score {
        Some(score) => println!("Seed {}: crashed after {} frames with {} points", seed, frames, score),
        None => println!("Seed {}: survived {} frames with {} points", seed, frames, live_score),
    }
}
