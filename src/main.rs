//! Neon Velocity entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use neon_velocity::commentary::{Commentator, GeminiClient, GeminiConfig, MessageSlot};
    use neon_velocity::consts::*;
    use neon_velocity::renderer::{canvas, scene};
    use neon_velocity::sim::{GameState, InputState, LaneSpawner, tick};
    use neon_velocity::{HudSync, Settings, platform};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        spawner: LaneSpawner,
        input: InputState,
        hud: HudSync,
        commentator: Commentator,
        settings: Settings,
        ctx: CanvasRenderingContext2d,
        document: Document,
        // Timestamp of the pit boss message currently on screen
        shown_message: Option<f64>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(ctx: CanvasRenderingContext2d, document: Document, settings: Settings) -> Self {
            let client = GeminiClient::new(GeminiConfig::default());
            Self {
                state: GameState::new(),
                spawner: LaneSpawner::new(platform::random_seed()),
                input: InputState::default(),
                hud: HudSync::new(settings.hud_sync),
                commentator: Commentator::new(Rc::new(client), MessageSlot::new()),
                settings,
                ctx,
                document,
                shown_message: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Start a fresh run (title screen or after game over)
        fn start(&mut self) {
            self.spawner = LaneSpawner::new(platform::random_seed());
            self.state.reset();
            self.flush_events();
        }

        /// Run one simulation step
        fn update(&mut self, time: f64) {
            tick(&mut self.state, &self.input, &mut self.spawner);
            self.flush_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Hand this frame's events to the pit boss and the HUD
        fn flush_events(&mut self) {
            let events = self.state.drain_events();

            self.commentator.dispatch(
                &events,
                &self.state.run,
                self.settings.commentary,
                platform::spawn_detached,
            );

            if self.hud.observe(&self.state.run, &events) {
                self.update_hud();
            }
        }

        /// Render the current frame
        fn render(&self) {
            let commands = scene::build(&self.state);
            canvas::paint(&self.ctx, &commands);
        }

        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        /// Update HUD elements in DOM from the synced snapshot
        fn update_hud(&self) {
            let hud = self.hud.snapshot();

            self.set_text("#hud-score .hud-value", &hud.score.to_string());
            self.set_text("#hud-speed .hud-value", &hud.display_speed().to_string());

            // Lives pips
            for i in 0..STARTING_LIVES {
                if let Some(pip) = self.document.get_element_by_id(&format!("life-{i}")) {
                    let class = if i < hud.lives { "pip lit" } else { "pip" };
                    let _ = pip.set_attribute("class", class);
                }
            }

            self.set_hidden("start-overlay", hud.game_started);
            self.set_hidden("game-over", !hud.is_game_over);
            if hud.is_game_over {
                self.set_text("#final-score", &hud.score.to_string());
            }
        }

        /// Per-frame overlay bits that don't go through the HUD sync
        fn update_overlay(&mut self, now: f64) {
            let message = self.commentator.slot().visible(now);
            let shown = message.as_ref().map(|m| m.timestamp_ms);
            if shown != self.shown_message {
                self.shown_message = shown;
                if let Some(message) = &message {
                    self.set_text("#pit-boss-text", &format!("\"{}\"", message.text));
                }
                self.set_hidden("pit-boss", message.is_none());
            }

            if self.settings.show_fps && self.frame_index == 0 {
                self.set_text("#hud-fps .hud-value", &self.fps.to_string());
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Velocity starting...");

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
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("getContext failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        if let Some(fps) = document.get_element_by_id("hud-fps") {
            let _ = fps.set_attribute("class", if settings.show_fps { "" } else { "hidden" });
        }

        let game = Rc::new(RefCell::new(Game::new(ctx, document, settings)));
        game.borrow().update_hud();

        setup_input_handlers(game.clone());
        setup_start_buttons(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Velocity running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down / key up feed the held-control array
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.apply_key(&event.code(), pressed) {
                    // Arrow keys would otherwise scroll the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // P toggles the pit boss
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "KeyP" && !event.repeat() {
                    let mut g = game.borrow_mut();
                    g.settings.commentary = !g.settings.commentary;
                    g.settings.save();
                    log::info!("Pit boss commentary: {}", g.settings.commentary);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside) - keyup never arrives, release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_overlay(platform::now_ms());
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
    log::info!("Neon Velocity (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::run(neon_velocity::platform::random_seed());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run for native builds
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::rc::Rc;

    use neon_velocity::commentary::{Commentator, GeminiClient, GeminiConfig, MessageSlot};
    use neon_velocity::consts::*;
    use neon_velocity::sim::{Control, GameState, InputState, LaneSpawner, tick};
    use neon_velocity::{HudSync, platform};

    /// Two minutes at 60 Hz
    const MAX_FRAMES: u32 = 60 * 120;
    /// How far ahead the autopilot looks for traffic
    const LOOKAHEAD: f32 = 250.0;

    /// Steer away from the closest car bearing down on the player
    pub fn autopilot(state: &GameState) -> InputState {
        let mut input = InputState::default();
        let player = &state.player;
        let player_center = player.pos.x + player.size.x / 2.0;

        let threat = state
            .traffic
            .iter()
            .filter(|car| {
                let ahead = player.pos.y - (car.pos.y + car.size.y);
                ahead < LOOKAHEAD && car.pos.y < player.pos.y + player.size.y
            })
            .filter(|car| {
                car.pos.x < player.pos.x + player.size.x + PLAYER_MOVE_SPEED
                    && car.pos.x + car.size.x > player.pos.x - PLAYER_MOVE_SPEED
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let Some(car) = threat {
            let (min_x, max_x) = state.road.player_x_range(player.size.x);
            let car_center = car.pos.x + car.size.x / 2.0;
            let go_right = if player.pos.x <= min_x {
                true
            } else if player.pos.x >= max_x {
                false
            } else {
                player_center >= car_center
            };
            input.set(if go_right { Control::Right } else { Control::Left }, true);
        }
        input
    }

    /// Hand the last tick's events to the pit boss and the HUD log
    fn flush_events(state: &mut GameState, commentator: &Commentator, hud: &mut HudSync) {
        let events = state.drain_events();
        commentator.dispatch(&events, &state.run, true, platform::spawn_detached);
        if hud.observe(&state.run, &events) {
            let snap = hud.snapshot();
            log::debug!(
                "HUD score={} speed={}km/h lives={}",
                snap.score,
                snap.display_speed(),
                snap.lives
            );
        }
    }

    /// Play one autopilot run and return the final state
    pub fn run(seed: u64) -> GameState {
        let slot = MessageSlot::new();
        let commentator = Commentator::new(
            Rc::new(GeminiClient::new(GeminiConfig::default())),
            slot.clone(),
        );
        let mut hud = HudSync::default();
        let mut spawner = LaneSpawner::new(seed);
        let mut state = GameState::new();
        state.reset();

        log::info!("Demo seed: {seed}");

        flush_events(&mut state, &commentator, &mut hud);
        for _ in 0..MAX_FRAMES {
            if state.run.is_game_over() {
                break;
            }
            let input = autopilot(&state);
            tick(&mut state, &input, &mut spawner);
            flush_events(&mut state, &commentator, &mut hud);
        }

        log::info!(
            "Demo finished: score {}, distance {:.1}, top speed {}km/h, lives {}",
            state.run.score,
            state.run.distance,
            neon_velocity::display_speed(state.run.speed),
            state.run.lives
        );
        if let Some(message) = slot.latest() {
            log::info!("Pit boss: {}", message.text);
        }
        state
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_run_leaves_no_events_behind() {
            let mut state = run(42);
            assert!(state.run.is_game_over() || state.run.score >= MAX_FRAMES as u64);
            assert!(state.drain_events().is_empty());
        }

        #[test]
        fn test_autopilot_idles_on_empty_road() {
            let mut state = GameState::new();
            state.reset();
            assert_eq!(autopilot(&state).steer(), 0.0);
        }
    }
}
