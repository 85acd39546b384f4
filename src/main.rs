//! Star Strike entry point
//!
//! On the web: wires the canvas, DOM screens, keyboard and
//! `requestAnimationFrame` to the game. Natively: runs a headless autopilot
//! session and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlInputElement};

    use star_strike::consts::{GAME_HEIGHT, GAME_WIDTH};
    use star_strike::game::LoopToken;
    use star_strike::renderer::{RenderCommand, RenderSink, SpriteKind, starfield};
    use star_strike::sim::InputEvent;
    use star_strike::{AudioManager, Game, Screen, Settings};

    /// Render sink drawing onto a 2D canvas, with solid-color fallback for
    /// sprites that have not loaded
    struct CanvasSink {
        ctx: CanvasRenderingContext2d,
        images: HashMap<SpriteKind, HtmlImageElement>,
    }

    impl CanvasSink {
        fn new(ctx: CanvasRenderingContext2d) -> Self {
            let mut images = HashMap::new();
            for kind in SpriteKind::ALL {
                match HtmlImageElement::new() {
                    Ok(img) => {
                        img.set_src(&format!("assets/{}.svg", kind.asset_name()));
                        images.insert(kind, img);
                    }
                    Err(e) => log::warn!("Failed to create image for {:?}: {:?}", kind, e),
                }
            }
            Self { ctx, images }
        }

        fn loaded(&self, kind: SpriteKind) -> Option<&HtmlImageElement> {
            self.images
                .get(&kind)
                .filter(|img| img.complete() && img.natural_width() > 0)
        }
    }

    impl RenderSink for CanvasSink {
        fn begin_frame(&mut self) {
            self.ctx
                .clear_rect(0.0, 0.0, GAME_WIDTH as f64, GAME_HEIGHT as f64);
        }

        fn draw(&mut self, command: &RenderCommand) {
            let r = command.rect;
            let (x, y, w, h) = (r.x() as f64, r.y() as f64, r.width() as f64, r.height() as f64);

            if let Some(img) = self.loaded(command.kind) {
                if self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
                    .is_ok()
                {
                    return;
                }
            }
            self.ctx.set_fill_style_str(command.kind.fallback_css());
            self.ctx.fill_rect(x, y, w, h);

            if command.kind == SpriteKind::Background {
                self.ctx.set_fill_style_str("white");
                for star in starfield(&mut rand::rng()) {
                    self.ctx.fill_rect(
                        star.x() as f64,
                        star.y() as f64,
                        star.width() as f64,
                        star.height() as f64,
                    );
                }
            }
        }
    }

    /// Everything the page callbacks share
    struct Host {
        game: Game,
        audio: AudioManager,
        sink: CanvasSink,
        token: Option<LoopToken>,
        raf_id: Option<i32>,
    }

    impl Host {
        fn start(&mut self) -> LoopToken {
            self.cancel_frame();
            let now = now_ms();
            self.audio.resume();
            let token = self.game.start_game(now, &mut self.audio);
            self.token = Some(token);
            token
        }

        fn navigate(&mut self, screen: Screen) {
            self.game.show_screen(screen, &mut self.audio);
            self.cancel_frame();
        }

        fn cancel_frame(&mut self) {
            self.token = None;
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::default();
        let host = Rc::new(RefCell::new(Host {
            audio: AudioManager::new(&settings),
            game: Game::new(settings),
            sink: CanvasSink::new(ctx),
            token: None,
            raf_id: None,
        }));

        setup_buttons(host.clone());
        setup_toggles(host.clone());
        setup_keyboard(host.clone());
        sync_screens(&host.borrow().game);

        log::info!("Star Strike ready");
    }

    fn on_click(id: &str, host: Rc<RefCell<Host>>, action: fn(&Rc<RefCell<Host>>)) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&host);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start_game(host: &Rc<RefCell<Host>>) {
        let token = host.borrow_mut().start();
        {
            let h = host.borrow();
            sync_screens(&h.game);
            update_hud(&h.game);
        }
        request_animation_frame(host.clone(), token);
    }

    fn setup_buttons(host: Rc<RefCell<Host>>) {
        on_click("start-button", host.clone(), start_game);
        on_click("replay-button", host.clone(), start_game);
        on_click("settings-button", host.clone(), |host| {
            host.borrow_mut().navigate(Screen::Settings);
            sync_screens(&host.borrow().game);
        });
        on_click("menu-button", host.clone(), |host| {
            host.borrow_mut().navigate(Screen::Menu);
            sync_screens(&host.borrow().game);
        });
        on_click("back-button", host, |host| {
            host.borrow_mut().navigate(Screen::Menu);
            sync_screens(&host.borrow().game);
        });
    }

    fn setup_toggles(host: Rc<RefCell<Host>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (id, is_music) in [("sound-toggle", false), ("music-toggle", true)] {
            let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let host = host.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let enabled = input_clone.checked();
                let mut g = host.borrow_mut();
                let h = &mut *g;
                if is_music {
                    h.game.set_music_enabled(enabled, &mut h.audio);
                } else {
                    h.game.set_sound_enabled(enabled, &mut h.audio);
                }
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let input = match event.key().as_str() {
                    "ArrowLeft" => InputEvent::MoveLeftPressed,
                    "ArrowRight" => InputEvent::MoveRightPressed,
                    " " => {
                        event.prevent_default();
                        InputEvent::Fire
                    }
                    _ => return,
                };
                host.borrow_mut().game.queue_input(input);
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let input = match event.key().as_str() {
                "ArrowLeft" => InputEvent::MoveLeftReleased,
                "ArrowRight" => InputEvent::MoveRightReleased,
                _ => return,
            };
            host.borrow_mut().game.queue_input(input);
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>, token: LoopToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let host_clone = host.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(host_clone, token, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => host.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    /// One rAF callback; runs only for the loop it was scheduled under
    fn game_loop(host: Rc<RefCell<Host>>, token: LoopToken, time: f64) {
        let keep_going = {
            let mut g = host.borrow_mut();
            let h = &mut *g;
            if h.token != Some(token) {
                return;
            }
            h.raf_id = None;

            let keep_going = h.game.frame(token, time, &mut h.sink, &mut h.audio);
            update_hud(&h.game);
            if !keep_going {
                h.token = None;
                sync_screens(&h.game);
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(host, token);
        }
    }

    fn sync_screens(game: &Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let screens = [
            ("main-menu", Screen::Menu),
            ("game-screen", Screen::Playing),
            ("game-over", Screen::GameOver),
            ("settings-screen", Screen::Settings),
        ];
        for (id, screen) in screens {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", game.screen() != screen);
            }
        }

        if let (Some(score), Some(el)) = (game.final_score(), document.get_element_by_id("final-score")) {
            el.set_text_content(Some(&format!("Final score: {}", score)));
        }
    }

    fn update_hud(game: &Game) {
        let Some(hud) = game.hud() else { return };
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&format!("Score: {}", hud.score)));
        }
        if let Some(el) = document.get_element_by_id("lives") {
            el.set_text_content(Some(&format!("Lives: {}", hud.lives)));
        }
        if let Some(el) = document.get_element_by_id("level") {
            el.set_text_content(Some(&format!("Level: {}", hud.level)));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Strike (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    let (hud, frames, played) = autopilot(0x5eed, 20_000);
    println!(
        "Autopilot finished after {} frames: score {}, level {}, lives {}, {} sounds",
        frames, hud.score, hud.level, hud.lives, played
    );
}

/// Play a session with a simple policy: chase the lowest enemy and fire
/// whenever possible. Frames are 60 Hz timestamps.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(seed: u64, max_frames: u32) -> (star_strike::sim::Hud, u32, usize) {
    use star_strike::renderer::QuadBatch;
    use star_strike::sim::InputEvent;
    use star_strike::{AudioManager, Game, Screen, Settings};

    let settings = Settings {
        seed: Some(seed),
        ..Settings::default()
    };
    let mut audio = AudioManager::new(&settings);
    let mut batch = QuadBatch::new();
    let mut game = Game::new(settings);

    let frame_ms = 1000.0 / 60.0;
    let token = game.start_game(0.0, &mut audio);
    let mut frames = 0;

    while frames < max_frames {
        if let Some(state) = game.session() {
            let ship = state.player.rect.center_x();
            let target = state
                .enemies
                .iter()
                .max_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()))
                .map(|e| e.rect.center_x());

            let moving = state.player.speed_x;
            match target {
                Some(x) if x < ship - 10.0 && moving >= 0.0 => {
                    game.queue_input(InputEvent::MoveLeftPressed)
                }
                Some(x) if x > ship + 10.0 && moving <= 0.0 => {
                    game.queue_input(InputEvent::MoveRightPressed)
                }
                Some(x) if (x - ship).abs() <= 10.0 && moving != 0.0 => {
                    game.queue_input(InputEvent::MoveLeftReleased);
                    game.queue_input(InputEvent::MoveRightReleased);
                }
                _ => {}
            }
            game.queue_input(InputEvent::Fire);
        }

        frames += 1;
        if !game.frame(token, frames as f64 * frame_ms, &mut batch, &mut audio) {
            break;
        }
    }

    if game.screen() == Screen::GameOver {
        log::info!("Autopilot lost all lives");
    }
    log::info!(
        "Last frame: {} vertices ({} bytes), {} fps",
        batch.vertex_count(),
        batch.as_bytes().len(),
        game.fps()
    );

    let hud = game.hud().unwrap_or(star_strike::sim::Hud {
        score: 0,
        lives: 0,
        level: 0,
    });
    (hud, frames, audio.played())
}
