//! Screen state machine and frame driver
//!
//! `Game` sits between the host and the simulation: it owns the current
//! screen and session, buffers input between frames, and runs at most one
//! simulation step per scheduled frame. The host owns the actual frame
//! scheduling (`requestAnimationFrame`, a sleep loop, ...) and asks `frame`
//! whether to schedule the next one.

use crate::audio::AudioSink;
use crate::renderer::RenderSink;
use crate::settings::Settings;
use crate::sim::{GameState, Hud, InputEvent, TickInput, tick};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    Settings,
}

/// Identifies one run of the frame loop
///
/// Each `start_game` hands out a new token. Frames scheduled under an older
/// token are ignored, so stopping the loop also cancels any callback that
/// was already queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopToken(u64);

/// Number of frame timestamps kept for the FPS estimate
const FPS_WINDOW: usize = 60;

/// Game instance holding all state
pub struct Game {
    screen: Screen,
    state: Option<GameState>,
    settings: Settings,
    /// Input received since the last frame
    pending: Vec<InputEvent>,
    active_loop: Option<LoopToken>,
    next_loop: u64,
    sessions: u64,
    // Frame time bookkeeping (never feeds the simulation)
    last_time: Option<f64>,
    last_delta_ms: f64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        Self {
            screen: Screen::Menu,
            state: None,
            settings,
            pending: Vec::new(),
            active_loop: None,
            next_loop: 1,
            sessions: 0,
            last_time: None,
            last_delta_ms: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current session, if one has been started
    pub fn session(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Score, lives and level of the current session
    pub fn hud(&self) -> Option<Hud> {
        self.state.as_ref().map(GameState::hud)
    }

    /// Score to show on the game over screen
    pub fn final_score(&self) -> Option<u64> {
        match self.screen {
            Screen::GameOver => self.state.as_ref().map(|s| s.score),
            _ => None,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time between the last two frames (ms)
    pub fn last_frame_delta(&self) -> f64 {
        self.last_delta_ms
    }

    pub fn is_running(&self) -> bool {
        self.active_loop.is_some()
    }

    /// Reset everything and enter `Playing` with a fresh session
    ///
    /// Returns the token the host must pass to `frame`.
    pub fn start_game(&mut self, now_ms: f64, audio: &mut dyn AudioSink) -> LoopToken {
        self.stop_loop();

        self.sessions += 1;
        let seed = self
            .settings
            .seed
            .unwrap_or_else(rand::random::<u64>);
        log::info!("Starting session {} with seed {}", self.sessions, seed);

        self.state = Some(GameState::new(seed));
        self.pending.clear();
        self.screen = Screen::Playing;

        audio.apply_settings(&self.settings);
        if self.settings.music_enabled {
            audio.set_music(true);
        }

        self.last_time = Some(now_ms);
        self.frame_times = [0.0; FPS_WINDOW];
        self.frame_index = 0;
        self.fps = 0;

        let token = LoopToken(self.next_loop);
        self.next_loop += 1;
        self.active_loop = Some(token);
        token
    }

    /// Navigate to a screen other than `Playing`
    ///
    /// Leaving `Playing` tears the frame loop down; there is no pause.
    /// `Playing` itself is only entered through `start_game`.
    pub fn show_screen(&mut self, screen: Screen, audio: &mut dyn AudioSink) {
        match screen {
            Screen::Playing => {
                log::warn!("Ignoring navigation to Playing; use start_game");
                return;
            }
            Screen::Menu => {
                self.stop_loop();
                self.state = None;
                audio.set_music(false);
            }
            Screen::Settings => self.stop_loop(),
            Screen::GameOver => {
                self.stop_loop();
                audio.set_music(false);
            }
        }
        log::info!("Screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }

    /// Stop the frame loop. Safe to call any number of times.
    pub fn stop_loop(&mut self) {
        if self.active_loop.take().is_some() {
            log::debug!("Frame loop stopped");
        }
        self.pending.clear();
    }

    /// Buffer input for the next frame (ignored outside `Playing`)
    pub fn queue_input(&mut self, event: InputEvent) {
        if self.screen == Screen::Playing {
            self.pending.push(event);
        }
    }

    /// Run one frame: step the simulation, play sounds, draw
    ///
    /// Returns whether the host should schedule another frame with the same
    /// token. Stale tokens and non-playing screens do nothing.
    pub fn frame(
        &mut self,
        token: LoopToken,
        timestamp_ms: f64,
        render: &mut dyn RenderSink,
        audio: &mut dyn AudioSink,
    ) -> bool {
        if self.active_loop != Some(token) || self.screen != Screen::Playing {
            return false;
        }

        self.track_frame_time(timestamp_ms);

        let input = TickInput {
            now_ms: timestamp_ms,
            events: std::mem::take(&mut self.pending),
        };

        let Some(state) = self.state.as_mut() else {
            self.stop_loop();
            return false;
        };

        let events = tick(state, &input);
        if self.settings.sound_enabled {
            for effect in events.iter().filter_map(|e| e.sound()) {
                audio.play(effect);
            }
        }

        render.begin_frame();
        for command in state.render_commands() {
            render.draw(&command);
        }

        if state.game_over {
            self.show_screen(Screen::GameOver, audio);
            return false;
        }
        true
    }

    pub fn set_sound_enabled(&mut self, enabled: bool, audio: &mut dyn AudioSink) {
        self.settings.sound_enabled = enabled;
        audio.apply_settings(&self.settings);
    }

    /// Toggling music takes effect immediately while a session is running
    pub fn set_music_enabled(&mut self, enabled: bool, audio: &mut dyn AudioSink) {
        self.settings.music_enabled = enabled;
        audio.apply_settings(&self.settings);
        audio.set_music(enabled && self.screen == Screen::Playing);
    }

    fn track_frame_time(&mut self, time: f64) {
        if let Some(last) = self.last_time {
            self.last_delta_ms = time - last;
        }
        self.last_time = Some(time);

        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the one about to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(target_arch = "wasm32"))]
    use crate::audio::AudioManager;
    use crate::audio::SoundEffect;
    use crate::renderer::{RenderCommand, SpriteKind};
    use crate::sim::{Bullet, Enemy};

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundEffect>,
        music: bool,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }

        fn set_music(&mut self, playing: bool) {
            self.music = playing;
        }
    }

    #[derive(Default)]
    struct RecordingRender {
        frames: usize,
        commands: Vec<RenderCommand>,
    }

    impl RenderSink for RecordingRender {
        fn begin_frame(&mut self) {
            self.frames += 1;
            self.commands.clear();
        }

        fn draw(&mut self, command: &RenderCommand) {
            self.commands.push(*command);
        }
    }

    fn seeded() -> Game {
        Game::new(Settings {
            seed: Some(1234),
            ..Settings::default()
        })
    }

    /// Put an enemy right on top of the player
    fn ram_player(game: &mut Game) {
        let state = game.session_mut().unwrap();
        let player = state.player.rect;
        state.enemies.push(Enemy::new(player.x(), player.y() - 5.0, 0.0));
    }

    #[test]
    fn test_start_game() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        assert_eq!(game.screen(), Screen::Menu);
        assert!(game.hud().is_none());

        game.start_game(0.0, &mut audio);
        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.is_running());
        assert!(audio.music);
        assert_eq!(game.hud(), Some(Hud { score: 0, lives: 3, level: 1 }));
        assert_eq!(game.session().unwrap().enemies.len(), 15);
    }

    #[test]
    fn test_frame_draws_session() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        assert!(game.frame(token, 16.0, &mut render, &mut audio));
        assert_eq!(render.frames, 1);
        assert_eq!(render.commands[0].kind, SpriteKind::Background);
        assert_eq!(render.commands[1].kind, SpriteKind::Player);
        assert!(render.commands.len() >= 17);
        assert_eq!(game.session().unwrap().frame, 1);
    }

    #[test]
    fn test_input_reaches_simulation() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.queue_input(InputEvent::Fire);
        game.queue_input(InputEvent::MoveLeftPressed);
        game.frame(token, 16.0, &mut render, &mut audio);

        let state = game.session().unwrap();
        assert_eq!(state.player_bullets.len(), 1);
        assert!(state.player.speed_x < 0.0);
        assert_eq!(audio.played, vec![SoundEffect::Shoot]);
        assert!(render.commands.iter().any(|c| c.kind == SpriteKind::Bullet));
    }

    #[test]
    fn test_input_ignored_outside_playing() {
        let mut game = seeded();
        game.queue_input(InputEvent::Fire);
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);
        game.frame(token, 16.0, &mut render, &mut audio);
        assert!(game.session().unwrap().player_bullets.is_empty());
    }

    #[test]
    fn test_stop_loop_is_idempotent_and_cancels_frames() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.stop_loop();
        game.stop_loop();
        assert!(!game.is_running());
        assert!(!game.frame(token, 16.0, &mut render, &mut audio));
        assert_eq!(render.frames, 0);
        assert_eq!(game.session().unwrap().frame, 0);
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let old = game.start_game(0.0, &mut audio);
        let new = game.start_game(100.0, &mut audio);

        assert_ne!(old, new);
        assert!(!game.frame(old, 116.0, &mut render, &mut audio));
        assert!(game.frame(new, 116.0, &mut render, &mut audio));
        assert_eq!(game.session().unwrap().frame, 1);
    }

    #[test]
    fn test_pending_callback_from_old_loop_never_double_steps() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let old = game.start_game(0.0, &mut audio);
        let new = game.start_game(0.0, &mut audio);

        // Both callback chains fire every display frame; only one may step
        let mut old_alive = true;
        for i in 1..=10 {
            let t = i as f64 * 16.0;
            if old_alive {
                old_alive = game.frame(old, t, &mut render, &mut audio);
            }
            assert!(game.frame(new, t, &mut render, &mut audio));
        }
        assert!(!old_alive);
        assert_eq!(game.session().unwrap().frame, 10);
    }

    #[test]
    fn test_menu_tears_down_session() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.show_screen(Screen::Menu, &mut audio);
        assert_eq!(game.screen(), Screen::Menu);
        assert!(!game.is_running());
        assert!(game.session().is_none());
        assert!(!audio.music);
        assert!(!game.frame(token, 16.0, &mut render, &mut audio));
    }

    #[test]
    fn test_settings_screen_stops_simulation() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.show_screen(Screen::Settings, &mut audio);
        assert!(!game.frame(token, 16.0, &mut render, &mut audio));
        assert_eq!(game.session().unwrap().frame, 0);

        // Playing is only reachable through start_game
        game.show_screen(Screen::Playing, &mut audio);
        assert_eq!(game.screen(), Screen::Settings);
    }

    #[test]
    fn test_game_over_transition() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.session_mut().unwrap().lives = 1;
        ram_player(&mut game);

        assert!(!game.frame(token, 16.0, &mut render, &mut audio));
        assert_eq!(game.screen(), Screen::GameOver);
        assert!(!game.is_running());
        assert!(!audio.music);
        assert_eq!(audio.played.last(), Some(&SoundEffect::GameOver));
        assert_eq!(game.hud().unwrap().lives, 0);
        assert_eq!(game.final_score(), Some(0));

        // Replay starts a fresh session
        let token = game.start_game(1000.0, &mut audio);
        assert_eq!(game.hud(), Some(Hud { score: 0, lives: 3, level: 1 }));
        assert!(game.frame(token, 1016.0, &mut render, &mut audio));
    }

    #[test]
    fn test_sound_disabled_does_not_change_simulation() {
        let mut loud = seeded();
        let mut quiet = seeded();
        let mut loud_audio = RecordingAudio::default();
        let mut quiet_audio = RecordingAudio::default();
        quiet.set_sound_enabled(false, &mut quiet_audio);

        let mut render = RecordingRender::default();
        let loud_token = loud.start_game(0.0, &mut loud_audio);
        let quiet_token = quiet.start_game(0.0, &mut quiet_audio);

        for i in 1..=120 {
            let t = i as f64 * 16.0;
            loud.queue_input(InputEvent::Fire);
            quiet.queue_input(InputEvent::Fire);
            loud.frame(loud_token, t, &mut render, &mut loud_audio);
            quiet.frame(quiet_token, t, &mut render, &mut quiet_audio);
        }

        assert!(!loud_audio.played.is_empty());
        assert!(quiet_audio.played.is_empty());
        assert_eq!(loud.hud(), quiet.hud());
        assert_eq!(
            loud.session().unwrap().enemies,
            quiet.session().unwrap().enemies
        );
    }

    #[test]
    fn test_explosion_sound_on_kill() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        {
            let state = game.session_mut().unwrap();
            let target = state.enemies[0].rect;
            let bullet = Bullet::player_shot(target.center_x(), target.y() + 20.0);
            state.player_bullets.push(bullet);
        }
        game.frame(token, 16.0, &mut render, &mut audio);
        assert!(audio.played.contains(&SoundEffect::Explosion));
        assert_eq!(game.hud().unwrap().score, 10);
    }

    #[test]
    fn test_music_toggle() {
        let mut game = Game::new(Settings {
            music_enabled: false,
            ..Settings::default()
        });
        let mut audio = RecordingAudio::default();
        game.start_game(0.0, &mut audio);
        assert!(!audio.music);

        game.set_music_enabled(true, &mut audio);
        assert!(audio.music);
        assert!(game.settings().music_enabled);
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_music_toggle_restarts_muted_manager() {
        let mut game = Game::new(Settings {
            music_enabled: false,
            ..Settings::default()
        });
        let mut audio = AudioManager::new(game.settings());
        game.start_game(0.0, &mut audio);
        assert!(!audio.music_playing());

        game.set_music_enabled(true, &mut audio);
        assert!(audio.music_playing());

        game.set_music_enabled(false, &mut audio);
        assert!(!audio.music_playing());
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_sound_toggle_unmutes_manager() {
        let mut game = Game::new(Settings {
            sound_enabled: false,
            seed: Some(42),
            ..Settings::default()
        });
        let mut audio = AudioManager::new(game.settings());
        let mut render = RecordingRender::default();
        let token = game.start_game(0.0, &mut audio);

        game.set_sound_enabled(true, &mut audio);
        game.queue_input(InputEvent::Fire);
        game.frame(token, 16.0, &mut render, &mut audio);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_fps_tracking() {
        let mut game = seeded();
        let mut audio = RecordingAudio::default();
        let mut render = RecordingRender::default();
        let token = game.start_game(1000.0, &mut audio);

        let step = 1000.0 / 60.0;
        for i in 1..=120 {
            game.frame(token, 1000.0 + i as f64 * step, &mut render, &mut audio);
        }
        assert_eq!(game.fps(), 60);
        assert!((game.last_frame_delta() - step).abs() < 1e-6);
    }
}
