//! Audio output
//!
//! The simulation only reports events; a host maps them to `SoundEffect`s and
//! hands them to an `AudioSink`. On the web, sounds are generated
//! procedurally with the Web Audio API, so no asset files are needed.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Lives ran out
    GameOver,
}

/// Receives fire-and-forget audio requests
///
/// Implementations must never block and never fail at the call site; an
/// unavailable device simply plays nothing.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Start or stop the looping background music
    fn set_music(&mut self, playing: bool);

    /// Pick up changed preferences (volumes, toggles)
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn set_music(&mut self, _playing: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Gain of the background drone at full music volume
    const MUSIC_LEVEL: f32 = 0.12;

    /// One enveloped tone: fast linear attack, exponential tail
    struct Voice {
        wave: OscillatorType,
        freq: f32,
        /// Pitch at the end of the tail (`None` = steady)
        glide_to: Option<f32>,
        peak: f32,
        /// Offset from now (seconds)
        at: f64,
        length: f64,
    }

    /// Audio manager backed by Web Audio
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        music: Option<(OscillatorNode, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                music: None,
            }
        }

        /// Browsers keep the context suspended until a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = self.ctx.as_ref() {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn sound(ctx: &AudioContext, voice: &Voice, vol: f32) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let env = ctx.create_gain().ok()?;
            osc.set_type(voice.wave);
            osc.connect_with_audio_node(&env).ok()?;
            env.connect_with_audio_node(&ctx.destination()).ok()?;

            let start = ctx.current_time() + voice.at;
            let end = start + voice.length;
            let level = env.gain();
            level.set_value_at_time(0.0, start).ok()?;
            level
                .linear_ramp_to_value_at_time(voice.peak * vol, start + 0.01)
                .ok()?;
            level.exponential_ramp_to_value_at_time(0.001, end).ok()?;

            let pitch = osc.frequency();
            pitch.set_value_at_time(voice.freq, start).ok()?;
            if let Some(target) = voice.glide_to {
                pitch.exponential_ramp_to_value_at_time(target, end).ok()?;
            }

            osc.start_with_when(start).ok()?;
            osc.stop_with_when(end + 0.02).ok()
        }

        /// Low looping tone standing in for the background track
        fn drone(ctx: &AudioContext, volume: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(OscillatorType::Triangle);
            osc.frequency().set_value(55.0);
            gain.gain().set_value(volume * MUSIC_LEVEL);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;
            Some((osc, gain))
        }

        fn voices(effect: SoundEffect) -> Vec<Voice> {
            match effect {
                // Falling laser chirp
                SoundEffect::Shoot => vec![Voice {
                    wave: OscillatorType::Triangle,
                    freq: 1200.0,
                    glide_to: Some(300.0),
                    peak: 0.25,
                    at: 0.0,
                    length: 0.12,
                }],
                // Buzzing burst over a low thump
                SoundEffect::Explosion => vec![
                    Voice {
                        wave: OscillatorType::Square,
                        freq: 160.0,
                        glide_to: Some(45.0),
                        peak: 0.3,
                        at: 0.0,
                        length: 0.3,
                    },
                    Voice {
                        wave: OscillatorType::Sine,
                        freq: 60.0,
                        glide_to: None,
                        peak: 0.5,
                        at: 0.0,
                        length: 0.2,
                    },
                ],
                // C minor arpeggio walking down
                SoundEffect::GameOver => [523.25, 392.0, 311.13, 261.63]
                    .into_iter()
                    .enumerate()
                    .map(|(i, freq)| Voice {
                        wave: OscillatorType::Triangle,
                        freq,
                        glide_to: None,
                        peak: 0.3,
                        at: i as f64 * 0.25,
                        length: 0.35,
                    })
                    .collect(),
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }
            self.resume();
            let Some(ctx) = self.ctx.as_ref() else { return };

            for voice in Self::voices(effect) {
                if Self::sound(ctx, &voice, vol).is_none() {
                    log::debug!("Dropped {:?} voice", effect);
                }
            }
        }

        fn set_music(&mut self, playing: bool) {
            if !playing || self.music_volume <= 0.0 {
                if let Some((osc, _gain)) = self.music.take() {
                    osc.stop().ok();
                }
                return;
            }
            if self.music.is_some() {
                return;
            }
            let Some(ctx) = self.ctx.as_ref() else { return };

            match Self::drone(ctx, self.music_volume) {
                Some(music) => self.music = Some(music),
                None => log::warn!("Failed to start background music"),
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            if self.music_volume <= 0.0 {
                self.set_music(false);
            } else if let Some((_, gain)) = &self.music {
                gain.gain().set_value(self.music_volume * MUSIC_LEVEL);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Audio manager for native builds: there is no output device, so
    /// requests are logged
    #[derive(Debug, Clone)]
    pub struct AudioManager {
        sfx_volume: f32,
        music_volume: f32,
        music_playing: bool,
        played: usize,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            Self {
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                music_playing: false,
                played: 0,
            }
        }

        pub fn resume(&self) {}

        pub fn music_playing(&self) -> bool {
            self.music_playing
        }

        /// Number of effects played so far
        pub fn played(&self) -> usize {
            self.played
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            if self.sfx_volume <= 0.0 {
                return;
            }
            self.played += 1;
            log::debug!("sfx {:?} (volume {:.2})", effect, self.sfx_volume);
        }

        fn set_music(&mut self, playing: bool) {
            let playing = playing && self.music_volume > 0.0;
            if playing != self.music_playing {
                log::debug!("music {}", if playing { "on" } else { "off" });
            }
            self.music_playing = playing;
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            if self.music_volume <= 0.0 {
                self.set_music(false);
            }
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
