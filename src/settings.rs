//! Game settings and preferences
//!
//! Runtime preferences handed in by the host. Settings are not persisted;
//! a host that keeps them somewhere passes the JSON back in on startup.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Play sound effects
    pub sound_enabled: bool,
    /// Play background music
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Simulation ===
    /// Fixed RNG seed for every session (reproducible runs); random if unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Effective sound effect volume (0 when sound is off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if !self.sound_enabled {
            return 0.0;
        }
        self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
    }

    /// Effective music volume (0 when music is off)
    pub fn effective_music_volume(&self) -> f32 {
        if !self.music_enabled {
            return 0.0;
        }
        self.master_volume.clamp(0.0, 1.0) * self.music_volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"music_enabled": false, "seed": 42}"#).unwrap();
        assert!(settings.sound_enabled);
        assert!(!settings.music_enabled);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            sound_enabled: false,
            sfx_volume: 0.25,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
        assert!(Settings::from_json(r#"{"sound_enabled": "yes"}"#).is_err());
    }

    #[test]
    fn test_effective_volumes() {
        let mut settings = Settings {
            master_volume: 2.0,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.5);

        settings.sound_enabled = false;
        assert_eq!(settings.effective_sfx_volume(), 0.0);

        settings.music_enabled = false;
        assert_eq!(settings.effective_music_volume(), 0.0);
    }
}
