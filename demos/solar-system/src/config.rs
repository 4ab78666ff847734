/// Page-supplied configuration, passed as JSON to `game_init`.
///
/// Every field is optional; a missing field keeps the built-in default.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::bodies::DEFAULT_SCALE_MULTIPLIER;
use crate::focus::FocusTuning;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Fixed seed for the start angles. `None` uses the host's random seed.
    pub seed: Option<u32>,
    pub time_scale: f64,
    pub scale_multiplier: f32,
    pub music_volume: f32,
    /// Directory holding the texture files.
    pub texture_dir: String,
    pub music_path: String,
    pub focus: FocusTuning,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            time_scale: 1.0,
            scale_multiplier: DEFAULT_SCALE_MULTIPLIER,
            music_volume: 0.5,
            texture_dir: String::from("textures"),
            music_path: String::from("audio/music.mp3"),
            focus: FocusTuning::default(),
        }
    }
}

impl OrreryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("parsing orrery config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.time_scale.is_finite() && self.time_scale >= 0.0,
            "time_scale must be a finite value >= 0, got {}",
            self.time_scale
        );
        ensure!(
            self.scale_multiplier.is_finite() && self.scale_multiplier > 0.0,
            "scale_multiplier must be > 0, got {}",
            self.scale_multiplier
        );
        ensure!(
            (0.0..=1.0).contains(&self.music_volume),
            "music_volume must be in [0, 1], got {}",
            self.music_volume
        );
        ensure!(
            self.focus.lerp > 0.0 && self.focus.lerp <= 1.0,
            "focus.lerp must be in (0, 1], got {}",
            self.focus.lerp
        );
        Ok(())
    }

    pub fn texture_path(&self, key: &str, extension: &str) -> String {
        format!("{}/{}.{}", self.texture_dir.trim_end_matches('/'), key, extension)
    }
}
