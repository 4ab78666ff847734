/// Reactive controls: slider and button handlers over the shared parameters.
///
/// Handlers are synchronous and return whether the change was accepted.

use orrery_engine::{AssetId, AudioSink};

use crate::bodies::DEFAULT_SCALE_MULTIPLIER;

/// Parameters the page controls mutate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// ≥ 0; 0 freezes all motion.
    pub time_scale: f64,
    /// > 0.
    pub scale_multiplier: f32,
    /// In [0, 1].
    pub music_volume: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            scale_multiplier: DEFAULT_SCALE_MULTIPLIER,
            music_volume: 0.5,
        }
    }
}

impl SimulationParams {
    pub fn set_time_scale(&mut self, v: f64) -> bool {
        if !v.is_finite() || v < 0.0 {
            log::warn!("rejecting time scale {}", v);
            return false;
        }
        self.time_scale = v;
        true
    }

    pub fn set_scale_multiplier(&mut self, m: f32) -> bool {
        if !m.is_finite() || m <= 0.0 {
            log::warn!("rejecting scale multiplier {}", m);
            return false;
        }
        self.scale_multiplier = m;
        true
    }

    /// Out-of-range volumes are clamped; NaN is rejected.
    pub fn set_volume(&mut self, v: f32) -> bool {
        if v.is_nan() {
            log::warn!("rejecting NaN volume");
            return false;
        }
        self.music_volume = v.clamp(0.0, 1.0);
        true
    }
}

/// The music track as seen from the controls.
#[derive(Debug, Clone, Default)]
pub struct MusicPlayer {
    /// Set once the audio asset has loaded and was handed to the sink.
    asset: Option<AssetId>,
    playing: bool,
}

impl MusicPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.asset.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Hand a loaded track to the sink, at the volume the slider shows now.
    pub fn attach(&mut self, sink: &mut impl AudioSink, asset: AssetId, looping: bool, volume: f32) {
        sink.load(asset, looping, volume);
        self.asset = Some(asset);
        self.playing = false;
    }

    /// Forward a volume change. Before load this is a no-op; `attach` picks up
    /// the latest value.
    pub fn set_volume(&self, sink: &mut impl AudioSink, volume: f32) -> bool {
        if !self.is_loaded() {
            log::debug!("music not loaded yet, volume {} kept for later", volume);
            return false;
        }
        sink.set_volume(volume);
        true
    }

    /// Flip between playing and paused.
    pub fn toggle(&mut self, sink: &mut impl AudioSink) -> bool {
        if !self.is_loaded() {
            log::warn!("play/pause ignored: music has not loaded");
            return false;
        }
        if self.playing {
            sink.pause();
        } else {
            sink.resume_context();
            sink.play();
        }
        self.playing = !self.playing;
        true
    }
}

/// Time-scale readout, one decimal: `"1.0x"`.
pub fn format_time_scale(v: f64) -> String {
    format!("{:.1}x", v)
}

/// Scale readout, whole number: `"10x"`.
pub fn format_scale(m: f32) -> String {
    format!("{:.0}x", m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{AudioOp, AudioQueue};

    #[test]
    fn time_scale_validation() {
        let mut p = SimulationParams::default();
        assert!(p.set_time_scale(0.0));
        assert_eq!(p.time_scale, 0.0);
        assert!(!p.set_time_scale(-1.0));
        assert!(!p.set_time_scale(f64::INFINITY));
        assert_eq!(p.time_scale, 0.0);
    }

    #[test]
    fn scale_rejects_non_positive() {
        let mut p = SimulationParams::default();
        assert!(!p.set_scale_multiplier(0.0));
        assert!(!p.set_scale_multiplier(f32::NAN));
        assert_eq!(p.scale_multiplier, DEFAULT_SCALE_MULTIPLIER);
        assert!(p.set_scale_multiplier(25.0));
    }

    #[test]
    fn volume_clamps_and_rejects_nan() {
        let mut p = SimulationParams::default();
        assert!(p.set_volume(1.5));
        assert_eq!(p.music_volume, 1.0);
        assert!(p.set_volume(-0.2));
        assert_eq!(p.music_volume, 0.0);
        assert!(!p.set_volume(f32::NAN));
        assert_eq!(p.music_volume, 0.0);
    }

    #[test]
    fn volume_extremes_reach_the_sink_exactly() {
        let mut sink = AudioQueue::new();
        let mut music = MusicPlayer::new();
        music.attach(&mut sink, AssetId(10), true, 0.5);

        assert!(music.set_volume(&mut sink, 0.0));
        assert_eq!(sink.last_volume(), Some(0.0));
        assert!(music.set_volume(&mut sink, 1.0));
        assert_eq!(sink.last_volume(), Some(1.0));
    }

    #[test]
    fn toggle_before_load_is_ignored() {
        let mut sink = AudioQueue::new();
        let mut music = MusicPlayer::new();
        assert!(!music.toggle(&mut sink));
        assert!(!music.set_volume(&mut sink, 0.3));
        assert!(sink.is_empty());
        assert!(!music.is_playing());
    }

    #[test]
    fn toggle_resumes_context_before_play() {
        let mut sink = AudioQueue::new();
        let mut music = MusicPlayer::new();
        music.attach(&mut sink, AssetId(10), true, 0.5);
        sink.drain();

        assert!(music.toggle(&mut sink));
        assert!(music.is_playing());
        assert!(music.toggle(&mut sink));
        assert!(!music.is_playing());

        let ops: Vec<_> = sink.iter().filter_map(|c| c.op()).collect();
        assert_eq!(ops, vec![AudioOp::Resume, AudioOp::Play, AudioOp::Pause]);
    }

    #[test]
    fn readout_labels() {
        assert_eq!(format_time_scale(1.0), "1.0x");
        assert_eq!(format_time_scale(2.46), "2.5x");
        assert_eq!(format_scale(10.0), "10x");
        assert_eq!(format_scale(49.6), "50x");
    }
}
