/// Audio commands for the host's audio element.
///
/// The engine never plays sound itself. Games issue commands through an
/// `AudioSink`; the runner hands the queued commands to the host after each tick.

use bytemuck::{Pod, Zeroable};
use crate::assets::manifest::AssetId;

/// Command opcodes (wire format, stored as f32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AudioOp {
    /// Attach a loaded asset as the music track.
    Load = 1,
    Play = 2,
    Pause = 3,
    SetVolume = 4,
    /// Resume a suspended audio context (browsers suspend until a user gesture).
    Resume = 5,
}

impl AudioOp {
    pub fn from_code(code: f32) -> Option<Self> {
        match code as u32 {
            1 => Some(AudioOp::Load),
            2 => Some(AudioOp::Play),
            3 => Some(AudioOp::Pause),
            4 => Some(AudioOp::SetVolume),
            5 => Some(AudioOp::Resume),
            _ => None,
        }
    }
}

/// Wire format (4 floats): `[op, asset, value, looping]`.
/// `asset` is -1 for commands that target the current track.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AudioCommand {
    pub op: f32,
    pub asset: f32,
    pub value: f32,
    pub looping: f32,
}

impl AudioCommand {
    pub const FLOATS: usize = 4;

    fn new(op: AudioOp, value: f32) -> Self {
        Self {
            op: op as u32 as f32,
            asset: -1.0,
            value,
            looping: 0.0,
        }
    }

    pub fn op(&self) -> Option<AudioOp> {
        AudioOp::from_code(self.op)
    }
}

/// Anything that can drive the page's music track.
pub trait AudioSink {
    fn load(&mut self, asset: AssetId, looping: bool, volume: f32);
    fn play(&mut self);
    fn pause(&mut self);
    /// Volume in [0, 1].
    fn set_volume(&mut self, volume: f32);
    fn resume_context(&mut self);
}

/// Commands queued during a tick, in issue order.
#[derive(Debug, Default)]
pub struct AudioQueue {
    commands: Vec<AudioCommand>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioCommand> {
        self.commands.iter()
    }

    /// Take all queued commands.
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Take at most `max` commands from the front. The rest stay queued in order.
    pub fn drain_up_to(&mut self, max: usize) -> Vec<AudioCommand> {
        let n = max.min(self.commands.len());
        self.commands.drain(..n).collect()
    }

    /// Volume carried by the most recent `SetVolume` still queued.
    pub fn last_volume(&self) -> Option<f32> {
        self.commands
            .iter()
            .rev()
            .find(|c| c.op() == Some(AudioOp::SetVolume))
            .map(|c| c.value)
    }
}

impl AudioSink for AudioQueue {
    fn load(&mut self, asset: AssetId, looping: bool, volume: f32) {
        self.commands.push(AudioCommand {
            op: AudioOp::Load as u32 as f32,
            asset: asset.0 as f32,
            value: volume,
            looping: if looping { 1.0 } else { 0.0 },
        });
    }

    fn play(&mut self) {
        self.commands.push(AudioCommand::new(AudioOp::Play, 0.0));
    }

    fn pause(&mut self) {
        self.commands.push(AudioCommand::new(AudioOp::Pause, 0.0));
    }

    fn set_volume(&mut self, volume: f32) {
        self.commands.push(AudioCommand::new(AudioOp::SetVolume, volume));
    }

    fn resume_context(&mut self) {
        self.commands.push(AudioCommand::new(AudioOp::Resume, 0.0));
    }
}
