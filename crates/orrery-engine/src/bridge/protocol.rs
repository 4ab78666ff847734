/// Host-visible buffer layout.
/// Must stay in sync with the page's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 36 floats]
/// [Instances: max_instances × 32 floats]
/// [Lights: max_lights × 12 floats]
/// [Events: max_events × 4 floats]
/// [Audio: max_audio_commands × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The page reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::audio::AudioCommand;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::MeshInstance;
use crate::systems::lighting::PointLight;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_OPAQUE_SPLIT: usize = 4;
pub const HEADER_MAX_LIGHTS: usize = 5;
pub const HEADER_LIGHT_COUNT: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
pub const HEADER_EVENT_COUNT: usize = 8;
pub const HEADER_MAX_AUDIO: usize = 9;
pub const HEADER_AUDIO_COUNT: usize = 10;
pub const HEADER_AMBIENT_R: usize = 11;
pub const HEADER_AMBIENT_G: usize = 12;
pub const HEADER_AMBIENT_B: usize = 13;
pub const HEADER_AMBIENT_INTENSITY: usize = 14;
/// 1.0 once the asset barrier has fired.
pub const HEADER_READY: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per section entry (wire format: never changes).
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;
pub const INSTANCE_FLOATS: usize = MeshInstance::FLOATS;
pub const LIGHT_FLOATS: usize = PointLight::FLOATS;
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;
pub const AUDIO_FLOATS: usize = AudioCommand::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_lights: usize,
    pub max_events: usize,
    pub max_audio_commands: usize,

    /// Offset (in floats) where the camera uniform begins.
    pub camera_offset: usize,
    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where light data begins.
    pub light_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,
    /// Offset (in floats) where audio command data begins.
    pub audio_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_lights: usize, max_events: usize, max_audio_commands: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CAMERA_FLOATS;
        let light_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let event_data_offset = light_data_offset + max_lights * LIGHT_FLOATS;
        let audio_data_offset = event_data_offset + max_events * EVENT_FLOATS;
        let buffer_total_floats = audio_data_offset + max_audio_commands * AUDIO_FLOATS;

        Self {
            max_instances,
            max_lights,
            max_events,
            max_audio_commands,
            camera_offset,
            instance_data_offset,
            light_data_offset,
            event_data_offset,
            audio_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_instances,
            config.max_lights,
            config.max_events,
            config.max_audio_commands,
        )
    }

    /// A header with the capacities and version filled in; counts are zero.
    pub fn header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_MAX_AUDIO] = self.max_audio_commands as f32;
        header
    }
}
