/// Scene lighting: one ambient term plus a short list of point lights.
///
/// Lights are persistent; they stay until explicitly removed.
/// Each frame the host reads the light buffer for its lighting pass.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A 3D point light.
///
/// Wire format (12 floats / 48 bytes):
/// `[x, y, z, range, r, g, b, intensity, cast_shadow, shadow_map_size, pad, pad]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Distance at which the light falls off to zero (0 = unlimited).
    pub range: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// 1.0 if this light renders a shadow map.
    pub cast_shadow: f32,
    /// Shadow map edge length in texels.
    pub shadow_map_size: f32,
    pub _pad: [f32; 2],
}

impl PointLight {
    pub const FLOATS: usize = 12;

    /// Create a new point light.
    ///
    /// - `pos`: World-space position
    /// - `color`: Linear RGB
    /// - `intensity`: Light strength multiplier
    /// - `range`: Falloff distance in world units
    pub fn new(pos: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            range,
            r: color[0],
            g: color[1],
            b: color[2],
            intensity,
            cast_shadow: 0.0,
            shadow_map_size: 0.0,
            _pad: [0.0; 2],
        }
    }

    /// Enable shadow casting with a square shadow map of `map_size` texels.
    pub fn with_shadow(mut self, map_size: u32) -> Self {
        self.cast_shadow = 1.0;
        self.shadow_map_size = map_size as f32;
        self
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn casts_shadow(&self) -> bool {
        self.cast_shadow > 0.0
    }
}

/// Manages active lights and the ambient term.
///
/// The ambient color defaults to white at intensity 1.0.
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: [f32; 3],
    ambient_intensity: f32,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(4)
    }

    /// Create a LightState with a specific light capacity.
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
        }
    }

    /// Add a point light to the scene.
    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Remove all lights.
    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    /// Number of active lights.
    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, color: [f32; 3], intensity: f32) {
        self.ambient = color;
        self.ambient_intensity = intensity;
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    pub fn ambient_intensity(&self) -> f32 {
        self.ambient_intensity
    }

    /// Pointer to the light data for host reads.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}
