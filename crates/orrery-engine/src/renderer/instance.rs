use bytemuck::{Pod, Zeroable};

/// Flag bits packed into `MeshInstance::flags`.
pub mod flags {
    pub const SIDE_BACK: u32 = 1 << 0;
    pub const SIDE_DOUBLE: u32 = 1 << 1;
    pub const BLEND_ADDITIVE: u32 = 1 << 2;
    pub const CAST_SHADOW: u32 = 1 << 3;
    pub const RECEIVE_SHADOW: u32 = 1 << 4;
    pub const DEPTH_WRITE: u32 = 1 << 5;
    pub const TRANSPARENT: u32 = 1 << 6;
}

/// Per-instance render data read by the host renderer.
/// 32 floats = 128 bytes stride.
///
/// The host keeps one geometry per (shape, params) key and one material per
/// (material, texture) key; everything else here is per-frame state.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MeshInstance {
    /// World matrix, column-major.
    pub model: [f32; 16],
    /// Linear RGB + opacity.
    pub color: [f32; 4],
    /// Texture asset id, or -1 for untextured.
    pub texture: f32,
    /// `MeshShape::code`.
    pub shape: f32,
    /// `MeshShape::params`: (a, b, segments).
    pub shape_params: [f32; 3],
    /// `MaterialKind::code`.
    pub material: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: f32,
    /// Bitset of `flags::*`, stored as f32.
    pub flags: f32,
    pub _pad: [f32; 2],
}

impl MeshInstance {
    pub const FLOATS: usize = 32;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
    pub const NO_TEXTURE: f32 = -1.0;

    pub fn flag_bits(&self) -> u32 {
        self.flags as u32
    }

    pub fn has_flag(&self, bit: u32) -> bool {
        self.flag_bits() & bit != 0
    }
}

impl Default for MeshInstance {
    fn default() -> Self {
        Self {
            model: glam::Mat4::IDENTITY.to_cols_array(),
            color: [1.0; 4],
            texture: Self::NO_TEXTURE,
            shape: 0.0,
            shape_params: [0.0; 3],
            material: 0.0,
            roughness: 0.0,
            metalness: 0.0,
            emissive: 0.0,
            flags: flags::DEPTH_WRITE as f32,
            _pad: [0.0; 2],
        }
    }
}

/// Mesh instances for one frame, opaque geometry first.
pub struct RenderBuffer {
    /// Instances `[0..opaque_split)` are opaque, `[opaque_split..]` are
    /// translucent or additive and must be drawn after them.
    pub instances: Vec<MeshInstance>,
    pub opaque_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            opaque_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.opaque_split = 0;
    }

    pub fn push(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn set_opaque_split(&mut self, split: u32) {
        self.opaque_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
