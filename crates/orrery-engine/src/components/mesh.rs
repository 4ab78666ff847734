use crate::assets::manifest::AssetId;

/// Geometry primitive, in the entity's local space.
/// The host renderer builds the actual vertex data from these parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    /// UV sphere.
    Sphere { radius: f32, segments: u32 },
    /// Flat annulus in the local XY plane.
    Ring { inner: f32, outer: f32, segments: u32 },
    /// Closed circle in the local XZ plane, drawn as lines.
    LineLoop { radius: f32, segments: u32 },
    /// Camera-facing unit quad.
    Sprite,
}

impl MeshShape {
    /// Wire code for the instance buffer.
    pub fn code(&self) -> f32 {
        match self {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
            MeshShape::LineLoop { .. } => 2.0,
            MeshShape::Sprite => 3.0,
        }
    }

    /// Shape parameters packed as (a, b, segments).
    pub fn params(&self) -> [f32; 3] {
        match *self {
            MeshShape::Sphere { radius, segments } => [radius, 0.0, segments as f32],
            MeshShape::Ring { inner, outer, segments } => [inner, outer, segments as f32],
            MeshShape::LineLoop { radius, segments } => [radius, 0.0, segments as f32],
            MeshShape::Sprite => [0.0, 0.0, 0.0],
        }
    }
}

/// Lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Unlit.
    Basic,
    /// Physically based, lit by ambient + point lights.
    Standard { roughness: f32, metalness: f32 },
    /// Unlit line primitive.
    Line,
    /// Unlit billboard.
    Sprite,
}

impl MaterialKind {
    pub fn code(&self) -> f32 {
        match self {
            MaterialKind::Basic => 0.0,
            MaterialKind::Standard { .. } => 1.0,
            MaterialKind::Line => 2.0,
            MaterialKind::Sprite => 3.0,
        }
    }
}

/// Which faces are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    /// Inside faces only (sky spheres).
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    Additive,
}

/// Surface appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Linear RGB tint.
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    /// Texture slot. Ignored by the render pass if the asset failed to load.
    pub texture: Option<AssetId>,
    /// Emissive strength added on top of the lit color.
    pub emissive: f32,
    pub side: Side,
    pub blend: Blend,
    pub depth_write: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Basic,
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: false,
            texture: None,
            emissive: 0.0,
            side: Side::Front,
            blend: Blend::Normal,
            depth_write: true,
        }
    }
}

impl Material {
    pub fn basic() -> Self {
        Self::default()
    }

    pub fn standard(roughness: f32, metalness: f32) -> Self {
        Self {
            kind: MaterialKind::Standard { roughness, metalness },
            ..Self::default()
        }
    }

    pub fn line() -> Self {
        Self {
            kind: MaterialKind::Line,
            ..Self::default()
        }
    }

    pub fn sprite() -> Self {
        Self {
            kind: MaterialKind::Sprite,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: AssetId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set opacity; anything below 1.0 marks the material transparent.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = opacity < 1.0;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn without_depth_write(mut self) -> Self {
        self.depth_write = false;
        self
    }

    /// Whether the render pass must draw this after opaque geometry.
    pub fn is_translucent(&self) -> bool {
        self.transparent || self.blend == Blend::Additive
    }
}

/// Renderable geometry + material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshComponent {
    pub fn new(shape: MeshShape, material: Material) -> Self {
        Self {
            shape,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn sphere(radius: f32, segments: u32, material: Material) -> Self {
        Self::new(MeshShape::Sphere { radius, segments }, material)
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_marks_transparent() {
        let m = Material::standard(0.6, 0.1).with_opacity(0.8);
        assert!(m.transparent);
        assert!(m.is_translucent());
        assert!(!Material::basic().is_translucent());
    }

    #[test]
    fn additive_is_translucent() {
        let m = Material::sprite().with_blend(Blend::Additive);
        assert!(m.is_translucent());
    }

    #[test]
    fn ring_params_pack_radii() {
        let shape = MeshShape::Ring { inner: 1.2, outer: 2.2, segments: 64 };
        assert_eq!(shape.params(), [1.2, 2.2, 64.0]);
        assert_eq!(shape.code(), 1.0);
    }
}
