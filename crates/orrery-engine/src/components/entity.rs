use glam::{Mat4, Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// Fat Entity: a single struct with an optional mesh.
///
/// `pos`, `rotation`, `scale` and `world` are world-space values written by
/// `TransformGraph::propagate`; games move things through their local transforms.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are not rendered).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Scale in world space.
    pub scale: Vec3,
    /// Full world matrix (scale, then rotation, then translation).
    pub world: Mat4,
    /// Mesh component (optional: entities without meshes are pure transform nodes).
    pub mesh: Option<MeshComponent>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
            mesh: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self.world = Mat4::from_scale_rotation_translation(self.scale, self.rotation, pos);
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Overwrite the world transform and its decomposed parts.
    pub fn set_world(&mut self, world: Mat4) {
        let (scale, rotation, pos) = world.to_scale_rotation_translation();
        self.world = world;
        self.pos = pos;
        self.rotation = rotation;
        self.scale = scale;
    }
}
