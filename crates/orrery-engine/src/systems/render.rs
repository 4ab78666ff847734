use crate::assets::loader::AssetTracker;
use crate::components::entity::Entity;
use crate::components::mesh::{Blend, MaterialKind, Side};
use crate::renderer::instance::{flags, MeshInstance, RenderBuffer};

/// Build the render buffer from a set of entities.
/// Opaque meshes go first, translucent and additive ones after; `opaque_split`
/// marks the boundary. Textures that did not load are dropped so the host
/// falls back to the material color.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    tracker: &AssetTracker,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut translucent: Vec<MeshInstance> = Vec::new();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let Some(mesh) = &entity.mesh else { continue };
        let material = &mesh.material;

        let (roughness, metalness) = match material.kind {
            MaterialKind::Standard { roughness, metalness } => (roughness, metalness),
            _ => (0.0, 0.0),
        };

        let texture = match material.texture {
            Some(id) if tracker.is_loaded(id) => id.0 as f32,
            _ => MeshInstance::NO_TEXTURE,
        };

        let mut bits = 0u32;
        match material.side {
            Side::Front => {}
            Side::Back => bits |= flags::SIDE_BACK,
            Side::Double => bits |= flags::SIDE_DOUBLE,
        }
        if material.blend == Blend::Additive {
            bits |= flags::BLEND_ADDITIVE;
        }
        if mesh.cast_shadow {
            bits |= flags::CAST_SHADOW;
        }
        if mesh.receive_shadow {
            bits |= flags::RECEIVE_SHADOW;
        }
        if material.depth_write {
            bits |= flags::DEPTH_WRITE;
        }
        if material.transparent {
            bits |= flags::TRANSPARENT;
        }

        let [r, g, b] = material.color;
        let instance = MeshInstance {
            model: entity.world.to_cols_array(),
            color: [r, g, b, material.opacity],
            texture,
            shape: mesh.shape.code(),
            shape_params: mesh.shape.params(),
            material: material.kind.code(),
            roughness,
            metalness,
            emissive: material.emissive,
            flags: bits as f32,
            _pad: [0.0; 2],
        };

        if material.is_translucent() {
            translucent.push(instance);
        } else {
            buffer.push(instance);
        }
    }

    buffer.set_opaque_split(buffer.instance_count());
    for inst in translucent {
        buffer.push(inst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::assets::manifest::{AssetId, AssetManifest, ColorSpace};
    use crate::components::mesh::{Material, MeshComponent, MeshShape};
    use glam::Vec3;

    fn tracker_with_earth(loaded: bool) -> (AssetTracker, AssetId) {
        let mut m = AssetManifest::new();
        let earth = m.add_texture("earth", "textures/earth.jpg", ColorSpace::Srgb);
        let mut t = AssetTracker::new(&m);
        if loaded {
            t.mark_loaded(earth);
        } else {
            t.mark_failed(earth, "404");
        }
        (t, earth)
    }

    #[test]
    fn opaque_before_translucent() {
        let (tracker, _) = tracker_with_earth(true);
        let entities = vec![
            Entity::new(EntityId(1)).with_mesh(MeshComponent::new(
                MeshShape::Sprite,
                Material::sprite().with_blend(Blend::Additive),
            )),
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(20.0, 0.0, 0.0))
                .with_mesh(MeshComponent::sphere(1.0, 32, Material::standard(0.6, 0.1))),
            Entity::new(EntityId(3)).with_mesh(MeshComponent::new(
                MeshShape::Ring { inner: 1.2, outer: 2.2, segments: 64 },
                Material::standard(0.6, 0.1).with_opacity(0.8),
            )),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &tracker, &mut buffer);

        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(buffer.opaque_split, 1);
        let first = &buffer.instances[0];
        assert_eq!(first.model[12], 20.0);
        assert_eq!(first.roughness, 0.6);
        assert!(buffer.instances[1].has_flag(flags::BLEND_ADDITIVE));
        assert!(buffer.instances[2].has_flag(flags::TRANSPARENT));
    }

    #[test]
    fn failed_texture_falls_back_to_color() {
        for loaded in [true, false] {
            let (tracker, earth) = tracker_with_earth(loaded);
            let entities = vec![Entity::new(EntityId(1)).with_mesh(MeshComponent::sphere(
                1.0,
                32,
                Material::standard(0.6, 0.1).with_texture(earth),
            ))];
            let mut buffer = RenderBuffer::new();
            build_render_buffer(entities.iter(), &tracker, &mut buffer);
            let expected = if loaded { 0.0 } else { MeshInstance::NO_TEXTURE };
            assert_eq!(buffer.instances[0].texture, expected);
        }
    }

    #[test]
    fn inactive_and_meshless_entities_are_skipped() {
        let (tracker, _) = tracker_with_earth(true);
        let mut hidden = Entity::new(EntityId(1))
            .with_mesh(MeshComponent::sphere(1.0, 8, Material::basic()));
        hidden.active = false;
        let pivot = Entity::new(EntityId(2));

        let entities = vec![hidden, pivot];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &tracker, &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
