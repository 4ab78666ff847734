/// Orbit simulation: circular planar orbits around the sun plus axial spin.
///
/// Angles are f64 accumulators; only the final transform is f32.

use std::f64::consts::TAU;
use glam::{Quat, Vec3};
use orrery_engine::{EntityId, TransformGraph};

use crate::bodies::SPIN_NORMALIZATION;

/// Past this magnitude angles are folded back into [0, 2π).
pub const ANGLE_WRAP_THRESHOLD: f64 = 1.0e6;

/// A simulated body and the scene nodes it drives.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: &'static str,
    /// Sphere mesh; carries the orbit offset, spin and visual scale.
    pub mesh: EntityId,
    /// Transform node at the sun the mesh is parented to.
    pub pivot: EntityId,
    /// Ring child of `mesh`, if any.
    pub ring: Option<EntityId>,
    /// Orbit radius in scene units.
    pub distance: f64,
    /// Orbital speed, rad/s at time scale 1.
    pub angular_speed: f64,
    /// Current orbital angle.
    pub angle: f64,
    /// Axial spin, rad per normalized frame.
    pub axial_speed: f64,
    /// Accumulated axial rotation.
    pub spin: f64,
    /// Unscaled mesh radius. Never changes after creation.
    pub base_radius: f32,
}

/// Negative or non-finite frame deltas count as zero.
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

pub fn normalize_angle(angle: f64) -> f64 {
    if angle.abs() > ANGLE_WRAP_THRESHOLD {
        angle.rem_euclid(TAU)
    } else {
        angle
    }
}

impl CelestialBody {
    /// Advance orbit and spin by `dt` seconds at `time_scale`.
    pub fn advance(&mut self, dt: f64, time_scale: f64) {
        let dt = sanitize_dt(dt);
        let time_scale = if time_scale.is_finite() { time_scale.max(0.0) } else { 0.0 };
        self.angle = normalize_angle(self.angle + self.angular_speed * time_scale * dt);
        self.spin = normalize_angle(self.spin + self.axial_speed * time_scale * dt * SPIN_NORMALIZATION);
    }

    pub fn is_finite(&self) -> bool {
        self.angle.is_finite() && self.spin.is_finite()
    }

    /// Position relative to the sun, in the XZ plane.
    pub fn planar_position(&self) -> Vec3 {
        Vec3::new(
            (self.distance * self.angle.cos()) as f32,
            0.0,
            (self.distance * self.angle.sin()) as f32,
        )
    }

    pub fn spin_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.spin as f32)
    }

    pub fn visual_radius(&self, scale_multiplier: f32) -> f32 {
        self.base_radius * scale_multiplier
    }

    /// Write orbit offset and spin into the mesh's local transform.
    /// Returns false if the body could not be updated.
    pub fn sync_transform(&self, transforms: &mut TransformGraph) -> bool {
        if !self.is_finite() {
            log::warn!("{}: non-finite orbit state, skipping", self.name);
            return false;
        }
        let Some(local) = transforms.get_local_mut(self.mesh) else {
            log::warn!("{}: mesh {:?} missing from transform graph", self.name, self.mesh);
            return false;
        };
        local.offset = self.planar_position();
        local.rotation = self.spin_rotation();
        true
    }
}

/// Advance every body and write its transform. A body that fails to update is
/// skipped without affecting the rest. Returns how many bodies were updated.
pub fn step_bodies(
    bodies: &mut [CelestialBody],
    transforms: &mut TransformGraph,
    dt: f64,
    time_scale: f64,
) -> usize {
    let mut updated = 0;
    for body in bodies.iter_mut() {
        body.advance(dt, time_scale);
        if body.sync_transform(transforms) {
            updated += 1;
        }
    }
    updated
}

/// Apply `base_radius × m` as each body's uniform scale.
/// Rings inherit it through the transform hierarchy.
pub fn apply_scale_multiplier(bodies: &[CelestialBody], transforms: &mut TransformGraph, m: f32) {
    for body in bodies {
        match transforms.get_local_mut(body.mesh) {
            Some(local) => local.scale = Vec3::splat(body.visual_radius(m)),
            None => log::warn!("{}: cannot rescale, mesh missing", body.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{self, PLANETS, RING_OUTER_RATIO};
    use orrery_engine::{Entity, LocalTransform, Scene};

    /// Bodies with mesh/pivot/ring registered the way the game does it.
    fn solar_system(seed: u32) -> (Vec<CelestialBody>, TransformGraph, Scene) {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let mut next = 1u32;
        let mut id = || {
            next += 1;
            EntityId(next)
        };
        let mut bodies_out = Vec::new();
        for (i, p) in PLANETS.iter().enumerate() {
            let pivot = id();
            let mesh = id();
            scene.spawn(Entity::new(pivot));
            scene.spawn(Entity::new(mesh));
            graph.register_with(pivot, LocalTransform::new());
            graph.register_with(mesh, LocalTransform::new());
            graph.set_parent(mesh, Some(pivot));
            let ring = p.ring.map(|_| {
                let ring = id();
                scene.spawn(Entity::new(ring));
                graph.register_with(ring, LocalTransform::new());
                graph.set_parent(ring, Some(mesh));
                ring
            });
            bodies_out.push(CelestialBody {
                name: p.name,
                mesh,
                pivot,
                ring,
                distance: p.orbit_distance() as f64,
                angular_speed: p.angular_speed(),
                angle: bodies::initial_angle(seed, i),
                axial_speed: bodies::AXIAL_ROTATION_SPEED,
                spin: 0.0,
                base_radius: p.base_radius(),
            });
        }
        (bodies_out, graph, scene)
    }

    #[test]
    fn sixty_frames_advance_one_second() {
        let (mut bodies, mut graph, _) = solar_system(7);
        let start: Vec<f64> = bodies.iter().map(|b| b.angle).collect();
        for _ in 0..60 {
            step_bodies(&mut bodies, &mut graph, 1.0 / 60.0, 1.0);
        }
        for (body, a0) in bodies.iter().zip(start) {
            let expected = a0 + body.angular_speed * (60.0 / 60.0);
            assert!((body.angle - expected).abs() < 1e-9, "{}: {} vs {}", body.name, body.angle, expected);
        }
    }

    #[test]
    fn zero_time_scale_freezes_motion() {
        let (mut bodies, mut graph, _) = solar_system(3);
        let before: Vec<(f64, f64)> = bodies.iter().map(|b| (b.angle, b.spin)).collect();
        for _ in 0..100 {
            step_bodies(&mut bodies, &mut graph, 1.0 / 30.0, 0.0);
        }
        let after: Vec<(f64, f64)> = bodies.iter().map(|b| (b.angle, b.spin)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn angles_never_decrease() {
        let (mut bodies, mut graph, _) = solar_system(11);
        for dt in [0.0, 1.0 / 144.0, 0.1, -1.0, f64::NAN, 0.05] {
            let before: Vec<f64> = bodies.iter().map(|b| b.angle).collect();
            step_bodies(&mut bodies, &mut graph, dt, 2.5);
            for (b, a0) in bodies.iter().zip(before) {
                assert!(b.angle >= a0, "{} went backwards with dt {dt}", b.name);
            }
        }
    }

    #[test]
    fn planar_position_follows_angle() {
        let (mut bodies, _, _) = solar_system(0);
        let earth = &mut bodies[bodies::EARTH];
        earth.angle = std::f64::consts::FRAC_PI_2;
        let pos = earth.planar_position();
        assert!(pos.x.abs() < 1e-5 && pos.y == 0.0 && (pos.z - 20.0).abs() < 1e-5, "pos = {pos:?}");
    }

    #[test]
    fn large_angles_are_folded() {
        let a = normalize_angle(2.0e6 + 1.0);
        assert!((0.0..TAU).contains(&a));
        assert_eq!(normalize_angle(12.5), 12.5);
    }

    #[test]
    fn scale_is_idempotent_and_has_no_hysteresis() {
        let (bodies, mut graph, mut scene) = solar_system(5);
        apply_scale_multiplier(&bodies, &mut graph, 25.0);
        apply_scale_multiplier(&bodies, &mut graph, 10.0);
        graph.propagate(&mut scene);
        let first: Vec<Vec3> = bodies.iter().map(|b| scene.get(b.mesh).unwrap().scale).collect();

        apply_scale_multiplier(&bodies, &mut graph, 10.0);
        graph.propagate(&mut scene);
        for (b, s) in bodies.iter().zip(first) {
            let now = scene.get(b.mesh).unwrap().scale;
            assert_eq!(now, s);
            assert!((now.x - b.base_radius * 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ring_tracks_planet_scale() {
        let (bodies, mut graph, mut scene) = solar_system(5);
        let saturn = &bodies[bodies::SATURN];
        let ring = saturn.ring.unwrap();
        for m in [1.0, 10.0, 50.0] {
            apply_scale_multiplier(&bodies, &mut graph, m);
            graph.propagate(&mut scene);
            let ring_scale = scene.get(ring).unwrap().scale.x;
            let world_outer = RING_OUTER_RATIO * ring_scale;
            let expected = RING_OUTER_RATIO * saturn.base_radius * m;
            assert!((world_outer - expected).abs() < 1e-5, "m = {m}");
        }
    }

    #[test]
    fn broken_body_does_not_stop_the_rest() {
        let (mut bodies, mut graph, _) = solar_system(9);
        bodies[0].mesh = EntityId(9999);
        bodies[1].angle = f64::NAN;
        let updated = step_bodies(&mut bodies, &mut graph, 1.0 / 60.0, 1.0);
        assert_eq!(updated, PLANETS.len() - 2);
        let last = bodies.last().unwrap();
        let offset = graph.get_local(last.mesh).unwrap().offset;
        assert!((offset - last.planar_position()).length() < 1e-6);
    }
}
