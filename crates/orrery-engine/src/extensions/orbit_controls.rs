// extensions/orbit_controls.rs
//
// Free-orbit camera controller: drag rotates around a target, wheel dollies.
// Spherical coordinates (radius, theta around +Y, phi from +Y) relative to the target.
// With damping, each update applies only a fraction of the pending rotation and
// decays the remainder, so the camera glides to a stop after a drag.

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::renderer::camera::Camera3D;

/// Keeps phi off the poles, where look-at with a Y up vector degenerates.
const POLE_EPSILON: f32 = 1e-4;

/// Spherical coordinates of the eye around the target.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < 1e-6 {
            return Self { radius: 0.0, theta: 0.0, phi: PI / 2.0 };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit-camera controller with damping, distance limits and an enable switch.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Fraction of pending motion applied per update (three.js default feel: 0.05).
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of rotation per NDC unit of pointer travel.
    pub rotate_speed: f32,
    /// Dolly multiplier base per wheel notch.
    pub zoom_speed: f32,
    enabled: bool,
    spherical: Spherical,
    theta_delta: f32,
    phi_delta: f32,
    /// Pending dolly, applied as a radius multiplier.
    scale: f32,
    /// Last pointer position while dragging.
    drag_from: Option<Vec2>,
}

impl OrbitControls {
    /// Create controls that continue from the camera's current pose.
    pub fn from_camera(camera: &Camera3D) -> Self {
        Self {
            target: camera.target,
            damping_factor: 0.05,
            min_distance: 4.0,
            max_distance: 1000.0,
            rotate_speed: PI,
            zoom_speed: 0.95,
            enabled: true,
            spherical: Spherical::from_offset(camera.position - camera.target),
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            drag_from: None,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable user input. Disabling drops any drag and pending motion.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_motion();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn pointer_down(&mut self, ndc: Vec2) {
        if self.enabled {
            self.drag_from = Some(ndc);
        }
    }

    pub fn pointer_move(&mut self, ndc: Vec2) {
        if !self.enabled {
            return;
        }
        let Some(from) = self.drag_from else { return };
        let delta = ndc - from;
        // Dragging right swings the eye left around the target
        self.theta_delta -= delta.x * self.rotate_speed;
        self.phi_delta += delta.y * self.rotate_speed;
        self.drag_from = Some(ndc);
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Wheel input: positive `delta` (scroll down) dollies out.
    pub fn wheel(&mut self, delta: f32) {
        if !self.enabled || delta == 0.0 || !delta.is_finite() {
            return;
        }
        if delta > 0.0 {
            self.scale /= self.zoom_speed;
        } else {
            self.scale *= self.zoom_speed;
        }
    }

    /// Teleport the camera to `position` looking at `target`, discarding pending motion.
    pub fn snap_to(&mut self, camera: &mut Camera3D, position: Vec3, target: Vec3) {
        self.cancel_motion();
        self.target = target;
        self.spherical = Spherical::from_offset(position - target);
        camera.position = position;
        camera.look_at(target);
    }

    /// Apply pending motion and write the camera pose. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera3D) -> bool {
        let before = camera.position;

        if self.damping_factor > 0.0 {
            self.spherical.theta += self.theta_delta * self.damping_factor;
            self.spherical.phi += self.phi_delta * self.damping_factor;
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
        } else {
            self.spherical.theta += self.theta_delta;
            self.spherical.phi += self.phi_delta;
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.spherical.phi = self.spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.spherical.radius =
            (self.spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.scale = 1.0;

        camera.position = self.target + self.spherical.to_offset();
        camera.look_at(self.target);

        (camera.position - before).length_squared() > 1e-12
    }

    /// Current eye distance from the target.
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    fn cancel_motion(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.drag_from = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Camera3D, OrbitControls) {
        let mut camera = Camera3D::default().with_position(Vec3::new(0.0, 30.0, 60.0));
        camera.look_at(Vec3::ZERO);
        let controls = OrbitControls::from_camera(&camera);
        (camera, controls)
    }

    #[test]
    fn idle_update_keeps_pose() {
        let (mut camera, mut controls) = setup();
        let start = camera.position;
        controls.update(&mut camera);
        assert!((camera.position - start).length() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn drag_rotates_with_damping() {
        let (mut camera, mut controls) = setup();
        let start = camera.position;
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.5, 0.0));
        controls.pointer_up();

        let moved_first = {
            controls.update(&mut camera);
            (camera.position - start).length()
        };
        assert!(moved_first > 0.0);

        // Motion keeps gliding on later frames
        let after_first = camera.position;
        assert!(controls.update(&mut camera));
        assert!((camera.position - after_first).length() > 0.0);

        // Distance to target is preserved by rotation
        assert!((camera.position.length() - start.length()).abs() < 1e-2);
    }

    #[test]
    fn wheel_respects_distance_limits() {
        let (mut camera, mut controls) = setup();
        for _ in 0..500 {
            controls.wheel(-1.0);
            controls.update(&mut camera);
        }
        assert!((controls.distance() - 4.0).abs() < 1e-4);
        for _ in 0..500 {
            controls.wheel(1.0);
            controls.update(&mut camera);
        }
        assert!((controls.distance() - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let (mut camera, mut controls) = setup();
        let start = camera.position;
        controls.set_enabled(false);
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(1.0, 1.0));
        controls.wheel(1.0);
        assert!(!controls.is_dragging());
        controls.set_enabled(true);
        controls.update(&mut camera);
        assert!((camera.position - start).length() < 1e-3);
    }

    #[test]
    fn snap_then_update_lands_on_snapshot() {
        let (mut camera, mut controls) = setup();
        let position = Vec3::new(-12.0, 8.0, 25.0);
        let target = Vec3::new(1.0, 0.0, -2.0);

        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.3, 0.2));
        controls.snap_to(&mut camera, position, target);
        controls.update(&mut camera);

        assert!((camera.position - position).length() < 1e-3, "pos = {:?}", camera.position);
        assert_eq!(camera.target, target);
    }

    #[test]
    fn phi_is_kept_off_the_pole() {
        let (mut camera, mut controls) = setup();
        controls = controls.with_damping(0.0);
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.0, -10.0));
        controls.update(&mut camera);
        assert!(camera.position.x.is_finite() && camera.position.y.is_finite());
        assert!(camera.position.y < 67.1 && camera.position.y > 0.0);
    }
}
