use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use crate::systems::picking::Ray;

/// Perspective camera looking from `position` toward `target`.
/// Right-handed, Y-up, depth mapped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
/// 36 floats: view-projection, view, eye position (w = 1).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 36;
}

impl Camera3D {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Point the camera at `target` without moving it.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Move the eye a fixed fraction of the way toward `desired`.
    /// `factor` is applied once per call (per frame), not per second.
    pub fn follow(&mut self, desired: Vec3, factor: f32) {
        self.position = self.position.lerp(desired, factor.clamp(0.0, 1.0));
    }

    /// Track a viewport resize. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        } else {
            log::debug!("ignoring degenerate viewport {}x{}", width, height);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            view: self.view_matrix().to_cols_array_2d(),
            eye: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    /// Project a world point to normalized device coordinates
    /// (x, y in [-1, 1] with y up; z = depth in [0, 1]).
    pub fn project_ndc(&self, world: Vec3) -> Vec3 {
        let clip = self.view_projection() * world.extend(1.0);
        clip.truncate() / clip.w
    }

    /// Ray from the eye through a pointer given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        // Built from the frustum slope rather than inverting view-projection,
        // which loses precision near the far plane.
        let half_h = (self.fov_y * 0.5).tan();
        let dir_view = Vec3::new(ndc.x * half_h * self.aspect, ndc.y * half_h, -1.0);
        let dir = self.view_matrix().inverse().transform_vector3(dir_view);
        Ray::new(self.position, dir)
    }

    /// Unit vector from eye toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 2000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera3D {
        let mut cam = Camera3D::default().with_position(Vec3::new(0.0, 30.0, 60.0));
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn target_projects_to_center() {
        let cam = camera();
        let ndc = cam.project_ndc(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "ndc = {ndc:?}");
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let expected = cam.forward();
        assert!((ray.dir - expected).length() < 1e-4, "dir = {:?}", ray.dir);
    }

    #[test]
    fn ray_passes_through_projected_point() {
        let cam = camera();
        let point = Vec3::new(20.0, 0.0, 5.0);
        let ndc = cam.project_ndc(point);
        let ray = cam.ray_from_ndc(ndc.truncate());
        let t = (point - ray.origin).dot(ray.dir);
        let closest = ray.at(t);
        assert!((closest - point).length() < 1e-2, "miss by {}", (closest - point).length());
    }

    #[test]
    fn follow_moves_fixed_fraction() {
        let mut cam = camera();
        cam.position = Vec3::ZERO;
        cam.follow(Vec3::new(10.0, 0.0, 0.0), 0.1);
        assert!((cam.position.x - 1.0).abs() < 1e-6);
        cam.follow(Vec3::new(10.0, 0.0, 0.0), 0.1);
        assert!((cam.position.x - 1.9).abs() < 1e-5);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        cam.resize(1000.0, 500.0);
        assert_eq!(cam.aspect, 2.0);
        cam.resize(0.0, 500.0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn uniform_is_36_floats() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), CameraUniform::FLOATS * 4);
    }
}
