/// Ray picking against sphere hit-volumes.
///
/// Nearest intersection wins; anything behind the ray origin is ignored.

use glam::Vec3;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Build a ray; `dir` is normalized.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Distance along `ray` to the first hit on a sphere, if any.
/// A ray starting inside the sphere reports the exit point.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if radius <= 0.0 || ray.dir == Vec3::ZERO {
        return None;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    let far = -b + sqrt_disc;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Pick the candidate whose sphere the ray hits first.
/// Candidates are `(key, center, radius)`.
pub fn pick_nearest<K>(ray: &Ray, candidates: impl IntoIterator<Item = (K, Vec3, f32)>) -> Option<K> {
    let mut best: Option<(K, f32)> = None;
    for (key, center, radius) in candidates {
        let Some(t) = ray_sphere(ray, center, radius) else { continue };
        let closer = best.as_ref().map_or(true, |(_, best_t)| t < *best_t);
        if closer {
            best = Some((key, t));
        }
    }
    best.map(|(key, _)| key)
}
