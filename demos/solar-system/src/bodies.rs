/// Static body data: sun constants and the eight-planet table.
///
/// Sizes, distances and speeds are stylized for readability, not physical.

// ── Sun ──────────────────────────────────────────────────────────────

pub const SUN_RADIUS: f32 = 3.0;
pub const SUN_SEGMENTS: u32 = 64;
/// Axial spin of the sun, rad per normalized frame.
pub const SUN_SPIN_SPEED: f64 = 0.001;
/// Glow sprite parented to the sun.
pub const SUN_GLOW_SCALE: [f32; 3] = [10.0, 10.0, 0.2];
pub const SUN_GLOW_COLOR: u32 = 0xffddaa;
pub const SUN_GLOW_OPACITY: f32 = 0.4;

// ── Planets ──────────────────────────────────────────────────────────

/// Planet radius relative to the sun's, per Earth radius.
pub const EARTH_SUN_PROPORTION: f32 = 0.00915768;
/// Scene units per distance step.
pub const UA: f32 = 10.0;
pub const DEFAULT_SCALE_MULTIPLIER: f32 = 10.0;
/// Table speeds are multiplied by this to get rad/s.
pub const ANGULAR_SPEED_FACTOR: f64 = 0.1;
/// Axial spin of every planet, rad per normalized frame.
pub const AXIAL_ROTATION_SPEED: f64 = 0.05;
/// Spin rates are tuned per 1/60 s frame; multiplying by dt × 60 keeps them
/// frame-rate independent.
pub const SPIN_NORMALIZATION: f64 = 60.0;
pub const PLANET_SEGMENTS: u32 = 32;
pub const PLANET_ROUGHNESS: f32 = 0.6;
pub const PLANET_METALNESS: f32 = 0.1;

// ── Ring, orbit guides, starfield ────────────────────────────────────

/// Ring radii as multiples of the planet's unit sphere.
pub const RING_INNER_RATIO: f32 = 1.2;
pub const RING_OUTER_RATIO: f32 = 2.2;
pub const RING_SEGMENTS: u32 = 64;
pub const RING_OPACITY: f32 = 0.8;

pub const ORBIT_SEGMENTS: u32 = 128;
pub const ORBIT_COLOR: u32 = 0x555555;
pub const ORBIT_OPACITY: f32 = 0.5;

pub const STARFIELD_RADIUS: f32 = 1000.0;
pub const STARFIELD_SEGMENTS: u32 = 64;

pub const AMBIENT_COLOR: u32 = 0x808080;
pub const AMBIENT_INTENSITY: f32 = 6.0;
pub const SUN_LIGHT_INTENSITY: f32 = 10.0;
pub const SUN_LIGHT_RANGE: f32 = 1000.0;
pub const SHADOW_MAP_SIZE: u32 = 4096;

/// One row of the planet table.
#[derive(Debug, Clone, Copy)]
pub struct PlanetDesc {
    pub name: &'static str,
    /// Radius in Earth radii.
    pub radius: f32,
    /// Distance in UA steps.
    pub distance: f32,
    /// Relative orbital speed.
    pub speed: f64,
    /// Fallback color when the texture is missing.
    pub color: u32,
    /// Texture key; the file is `<texture_dir>/<key>.jpg`.
    pub texture: &'static str,
    /// Ring texture key, `<texture_dir>/<key>.png`.
    pub ring: Option<&'static str>,
}

impl PlanetDesc {
    /// Unscaled mesh radius in scene units.
    pub fn base_radius(&self) -> f32 {
        self.radius * EARTH_SUN_PROPORTION
    }

    pub fn orbit_distance(&self) -> f32 {
        self.distance * UA
    }

    pub fn angular_speed(&self) -> f64 {
        self.speed * ANGULAR_SPEED_FACTOR
    }
}

pub const PLANET_COUNT: usize = 8;
pub const EARTH: usize = 2;
pub const SATURN: usize = 5;

pub const PLANETS: [PlanetDesc; PLANET_COUNT] = [
    PlanetDesc { name: "Mercury", radius: 0.38, distance: 1.0,  speed: 1.6,  color: 0xaaaaaa, texture: "mercury", ring: None },
    PlanetDesc { name: "Venus",   radius: 0.95, distance: 1.5,  speed: 1.17, color: 0xffe0b2, texture: "venus",   ring: None },
    PlanetDesc { name: "Earth",   radius: 1.0,  distance: 2.0,  speed: 1.0,  color: 0x6699ff, texture: "earth",   ring: None },
    PlanetDesc { name: "Mars",    radius: 0.53, distance: 2.52, speed: 0.8,  color: 0xff7f50, texture: "mars",    ring: None },
    PlanetDesc { name: "Jupiter", radius: 11.2, distance: 3.0,  speed: 0.43, color: 0xffd700, texture: "jupiter", ring: None },
    PlanetDesc { name: "Saturn",  radius: 9.45, distance: 4.0,  speed: 0.32, color: 0xf0e68c, texture: "saturn",  ring: Some("saturn_ring") },
    PlanetDesc { name: "Uranus",  radius: 4.0,  distance: 5.22, speed: 0.22, color: 0xadd8e6, texture: "uranus",  ring: None },
    PlanetDesc { name: "Neptune", radius: 3.88, distance: 7.06, speed: 0.18, color: 0x4169e1, texture: "neptune", ring: None },
];

/// `0xRRGGBB` (sRGB) to linear RGB.
pub fn hex_color(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

/// Deterministic integer hash of a seed, used to spread start angles.
pub fn angle_hash(seed: u32) -> u32 {
    let mut n = seed;
    n = n.wrapping_mul(2654435761);
    n ^= n >> 16;
    n = n.wrapping_mul(2246822519);
    n ^= n >> 13;
    n
}

/// Start angle of planet `index` for a given seed, in [0, 2π).
pub fn initial_angle(seed: u32, index: usize) -> f64 {
    let h = angle_hash(seed.wrapping_add(index as u32 * 7919));
    (h as f64 / (u32::MAX as f64 + 1.0)) * std::f64::consts::TAU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_ringed_planet() {
        let ringed: Vec<_> = PLANETS.iter().filter(|p| p.ring.is_some()).collect();
        assert_eq!(ringed.len(), 1);
        assert_eq!(ringed[0].name, PLANETS[SATURN].name);
        assert_eq!(PLANETS[EARTH].name, "Earth");
    }

    #[test]
    fn earth_derived_values() {
        let earth = &PLANETS[EARTH];
        assert!((earth.base_radius() - 0.00915768).abs() < 1e-9);
        assert_eq!(earth.orbit_distance(), 20.0);
        assert!((earth.angular_speed() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn hex_color_endpoints() {
        assert_eq!(hex_color(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(hex_color(0x000000), [0.0, 0.0, 0.0]);
        let grey = hex_color(0x808080);
        assert!((grey[0] - 0.2158).abs() < 1e-3, "grey = {grey:?}");
    }

    #[test]
    fn initial_angles_in_range_and_seeded() {
        for seed in [0, 1, 42, u32::MAX] {
            for i in 0..PLANET_COUNT {
                let a = initial_angle(seed, i);
                assert!((0.0..std::f64::consts::TAU).contains(&a), "angle {a}");
            }
        }
        assert_eq!(initial_angle(42, 3), initial_angle(42, 3));
        assert_ne!(initial_angle(42, 3), initial_angle(43, 3));
    }
}
