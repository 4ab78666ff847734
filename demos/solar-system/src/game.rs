/// Solar System 3D: eight planets around a spinning sun.
///
/// Click a planet to follow it, click it again (or empty space) to return.
/// Sliders drive time scale, planet scale and music volume.

use std::f32::consts::FRAC_PI_2;
use glam::{Quat, Vec2, Vec3};
use orrery_engine::*;

use crate::bodies::{self, PLANETS};
use crate::config::OrreryConfig;
use crate::controls::{self, MusicPlayer, SimulationParams};
use crate::focus::{CameraFocus, FocusState, FocusTransition};
use crate::orbit::{self, CelestialBody};

// ── Custom event kinds from the page ─────────────────────────────────

const CUSTOM_SET_TIME_SCALE: u32 = 1;
const CUSTOM_SET_SCALE: u32 = 2;
const CUSTOM_SET_VOLUME: u32 = 3;
const CUSTOM_TOGGLE_MUSIC: u32 = 4;

// ── Game event kinds to the page ─────────────────────────────────────

/// a = time scale
const EVENT_TIME_SCALE: f32 = 1.0;
/// a = scale multiplier
const EVENT_SCALE: f32 = 2.0;
/// a = volume
const EVENT_VOLUME: f32 = 3.0;
/// a = playing (0/1), b = loaded (0/1)
const EVENT_MUSIC: f32 = 4.0;
/// a = focused planet index or -1
const EVENT_FOCUS: f32 = 5.0;

// ── Camera ───────────────────────────────────────────────────────────

const CAMERA_START: Vec3 = Vec3::new(0.0, 30.0, 60.0);
const ORBIT_DAMPING: f32 = 0.05;
const ORBIT_MIN_DISTANCE: f32 = 4.0;
const ORBIT_MAX_DISTANCE: f32 = 1000.0;

const MUSIC_NAME: &str = "music";

// ── Game struct ──────────────────────────────────────────────────────

pub struct Orrery {
    config: OrreryConfig,
    /// Seed for the start angles.
    seed: u32,
    params: SimulationParams,
    music: MusicPlayer,
    focus: CameraFocus,
    orbit_controls: OrbitControls,

    sun: Option<CelestialBody>,
    planets: Vec<CelestialBody>,
    music_asset: Option<AssetId>,
}

impl Orrery {
    pub fn new() -> Self {
        let config = OrreryConfig::default();
        let mut camera = Camera3D::default().with_position(CAMERA_START);
        camera.look_at(Vec3::ZERO);
        Self {
            params: params_from(&config),
            focus: CameraFocus::new(config.focus),
            orbit_controls: OrbitControls::from_camera(&camera),
            config,
            seed: 0,
            music: MusicPlayer::new(),
            sun: None,
            planets: Vec::with_capacity(bodies::PLANET_COUNT),
            music_asset: None,
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn planets(&self) -> &[CelestialBody] {
        &self.planets
    }

    pub fn music(&self) -> &MusicPlayer {
        &self.music
    }

    // ── Controls ───────────────────────────────────────────────────

    fn on_time_scale_changed(&mut self, v: f32) {
        if self.params.set_time_scale(v as f64) {
            log::debug!("time scale {}", controls::format_time_scale(self.params.time_scale));
        }
    }

    fn on_scale_changed(&mut self, ctx: &mut EngineContext, v: f32) {
        if self.params.set_scale_multiplier(v) {
            orbit::apply_scale_multiplier(&self.planets, &mut ctx.transforms, v);
            log::debug!("planet scale {}", controls::format_scale(v));
        }
    }

    fn on_volume_changed(&mut self, ctx: &mut EngineContext, v: f32) {
        if self.params.set_volume(v) {
            self.music.set_volume(&mut ctx.audio, self.params.music_volume);
        }
    }

    fn on_play_pause_toggled(&mut self, ctx: &mut EngineContext) {
        self.music.toggle(&mut ctx.audio);
    }

    // ── Pointer ────────────────────────────────────────────────────

    /// Nearest planet under the pointer. The sun occludes planets behind it
    /// but is not focusable, so a sun hit reads as empty space.
    fn pick_planet(&self, ctx: &EngineContext, ndc: Vec2) -> Option<usize> {
        let ray = ctx.camera.ray_from_ndc(ndc);
        let sun = self.sun.as_ref().and_then(|sun| {
            let entity = ctx.scene.get(sun.mesh)?;
            Some((None, entity.pos, bodies::SUN_RADIUS * entity.scale.x))
        });
        let planets = self.planets.iter().enumerate().filter_map(|(i, body)| {
            let entity = ctx.scene.get(body.mesh)?;
            Some((Some(i), entity.pos, entity.scale.x))
        });
        pick_nearest(&ray, sun.into_iter().chain(planets)).flatten()
    }

    fn on_pointer_down(&mut self, ctx: &mut EngineContext, ndc: Vec2) {
        let hit = self.pick_planet(ctx, ndc);
        match self.focus.on_pointer_down(hit, &ctx.camera) {
            FocusTransition::None => self.orbit_controls.pointer_down(ndc),
            FocusTransition::Enter { .. } => self.orbit_controls.set_enabled(false),
            FocusTransition::Switch { .. } => {}
            FocusTransition::Exit { restore } => {
                self.orbit_controls
                    .snap_to(&mut ctx.camera, restore.position, restore.target);
                self.orbit_controls.set_enabled(true);
            }
        }
    }

    // ── Per-frame ──────────────────────────────────────────────────

    fn advance_bodies(&mut self, ctx: &mut EngineContext, dt: f64) {
        let time_scale = self.params.time_scale;
        if let Some(sun) = self.sun.as_mut() {
            sun.advance(dt, time_scale);
            sun.sync_transform(&mut ctx.transforms);
        }
        orbit::step_bodies(&mut self.planets, &mut ctx.transforms, dt, time_scale);
    }

    fn update_camera(&mut self, ctx: &mut EngineContext) {
        match self.focus.state() {
            FocusState::Focused(i) => {
                let Some(body) = self.planets.get(i) else {
                    log::warn!("focused planet {} does not exist", i);
                    return;
                };
                let Some(body_pos) = ctx.scene.world_position(body.mesh) else {
                    log::warn!("{}: no world position to follow", body.name);
                    return;
                };
                let sun_pos = self
                    .sun
                    .as_ref()
                    .and_then(|s| ctx.scene.world_position(s.mesh))
                    .unwrap_or(Vec3::ZERO);
                self.focus.track(&mut ctx.camera, body_pos, sun_pos);
            }
            FocusState::Free => {
                self.orbit_controls.update(&mut ctx.camera);
            }
        }
    }

    fn emit_readouts(&self, ctx: &mut EngineContext) {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let focused = match self.focus.state() {
            FocusState::Focused(i) => i as f32,
            FocusState::Free => -1.0,
        };
        ctx.emit_event(GameEvent::new(EVENT_TIME_SCALE, self.params.time_scale as f32, 0.0, 0.0));
        ctx.emit_event(GameEvent::new(EVENT_SCALE, self.params.scale_multiplier, 0.0, 0.0));
        ctx.emit_event(GameEvent::new(EVENT_VOLUME, self.params.music_volume, 0.0, 0.0));
        ctx.emit_event(GameEvent::new(
            EVENT_MUSIC,
            flag(self.music.is_playing()),
            flag(self.music.is_loaded()),
            0.0,
        ));
        ctx.emit_event(GameEvent::new(EVENT_FOCUS, focused, 0.0, 0.0));
    }

    // ── Scene bootstrap ────────────────────────────────────────────

    fn spawn_starfield(&self, ctx: &mut EngineContext, manifest: &AssetManifest) {
        let mut material = Material::basic().with_side(Side::Back);
        if let Some(stars) = manifest.texture("stars") {
            material = material.with_texture(stars);
        }
        let id = ctx.next_id();
        ctx.spawn(
            Entity::new(id).with_tag("starfield").with_mesh(MeshComponent::sphere(
                bodies::STARFIELD_RADIUS,
                bodies::STARFIELD_SEGMENTS,
                material,
            )),
            LocalTransform::new(),
            None,
        );
    }

    fn spawn_sun(&mut self, ctx: &mut EngineContext, manifest: &AssetManifest) {
        let mut material = Material::basic().with_emissive(1.0);
        if let Some(tex) = manifest.texture("sun") {
            material = material.with_texture(tex);
        }
        let sun_id = ctx.next_id();
        ctx.spawn(
            Entity::new(sun_id)
                .with_tag("sun")
                .with_mesh(MeshComponent::sphere(bodies::SUN_RADIUS, bodies::SUN_SEGMENTS, material)),
            LocalTransform::new(),
            None,
        );

        let mut glow_material = Material::sprite()
            .with_color(bodies::hex_color(bodies::SUN_GLOW_COLOR))
            .with_opacity(bodies::SUN_GLOW_OPACITY)
            .with_blend(Blend::Additive)
            .without_depth_write();
        if let Some(flare) = manifest.texture("sun_flare") {
            glow_material = glow_material.with_texture(flare);
        }
        let glow_id = ctx.next_id();
        ctx.spawn(
            Entity::new(glow_id)
                .with_tag("sun_glow")
                .with_mesh(MeshComponent::new(MeshShape::Sprite, glow_material)),
            LocalTransform::new().with_scale(Vec3::from(bodies::SUN_GLOW_SCALE)),
            Some(sun_id),
        );

        self.sun = Some(CelestialBody {
            name: "Sun",
            mesh: sun_id,
            pivot: sun_id,
            ring: None,
            distance: 0.0,
            angular_speed: 0.0,
            angle: 0.0,
            axial_speed: bodies::SUN_SPIN_SPEED,
            spin: 0.0,
            base_radius: bodies::SUN_RADIUS,
        });
    }

    fn spawn_lights(&self, ctx: &mut EngineContext) {
        ctx.lights
            .set_ambient(bodies::hex_color(bodies::AMBIENT_COLOR), bodies::AMBIENT_INTENSITY);
        ctx.lights.add(
            PointLight::new(Vec3::ZERO, [1.0, 1.0, 1.0], bodies::SUN_LIGHT_INTENSITY, bodies::SUN_LIGHT_RANGE)
                .with_shadow(bodies::SHADOW_MAP_SIZE),
        );
    }

    fn spawn_planets(&mut self, ctx: &mut EngineContext, manifest: &AssetManifest) {
        let m = self.params.scale_multiplier;
        for (i, desc) in PLANETS.iter().enumerate() {
            let mut material = Material::standard(bodies::PLANET_ROUGHNESS, bodies::PLANET_METALNESS)
                .with_color(bodies::hex_color(desc.color));
            if let Some(tex) = manifest.texture(desc.texture) {
                // The map alone colors a textured planet
                material = material.with_color([1.0, 1.0, 1.0]).with_texture(tex);
            }

            let pivot = ctx.next_id();
            ctx.spawn(
                Entity::new(pivot).with_tag(format!("{}_pivot", desc.name)),
                LocalTransform::new(),
                None,
            );

            let mut body = CelestialBody {
                name: desc.name,
                mesh: ctx.next_id(),
                pivot,
                ring: None,
                distance: desc.orbit_distance() as f64,
                angular_speed: desc.angular_speed(),
                angle: bodies::initial_angle(self.seed, i),
                axial_speed: bodies::AXIAL_ROTATION_SPEED,
                spin: 0.0,
                base_radius: desc.base_radius(),
            };
            ctx.spawn(
                Entity::new(body.mesh)
                    .with_tag(desc.name)
                    .with_mesh(MeshComponent::sphere(1.0, bodies::PLANET_SEGMENTS, material).with_shadows(true, true)),
                LocalTransform::new()
                    .with_offset(body.planar_position())
                    .with_uniform_scale(body.visual_radius(m)),
                Some(pivot),
            );

            if let Some(ring_key) = desc.ring {
                let mut ring_material = Material::standard(bodies::PLANET_ROUGHNESS, bodies::PLANET_METALNESS)
                    .with_side(Side::Double)
                    .with_opacity(bodies::RING_OPACITY);
                if let Some(tex) = manifest.texture(ring_key) {
                    ring_material = ring_material.with_texture(tex);
                }
                let ring_id = ctx.next_id();
                ctx.spawn(
                    Entity::new(ring_id).with_tag(format!("{}_ring", desc.name)).with_mesh(
                        MeshComponent::new(
                            MeshShape::Ring {
                                inner: bodies::RING_INNER_RATIO,
                                outer: bodies::RING_OUTER_RATIO,
                                segments: bodies::RING_SEGMENTS,
                            },
                            ring_material,
                        )
                        .with_shadows(false, true),
                    ),
                    // Lay the XY-plane annulus flat into XZ
                    LocalTransform::new().with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                    Some(body.mesh),
                );
                body.ring = Some(ring_id);
            }

            self.planets.push(body);
        }
    }

    fn spawn_orbit_guides(&self, ctx: &mut EngineContext) {
        let material = Material::line()
            .with_color(bodies::hex_color(bodies::ORBIT_COLOR))
            .with_opacity(bodies::ORBIT_OPACITY);
        for desc in PLANETS.iter() {
            let id = ctx.next_id();
            ctx.spawn(
                Entity::new(id).with_tag(format!("{}_orbit", desc.name)).with_mesh(MeshComponent::new(
                    MeshShape::LineLoop {
                        radius: desc.orbit_distance(),
                        segments: bodies::ORBIT_SEGMENTS,
                    },
                    material,
                )),
                LocalTransform::new(),
                None,
            );
        }
    }
}

fn params_from(config: &OrreryConfig) -> SimulationParams {
    SimulationParams {
        time_scale: config.time_scale,
        scale_multiplier: config.scale_multiplier,
        music_volume: config.music_volume,
    }
}

impl Default for Orrery {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Orrery {
    fn manifest(&self) -> AssetManifest {
        let mut manifest = AssetManifest::new();
        let c = &self.config;
        manifest.add_texture("sun", &c.texture_path("sun", "jpg"), ColorSpace::Srgb);
        manifest.add_texture("sun_flare", &c.texture_path("sun_flare", "jpg"), ColorSpace::Srgb);
        manifest.add_texture("stars", &c.texture_path("stars", "jpg"), ColorSpace::Linear);
        for desc in PLANETS.iter() {
            manifest.add_texture(desc.texture, &c.texture_path(desc.texture, "jpg"), ColorSpace::Srgb);
            if let Some(ring) = desc.ring {
                manifest.add_texture(ring, &c.texture_path(ring, "png"), ColorSpace::Srgb);
            }
        }
        manifest.add_audio(MUSIC_NAME, &c.music_path, true, c.music_volume);
        manifest
    }

    fn configure(&mut self, json: &str) {
        match OrreryConfig::from_json(json) {
            Ok(config) => {
                if let Some(seed) = config.seed {
                    self.seed = seed;
                }
                self.params = params_from(&config);
                self.focus = CameraFocus::new(config.focus);
                self.config = config;
            }
            Err(e) => log::warn!("ignoring orrery config: {:#}", e),
        }
    }

    fn reseed(&mut self, seed: u32) {
        self.seed = seed;
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let manifest = self.manifest();
        self.music_asset = manifest.audio(MUSIC_NAME);

        ctx.camera.position = CAMERA_START;
        ctx.camera.look_at(Vec3::ZERO);
        self.orbit_controls = OrbitControls::from_camera(&ctx.camera)
            .with_damping(ORBIT_DAMPING)
            .with_distance_limits(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);

        self.spawn_starfield(ctx, &manifest);
        self.spawn_sun(ctx, &manifest);
        self.spawn_lights(ctx);
        self.spawn_planets(ctx, &manifest);
        self.spawn_orbit_guides(ctx);
        ctx.transforms.propagate(&mut ctx.scene);

        log::info!(
            "orrery: {} planets, {} entities, seed {}",
            self.planets.len(),
            ctx.scene.len(),
            self.seed
        );
    }

    fn on_assets_ready(&mut self, ctx: &mut EngineContext, report: &LoadReport) {
        for (id, reason) in &report.failed {
            log::warn!("asset {} unavailable ({}), continuing without it", id.0, reason);
        }
        // Untextured planets fall back to their table color
        for (body, desc) in self.planets.iter().zip(PLANETS.iter()) {
            let Some(mesh) = ctx.scene.get_mut(body.mesh).and_then(|e| e.mesh.as_mut()) else {
                continue;
            };
            if mesh.material.texture.is_some_and(|t| !report.is_loaded(t)) {
                mesh.material.color = bodies::hex_color(desc.color);
            }
        }
        match self.music_asset {
            Some(id) if report.is_loaded(id) => {
                self.music.attach(&mut ctx.audio, id, true, self.params.music_volume);
            }
            _ => log::warn!("music unavailable, audio controls disabled"),
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) {
        // ── Handle input ─────────────────────────────────────────────
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, a, .. } => match kind {
                    CUSTOM_SET_TIME_SCALE => self.on_time_scale_changed(a),
                    CUSTOM_SET_SCALE => self.on_scale_changed(ctx, a),
                    CUSTOM_SET_VOLUME => self.on_volume_changed(ctx, a),
                    CUSTOM_TOGGLE_MUSIC => self.on_play_pause_toggled(ctx),
                    other => log::debug!("unknown custom event {}", other),
                },
                InputEvent::PointerDown { x, y, .. } => self.on_pointer_down(ctx, Vec2::new(x, y)),
                InputEvent::PointerMove { x, y } => self.orbit_controls.pointer_move(Vec2::new(x, y)),
                InputEvent::PointerUp { .. } => self.orbit_controls.pointer_up(),
                InputEvent::Wheel { delta } => self.orbit_controls.wheel(delta),
            }
        }

        // ── Advance bodies, then place the camera against fresh positions ──
        self.advance_bodies(ctx, dt as f64);
        ctx.transforms.propagate(&mut ctx.scene);
        self.update_camera(ctx);

        self.emit_readouts(ctx);
    }
}
