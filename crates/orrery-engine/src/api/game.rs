use crate::api::types::{EntityId, GameEvent};
use crate::assets::loader::LoadReport;
use crate::assets::manifest::AssetManifest;
use crate::audio::AudioQueue;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::extensions::transform::{LocalTransform, TransformGraph};
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Largest frame delta (seconds) handed to `Game::update`.
    /// Longer gaps (background tabs, debugger pauses) are clamped to this.
    pub max_frame_dt: f32,
    /// Vertical field of view in degrees (default: 75).
    pub fov_y_degrees: f32,
    /// Near clipping plane (default: 0.1).
    pub near: f32,
    /// Far clipping plane (default: 2000).
    pub far: f32,
    /// Initial viewport aspect ratio until the first resize arrives.
    pub aspect: f32,
    /// Maximum number of mesh instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Maximum number of audio commands per frame (default: 16).
    pub max_audio_commands: usize,
    /// Maximum number of point lights (default: 4).
    pub max_lights: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
            aspect: 16.0 / 9.0,
            max_instances: 64,
            max_events: 32,
            max_audio_commands: 16,
            max_lights: 4,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Assets the host must load before the animation loop starts.
    fn manifest(&self) -> AssetManifest {
        AssetManifest::default()
    }

    /// Apply page-supplied JSON configuration. Called before init.
    fn configure(&mut self, _json: &str) {}

    /// Offer a host-generated random seed. Called before init.
    fn reseed(&mut self, _seed: u32) {}

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Fired exactly once, after every manifest entry has loaded or failed.
    fn on_assets_ready(&mut self, _ctx: &mut EngineContext, _report: &LoadReport) {}

    /// The per-frame tick. `dt` is the clamped wall-clock delta in seconds.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub transforms: TransformGraph,
    pub camera: Camera3D,
    pub lights: LightState,
    pub audio: AudioQueue,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Create a context whose camera and buffers follow `config`.
    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::with_capacity(config.max_instances),
            transforms: TransformGraph::new(),
            camera: Camera3D::new(config.fov_y_degrees, config.aspect, config.near, config.far),
            lights: LightState::with_capacity(config.max_lights),
            audio: AudioQueue::with_capacity(config.max_audio_commands),
            events: Vec::with_capacity(config.max_events),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn an entity and register it in the transform hierarchy.
    /// `parent` of `None` places it directly in world space.
    pub fn spawn(&mut self, entity: Entity, local: LocalTransform, parent: Option<EntityId>) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        self.transforms.register_with(id, local);
        if parent.is_some() {
            self.transforms.set_parent(id, parent);
        }
        id
    }

    /// Emit a game event to be forwarded to the page.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    /// Audio commands are not cleared here; the runner hands them off after each tick.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
