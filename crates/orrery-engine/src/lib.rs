pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod audio;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, MeshShape, Material, MaterialKind, Side, Blend};
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use renderer::instance::{MeshInstance, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraUniform};
pub use input::queue::{InputEvent, InputQueue, PointerTarget};
pub use assets::manifest::{AssetManifest, AssetId, ColorSpace};
pub use assets::loader::{AssetTracker, LoadReport, LoadState};
pub use audio::{AudioSink, AudioQueue, AudioCommand, AudioOp};
pub use bridge::protocol::ProtocolLayout;
pub use systems::lighting::{PointLight, LightState};
pub use systems::picking::{Ray, ray_sphere, pick_nearest};
pub use systems::render::build_render_buffer;

// Extensions: decoupled optional systems
pub use extensions::{TransformGraph, LocalTransform, OrbitControls};
