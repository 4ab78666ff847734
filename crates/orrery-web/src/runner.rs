use orrery_engine::{
    Game, GameConfig, EngineContext, InputEvent, InputQueue, RenderBuffer,
    FrameClock, ProtocolLayout, AssetTracker, AssetId, AudioCommand, CameraUniform,
    build_render_buffer,
};
use orrery_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT, HEADER_OPAQUE_SPLIT,
    HEADER_LIGHT_COUNT, HEADER_EVENT_COUNT, HEADER_AUDIO_COUNT, HEADER_AMBIENT_R,
    HEADER_AMBIENT_G, HEADER_AMBIENT_B, HEADER_AMBIENT_INTENSITY, HEADER_READY,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
///
/// Nothing ticks until every manifest asset has reported loaded or failed.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: GameConfig,
    layout: ProtocolLayout,
    tracker: AssetTracker,
    manifest_json: String,
    initialized: bool,
    ready: bool,
    header: [f32; HEADER_FLOATS],
    camera_uniform: CameraUniform,
    /// Audio commands handed off by the last tick.
    audio_out: Vec<AudioCommand>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::with_config(&config);
        let camera_uniform = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            clock: FrameClock::new(config.max_frame_dt),
            header: layout.header(),
            layout,
            config,
            tracker: AssetTracker::default(),
            manifest_json: String::from("{}"),
            initialized: false,
            ready: false,
            camera_uniform,
            audio_out: Vec::new(),
        }
    }

    /// Forward page configuration JSON. Call before init.
    pub fn configure(&mut self, json: &str) {
        self.game.configure(json);
    }

    /// Forward a host random seed. Call before init.
    pub fn reseed(&mut self, seed: u32) {
        self.game.reseed(seed);
    }

    /// Initialize the game. Call once after configure/reseed.
    pub fn init(&mut self) {
        if self.initialized {
            log::warn!("init called twice, ignoring");
            return;
        }
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.header = self.layout.header();
        self.clock = FrameClock::new(self.config.max_frame_dt);
        self.ctx = EngineContext::with_config(&self.config);
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_instances);

        let manifest = self.game.manifest();
        self.tracker = AssetTracker::new(&manifest);
        self.manifest_json = match manifest.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize asset manifest: {}", e);
                String::from("{}")
            }
        };

        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.camera_uniform = self.ctx.camera.uniform();

        // An empty manifest opens the barrier immediately
        self.poll_ready();
    }

    pub fn asset_loaded(&mut self, id: u32) {
        self.tracker.mark_loaded(AssetId(id));
        self.poll_ready();
    }

    pub fn asset_failed(&mut self, id: u32, reason: &str) {
        self.tracker.mark_failed(AssetId(id), reason);
        self.poll_ready();
    }

    fn poll_ready(&mut self) {
        if !self.initialized {
            return;
        }
        if let Some(report) = self.tracker.poll_ready() {
            self.game.on_assets_ready(&mut self.ctx, &report);
            self.ready = true;
            self.header[HEADER_READY] = 1.0;
        }
    }

    /// Push an input event into the queue.
    /// Pointer input arriving before the scene is ready is dropped;
    /// control events wait for the first tick.
    pub fn push_input(&mut self, event: InputEvent) {
        if !self.ready && event.is_pointer() {
            log::debug!("dropping pointer input while loading");
            return;
        }
        self.input.push(event);
    }

    /// Track a viewport resize (CSS pixels).
    pub fn resize(&mut self, width: f32, height: f32) {
        self.ctx.camera.resize(width, height);
        self.camera_uniform = self.ctx.camera.uniform();
    }

    /// Run one frame: update game, propagate transforms, build buffers.
    pub fn tick(&mut self, frame_dt: f32) {
        if !self.initialized || !self.ready {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let dt = self.clock.advance(frame_dt);
        self.game.update(&mut self.ctx, &self.input, dt);

        // Drain input after update
        self.input.drain();

        self.ctx.transforms.propagate(&mut self.ctx.scene);
        build_render_buffer(self.ctx.scene.iter(), &self.tracker, &mut self.render_buffer);
        self.camera_uniform = self.ctx.camera.uniform();
        // Commands past capacity wait for the next frame
        self.audio_out = self.ctx.audio.drain_up_to(self.layout.max_audio_commands);
        if !self.ctx.audio.is_empty() {
            log::debug!("{} audio commands deferred to next frame", self.ctx.audio.len());
        }

        self.write_header();
    }

    fn write_header(&mut self) {
        let instances = self.clamped("instances", self.render_buffer.instances.len(), self.layout.max_instances);
        let lights = self.clamped("lights", self.ctx.lights.count(), self.layout.max_lights);
        let events = self.clamped("events", self.ctx.events.len(), self.layout.max_events);
        let audio = self.audio_out.len();
        let ambient = self.ctx.lights.ambient();

        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.clock.frames() as f32;
        h[HEADER_INSTANCE_COUNT] = instances as f32;
        h[HEADER_OPAQUE_SPLIT] = (self.render_buffer.opaque_split as usize).min(instances) as f32;
        h[HEADER_LIGHT_COUNT] = lights as f32;
        h[HEADER_EVENT_COUNT] = events as f32;
        h[HEADER_AUDIO_COUNT] = audio as f32;
        h[HEADER_AMBIENT_R] = ambient[0];
        h[HEADER_AMBIENT_G] = ambient[1];
        h[HEADER_AMBIENT_B] = ambient[2];
        h[HEADER_AMBIENT_INTENSITY] = self.ctx.lights.ambient_intensity();
    }

    fn clamped(&self, what: &str, len: usize, max: usize) -> usize {
        if len > max {
            log::warn!("{} overflow: {} > capacity {}, truncating", what, len, max);
        }
        len.min(max)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn manifest_json(&self) -> &str {
        &self.manifest_json
    }

    pub fn status_text(&self) -> String {
        self.tracker.status_text()
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera_uniform as *const CameraUniform as *const f32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.header[HEADER_INSTANCE_COUNT] as u32
    }

    pub fn opaque_split(&self) -> u32 {
        self.header[HEADER_OPAQUE_SPLIT] as u32
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.header[HEADER_LIGHT_COUNT] as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.header[HEADER_EVENT_COUNT] as u32
    }

    pub fn audio_ptr(&self) -> *const f32 {
        self.audio_out.as_ptr() as *const f32
    }

    pub fn audio_len(&self) -> u32 {
        self.header[HEADER_AUDIO_COUNT] as u32
    }

    pub fn audio_commands(&self) -> &[AudioCommand] {
        &self.audio_out
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn max_audio_commands(&self) -> u32 {
        self.layout.max_audio_commands as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{
        AssetManifest, AudioSink, ColorSpace, Entity, GameEvent, LoadReport, LocalTransform,
        Material, MeshComponent, PointerTarget,
    };

    /// Counts what the runner feeds it.
    #[derive(Default)]
    struct Probe {
        updates: u32,
        ready_calls: u32,
        pointer_events: u32,
        custom_events: u32,
        last_report: Option<LoadReport>,
        textures: usize,
        ready_plays: usize,
    }

    impl Game for Probe {
        fn manifest(&self) -> AssetManifest {
            let mut m = AssetManifest::new();
            for i in 0..self.textures {
                m.add_texture(&format!("t{i}"), &format!("textures/t{i}.jpg"), ColorSpace::Srgb);
            }
            m
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.spawn(
                Entity::new(id).with_mesh(MeshComponent::sphere(1.0, 16, Material::basic())),
                LocalTransform::new(),
                None,
            );
        }

        fn on_assets_ready(&mut self, ctx: &mut EngineContext, report: &LoadReport) {
            self.ready_calls += 1;
            self.last_report = Some(report.clone());
            for _ in 0..self.ready_plays {
                ctx.audio.play();
            }
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, _dt: f32) {
            self.updates += 1;
            for event in input.iter() {
                match event {
                    InputEvent::Custom { .. } => self.custom_events += 1,
                    _ => self.pointer_events += 1,
                }
            }
            ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        }
    }

    fn runner(textures: usize) -> GameRunner<Probe> {
        let mut r = GameRunner::new(Probe { textures, ready_plays: 1, ..Probe::default() });
        r.init();
        r
    }

    #[test]
    fn ticks_wait_for_the_barrier() {
        let mut r = runner(2);
        r.tick(0.016);
        assert_eq!(r.game().updates, 0);
        assert_eq!(r.status_text(), "Loading 0 of 2");

        r.asset_loaded(0);
        r.asset_failed(1, "404");
        assert!(r.is_ready());
        assert_eq!(r.game().ready_calls, 1);
        let report = r.game().last_report.as_ref().unwrap();
        assert_eq!(report.failed.len(), 1);

        r.tick(0.016);
        assert_eq!(r.game().updates, 1);
        assert_eq!(r.instance_count(), 1);
        assert_eq!(r.game_events_len(), 1);
    }

    #[test]
    fn empty_manifest_is_ready_after_init() {
        let mut r = runner(0);
        assert!(r.is_ready());
        r.tick(0.016);
        assert_eq!(r.game().updates, 1);
        assert_eq!(r.status_text(), "");
    }

    #[test]
    fn pointer_input_is_dropped_while_loading() {
        let mut r = runner(1);
        r.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0, target: PointerTarget::Scene });
        r.push_input(InputEvent::Custom { kind: 1, a: 2.0, b: 0.0, c: 0.0 });
        r.asset_loaded(0);
        r.tick(0.016);
        assert_eq!(r.game().pointer_events, 0);
        assert_eq!(r.game().custom_events, 1);
    }

    #[test]
    fn audio_from_ready_hook_reaches_first_tick() {
        let mut r = runner(1);
        r.asset_loaded(0);
        assert_eq!(r.audio_len(), 0);
        r.tick(0.016);
        assert_eq!(r.audio_len(), 1);
        r.tick(0.016);
        assert_eq!(r.audio_len(), 0);
    }

    #[test]
    fn audio_overflow_carries_to_next_tick() {
        let mut r = GameRunner::new(Probe { textures: 0, ready_plays: 20, ..Probe::default() });
        r.init();
        assert_eq!(r.max_audio_commands(), 16);
        r.tick(0.016);
        assert_eq!(r.audio_len(), 16);
        assert_eq!(r.audio_commands().len(), 16);
        r.tick(0.016);
        assert_eq!(r.audio_len(), 4);
        r.tick(0.016);
        assert_eq!(r.audio_len(), 0);
    }

    #[test]
    fn manifest_json_lists_textures() {
        let r = runner(2);
        assert!(r.manifest_json().contains("textures/t1.jpg"));
    }
}
