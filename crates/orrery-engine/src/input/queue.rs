/// Where a pointer-down landed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The 3D canvas.
    Scene,
    /// A slider, button or any other control overlaying the canvas.
    Control,
}

/// Input event types the engine understands.
/// Generic: no game-specific semantics. Pointer coordinates are normalized
/// device coordinates: x, y in [-1, 1], y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A click/touch began.
    PointerDown { x: f32, y: f32, target: PointerTarget },
    /// A click/touch ended.
    PointerUp { x: f32, y: f32 },
    /// The cursor moved.
    PointerMove { x: f32, y: f32 },
    /// Mouse wheel; positive `delta` scrolls down.
    Wheel { delta: f32 },
    /// A custom event from the page controls.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    pub fn is_pointer(&self) -> bool {
        !matches!(self, InputEvent::Custom { .. })
    }
}

/// A queue of input events.
/// The page pushes events into the queue; the runner drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event.
    /// Pointer-downs on page controls never reach the scene.
    pub fn push(&mut self, event: InputEvent) {
        if let InputEvent::PointerDown { target: PointerTarget::Control, .. } = event {
            log::debug!("pointer-down on a control, not forwarded to the scene");
            return;
        }
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
