/// Click-to-focus camera state machine.
///
/// `Free`: the orbit controller owns the camera.
/// `Focused(body)`: the camera trails the body on the far side from the sun
/// and keeps looking at the sun. The pose from before the first focus is kept
/// until the camera returns to `Free`, however many bodies were visited.

use glam::Vec3;
use orrery_engine::Camera3D;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Free,
    /// Index into the planet list.
    Focused(usize),
}

/// Camera pose captured on entering focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraSnapshot {
    pub fn of(camera: &Camera3D) -> Self {
        Self {
            position: camera.position,
            target: camera.target,
        }
    }
}

/// What the caller must do to the orbit controller after a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusTransition {
    /// Nothing changed.
    None,
    /// Free → Focused: disable user orbit input.
    Enter { body: usize },
    /// Focused → Focused on another body.
    Switch { from: usize, to: usize },
    /// Focused → Free: snap back to `restore` and re-enable orbit input.
    Exit { restore: CameraSnapshot },
}

/// Follow-camera offsets, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FocusTuning {
    /// Distance behind the body, away from the sun.
    pub back: f32,
    pub height: f32,
    /// Sideways offset so the body is not dead-center against the sun.
    pub lateral: f32,
    /// Fraction of the remaining distance covered per frame.
    pub lerp: f32,
}

impl Default for FocusTuning {
    fn default() -> Self {
        Self {
            back: 4.0,
            height: 1.5,
            lateral: 1.0,
            lerp: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraFocus {
    state: FocusState,
    /// Present exactly while focused.
    snapshot: Option<CameraSnapshot>,
    tuning: FocusTuning,
}

impl CameraFocus {
    pub fn new(tuning: FocusTuning) -> Self {
        Self {
            state: FocusState::Free,
            snapshot: None,
            tuning,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn snapshot(&self) -> Option<CameraSnapshot> {
        self.snapshot
    }

    pub fn tuning(&self) -> &FocusTuning {
        &self.tuning
    }

    /// Feed a scene pointer-down. `hit` is the picked body, if any.
    pub fn on_pointer_down(&mut self, hit: Option<usize>, camera: &Camera3D) -> FocusTransition {
        match (self.state, hit) {
            (FocusState::Free, None) => FocusTransition::None,
            (FocusState::Free, Some(body)) => {
                self.snapshot = Some(CameraSnapshot::of(camera));
                self.state = FocusState::Focused(body);
                log::info!("focus: body {}", body);
                FocusTransition::Enter { body }
            }
            (FocusState::Focused(current), Some(body)) if body != current => {
                self.state = FocusState::Focused(body);
                log::info!("focus: body {} -> {}", current, body);
                FocusTransition::Switch { from: current, to: body }
            }
            (FocusState::Focused(_), _) => self.release(camera),
        }
    }

    fn release(&mut self, camera: &Camera3D) -> FocusTransition {
        self.state = FocusState::Free;
        // Focused always carries a snapshot; fall back to the live pose regardless
        let restore = self.snapshot.take().unwrap_or_else(|| CameraSnapshot::of(camera));
        log::info!("focus: released");
        FocusTransition::Exit { restore }
    }

    /// Where the camera wants to be while trailing a body at `body` with the sun at `sun`.
    pub fn desired_position(&self, body: Vec3, sun: Vec3) -> Vec3 {
        let d = (body - sun).normalize_or_zero();
        let side = d.cross(Vec3::Y).normalize_or_zero();
        body + d * self.tuning.back + Vec3::Y * self.tuning.height + side * self.tuning.lateral
    }

    /// One frame of follow: ease toward the desired position, look straight at the sun.
    pub fn track(&self, camera: &mut Camera3D, body: Vec3, sun: Vec3) {
        camera.follow(self.desired_position(body, sun), self.tuning.lerp);
        camera.look_at(sun);
    }
}

impl Default for CameraFocus {
    fn default() -> Self {
        Self::new(FocusTuning::default())
    }
}
