// extensions/mod.rs
//
// Optional extension modules for the orrery engine.
// These are decoupled from core Entity/Scene; games opt-in by creating these systems.

pub mod orbit_controls;
pub mod transform;

pub use orbit_controls::OrbitControls;
pub use transform::{TransformGraph, LocalTransform};
