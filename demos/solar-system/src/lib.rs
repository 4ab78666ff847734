use wasm_bindgen::prelude::*;

pub mod bodies;
pub mod config;
pub mod controls;
pub mod focus;
pub mod game;
pub mod orbit;
use game::Orrery;

orrery_web::export_game!(Orrery, "solar-system-3d");
