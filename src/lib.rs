// Physics-driven character movement on rapier3d

pub mod core;
pub mod engine;
pub mod game;
