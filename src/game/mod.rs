// Gameplay systems built on top of the engine

pub mod movement;
