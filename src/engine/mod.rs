// Engine modules: physics and fixed-step timing

pub mod game_loop;
pub mod physics;
