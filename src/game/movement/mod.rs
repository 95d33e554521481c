// Character movement
//
// This module turns movement intent and per-tick collision data into a
// corrected rigid-body velocity:
// - Contact classification into ground, steep and ignored buckets
// - Ground snapping and steep-contact promotion
// - Slope-relative velocity control and facing
// - Jump budget and jump impulses
// - Gravity-derived up axis

pub mod config;
pub mod contact;
pub mod controller;
pub mod gravity;
pub mod host;
pub mod jump;
pub mod projector;
pub mod snap;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, ControllerConfig, SlopeThresholds};
pub use contact::{ContactKind, ContactSample, SurfaceTag};
pub use controller::{Controller, TickError, TickReport};
pub use gravity::GravityAxis;
pub use host::{CharacterBody, GroundProbe, ProbeHit};
pub use jump::Jump;
pub use projector::{CameraBasis, MoveInput};
pub use state::{Grounding, JumpState, MovementState};
