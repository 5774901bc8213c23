//! Procedural castle scenes rendered with wgpu.

pub mod engine;
pub mod error;
pub mod game;

// Re-export main types for convenience
pub use error::Error;
pub use game::world::app::{run, App};
pub use game::SceneKind;
