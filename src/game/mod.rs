//! Game-specific logic and features.

pub mod player;
pub mod state;
pub mod world;

// Re-export commonly used types
pub use world::{app::App, camera::Camera, scene::{Scene, SceneKind}};
