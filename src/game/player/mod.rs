//! Things that drive the camera: a free-fly rig, a fixed view and a walking player.

pub mod controller;
pub mod free_camera;
pub mod player;

pub use controller::Controller;
pub use free_camera::FreeCamera;
pub use player::Player;
