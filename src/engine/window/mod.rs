//! Window creation, fullscreen and cursor capture.

pub mod manager;

pub use manager::WindowManager;
