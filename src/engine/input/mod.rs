//! Input handling module
//! This module contains input processing logic for keyboard and mouse events.

pub mod handler;

pub use handler::{Command, InputHandler};
