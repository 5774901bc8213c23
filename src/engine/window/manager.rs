//! Window management implementation.

use std::sync::Arc;

use log::{debug, warn};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Fullscreen, Window};

use crate::error::Error;

#[derive(Default)]
pub struct WindowManager {
    window: Option<Arc<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_window(&mut self, event_loop: &ActiveEventLoop, title: &str) -> Result<Arc<Window>, Error> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(event_loop.create_window(attributes)?);

        self.window = Some(window.clone());
        Ok(window)
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Physical pixels per logical point; 1.0 before the window exists.
    pub fn scale_factor(&self) -> f32 {
        self.window.as_ref().map_or(1.0, |window| window.scale_factor() as f32)
    }

    pub fn set_fullscreen(&self, fullscreen: bool) {
        if let Some(window) = &self.window {
            if fullscreen {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                debug!("Entered fullscreen mode");
            } else {
                window.set_fullscreen(None);
                debug!("Exited fullscreen mode");
            }
        }
    }

    /// Locks and hides the cursor, or frees and shows it.
    pub fn set_cursor_locked(&self, locked: bool) {
        let Some(window) = &self.window else {
            return;
        };
        if locked {
            // Not every platform supports Locked; Confined keeps it in the window at least.
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("Failed to grab cursor: {:?}", e);
            }
            window.set_cursor_visible(false);
            debug!("Cursor locked and hidden");
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Failed to release cursor: {:?}", e);
            }
            window.set_cursor_visible(true);
            debug!("Cursor unlocked and visible");
        }
    }
}
