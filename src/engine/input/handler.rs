use std::collections::HashSet;

use glam::Vec2;
use log::debug;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::engine::graphics::renderer::RenderMode;

/// Discrete actions triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Screenshot,
    ToggleFullscreen,
    ToggleMouseLock,
    SetRenderMode(RenderMode),
    /// Space: next camera preset or jump, depending on the controller.
    Primary,
}

impl Command {
    pub fn from_key(keycode: KeyCode) -> Option<Self> {
        use KeyCode::*;
        match keycode {
            Escape => Some(Command::Quit),
            F12 => Some(Command::Screenshot),
            F11 => Some(Command::ToggleFullscreen),
            Tab => Some(Command::ToggleMouseLock),
            Digit1 => Some(Command::SetRenderMode(RenderMode::Lit)),
            Digit2 => Some(Command::SetRenderMode(RenderMode::Wireframe)),
            Digit3 => Some(Command::SetRenderMode(RenderMode::Normals)),
            Space => Some(Command::Primary),
            _ => None,
        }
    }
}

pub struct InputHandler {
    pressed_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    mouse_delta: (f64, f64),
    window_height: f32,
    focused: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            window_height: 1.0,
            focused: true,
        }
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the key state and returns the command for a fresh press, if any.
    pub fn handle_keyboard_input_event(&mut self, keycode: KeyCode, pressed: bool) -> Option<Command> {
        if pressed {
            // Repeats arrive while the key is already held.
            if self.pressed_keys.insert(keycode) {
                let command = Command::from_key(keycode);
                if let Some(command) = command {
                    debug!("Key {:?} -> {:?}", keycode, command);
                }
                return command;
            }
        } else {
            self.pressed_keys.remove(&keycode);
        }
        None
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pressed_buttons.insert(button);
        } else {
            self.pressed_buttons.remove(&button);
        }
    }

    /// Raw device motion; dropped while the window is unfocused.
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.focused {
            return;
        }
        self.mouse_delta.0 += delta.0;
        self.mouse_delta.1 += delta.1;
    }

    /// Losing focus releases everything, since releases would go unseen.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.clear();
        }
    }

    pub fn set_window_height(&mut self, height: u32) {
        self.window_height = height.max(1) as f32;
    }

    pub fn clear(&mut self) {
        self.pressed_keys.clear();
        self.pressed_buttons.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn is_held(&self, keycode: KeyCode) -> bool {
        self.pressed_keys.contains(&keycode)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn shift_held(&self) -> bool {
        self.is_held(KeyCode::ShiftLeft) || self.is_held(KeyCode::ShiftRight)
    }

    /// 1 when only `positive` is held, -1 when only `negative` is, else 0.
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        self.is_held(positive) as i32 as f32 - self.is_held(negative) as i32 as f32
    }

    /// Mouse motion since the last call, in window heights per frame with y up.
    pub fn take_mouse_velocity(&mut self) -> Vec2 {
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        Vec2::new(dx as f32, -dy as f32) / self.window_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_held_keys() {
        let mut input = InputHandler::new();
        input.handle_keyboard_input_event(KeyCode::KeyW, true);
        assert!(input.is_held(KeyCode::KeyW));
        input.handle_keyboard_input_event(KeyCode::KeyW, false);
        assert!(!input.is_held(KeyCode::KeyW));
    }

    #[test]
    fn commands_fire_once_per_press() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_keyboard_input_event(KeyCode::F12, true), Some(Command::Screenshot));
        assert_eq!(input.handle_keyboard_input_event(KeyCode::F12, true), None);
        input.handle_keyboard_input_event(KeyCode::F12, false);
        assert_eq!(input.handle_keyboard_input_event(KeyCode::F12, true), Some(Command::Screenshot));
    }

    #[test]
    fn key_map() {
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Digit2), Some(Command::SetRenderMode(RenderMode::Wireframe)));
        assert_eq!(Command::from_key(KeyCode::Space), Some(Command::Primary));
        assert_eq!(Command::from_key(KeyCode::KeyW), None);
    }

    #[test]
    fn axis_cancels_opposites() {
        let mut input = InputHandler::new();
        input.handle_keyboard_input_event(KeyCode::KeyD, true);
        assert_eq!(input.axis(KeyCode::KeyD, KeyCode::KeyA), 1.0);
        input.handle_keyboard_input_event(KeyCode::KeyA, true);
        assert_eq!(input.axis(KeyCode::KeyD, KeyCode::KeyA), 0.0);
        input.handle_keyboard_input_event(KeyCode::KeyD, false);
        assert_eq!(input.axis(KeyCode::KeyD, KeyCode::KeyA), -1.0);
    }

    #[test]
    fn mouse_velocity_is_normalized_and_consumed() {
        let mut input = InputHandler::new();
        input.set_window_height(200);
        input.handle_mouse_motion((10.0, 20.0));
        input.handle_mouse_motion((10.0, 20.0));
        let v = input.take_mouse_velocity();
        assert!((v.x - 0.1).abs() < 1e-6);
        assert!((v.y + 0.2).abs() < 1e-6);
        assert_eq!(input.take_mouse_velocity(), Vec2::ZERO);
    }

    #[test]
    fn motion_while_unfocused_is_ignored() {
        let mut input = InputHandler::new();
        input.set_window_height(720);
        input.handle_mouse_motion((100.0, 0.0));
        input.set_focused(false);
        input.handle_mouse_motion((360.0, 0.0));
        assert_eq!(input.take_mouse_velocity(), Vec2::ZERO);

        input.set_focused(true);
        input.handle_mouse_motion((360.0, 0.0));
        assert!((input.take_mouse_velocity().x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut input = InputHandler::new();
        input.handle_keyboard_input_event(KeyCode::KeyW, true);
        input.handle_mouse_button(MouseButton::Right, true);
        input.set_focused(false);
        assert!(!input.is_held(KeyCode::KeyW));
        assert!(!input.is_button_held(MouseButton::Right));
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputHandler::new();
        input.handle_keyboard_input_event(KeyCode::ShiftLeft, true);
        input.handle_mouse_button(MouseButton::Right, true);
        assert!(input.shift_held());
        input.clear();
        assert!(!input.shift_held());
        assert!(!input.is_button_held(MouseButton::Right));
    }
}
