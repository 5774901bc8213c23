//! Game state management implementation.

use log::info;

use crate::engine::graphics::renderer::RenderMode;
use crate::game::state::hud::{Hud, Status};
use crate::game::world::scene::HudLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Name of the camera view just switched to, large and centered.
    View,
    Notice,
    Failure,
}

/// Short-lived message drawn over the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub remaining: f32,
}

pub struct GameState {
    pub render_mode: RenderMode,
    pub preset_index: usize,
    pub fullscreen: bool,
    /// Whether the user wants the cursor captured while the window has focus.
    pub mouse_locked: bool,
    /// Wireframe mode is drawn as flat fill on this device.
    pub wireframe_fallback: bool,
    banner: Option<Banner>,
    frame_count: u32,
    fps_elapsed: f32,
    last_fps: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            render_mode: RenderMode::Lit,
            preset_index: 0,
            fullscreen: false,
            mouse_locked: false,
            wireframe_fallback: false,
            banner: None,
            frame_count: 0,
            fps_elapsed: 0.0,
            last_fps: 0,
        }
    }

    /// Advances counters by one frame. Returns the new FPS figure once per second.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        if let Some(banner) = &mut self.banner {
            banner.remaining -= dt;
            if banner.remaining <= 0.0 {
                self.banner = None;
            }
        }

        self.frame_count += 1;
        self.fps_elapsed += dt;
        if self.fps_elapsed >= 1.0 {
            self.last_fps = (self.frame_count as f32 / self.fps_elapsed).round() as u32;
            self.frame_count = 0;
            self.fps_elapsed = 0.0;
            Some(self.last_fps)
        } else {
            None
        }
    }

    pub fn get_fps(&self) -> u32 {
        self.last_fps
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        info!("Render Mode: {}", self.render_mode_label());
    }

    /// Name of the current render mode as it actually appears on screen.
    pub fn render_mode_label(&self) -> String {
        match self.render_mode {
            RenderMode::Wireframe if self.wireframe_fallback => "Wireframe (flat fallback)".to_string(),
            mode => mode.label().to_string(),
        }
    }

    /// Moves to the next of `count` presets, wrapping around.
    pub fn next_preset(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        self.preset_index = (self.preset_index + 1) % count;
        Some(self.preset_index)
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    pub fn toggle_mouse_lock(&mut self) -> bool {
        self.mouse_locked = !self.mouse_locked;
        self.mouse_locked
    }

    /// Whether the cursor should be captured once focus becomes `focused`.
    pub fn cursor_grab_for_focus(&self, focused: bool) -> bool {
        focused && self.mouse_locked
    }

    pub fn show(&mut self, kind: BannerKind, text: impl Into<String>, seconds: f32) {
        let text = text.into();
        info!("{}", text);
        self.banner = Some(Banner { kind, text, remaining: seconds });
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Overlay contents for a scene laid out as `layout`.
    pub fn hud<'a>(&'a self, layout: &HudLayout) -> Hud<'a> {
        Hud {
            heading: layout.heading,
            controls: layout.controls,
            status: layout.status.then(|| Status {
                render_mode: self.render_mode_label(),
                fps: self.get_fps(),
            }),
            banner: self.banner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showcase_layout() -> HudLayout {
        HudLayout {
            heading: Some("Castle"),
            controls: Some("ESC: Quit"),
            status: true,
        }
    }

    #[test]
    fn fps_is_published_once_per_second() {
        let mut state = GameState::new();
        let mut published = Vec::new();
        for _ in 0..130 {
            if let Some(fps) = state.tick(1.0 / 60.0) {
                published.push(fps);
            }
        }
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|&fps| (59..=61).contains(&fps)));
        assert!((59..=61).contains(&state.get_fps()));
    }

    #[test]
    fn presets_wrap_around() {
        let mut state = GameState::new();
        let visited: Vec<usize> = (0..6).filter_map(|_| state.next_preset(5)).collect();
        assert_eq!(visited, vec![1, 2, 3, 4, 0, 1]);
        assert_eq!(state.next_preset(0), None);
    }

    #[test]
    fn banner_expires() {
        let mut state = GameState::new();
        state.show(BannerKind::Notice, "Screenshot saved: a.png", 2.0);
        state.tick(1.5);
        assert_eq!(state.banner().map(|b| b.text.as_str()), Some("Screenshot saved: a.png"));
        state.tick(0.6);
        assert!(state.banner().is_none());
        assert!(state.hud(&showcase_layout()).banner.is_none());
    }

    #[test]
    fn toggles_flip() {
        let mut state = GameState::new();
        assert!(state.toggle_fullscreen());
        assert!(!state.toggle_fullscreen());
        assert!(state.toggle_mouse_lock());
    }

    #[test]
    fn wireframe_label_reports_fallback() {
        let mut state = GameState::new();
        state.set_render_mode(RenderMode::Wireframe);
        assert_eq!(state.render_mode_label(), "Wireframe");
        state.wireframe_fallback = true;
        assert_eq!(state.render_mode_label(), "Wireframe (flat fallback)");
        state.set_render_mode(RenderMode::Normals);
        assert_eq!(state.render_mode_label(), "Normals");
    }

    #[test]
    fn hud_carries_mode_fps_and_banner() {
        let mut state = GameState::new();
        state.set_render_mode(RenderMode::Normals);
        for _ in 0..61 {
            state.tick(1.0 / 60.0);
        }
        state.show(BannerKind::View, "Rear View", 1.5);

        let hud = state.hud(&showcase_layout());
        let status = hud.status.as_ref().unwrap();
        assert_eq!(status.mode_line(), "Render Mode: Normals");
        assert_eq!(status.fps_line(), format!("FPS: {}", state.get_fps()));
        assert_eq!(hud.heading, Some("Castle"));
        assert_eq!(hud.banner.map(|b| b.kind), Some(BannerKind::View));
    }

    #[test]
    fn hud_without_status_skips_readouts() {
        let state = GameState::new();
        let hud = state.hud(&HudLayout::default());
        assert!(hud.status.is_none());
        assert!(hud.is_empty());
    }

    #[test]
    fn unlocking_keeps_cursor_free_after_refocus() {
        let mut state = GameState::new();
        state.mouse_locked = true;
        assert!(state.cursor_grab_for_focus(true));
        assert!(!state.cursor_grab_for_focus(false));
        state.toggle_mouse_lock();
        assert!(!state.cursor_grab_for_focus(true));
    }
}
