use glam::Vec3;

use crate::engine::input::InputHandler;
use crate::game::player::free_camera::FreeCamera;
use crate::game::player::player::Player;
use crate::game::state::{BannerKind, GameState};
use crate::game::world::camera::Camera;
use crate::game::world::props::Prop;
use crate::game::world::scene::{Scene, SceneKind};

/// How long a preset's name stays on screen.
const PRESET_BANNER_SECONDS: f32 = 1.5;

/// Whatever owns the view for a scene.
pub enum Controller {
    Free(FreeCamera),
    Fixed(Camera),
    Player(Player),
}

impl Controller {
    pub fn for_scene(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Showcase => Controller::Free(FreeCamera::default()),
            SceneKind::Blocks => {
                let mut camera = Camera {
                    position: Vec3::new(15.0, 15.0, -15.0),
                    ..Camera::new()
                };
                camera.look_at(Vec3::ZERO);
                Controller::Fixed(camera)
            }
            SceneKind::Platformer => Controller::Player(Player::default()),
        }
    }

    pub fn update(&mut self, input: &mut InputHandler, dt: f32, elapsed: f32) {
        let mouse_velocity = input.take_mouse_velocity();
        match self {
            Controller::Free(free) => free.update(input, mouse_velocity, dt, elapsed),
            Controller::Fixed(_) => {}
            Controller::Player(player) => player.update(input, mouse_velocity, dt),
        }
    }

    /// Space: cycle presets on the free camera, jump on the player.
    pub fn primary(&mut self, scene: &Scene, state: &mut GameState) {
        match self {
            Controller::Free(free) => {
                if let Some(index) = state.next_preset(scene.presets.len()) {
                    let preset = &scene.presets[index];
                    free.apply_preset(preset);
                    state.show(BannerKind::View, preset.name, PRESET_BANNER_SECONDS);
                }
            }
            Controller::Fixed(_) => {}
            Controller::Player(player) => {
                player.jump();
            }
        }
    }

    /// Puts the free camera on the scene's first preset, if there is one.
    pub fn reset_preset(&mut self, scene: &Scene, state: &mut GameState) {
        if let (Controller::Free(free), Some(preset)) = (self, scene.presets.first()) {
            state.preset_index = 0;
            free.apply_preset(preset);
        }
    }

    pub fn camera(&self) -> Camera {
        match self {
            Controller::Free(free) => free.camera,
            Controller::Fixed(camera) => *camera,
            Controller::Player(player) => player.camera(),
        }
    }

    /// Prop standing in for the controlled body, if any.
    pub fn avatar(&self) -> Option<Prop> {
        match self {
            Controller::Player(player) => Some(player.avatar()),
            _ => None,
        }
    }

    /// Whether the cursor starts out captured.
    pub fn locks_cursor_by_default(&self) -> bool {
        matches!(self, Controller::Player(_))
    }
}
