//! Free-fly camera used by the showcase scene.

use glam::{Vec2, Vec3};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::engine::input::InputHandler;
use crate::game::world::camera::Camera;
use crate::game::world::scene::CameraPreset;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeCameraSettings {
    pub speed: f32,
    pub boost: f32,
    /// Degrees per window height of mouse travel.
    pub rotation_speed: f32,
    pub pitch_limit: f32,
    /// Peak idle yaw drift in degrees per second.
    pub sway: f32,
    pub sway_rate: f32,
    pub fov: f32,
}

impl Default for FreeCameraSettings {
    fn default() -> Self {
        Self {
            speed: 20.0,
            boost: 2.0,
            rotation_speed: 50.0,
            pitch_limit: 89.0,
            sway: 1.2,
            sway_rate: 0.3,
            fov: 75.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreeCamera {
    pub camera: Camera,
    pub settings: FreeCameraSettings,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(FreeCameraSettings::default())
    }
}

impl FreeCamera {
    pub fn new(settings: FreeCameraSettings) -> Self {
        let camera = Camera {
            position: Vec3::new(0.0, 15.0, 40.0),
            pitch: 20.0,
            ..Camera::new().with_fov(settings.fov)
        };
        Self { camera, settings }
    }

    pub fn update(&mut self, input: &InputHandler, mouse_velocity: Vec2, dt: f32, elapsed: f32) {
        use KeyCode::*;

        let direction = Vec3::new(
            input.axis(KeyD, KeyA),
            input.axis(KeyE, KeyQ),
            input.axis(KeyW, KeyS),
        )
        .normalize_or_zero();

        let boost = if input.shift_held() { self.settings.boost } else { 1.0 };
        let step = self.settings.speed * boost * dt;
        let camera = &mut self.camera;
        camera.position += camera.forward() * direction.z * step
            + camera.right() * direction.x * step
            + camera.up() * direction.y * step;

        if input.is_button_held(MouseButton::Right) {
            camera.rotate(
                mouse_velocity.x * self.settings.rotation_speed,
                -mouse_velocity.y * self.settings.rotation_speed,
                self.settings.pitch_limit,
            );
        }

        let moving = [KeyW, KeyA, KeyS, KeyD].iter().any(|&k| input.is_held(k));
        if !moving {
            camera.yaw += (elapsed * self.settings.sway_rate).sin() * self.settings.sway * dt;
        }
    }

    pub fn apply_preset(&mut self, preset: &CameraPreset) {
        preset.apply(&mut self.camera);
    }
}
