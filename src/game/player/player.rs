//! Player implementation.

use glam::{Vec2, Vec3};
use log::debug;
use winit::keyboard::KeyCode;

use crate::engine::input::InputHandler;
use crate::game::world::camera::Camera;
use crate::game::world::props::{Color, Prop};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSettings {
    pub speed: f32,
    /// Upward velocity applied by a jump.
    pub jump_height: f32,
    pub gravity: f32,
    pub ground_height: f32,
    /// Degrees per window height of mouse travel.
    pub look_speed: f32,
    pub pitch_limit: f32,
    pub pivot_height: f32,
    pub follow_distance: f32,
    pub fov: f32,
    pub spawn: Vec3,
    pub size: Vec3,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_height: 8.0,
            gravity: 20.0,
            ground_height: 0.5,
            look_speed: 100.0,
            pitch_limit: 90.0,
            pivot_height: 1.5,
            follow_distance: 6.0,
            fov: 90.0,
            spawn: Vec3::new(0.0, 5.0, 0.0),
            size: Vec3::new(1.0, 2.0, 1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub yaw: f32,
    /// Pitch of the camera pivot; the body only turns around y.
    pub pivot_pitch: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    pub settings: PlayerSettings,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerSettings::default())
    }
}

impl Player {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            position: settings.spawn,
            yaw: 0.0,
            pivot_pitch: 0.0,
            velocity_y: 0.0,
            grounded: false,
            settings,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    pub fn update(&mut self, input: &InputHandler, mouse_velocity: Vec2, dt: f32) {
        let mut movement = Vec3::ZERO;
        if input.is_held(KeyCode::KeyW) {
            movement += self.forward();
        }
        if input.is_held(KeyCode::KeyS) {
            movement -= self.forward();
        }
        if input.is_held(KeyCode::KeyA) {
            movement -= self.right();
        }
        if input.is_held(KeyCode::KeyD) {
            movement += self.right();
        }
        self.position += movement.normalize_or_zero() * self.settings.speed * dt;

        self.velocity_y -= self.settings.gravity * dt;
        self.position.y += self.velocity_y * dt;

        if self.position.y <= self.settings.ground_height {
            self.position.y = self.settings.ground_height;
            self.velocity_y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        self.yaw += mouse_velocity.x * self.settings.look_speed;
        let limit = self.settings.pitch_limit;
        self.pivot_pitch = (self.pivot_pitch - mouse_velocity.y * self.settings.look_speed).clamp(-limit, limit);
    }

    /// Starts a jump if standing on the ground. Returns whether it did.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity_y = self.settings.jump_height;
        debug!("Jump from {:?}", self.position);
        true
    }

    pub fn pivot(&self) -> Vec3 {
        self.position + Vec3::Y * self.settings.pivot_height
    }

    /// Camera behind the pivot, looking along the pivot's direction.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new().with_fov(self.settings.fov);
        camera.yaw = self.yaw;
        camera.pitch = self.pivot_pitch;
        camera.position = self.pivot() - camera.forward() * self.settings.follow_distance;
        camera
    }

    pub fn avatar(&self) -> Prop {
        let mut prop = Prop::cube(self.position, self.settings.size).color(Color::rgb(255, 0, 0));
        prop.transform.rotation.y = self.yaw;
        prop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn settle(player: &mut Player, input: &InputHandler) {
        for _ in 0..300 {
            player.update(input, Vec2::ZERO, DT);
        }
    }

    #[test]
    fn falls_to_ground_and_lands() {
        let mut player = Player::default();
        assert!(!player.grounded);
        settle(&mut player, &InputHandler::new());
        assert!(player.grounded);
        assert_eq!(player.position.y, 0.5);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn cannot_jump_midair() {
        let mut player = Player::default();
        player.update(&InputHandler::new(), Vec2::ZERO, DT);
        assert!(!player.grounded);
        assert!(!player.jump());
        assert!(player.velocity_y < 0.0);
    }

    #[test]
    fn jump_rises_then_lands() {
        let mut player = Player::default();
        let input = InputHandler::new();
        settle(&mut player, &input);
        assert!(player.jump());
        assert_eq!(player.velocity_y, 8.0);

        player.update(&input, Vec2::ZERO, DT);
        assert!(player.position.y > 0.5);
        assert!(!player.grounded);

        // Apex of v^2 / 2g = 1.6 above the ground.
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            player.update(&input, Vec2::ZERO, DT);
            peak = peak.max(player.position.y);
        }
        assert!(peak > 1.9 && peak < 2.2, "peak {peak}");
        assert!(player.grounded);
    }

    #[test]
    fn walks_along_yaw() {
        let mut player = Player::default();
        let mut input = InputHandler::new();
        settle(&mut player, &input);
        player.yaw = 90.0;
        input.handle_keyboard_input_event(KeyCode::KeyW, true);
        player.update(&input, Vec2::ZERO, 1.0);
        assert!((player.position.x - 5.0).abs() < 1e-4);
        assert!(player.position.z.abs() < 1e-4);
    }

    #[test]
    fn diagonal_walk_is_normalized() {
        let mut player = Player::default();
        let mut input = InputHandler::new();
        settle(&mut player, &input);
        input.handle_keyboard_input_event(KeyCode::KeyW, true);
        input.handle_keyboard_input_event(KeyCode::KeyA, true);
        player.update(&input, Vec2::ZERO, 1.0);
        let horizontal = Vec2::new(player.position.x, player.position.z);
        assert!((horizontal.length() - 5.0).abs() < 1e-4);
        assert!(player.position.x < 0.0 && player.position.z > 0.0);
    }

    #[test]
    fn mouse_turns_body_and_clamps_pivot() {
        let mut player = Player::default();
        player.update(&InputHandler::new(), Vec2::new(0.1, 2.0), DT);
        assert!((player.yaw - 10.0).abs() < 1e-4);
        assert_eq!(player.pivot_pitch, -90.0);
    }

    #[test]
    fn camera_trails_behind_pivot() {
        let player = Player::default();
        let camera = player.camera();
        assert_eq!(camera.fov, 90.0);
        assert!((camera.position - Vec3::new(0.0, 6.5, -6.0)).length() < 1e-4);
        assert!((camera.forward() - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn avatar_is_a_red_box_at_the_player() {
        let player = Player::default();
        let avatar = player.avatar();
        assert_eq!(avatar.transform.position, player.position);
        assert_eq!(avatar.transform.scale, Vec3::new(1.0, 2.0, 1.0));
    }
}
