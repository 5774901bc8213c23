use glam::{Mat4, Quat, Vec3};

/// Perspective camera. Angles are in degrees; positive pitch looks down,
/// positive yaw turns clockwise seen from above (left-handed, +z forward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            fov: 40.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn orientation(&self) -> Quat {
        orientation(self.pitch, self.yaw, self.roll)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    /// Adds the deltas and clamps pitch to `[-pitch_limit, pitch_limit]`.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32, pitch_limit: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-pitch_limit, pitch_limit);
    }

    /// Turns the camera towards `target`, dropping any roll.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON {
            return;
        }
        let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
        self.yaw = dir.x.atan2(dir.z).to_degrees();
        self.pitch = (-dir.y).atan2(horizontal).to_degrees();
        self.roll = 0.0;
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let eye = self.position;
        let view = Mat4::look_at_lh(eye, eye + self.forward(), self.up());
        let proj = Mat4::perspective_lh(self.fov.to_radians(), aspect, self.near, self.far);
        proj * view
    }
}

/// Rotation for Euler angles in degrees, applied yaw, then pitch, then roll.
pub fn orientation(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_rotation_y(yaw.to_radians())
        * Quat::from_rotation_x(pitch.to_radians())
        * Quat::from_rotation_z(roll.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_camera_looks_down_positive_z() {
        let cam = Camera::new();
        assert!(close(cam.forward(), Vec3::Z));
        assert!(close(cam.right(), Vec3::X));
        assert!(close(cam.up(), Vec3::Y));
    }

    #[test]
    fn positive_yaw_turns_right() {
        let cam = Camera { yaw: 90.0, ..Camera::new() };
        assert!(close(cam.forward(), Vec3::X));
        assert!(close(cam.right(), Vec3::NEG_Z));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let cam = Camera { pitch: 30.0, ..Camera::new() };
        assert!(cam.forward().y < 0.0);
    }

    #[test]
    fn rotate_clamps_pitch() {
        let mut cam = Camera::new();
        cam.rotate(10.0, 200.0, 89.0);
        assert_eq!(cam.pitch, 89.0);
        assert_eq!(cam.yaw, 10.0);
        cam.rotate(0.0, -500.0, 89.0);
        assert_eq!(cam.pitch, -89.0);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = Camera {
            position: Vec3::new(15.0, 15.0, -15.0),
            ..Camera::new()
        };
        cam.look_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - cam.position).normalize();
        assert!(close(cam.forward(), expected));
    }

    #[test]
    fn view_proj_puts_target_in_front() {
        let mut cam = Camera {
            position: Vec3::new(0.0, 0.0, -10.0),
            ..Camera::new()
        };
        cam.look_at(Vec3::ZERO);
        let clip = cam.view_proj(16.0 / 9.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
