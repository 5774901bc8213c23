use glam::{Mat4, Vec3};

use crate::engine::graphics::renderer::{DrawList, Globals, MAX_POINT_LIGHTS};
use crate::game::world::camera::Camera;
use crate::game::world::castles;
use crate::game::world::props::{Color, Prop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Decorated castle with lighting, a free-fly camera and presets.
    Showcase,
    /// White block castle seen from a fixed camera.
    Blocks,
    /// Block castle with platforms, coins and a jumping player.
    Platformer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub sky: Color,
    pub ambient: Color,
    pub sun_direction: Vec3,
    pub sun_color: Color,
    pub point_lights: Vec<PointLight>,
}

impl Lighting {
    /// Full-strength ambient only, so surfaces show their flat color.
    pub fn unlit(sky: Color) -> Self {
        Self {
            sky,
            ambient: Color::WHITE,
            sun_direction: Vec3::NEG_Y,
            sun_color: Color([0.0, 0.0, 0.0, 1.0]),
            point_lights: Vec::new(),
        }
    }

    pub fn globals(&self, view_proj: Mat4, eye: Vec3) -> Globals {
        let mut point_positions = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_colors = [[0.0; 4]; MAX_POINT_LIGHTS];
        let count = self.point_lights.len().min(MAX_POINT_LIGHTS);
        for (i, light) in self.point_lights.iter().take(count).enumerate() {
            point_positions[i] = light.position.extend(1.0).to_array();
            point_colors[i] = light.color.0;
        }

        Globals {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            sun_direction: self.sun_direction.normalize_or_zero().extend(0.0).to_array(),
            sun_color: self.sun_color.0,
            ambient: self.ambient.0,
            point_positions,
            point_colors,
            params: [0, count as u32, 0, 0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub name: &'static str,
    pub position: Vec3,
    /// Euler degrees: x pitch, y yaw, z roll.
    pub rotation: Vec3,
}

impl CameraPreset {
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.pitch = self.rotation.x;
        camera.yaw = self.rotation.y;
        camera.roll = self.rotation.z;
    }
}

/// What the on-screen overlay shows for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudLayout {
    pub heading: Option<&'static str>,
    pub controls: Option<&'static str>,
    /// Render mode and FPS readouts.
    pub status: bool,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub kind: SceneKind,
    pub title: &'static str,
    pub screenshot_prefix: &'static str,
    pub hud: HudLayout,
    pub props: Vec<Prop>,
    pub lighting: Lighting,
    pub presets: Vec<CameraPreset>,
}

impl Scene {
    pub fn build(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Showcase => castles::showcase(),
            SceneKind::Blocks => castles::blocks(),
            SceneKind::Platformer => castles::platformer(),
        }
    }

    /// Poses every animated prop at `elapsed` seconds.
    pub fn animate(&mut self, elapsed: f32) {
        for prop in &mut self.props {
            prop.animate(elapsed);
        }
    }

    pub fn draw_list(&self) -> DrawList {
        let mut draws = DrawList::new();
        for prop in &self.props {
            draws.push(prop.primitive, prop.instance());
        }
        draws
    }

    pub fn animated_count(&self) -> usize {
        self.props.iter().filter(|p| p.animation.is_some()).count()
    }
}
