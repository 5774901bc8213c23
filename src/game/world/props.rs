//! Placed primitives and their idle animations.

use glam::{Mat4, Vec3};

use crate::engine::graphics::mesh::Primitive;
use crate::engine::graphics::texture::Material;
use crate::engine::graphics::vertex::InstanceRaw;
use crate::game::world::camera::orientation;

/// Linear RGBA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// sRGB channels, straight alpha.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color([
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        ])
    }

    pub fn alpha(self) -> f32 {
        self.0[3]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler degrees: x pitch, y yaw, z roll.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            orientation(self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }
}

/// Vertical motion layered on top of a prop's resting height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bob {
    /// `amplitude * sin(phase + rate * t)`
    Wave { amplitude: f32, rate: f32, phase: f32 },
    /// `amplitude * (1 - cos(rate * t))`, a slow rise and fall that starts at rest.
    Swell { amplitude: f32, rate: f32 },
}

impl Bob {
    pub fn offset(&self, t: f32) -> f32 {
        match *self {
            Bob::Wave { amplitude, rate, phase } => amplitude * (phase + rate * t).sin(),
            Bob::Swell { amplitude, rate } => amplitude * (1.0 - (rate * t).cos()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub spin_degrees_per_second: f32,
    pub bob: Option<Bob>,
}

impl Animation {
    pub fn spin(degrees_per_second: f32) -> Self {
        Self {
            spin_degrees_per_second: degrees_per_second,
            bob: None,
        }
    }

    pub fn with_bob(mut self, bob: Bob) -> Self {
        self.bob = Some(bob);
        self
    }

    /// Pose of `base` after `t` seconds.
    pub fn apply(&self, base: &Transform, t: f32) -> Transform {
        let mut pose = *base;
        pose.rotation.y = base.rotation.y + self.spin_degrees_per_second * t;
        if let Some(bob) = &self.bob {
            pose.position.y = base.position.y + bob.offset(t);
        }
        pose
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub primitive: Primitive,
    pub transform: Transform,
    pub base: Transform,
    pub color: Color,
    pub material: Material,
    pub animation: Option<Animation>,
}

impl Prop {
    pub fn new(primitive: Primitive, position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        let transform = Transform::new(position.into(), scale.into());
        Self {
            primitive,
            transform,
            base: transform,
            color: Color::WHITE,
            material: Material::WhiteCube,
            animation: None,
        }
    }

    pub fn cube(position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        Self::new(Primitive::Cube, position, scale)
    }

    pub fn sphere(position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        Self::new(Primitive::Sphere, position, scale)
    }

    pub fn cylinder(position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        Self::new(Primitive::Cylinder, position, scale)
    }

    pub fn cone(position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        Self::new(Primitive::Cone, position, scale)
    }

    pub fn plane(position: impl Into<Vec3>, scale: impl Into<Vec3>) -> Self {
        Self::new(Primitive::Plane, position, scale)
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn animated(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Moves the prop to `t` seconds into its animation. Static props stay put.
    pub fn animate(&mut self, t: f32) {
        if let Some(animation) = &self.animation {
            self.transform = animation.apply(&self.base, t);
        }
    }

    pub fn instance(&self) -> InstanceRaw {
        InstanceRaw::new(self.transform.matrix(), self.color.0, self.material.layer())
    }
}
