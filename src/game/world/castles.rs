//! The three castle layouts.

use glam::Vec3;

use crate::engine::graphics::texture::Material;
use crate::game::world::props::{Animation, Bob, Color, Prop};
use crate::game::world::scene::{CameraPreset, HudLayout, Lighting, PointLight, Scene, SceneKind};

const CASTLE_PINK: (u8, u8, u8) = (255, 192, 203);
const GRASS_GREEN: (u8, u8, u8) = (34, 139, 34);
const SKY_BLUE: (u8, u8, u8) = (135, 206, 250);
const STONE_GRAY: (u8, u8, u8) = (169, 169, 169);
const DOOR_BROWN: (u8, u8, u8) = (101, 67, 33);
const ROOF_RED: (u8, u8, u8) = (200, 50, 50);
const GOLD: (u8, u8, u8) = (255, 215, 0);
const BACKDROP_GRAY: (u8, u8, u8) = (64, 64, 64);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::rgb(r, g, b)
}

const TREE_POSITIONS: [(f32, f32, f32); 12] = [
    (-28.0, 0.0, 22.0), (28.0, 0.0, 22.0),
    (-28.0, 0.0, 0.0), (28.0, 0.0, 0.0),
    (-28.0, 0.0, -8.0), (28.0, 0.0, -8.0),
    (-22.0, 0.0, 28.0), (22.0, 0.0, 28.0),
    (-18.0, 0.0, 18.0), (18.0, 0.0, 18.0),
    (-12.0, 0.0, 25.0), (12.0, 0.0, 25.0),
];

const BUSH_POSITIONS: [(f32, f32, f32); 9] = [
    (-16.0, 0.5, -8.0), (16.0, 0.5, -8.0),
    (-10.0, 0.5, -2.0), (10.0, 0.5, -2.0),
    (-20.0, 0.5, 10.0), (20.0, 0.5, 10.0),
    (0.0, 0.5, 18.0), (-8.0, 0.5, 15.0), (8.0, 0.5, 15.0),
];

const SHOWCASE_COINS: [(f32, f32, f32); 5] = [
    (6.0, 1.5, 12.0), (-6.0, 1.5, 12.0), (0.0, 1.5, 18.0), (10.0, 1.5, 2.0), (-10.0, 1.5, 2.0),
];

pub const SHOWCASE_CONTROLS: &str = "WASD: Move | E/Q: Up/Down | SHIFT: Fast\n\
Right Mouse: Look | 1-3: Render Modes | SPACE: Next View\n\
TAB: Lock Mouse | F11: Fullscreen | F12: Screenshot | ESC: Quit";
pub const PLATFORMER_CONTROLS: &str = "WASD: Move | SPACE: Jump | Mouse: Look around | ESC: Quit";

/// Trunk plus three stacked foliage spheres.
fn tree(base: Vec3, scale_factor: f32) -> Vec<Prop> {
    let s = scale_factor;
    let mut parts = vec![Prop::cube(base + Vec3::new(0.0, 1.5 * s, 0.0), (s, 3.0 * s, s)).color(rgb(DOOR_BROWN))];
    for (i, (height, size)) in [(3.5, 4.5), (4.8, 3.5), (5.8, 2.5)].into_iter().enumerate() {
        parts.push(
            Prop::sphere(
                base + Vec3::new(0.0, height * s, 0.0),
                (size * s, size * 0.8 * s, size * s),
            )
            .color(Color::rgb(0, 128 + i as u8 * 10, 0)),
        );
    }
    parts
}

pub fn showcase() -> Scene {
    let pink = rgb(CASTLE_PINK);
    let stone = rgb(STONE_GRAY);
    let roof = rgb(ROOF_RED);

    let mut props = vec![
        Prop::cube((0.0, 0.0, 0.0), (120.0, 0.1, 120.0)).color(rgb(GRASS_GREEN)),
        // Keep
        Prop::cube((0.0, 5.0, -20.0), (32.0, 10.0, 20.0)).color(pink),
        Prop::cylinder((0.0, 12.0, -20.0), (8.0, 16.0, 8.0)).color(pink),
        Prop::cone((0.0, 21.0, -20.0), (10.0, 8.0, 10.0)).color(roof),
        Prop::sphere((0.0, 25.0, -20.0), (2.0, 2.0, 2.0))
            .color(rgb(GOLD))
            .animated(Animation::spin(30.0).with_bob(Bob::Swell { amplitude: 0.09, rate: 2.0 })),
        Prop::cylinder((-14.0, 10.0, -20.0), (6.0, 13.0, 6.0)).color(pink),
        Prop::cone((-14.0, 17.0, -20.0), (7.0, 6.0, 7.0)).color(roof),
        Prop::cylinder((14.0, 10.0, -20.0), (6.0, 13.0, 6.0)).color(pink),
        Prop::cone((14.0, 17.0, -20.0), (7.0, 6.0, 7.0)).color(roof),
    ];

    // Door hangs off a hinge at its left edge.
    let hinge = Vec3::new(-2.5, 2.5, -10.0);
    props.push(Prop::cube(hinge + Vec3::new(2.5, 0.0, 0.0), (5.0, 5.0, 0.5)).color(rgb(DOOR_BROWN)));

    for (wx, wy) in [(0.0, 8.0), (-10.0, 7.0), (10.0, 7.0), (0.0, 12.0)] {
        props.push(Prop::cube((wx, wy, -9.9), (3.0, 3.0, 0.2)).color(Color::rgba(100, 150, 255, 180)));
    }

    props.extend([
        Prop::cube((-40.0, 2.5, 0.0), (2.0, 5.0, 80.0)).color(stone),
        Prop::cube((40.0, 2.5, 0.0), (2.0, 5.0, 80.0)).color(stone),
        Prop::cube((0.0, 2.5, 38.0), (80.0, 5.0, 2.0)).color(stone),
        Prop::cube((0.0, -0.2, 5.0), (28.0, 0.15, 16.0)).color(Color::rgba(64, 164, 223, 160)),
        Prop::cube((0.0, 0.15, 5.0), (6.0, 0.25, 16.0)).color(stone),
    ]);

    for position in TREE_POSITIONS {
        props.extend(tree(position.into(), 1.0));
    }

    for x in [-10.0, 10.0] {
        props.push(Prop::cylinder((x, 2.5, -5.0), (1.8, 5.0, 1.8)).color(stone));
        props.push(Prop::cube((x, 5.2, -5.0), (2.5, 0.5, 2.5)).color(stone));
    }

    for position in BUSH_POSITIONS {
        props.push(Prop::sphere(position, (2.5, 1.2, 2.5)).color(Color::rgb(0, 100, 0)));
    }

    for (x, y, z) in SHOWCASE_COINS {
        props.push(
            Prop::cylinder((x, y, z), (1.0, 0.15, 1.0))
                .color(rgb(GOLD))
                .animated(Animation::spin(80.0).with_bob(Bob::Wave {
                    amplitude: 0.2,
                    rate: 2.0,
                    phase: x + z,
                })),
        );
    }

    let accent = Color::rgb(255, 200, 150);
    let ambient_strength = 100.0 / 255.0;
    let [ar, ag, ab, _] = Color::rgb(140, 140, 150).0;
    let lighting = Lighting {
        sky: rgb(SKY_BLUE),
        ambient: Color([ar * ambient_strength, ag * ambient_strength, ab * ambient_strength, 1.0]),
        sun_direction: Vec3::new(1.0, -1.5, -1.0),
        sun_color: Color::rgb(255, 250, 240),
        point_lights: vec![
            PointLight { position: Vec3::new(-15.0, 8.0, -15.0), color: accent },
            PointLight { position: Vec3::new(15.0, 8.0, -15.0), color: accent },
        ],
    };

    let presets = vec![
        CameraPreset { name: "Front View", position: Vec3::new(0.0, 15.0, 40.0), rotation: Vec3::new(20.0, 0.0, 0.0) },
        CameraPreset { name: "Rear View", position: Vec3::new(0.0, 25.0, -35.0), rotation: Vec3::new(35.0, 180.0, 0.0) },
        CameraPreset { name: "Side View", position: Vec3::new(45.0, 20.0, 0.0), rotation: Vec3::new(25.0, 270.0, 0.0) },
        CameraPreset { name: "Top View", position: Vec3::new(0.0, 50.0, 0.0), rotation: Vec3::new(89.0, 0.0, 0.0) },
        CameraPreset { name: "Scenic View", position: Vec3::new(-25.0, 12.0, 15.0), rotation: Vec3::new(15.0, 35.0, 0.0) },
    ];

    Scene {
        kind: SceneKind::Showcase,
        title: "Peach's Castle 3D Render - CatOS 64",
        screenshot_prefix: "peach_castle",
        hud: HudLayout {
            heading: Some("PEACH'S CASTLE - 3D RENDER"),
            controls: Some(SHOWCASE_CONTROLS),
            status: true,
        },
        props,
        lighting,
        presets,
    }
}

pub fn blocks() -> Scene {
    let mut props = vec![
        Prop::plane((0.0, -0.5, 0.0), (40.0, 1.0, 40.0)).material(Material::Grass),
        Prop::cube((0.0, 5.0, 0.0), (6.0, 10.0, 6.0)),
        Prop::cube((0.0, 2.0, -8.0), (10.0, 4.0, 4.0)),
    ];
    for position in [(5.0, 3.0, 5.0), (-5.0, 3.0, 5.0), (5.0, 3.0, -5.0), (-5.0, 3.0, -5.0)] {
        props.push(Prop::cube(position, (3.0, 6.0, 3.0)));
    }

    Scene {
        kind: SceneKind::Blocks,
        title: "Castle Blocks",
        screenshot_prefix: "castle_blocks",
        hud: HudLayout::default(),
        props,
        lighting: Lighting::unlit(rgb(BACKDROP_GRAY)),
        presets: Vec::new(),
    }
}

pub fn platformer() -> Scene {
    let gray = Color::rgb(128, 128, 128);
    let orange = Color::rgb(255, 128, 0);

    let mut props = vec![
        Prop::plane((0.0, -0.5, 0.0), (50.0, 1.0, 50.0)).color(Color::rgb(0, 255, 0)),
        Prop::cube((0.0, 5.0, 0.0), (6.0, 10.0, 6.0)).color(gray),
        Prop::cube((0.0, 2.0, -8.0), (10.0, 4.0, 4.0)).color(Color::rgb(191, 191, 191)),
    ];
    for position in [(8.0, 3.0, 8.0), (-8.0, 3.0, 8.0), (8.0, 3.0, -8.0), (-8.0, 3.0, -8.0)] {
        props.push(Prop::cube(position, (3.0, 6.0, 3.0)).color(gray));
    }
    props.extend([
        Prop::cube((5.0, 1.0, 0.0), (2.0, 0.5, 8.0)).color(Color::rgb(0, 0, 255)),
        Prop::cube((-12.0, 3.0, 0.0), (4.0, 0.5, 4.0)).color(orange),
        Prop::cube((12.0, 5.0, 5.0), (4.0, 0.5, 4.0)).color(orange),
    ]);

    for position in [
        (0.0, 8.0, 0.0),
        (5.0, 2.0, 0.0),
        (-12.0, 4.0, 0.0),
        (12.0, 6.0, 5.0),
        (8.0, 4.0, 8.0),
        (-8.0, 4.0, -8.0),
    ] {
        props.push(
            Prop::sphere(position, (0.5, 0.5, 0.5))
                .color(Color::rgb(255, 255, 0))
                .material(Material::Plain)
                .animated(Animation::spin(100.0)),
        );
    }

    Scene {
        kind: SceneKind::Platformer,
        title: "Mario 64 Style Castle",
        screenshot_prefix: "castle_platformer",
        hud: HudLayout {
            controls: Some(PLATFORMER_CONTROLS),
            ..HudLayout::default()
        },
        props,
        lighting: Lighting::unlit(rgb(BACKDROP_GRAY)),
        presets: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graphics::mesh::Primitive;

    #[test]
    fn showcase_layout() {
        let scene = showcase();
        assert_eq!(scene.props.len(), 85);
        assert_eq!(scene.animated_count(), 6);
        assert_eq!(scene.presets.len(), 5);
        assert_eq!(scene.presets[0].name, "Front View");
        assert_eq!(scene.lighting.point_lights.len(), 2);
    }

    #[test]
    fn showcase_has_translucent_moat_and_windows() {
        let scene = showcase();
        let translucent = scene.props.iter().filter(|p| p.color.alpha() < 1.0).count();
        assert_eq!(translucent, 5);
    }

    #[test]
    fn trees_stack_foliage_above_trunk() {
        let parts = tree(Vec3::new(3.0, 0.0, 4.0), 2.0);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].primitive, Primitive::Cube);
        assert_eq!(parts[0].transform.position, Vec3::new(3.0, 3.0, 4.0));
        let heights: Vec<f32> = parts[1..].iter().map(|p| p.transform.position.y).collect();
        assert_eq!(heights, vec![7.0, 9.6, 11.6]);
        assert!(parts[1..].iter().all(|p| p.primitive == Primitive::Sphere));
    }

    #[test]
    fn door_sits_in_front_of_keep() {
        let scene = showcase();
        let door = scene
            .props
            .iter()
            .find(|p| p.transform.scale == Vec3::new(5.0, 5.0, 0.5))
            .unwrap();
        assert_eq!(door.transform.position, Vec3::new(0.0, 2.5, -10.0));
    }

    #[test]
    fn coin_phase_comes_from_position() {
        let scene = showcase();
        let coin = scene
            .props
            .iter()
            .find(|p| p.base.position == Vec3::new(6.0, 1.5, 12.0))
            .unwrap();
        let animation = coin.animation.unwrap();
        assert_eq!(animation.spin_degrees_per_second, 80.0);
        assert_eq!(animation.bob, Some(Bob::Wave { amplitude: 0.2, rate: 2.0, phase: 18.0 }));
    }

    #[test]
    fn blocks_layout_is_static_and_unlit() {
        let scene = blocks();
        assert_eq!(scene.props.len(), 7);
        assert_eq!(scene.animated_count(), 0);
        assert!(scene.lighting.point_lights.is_empty());
        assert_eq!(scene.props[0].material, Material::Grass);
    }

    #[test]
    fn hud_layouts_match_each_demo() {
        let showcase = showcase().hud;
        assert!(showcase.status);
        assert!(showcase.heading.is_some());
        assert_eq!(showcase.controls.map(|c| c.lines().count()), Some(3));

        assert_eq!(blocks().hud, HudLayout::default());

        let platformer = platformer().hud;
        assert!(platformer.heading.is_none() && !platformer.status);
        assert!(platformer.controls.is_some_and(|c| c.contains("SPACE: Jump")));
    }

    #[test]
    fn platformer_layout() {
        let scene = platformer();
        assert_eq!(scene.props.len(), 16);
        assert_eq!(scene.animated_count(), 6);
        assert!(scene.presets.is_empty());
    }
}
