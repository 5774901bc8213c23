//! Procedural unit meshes.
//!
//! Every primitive fits the unit box centered at the origin, except the plane,
//! which lies in XZ at y = 0.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::engine::graphics::vertex::Vertex;

pub const SPHERE_SEGMENTS: u16 = 24;
pub const SPHERE_RINGS: u16 = 16;
pub const ROUND_SEGMENTS: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Plane,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Cube,
        Primitive::Sphere,
        Primitive::Cylinder,
        Primitive::Cone,
        Primitive::Plane,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mesh(self) -> MeshData {
        match self {
            Primitive::Cube => cube(),
            Primitive::Sphere => sphere(SPHERE_SEGMENTS, SPHERE_RINGS),
            Primitive::Cylinder => cylinder(ROUND_SEGMENTS),
            Primitive::Cone => cone(ROUND_SEGMENTS),
            Primitive::Plane => plane(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u16 {
        let index = self.vertices.len() as u16;
        self.vertices.push(Vertex::new(position.to_array(), normal.to_array(), uv));
        index
    }

    fn quad(&mut self, a: u16, b: u16, c: u16, d: u16) {
        self.indices.extend_from_slice(&[a, b, c, c, d, a]);
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

pub fn cube() -> MeshData {
    // (normal, u axis, v axis)
    let faces = [
        (Vec3::Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

    let mut mesh = MeshData::default();
    for (normal, u_axis, v_axis) in faces {
        let mut ids = [0u16; 4];
        for (slot, (u, v)) in corners.iter().enumerate() {
            let position = normal * 0.5 + u_axis * *u + v_axis * *v;
            ids[slot] = mesh.push(position, normal, [u + 0.5, 0.5 - v]);
        }
        mesh.quad(ids[0], ids[1], ids[2], ids[3]);
    }
    mesh
}

pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    let a = mesh.push(Vec3::new(-0.5, 0.0, -0.5), Vec3::Y, [0.0, 1.0]);
    let b = mesh.push(Vec3::new(0.5, 0.0, -0.5), Vec3::Y, [1.0, 1.0]);
    let c = mesh.push(Vec3::new(0.5, 0.0, 0.5), Vec3::Y, [1.0, 0.0]);
    let d = mesh.push(Vec3::new(-0.5, 0.0, 0.5), Vec3::Y, [0.0, 0.0]);
    mesh.quad(a, b, c, d);
    mesh
}

pub fn sphere(segments: u16, rings: u16) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let phi = u * TAU;
            let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            mesh.push(normal * 0.5, normal, [u, v]);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            mesh.quad(a, b, b + 1, a + 1);
        }
    }
    mesh
}

pub fn cylinder(segments: u16) -> MeshData {
    let mut mesh = MeshData::default();
    for segment in 0..=segments {
        let u = segment as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = Vec3::new(cos, 0.0, sin);
        let rim = normal * 0.5;
        mesh.push(rim - Vec3::Y * 0.5, normal, [u, 1.0]);
        mesh.push(rim + Vec3::Y * 0.5, normal, [u, 0.0]);
    }
    for segment in 0..segments {
        let bottom = segment * 2;
        mesh.quad(bottom, bottom + 2, bottom + 3, bottom + 1);
    }

    cap(&mut mesh, segments, 0.5, Vec3::Y);
    cap(&mut mesh, segments, -0.5, Vec3::NEG_Y);
    mesh
}

pub fn cone(segments: u16) -> MeshData {
    let mut mesh = MeshData::default();
    let apex = Vec3::Y * 0.5;
    for segment in 0..=segments {
        let u = segment as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        // Slope normal for radius 0.5 over height 1.
        let normal = Vec3::new(cos, 0.5, sin).normalize();
        mesh.push(Vec3::new(cos * 0.5, -0.5, sin * 0.5), normal, [u, 1.0]);
        mesh.push(apex, normal, [u, 0.0]);
    }
    for segment in 0..segments {
        let base = segment * 2;
        mesh.indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    cap(&mut mesh, segments, -0.5, Vec3::NEG_Y);
    mesh
}

fn cap(mesh: &mut MeshData, segments: u16, y: f32, normal: Vec3) {
    let center = mesh.push(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
    for segment in 0..=segments {
        let (sin, cos) = (segment as f32 / segments as f32 * TAU).sin_cos();
        mesh.push(
            Vec3::new(cos * 0.5, y, sin * 0.5),
            normal,
            [0.5 + cos * 0.5, 0.5 + sin * 0.5],
        );
    }
    for segment in 0..segments {
        let rim = center + 1 + segment;
        mesh.indices.extend_from_slice(&[center, rim, rim + 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_index_matches_all_order() {
        for (i, primitive) in Primitive::ALL.iter().enumerate() {
            assert_eq!(primitive.index(), i);
            assert!(!primitive.mesh().indices.is_empty());
        }
    }

    fn all_meshes() -> Vec<(&'static str, MeshData)> {
        vec![
            ("cube", cube()),
            ("plane", plane()),
            ("sphere", sphere(SPHERE_SEGMENTS, SPHERE_RINGS)),
            ("cylinder", cylinder(ROUND_SEGMENTS)),
            ("cone", cone(ROUND_SEGMENTS)),
        ]
    }

    #[test]
    fn cube_has_four_vertices_per_face() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn indices_stay_in_range_and_form_triangles() {
        for (name, mesh) in all_meshes() {
            assert_eq!(mesh.indices.len() % 3, 0, "{name}");
            let count = mesh.vertices.len() as u16;
            assert!(mesh.indices.iter().all(|&i| i < count), "{name}");
        }
    }

    #[test]
    fn meshes_fit_the_unit_box() {
        for (name, mesh) in all_meshes() {
            for vertex in &mesh.vertices {
                for axis in vertex.position {
                    assert!(axis.abs() <= 0.5 + 1e-5, "{name}: {axis}");
                }
                for uv in vertex.tex_coords {
                    assert!((-1e-5..=1.0 + 1e-5).contains(&uv), "{name}: {uv}");
                }
            }
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for (name, mesh) in all_meshes() {
            for vertex in &mesh.vertices {
                let length = Vec3::from_array(vertex.normal).length();
                assert!((length - 1.0).abs() < 1e-4, "{name}: {length}");
            }
        }
    }

    fn face_positions(mesh: &MeshData, face: &[u16]) -> Vec<Vec3> {
        face.iter()
            .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
            .collect()
    }

    #[test]
    fn normals_point_away_from_the_center() {
        for (name, mesh) in all_meshes() {
            if name == "plane" {
                continue;
            }
            for face in mesh.indices.chunks_exact(3) {
                let centroid = face_positions(&mesh, face).into_iter().sum::<Vec3>() / 3.0;
                for &i in face {
                    let normal = Vec3::from_array(mesh.vertices[i as usize].normal);
                    assert!(normal.dot(centroid) > 0.0, "{name}: {normal} on face at {centroid}");
                }
            }
        }
    }

    #[test]
    fn flat_faces_use_vertical_normals() {
        for vertex in plane().vertices {
            assert_eq!(Vec3::from_array(vertex.normal), Vec3::Y);
        }

        let segments = ROUND_SEGMENTS as usize;
        for (name, mesh, expected_faces) in [
            ("cylinder", cylinder(ROUND_SEGMENTS), 2 * segments),
            ("cone", cone(ROUND_SEGMENTS), segments),
        ] {
            let mut flat_faces = 0;
            for face in mesh.indices.chunks_exact(3) {
                let positions = face_positions(&mesh, face);
                if positions.iter().any(|p| p.y != positions[0].y) {
                    continue;
                }
                flat_faces += 1;
                let expected = Vec3::Y * positions[0].y.signum();
                for &i in face {
                    assert_eq!(Vec3::from_array(mesh.vertices[i as usize].normal), expected, "{name}");
                }
            }
            assert_eq!(flat_faces, expected_faces, "{name}");
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        for vertex in sphere(8, 6).vertices {
            let radius = Vec3::from_array(vertex.position).length();
            assert!((radius - 0.5).abs() < 1e-5);
        }
    }
}
