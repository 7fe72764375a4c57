//! Indexed triangle geometry.

use glam::{Vec2, Vec3};

use crate::math::Aabb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Texture coordinate with v pointing up
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position, normal, uv }
    }
}

/// Triangle list with counter-clockwise front faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Axis-aligned box centred on the origin, one quad per face with its own
    /// normals and a full [0, 1] UV square
    pub fn box_geometry(width: f32, height: f32, depth: f32) -> Self {
        let mut geometry = Geometry::default();
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

        // (normal, u axis, v axis, half extents along u / v / normal)
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y, hd, hh, hw),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y, hd, hh, hw),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z, hw, hd, hh),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z, hw, hd, hh),
            (Vec3::Z, Vec3::X, Vec3::Y, hw, hh, hd),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y, hw, hh, hd),
        ];

        for (normal, u_axis, v_axis, half_u, half_v, half_n) in faces {
            let base = geometry.vertices.len() as u32;
            let center = normal * half_n;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = center + u_axis * (su * half_u) + v_axis * (sv * half_v);
                let uv = Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5);
                geometry.vertices.push(Vertex::new(position, normal, uv));
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        geometry
    }

    /// Build from positions, computing smooth normals from face normals
    pub fn from_positions(positions: &[Vec3], indices: Vec<u32>) -> Self {
        let mut normals = vec![Vec3::ZERO; positions.len()];
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= positions.len() || b >= positions.len() || c >= positions.len() {
                continue;
            }
            let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        let vertices = positions
            .iter()
            .zip(normals)
            .map(|(&p, n)| Vertex::new(p, n.normalize_or_zero(), Vec2::ZERO))
            .collect();

        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as vertex triples; out-of-range indices are skipped
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.vertices.get(tri[0] as usize)?,
                *self.vertices.get(tri[1] as usize)?,
                *self.vertices.get(tri[2] as usize)?,
            ])
        })
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }
}
