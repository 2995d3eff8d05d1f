use serde::{Deserialize, Serialize};

use super::core::Vec3;

/// Ways a triangle mesh can be unusable for containment queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("mesh indices are not a triangle list (len {len} is not a multiple of 3)")]
    NotTriangleList { len: usize },
    #[error("mesh has no triangles")]
    NoTriangles,
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("vertex {index} has non-finite coordinates")]
    NonFiniteVertex { index: usize },
}

/// Indexed triangle list in model space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex `i` as a vector. Panics if `i` is out of range.
    #[must_use]
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.positions[i])
    }

    /// Index triples, one per face. A trailing partial triple is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if vertex_count < 3 {
            return Err(MeshError::TooFewVertices {
                count: vertex_count,
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangleList {
                len: self.indices.len(),
            });
        }
        if self.indices.is_empty() {
            return Err(MeshError::NoTriangles);
        }
        if let Some(index) = self
            .positions
            .iter()
            .position(|p| !p.iter().all(|c| c.is_finite()))
        {
            return Err(MeshError::NonFiniteVertex { index });
        }
        for (triangle, tri) in self.indices.chunks_exact(3).enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Axis-aligned box centered on the origin, 8 vertices and 12 triangles
    /// wound counter-clockwise when seen from outside.
    #[must_use]
    pub fn cuboid(half_extents: Vec3) -> Self {
        let Vec3 { x: hx, y: hy, z: hz } = half_extents;
        // Vertex i has +x when bit 0 is set, +y for bit 1, +z for bit 2.
        let positions = (0..8)
            .map(|i| {
                [
                    if i & 1 == 0 { -hx } else { hx },
                    if i & 2 == 0 { -hy } else { hy },
                    if i & 4 == 0 { -hz } else { hz },
                ]
            })
            .collect();
        let indices = vec![
            1, 3, 7, 1, 7, 5, // +X
            0, 4, 6, 0, 6, 2, // -X
            2, 6, 7, 2, 7, 3, // +Y
            0, 1, 5, 0, 5, 4, // -Y
            4, 5, 7, 4, 7, 6, // +Z
            0, 2, 3, 0, 3, 1, // -Z
        ];
        Self::new(positions, indices)
    }

    /// Cube with vertices at ±0.5 on each axis.
    #[must_use]
    pub fn unit_cube() -> Self {
        Self::cuboid(Vec3::new(0.5, 0.5, 0.5))
    }

    /// Regular tetrahedron inscribed in the cube `[-1, 1]³`, centered on the origin.
    #[must_use]
    pub fn tetrahedron() -> Self {
        let positions = vec![
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let indices = vec![1, 3, 2, 0, 2, 3, 0, 3, 1, 0, 1, 2];
        Self::new(positions, indices)
    }

    /// Non-convex L-shaped prism: the footprint `[0,2]² \ (1,2]²` extruded
    /// from `z = 0` to `z = 1`.
    #[must_use]
    pub fn l_prism() -> Self {
        const FOOTPRINT: [[f64; 2]; 6] = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ];
        let n = FOOTPRINT.len() as u32;

        let mut positions = Vec::with_capacity(FOOTPRINT.len() * 2);
        for z in [0.0, 1.0] {
            positions.extend(FOOTPRINT.iter().map(|[x, y]| [*x, *y, z]));
        }

        let mut indices = Vec::new();
        // The footprint is star-shaped around vertex 0, so a fan covers it.
        for i in 1..n - 1 {
            indices.extend_from_slice(&[0, i + 1, i]);
            indices.extend_from_slice(&[n, n + i, n + i + 1]);
        }
        for i in 0..n {
            let j = (i + 1) % n;
            indices.extend_from_slice(&[i, j, n + j]);
            indices.extend_from_slice(&[i, n + j, n + i]);
        }
        Self::new(positions, indices)
    }
}
