//! Sphere tessellation shared by every body.
//!
//! All bodies draw the same unit sphere; size and orientation come from
//! their model matrix.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

/// Sectors and stacks of the default sphere.
pub const DEFAULT_SEGMENTS: u32 = 64;

/// Vertex layout uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh of a unit sphere.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Latitude/longitude sphere of radius 1, poles on ±Y.
    ///
    /// The seam column is duplicated so UVs wrap cleanly. Triangles wind
    /// counter-clockwise seen from outside.
    pub fn uv_sphere(sectors: u32, stacks: u32) -> Self {
        let sectors = sectors.max(3);
        let stacks = stacks.max(2);

        let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
        for y in 0..=stacks {
            let v = y as f32 / stacks as f32;
            let phi = PI / 2.0 - PI * v;
            for x in 0..=sectors {
                let u = x as f32 / sectors as f32;
                let theta = TAU * u;
                let p = [phi.cos() * theta.cos(), phi.sin(), -phi.cos() * theta.sin()];
                vertices.push(Vertex {
                    position: p,
                    normal: p,
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
        for y in 0..stacks {
            for x in 0..sectors {
                let first = y * (sectors + 1) + x;
                let second = first + sectors + 1;
                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        Self { vertices, indices }
    }
}

impl Default for SphereMesh {
    fn default() -> Self {
        Self::uv_sphere(DEFAULT_SEGMENTS, DEFAULT_SEGMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts() {
        let mesh = SphereMesh::uv_sphere(64, 64);
        assert_eq!(mesh.vertices.len(), 65 * 65);
        assert_eq!(mesh.indices.len(), 64 * 64 * 6);
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn test_unit_radius_and_poles() {
        let mesh = SphereMesh::uv_sphere(16, 8);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
        }
        assert!(Vec3::from_array(mesh.vertices[0].position).abs_diff_eq(Vec3::Y, 1e-5));
        let last = mesh.vertices.last().unwrap();
        assert!(Vec3::from_array(last.position).abs_diff_eq(-Vec3::Y, 1e-5));
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::uv_sphere(16, 8);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            // Degenerate at the poles
            if normal.length() < 1e-6 {
                continue;
            }
            let centre = (a + b + c) / 3.0;
            assert!(normal.dot(centre) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_segments_are_raised() {
        let mesh = SphereMesh::uv_sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }
}
