//! Cube mesh submitted once per lattice object

use bytemuck::{Pod, Zeroable};

/// Vertex layout shared with the vertex shader
///
/// Attribute 0 is the position, attribute 1 the texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices (clockwise front faces)
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Unit cube spanning `[0, 1]` on every axis, 8 shared vertices
    ///
    /// The minimum corner sits at the local origin, so a cube drawn at a
    /// lattice position fills the cell `[position, position + 1]`.
    pub fn cube() -> Self {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([0.0, 1.0, 1.0], [0.0, 1.0]),
            Vertex::new([1.0, 1.0, 1.0], [1.0, 1.0]),
            Vertex::new([1.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0]),
            Vertex::new([1.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [1.0, 0.0]),
        ];

        let indices = vec![
            // Front
            0, 1, 2, 0, 2, 3,
            // Top
            3, 7, 4, 3, 4, 0,
            // Right
            3, 2, 6, 3, 6, 7,
            // Back
            7, 6, 5, 7, 5, 4,
            // Bottom
            1, 5, 6, 1, 6, 2,
            // Left
            4, 5, 1, 4, 1, 0,
        ];

        Self { vertices, indices }
    }

    /// Number of indices passed to each draw call
    pub fn index_count(&self) -> u32 {
        u32::try_from(self.indices.len()).unwrap_or(u32::MAX)
    }

    /// Vertex data as raw bytes for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
