//! Mesh description and draw commands

use super::attribute::AttributeView;
use super::math::{Mat4, Vec3};
use super::types::{Color, CullMode};

/// Error type for mesh validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Unindexed vertex count is not a multiple of three
    PartialTriangle { count: usize },
    /// Index array is shorter than `count`
    MissingIndices { count: usize, available: usize },
    /// An index points past the vertex attributes
    IndexOutOfRange { position: usize, index: u32, vertices: usize },
    /// Positions and colors disagree on vertex count
    AttributeLengthMismatch { positions: usize, colors: usize },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::PartialTriangle { count } => {
                write!(f, "vertex count {} is not a multiple of 3", count)
            }
            MeshError::MissingIndices { count, available } => {
                write!(f, "mesh needs {} indices but only {} are provided", count, available)
            }
            MeshError::IndexOutOfRange { position, index, vertices } => {
                write!(f, "index {} at position {} exceeds vertex count {}", index, position, vertices)
            }
            MeshError::AttributeLengthMismatch { positions, colors } => {
                write!(f, "{} positions but {} colors", positions, colors)
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// Vertex attributes plus optional index buffer. Nothing is owned.
#[derive(Debug, Clone, Copy)]
pub struct Mesh<'a> {
    pub positions: AttributeView<'a, Vec3>,
    pub colors: AttributeView<'a, Color>,
    pub indices: Option<&'a [u32]>,
    /// Number of vertices (or indices, when indexed) to consume
    pub count: usize,
}

impl<'a> Mesh<'a> {
    /// Unindexed mesh: every three vertices form one triangle
    pub fn new(positions: AttributeView<'a, Vec3>, colors: AttributeView<'a, Color>) -> Self {
        let count = positions.len();
        Self { positions, colors, indices: None, count }
    }

    pub fn indexed(
        positions: AttributeView<'a, Vec3>,
        colors: AttributeView<'a, Color>,
        indices: &'a [u32],
    ) -> Self {
        Self { positions, colors, indices: Some(indices), count: indices.len() }
    }

    pub fn triangle_count(&self) -> usize {
        self.count / 3
    }

    /// Check the mesh against its invariants. The rasterizer trusts its input,
    /// so callers building meshes from untrusted data should run this first.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertices = self.positions.len();
        if self.colors.len() != vertices {
            return Err(MeshError::AttributeLengthMismatch {
                positions: vertices,
                colors: self.colors.len(),
            });
        }

        match self.indices {
            None => {
                if self.count % 3 != 0 {
                    return Err(MeshError::PartialTriangle { count: self.count });
                }
                if self.count > vertices {
                    return Err(MeshError::IndexOutOfRange {
                        position: vertices,
                        index: vertices as u32,
                        vertices,
                    });
                }
            }
            Some(indices) => {
                if indices.len() < self.count {
                    return Err(MeshError::MissingIndices {
                        count: self.count,
                        available: indices.len(),
                    });
                }
                if let Some((position, &index)) = indices[..self.count]
                    .iter()
                    .enumerate()
                    .find(|(_, i)| **i as usize >= vertices)
                {
                    return Err(MeshError::IndexOutOfRange { position, index, vertices });
                }
            }
        }

        Ok(())
    }

    /// Vertex index triples in draw order. A trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.count / 3).map(move |t| {
            let base = t * 3;
            match self.indices {
                Some(indices) => [
                    indices[base] as usize,
                    indices[base + 1] as usize,
                    indices[base + 2] as usize,
                ],
                None => [base, base + 1, base + 2],
            }
        })
    }
}

/// One mesh, one transform, one cull mode
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    pub mesh: Mesh<'a>,
    pub cull_mode: CullMode,
    pub transform: Mat4,
}

impl<'a> DrawCommand<'a> {
    pub fn new(mesh: Mesh<'a>, transform: Mat4) -> Self {
        Self { mesh, cull_mode: CullMode::None, transform }
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }
}
