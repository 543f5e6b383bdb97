//! Grid mesh covering the transitioning view.

use bytemuck::{Pod, Zeroable};

use crate::geometry::Vec2;

/// One grid vertex. `uv` is in 0..1 across the view, top-left origin.
///
/// The vertex shader derives both the texture coordinate and the deformed
/// position from it, so this is the only per-vertex attribute.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub uv: [f32; 2],
}

/// Triangle grid of `columns × rows` cells.
///
/// Vertices are laid out row-major, `(columns + 1) × (rows + 1)` of them.
/// Each cell is two triangles with the winding
/// `i, i+1, i+W+1` / `i+1, i+W+2, i+W+1` where `W = columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    columns: u32,
    rows: u32,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl MeshGeometry {
    /// Tessellates a view of logical `size` into cells of `cell_size` px.
    ///
    /// Cell counts are `⌊size / cell_size⌋`, at least 1 in each direction.
    pub fn for_size(size: Vec2, cell_size: f32) -> Self {
        let cell = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let cells = |len: f32| {
            if len.is_finite() && len > 0.0 {
                ((len / cell).floor() as u32).max(1)
            } else {
                1
            }
        };
        Self::grid(cells(size.x), cells(size.y))
    }

    /// Builds a grid with exactly `columns × rows` cells (each clamped to ≥ 1).
    pub fn grid(columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);

        let stride = columns + 1;
        let mut vertices = Vec::with_capacity((stride * (rows + 1)) as usize);
        for y in 0..=rows {
            for x in 0..=columns {
                vertices.push(MeshVertex {
                    uv: [x as f32 / columns as f32, y as f32 / rows as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
        for y in 0..rows {
            for x in 0..columns {
                let i = y * stride + x;
                indices.extend_from_slice(&[
                    i,
                    i + 1,
                    i + stride,
                    i + 1,
                    i + stride + 1,
                    i + stride,
                ]);
            }
        }

        Self { columns, rows, vertices, indices }
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
