//! # Mesh Module
//!
//! The triangle-mesh container plus the two storage transforms the attribute
//! pipeline is built on:
//!
//! - `unindex` gives every triangle 3 private vertex slots so per-triangle
//!   data can live in per-vertex attribute streams.
//! - `reindex` merges bit-identical vertex copies back into shared storage.
//!
//! Both are pure; neither changes the set of triangles, only how their
//! vertices are stored.

use std::collections::HashMap;

use glam::Vec3;

use crate::types::DEGENERATE_EPSILON;

/// A triangle mesh in the z = 0 plane (z is carried for the renderer).
///
/// Invariant: every index in `cells` is `< positions.len()`, and all
/// triangles share one winding orientation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub cells: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, cells: Vec<[u32; 3]>) -> Self {
        let mesh = Self { positions, cells };
        debug_assert!(mesh.indices_in_bounds());
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.cells.len()
    }

    /// The 3 corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.cells[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    fn indices_in_bounds(&self) -> bool {
        let n = self.positions.len() as u32;
        self.cells.iter().flatten().all(|&i| i < n)
    }

    /// Expands the mesh so every triangle owns 3 private position slots,
    /// renumbering cells `0,1,2 / 3,4,5 / …`.
    pub fn unindex(&self) -> Mesh {
        let mut positions = Vec::with_capacity(self.cells.len() * 3);
        let mut cells = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let base = positions.len() as u32;
            for &idx in cell {
                positions.push(self.positions[idx as usize]);
            }
            cells.push([base, base + 1, base + 2]);
        }
        Mesh { positions, cells }
    }

    /// Merges bit-identical positions into shared storage and rewrites cells
    /// to reference the merged entries. Unreferenced positions are dropped.
    pub fn reindex(&self) -> Mesh {
        let mut lookup: HashMap<[u32; 3], u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut cells = Vec::with_capacity(self.cells.len());

        for cell in &self.cells {
            let mut merged = [0u32; 3];
            for (slot, &idx) in merged.iter_mut().zip(cell) {
                let p = self.positions[idx as usize];
                *slot = *lookup.entry(position_key(p)).or_insert_with(|| {
                    positions.push(p);
                    (positions.len() - 1) as u32
                });
            }
            cells.push(merged);
        }

        Mesh { positions, cells }
    }

    /// Removes triangles whose corners are collinear within floating-point
    /// tolerance (zero area in the xy plane).
    pub fn drop_degenerate_triangles(&mut self) {
        let positions = &self.positions;
        self.cells.retain(|&[a, b, c]| {
            triangle_double_area_xy(
                positions[a as usize],
                positions[b as usize],
                positions[c as usize],
            )
            .abs()
                > DEGENERATE_EPSILON
        });
    }

    /// Flips triangles as needed so every cell winds counter-clockwise in
    /// the xy plane.
    pub fn enforce_ccw_winding(&mut self) {
        let positions = &self.positions;
        for cell in &mut self.cells {
            let area = triangle_double_area_xy(
                positions[cell[0] as usize],
                positions[cell[1] as usize],
                positions[cell[2] as usize],
            );
            if area < 0.0 {
                cell.swap(1, 2);
            }
        }
    }

    /// Sum of unsigned triangle areas in the xy plane.
    pub fn surface_area_xy(&self) -> f32 {
        (0..self.cells.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                triangle_double_area_xy(a, b, c).abs() * 0.5
            })
            .sum()
    }
}

/// Twice the signed area of a triangle projected onto the xy plane.
pub fn triangle_double_area_xy(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Bit pattern of a position, with negative zero folded into zero so the
/// two representations merge.
fn position_key(p: Vec3) -> [u32; 3] {
    let clean = |v: f32| if v == 0.0 { 0.0f32 } else { v }.to_bits();
    [clean(p.x), clean(p.y), clean(p.z)]
}
