//! # Attributes Module
//!
//! Derives the per-triangle animation attributes consumed by the explosion
//! shader: a centroid and a pseudo-random direction per triangle, replicated
//! to all 3 of the triangle's vertex slots.
//!
//! The mesh is expected in unindexed form (see [`Mesh::unindex`]); shared
//! vertices cannot hold two different owning-triangle values at once.

use glam::Vec3;
use rand::Rng;

use crate::mesh::Mesh;

/// Per-vertex-slot attribute streams, parallel to `Mesh::positions`.
///
/// Within one triangle the 3 centroid entries are identical, as are the 3
/// direction entries; across triangles the directions are independent draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleAttributes {
    pub centroids: Vec<Vec3>,
    pub directions: Vec<Vec3>,
}

impl TriangleAttributes {
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

/// Computes centroid and explosion-direction attributes for every triangle.
///
/// The caller supplies the generator, so a seeded build reproduces the same
/// directions draw for draw.
pub fn derive_attributes(mesh: &Mesh, rng: &mut impl Rng) -> TriangleAttributes {
    let mut centroids = Vec::with_capacity(mesh.cells.len() * 3);
    let mut directions = Vec::with_capacity(mesh.cells.len() * 3);

    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let centroid = (a + b + c) / 3.0;
        let direction = random_unit_vector(rng);
        for _ in 0..3 {
            centroids.push(centroid);
            directions.push(direction);
        }
    }

    TriangleAttributes {
        centroids,
        directions,
    }
}

/// Uniform random direction on the unit sphere, via rejection sampling in
/// the unit ball.
fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_triangle_mesh() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        )
    }

    #[test]
    fn one_entry_per_vertex_slot() {
        let mesh = two_triangle_mesh();
        let mut rng = StdRng::seed_from_u64(42);
        let attrs = derive_attributes(&mesh, &mut rng);
        assert_eq!(attrs.len(), mesh.positions.len());
        assert_eq!(attrs.directions.len(), mesh.positions.len());
    }

    #[test]
    fn centroid_is_mean_and_constant_within_triangle() {
        let mesh = two_triangle_mesh();
        let mut rng = StdRng::seed_from_u64(42);
        let attrs = derive_attributes(&mesh, &mut rng);

        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(i);
            let expected = (a + b + c) / 3.0;
            for slot in 0..3 {
                let got = attrs.centroids[i * 3 + slot];
                assert!(got.distance(expected) < 1e-6);
            }
        }
    }

    #[test]
    fn direction_is_unit_length_and_constant_within_triangle() {
        let mesh = two_triangle_mesh();
        let mut rng = StdRng::seed_from_u64(42);
        let attrs = derive_attributes(&mesh, &mut rng);

        for i in 0..mesh.triangle_count() {
            let d = attrs.directions[i * 3];
            assert!((d.length() - 1.0).abs() < 1e-5);
            assert_eq!(d, attrs.directions[i * 3 + 1]);
            assert_eq!(d, attrs.directions[i * 3 + 2]);
        }
        // Independent draws per triangle.
        assert_ne!(attrs.directions[0], attrs.directions[3]);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let mesh = two_triangle_mesh();
        let a = derive_attributes(&mesh, &mut StdRng::seed_from_u64(9));
        let b = derive_attributes(&mesh, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
