//! # Tessellation Module
//!
//! Turns a set of closed contours into an unindexed triangle mesh.
//!
//! ## Responsibilities
//! - **Fill tessellation**: lyon's fill tessellator with the even-odd rule,
//!   so nested contours become holes without explicit classification.
//! - **Simplification**: optional merging of near-duplicate and
//!   near-collinear contour points before triangulating.
//! - **Normalization**: fit into `[-1, 1]`, flip SVG's y-down axis, apply
//!   the uniform scale factor.
//! - **Randomized refinement**: optional interior-point insertion for an
//!   organic-looking tessellation.
//!
//! Malformed contours are skipped with a warning; an outline with no valid
//! contours yields an empty mesh, never an error.

use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path as FillPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::contour::Contour;
use crate::errors::ShatterError;
use crate::mesh::{triangle_double_area_xy, Mesh};
use crate::types::MeshOptions;

/// Tessellates `contours` into an unindexed mesh in the z = 0 plane.
///
/// The configuration is validated before any geometry work; an invalid
/// configuration produces no partial mesh. Contours the tessellator cannot
/// handle are skipped individually. The returned mesh has 3 private position
/// slots per triangle (see [`Mesh::unindex`]).
#[instrument(level = "debug", skip_all, fields(contours = contours.len()))]
pub fn tessellate(
    contours: &[Contour],
    options: &MeshOptions,
    rng: &mut impl Rng,
) -> Result<Mesh, ShatterError> {
    options.validate()?;

    let contours = simplify_contours(contours, options.simplify);
    if contours.is_empty() {
        return Ok(Mesh::default());
    }

    let buffers = fill_contours(&contours)?;

    let positions = buffers
        .vertices
        .iter()
        .map(|p| Vec3::new(p.x, p.y, 0.0))
        .collect();
    let cells = buffers
        .indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let mut mesh = Mesh::new(positions, cells);

    if options.normalize {
        normalize_positions(&mut mesh.positions);
    }
    for p in &mut mesh.positions {
        *p *= options.scale;
    }
    mesh.enforce_ccw_winding();

    let steiner_points = options.randomization.round() as usize;
    if steiner_points > 0 {
        refine(&mut mesh, steiner_points, rng);
    }
    mesh.drop_degenerate_triangles();

    debug!(
        triangles = mesh.triangle_count(),
        positions = mesh.positions.len(),
        "tessellated outline"
    );
    Ok(mesh.unindex())
}

/// Runs the fill tessellator over all contours at once, falling back to
/// per-contour passes when the combined path fails. A contour that still
/// fails on its own is dropped with a warning.
fn fill_contours(contours: &[Contour]) -> Result<VertexBuffers<Vec2, u32>, ShatterError> {
    match build_path(contours).and_then(|path| fill_path(&path)) {
        Ok(buffers) => Ok(buffers),
        Err(err) => {
            warn!(error = %err, "combined fill pass failed, retrying contours individually");
            let mut merged: VertexBuffers<Vec2, u32> = VertexBuffers::new();
            for (i, contour) in contours.iter().enumerate() {
                let single = std::slice::from_ref(contour);
                match build_path(single).and_then(|path| fill_path(&path)) {
                    Ok(buffers) => merge_buffers(&mut merged, buffers),
                    Err(err) => {
                        let err = ShatterError::MalformedOutline(format!("contour {i}: {err}"));
                        warn!(error = %err, "skipping contour");
                    }
                }
            }
            Ok(merged)
        }
    }
}

/// Appends `part` to `merged`, rebasing its indices past the vertices
/// already present.
fn merge_buffers(merged: &mut VertexBuffers<Vec2, u32>, part: VertexBuffers<Vec2, u32>) {
    let base = merged.vertices.len() as u32;
    merged.vertices.extend(part.vertices);
    merged
        .indices
        .extend(part.indices.iter().map(|&idx| base + idx));
}

/// Builds a fill path from the contours, rejecting non-finite coordinates
/// up front. Lyon's builder asserts on NaN or infinite points, so they must
/// be caught here for the per-contour recovery to stay reachable.
fn build_path(contours: &[Contour]) -> Result<FillPath, ShatterError> {
    let mut builder = FillPath::builder();
    for contour in contours {
        let pts = contour.points();
        if let Some(bad) = pts.iter().find(|p| !p.is_finite()) {
            return Err(ShatterError::MalformedOutline(format!(
                "non-finite point {bad} in contour"
            )));
        }
        builder.begin(point(pts[0].x, pts[0].y));
        for p in &pts[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
    }
    Ok(builder.build())
}

fn fill_path(path: &FillPath) -> Result<VertexBuffers<Vec2, u32>, ShatterError> {
    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    // Contours are already flattened, so the fill tolerance only matters
    // for lyon's internal intersection handling.
    let fill_options = FillOptions::default().with_fill_rule(FillRule::EvenOdd);
    tessellator
        .tessellate_path(
            path,
            &fill_options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                let p = v.position();
                Vec2::new(p.x, p.y)
            }),
        )
        .map_err(|e| ShatterError::Tessellation(e.to_string()))?;
    Ok(buffers)
}

/// Merges points within `tolerance` of their predecessor and prunes points
/// that are near-collinear with their kept neighbors. Contours reduced below
/// 3 points drop out.
fn simplify_contours(contours: &[Contour], tolerance: f32) -> Vec<Contour> {
    if tolerance <= 0.0 {
        return contours.to_vec();
    }
    contours
        .iter()
        .filter_map(|contour| {
            let pts = contour.points();
            let mut kept: Vec<Vec2> = vec![pts[0]];
            for (i, &p) in pts.iter().enumerate().skip(1) {
                let prev = *kept.last().unwrap();
                if p.distance(prev) <= tolerance {
                    continue;
                }
                if let Some(&next) = pts.get(i + 1) {
                    if perpendicular_distance(p, prev, next) <= tolerance {
                        continue;
                    }
                }
                kept.push(p);
            }
            Contour::from_points(kept)
        })
        .collect()
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn perpendicular_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let chord = b - a;
    let len = chord.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    (chord.perp_dot(p - a)).abs() / len
}

/// Centers the positions on the origin, scales the longest axis to span
/// `[-1, 1]`, and flips y so SVG's y-down source space renders y-up.
fn normalize_positions(positions: &mut [Vec3]) {
    let Some(first) = positions.first().copied() else {
        return;
    };
    let mut min = first;
    let mut max = first;
    for p in positions.iter() {
        min = min.min(*p);
        max = max.max(*p);
    }
    let center = (min + max) * 0.5;
    let half_extent = ((max.x - min.x).max(max.y - min.y)) * 0.5;
    if half_extent <= f32::EPSILON {
        return;
    }
    let inv = 1.0 / half_extent;
    for p in positions.iter_mut() {
        let centered = (*p - center) * inv;
        *p = Vec3::new(centered.x, -centered.y, centered.z);
    }
}

/// Inserts `count` interior points, each sampled uniformly inside an
/// area-weighted random triangle, splitting that triangle into 3. Splitting
/// preserves coverage and winding while breaking large triangles up for a
/// more organic explosion.
fn refine(mesh: &mut Mesh, count: usize, rng: &mut impl Rng) {
    let mut areas: Vec<f32> = (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle(i);
            triangle_double_area_xy(a, b, c).abs() * 0.5
        })
        .collect();
    let mut total: f32 = areas.iter().sum();

    for _ in 0..count {
        if total <= f32::EPSILON {
            break;
        }
        let mut target = rng.gen::<f32>() * total;
        let mut pick = areas.len() - 1;
        for (i, &area) in areas.iter().enumerate() {
            if target < area {
                pick = i;
                break;
            }
            target -= area;
        }

        let [a, b, c] = mesh.triangle(pick);
        let (mut u, mut v) = (rng.gen::<f32>(), rng.gen::<f32>());
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        let interior = a + (b - a) * u + (c - a) * v;

        let n = mesh.positions.len() as u32;
        mesh.positions.push(interior);
        let [ia, ib, ic] = mesh.cells[pick];
        mesh.cells[pick] = [ia, ib, n];
        mesh.cells.push([ib, ic, n]);
        mesh.cells.push([ic, ia, n]);

        let split = |x: Vec3, y: Vec3| triangle_double_area_xy(x, y, interior).abs() * 0.5;
        total -= areas[pick];
        areas[pick] = split(a, b);
        areas.push(split(b, c));
        areas.push(split(c, a));
        total += areas[pick] + areas[areas.len() - 2] + areas[areas.len() - 1];
    }
}
