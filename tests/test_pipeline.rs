//! End-to-end pipeline tests: outline in, attributed triangle soup out.

use glam::Vec3;
use kurbo::{PathEl, Point};
use shatter_core::{
    build_mesh, Mesh, MeshOptions, RenderSink, ShatterError, ShatterVisual, TimelineConfig,
    TriangleAttributes,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<PathEl> {
    vec![
        PathEl::MoveTo(Point::new(x0, y0)),
        PathEl::LineTo(Point::new(x1, y0)),
        PathEl::LineTo(Point::new(x1, y1)),
        PathEl::LineTo(Point::new(x0, y1)),
        PathEl::ClosePath,
    ]
}

fn raw_options() -> MeshOptions {
    // Keep source coordinates so area assertions stay simple.
    MeshOptions {
        normalize: false,
        ..MeshOptions::default()
    }
}

#[test]
fn square_produces_two_covering_triangles() {
    init_tracing();
    let shatter = build_mesh(&rect(0.0, 0.0, 1.0, 1.0), &raw_options(), 1).unwrap();
    let mesh = &shatter.mesh;

    // N-gon -> N-2 triangles, each with its own 3 vertex slots.
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.positions.len(), 6);
    for (i, cell) in mesh.cells.iter().enumerate() {
        let base = (i * 3) as u32;
        assert_eq!(*cell, [base, base + 1, base + 2]);
    }
    // Union covers the unit square; no sliver triangles.
    assert!((mesh.surface_area_xy() - 1.0).abs() < 1e-4);
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let area = ((b - a).truncate().perp_dot((c - a).truncate())).abs() * 0.5;
        assert!(area > 1e-4);
    }
}

#[test]
fn hole_region_stays_uncovered() {
    init_tracing();
    let mut outline = rect(0.0, 0.0, 4.0, 4.0);
    outline.extend(rect(1.0, 1.0, 3.0, 3.0));

    let shatter = build_mesh(&outline, &raw_options(), 1).unwrap();
    let mesh = &shatter.mesh;
    assert!(!mesh.is_empty());

    // Ring area = 16 - 4.
    assert!((mesh.surface_area_xy() - 12.0).abs() < 1e-3);

    // No triangle centroid inside the open hole region.
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let centroid = (a + b + c) / 3.0;
        let inside_hole = centroid.x > 1.0
            && centroid.x < 3.0
            && centroid.y > 1.0
            && centroid.y < 3.0;
        assert!(!inside_hole, "triangle {i} centroid {centroid} falls in the hole");
    }
}

#[test]
fn attributes_align_with_vertex_slots() {
    let shatter = build_mesh(&rect(0.0, 0.0, 2.0, 1.0), &raw_options(), 5).unwrap();
    let mesh = &shatter.mesh;
    let attrs = &shatter.attributes;

    assert_eq!(attrs.len(), mesh.positions.len());
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let expected = (a + b + c) / 3.0;
        let slots = i * 3..i * 3 + 3;
        for slot in slots.clone() {
            assert!(attrs.centroids[slot].distance(expected) < 1e-6);
            assert_eq!(attrs.directions[slot], attrs.directions[i * 3]);
            assert!((attrs.directions[slot].length() - 1.0).abs() < 1e-5);
        }
    }
}

#[test]
fn reindex_then_unindex_preserves_triangles() {
    let shatter = build_mesh(&rect(0.0, 0.0, 1.0, 1.0), &raw_options(), 1).unwrap();
    let soup = &shatter.mesh;
    let indexed = soup.reindex();

    // The square's 6 slots collapse back to 4 shared vertices.
    assert_eq!(indexed.positions.len(), 4);
    assert_eq!(indexed.triangle_count(), soup.triangle_count());

    let round = indexed.unindex();
    assert_eq!(round.positions.len(), soup.positions.len());
    assert_eq!(round.triangle_count(), soup.triangle_count());
    assert!((round.surface_area_xy() - soup.surface_area_xy()).abs() < 1e-6);
}

#[test]
fn same_seed_reproduces_the_build() {
    let outline = rect(0.0, 0.0, 3.0, 2.0);
    let options = MeshOptions {
        randomization: 25.0,
        ..MeshOptions::default()
    };
    let a = build_mesh(&outline, &options, 99).unwrap();
    let b = build_mesh(&outline, &options, 99).unwrap();
    assert_eq!(a, b);

    let c = build_mesh(&outline, &options, 100).unwrap();
    assert_ne!(a.attributes.directions, c.attributes.directions);
}

#[test]
fn non_finite_subpath_is_recovered_not_fatal() {
    init_tracing();
    // A healthy square plus a sub-path carrying a NaN coordinate: the bad
    // contour is skipped, the square still tessellates.
    let mut outline = rect(0.0, 0.0, 1.0, 1.0);
    outline.extend([
        PathEl::MoveTo(Point::new(5.0, 5.0)),
        PathEl::LineTo(Point::new(f64::NAN, 6.0)),
        PathEl::LineTo(Point::new(6.0, 6.0)),
        PathEl::ClosePath,
    ]);

    let shatter = build_mesh(&outline, &raw_options(), 1).unwrap();
    assert_eq!(shatter.mesh.triangle_count(), 2);
    assert!((shatter.mesh.surface_area_xy() - 1.0).abs() < 1e-4);
    assert_eq!(shatter.attributes.len(), shatter.mesh.positions.len());
}

#[test]
fn empty_outline_is_not_an_error() {
    let shatter = build_mesh(&[], &MeshOptions::default(), 1).unwrap();
    assert!(shatter.is_empty());
    assert!(shatter.attributes.is_empty());
}

#[test]
fn sub_triangle_outline_yields_empty_mesh() {
    let outline = vec![
        PathEl::MoveTo(Point::new(0.0, 0.0)),
        PathEl::LineTo(Point::new(1.0, 1.0)),
        PathEl::ClosePath,
    ];
    let shatter = build_mesh(&outline, &MeshOptions::default(), 1).unwrap();
    assert!(shatter.is_empty());
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let options = MeshOptions {
        simplify: 2.0,
        ..MeshOptions::default()
    };
    assert!(matches!(
        build_mesh(&rect(0.0, 0.0, 1.0, 1.0), &options, 1),
        Err(ShatterError::InvalidConfig(_))
    ));
}

#[derive(Default)]
struct RecordingSink {
    uploads: usize,
    uniforms: Vec<(f32, f32)>,
}

impl RenderSink for RecordingSink {
    fn upload_mesh(&mut self, _mesh: &Mesh, _attributes: &TriangleAttributes) {
        self.uploads += 1;
    }

    fn set_uniforms(&mut self, scale: f32, animate: f32) {
        self.uniforms.push((scale, animate));
    }
}

#[test]
fn visual_uploads_geometry_once_and_streams_uniforms() {
    let mut visual = ShatterVisual::from_outline(
        &rect(0.0, 0.0, 1.0, 1.0),
        &MeshOptions::default(),
        TimelineConfig::default(),
        1,
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    for _ in 0..3 {
        visual.tick(1.0 / 60.0, &mut sink);
    }
    assert_eq!(sink.uploads, 1);
    assert_eq!(sink.uniforms.len(), 3);
    for (scale, animate) in sink.uniforms {
        assert!((0.0..=1.0).contains(&scale));
        assert!((0.0..=1.0).contains(&animate));
    }
}

#[test]
fn empty_visual_never_uploads_a_drawable() {
    let mut visual =
        ShatterVisual::from_outline(&[], &MeshOptions::default(), TimelineConfig::default(), 1)
            .unwrap();
    let mut sink = RecordingSink::default();
    visual.tick(1.0 / 60.0, &mut sink);
    assert_eq!(sink.uploads, 0);
    assert_eq!(sink.uniforms.len(), 1);
}

#[test]
fn simplification_survives_the_full_pipeline() {
    // A square with collinear mid-edge points that simplification removes.
    let outline = vec![
        PathEl::MoveTo(Point::new(0.0, 0.0)),
        PathEl::LineTo(Point::new(0.5, 0.0)),
        PathEl::LineTo(Point::new(1.0, 0.0)),
        PathEl::LineTo(Point::new(1.0, 0.5)),
        PathEl::LineTo(Point::new(1.0, 1.0)),
        PathEl::LineTo(Point::new(0.0, 1.0)),
        PathEl::ClosePath,
    ];
    let options = MeshOptions {
        simplify: 0.01,
        normalize: false,
        ..MeshOptions::default()
    };
    let shatter = build_mesh(&outline, &options, 1).unwrap();
    assert_eq!(shatter.mesh.triangle_count(), 2);
    assert!((shatter.mesh.surface_area_xy() - 1.0).abs() < 1e-4);
}
