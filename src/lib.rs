//! # Shatter Core
//!
//! `shatter-core` turns a 2D vector outline into a triangulated 3D mesh
//! whose triangles can be independently animated outward from, and back
//! toward, a shared center (an explode/implode effect).
//!
//! ## Core Features
//!
//! *   **Contour extraction**: typed path segments ([`kurbo::PathEl`]) are
//!     flattened into closed polygons at a configurable tolerance.
//! *   **Tessellation**: contours are filled with the even-odd rule (holes
//!     respected) via lyon, with optional simplification and randomized
//!     refinement.
//! *   **Per-triangle attributes**: every triangle gets a centroid and a
//!     seeded pseudo-random explosion direction, replicated to its 3
//!     private vertex slots.
//! *   **Explode timeline**: a self-restarting two-channel state machine
//!     (`scale`, `animate`) sampled once per rendered frame.
//!
//! ## Usage
//!
//! ```rust
//! use kurbo::{PathEl, Point};
//! use shatter_core::{build_mesh, MeshOptions};
//!
//! let outline = [
//!     PathEl::MoveTo(Point::new(0.0, 0.0)),
//!     PathEl::LineTo(Point::new(10.0, 0.0)),
//!     PathEl::LineTo(Point::new(10.0, 10.0)),
//!     PathEl::LineTo(Point::new(0.0, 10.0)),
//!     PathEl::ClosePath,
//! ];
//! let shatter = build_mesh(&outline, &MeshOptions::default(), 7).unwrap();
//! assert_eq!(shatter.mesh.positions.len(), shatter.attributes.len());
//! ```

/// Contour extraction from path segments.
pub mod contour;

/// Triangle-mesh storage and the unindex/reindex transforms.
pub mod mesh;

/// Contour-set tessellation into an unindexed mesh.
pub mod tessellate;

/// Per-triangle centroid and explosion-direction derivation.
pub mod attributes;

/// The explode/implode timeline and easing curves.
pub mod animation;

/// Configuration types.
pub mod types;

pub mod errors;

pub use animation::{EasingType, ExplodeTimeline, TimelineConfig, TimelinePhase, TimelineSample};
pub use attributes::{derive_attributes, TriangleAttributes};
pub use contour::{extract_contours, Contour};
pub use errors::ShatterError;
pub use mesh::Mesh;
pub use tessellate::tessellate;
pub use types::MeshOptions;

use kurbo::PathEl;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

/// A built mesh plus the attribute streams the explosion shader consumes.
///
/// Produced once per loaded outline; the mesh is unindexed so every triangle
/// owns 3 private vertex slots aligned with the attribute arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShatterMesh {
    pub mesh: Mesh,
    pub attributes: TriangleAttributes,
}

impl ShatterMesh {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Runs the full build pipeline on an outline.
///
/// Contours are extracted and tessellated, the result is reindexed to merge
/// shared vertices and immediately unindexed again so each triangle can hold
/// per-triangle attribute values, and the attribute streams are derived with
/// an RNG seeded from `seed`, so the same seed reproduces the same mesh and
/// directions.
///
/// An outline that produces no triangles yields an empty `ShatterMesh`, not
/// an error; only an invalid configuration is rejected.
#[instrument(level = "debug", skip(segments))]
pub fn build_mesh(
    segments: &[PathEl],
    options: &MeshOptions,
    seed: u64,
) -> Result<ShatterMesh, ShatterError> {
    options.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);

    let contours = extract_contours(segments, options.tolerance);
    let soup = tessellate(&contours, options, &mut rng)?;
    let mesh = soup.reindex().unindex();
    let attributes = derive_attributes(&mesh, &mut rng);

    debug!(
        triangles = mesh.triangle_count(),
        empty = mesh.is_empty(),
        "built shatter mesh"
    );
    Ok(ShatterMesh { mesh, attributes })
}

/// Receiver for mesh data and per-frame uniforms.
///
/// This is the boundary to the actual renderer: `shatter-core` never draws,
/// it only hands over geometry once and uniform values every frame.
pub trait RenderSink {
    /// Called once per visual with the built geometry. Not called at all
    /// when the mesh is empty; "nothing to render" is a valid outcome.
    fn upload_mesh(&mut self, mesh: &Mesh, attributes: &TriangleAttributes);

    /// Called every frame with the current timeline values, both in `[0, 1]`.
    fn set_uniforms(&mut self, scale: f32, animate: f32);
}

/// One animated visual: a built mesh plus the timeline driving it.
///
/// Independent visuals own independent timelines; there is no shared
/// process-wide scheduler.
#[derive(Debug, Clone)]
pub struct ShatterVisual {
    shatter: ShatterMesh,
    timeline: ExplodeTimeline,
    uploaded: bool,
}

impl ShatterVisual {
    pub fn new(shatter: ShatterMesh, config: TimelineConfig) -> Self {
        Self {
            shatter,
            timeline: ExplodeTimeline::new(config),
            uploaded: false,
        }
    }

    /// Builds the mesh from an outline and wraps it with a fresh timeline.
    pub fn from_outline(
        segments: &[PathEl],
        options: &MeshOptions,
        config: TimelineConfig,
        seed: u64,
    ) -> Result<Self, ShatterError> {
        Ok(Self::new(build_mesh(segments, options, seed)?, config))
    }

    pub fn mesh(&self) -> &ShatterMesh {
        &self.shatter
    }

    pub fn timeline(&self) -> &ExplodeTimeline {
        &self.timeline
    }

    /// Advances the timeline by `dt` seconds and pushes state into the sink.
    ///
    /// The geometry is uploaded on the first tick that has something to
    /// draw; an empty mesh only keeps the uniforms flowing.
    pub fn tick(&mut self, dt: f32, sink: &mut impl RenderSink) -> TimelineSample {
        if !self.uploaded && !self.shatter.is_empty() {
            sink.upload_mesh(&self.shatter.mesh, &self.shatter.attributes);
            self.uploaded = true;
        }
        let sample = self.timeline.advance(dt);
        sink.set_uniforms(sample.scale, sample.animate);
        sample
    }
}
