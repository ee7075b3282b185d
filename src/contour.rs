//! # Contour Module
//!
//! Walks a typed path-segment sequence and produces closed polygonal
//! contours, flattening curves at a configurable tolerance.
//!
//! ## Responsibilities
//! - **Flattening**: Bézier segments become polylines via `kurbo::flatten`.
//! - **Sub-path splitting**: every `MoveTo` seals the contour in progress.
//! - **Hygiene**: consecutive duplicate points are merged; contours with
//!   fewer than 3 points are dropped silently.

use glam::Vec2;
use kurbo::{flatten, PathEl};

use crate::types::MERGE_EPSILON;

/// A closed polygon produced by flattening one sub-path of an outline.
///
/// The last point implicitly connects back to the first; the closing point is
/// never stored twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Vec2>,
}

impl Contour {
    /// Builds a contour directly from points, applying the same duplicate
    /// merging as the extractor. Returns `None` for fewer than 3 distinct
    /// points.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut builder = ContourBuilder::new();
        for p in points {
            builder.push(p);
        }
        builder.seal()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area via the shoelace formula. Positive for counter-clockwise
    /// winding in a y-up coordinate system.
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }
}

/// Accumulates points for one contour, merging consecutive duplicates.
struct ContourBuilder {
    points: Vec<Vec2>,
}

impl ContourBuilder {
    fn new() -> Self {
        Self { points: Vec::new() }
    }

    fn push(&mut self, p: Vec2) {
        if let Some(last) = self.points.last() {
            if last.distance_squared(p) <= MERGE_EPSILON * MERGE_EPSILON {
                return;
            }
        }
        self.points.push(p);
    }

    /// Finishes the contour, dropping a closing point that coincides with
    /// the start. Yields `None` when fewer than 3 points survive.
    fn seal(mut self) -> Option<Contour> {
        if self.points.len() >= 2 {
            let first = self.points[0];
            let last = *self.points.last().unwrap();
            if first.distance_squared(last) <= MERGE_EPSILON * MERGE_EPSILON {
                self.points.pop();
            }
        }
        if self.points.len() < 3 {
            return None;
        }
        Some(Contour {
            points: self.points,
        })
    }

    fn is_started(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Extracts closed contours from a path-segment sequence.
///
/// Curves are flattened so that no segment deviates from the true curve by
/// more than `tolerance` source units. An empty input yields an empty list;
/// sub-paths that collapse below 3 points are dropped without error.
pub fn extract_contours(segments: &[PathEl], tolerance: f64) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut current = ContourBuilder::new();
    let mut subpath_start = Vec2::ZERO;

    flatten(segments.iter().copied(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            let prev = std::mem::replace(&mut current, ContourBuilder::new());
            contours.extend(prev.seal());
            subpath_start = Vec2::new(p.x as f32, p.y as f32);
            current.push(subpath_start);
        }
        PathEl::LineTo(p) => {
            // A segment arriving before any MoveTo starts a contour at the
            // sub-path origin, matching kurbo's current-point semantics.
            if !current.is_started() {
                current.push(subpath_start);
            }
            current.push(Vec2::new(p.x as f32, p.y as f32));
        }
        PathEl::ClosePath => {
            let prev = std::mem::replace(&mut current, ContourBuilder::new());
            contours.extend(prev.seal());
        }
        // flatten() only emits MoveTo / LineTo / ClosePath.
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });

    contours.extend(current.seal());
    contours
}
