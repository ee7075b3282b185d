//! # Types Module
//!
//! Shared configuration types for the mesh build pipeline.
//!
//! ## Key Types
//! - `MeshOptions`: tessellation configuration (scale, simplify, randomization).

use serde::{Deserialize, Serialize};

use crate::errors::ShatterError;

/// Distance below which two points are considered the same vertex.
pub const MERGE_EPSILON: f32 = 1e-6;

/// Twice-area below which a triangle is considered degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-10;

/// Configuration for turning an outline into a triangle mesh.
///
/// All fields are validated before any geometry work begins; a rejected
/// configuration never produces a partial mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Uniform scale factor applied to output positions. Must be finite and
    /// strictly positive.
    pub scale: f32,
    /// Vertex-merge tolerance (source units) applied to contours before
    /// triangulation. Must lie in `[0, 1]`; `0` disables simplification.
    pub simplify: f32,
    /// Number of random interior points inserted to refine the tessellation
    /// for an organic look. `0` disables the pass.
    pub randomization: f32,
    /// Maximum deviation (source units) when flattening curves to polylines.
    pub tolerance: f64,
    /// Fit the mesh into `[-1, 1]` centered at the origin, flipping the
    /// SVG y-down axis to y-up.
    pub normalize: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            simplify: 0.0,
            randomization: 0.0,
            tolerance: 0.25,
            normalize: true,
        }
    }
}

impl MeshOptions {
    /// Checks every field, returning `InvalidConfig` on the first violation.
    pub fn validate(&self) -> Result<(), ShatterError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        if !self.simplify.is_finite() || !(0.0..=1.0).contains(&self.simplify) {
            return Err(ShatterError::InvalidConfig(format!(
                "simplify must lie in [0, 1], got {}",
                self.simplify
            )));
        }
        if !self.randomization.is_finite() || self.randomization < 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "randomization must be finite and >= 0, got {}",
                self.randomization
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(MeshOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut opts = MeshOptions::default();
        opts.scale = -2.0;
        assert!(opts.validate().is_err());

        let mut opts = MeshOptions::default();
        opts.simplify = 1.5;
        assert!(opts.validate().is_err());

        let mut opts = MeshOptions::default();
        opts.randomization = f32::NAN;
        assert!(opts.validate().is_err());

        let mut opts = MeshOptions::default();
        opts.tolerance = 0.0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn serde_round_trip() {
        let opts = MeshOptions {
            scale: 10.0,
            simplify: 1.0,
            randomization: 1000.0,
            tolerance: 0.1,
            normalize: true,
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: MeshOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(opts, back);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts: MeshOptions = serde_json::from_str(r#"{"scale": 10.0}"#).unwrap();
        assert_eq!(opts.scale, 10.0);
        assert_eq!(opts.simplify, 0.0);
        assert!(opts.normalize);
    }
}
