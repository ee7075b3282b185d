use thiserror::Error;

/// Errors produced by the mesh build pipeline.
///
/// Only `InvalidConfig` reaches a `build_mesh` caller. The other variants
/// are recovery signals raised per contour inside tessellation, where they
/// are logged and the offending contour is skipped.
#[derive(Error, Debug)]
pub enum ShatterError {
    /// Rejected configuration; no geometry work has been started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A contour the tessellator cannot accept, such as one carrying a
    /// non-finite point.
    #[error("malformed outline: {0}")]
    MalformedOutline(String),
    /// The fill tessellator rejected a path.
    #[error("tessellation failed: {0}")]
    Tessellation(String),
}
