//! Errors raised while building a scene or setting up a render.
//!
//! Everything here surfaces before the first ray is traced; rendering a
//! successfully built scene cannot fail.

use thiserror::Error;

/// Scene-construction invariant violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Cannot build a bounding volume hierarchy over an empty primitive list")]
    EmptyHierarchy,

    #[error("Primitive {index} has no bounding box and cannot be placed in a hierarchy")]
    MissingBoundingBox { index: usize },
}

/// Render setup failures.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
