//! Error types for the outline_vision engine.

use thiserror::Error;

/// Errors surfaced at the engine's component boundaries.
///
/// Shape violations fail fast where they are detected; decode problems are
/// reported by the render surface and handled (swallowed) by the pipeline
/// orchestrator, which never propagates them back to the trigger source.
#[derive(Error, Debug)]
pub enum VisionError {
    /// A buffer's length does not match the dimensions it was declared with.
    #[error("buffer of length {actual} does not match {width}x{height} (expected {expected})")]
    InvalidDimensions {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },

    /// The render surface failed to decode the image behind a locator.
    #[error("failed to decode image at '{locator}': {source}")]
    DecodeFailure {
        locator: String,
        #[source]
        source: image::ImageError,
    },
}
