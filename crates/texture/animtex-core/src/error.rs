//! Error taxonomy for texture loading and animation configuration.
//!
//! Decode and configuration errors are recoverable per texture: the reload
//! path logs them and continues with the remaining textures in the batch.
//! Wiring mistakes (a component paired with an incompatible image type) are
//! programming errors and panic instead of surfacing here.

use thiserror::Error;

/// Errors produced while reading a texture or validating its animation
/// parameters.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The image bytes could not be decoded.
    #[error("malformed image: {0}")]
    MalformedImage(String),
    /// The metadata document could not be parsed as JSON.
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),
    /// The metadata parsed but holds values outside the allowed ranges.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    /// Animation parameters describe an impossible animation.
    #[error("invalid animation configuration: {0}")]
    Configuration(String),
}
