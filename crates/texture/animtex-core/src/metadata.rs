//! Parsing of the texture metadata document.
//!
//! The document is a JSON object with an optional `animation` section
//! (ordered frame list, default frame time, interpolation flag, explicit
//! frame dimensions) and an optional `texture` section (blur/clamp upload
//! options). Both sections absent is valid: the texture is then a plain
//! single-frame texture.

use serde::Deserialize;

use crate::error::TextureError;

/// Parses a metadata JSON document and validates its value ranges.
///
/// Malformed JSON maps to [`TextureError::MalformedMetadata`]; parseable
/// documents with out-of-range values map to
/// [`TextureError::InvalidMetadata`].
pub fn parse_texture_metadata_json(s: &str) -> Result<TextureMetadata, TextureError> {
    let metadata: TextureMetadata =
        serde_json::from_str(s).map_err(|e| TextureError::MalformedMetadata(e.to_string()))?;
    metadata.validate()?;
    Ok(metadata)
}

/// Top-level metadata document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TextureMetadata {
    #[serde(default)]
    pub animation: Option<AnimationMetadata>,
    #[serde(default)]
    pub texture: Option<TextureOptions>,
}

impl TextureMetadata {
    fn validate(&self) -> Result<(), TextureError> {
        if let Some(animation) = &self.animation {
            animation.validate()?;
        }
        Ok(())
    }
}

/// Upload options for the texture as a whole.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct TextureOptions {
    #[serde(default)]
    pub blur: bool,
    #[serde(default)]
    pub clamp: bool,
}

/// The `animation` metadata section.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnimationMetadata {
    /// Default display time in ticks for frames without their own time.
    #[serde(default)]
    pub frametime: Option<u32>,
    /// Ordered frame indices, possibly with per-frame time overrides.
    /// Empty means "one frame per tile in source order".
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
    #[serde(default)]
    pub interpolate: bool,
    /// Explicit frame width; derived from the source image when absent.
    #[serde(default)]
    pub width: Option<u32>,
    /// Explicit frame height; derived from the source image when absent.
    #[serde(default)]
    pub height: Option<u32>,
}

impl AnimationMetadata {
    fn validate(&self) -> Result<(), TextureError> {
        if self.frametime == Some(0) {
            return Err(TextureError::InvalidMetadata(
                "frametime must be at least 1 tick".into(),
            ));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(TextureError::InvalidMetadata(
                "frame dimensions must be positive".into(),
            ));
        }
        for entry in &self.frames {
            if let FrameEntry::Timed { time: 0, index } = entry {
                return Err(TextureError::InvalidMetadata(format!(
                    "frame {index} declares a zero display time"
                )));
            }
        }
        Ok(())
    }
}

/// One entry of the `frames` list: either a bare index or an index with a
/// time override. Specific shapes first to avoid untagged matching pitfalls.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FrameEntry {
    Timed { index: u32, time: u32 },
    Index(u32),
}

impl FrameEntry {
    pub fn index(&self) -> u32 {
        match *self {
            FrameEntry::Timed { index, .. } => index,
            FrameEntry::Index(index) => index,
        }
    }

    /// The per-frame time override, if declared.
    pub fn time(&self) -> Option<u32> {
        match *self {
            FrameEntry::Timed { time, .. } => Some(time),
            FrameEntry::Index(_) => None,
        }
    }
}
