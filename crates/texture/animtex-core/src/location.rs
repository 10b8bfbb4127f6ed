//! Texture locations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A slash-separated resource path identifying a texture, e.g.
/// `textures/block/water_flow.png`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TextureLocation(String);

impl TextureLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name atlases index sprites by: the location without the
    /// conventional `textures/` prefix and `.png` extension. Locations
    /// already in sprite form are returned unchanged.
    pub fn sprite_name(&self) -> TextureLocation {
        let path = self.0.strip_prefix("textures/").unwrap_or(&self.0);
        let path = path.strip_suffix(".png").unwrap_or(path);
        TextureLocation(path.to_owned())
    }
}

impl fmt::Display for TextureLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureLocation {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
