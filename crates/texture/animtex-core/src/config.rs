//! Core configuration for animtex-core.

use serde::{Deserialize, Serialize};

/// Configuration shared by the reader and the textures it produces.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Number of mipmap levels to generate beyond the full-resolution image.
    /// Zero means only level 0 exists.
    pub mipmap_levels: u32,

    /// Display time, in ticks, for frames whose metadata declares no time.
    pub default_frame_time: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mipmap_levels: 4,
            default_frame_time: 1,
        }
    }
}
