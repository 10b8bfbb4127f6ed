//! Animtex Core (host-agnostic)
//!
//! The animated-texture engine: event-driven texture lifecycle, a
//! time-indexed frame manager with optional mipmap-aware RGBA
//! interpolation, and the reload/finishing plumbing that connects loaded
//! textures to a host registry. The host supplies pixel buffers, atlases,
//! and a registry through narrow traits; everything else lives here.

pub mod components;
pub mod config;
pub mod error;
pub mod finisher;
pub mod frame;
pub mod frame_manager;
pub mod frames;
pub mod interp;
pub mod location;
pub mod manager;
pub mod math;
pub mod metadata;
pub mod pixel;
pub mod reader;
pub mod reload;
pub mod sprite;
pub mod texture;

// Re-exports for consumers (host adapters)
pub use components::{AnimationComponent, SingleUploadComponent, SpriteUploadComponent, TimeSource};
pub use config::Config;
pub use error::TextureError;
pub use finisher::TextureFinisher;
pub use frame::{SubRegion, TextureFrame, UploadableFrame};
pub use frame_manager::AnimationFrameManager;
pub use frames::{read_frames, FrameData};
pub use interp::{FrameInterpolator, TextureFrameInterpolator};
pub use location::TextureLocation;
pub use manager::{LazyTextureManager, SharedTexture, TextureRegistry};
pub use math::Point;
pub use metadata::{parse_texture_metadata_json, AnimationMetadata, FrameEntry, TextureMetadata};
pub use pixel::{generate_mipmaps, PixelBuffer, VisibleArea, VisibleAreaBuilder};
pub use reader::{AnimatedTextureReader, ReadFrame};
pub use reload::{TextureReloadListener, TextureResource};
pub use sprite::{Atlas, Sprite, SpriteFinder};
pub use texture::{
    EventDrivenTexture, PreparedBuilder, TextureBuilder, TextureComponent, TextureEvent,
    TextureListener, TextureState,
};
