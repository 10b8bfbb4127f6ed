//! Full-reload handling.
//!
//! The host hands over every texture it wants loaded, as raw bytes, in one
//! batch. One malformed texture must never take the rest of the batch down
//! with it; it is logged and skipped. Textures from the previous reload
//! that the new batch no longer contains are unregistered.

use hashbrown::HashSet;

use crate::location::TextureLocation;
use crate::manager::{LazyTextureManager, SharedTexture, TextureRegistry};
use crate::pixel::PixelBuffer;
use crate::reader::{AnimatedTextureReader, ReadFrame};
use crate::sprite::Atlas;

/// One texture as the host hands it over: where it lives, its image bytes,
/// and its metadata document.
pub struct TextureResource {
    pub location: TextureLocation,
    pub texture_bytes: Vec<u8>,
    pub metadata_json: String,
}

/// Applies reload batches to a [`LazyTextureManager`], remembering which
/// locations the previous batch registered so stale ones can be removed.
pub struct TextureReloadListener<B, F> {
    reader: AnimatedTextureReader<B, F>,
    last_locations: HashSet<TextureLocation>,
}

impl<B, F> TextureReloadListener<B, F>
where
    B: PixelBuffer + 'static,
    F: Fn(u32, u32) -> B + Clone + 'static,
{
    pub fn new(reader: AnimatedTextureReader<B, F>) -> Self {
        Self {
            reader,
            last_locations: HashSet::new(),
        }
    }

    /// Reads every resource in the batch, registers the readable ones,
    /// unregisters locations dropped since the previous batch, and finishes
    /// the whole batch so the host sees it at once.
    pub fn reload<A, G, R>(
        &mut self,
        manager: &mut LazyTextureManager<ReadFrame<B>, A, G, R>,
        resources: impl IntoIterator<Item = TextureResource>,
    ) where
        A: Atlas,
        A::Sprite: 'static,
        G: Fn(&TextureLocation) -> A,
        R: TextureRegistry<SharedTexture<ReadFrame<B>>>,
    {
        let mut new_locations = HashSet::new();

        for resource in resources {
            match self
                .reader
                .read(&resource.texture_bytes, &resource.metadata_json)
            {
                Ok(builder) => {
                    manager.register(resource.location.clone(), builder);
                    new_locations.insert(resource.location);
                }
                Err(err) => {
                    log::error!("skipping texture {}: {err}", resource.location);
                }
            }
        }

        for stale in self.last_locations.difference(&new_locations) {
            manager.unregister(stale);
        }
        self.last_locations = new_locations;

        manager.finish_queued();
    }
}
