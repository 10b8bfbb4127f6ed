//! Post-load texture finishing.
//!
//! Textures are built on a loader thread before atlases are stitched, so
//! the upload strategy cannot be chosen at build time. The finisher queues
//! prepared builders and, once the host says loading is complete, resolves
//! each location's sprite and attaches the matching upload component.

use crate::frame::UploadableFrame;
use crate::components::{SingleUploadComponent, SpriteUploadComponent};
use crate::location::TextureLocation;
use crate::sprite::{Atlas, SpriteFinder};
use crate::texture::{EventDrivenTexture, PreparedBuilder};

/// Queues prepared texture builders and finishes them in one batch.
pub struct TextureFinisher<I, A, G> {
    sprite_finder: SpriteFinder<A, G>,
    queue: Vec<(TextureLocation, PreparedBuilder<I>)>,
}

impl<I, A, G> TextureFinisher<I, A, G>
where
    I: UploadableFrame + 'static,
    A: Atlas,
    A::Sprite: 'static,
    G: Fn(&TextureLocation) -> A,
{
    pub fn new(sprite_finder: SpriteFinder<A, G>) -> Self {
        Self {
            sprite_finder,
            queue: Vec::new(),
        }
    }

    /// Queues one builder for finishing. Duplicate locations produce
    /// duplicate finished textures; deduplication is the caller's concern.
    pub fn queue(&mut self, location: TextureLocation, builder: PreparedBuilder<I>) {
        self.queue.push((location, builder));
    }

    /// Finishes every queued builder and clears the queue. Locations found
    /// in an atlas get a sprite upload component; the rest upload at the
    /// origin. An empty queue yields an empty batch.
    pub fn finish(&mut self) -> Vec<(TextureLocation, EventDrivenTexture<I>)> {
        let finder = &self.sprite_finder;

        self.queue
            .drain(..)
            .map(|(location, builder)| {
                let builder = match finder.find(&location) {
                    Some(sprite) => builder.add(SpriteUploadComponent::new(sprite)),
                    None => builder.add(SingleUploadComponent),
                };
                (location, builder.build())
            })
            .collect()
    }
}
