//! Sprite-atlas lookup.
//!
//! Atlases belong to the host; the core only asks them whether they contain
//! a sprite and, if so, where its sub-rectangle starts. [`SpriteFinder`]
//! layers the naming convention and the missing-sprite placeholder filter
//! on top of that capability.

use crate::location::TextureLocation;
use crate::math::Point;

/// The placeholder sprite hosts substitute for textures they cannot find.
/// A lookup resolving to it is treated as no match at all.
pub const MISSING_SPRITE_NAME: &str = "missingno";

/// One sprite stitched into an atlas.
pub trait Sprite {
    fn name(&self) -> &TextureLocation;

    /// Binds the sprite's atlas for drawing.
    fn bind(&self);

    /// Top-left corner of this sprite's sub-rectangle within its atlas.
    fn upload_point(&self) -> Point;
}

/// A host atlas: given a sprite name, maybe a sprite.
pub trait Atlas {
    type Sprite: Sprite;

    fn sprite(&self, name: &TextureLocation) -> Option<Self::Sprite>;
}

/// Finds the atlas sprite, if any, behind a texture location.
pub struct SpriteFinder<A, G> {
    atlas_getter: G,
    atlas_locations: Vec<TextureLocation>,
    _marker: std::marker::PhantomData<A>,
}

impl<A, G> SpriteFinder<A, G>
where
    A: Atlas,
    G: Fn(&TextureLocation) -> A,
{
    /// Creates a finder that searches the given atlases in order.
    pub fn new(atlas_locations: Vec<TextureLocation>, atlas_getter: G) -> Self {
        Self {
            atlas_getter,
            atlas_locations,
            _marker: std::marker::PhantomData,
        }
    }

    /// Looks `location` up in each known atlas by its sprite name. Returns
    /// `None` when no atlas contains it or the match is the missing-sprite
    /// placeholder.
    pub fn find(&self, location: &TextureLocation) -> Option<A::Sprite> {
        let name = location.sprite_name();

        self.atlas_locations
            .iter()
            .filter_map(|atlas_location| (self.atlas_getter)(atlas_location).sprite(&name))
            .find(|sprite| sprite.name().as_str() != MISSING_SPRITE_NAME)
    }
}
