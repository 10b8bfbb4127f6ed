//! The host registry boundary and the lazy manager in front of it.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::finisher::TextureFinisher;
use crate::frame::UploadableFrame;
use crate::location::TextureLocation;
use crate::sprite::Atlas;
use crate::texture::{EventDrivenTexture, PreparedBuilder, TextureEvent};

/// The two operations the core needs from the host's texture registry.
pub trait TextureRegistry<T> {
    fn register(&mut self, location: TextureLocation, texture: T);
    fn unregister(&mut self, location: &TextureLocation);
}

/// A shared registry handle forwards to the registry it wraps, so a caller
/// can hand a manager its registry and keep inspecting it.
impl<T, R: TextureRegistry<T>> TextureRegistry<T> for Rc<RefCell<R>> {
    fn register(&mut self, location: TextureLocation, texture: T) {
        self.borrow_mut().register(location, texture);
    }

    fn unregister(&mut self, location: &TextureLocation) {
        self.borrow_mut().unregister(location);
    }
}

/// Shared handle to a finished texture; the registry and the ticking
/// manager both hold one.
pub type SharedTexture<I> = Rc<RefCell<EventDrivenTexture<I>>>;

/// Registers finished textures with a delegate registry lazily, so a whole
/// reload batch becomes visible to the host at once, and ticks every
/// animated texture it has registered.
pub struct LazyTextureManager<I, A, G, R> {
    delegate: R,
    finisher: TextureFinisher<I, A, G>,
    /// Finished textures with at least one tick listener. Static textures
    /// go only to the delegate.
    tickable: HashMap<TextureLocation, SharedTexture<I>>,
}

impl<I, A, G, R> LazyTextureManager<I, A, G, R>
where
    I: UploadableFrame + 'static,
    A: Atlas,
    A::Sprite: 'static,
    G: Fn(&TextureLocation) -> A,
    R: TextureRegistry<SharedTexture<I>>,
{
    pub fn new(delegate: R, finisher: TextureFinisher<I, A, G>) -> Self {
        Self {
            delegate,
            finisher,
            tickable: HashMap::new(),
        }
    }

    /// Queues an unfinished texture. Any texture the delegate already has
    /// at this location is removed immediately so the host cannot re-add
    /// it while the queue waits for [`Self::finish_queued`].
    pub fn register(&mut self, location: TextureLocation, builder: PreparedBuilder<I>) {
        self.delegate.unregister(&location);
        self.finisher.queue(location, builder);
    }

    /// Finishes every queued texture and hands the whole batch to the
    /// delegate registry.
    pub fn finish_queued(&mut self) {
        for (location, texture) in self.finisher.finish() {
            let texture = Rc::new(RefCell::new(texture));
            self.delegate.register(location.clone(), Rc::clone(&texture));
            if texture.borrow().listens_for(TextureEvent::Tick) {
                self.tickable.insert(location, texture);
            }
        }
    }

    /// Removes a texture from the delegate and stops ticking it.
    pub fn unregister(&mut self, location: &TextureLocation) {
        self.delegate.unregister(location);
        self.tickable.remove(location);
    }

    /// Ticks every animated texture registered through this manager.
    pub fn tick(&mut self) {
        for texture in self.tickable.values() {
            texture.borrow_mut().tick();
        }
    }
}
