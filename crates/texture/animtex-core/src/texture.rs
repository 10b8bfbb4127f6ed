//! The event-driven texture shell.
//!
//! Model:
//! - An [`EventDrivenTexture`] owns one mutable image plus listeners grouped
//!   by [`TextureEvent`]. It has no rendering logic of its own; behavior
//!   comes entirely from the listeners components register.
//! - Listeners fire in the order their components were added to the builder.
//!   An event with no listeners is a no-op.
//! - The state carries a needs-upload flag. It is set when the image is
//!   replaced or borrowed mutably, and cleared only after the upload chain
//!   runs, so `bind` twice in a row uploads at most once.
//!
//! The builder requires the image before it can build: adding components is
//! open-ended, but only [`PreparedBuilder`] (produced by
//! [`TextureBuilder::set_image`]) has a `build` method.

use hashbrown::HashMap;

/// Lifecycle events a texture fires.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TextureEvent {
    /// Fired once when the host first learns about the texture.
    Registration,
    /// Fired every time the host selects the texture for drawing.
    Bind,
    /// Fired after `Bind` when the image changed since the last upload.
    Upload,
    /// Fired once per host tick.
    Tick,
    /// Fired once when the texture is torn down.
    Close,
}

type Action<I> = Box<dyn FnMut(&mut TextureState<I>)>;

/// One callback bound to one event type.
pub struct TextureListener<I> {
    event: TextureEvent,
    action: Action<I>,
}

impl<I> TextureListener<I> {
    pub fn new(
        event: TextureEvent,
        action: impl FnMut(&mut TextureState<I>) + 'static,
    ) -> Self {
        Self {
            event,
            action: Box::new(action),
        }
    }
}

/// A bundle of listeners implementing one texture behavior.
pub trait TextureComponent<I> {
    fn into_listeners(self) -> Vec<TextureListener<I>>;
}

/// The single mutable state handle every listener receives.
pub struct TextureState<I> {
    image: I,
    needs_upload: bool,
}

impl<I> TextureState<I> {
    pub fn image(&self) -> &I {
        &self.image
    }

    /// Borrows the image for mutation, which marks the texture as needing
    /// an upload.
    pub fn image_mut(&mut self) -> &mut I {
        self.needs_upload = true;
        &mut self.image
    }

    /// Swaps in a new image and marks the texture as needing an upload.
    pub fn replace_image(&mut self, image: I) {
        self.image = image;
        self.needs_upload = true;
    }

    pub fn mark_needs_upload(&mut self) {
        self.needs_upload = true;
    }
}

/// A texture whose behavior is the union of its listeners.
pub struct EventDrivenTexture<I> {
    listeners: HashMap<TextureEvent, Vec<Action<I>>>,
    state: TextureState<I>,
    closed: bool,
}

impl<I> EventDrivenTexture<I> {
    pub fn builder() -> TextureBuilder<I> {
        TextureBuilder::new()
    }

    /// Fires the registration chain. The host calls this exactly once.
    pub fn register(&mut self) {
        self.fire(TextureEvent::Registration);
    }

    /// Fires the bind chain, then the upload chain if the image changed
    /// since the last upload.
    pub fn bind(&mut self) {
        self.fire(TextureEvent::Bind);
        if self.state.needs_upload {
            self.fire(TextureEvent::Upload);
            self.state.needs_upload = false;
        }
    }

    /// Fires the tick chain.
    pub fn tick(&mut self) {
        self.fire(TextureEvent::Tick);
    }

    /// Fires the close chain so listeners release owned resources. Closing
    /// is terminal: later calls, and every other event, are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.fire(TextureEvent::Close);
        self.closed = true;
    }

    /// Whether any listener handles `event`.
    pub fn listens_for(&self, event: TextureEvent) -> bool {
        self.listeners.get(&event).is_some_and(|l| !l.is_empty())
    }

    fn fire(&mut self, event: TextureEvent) {
        if self.closed {
            return;
        }
        if let Some(listeners) = self.listeners.get_mut(&event) {
            for listener in listeners {
                listener(&mut self.state);
            }
        }
    }
}

/// Collects components before the initial image is known.
pub struct TextureBuilder<I> {
    listeners: Vec<TextureListener<I>>,
}

impl<I> TextureBuilder<I> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a component's listeners after every previously added listener.
    pub fn add(mut self, component: impl TextureComponent<I>) -> Self {
        self.listeners.extend(component.into_listeners());
        self
    }

    /// Supplies the initial image, making the builder buildable.
    pub fn set_image(self, image: I) -> PreparedBuilder<I> {
        PreparedBuilder {
            listeners: self.listeners,
            image,
        }
    }
}

impl<I> Default for TextureBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A builder holding everything a texture needs. Components can still be
/// added; `build` cannot fail.
pub struct PreparedBuilder<I> {
    listeners: Vec<TextureListener<I>>,
    image: I,
}

impl<I> PreparedBuilder<I> {
    pub fn add(mut self, component: impl TextureComponent<I>) -> Self {
        self.listeners.extend(component.into_listeners());
        self
    }

    /// Groups listeners by event, preserving insertion order within each
    /// event. A fresh texture starts needing its first upload.
    pub fn build(self) -> EventDrivenTexture<I> {
        let mut listeners: HashMap<TextureEvent, Vec<Action<I>>> = HashMap::new();
        for listener in self.listeners {
            listeners
                .entry(listener.event)
                .or_default()
                .push(listener.action);
        }

        EventDrivenTexture {
            listeners,
            state: TextureState {
                image: self.image,
                needs_upload: true,
            },
            closed: false,
        }
    }
}
