//! Texture components: the listener bundles that give an
//! [`crate::texture::EventDrivenTexture`] its behavior.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::TextureError;
use crate::frame::UploadableFrame;
use crate::frame_manager::AnimationFrameManager;
use crate::math::Point;
use crate::sprite::Sprite;
use crate::texture::{TextureComponent, TextureEvent, TextureListener, TextureState};

/// External time source for synchronized animations. `None` means the time
/// is currently unavailable and the animation advances locally instead.
pub type TimeSource = Box<dyn Fn() -> Option<i64>>;

struct Synchronization {
    period: u32,
    time_source: TimeSource,
}

/// Advances a frame manager on every tick and swaps the texture's image to
/// the manager's current frame before each upload.
///
/// An unsynchronized animation advances one tick per tick event. A
/// synchronized one resynchronizes to the external time source whenever it
/// yields a value, so every texture sharing that source shows the same
/// phase; when the source yields nothing the animation degrades to local
/// ticking.
pub struct AnimationComponent<I> {
    manager: Rc<RefCell<AnimationFrameManager<I>>>,
    sync: Option<Synchronization>,
}

impl<I: Clone + 'static> AnimationComponent<I> {
    pub fn new(manager: Rc<RefCell<AnimationFrameManager<I>>>) -> Self {
        Self {
            manager,
            sync: None,
        }
    }

    /// Creates a component synchronized to `time_source` with the given
    /// period in ticks. Fails with [`TextureError::Configuration`] when the
    /// period is zero.
    pub fn synchronized(
        manager: Rc<RefCell<AnimationFrameManager<I>>>,
        sync_period: u32,
        time_source: impl Fn() -> Option<i64> + 'static,
    ) -> Result<Self, TextureError> {
        if sync_period == 0 {
            return Err(TextureError::Configuration(
                "synchronization period must be positive".into(),
            ));
        }

        Ok(Self {
            manager,
            sync: Some(Synchronization {
                period: sync_period,
                time_source: Box::new(time_source),
            }),
        })
    }
}

impl<I: Clone + 'static> TextureComponent<I> for AnimationComponent<I> {
    fn into_listeners(self) -> Vec<TextureListener<I>> {
        let tick_manager = Rc::clone(&self.manager);
        let upload_manager = self.manager;
        let sync = self.sync;
        let mut ticks: i64 = 0;

        let tick = TextureListener::new(TextureEvent::Tick, move |state: &mut TextureState<I>| {
            let mut manager = tick_manager.borrow_mut();
            let index_before = manager.frame_index();

            let external_time = sync
                .as_ref()
                .map(|sync| ((sync.time_source)(), sync.period));
            match external_time {
                Some((Some(time), period)) => {
                    // Catch up to the shared clock, normalizing backward
                    // jumps and negative times into one period.
                    let to_add = (time - ticks).rem_euclid(i64::from(period));
                    ticks += to_add;
                    manager.tick_many(to_add as u32);
                }
                _ => {
                    ticks += 1;
                    manager.tick();
                }
            }

            if manager.interpolates() || manager.frame_index() != index_before {
                state.mark_needs_upload();
            }
        });

        let upload = TextureListener::new(TextureEvent::Upload, move |state: &mut TextureState<I>| {
            state.replace_image(upload_manager.borrow().current_frame().clone());
        });

        vec![tick, upload]
    }
}

/// Uploads the whole image at the origin. Nothing marks the state dirty
/// afterwards, so the upload happens exactly once.
pub struct SingleUploadComponent;

impl<I: UploadableFrame + 'static> TextureComponent<I> for SingleUploadComponent {
    fn into_listeners(self) -> Vec<TextureListener<I>> {
        vec![TextureListener::new(
            TextureEvent::Upload,
            |state: &mut TextureState<I>| {
                state.image().upload_at(Point::new(0, 0));
            },
        )]
    }
}

/// Binds a sprite's atlas on every bind and uploads the image into the
/// sprite's sub-rectangle.
pub struct SpriteUploadComponent<S> {
    sprite: S,
}

impl<S: Sprite> SpriteUploadComponent<S> {
    pub fn new(sprite: S) -> Self {
        Self { sprite }
    }
}

impl<S, I> TextureComponent<I> for SpriteUploadComponent<S>
where
    S: Sprite + 'static,
    I: UploadableFrame + 'static,
{
    fn into_listeners(self) -> Vec<TextureListener<I>> {
        let sprite = Rc::new(self.sprite);
        let bound = Rc::clone(&sprite);

        vec![
            TextureListener::new(TextureEvent::Bind, move |_: &mut TextureState<I>| {
                bound.bind()
            }),
            TextureListener::new(TextureEvent::Upload, move |state: &mut TextureState<I>| {
                state.image().upload_at(sprite.upload_point());
            }),
        ]
    }
}
