//! Frame interpolation.
//!
//! [`rgba`] holds the pure channel blend; [`TextureFrameInterpolator`]
//! applies it across every mipmap level of two frames, writing into an
//! arena of reusable buffers so steady-state interpolation allocates
//! nothing.

pub mod rgba;

use std::rc::Rc;

use crate::frame::{SubRegion, TextureFrame};
use crate::frames::FrameData;
use crate::pixel::PixelBuffer;

/// Produces an in-between frame at `step` of `steps` between two frames.
pub trait FrameInterpolator<F> {
    fn interpolate(&mut self, steps: u32, step: u32, start: &F, end: &F) -> F;
}

/// Interpolates [`TextureFrame`]s level by level into an owned arena of
/// buffers, one per mipmap level, allocated through the host's buffer
/// factory.
///
/// The arena is built on first use by copying the start frame, so pixels
/// outside the visible area carry the animation's static content; later
/// calls rewrite only the visible area. The returned frame aliases the
/// arena and is invalidated by the next `interpolate` call.
pub struct TextureFrameInterpolator<B, A> {
    alloc: A,
    arena: Option<Rc<TextureFrame<B>>>,
}

impl<B, A> TextureFrameInterpolator<B, A>
where
    B: PixelBuffer,
    A: Fn(u32, u32) -> B,
{
    pub fn new(alloc: A) -> Self {
        Self { alloc, arena: None }
    }

    /// Returns the arena frame matching `start`'s shape, building it by
    /// copying `start` when no matching arena exists yet.
    fn ensure_arena(&mut self, start: &TextureFrame<B>) -> Rc<TextureFrame<B>> {
        let matches = self.arena.as_ref().filter(|arena| {
            arena.width() == start.width()
                && arena.height() == start.height()
                && arena.mipmap_levels() == start.mipmap_levels()
        });
        if let Some(arena) = matches {
            return Rc::clone(arena);
        }

        let levels = (0..=start.mipmap_levels())
            .map(|level| {
                let source = start.level(level);
                let buffer = (self.alloc)(source.width(), source.height());

                for y in 0..source.height() {
                    for x in 0..source.width() {
                        buffer.set_pixel(x, y, source.pixel(x, y));
                    }
                }

                SubRegion::whole(Rc::new(buffer), source.visible_area().clone())
            })
            .collect();

        let data = FrameData {
            width: start.width(),
            height: start.height(),
            x_offset: 0,
            y_offset: 0,
            time: None,
        };
        let arena = Rc::new(TextureFrame::new(data, levels));
        self.arena = Some(Rc::clone(&arena));
        arena
    }
}

impl<B, A> FrameInterpolator<Rc<TextureFrame<B>>> for TextureFrameInterpolator<B, A>
where
    B: PixelBuffer,
    A: Fn(u32, u32) -> B,
{
    fn interpolate(
        &mut self,
        steps: u32,
        step: u32,
        start: &Rc<TextureFrame<B>>,
        end: &Rc<TextureFrame<B>>,
    ) -> Rc<TextureFrame<B>> {
        let arena = self.ensure_arena(start);

        for level in 0..=start.mipmap_levels() {
            let source = start.level(level);
            rgba::interpolate_into(
                steps,
                step,
                source,
                end.level(level),
                arena.level(level),
                source.visible_area(),
            );
        }

        arena
    }
}
