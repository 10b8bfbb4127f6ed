//! Mipmapped texture frames.
//!
//! Model:
//! - A [`SubRegion`] is a rectangular window into a shared pixel buffer.
//!   Frames of one animation all window the same decoded source image, so
//!   cloning a frame handle never copies pixels.
//! - A [`TextureFrame`] is one frame descriptor plus its windows at every
//!   mipmap level, level 0 first. Level k windows the level-k mipmap of the
//!   source with all coordinates shifted right by k.

use std::rc::Rc;

use crate::frames::FrameData;
use crate::math::Point;
use crate::pixel::{PixelBuffer, VisibleArea};

/// Anything that can push its pixels to the host texture at a given point.
pub trait UploadableFrame {
    /// Uploads every mipmap level at `point`, shifting the point per level.
    /// The point must be non-negative; a negative point is a wiring defect
    /// and panics.
    fn upload_at(&self, point: Point);
}

impl<T: UploadableFrame> UploadableFrame for Rc<T> {
    fn upload_at(&self, point: Point) {
        (**self).upload_at(point);
    }
}

/// A rectangular window into a shared pixel buffer, carrying the visible
/// area for its mipmap level in window-local coordinates.
#[derive(Clone, Debug)]
pub struct SubRegion<B> {
    parent: Rc<B>,
    x_offset: u32,
    y_offset: u32,
    width: u32,
    height: u32,
    visible_area: VisibleArea,
}

impl<B: PixelBuffer> SubRegion<B> {
    pub fn new(
        parent: Rc<B>,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        visible_area: VisibleArea,
    ) -> Self {
        Self {
            parent,
            x_offset,
            y_offset,
            width,
            height,
            visible_area,
        }
    }

    /// A window covering all of `parent`.
    pub fn whole(parent: Rc<B>, visible_area: VisibleArea) -> Self {
        let width = parent.width();
        let height = parent.height();
        Self::new(parent, 0, 0, width, height, visible_area)
    }

    /// The coordinates within this window that change across the animation.
    pub fn visible_area(&self) -> &VisibleArea {
        &self.visible_area
    }
}

impl<B: PixelBuffer> PixelBuffer for SubRegion<B> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        self.parent.pixel(x + self.x_offset, y + self.y_offset)
    }

    fn set_pixel(&self, x: u32, y: u32, color: u32) {
        self.parent
            .set_pixel(x + self.x_offset, y + self.y_offset, color);
    }

    fn upload(&self, x: u32, y: u32, skip_x: u32, skip_y: u32, width: u32, height: u32) {
        self.parent.upload(
            x,
            y,
            self.x_offset + skip_x,
            self.y_offset + skip_y,
            width,
            height,
        );
    }
}

/// One animation frame: its descriptor plus a window per mipmap level.
#[derive(Clone, Debug)]
pub struct TextureFrame<B> {
    data: FrameData,
    levels: Vec<SubRegion<B>>,
}

impl<B: PixelBuffer> TextureFrame<B> {
    /// Creates a frame from its descriptor and per-level windows, level 0
    /// first. Panics when no levels are provided.
    pub fn new(data: FrameData, levels: Vec<SubRegion<B>>) -> Self {
        assert!(!levels.is_empty(), "a frame needs at least mipmap level 0");
        Self { data, levels }
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    /// Display time in ticks, or `None` when the metadata declared none.
    pub fn time(&self) -> Option<u32> {
        self.data.time
    }

    /// Number of levels beyond level 0.
    pub fn mipmap_levels(&self) -> u32 {
        (self.levels.len() - 1) as u32
    }

    pub fn level(&self, level: u32) -> &SubRegion<B> {
        &self.levels[level as usize]
    }
}

impl<B: PixelBuffer> UploadableFrame for TextureFrame<B> {
    fn upload_at(&self, point: Point) {
        assert!(
            point.x >= 0 && point.y >= 0,
            "upload point {point} must be non-negative"
        );

        for (level, region) in self.levels.iter().enumerate() {
            let width = self.width() >> level;
            let height = self.height() >> level;

            // Some textures have fewer meaningful levels than the host
            // requests; empty levels are skipped rather than uploaded.
            if width == 0 || height == 0 {
                continue;
            }

            region.upload(
                (point.x >> level) as u32,
                (point.y >> level) as u32,
                0,
                0,
                width,
                height,
            );
        }
    }
}
