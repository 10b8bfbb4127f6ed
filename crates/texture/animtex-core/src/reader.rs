//! Reading textures from raw bytes.
//!
//! The reader turns PNG bytes plus a metadata document into a prepared
//! texture builder: image decoded, mipmaps generated, frames cut out,
//! visible area scanned, and the animation component wired up. The result
//! is a lazy handle; the upload strategy is attached later by the
//! [`crate::finisher::TextureFinisher`] once atlases exist.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use image::ImageFormat;

use crate::components::AnimationComponent;
use crate::config::Config;
use crate::error::TextureError;
use crate::frame::{SubRegion, TextureFrame};
use crate::frame_manager::AnimationFrameManager;
use crate::frames::{read_frames, FrameData};
use crate::interp::TextureFrameInterpolator;
use crate::math::Point;
use crate::metadata::parse_texture_metadata_json;
use crate::pixel::{color, generate_mipmaps, PixelBuffer, VisibleArea, VisibleAreaBuilder};
use crate::texture::{PreparedBuilder, TextureBuilder};

/// The frame handle textures built by a reader carry as their image.
pub type ReadFrame<B> = Rc<TextureFrame<B>>;

/// Reads animated (and plain) textures into prepared builders. Reusable
/// for every texture sharing one configuration and buffer factory.
pub struct AnimatedTextureReader<B, A> {
    config: Config,
    alloc: A,
    _buffer: PhantomData<B>,
}

impl<B, A> AnimatedTextureReader<B, A>
where
    B: PixelBuffer + 'static,
    A: Fn(u32, u32) -> B + Clone + 'static,
{
    pub fn new(config: Config, alloc: A) -> Self {
        Self {
            config,
            alloc,
            _buffer: PhantomData,
        }
    }

    /// Reads one texture from PNG bytes and its metadata document.
    ///
    /// Without an `animation` metadata section the result is a plain
    /// single-frame texture. Decode failures, malformed metadata, and
    /// out-of-range animation parameters each surface as their own
    /// [`TextureError`] variant so a reload batch can skip just this
    /// texture.
    pub fn read(
        &self,
        texture_bytes: &[u8],
        metadata_json: &str,
    ) -> Result<PreparedBuilder<ReadFrame<B>>, TextureError> {
        let decoded = image::load_from_memory_with_format(texture_bytes, ImageFormat::Png)
            .map_err(|e| TextureError::MalformedImage(e.to_string()))?
            .to_rgba8();
        let (source_width, source_height) = decoded.dimensions();
        log::debug!("decoded {source_width}x{source_height} texture");

        let metadata = parse_texture_metadata_json(metadata_json)?;

        let animation = match metadata.animation {
            Some(animation) => animation,
            None => {
                let frame = FrameData {
                    width: source_width,
                    height: source_height,
                    x_offset: 0,
                    y_offset: 0,
                    time: None,
                };
                let frames = self.cut_frames(&decoded, vec![frame], Vec::new());
                let image = Rc::clone(&frames[0]);
                return Ok(TextureBuilder::new().set_image(image));
            }
        };

        let frames = read_frames(source_width, source_height, &animation)?;
        let frame_width = frames[0].width;
        let frame_height = frames[0].height;

        let areas = self.changing_points(&decoded, frame_width, frame_height);
        let frames = self.cut_frames(&decoded, frames, areas);

        let default_time = animation.frametime.unwrap_or(self.config.default_frame_time);
        let frame_time = move |frame: &ReadFrame<B>| frame.time().unwrap_or(default_time);

        let manager = if animation.interpolate {
            let interpolator = TextureFrameInterpolator::new(self.alloc.clone());
            AnimationFrameManager::with_interpolator(frames, frame_time, Box::new(interpolator))?
        } else {
            AnimationFrameManager::new(frames, frame_time)?
        };
        let manager = Rc::new(RefCell::new(manager));

        let image = Rc::clone(manager.borrow().current_frame());
        Ok(TextureBuilder::new()
            .add(AnimationComponent::new(manager))
            .set_image(image))
    }

    /// Number of usable mipmap levels beyond level 0 for a frame size:
    /// the configured count, capped where shifting would empty the frame.
    fn levels_for(&self, frame_width: u32, frame_height: u32) -> u32 {
        let mut levels = 0;
        while levels < self.config.mipmap_levels
            && frame_width >> (levels + 1) > 0
            && frame_height >> (levels + 1) > 0
        {
            levels += 1;
        }
        levels
    }

    /// Copies the decoded image into a host buffer, mipmaps it, and builds
    /// one shared frame handle per descriptor. `areas` holds one visible
    /// area per level, or is empty for a static texture.
    fn cut_frames(
        &self,
        decoded: &image::RgbaImage,
        frames: Vec<FrameData>,
        areas: Vec<VisibleArea>,
    ) -> Vec<ReadFrame<B>> {
        let (source_width, source_height) = decoded.dimensions();

        let base = (self.alloc)(source_width, source_height);
        for (x, y, pixel) in decoded.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            base.set_pixel(x, y, color(a, r, g, b));
        }

        let levels = self.levels_for(frames[0].width, frames[0].height);
        let mut mipmaps: Vec<Rc<B>> = Vec::with_capacity(levels as usize + 1);
        for buffer in generate_mipmaps(&base, levels, &self.alloc) {
            mipmaps.push(Rc::new(buffer));
        }
        mipmaps.insert(0, Rc::new(base));

        frames
            .into_iter()
            .map(|data| {
                let regions = (0..=levels)
                    .map(|level| {
                        let area = areas
                            .get(level as usize)
                            .cloned()
                            .unwrap_or_default();
                        SubRegion::new(
                            Rc::clone(&mipmaps[level as usize]),
                            data.x_offset >> level,
                            data.y_offset >> level,
                            data.width >> level,
                            data.height >> level,
                            area,
                        )
                    })
                    .collect();
                Rc::new(TextureFrame::new(data, regions))
            })
            .collect()
    }

    /// Scans the source image for coordinates whose color differs between
    /// the first frame tile and the same coordinate in any other tile, then
    /// shifts that area down to every mipmap level.
    fn changing_points(
        &self,
        decoded: &image::RgbaImage,
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<VisibleArea> {
        let (source_width, source_height) = decoded.dimensions();

        let mut builder = VisibleAreaBuilder::default();
        for y in 0..source_height {
            for x in 0..source_width {
                let frame_x = x % frame_width;
                let frame_y = y % frame_height;
                if decoded.get_pixel(x, y) != decoded.get_pixel(frame_x, frame_y) {
                    builder.add_pixel(Point::new(frame_x as i32, frame_y as i32));
                }
            }
        }
        let base = builder.build();

        let levels = self.levels_for(frame_width, frame_height);
        let mut areas = Vec::with_capacity(levels as usize + 1);
        for level in 0..=levels {
            if level == 0 {
                areas.push(base.clone());
            } else {
                areas.push(base.mipmapped(level));
            }
        }
        areas
    }
}
