//! Shared mock collaborators for animtex tests: an in-memory pixel buffer
//! that records uploads, host-side sprite/atlas/registry fakes, and PNG
//! builders for reader tests.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};

use animtex_core::{
    Atlas, PixelBuffer, Point, SharedTexture, Sprite, TextureLocation, TextureRegistry,
};

/// One recorded call to [`PixelBuffer::upload`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UploadCall {
    pub x: u32,
    pub y: u32,
    pub skip_x: u32,
    pub skip_y: u32,
    pub width: u32,
    pub height: u32,
}

/// An in-memory pixel grid recording every upload request made against it.
pub struct MockPixelBuffer {
    width: u32,
    height: u32,
    pixels: RefCell<Vec<u32>>,
    uploads: Rc<RefCell<Vec<UploadCall>>>,
}

impl MockPixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: RefCell::new(vec![0; (width * height) as usize]),
            uploads: Rc::default(),
        }
    }

    /// A factory suitable for readers and interpolators, with every created
    /// buffer reporting its uploads into one shared log.
    pub fn factory() -> (
        impl Fn(u32, u32) -> MockPixelBuffer + Clone + 'static,
        Rc<RefCell<Vec<UploadCall>>>,
    ) {
        let uploads: Rc<RefCell<Vec<UploadCall>>> = Rc::default();
        let log = Rc::clone(&uploads);
        let factory = move |width, height| MockPixelBuffer {
            width,
            height,
            pixels: RefCell::new(vec![0; (width * height) as usize]),
            uploads: Rc::clone(&log),
        };
        (factory, uploads)
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.borrow().clone()
    }
}

impl PixelBuffer for MockPixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels.borrow()[(y * self.width + x) as usize]
    }

    fn set_pixel(&self, x: u32, y: u32, color: u32) {
        self.pixels.borrow_mut()[(y * self.width + x) as usize] = color;
    }

    fn upload(&self, x: u32, y: u32, skip_x: u32, skip_y: u32, width: u32, height: u32) {
        self.uploads.borrow_mut().push(UploadCall {
            x,
            y,
            skip_x,
            skip_y,
            width,
            height,
        });
    }
}

/// A sprite with a fixed upload point, counting how often it was bound.
#[derive(Clone)]
pub struct MockSprite {
    name: TextureLocation,
    upload_point: Point,
    binds: Rc<RefCell<u32>>,
}

impl MockSprite {
    pub fn new(name: impl Into<String>, upload_point: Point) -> Self {
        Self {
            name: TextureLocation::new(name),
            upload_point,
            binds: Rc::default(),
        }
    }

    pub fn bind_count(&self) -> u32 {
        *self.binds.borrow()
    }
}

impl Sprite for MockSprite {
    fn name(&self) -> &TextureLocation {
        &self.name
    }

    fn bind(&self) {
        *self.binds.borrow_mut() += 1;
    }

    fn upload_point(&self) -> Point {
        self.upload_point
    }
}

/// An atlas answering lookups from a fixed sprite list.
#[derive(Clone, Default)]
pub struct MockAtlas {
    sprites: Vec<MockSprite>,
}

impl MockAtlas {
    pub fn with_sprites(sprites: Vec<MockSprite>) -> Self {
        Self { sprites }
    }
}

impl Atlas for MockAtlas {
    type Sprite = MockSprite;

    fn sprite(&self, name: &TextureLocation) -> Option<MockSprite> {
        self.sprites.iter().find(|s| s.name() == name).cloned()
    }
}

/// A registry remembering which locations are currently registered.
#[derive(Default)]
pub struct MockRegistry<I> {
    pub registered: Vec<TextureLocation>,
    pub textures: Vec<(TextureLocation, SharedTexture<I>)>,
}

impl<I> MockRegistry<I> {
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.registered.iter().map(|l| l.as_str()).collect();
        locations.sort_unstable();
        locations
    }
}

impl<I> TextureRegistry<SharedTexture<I>> for MockRegistry<I> {
    fn register(&mut self, location: TextureLocation, texture: SharedTexture<I>) {
        self.registered.retain(|l| l != &location);
        self.registered.push(location.clone());
        self.textures.push((location, texture));
    }

    fn unregister(&mut self, location: &TextureLocation) {
        self.registered.retain(|l| l != location);
        self.textures.retain(|(l, _)| l != location);
    }
}

/// Encodes rows of packed `(r, g, b, a)` pixels as a PNG.
pub fn png_from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Vec<u8>> {
    let mut flat = Vec::with_capacity(pixels.len() * 4);
    for pixel in pixels {
        flat.extend_from_slice(pixel);
    }
    let image = image::RgbaImage::from_raw(width, height, flat)
        .context("pixel data does not match the given dimensions")?;

    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .context("failed to encode test PNG")?;
    Ok(bytes.into_inner())
}

/// A vertical strip of solid square tiles, `size` pixels each, one tile
/// per color. Handy for animation reader tests.
pub fn png_strip(size: u32, frame_colors: &[[u8; 4]]) -> Result<Vec<u8>> {
    let mut pixels = Vec::with_capacity((size * size) as usize * frame_colors.len());
    for color in frame_colors {
        for _ in 0..size * size {
            pixels.push(*color);
        }
    }
    png_from_pixels(size, size * frame_colors.len() as u32, &pixels)
}
