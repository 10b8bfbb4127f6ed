//! Pixel-buffer capability contract and the visible-area optimization.
//!
//! Model:
//! - A [`PixelBuffer`] is a rectangular grid of opaque `u32` colors with an
//!   upload side effect supplied by the host. Mutation goes through `&self`
//!   because implementations typically wrap host-native or shared memory;
//!   the engine dispatches events serially, so no synchronization is needed.
//! - A [`VisibleArea`] is the set of coordinates that can differ across an
//!   animation's frames. Interpolation and partial uploads iterate it instead
//!   of the full grid.

use hashbrown::HashSet;

use crate::math::Point;

/// Packed color layout: alpha in the top byte, then red, green, blue.
#[inline]
pub fn color(alpha: u8, red: u8, green: u8, blue: u8) -> u32 {
    (u32::from(alpha) << 24) | (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue)
}

#[inline]
pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
pub fn red(color: u32) -> u8 {
    (color >> 16) as u8
}

#[inline]
pub fn green(color: u32) -> u8 {
    (color >> 8) as u8
}

#[inline]
pub fn blue(color: u32) -> u8 {
    color as u8
}

/// A rectangular grid of integer-encoded colors with an upload side effect.
///
/// The core never reinterprets colors beyond the linear channel blend in
/// [`crate::interp::rgba`]; hosts may store any fixed-width encoding as long
/// as all buffers for one texture agree on it.
pub trait PixelBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reads the color at (`x`, `y`). Coordinates must be in bounds.
    fn pixel(&self, x: u32, y: u32) -> u32;

    /// Writes the color at (`x`, `y`). Coordinates must be in bounds.
    fn set_pixel(&self, x: u32, y: u32, color: u32);

    /// Uploads the rectangle of this buffer starting at (`skip_x`, `skip_y`)
    /// with dimensions `width` x `height` to the host texture at (`x`, `y`).
    /// The host supplies the actual GPU call; in-memory buffers may record
    /// the request or ignore it.
    fn upload(&self, x: u32, y: u32, skip_x: u32, skip_y: u32, width: u32, height: u32);
}

/// The set of coordinates that changed across at least one animation frame
/// relative to frame zero. Immutable once built; one exists per mipmap level
/// with coordinates shifted accordingly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VisibleArea {
    points: Vec<Point>,
}

impl VisibleArea {
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.binary_search(&point).is_ok()
    }

    /// The same area with every coordinate shifted to `level`. Distinct
    /// full-resolution points may collapse onto one mipmapped point.
    pub fn mipmapped(&self, level: u32) -> VisibleArea {
        let mut builder = VisibleAreaBuilder::default();
        for point in self.iter() {
            builder.add_pixel(point.mipmapped(level));
        }
        builder.build()
    }
}

/// Collects changed pixels, deduplicating as it goes.
#[derive(Debug, Default)]
pub struct VisibleAreaBuilder {
    points: HashSet<Point>,
}

impl VisibleAreaBuilder {
    pub fn add_pixel(&mut self, point: Point) {
        self.points.insert(point);
    }

    pub fn build(self) -> VisibleArea {
        let mut points: Vec<Point> = self.points.into_iter().collect();
        points.sort_unstable();
        VisibleArea { points }
    }
}

/// Generates `levels` additional mipmaps below `base` by 2x2 box filtering,
/// halving each dimension per level (integer shift). The returned vector
/// starts with level 1; `alloc` supplies a buffer for each level's
/// dimensions.
pub fn generate_mipmaps<B, A>(base: &B, levels: u32, alloc: A) -> Vec<B>
where
    B: PixelBuffer,
    A: Fn(u32, u32) -> B,
{
    let mut mipmaps: Vec<B> = Vec::with_capacity(levels as usize);

    for level in 1..=levels {
        let width = (base.width() >> level).max(1);
        let height = (base.height() >> level).max(1);
        let target = alloc(width, height);

        {
            let source: &dyn PixelBuffer = match mipmaps.last() {
                Some(previous) => previous,
                None => base,
            };

            for y in 0..height {
                for x in 0..width {
                    target.set_pixel(x, y, average_quad(source, x, y));
                }
            }
        }

        mipmaps.push(target);
    }

    mipmaps
}

/// Channel-wise average of the 2x2 block in `source` that maps onto (`x`,
/// `y`) one level down. Clamps at the source edge when a dimension is odd
/// or already 1.
fn average_quad(source: &dyn PixelBuffer, x: u32, y: u32) -> u32 {
    let x0 = (2 * x).min(source.width() - 1);
    let y0 = (2 * y).min(source.height() - 1);
    let x1 = (x0 + 1).min(source.width() - 1);
    let y1 = (y0 + 1).min(source.height() - 1);

    let quad = [
        source.pixel(x0, y0),
        source.pixel(x1, y0),
        source.pixel(x0, y1),
        source.pixel(x1, y1),
    ];

    let mut sums = [0u32; 4];
    for c in quad {
        sums[0] += u32::from(alpha(c));
        sums[1] += u32::from(red(c));
        sums[2] += u32::from(green(c));
        sums[3] += u32::from(blue(c));
    }

    color(
        (sums[0] / 4) as u8,
        (sums[1] / 4) as u8,
        (sums[2] / 4) as u8,
        (sums[3] / 4) as u8,
    )
}
