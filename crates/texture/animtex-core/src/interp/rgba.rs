//! Channel-wise linear blending of packed colors.

use crate::pixel::{alpha, blue, color, green, red, PixelBuffer, VisibleArea};

/// Linearly blends one channel at `step` of `steps` and rounds to the
/// nearest value. `step == 0` yields `start` exactly and `step == steps`
/// yields `end` exactly.
#[inline]
pub fn blend_channel(steps: u32, step: u32, start: u8, end: u8) -> u8 {
    let weighted = f64::from(start) * f64::from(steps - step) + f64::from(end) * f64::from(step);
    (weighted / f64::from(steps)).round().clamp(0.0, 255.0) as u8
}

/// Blends all four channels of two packed colors independently.
#[inline]
pub fn blend_color(steps: u32, step: u32, start: u32, end: u32) -> u32 {
    color(
        blend_channel(steps, step, alpha(start), alpha(end)),
        blend_channel(steps, step, red(start), red(end)),
        blend_channel(steps, step, green(start), green(end)),
        blend_channel(steps, step, blue(start), blue(end)),
    )
}

/// Writes the blend of `start` and `end` into `target` at every coordinate
/// of `area`, leaving all other pixels of `target` untouched. The three
/// buffers must share the same dimensions and `step` must not exceed
/// `steps`.
pub fn interpolate_into<S, T>(
    steps: u32,
    step: u32,
    start: &S,
    end: &S,
    target: &T,
    area: &VisibleArea,
) where
    S: PixelBuffer + ?Sized,
    T: PixelBuffer + ?Sized,
{
    assert!(steps > 0 && step <= steps, "step {step} of {steps} steps");

    for point in area.iter() {
        let x = point.x as u32;
        let y = point.y as u32;
        target.set_pixel(x, y, blend_color(steps, step, start.pixel(x, y), end.pixel(x, y)));
    }
}
