//! Small math types shared across the crate.

use std::fmt;

/// A pair of integer coordinates in a plane. Two points are equal when both
/// coordinates are equal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifts both coordinates right by `level`, mapping a full-resolution
    /// coordinate to its mipmapped counterpart.
    #[inline]
    pub fn mipmapped(self, level: u32) -> Self {
        Self {
            x: self.x >> level,
            y: self.y >> level,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
