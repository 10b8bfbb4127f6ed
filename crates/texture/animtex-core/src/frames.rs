//! Frame descriptors and the frame reader.
//!
//! [`read_frames`] turns parsed animation metadata plus the source image
//! dimensions into an ordered, validated sequence of [`FrameData`]
//! descriptors. It is a pure function of its inputs; pixel data is never
//! touched here.

use crate::error::TextureError;
use crate::metadata::AnimationMetadata;

/// General data for one animation frame: its dimensions, its top-left
/// corner within the source image, and its display time. Immutable once
/// created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameData {
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    /// Display time in ticks; `None` means "use the default frame time".
    pub time: Option<u32>,
}

impl FrameData {
    /// Resolves this frame's display time against a default.
    pub fn time_or(&self, default_time: u32) -> u32 {
        self.time.unwrap_or(default_time)
    }
}

/// Reads an ordered sequence of frame descriptors.
///
/// Frame dimensions come from the metadata when declared; otherwise the
/// source is assumed to be a vertical strip of square frames (frame width =
/// source width). When the metadata lists explicit frame indices, one
/// descriptor is created per listed index with its optional time override;
/// otherwise one descriptor is synthesized per tile in source order.
///
/// Fails with [`TextureError::InvalidMetadata`] when the frame count would
/// be zero, the computed dimensions do not evenly divide the source image,
/// or an explicit frame index is out of range.
pub fn read_frames(
    source_width: u32,
    source_height: u32,
    metadata: &AnimationMetadata,
) -> Result<Vec<FrameData>, TextureError> {
    let (frame_width, frame_height) = frame_size(source_width, metadata);

    if frame_width == 0 || frame_height == 0 {
        return Err(TextureError::InvalidMetadata(
            "frame dimensions must be positive".into(),
        ));
    }
    if source_width % frame_width != 0 || source_height % frame_height != 0 {
        return Err(TextureError::InvalidMetadata(format!(
            "frame size {frame_width}x{frame_height} does not divide source \
             image {source_width}x{source_height}"
        )));
    }

    let tiles_x = source_width / frame_width;
    let tiles_y = source_height / frame_height;
    let tile_count = tiles_x * tiles_y;
    if tile_count == 0 {
        return Err(TextureError::InvalidMetadata(
            "source image contains no frames".into(),
        ));
    }

    let tile = |index: u32| FrameData {
        width: frame_width,
        height: frame_height,
        x_offset: (index % tiles_x) * frame_width,
        y_offset: (index / tiles_x) * frame_height,
        time: None,
    };

    if metadata.frames.is_empty() {
        return Ok((0..tile_count).map(tile).collect());
    }

    let mut frames = Vec::with_capacity(metadata.frames.len());
    for entry in &metadata.frames {
        let index = entry.index();
        if index >= tile_count {
            return Err(TextureError::InvalidMetadata(format!(
                "frame index {index} is out of range for {tile_count} frames"
            )));
        }
        frames.push(FrameData {
            time: entry.time(),
            ..tile(index)
        });
    }

    Ok(frames)
}

fn frame_size(source_width: u32, metadata: &AnimationMetadata) -> (u32, u32) {
    match (metadata.width, metadata.height) {
        (Some(width), Some(height)) => (width, height),
        // A lone declared dimension implies square frames.
        (Some(width), None) => (width, width),
        (None, Some(height)) => (source_width, height),
        (None, None) => (source_width, source_width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FrameEntry;

    #[test]
    fn vertical_strip_of_squares_by_default() {
        let frames = read_frames(16, 64, &AnimationMetadata::default()).unwrap();
        assert_eq!(frames.len(), 4);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.width, 16);
            assert_eq!(frame.height, 16);
            assert_eq!(frame.x_offset, 0);
            assert_eq!(frame.y_offset, 16 * i as u32);
            assert_eq!(frame.time, None);
        }
    }

    #[test]
    fn explicit_indices_and_times() {
        let metadata = AnimationMetadata {
            frames: vec![
                FrameEntry::Index(2),
                FrameEntry::Timed { index: 0, time: 7 },
            ],
            ..Default::default()
        };

        let frames = read_frames(8, 32, &metadata).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].y_offset, 16);
        assert_eq!(frames[0].time, None);
        assert_eq!(frames[1].y_offset, 0);
        assert_eq!(frames[1].time, Some(7));
        assert_eq!(frames[1].time_or(3), 7);
        assert_eq!(frames[0].time_or(3), 3);
    }

    #[test]
    fn explicit_dimensions_tile_horizontally_too() {
        let metadata = AnimationMetadata {
            width: Some(8),
            height: Some(8),
            ..Default::default()
        };

        let frames = read_frames(16, 16, &metadata).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1].x_offset, 8);
        assert_eq!(frames[1].y_offset, 0);
        assert_eq!(frames[2].x_offset, 0);
        assert_eq!(frames[2].y_offset, 8);
    }

    #[test]
    fn uneven_division_is_invalid() {
        let metadata = AnimationMetadata {
            width: Some(10),
            height: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            read_frames(16, 16, &metadata),
            Err(TextureError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let metadata = AnimationMetadata {
            frames: vec![FrameEntry::Index(4)],
            ..Default::default()
        };
        assert!(matches!(
            read_frames(16, 64, &metadata),
            Err(TextureError::InvalidMetadata(_))
        ));
    }
}
