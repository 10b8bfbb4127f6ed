//! Frame selection over an animation's timeline.
//!
//! Model:
//! - The manager owns the ordered frame sequence and a cumulative display
//!   time table built once at construction.
//! - An elapsed-tick counter, always reduced modulo the total animation
//!   duration, selects the current frame by walking the table.
//! - With an interpolator attached, any counter position strictly between
//!   frame boundaries synthesizes an in-between frame during `tick`, so
//!   [`AnimationFrameManager::current_frame`] is O(1).

use crate::error::TextureError;
use crate::interp::FrameInterpolator;

/// The frame-selection state machine. Generic over the frame type so pure
/// timing logic can be tested without pixel data.
pub struct AnimationFrameManager<F> {
    frames: Vec<F>,
    /// Exclusive end tick of each frame on the animation timeline.
    cumulative: Vec<u32>,
    frame_times: Vec<u32>,
    total: u32,
    ticks: u32,
    index: usize,
    interpolator: Option<Box<dyn FrameInterpolator<F>>>,
    interpolated: Option<F>,
}

impl<F> AnimationFrameManager<F> {
    /// Creates a manager that snaps to exact frames.
    ///
    /// `frame_time` resolves each frame's display time in ticks. Fails with
    /// [`TextureError::Configuration`] when `frames` is empty, any frame
    /// resolves to a zero display time, or the total duration overflows
    /// the `u32` tick counter.
    pub fn new(
        frames: Vec<F>,
        frame_time: impl Fn(&F) -> u32,
    ) -> Result<Self, TextureError> {
        Self::build(frames, frame_time, None)
    }

    /// Creates a manager that synthesizes in-between frames with
    /// `interpolator` whenever the timeline position falls inside a frame.
    pub fn with_interpolator(
        frames: Vec<F>,
        frame_time: impl Fn(&F) -> u32,
        interpolator: Box<dyn FrameInterpolator<F>>,
    ) -> Result<Self, TextureError> {
        Self::build(frames, frame_time, Some(interpolator))
    }

    fn build(
        frames: Vec<F>,
        frame_time: impl Fn(&F) -> u32,
        interpolator: Option<Box<dyn FrameInterpolator<F>>>,
    ) -> Result<Self, TextureError> {
        if frames.is_empty() {
            return Err(TextureError::Configuration(
                "an animation needs at least one frame".into(),
            ));
        }

        let frame_times: Vec<u32> = frames.iter().map(frame_time).collect();
        if frame_times.contains(&0) {
            return Err(TextureError::Configuration(
                "every frame needs a positive display time".into(),
            ));
        }

        let mut cumulative = Vec::with_capacity(frame_times.len());
        let mut total = 0u32;
        for time in &frame_times {
            total = total.checked_add(*time).ok_or_else(|| {
                TextureError::Configuration(
                    "total animation duration overflows the tick counter".into(),
                )
            })?;
            cumulative.push(total);
        }

        Ok(Self {
            frames,
            cumulative,
            frame_times,
            total,
            ticks: 0,
            index: 0,
            interpolator,
            interpolated: None,
        })
    }

    /// Advances the animation by one tick.
    pub fn tick(&mut self) {
        self.tick_many(1);
    }

    /// Advances the animation by `ticks` ticks at once.
    pub fn tick_many(&mut self, ticks: u32) {
        self.ticks = ((u64::from(self.ticks) + u64::from(ticks)) % u64::from(self.total)) as u32;
        self.recompute();
    }

    /// The frame to display right now: the exact frame at a boundary, or
    /// the frame interpolated during the last `tick` otherwise.
    pub fn current_frame(&self) -> &F {
        self.interpolated.as_ref().unwrap_or(&self.frames[self.index])
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame the timeline position falls in.
    pub fn frame_index(&self) -> usize {
        self.index
    }

    /// Whether this manager synthesizes in-between frames.
    pub fn interpolates(&self) -> bool {
        self.interpolator.is_some()
    }

    /// Total animation duration in ticks.
    pub fn total_time(&self) -> u32 {
        self.total
    }

    fn recompute(&mut self) {
        let mut index = 0;
        while self.ticks >= self.cumulative[index] {
            index += 1;
        }
        self.index = index;

        let frame_start = if index == 0 {
            0
        } else {
            self.cumulative[index - 1]
        };
        let ticks_into_frame = self.ticks - frame_start;

        self.interpolated = None;
        if ticks_into_frame > 0 {
            if let Some(interpolator) = self.interpolator.as_mut() {
                let next = (index + 1) % self.frames.len();
                // The step count comes from the next frame's declared time;
                // a longer current frame saturates at the fully-blended end.
                let steps = self.frame_times[next];
                let step = ticks_into_frame.min(steps);
                self.interpolated = Some(interpolator.interpolate(
                    steps,
                    step,
                    &self.frames[index],
                    &self.frames[next],
                ));
            }
        }
    }
}
