//! Animation frame sequence.
//!
//! A [`FrameSequence`] owns an ordered list of [`Frame`]s and a cursor
//! into it. The sequence is never empty; all mutation goes through the
//! methods here, which preserve that invariant and keep the cursor in
//! range.

use serde::{Deserialize, Serialize};

use aetherforge_core::types::FrameId;

use crate::error::SpriteError;
use crate::raster::Raster;

/// Default display duration for a new frame.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// One animation frame: an identifier, a display duration, and its
/// pixel raster (owned by value — frames never share pixel data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub duration_ms: u32,
    pub raster: Raster,
}

impl Frame {
    fn blank(width: u32, height: u32) -> Result<Self, SpriteError> {
        Ok(Self {
            id: FrameId::new_v4(),
            duration_ms: DEFAULT_FRAME_DURATION_MS,
            raster: Raster::new(width, height)?,
        })
    }
}

/// Ordered, never-empty list of frames with a cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    cursor: usize,
    width: u32,
    height: u32,
}

impl FrameSequence {
    /// Create a sequence holding one blank frame.
    pub fn new(width: u32, height: u32) -> Result<Self, SpriteError> {
        Ok(Self {
            frames: vec![Frame::blank(width, height)?],
            cursor: 0,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: the minimum-one-frame invariant holds.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Raster width shared by every frame.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height shared by every frame.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.cursor]
    }

    pub fn current_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.cursor]
    }

    /// Sum of all frame durations.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }

    /// Append a blank frame with the default duration.
    pub fn add_frame(&mut self) -> Result<(), SpriteError> {
        let frame = Frame::blank(self.width, self.height)?;
        self.frames.push(frame);
        Ok(())
    }

    /// Insert a value-copy of frame `index` immediately after it, with
    /// a fresh identifier. Later edits to either copy never affect the
    /// other.
    pub fn duplicate_frame(&mut self, index: usize) -> Result<(), SpriteError> {
        let source = self
            .frames
            .get(index)
            .ok_or_else(|| frame_index_error(index, self.frames.len()))?;
        let copy = Frame {
            id: FrameId::new_v4(),
            ..source.clone()
        };
        self.frames.insert(index + 1, copy);
        Ok(())
    }

    /// Remove frame `index`. A no-op when only one frame remains; the
    /// cursor clamps to the last valid index if it falls past the end.
    pub fn delete_frame(&mut self, index: usize) -> Result<(), SpriteError> {
        if index >= self.frames.len() {
            return Err(frame_index_error(index, self.frames.len()));
        }
        if self.frames.len() <= 1 {
            return Ok(());
        }
        self.frames.remove(index);
        if self.cursor >= self.frames.len() {
            self.cursor = self.frames.len() - 1;
        }
        Ok(())
    }

    /// Set the display duration of frame `index`; must be positive.
    pub fn set_frame_duration(&mut self, index: usize, ms: u32) -> Result<(), SpriteError> {
        if ms == 0 {
            return Err(SpriteError::Validation(
                "Frame duration must be a positive number of milliseconds".to_string(),
            ));
        }
        let len = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or_else(|| frame_index_error(index, len))?;
        frame.duration_ms = ms;
        Ok(())
    }

    /// Move the cursor to `index`.
    pub fn select(&mut self, index: usize) -> Result<(), SpriteError> {
        if index >= self.frames.len() {
            return Err(frame_index_error(index, self.frames.len()));
        }
        self.cursor = index;
        Ok(())
    }

    /// Step the cursor forward, clamped at the last frame (manual
    /// navigation).
    pub fn next_frame(&mut self) {
        self.cursor = (self.cursor + 1).min(self.frames.len() - 1);
    }

    /// Step the cursor back, clamped at the first frame (manual
    /// navigation).
    pub fn prev_frame(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Advance the cursor one frame, wrapping to the start (autoplay).
    pub fn advance_wrapping(&mut self) {
        self.cursor = (self.cursor + 1) % self.frames.len();
    }
}

fn frame_index_error(index: usize, len: usize) -> SpriteError {
    SpriteError::Validation(format!(
        "Frame index {index} out of range (sequence has {len} frames)"
    ))
}
