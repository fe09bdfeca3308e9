//! The sprite editor: tool dispatch over a working raster, bridged
//! into the frame timeline.
//!
//! Pointer input drives a small state machine keyed on the active
//! tool. Every successful draw or erase synchronously copies the
//! working raster into the current frame, so the timeline always
//! reflects on-screen pixel state.

use crate::error::SpriteError;
use crate::raster::{Raster, Rgba, BACKGROUND};
use crate::timeline::FrameSequence;
use crate::tools::{Tool, ToolState};

/// One editing session over a raster and its frame sequence.
pub struct SpriteEditor {
    raster: Raster,
    tools: ToolState,
    frames: FrameSequence,
    stroke_active: bool,
}

impl SpriteEditor {
    /// Create an editor with a blank working raster and a single-frame
    /// timeline of the same dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, SpriteError> {
        Ok(Self {
            raster: Raster::new(width, height)?,
            tools: ToolState::default(),
            frames: FrameSequence::new(width, height)?,
            stroke_active: false,
        })
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    // ---- tool selection ----

    pub fn select_tool(&mut self, tool: Tool) {
        self.tools.active_tool = tool;
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.tools.active_color = color;
    }

    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), SpriteError> {
        self.tools.set_zoom(zoom)
    }

    // ---- pointer input ----

    /// Pointer pressed at raster cell `(x, y)`.
    ///
    /// Pencil and eraser begin a stroke and write immediately; the
    /// picker samples the cell into the active color without mutating;
    /// fill is reserved and does nothing. Out-of-bounds coordinates
    /// are no-ops.
    pub fn pointer_down(&mut self, x: u32, y: u32) {
        match self.tools.active_tool {
            Tool::Pencil => {
                self.stroke_active = true;
                self.apply(x, y, self.tools.active_color);
            }
            Tool::Eraser => {
                self.stroke_active = true;
                self.apply(x, y, BACKGROUND);
            }
            Tool::Picker => {
                if let Some(color) = self.raster.get(x, y) {
                    self.tools.active_color = color;
                }
            }
            Tool::Fill => {
                // Reserved: the palette entry exists but no fill
                // semantics ship yet.
                tracing::debug!(x, y, "Fill tool is not implemented");
            }
        }
    }

    /// Pointer moved to raster cell `(x, y)` while pressed.
    ///
    /// Only pencil and eraser act on movement, and only during an
    /// active stroke.
    pub fn pointer_move(&mut self, x: u32, y: u32) {
        if !self.stroke_active {
            return;
        }
        match self.tools.active_tool {
            Tool::Pencil => {
                self.apply(x, y, self.tools.active_color);
            }
            Tool::Eraser => {
                self.apply(x, y, BACKGROUND);
            }
            Tool::Fill | Tool::Picker => {}
        }
    }

    /// Pointer released: terminates any in-progress stroke.
    pub fn pointer_up(&mut self) {
        self.stroke_active = false;
    }

    /// Pointer left the canvas area: same as release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Reset the working raster to the background color.
    pub fn clear_canvas(&mut self) {
        self.raster.clear();
        self.sync_current_frame();
    }

    // ---- timeline ----

    /// Move to frame `index`, loading its raster into the working
    /// buffer.
    pub fn select_frame(&mut self, index: usize) -> Result<(), SpriteError> {
        self.sync_current_frame();
        self.frames.select(index)?;
        self.load_current_frame();
        Ok(())
    }

    pub fn add_frame(&mut self) -> Result<(), SpriteError> {
        self.frames.add_frame()
    }

    pub fn duplicate_frame(&mut self, index: usize) -> Result<(), SpriteError> {
        self.frames.duplicate_frame(index)
    }

    /// Delete a frame; the working buffer follows wherever the cursor
    /// lands.
    pub fn delete_frame(&mut self, index: usize) -> Result<(), SpriteError> {
        self.frames.delete_frame(index)?;
        self.load_current_frame();
        Ok(())
    }

    pub fn set_frame_duration(&mut self, index: usize, ms: u32) -> Result<(), SpriteError> {
        self.frames.set_frame_duration(index, ms)
    }

    // ---- private helpers ----

    /// Write one cell; on success, mirror the raster into the current
    /// frame.
    fn apply(&mut self, x: u32, y: u32, color: Rgba) {
        if self.raster.set(x, y, color) {
            self.sync_current_frame();
        }
    }

    fn sync_current_frame(&mut self) {
        self.frames.current_mut().raster = self.raster.clone();
    }

    fn load_current_frame(&mut self) {
        self.raster = self.frames.current().raster.clone();
    }
}
