//! Tool selection state.

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;
use crate::raster::Rgba;

/// Default zoom factor (screen pixels per raster cell).
pub const DEFAULT_ZOOM: u32 = 8;

/// Minimum allowed zoom factor.
pub const MIN_ZOOM: u32 = 1;

/// Maximum allowed zoom factor.
pub const MAX_ZOOM: u32 = 16;

/// Default drawing color (the emerald swatch).
pub const DEFAULT_COLOR: Rgba = Rgba::opaque(0x10, 0xb9, 0x81);

/// The editor's tool palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Writes the active color under the cursor.
    Pencil,
    /// Writes the background color under the cursor.
    Eraser,
    /// Reserved; currently a no-op (no flood-fill semantics shipped).
    Fill,
    /// Samples the color under the cursor into the active color.
    Picker,
}

/// Session-wide tool state, mutated only by explicit selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    pub active_tool: Tool,
    pub active_color: Rgba,
    pub zoom: u32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: Tool::Pencil,
            active_color: DEFAULT_COLOR,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ToolState {
    /// Set the zoom factor, validating it against the allowed range.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), SpriteError> {
        validate_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }
}

/// Validate that a zoom factor is within allowed bounds.
pub fn validate_zoom(zoom: u32) -> Result<(), SpriteError> {
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(SpriteError::Validation(format!(
            "Zoom {zoom} is outside the allowed range [{MIN_ZOOM}, {MAX_ZOOM}]"
        )));
    }
    Ok(())
}
