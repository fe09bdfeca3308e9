//! Spritesheet composition and export.
//!
//! Packs a frame sequence into a single PNG sheet using one of three
//! layouts, plus a JSON-serializable metadata sidecar describing the
//! packing so game engines can slice the sheet back apart.

use std::io::Cursor;

use image::RgbaImage;
use serde::Serialize;

use crate::error::SpriteError;
use crate::timeline::FrameSequence;

/// Pixels between frames on the sheet.
pub const DEFAULT_PADDING: u32 = 2;

/// How frames are arranged on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetLayout {
    /// One row, `n` columns.
    Horizontal,
    /// One column, `n` rows.
    Vertical,
    /// Near-square grid: `ceil(sqrt(n))` columns.
    Grid,
}

/// Column and row counts for a frame count under a layout.
pub fn grid_dimensions(frame_count: usize, layout: SheetLayout) -> (u32, u32) {
    if frame_count == 0 {
        return (0, 0);
    }
    let n = frame_count as u32;
    match layout {
        SheetLayout::Horizontal => (n, 1),
        SheetLayout::Vertical => (1, n),
        SheetLayout::Grid => {
            let cols = (frame_count as f64).sqrt().ceil() as u32;
            let rows = n.div_ceil(cols);
            (cols, rows)
        }
    }
}

/// Sidecar metadata describing a composed sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetMetadata {
    pub frame_width: u32,
    pub frame_height: u32,
    pub cols: u32,
    pub rows: u32,
    pub frame_count: usize,
    /// Per-frame display durations in sheet order.
    pub durations_ms: Vec<u32>,
}

/// Describe the packing of `frames` under `layout`.
pub fn metadata(frames: &FrameSequence, layout: SheetLayout) -> SheetMetadata {
    let (cols, rows) = grid_dimensions(frames.len(), layout);
    SheetMetadata {
        frame_width: frames.width(),
        frame_height: frames.height(),
        cols,
        rows,
        frame_count: frames.len(),
        durations_ms: frames.frames().iter().map(|f| f.duration_ms).collect(),
    }
}

/// Compose the frames into a single sheet image.
///
/// Frames are placed row-major; cell `i` sits at column `i % cols`,
/// row `i / cols`, offset by `padding` pixels between cells. Unused
/// trailing cells (grid layout) stay transparent.
pub fn compose(frames: &FrameSequence, layout: SheetLayout, padding: u32) -> RgbaImage {
    let (cols, rows) = grid_dimensions(frames.len(), layout);
    let fw = frames.width();
    let fh = frames.height();

    let sheet_w = cols * fw + cols.saturating_sub(1) * padding;
    let sheet_h = rows * fh + rows.saturating_sub(1) * padding;
    let mut sheet = RgbaImage::new(sheet_w, sheet_h);

    for (idx, frame) in frames.frames().iter().enumerate() {
        let col = idx as u32 % cols;
        let row = idx as u32 / cols;
        let x0 = col * (fw + padding);
        let y0 = row * (fh + padding);

        for y in 0..fh {
            for x in 0..fw {
                if let Some(px) = frame.raster.get(x, y) {
                    sheet.put_pixel(x0 + x, y0 + y, image::Rgba([px.r, px.g, px.b, px.a]));
                }
            }
        }
    }

    sheet
}

/// Encode a composed sheet as PNG bytes.
pub fn encode_png(sheet: &RgbaImage) -> Result<Vec<u8>, SpriteError> {
    let mut buffer = Cursor::new(Vec::new());
    sheet
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| SpriteError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
