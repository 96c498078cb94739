//! Bitmap text for text annotations
//!
//! Glyphs come from the embedded 8x8 font, so text rasterizes identically on
//! every machine without loading system fonts.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use tiny_skia::{Path, PathBuilder, Rect};

use crate::domain::Point;

/// Glyph cells per side in the embedded font
const GLYPH_CELLS: f32 = 8.0;

/// Line height relative to the font size
const LINE_HEIGHT: f32 = 1.25;

fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch))
}

/// Build a fillable path for `text` with its first baseline at `anchor`
///
/// Each glyph occupies a `font_size` square; characters missing from the font
/// leave a blank cell. Returns `None` when nothing would be drawn.
pub fn text_path(anchor: Point, text: &str, font_size: f32) -> Option<Path> {
    let cell = font_size / GLYPH_CELLS;
    let mut pb = PathBuilder::new();

    for (line_index, line) in text.lines().enumerate() {
        let top = anchor.y - font_size + line_index as f32 * font_size * LINE_HEIGHT;
        for (col, ch) in line.chars().enumerate() {
            let Some(rows) = glyph(ch) else {
                continue;
            };
            let left = anchor.x + col as f32 * font_size;
            for (row, bits) in rows.iter().enumerate() {
                for bit in 0..8 {
                    if bits & (1 << bit) == 0 {
                        continue;
                    }
                    let x = left + bit as f32 * cell;
                    let y = top + row as f32 * cell;
                    if let Some(rect) = Rect::from_xywh(x, y, cell, cell) {
                        pb.push_rect(rect);
                    }
                }
            }
        }
    }

    pb.finish()
}
