//! Monospace cell renderer.

use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Rect;
use crate::render::{FontRef, GlyphRenderer};
use crate::unicode::{WidthMethod, grapheme_cells};

/// Renders text on a fixed cell grid.
///
/// A font of size `s` gets cells `max(1, s / 2)` pixels wide and `s` pixels
/// tall. Each grapheme covers as many cells as its display width. Blank
/// graphemes are background only; every other grapheme is drawn as a solid
/// box in the foreground color, inset by one pixel on the right and at the
/// top so adjacent glyphs stay distinguishable.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellRenderer {
    method: WidthMethod,
}

impl CellRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `method` to resolve ambiguous-width characters.
    #[must_use]
    pub fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.method = method;
        self
    }

    /// Width of a single cell for `font`.
    #[must_use]
    pub fn cell_width(font: &FontRef) -> u32 {
        (font.size / 2).max(1)
    }
}

impl GlyphRenderer for CellRenderer {
    fn render(&self, text: &str, font: &FontRef, color: Rgba, background: Rgba) -> Result<Bitmap> {
        let cell_w = Self::cell_width(font);
        let height = self.line_height(font);
        let cells = grapheme_cells(text, self.method);
        let columns = cells.last().map_or(0, |cell| cell.col + cell.width);

        let mut bitmap = Bitmap::filled(columns * cell_w, height, background);
        for cell in cells.iter().filter(|cell| !cell.blank) {
            let x = (cell.col * cell_w) as i32;
            let glyph_w = (cell.width * cell_w).saturating_sub(1).max(1);
            let glyph_h = height.saturating_sub(1).max(1);
            bitmap.fill_rect(Rect::new(x, 1, glyph_w, glyph_h), color);
        }
        Ok(bitmap)
    }

    fn line_height(&self, font: &FontRef) -> u32 {
        font.size.max(1)
    }
}
