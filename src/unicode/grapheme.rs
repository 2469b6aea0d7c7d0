//! Grapheme cluster iteration and cell placement.

use crate::unicode::width::{WidthMethod, display_width_with_method};
use unicode_segmentation::UnicodeSegmentation;

/// Placement of one grapheme cluster in a monospace cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphemeCell {
    /// Column where the cluster starts.
    pub col: u32,
    /// Number of columns the cluster covers.
    pub width: u32,
    /// Whether the cluster is whitespace (drawn as background only).
    pub blank: bool,
}

/// Iterate over grapheme clusters in a string.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Lay out the grapheme clusters of `s` left to right.
///
/// Zero-width clusters (a lone combining mark, control characters) still
/// occupy one column so that every visible cluster gets drawn somewhere.
#[must_use]
pub fn grapheme_cells(s: &str, method: WidthMethod) -> Vec<GraphemeCell> {
    let mut cells = Vec::new();
    let mut col = 0u32;
    for grapheme in graphemes(s) {
        let width = display_width_with_method(grapheme, method).max(1) as u32;
        cells.push(GraphemeCell {
            col,
            width,
            blank: grapheme.chars().all(char::is_whitespace),
        });
        col += width;
    }
    cells
}
