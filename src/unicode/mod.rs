//! Unicode helpers for measuring rendered text.

mod grapheme;
mod width;

pub use grapheme::{GraphemeCell, grapheme_cells, graphemes};
pub use width::{WidthMethod, display_width, display_width_with_method};
