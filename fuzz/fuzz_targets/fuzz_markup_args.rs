//! Fuzz target for directive argument parsing.
//!
//! Tests that color, font and justification arguments reject arbitrary
//! strings without panicking.

#![no_main]

use glyph_rust::{FontRef, Justify, Rgba};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Some(color) = Rgba::from_markup_args(data) {
        assert!(color.is_opaque());
    }
    if let Ok(font) = FontRef::from_markup_args(data) {
        assert!(font.size > 0);
    }
    let _ = data.parse::<Justify>();
});
