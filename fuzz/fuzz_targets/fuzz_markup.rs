//! Fuzz target for the full markup pipeline.
//!
//! Arbitrary markup must either lay out or return an error, never panic, and
//! whatever lays out must fit the layout width.

#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use glyph_rust::{CellRenderer, Justify, LayoutBuffer, LayoutOptions, Point, Rect};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    width: u8,
    height: u8,
    justify: u8,
}

fuzz_target!(|input: Input<'_>| {
    let width = u32::from(input.width).max(1);
    let Ok(mut layout) = LayoutBuffer::new(
        Rect::sized(width, u32::from(input.height)),
        Rc::new(CellRenderer::new()),
        LayoutOptions::default(),
    ) else {
        return;
    };
    let justify = match input.justify % 4 {
        0 => Justify::Left,
        1 => Justify::Right,
        2 => Justify::Center,
        _ => Justify::Justified,
    };

    if layout.input(input.text, Some(justify)).is_ok() {
        for line in layout.pending_lines() {
            assert_eq!(line.width(), width);
        }
        layout.update();
        layout.scroll();
        let _ = layout.get_collisions(Point::new(1, 1));
    }
});
