//! Deterministic collaborators shared by the integration tests.

#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Each test binary uses a different subset

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use glyph_rust::layout::{Line, Tokens, Wrapper};
use glyph_rust::markup::{Environment, InterpretedRun, Interpreter, MacroRegistry};
use glyph_rust::{
    Bitmap, FontRef, GlyphRenderer, Justify, KeyEvent, LayoutBuffer, LayoutOptions,
    NullImageLoader, Rect, Result, Rgba, Widget, WidgetFactory, Widgets,
};

/// Pixels per character of [`FixedRenderer`].
pub const ADVANCE: u32 = 5;

pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Every character is [`ADVANCE`] pixels wide and the font size tall.
/// Glyphs are solid foreground blocks; spaces are background.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedRenderer;

impl GlyphRenderer for FixedRenderer {
    fn render(&self, text: &str, font: &FontRef, color: Rgba, background: Rgba) -> Result<Bitmap> {
        let height = self.line_height(font);
        let mut bitmap = Bitmap::filled(text.chars().count() as u32 * ADVANCE, height, background);
        for (i, c) in text.chars().enumerate() {
            if !c.is_whitespace() {
                bitmap.fill_rect(
                    Rect::new(i as i32 * ADVANCE as i32, 0, ADVANCE, height),
                    color,
                );
            }
        }
        Ok(bitmap)
    }

    fn line_height(&self, font: &FontRef) -> u32 {
        font.size
    }
}

pub fn layout(width: u32, height: u32) -> LayoutBuffer {
    layout_with(width, height, LayoutOptions::default())
}

pub fn layout_with(width: u32, height: u32, options: LayoutOptions) -> LayoutBuffer {
    LayoutBuffer::new(Rect::sized(width, height), Rc::new(FixedRenderer), options)
        .expect("non-zero layout width")
}

/// Interpret `text` with default settings and no widgets.
pub fn interpret(text: &str) -> Result<Vec<InterpretedRun>> {
    let defaults = Environment::default();
    let macros = MacroRegistry::new();
    let mut widgets = Widgets::default();
    Interpreter::new(&macros, &NullImageLoader, &mut widgets, &defaults).interpret(text)
}

/// Run the whole pipeline without a layout buffer.
pub fn wrap(text: &str, width: u32, justify: Justify) -> Result<Vec<Line>> {
    let runs = interpret(text)?;
    let tokens = Tokens::new(runs.into_iter(), &FixedRenderer);
    Wrapper::new(tokens, width, justify).collect()
}

/// `[a| |b]` per line, one line per row.
pub fn render_lines<'a>(lines: impl IntoIterator<Item = &'a Line>) -> String {
    lines
        .into_iter()
        .map(|line| {
            let tokens: Vec<String> = line
                .tokens()
                .iter()
                .map(|token| token.content().escape_default().to_string())
                .collect();
            format!("[{}]", tokens.join("|"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Widget that records the keys it receives and shows a solid block.
pub struct RecordingWidget {
    pub keys: Rc<RefCell<Vec<KeyEvent>>>,
    pub width: u32,
    pub height: u32,
}

impl Widget for RecordingWidget {
    fn input(&mut self, key: KeyEvent) {
        self.keys.borrow_mut().push(key);
    }

    fn current_bitmap(&self) -> Bitmap {
        Bitmap::filled(self.width, self.height, Rgba::GREEN)
    }
}

#[derive(Default)]
pub struct RecordingFactory {
    pub keys: Rc<RefCell<Vec<KeyEvent>>>,
}

impl WidgetFactory for RecordingFactory {
    fn create(&self, _name: &str, width: u32, env: &Environment) -> Box<dyn Widget> {
        Box::new(RecordingWidget {
            keys: Rc::clone(&self.keys),
            width,
            height: env.font.size,
        })
    }
}
