//! `glyph_rust` - inline markup to wrapped, justified pixel lines
//!
//! Text is written in a small markup language (nested `{color 255,0,0;...}`,
//! `{font name,size;...}`, `{link id;...}` environments and `/name{args}`
//! function calls), interpreted into environment-tagged runs, split into
//! tokens on whitespace, and wrapped greedily into lines of a fixed pixel
//! width. Lines can be left, right, center or fully justified; full
//! justification distributes the free space over whitespace without rounding
//! drift. Link rectangles survive every stage and can be hit-tested once the
//! lines are painted.
//!
//! Rendering glyphs and loading images are left to [`GlyphRenderer`] and
//! [`ImageLoader`] implementations; [`CellRenderer`] and
//! [`MemoryImageLoader`] are simple deterministic ones.

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional pixel coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow layout::LayoutBuffer etc
#![allow(clippy::missing_errors_doc)] // Error variants are documented on Error
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod bitmap;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod markup;
pub mod render;
pub mod unicode;
pub mod widget;

// Re-export core types at crate root
pub use bitmap::Bitmap;
pub use color::Rgba;
pub use error::{Error, Result};
pub use event::{
    EVENT_LINE_PAINTED, EVENT_WIDGET_INPUT, LogLevel, clear_log_callback, emit_event, emit_log,
    set_event_callback, set_log_callback,
};
pub use geometry::{Point, Rect};

// Re-export pipeline types
pub use layout::{Justify, LayoutBuffer, LayoutGroup, LayoutOptions, Line, LinkMap, Token};
pub use markup::{EnvSetting, Environment, FunctionCallMode, FunctionMacro, MacroRegistry};

// Re-export collaborator interfaces
pub use input::{KeyCode, KeyEvent, KeyModifiers};
pub use render::{
    CellRenderer, FontRef, GlyphRenderer, ImageLoader, MemoryImageLoader, NullImageLoader,
};
pub use unicode::WidthMethod;
pub use widget::{TextField, TextFieldFactory, Widget, WidgetFactory, Widgets};
