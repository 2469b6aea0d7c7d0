//! Rendering backend and image loader seams.
//!
//! The layout pipeline never rasterizes glyphs itself. It asks a
//! [`GlyphRenderer`] for one bitmap per run of same-environment characters
//! and an [`ImageLoader`] for `/img{...}` content. Both are plain traits so
//! hosts can plug in a real font rasterizer; [`CellRenderer`] and the loaders
//! in this module are small deterministic implementations.

mod cell;
mod image;

pub use cell::CellRenderer;
pub use image::{MemoryImageLoader, NullImageLoader};

use std::fmt;

use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::error::{Error, Result};

/// Reference to a font: a name or path plus a pixel size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontRef {
    pub name: String,
    pub size: u32,
}

impl FontRef {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Parse the `name,size` argument list of a `font` directive.
    ///
    /// The size follows the last comma so that names may contain commas.
    pub fn from_markup_args(args: &str) -> Result<Self> {
        let invalid = || Error::InvalidArguments {
            name: "font".to_string(),
            args: args.to_string(),
        };
        let (name, size) = args.rsplit_once(',').ok_or_else(invalid)?;
        let name = name.trim();
        let size = size.trim().parse::<u32>().map_err(|_| invalid())?;
        if name.is_empty() || size == 0 {
            return Err(invalid());
        }
        Ok(Self::new(name, size))
    }
}

impl Default for FontRef {
    fn default() -> Self {
        Self::new("default", 8)
    }
}

impl fmt::Display for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}px", self.name, self.size)
    }
}

/// Turns a run of characters into a bitmap.
///
/// Implementations must be deterministic for identical inputs. The returned
/// bitmap's height is the font's natural line height, even for a string made
/// only of spaces.
pub trait GlyphRenderer {
    /// Render `text` in `font` with the given colors.
    fn render(&self, text: &str, font: &FontRef, color: Rgba, background: Rgba) -> Result<Bitmap>;

    /// Natural line height of `font` in pixels.
    fn line_height(&self, font: &FontRef) -> u32;
}

/// Loads inline images referenced by `/img{path}`.
pub trait ImageLoader {
    fn load(&self, path: &str) -> Result<Bitmap>;
}
