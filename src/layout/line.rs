//! Composited lines and justification.

use std::fmt;
use std::str::FromStr;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::layout::links::LinkMap;
use crate::layout::token::Token;

/// Horizontal placement of a line's tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Justify {
    #[default]
    Left,
    Right,
    Center,
    /// Stretch whitespace so the line fills the width exactly.
    Justified,
}

impl Justify {
    /// Lines ended by a forced break, and the final line, are never stretched.
    #[must_use]
    pub fn for_forced_break(self) -> Self {
        match self {
            Self::Justified => Self::Left,
            other => other,
        }
    }
}

impl FromStr for Justify {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            "justified" => Ok(Self::Justified),
            other => Err(Error::InvalidArguments {
                name: "justify".to_string(),
                args: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Justify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Justified => "justified",
        })
    }
}

/// Tokens composited into a bitmap of the full line width.
///
/// The bitmap is as tall as the tallest token; tokens sit on its bottom edge.
/// Pixels not covered by a token are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    tokens: Vec<Token>,
    bitmap: Bitmap,
    links: LinkMap,
    justify: Justify,
}

impl Line {
    pub fn new(tokens: Vec<Token>, width: u32, justify: Justify) -> Self {
        let used: u32 = tokens.iter().map(Token::width).sum();
        let height = tokens.iter().map(Token::height).max().unwrap_or(0);
        let free = width.saturating_sub(used);

        let (tokens, mut x) = match justify {
            Justify::Left => (tokens, 0),
            Justify::Right => (tokens, free),
            Justify::Center => (tokens, free / 2),
            Justify::Justified => (stretch_whitespace(tokens, free), 0),
        };

        let mut bitmap = Bitmap::new(width, height);
        let mut links = LinkMap::new();
        for token in &tokens {
            let y = (height - token.height()) as i32;
            bitmap.blit(token.bitmap(), x as i32, y);
            links.extend_translated(token.links(), x as i32, y);
            x += token.width();
        }

        Self {
            tokens,
            bitmap,
            links,
            justify,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Link rectangles in line-local coordinates.
    #[must_use]
    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    #[must_use]
    pub fn justify(&self) -> Justify {
        self.justify
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Widen whitespace tokens so their widths sum to their old total plus `free`.
///
/// Each token gets `w * (total + free) / total` pixels. The fractional parts
/// are carried in an exact remainder, so the rounded widths add up to the
/// target with no drift.
fn stretch_whitespace(tokens: Vec<Token>, free: u32) -> Vec<Token> {
    let total: u64 = tokens
        .iter()
        .filter(|token| token.is_whitespace())
        .map(|token| u64::from(token.width()))
        .sum();
    if total == 0 || free == 0 {
        return tokens;
    }

    let target = total + u64::from(free);
    let mut carry = 0u64;
    tokens
        .into_iter()
        .map(|token| {
            if !token.is_whitespace() || token.width() == 0 {
                return token;
            }
            let scaled = u64::from(token.width()) * target;
            let mut width = scaled / total;
            carry += scaled % total;
            if carry >= total {
                carry -= total;
                width += 1;
            }
            token.rescaled(width as u32, token.height())
        })
        .collect()
}
