//! Tokens: the indivisible units of line wrapping.
//!
//! Every whitespace atom becomes a token of its own. Maximal runs of
//! non-whitespace atoms become one token each, even when the run spans
//! several environments; such a token is rendered piecewise and glued
//! together bottom-aligned.

use std::collections::VecDeque;
use std::fmt;
use std::mem;

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::geometry::Rect;
use crate::layout::links::LinkMap;
use crate::markup::{Atom, Environment, InterpretedRun};
use crate::render::GlyphRenderer;

/// A rendered, indivisible unit of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    bitmap: Bitmap,
    content: String,
    whitespace: bool,
    links: LinkMap,
}

impl Token {
    /// Render a token from the runs that make it up.
    pub fn build(parts: &[InterpretedRun], renderer: &dyn GlyphRenderer) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut link_rects = Vec::new();
        let mut content = String::new();
        let mut whitespace = true;
        let mut x = 0u32;

        for part in parts {
            let env = &part.env;
            let mut text = String::new();
            let mut segment = Vec::new();
            for atom in &part.atoms {
                content.push(atom.as_char());
                if !atom.is_whitespace() {
                    whitespace = false;
                }
                match atom {
                    Atom::Char('\n') => {
                        render_text(renderer, env, &mut text, &mut segment)?;
                        segment.push(Bitmap::new(0, renderer.line_height(&env.font)));
                    }
                    Atom::Char(c) if c.is_whitespace() => text.push(' '),
                    Atom::Char(c) => text.push(*c),
                    Atom::Image(bitmap) => {
                        render_text(renderer, env, &mut text, &mut segment)?;
                        segment.push(bitmap.clone());
                    }
                }
            }
            render_text(renderer, env, &mut text, &mut segment)?;
            if segment.is_empty() {
                continue;
            }

            let width: u32 = segment.iter().map(Bitmap::width).sum();
            let height = segment.iter().map(Bitmap::height).max().unwrap_or(0);
            if let Some(link) = &env.link {
                link_rects.push((link.clone(), Rect::new(x as i32, 0, width, height)));
            }
            x += width;
            pieces.extend(segment);
        }

        let height = pieces.iter().map(Bitmap::height).max().unwrap_or(0);
        let mut bitmap = Bitmap::new(x, height);
        let mut px = 0;
        for piece in &pieces {
            bitmap.blit(piece, px, (height - piece.height()) as i32);
            px += piece.width() as i32;
        }

        let mut links = LinkMap::new();
        for (link, rect) in link_rects {
            let y = (height - rect.height) as i32;
            links.push(&link, Rect { y, ..rect });
        }

        Ok(Self {
            bitmap,
            content,
            whitespace,
            links,
        })
    }

    /// A copy resampled to `width` x `height`, with link rectangles scaled to
    /// match and kept bottom-aligned.
    #[must_use]
    pub fn rescaled(&self, width: u32, height: u32) -> Self {
        let (old_w, old_h) = self.bitmap.size();
        let scale = |value: u32, new: u32, old: u32| -> u32 {
            if old == 0 {
                value
            } else {
                (u64::from(value) * u64::from(new) / u64::from(old)) as u32
            }
        };

        let mut links = self.links.clone();
        links.map_rects(|rect| {
            let w = scale(rect.width, width, old_w);
            let h = scale(rect.height, height, old_h);
            let x = scale(rect.x.max(0) as u32, width, old_w) as i32;
            Rect::new(x, height.saturating_sub(h) as i32, w, h)
        });

        Self {
            bitmap: self.bitmap.scaled(width, height),
            content: self.content.clone(),
            whitespace: self.whitespace,
            links,
        }
    }

    #[must_use]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if every atom in the token is whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.whitespace
    }

    #[must_use]
    pub fn is_forced_break(&self) -> bool {
        self.content == "\n"
    }

    /// Link rectangles in token-local coordinates.
    #[must_use]
    pub fn links(&self) -> &LinkMap {
        &self.links
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

fn render_text(
    renderer: &dyn GlyphRenderer,
    env: &Environment,
    text: &mut String,
    segment: &mut Vec<Bitmap>,
) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    segment.push(renderer.render(text, &env.font, env.color, env.background)?);
    text.clear();
    Ok(())
}

/// Lazily regroups interpreted runs into rendered tokens.
pub struct Tokens<'r, I> {
    runs: I,
    renderer: &'r dyn GlyphRenderer,
    pending: Vec<InterpretedRun>,
    ready: VecDeque<Vec<InterpretedRun>>,
    exhausted: bool,
}

impl<'r, I> Tokens<'r, I>
where
    I: Iterator<Item = InterpretedRun>,
{
    pub fn new(runs: I, renderer: &'r dyn GlyphRenderer) -> Self {
        Self {
            runs,
            renderer,
            pending: Vec::new(),
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    fn split(&mut self, run: InterpretedRun) {
        let InterpretedRun { env, atoms } = run;
        let mut chunk = Vec::new();
        for atom in atoms {
            if !atom.is_whitespace() {
                chunk.push(atom);
                continue;
            }
            if !chunk.is_empty() {
                self.pending
                    .push(InterpretedRun::new(env.clone(), mem::take(&mut chunk)));
            }
            if !self.pending.is_empty() {
                self.ready.push_back(mem::take(&mut self.pending));
            }
            self.ready
                .push_back(vec![InterpretedRun::new(env.clone(), vec![atom])]);
        }
        if !chunk.is_empty() {
            self.pending.push(InterpretedRun::new(env, chunk));
        }
    }
}

impl<I> Iterator for Tokens<'_, I>
where
    I: Iterator<Item = InterpretedRun>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(parts) = self.ready.pop_front() {
                return Some(Token::build(&parts, self.renderer));
            }
            if self.exhausted {
                return None;
            }
            match self.runs.next() {
                Some(run) => self.split(run),
                None => {
                    self.exhausted = true;
                    if !self.pending.is_empty() {
                        self.ready.push_back(mem::take(&mut self.pending));
                    }
                }
            }
        }
    }
}
