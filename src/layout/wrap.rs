//! Greedy first-fit line wrapping with take-back.

use std::mem;

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::layout::line::{Justify, Line};
use crate::layout::token::Token;

/// Wraps a token stream into lines of a fixed width.
///
/// Tokens are appended until the line overflows. The token that overflowed is
/// then taken back, a whitespace token left at the end is dropped, and the
/// line is emitted; the taken-back token starts the next line unless it is
/// whitespace. A forced break ends the line at once.
///
/// The first error, from upstream or from a token wider than the line, ends
/// the stream.
pub struct Wrapper<I> {
    tokens: I,
    width: u32,
    justify: Justify,
    line: Vec<Token>,
    line_width: u32,
    done: bool,
}

impl<I> Wrapper<I>
where
    I: Iterator<Item = Result<Token>>,
{
    pub fn new(tokens: I, width: u32, justify: Justify) -> Self {
        Self {
            tokens,
            width,
            justify,
            line: Vec::new(),
            line_width: 0,
            done: false,
        }
    }

    fn emit(&mut self, justify: Justify) -> Line {
        let tokens = mem::take(&mut self.line);
        self.line_width = 0;
        let line = Line::new(tokens, self.width, justify);
        emit_log(
            LogLevel::Debug,
            &format!("wrapped line ({justify}): {:?}", line.to_string()),
        );
        line
    }

    fn overflow(&mut self, token: &Token) -> Error {
        self.done = true;
        let err = Error::LayoutOverflow {
            token: token.to_string(),
            excess: token.width() - self.width,
        };
        emit_log(LogLevel::Error, &err.to_string());
        err
    }

    /// Handle a line that just grew past the width.
    fn take_back(&mut self) -> Option<Line> {
        let last = self.line.pop()?;
        self.line_width -= last.width();
        if self.line.last().is_some_and(Token::is_whitespace) {
            if let Some(trailing) = self.line.pop() {
                self.line_width -= trailing.width();
            }
        }

        let line = (!self.line.is_empty()).then(|| self.emit(self.justify));
        if !last.is_whitespace() {
            self.line_width = last.width();
            self.line.push(last);
        }
        line
    }
}

impl<I> Iterator for Wrapper<I>
where
    I: Iterator<Item = Result<Token>>,
{
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(token) = self.tokens.next() {
            let token = match token {
                Ok(token) => token,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            if token.width() > self.width {
                return Some(Err(self.overflow(&token)));
            }

            let forced = token.is_forced_break();
            self.line_width += token.width();
            self.line.push(token);

            if forced {
                return Some(Ok(self.emit(self.justify.for_forced_break())));
            }
            if self.line_width > self.width {
                if let Some(line) = self.take_back() {
                    return Some(Ok(line));
                }
            }
        }

        self.done = true;
        (!self.line.is_empty()).then(|| Ok(self.emit(self.justify.for_forced_break())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::markup::{Atom, Environment, InterpretedRun};
    use crate::render::{CellRenderer, FontRef};

    fn tokens(text: &str) -> Vec<Result<Token>> {
        let env = Environment::new(Rgba::BLACK, Rgba::WHITE, FontRef::new("mono", 10));
        let run = InterpretedRun::new(env, text.chars().map(Atom::Char).collect());
        let renderer = CellRenderer::new();
        crate::layout::Tokens::new(std::iter::once(run), &renderer).collect()
    }

    fn wrap(text: &str, width: u32, justify: Justify) -> Result<Vec<Line>> {
        Wrapper::new(tokens(text).into_iter(), width, justify).collect()
    }

    fn contents(lines: &[Line]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.tokens().iter().map(ToString::to_string).collect())
            .collect()
    }

    // ============================================
    // Greedy wrapping
    // ============================================

    #[test]
    fn test_wrap_drops_trailing_space() {
        // "one two" is exactly 35px.
        let lines = wrap("one two three", 35, Justify::Left).unwrap();
        assert_eq!(
            contents(&lines),
            vec![vec!["one", " ", "two"], vec!["three"]]
        );
    }

    #[test]
    fn test_everything_fits_on_one_line() {
        let lines = wrap("a b c", 100, Justify::Left).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "a b c");
    }

    #[test]
    fn test_overflowing_space_is_not_carried() {
        // "ab" fills the line; the following space overflows on its own.
        let lines = wrap("ab cd", 10, Justify::Left).unwrap();
        assert_eq!(contents(&lines), vec![vec!["ab"], vec!["cd"]]);
    }

    #[test]
    fn test_forced_break_emits_immediately() {
        let lines = wrap("a\nb", 100, Justify::Left).unwrap();
        assert_eq!(contents(&lines), vec![vec!["a", "\n"], vec!["b"]]);
    }

    #[test]
    fn test_forced_and_final_lines_are_not_justified() {
        let lines = wrap("a b\nc d e f", 30, Justify::Justified).unwrap();
        assert_eq!(lines[0].justify(), Justify::Left);
        assert_eq!(lines[1].justify(), Justify::Justified);
        assert_eq!(lines.last().map(Line::justify), Some(Justify::Left));
    }

    #[test]
    fn test_right_justify_is_kept_for_forced_break() {
        let lines = wrap("a\nb", 100, Justify::Right).unwrap();
        assert!(lines.iter().all(|line| line.justify() == Justify::Right));
    }

    // ============================================
    // Errors
    // ============================================

    #[test]
    fn test_token_too_wide() {
        let err = wrap("fine enormous", 30, Justify::Left).unwrap_err();
        assert_eq!(
            err,
            Error::LayoutOverflow {
                token: "enormous".to_string(),
                excess: 10
            }
        );
    }

    #[test]
    fn test_overflow_raised_before_any_line() {
        let mut wrapper = Wrapper::new(tokens("toolong").into_iter(), 10, Justify::Left);
        assert!(matches!(wrapper.next(), Some(Err(Error::LayoutOverflow { .. }))));
        assert!(wrapper.next().is_none());
    }

    #[test]
    fn test_empty_stream() {
        assert!(wrap("", 10, Justify::Left).unwrap().is_empty());
    }
}
