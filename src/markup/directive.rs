//! Directive and function-call grammar.
//!
//! ```text
//! directive  := '{' name (ws args)? ws* ';'      (closed later by '}')
//! function   := '/' special | '/' 'n' | '/' name '{' args '}'
//! special    := '/' | '{' | '}'
//! ```
//!
//! Names are word characters (alphanumerics and `_`). Both scanners consume
//! from the interpreter's cursor and never backtrack.

use std::str::Chars;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::markup::environment::EnvSetting;
use crate::markup::macros::MacroRegistry;
use crate::render::FontRef;

/// Characters that `/` turns into literals.
pub const SPECIALS: [char; 3] = ['/', '{', '}'];

/// `/n` injects a literal newline.
pub const NEWLINE_ESCAPE: char = 'n';

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Built-in directive kinds, plus the macro kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    Macro,
    Background,
    Color,
    Font,
    Link,
    Editor,
}

const BUILTIN_DIRECTIVES: [(&str, DirectiveKind); 5] = [
    ("bkg", DirectiveKind::Background),
    ("color", DirectiveKind::Color),
    ("font", DirectiveKind::Font),
    ("link", DirectiveKind::Link),
    ("editor", DirectiveKind::Editor),
];

impl DirectiveKind {
    /// Resolve a directive name. Macros shadow built-ins.
    #[must_use]
    pub fn resolve(name: &str, macros: &MacroRegistry) -> Option<Self> {
        if macros.directive(name).is_some() {
            return Some(Self::Macro);
        }
        BUILTIN_DIRECTIVES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, kind)| *kind)
    }
}

/// A resolved directive.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Enter an environment with this setting.
    Enter(EnvSetting),
    /// Create an embedded widget and enter a link environment named after it.
    Editor { name: String, width: u32 },
}

/// A directive as written, before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDirective {
    pub name: String,
    pub args: String,
}

impl RawDirective {
    /// Read the rest of a directive after its opening `{`, through the `;`.
    pub fn read(chars: &mut Chars<'_>) -> Result<Self> {
        let mut body = String::new();
        for c in chars.by_ref() {
            if c == ';' {
                return Self::parse(&body);
            }
            body.push(c);
        }
        Err(Error::UnexpectedEnd {
            construct: "directive",
        })
    }

    fn parse(body: &str) -> Result<Self> {
        let trimmed = body.trim();
        let name_end = trimmed
            .find(|c: char| !is_word_char(c))
            .unwrap_or(trimmed.len());
        let (name, rest) = trimmed.split_at(name_end);
        if name.is_empty() || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            return Err(Error::MarkupSyntax {
                name: trimmed.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            args: rest.trim().to_string(),
        })
    }

    fn invalid(&self) -> Error {
        Error::InvalidArguments {
            name: self.name.clone(),
            args: self.args.clone(),
        }
    }

    /// Resolve against the macro table and the built-in directives.
    pub fn resolve(&self, macros: &MacroRegistry) -> Result<Directive> {
        let kind =
            DirectiveKind::resolve(&self.name, macros).ok_or_else(|| Error::MarkupSyntax {
                name: self.name.clone(),
            })?;
        let args = self.args.as_str();
        match kind {
            DirectiveKind::Macro => macros
                .directive(&self.name)
                .cloned()
                .map(Directive::Enter)
                .ok_or_else(|| Error::MarkupSyntax {
                    name: self.name.clone(),
                }),
            DirectiveKind::Background => Rgba::from_markup_args(args)
                .map(|c| Directive::Enter(EnvSetting::Background(c)))
                .ok_or_else(|| self.invalid()),
            DirectiveKind::Color => Rgba::from_markup_args(args)
                .map(|c| Directive::Enter(EnvSetting::Color(c)))
                .ok_or_else(|| self.invalid()),
            DirectiveKind::Font => {
                FontRef::from_markup_args(args).map(|f| Directive::Enter(EnvSetting::Font(f)))
            }
            DirectiveKind::Link if args.is_empty() => Err(self.invalid()),
            DirectiveKind::Link => Ok(Directive::Enter(EnvSetting::Link(Some(
                args.to_string(),
            )))),
            DirectiveKind::Editor => {
                let (name, width) = args.split_once(',').ok_or_else(|| self.invalid())?;
                let name = name.trim();
                let width = width.trim().parse::<u32>().map_err(|_| self.invalid())?;
                if name.is_empty() || width == 0 {
                    return Err(self.invalid());
                }
                Ok(Directive::Editor {
                    name: name.to_string(),
                    width,
                })
            }
        }
    }
}

/// Built-in function kinds, plus the macro kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Macro,
    Space,
    Img,
}

const BUILTIN_FUNCTIONS: [(&str, FunctionKind); 2] =
    [("space", FunctionKind::Space), ("img", FunctionKind::Img)];

impl FunctionKind {
    /// Resolve a function name. Macros shadow built-ins.
    #[must_use]
    pub fn resolve(name: &str, macros: &MacroRegistry) -> Option<Self> {
        if macros.function(name).is_some() {
            return Some(Self::Macro);
        }
        BUILTIN_FUNCTIONS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, kind)| *kind)
    }
}

/// A function call as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionCall {
    /// An escaped special or the newline escape.
    Literal(char),
    /// `name{args}`.
    Call { name: String, args: String },
    /// Text up to a `}` that is not `name{args}`.
    Malformed(String),
}

impl FunctionCall {
    /// Read the rest of a function call after its `/`.
    pub fn read(chars: &mut Chars<'_>) -> Result<Self> {
        let first = chars.next().ok_or(Error::UnexpectedEnd {
            construct: "function call",
        })?;
        if SPECIALS.contains(&first) {
            return Ok(Self::Literal(first));
        }
        if first == NEWLINE_ESCAPE {
            return Ok(Self::Literal('\n'));
        }

        let mut text = String::from(first);
        for c in chars.by_ref() {
            if c == '}' {
                return Ok(Self::parse(text));
            }
            text.push(c);
        }
        Err(Error::UnexpectedEnd {
            construct: "function call",
        })
    }

    fn parse(text: String) -> Self {
        match text.split_once('{') {
            Some((name, args)) if !name.is_empty() && name.chars().all(is_word_char) => {
                Self::Call {
                    name: name.to_string(),
                    args: args.to_string(),
                }
            }
            _ => Self::Malformed(text),
        }
    }
}
