//! The markup interpreter.
//!
//! A single forward scan turns marked-up text into [`InterpretedRun`]s: each
//! run pairs an [`Environment`] snapshot with the atoms written under it.
//!
//! The scan does not recurse: `{` pushes onto the call's own [`EnvStack`]
//! and the matching `}` pops it. The stack lives and dies with one
//! [`Interpreter::interpret`] call.

use std::mem;
use std::str::Chars;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::event::{EVENT_WIDGET_INPUT, LogLevel, emit_event, emit_log};
use crate::input::KeyEvent;
use crate::markup::directive::{Directive, FunctionCall, FunctionKind, RawDirective};
use crate::markup::environment::{EnvSetting, EnvStack, Environment};
use crate::markup::macros::{FunctionMacro, MacroRegistry};
use crate::render::ImageLoader;
use crate::widget::Widgets;

/// Stand-in content for an inline bitmap in a token's text form.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// One unit of interpreted content.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Char(char),
    /// Spacers, images and widget snapshots.
    Image(Bitmap),
}

impl Atom {
    /// Inline bitmaps never count as whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Char(c) if c.is_whitespace())
    }

    /// The character this atom contributes to a token's content.
    #[must_use]
    pub fn as_char(&self) -> char {
        match self {
            Self::Char(c) => *c,
            Self::Image(_) => OBJECT_REPLACEMENT,
        }
    }
}

/// Atoms written under one environment.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpretedRun {
    pub env: Environment,
    pub atoms: Vec<Atom>,
}

impl InterpretedRun {
    #[must_use]
    pub fn new(env: Environment, atoms: Vec<Atom>) -> Self {
        Self { env, atoms }
    }

    /// The run's content as text; inline bitmaps become U+FFFC.
    #[must_use]
    pub fn text(&self) -> String {
        self.atoms.iter().map(Atom::as_char).collect()
    }
}

/// What to do with a function call that names nothing known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FunctionCallMode {
    /// Drop the call and log a warning.
    #[default]
    Lenient,
    /// Fail with [`Error::UnknownFunction`].
    Strict,
}

/// Interprets one piece of marked-up text.
///
/// An interpreter is single use: [`interpret`](Self::interpret) consumes it.
pub struct Interpreter<'a> {
    macros: &'a MacroRegistry,
    images: &'a dyn ImageLoader,
    widgets: &'a mut Widgets,
    defaults: &'a Environment,
    mode: FunctionCallMode,
    buffer: Vec<Atom>,
    prev_whitespace: bool,
    runs: Vec<InterpretedRun>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        macros: &'a MacroRegistry,
        images: &'a dyn ImageLoader,
        widgets: &'a mut Widgets,
        defaults: &'a Environment,
    ) -> Self {
        Self {
            macros,
            images,
            widgets,
            defaults,
            mode: FunctionCallMode::default(),
            buffer: Vec::new(),
            prev_whitespace: true,
            runs: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: FunctionCallMode) -> Self {
        self.mode = mode;
        self
    }

    /// Interpret `text`. Leading and trailing whitespace is ignored.
    pub fn interpret(mut self, text: &str) -> Result<Vec<InterpretedRun>> {
        let mut stack = EnvStack::new(self.defaults);
        let mut chars = text.trim().chars();
        while let Some(c) = chars.next() {
            match c {
                '/' => self.function(&mut chars)?,
                '{' => {
                    self.flush(&stack);
                    let setting = self.directive(&mut chars, &stack)?;
                    emit_log(LogLevel::Debug, &format!("entering environment {setting:?}"));
                    stack.push(setting);
                }
                '}' => {
                    if stack.depth() == 0 {
                        return Err(Error::UnbalancedClose);
                    }
                    self.close(&stack);
                    stack.pop();
                }
                c => self.push_char(c),
            }
        }
        // Unclosed environments end with the input.
        self.flush(&stack);
        Ok(self.runs)
    }

    fn directive(&mut self, chars: &mut Chars<'_>, stack: &EnvStack) -> Result<EnvSetting> {
        match RawDirective::read(chars)?.resolve(self.macros)? {
            Directive::Enter(setting) => Ok(setting),
            Directive::Editor { name, width } => {
                self.widgets.create(&name, width, &stack.snapshot())?;
                Ok(EnvSetting::Link(Some(name)))
            }
        }
    }

    fn function(&mut self, chars: &mut Chars<'_>) -> Result<()> {
        match FunctionCall::read(chars)? {
            FunctionCall::Literal(c) => self.push_atom(Atom::Char(c)),
            FunctionCall::Call { name, args } => match FunctionKind::resolve(&name, self.macros) {
                Some(kind) => {
                    for atom in self.expand(kind, &name, &args)? {
                        match atom {
                            Atom::Char(c) => self.push_char(c),
                            atom => self.push_atom(atom),
                        }
                    }
                }
                None => self.unknown_function(&name)?,
            },
            FunctionCall::Malformed(text) => self.unknown_function(&text)?,
        }
        Ok(())
    }

    fn expand(&self, kind: FunctionKind, name: &str, args: &str) -> Result<Vec<Atom>> {
        match kind {
            FunctionKind::Macro => Ok(match self.macros.function(name) {
                Some(FunctionMacro::Text(text)) => text.chars().map(Atom::Char).collect(),
                Some(FunctionMacro::Image(bitmap)) => vec![Atom::Image(bitmap.clone())],
                None => Vec::new(),
            }),
            FunctionKind::Space => {
                let width = args
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidArguments {
                        name: name.to_string(),
                        args: args.to_string(),
                    })?;
                Ok(vec![Atom::Image(Bitmap::new(width, 1))])
            }
            FunctionKind::Img => Ok(vec![Atom::Image(self.images.load(args.trim())?)]),
        }
    }

    fn unknown_function(&self, name: &str) -> Result<()> {
        match self.mode {
            FunctionCallMode::Strict => Err(Error::UnknownFunction {
                name: name.to_string(),
            }),
            FunctionCallMode::Lenient => {
                emit_log(
                    LogLevel::Warn,
                    &format!("dropping unrecognized function call '{name}'"),
                );
                Ok(())
            }
        }
    }

    /// Append a literal character, collapsing whitespace.
    fn push_char(&mut self, c: char) {
        let whitespace = c.is_whitespace();
        if whitespace && self.prev_whitespace {
            // A newline replaces the whitespace it collapses into.
            if c == '\n' {
                match self.buffer.last_mut() {
                    Some(last) if last.is_whitespace() => *last = Atom::Char('\n'),
                    _ => self.buffer.push(Atom::Char('\n')),
                }
            }
            return;
        }
        self.buffer.push(Atom::Char(c));
        self.prev_whitespace = whitespace;
    }

    /// Append an escape or inline bitmap. Never collapsed.
    fn push_atom(&mut self, atom: Atom) {
        self.prev_whitespace = atom.is_whitespace();
        self.buffer.push(atom);
    }

    fn flush(&mut self, stack: &EnvStack) {
        if self.buffer.is_empty() {
            return;
        }
        let atoms = mem::take(&mut self.buffer);
        self.runs.push(InterpretedRun::new(stack.snapshot(), atoms));
    }

    /// Handle a `}` while its environment is still on the stack.
    fn close(&mut self, stack: &EnvStack) {
        let env = stack.snapshot();
        let widget = env
            .link
            .clone()
            .filter(|link| self.widgets.contains(link));
        let Some(link) = widget else {
            self.flush(stack);
            return;
        };

        for atom in mem::take(&mut self.buffer) {
            if let Atom::Char(c) = atom {
                self.widgets.deliver(&link, KeyEvent::typed(c));
            }
        }
        emit_event(EVENT_WIDGET_INPUT, &link);
        if let Some(bitmap) = self.widgets.bitmap(&link) {
            self.runs.push(InterpretedRun::new(env, vec![Atom::Image(bitmap)]));
        }
    }
}
