//! The inline markup language.
//!
//! ```text
//! plain text {color 255,0,0;red {link home;and linked}} text
//! a spacer/space{12}here, an image /img{logo.png} and an escaped /{ brace
//! ```
//!
//! `{name args;` opens an environment that lasts until the matching `}`.
//! `/name{args}` calls a function whose result is inserted inline; `/` before
//! `/`, `{` or `}` escapes it, and `/n` inserts a forced line break.

pub mod directive;
pub mod environment;
pub mod interpreter;
pub mod macros;

pub use directive::{Directive, DirectiveKind, FunctionCall, FunctionKind, RawDirective};
pub use environment::{EnvKind, EnvSetting, EnvStack, Environment};
pub use interpreter::{Atom, FunctionCallMode, InterpretedRun, Interpreter, OBJECT_REPLACEMENT};
pub use macros::{FunctionMacro, MacroRegistry};
