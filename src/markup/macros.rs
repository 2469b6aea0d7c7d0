//! User-defined directive and function macros.

use std::collections::HashMap;

use crate::bitmap::Bitmap;
use crate::markup::environment::EnvSetting;

/// What a function macro expands to.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionMacro {
    /// Literal characters, appended as if they had been typed.
    Text(String),
    /// An inline bitmap.
    Image(Bitmap),
}

/// Table of macros consulted before built-in directive and function names.
///
/// The registry is borrowed immutably for the whole of an interpretation, so
/// registering while text is being parsed is ruled out by the borrow checker.
#[derive(Clone, Debug, Default)]
pub struct MacroRegistry {
    directives: HashMap<String, EnvSetting>,
    functions: HashMap<String, FunctionMacro>,
}

impl MacroRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `{name;}` as shorthand for entering `setting`.
    ///
    /// A macro may shadow a built-in directive name.
    pub fn register_directive(&mut self, name: impl Into<String>, setting: EnvSetting) {
        self.directives.insert(name.into(), setting);
    }

    /// Register `/name{}` to expand to `value`.
    pub fn register_function(&mut self, name: impl Into<String>, value: FunctionMacro) {
        self.functions.insert(name.into(), value);
    }

    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&EnvSetting> {
        self.directives.get(name)
    }

    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionMacro> {
        self.functions.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.functions.is_empty()
    }
}
