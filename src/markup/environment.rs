//! Environment settings and the environment stack.
//!
//! The stack holds one [`EnvSetting`] per entered environment on top of four
//! seed entries, one per [`EnvKind`]. Looking up a kind returns the nearest
//! setting of that kind, so the seeds act as defaults.

use crate::color::Rgba;
use crate::render::FontRef;

/// The attribute an environment changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvKind {
    Background,
    Color,
    Font,
    Link,
}

/// A single (kind, value) entry on the environment stack.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvSetting {
    Background(Rgba),
    Color(Rgba),
    Font(FontRef),
    Link(Option<String>),
}

impl EnvSetting {
    #[must_use]
    pub fn kind(&self) -> EnvKind {
        match self {
            Self::Background(_) => EnvKind::Background,
            Self::Color(_) => EnvKind::Color,
            Self::Font(_) => EnvKind::Font,
            Self::Link(_) => EnvKind::Link,
        }
    }
}

/// A fully resolved environment: the state in effect for a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub background: Rgba,
    pub color: Rgba,
    pub font: FontRef,
    pub link: Option<String>,
}

impl Environment {
    /// Create an environment with no link.
    #[must_use]
    pub fn new(background: Rgba, color: Rgba, font: FontRef) -> Self {
        Self {
            background,
            color,
            font,
            link: None,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Rgba::BLACK, Rgba::WHITE, FontRef::default())
    }
}

const SEED_LEN: usize = 4;

/// Stack of environment settings. Never empty.
#[derive(Clone, Debug)]
pub struct EnvStack {
    entries: Vec<EnvSetting>,
}

impl EnvStack {
    /// Create a stack seeded with the four settings of `defaults`.
    #[must_use]
    pub fn new(defaults: &Environment) -> Self {
        Self {
            entries: vec![
                EnvSetting::Background(defaults.background),
                EnvSetting::Color(defaults.color),
                EnvSetting::Font(defaults.font.clone()),
                EnvSetting::Link(defaults.link.clone()),
            ],
        }
    }

    /// Push a setting.
    pub fn push(&mut self, setting: EnvSetting) {
        self.entries.push(setting);
    }

    /// Pop the most recent setting. The seed entries are never removed.
    pub fn pop(&mut self) -> Option<EnvSetting> {
        debug_assert!(
            self.entries.len() > SEED_LEN,
            "environment stack popped below its seed entries"
        );
        if self.entries.len() > SEED_LEN {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Number of entered environments (seed entries excluded).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len() - SEED_LEN
    }

    /// The nearest setting of `kind`.
    #[must_use]
    pub fn lookup(&self, kind: EnvKind) -> &EnvSetting {
        self.entries
            .iter()
            .rev()
            .find(|setting| setting.kind() == kind)
            .unwrap_or_else(|| unreachable!("seed entry for {kind:?} is always present"))
    }

    /// Resolve all four kinds into an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Environment {
        let mut env = Environment::default();
        for kind in [EnvKind::Background, EnvKind::Color, EnvKind::Font, EnvKind::Link] {
            match self.lookup(kind) {
                EnvSetting::Background(c) => env.background = *c,
                EnvSetting::Color(c) => env.color = *c,
                EnvSetting::Font(f) => env.font = f.clone(),
                EnvSetting::Link(l) => env.link = l.clone(),
            }
        }
        env
    }
}
