//! Synthesized key input for embedded widgets.
//!
//! Text inside an `editor` environment is not laid out; each character is
//! turned into a [`KeyEvent`] and delivered to the widget registered under
//! the environment's link id.

mod keyboard;

pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
