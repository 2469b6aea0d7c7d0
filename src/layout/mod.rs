//! Tokenizing, wrapping and painting interpreted text.

pub mod buffer;
pub mod line;
pub mod links;
pub mod token;
pub mod wrap;

pub use buffer::{LayoutBuffer, LayoutGroup, LayoutOptions};
pub use line::{Justify, Line};
pub use links::LinkMap;
pub use token::{Token, Tokens};
pub use wrap::Wrapper;
