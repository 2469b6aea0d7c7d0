//! Error types for the markup and layout pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations.
///
/// Every variant is fatal for the `input` call that produced it: no partial
/// lines are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// An environment directive name is neither built in nor a registered macro.
    MarkupSyntax { name: String },
    /// A recognised directive or function was given arguments it cannot parse.
    InvalidArguments { name: String, args: String },
    /// A `}` was found with no environment open.
    UnbalancedClose,
    /// Input ended inside a directive or function call.
    UnexpectedEnd { construct: &'static str },
    /// An unrecognised function call in strict mode.
    UnknownFunction { name: String },
    /// A single token is wider than the line it must fit in.
    LayoutOverflow { token: String, excess: u32 },
    /// The rendering backend failed.
    Render(String),
    /// The image loader failed.
    ImageLoad { path: String, reason: String },
    /// Layout area dimension error (e.g., zero width).
    InvalidDimensions { width: u32, height: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkupSyntax { name } => write!(f, "{name} is an unrecognized environment"),
            Self::InvalidArguments { name, args } => {
                write!(f, "invalid arguments for {name}: '{args}'")
            }
            Self::UnbalancedClose => write!(f, "'}}' closes an environment that was never opened"),
            Self::UnexpectedEnd { construct } => {
                write!(f, "unexpected end of input inside {construct}")
            }
            Self::UnknownFunction { name } => write!(f, "{name} is an unrecognized function"),
            Self::LayoutOverflow { token, excess } => write!(
                f,
                "the token '{token}' is {excess} pixels too wide to fit in the layout width"
            ),
            Self::Render(reason) => write!(f, "render failed: {reason}"),
            Self::ImageLoad { path, reason } => {
                write!(f, "failed to load image '{path}': {reason}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions: {width}x{height}")
            }
        }
    }
}

impl std::error::Error for Error {}
