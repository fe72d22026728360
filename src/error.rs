//! Error types for TOON encoding and decoding.
//!
//! The taxonomy is closed: every failure cause has exactly one variant, and a
//! failed call reports exactly one of them. Nothing is retried and no partial
//! result is ever returned.
//!
//! ## Error Context
//!
//! - Decode errors carry a 1-based [`Position`] (line and column, columns counted
//!   in characters) pointing at the offending text.
//! - Encode errors carry the path of the offending subtree, written JSONPath style
//!   (`$.users[2].score`).
//! - [`Error::DepthExceeded`] can come from either direction, so it carries a
//!   [`Location`] that is one or the other.
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{decode, ErrorKind};
//!
//! let err = decode("a:1\na:2").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DuplicateKey);
//! assert_eq!(err.position().map(|p| p.line), Some(2));
//! ```

use std::fmt;
use thiserror::Error;

/// A 1-based line/column position in decoder input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Where a [`Error::DepthExceeded`] was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// A position in decoder input.
    Source(Position),
    /// A path into an encoder input value.
    Path(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Source(pos) => write!(f, "{}", pos),
            Location::Path(path) => write!(f, "path {}", path),
        }
    }
}

/// Represents all possible errors that can occur while encoding or decoding TOON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The encoder met a value TOON cannot represent (NaN or an infinity).
    #[error("Unsupported value at {path}: {reason}")]
    UnsupportedValue { path: String, reason: String },

    /// Tab indentation, an indent that is not a multiple of the unit, or an
    /// over-indented line.
    #[error("Indentation error at {position}: {msg}\nHelp: indent with spaces, one unit per nesting level")]
    IndentationError { position: Position, msg: String },

    /// A quoted key or string was not closed before the end of its line.
    #[error("Unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// An unknown escape, malformed `\u` digits, or an unpaired surrogate.
    #[error("Invalid escape sequence `{escape}` at {position}")]
    InvalidEscape { position: Position, escape: String },

    /// A number literal that does not fit a finite 64-bit float.
    #[error("Invalid number literal `{literal}` at {position}: out of range for a 64-bit float")]
    InvalidNumberLiteral { position: Position, literal: String },

    /// An inline `[...]` or `{}` was not closed on its line.
    #[error("Unclosed inline collection starting at {position}: expected `{expected}`")]
    UnclosedInlineCollection { position: Position, expected: char },

    /// The same key appeared twice in one object.
    #[error("Duplicate key `{key}` at {position}")]
    DuplicateKey { position: Position, key: String },

    /// Nesting went past the configured maximum depth.
    #[error("Nesting depth exceeds the maximum of {max_depth} at {location}")]
    DepthExceeded { location: Location, max_depth: usize },

    /// A member line has no `:` after its key.
    #[error("Expected ':' after key at {position}")]
    ExpectedColon { position: Position },

    /// A member line starts with `:`; empty keys must be quoted (`"":value`).
    #[error("Missing key before ':' at {position}")]
    MissingKey { position: Position },

    /// A character the grammar does not allow where it appears.
    #[error("Unexpected character `{found}` at {position}: expected {expected}")]
    UnexpectedCharacter {
        position: Position,
        found: char,
        expected: String,
    },

    /// A well-formed line whose kind does not fit the block it sits in.
    #[error("Unexpected line at {position}: {msg}")]
    UnexpectedLine { position: Position, msg: String },

    /// Decoder input longer than the configured maximum.
    #[error("Input of {len} bytes exceeds the configured maximum of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    /// Raised by `Serialize`/`Deserialize` implementations while converting
    /// between Rust types and [`Value`](crate::Value). The codec itself never
    /// produces it.
    #[error("{0}")]
    Serde(String),
}

/// Fieldless discriminant of [`Error`], convenient for matching in tests and
/// for mapping errors to user-facing notices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedValue,
    IndentationError,
    UnterminatedString,
    InvalidEscape,
    InvalidNumberLiteral,
    UnclosedInlineCollection,
    DuplicateKey,
    DepthExceeded,
    ExpectedColon,
    MissingKey,
    UnexpectedCharacter,
    UnexpectedLine,
    InputTooLarge,
    Serde,
}

impl Error {
    /// Creates an indentation error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::{Error, Position};
    ///
    /// let err = Error::indentation(Position::new(3, 4), "indent of 3 is not a multiple of 2");
    /// assert!(err.to_string().contains("line 3, column 4"));
    /// ```
    pub fn indentation(position: Position, msg: impl Into<String>) -> Self {
        Error::IndentationError {
            position,
            msg: msg.into(),
        }
    }

    pub fn unterminated_string(position: Position) -> Self {
        Error::UnterminatedString { position }
    }

    pub fn invalid_escape(position: Position, escape: impl Into<String>) -> Self {
        Error::InvalidEscape {
            position,
            escape: escape.into(),
        }
    }

    pub fn invalid_number(position: Position, literal: impl Into<String>) -> Self {
        Error::InvalidNumberLiteral {
            position,
            literal: literal.into(),
        }
    }

    pub fn unclosed_collection(position: Position, expected: char) -> Self {
        Error::UnclosedInlineCollection { position, expected }
    }

    pub fn duplicate_key(position: Position, key: impl Into<String>) -> Self {
        Error::DuplicateKey {
            position,
            key: key.into(),
        }
    }

    /// Creates a depth error for decoder input.
    pub fn depth_in_source(position: Position, max_depth: usize) -> Self {
        Error::DepthExceeded {
            location: Location::Source(position),
            max_depth,
        }
    }

    /// Creates a depth error for an encoder input path.
    pub fn depth_at_path(path: impl Into<String>, max_depth: usize) -> Self {
        Error::DepthExceeded {
            location: Location::Path(path.into()),
            max_depth,
        }
    }

    pub fn unexpected_char(position: Position, found: char, expected: impl Into<String>) -> Self {
        Error::UnexpectedCharacter {
            position,
            found,
            expected: expected.into(),
        }
    }

    pub fn unexpected_line(position: Position, msg: impl Into<String>) -> Self {
        Error::UnexpectedLine {
            position,
            msg: msg.into(),
        }
    }

    pub fn unsupported_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnsupportedValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a serde bridge error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::Error;
    ///
    /// let err = Error::custom("expected a struct");
    /// assert!(err.to_string().contains("expected a struct"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serde(msg.to_string())
    }

    /// Returns the fieldless kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedValue { .. } => ErrorKind::UnsupportedValue,
            Error::IndentationError { .. } => ErrorKind::IndentationError,
            Error::UnterminatedString { .. } => ErrorKind::UnterminatedString,
            Error::InvalidEscape { .. } => ErrorKind::InvalidEscape,
            Error::InvalidNumberLiteral { .. } => ErrorKind::InvalidNumberLiteral,
            Error::UnclosedInlineCollection { .. } => ErrorKind::UnclosedInlineCollection,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Error::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Error::ExpectedColon { .. } => ErrorKind::ExpectedColon,
            Error::MissingKey { .. } => ErrorKind::MissingKey,
            Error::UnexpectedCharacter { .. } => ErrorKind::UnexpectedCharacter,
            Error::UnexpectedLine { .. } => ErrorKind::UnexpectedLine,
            Error::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            Error::Serde(_) => ErrorKind::Serde,
        }
    }

    /// Returns the source position for errors raised while decoding text.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::IndentationError { position, .. }
            | Error::UnterminatedString { position }
            | Error::InvalidEscape { position, .. }
            | Error::InvalidNumberLiteral { position, .. }
            | Error::UnclosedInlineCollection { position, .. }
            | Error::DuplicateKey { position, .. }
            | Error::ExpectedColon { position }
            | Error::MissingKey { position }
            | Error::UnexpectedCharacter { position, .. }
            | Error::UnexpectedLine { position, .. } => Some(*position),
            Error::DepthExceeded {
                location: Location::Source(position),
                ..
            } => Some(*position),
            _ => None,
        }
    }

    /// Returns the value path for errors raised while encoding.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::UnsupportedValue { path, .. } => Some(path),
            Error::DepthExceeded {
                location: Location::Path(path),
                ..
            } => Some(path),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serde(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serde(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
