use std::fmt;

use thiserror::Error;

/// The kind of element being read when a decode error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// An `i...e` integer.
    Integer,
    /// A `<len>:<bytes>` byte string.
    String,
    /// An `l...e` list.
    List,
    /// A `d...e` dictionary.
    Dictionary,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Structure::Integer => "integer",
            Structure::String => "string",
            Structure::List => "list",
            Structure::Dictionary => "dictionary",
        })
    }
}

/// Errors produced while decoding bencode input.
///
/// Every variant except [`DecodeError::Io`] carries the byte offset, relative
/// to the start of the input, at which the problem was detected.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input ended before the element was complete.
    #[error("unexpected {structure} end at byte {offset}")]
    UnexpectedEnd { structure: Structure, offset: usize },

    /// A byte that cannot appear at this point of the element.
    #[error("malformed {structure} at byte {offset}: {found:?}")]
    Malformed {
        structure: Structure,
        offset: usize,
        found: char,
    },

    /// A string length prefix that is not a valid length or is not followed by `:`.
    #[error("invalid string length specification at byte {offset}: {found:?}")]
    InvalidStringLength { offset: usize, found: char },

    /// An integer whose digits do not fit a signed 64-bit value.
    #[error("integer overflow at byte {offset}")]
    IntegerOverflow { offset: usize },

    /// A dictionary key that decoded to something other than a byte string.
    #[error("dictionary key is not a string at byte {offset}")]
    KeyNotString { offset: usize },

    /// A lookahead byte that starts none of the four element types.
    #[error("unknown element type at byte {offset}: {found:?}")]
    UnknownElement { offset: usize, found: char },

    /// Bytes left over after a complete top-level value.
    #[error("input has garbage on the end (starts at byte {offset})")]
    TrailingGarbage { offset: usize },

    /// A container opened beyond the configured nesting limit.
    #[error("structure too deep at byte {offset} (max depth {max_depth})")]
    TooDeep { offset: usize, max_depth: usize },

    /// Reading the input from a stream or file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Returns the byte offset where the error was detected.
    ///
    /// `None` for I/O errors, which happen before any byte is decoded.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedEnd { offset, .. }
            | DecodeError::Malformed { offset, .. }
            | DecodeError::InvalidStringLength { offset, .. }
            | DecodeError::IntegerOverflow { offset }
            | DecodeError::KeyNotString { offset }
            | DecodeError::UnknownElement { offset, .. }
            | DecodeError::TrailingGarbage { offset }
            | DecodeError::TooDeep { offset, .. } => Some(*offset),
            DecodeError::Io(_) => None,
        }
    }
}

/// Errors produced while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value with no bencode representation.
    #[error("don't know how to encode {type_name}")]
    Unsupported { type_name: &'static str },

    /// A dictionary key that cannot be converted to a byte string.
    #[error("keys must be strings, not {type_name}")]
    KeyMustBeString { type_name: &'static str },

    /// An integer outside the signed 64-bit range.
    #[error("integer {0} does not fit in a bencode integer")]
    IntegerOutOfRange(String),

    /// An error raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// Writing the encoded output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

/// Errors produced when an invalid depth limit is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The limit was negative.
    #[error("max depth must be non-negative, got {0}")]
    Negative(i64),

    /// The limit was not an integer.
    #[error("max depth must be an integer, got {0:?}")]
    NotAnInteger(String),
}
