//! Error types for BSON encoding and decoding.
//!
//! This module provides the two error kinds the codec can surface:
//!
//! - **Type errors**: the value tree cannot be represented in BSON
//!   (non-object root, out-of-range unsigned integer, key containing a
//!   NUL byte)
//! - **Parse errors**: the byte stream is structurally invalid, reported
//!   with the byte offset at which parsing failed
//!
//! ## Error Context
//!
//! All parse errors include the byte offset into the input buffer, which
//! points at the field that could not be read (size prefix, type tag,
//! key, or payload).
//!
//! ## Examples
//!
//! ```rust
//! use bson_value::{from_bson, Error, Value};
//!
//! // Too short to hold even an empty document
//! let result: Result<Value, Error> = from_bson(&[0x05, 0x00]);
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     assert!(err.is_parse_error());
//!     eprintln!("Decode error: {}", err);
//!     // Error messages include the byte offset
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during BSON encoding
/// or decoding.
///
/// Each error variant includes contextual information to aid debugging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value tree cannot be represented in BSON
    #[error("type error: {message}")]
    Type { message: String },

    /// The byte stream is structurally invalid
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Generic message, used by the serde adaptors
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a type error for a value that cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bson_value::Error;
    ///
    /// let err = Error::type_error("root must be an object to serialize to this binary format");
    /// assert!(err.is_type_error());
    /// assert!(err.to_string().contains("root must be an object"));
    /// ```
    pub fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }

    /// Creates a parse error at the given byte offset into the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bson_value::Error;
    ///
    /// let err = Error::parse(4, "unexpected end of input");
    /// assert_eq!(err.offset(), Some(4));
    /// assert!(err.to_string().contains("byte 4"));
    /// ```
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Returns `true` if this is a type error.
    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(self, Error::Type { .. })
    }

    /// Returns `true` if this is a parse error.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns the byte offset for parse errors, `None` otherwise.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Error::Parse { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
