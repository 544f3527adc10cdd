//! Configuration options for BSON decoding.
//!
//! This module provides [`DecodeOptions`], which controls two
//! independent switches:
//!
//! - **strict**: require the input buffer to be exactly one document
//!   with no trailing bytes (default on)
//! - **discard_errors**: recover from parse failures by returning the
//!   [`Discarded`](crate::Value::Discarded) sentinel instead of an error
//!   (default off)
//!
//! ## Examples
//!
//! ```rust
//! use bson_value::{from_bson_with_options, DecodeOptions, Value};
//!
//! let empty_doc = [0x05, 0x00, 0x00, 0x00, 0x00];
//!
//! // Tolerate trailing bytes after the document
//! let mut padded = empty_doc.to_vec();
//! padded.push(0xFF);
//! let options = DecodeOptions::new().with_strict(false);
//! let value: Value = from_bson_with_options(&padded, options).unwrap();
//! assert!(value.is_object());
//!
//! // Recover from malformed input instead of failing
//! let value: Value = from_bson_with_options(&[0xFF], DecodeOptions::lenient()).unwrap();
//! assert!(value.is_discarded());
//! ```

/// Configuration options for BSON decoding.
///
/// # Examples
///
/// ```rust
/// use bson_value::DecodeOptions;
///
/// // Defaults: strict, errors raised
/// let options = DecodeOptions::new();
/// assert!(options.strict);
/// assert!(!options.discard_errors);
///
/// // Custom configuration
/// let options = DecodeOptions::new()
///     .with_strict(false)
///     .with_discard_errors(true);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Require the buffer to be exactly consumed by one document.
    pub strict: bool,
    /// Turn parse failures into a `Discarded` result instead of an
    /// error. No partially built tree is ever returned either way.
    pub discard_errors: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict: true,
            discard_errors: false,
        }
    }
}

impl DecodeOptions {
    /// Creates the default options (strict, errors raised).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates lenient options: strict consumption is still required,
    /// but failures yield `Discarded` instead of an error.
    #[must_use]
    pub fn lenient() -> Self {
        DecodeOptions {
            strict: true,
            discard_errors: true,
        }
    }

    /// Sets whether the buffer must be exactly consumed.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether parse failures are recovered into `Discarded`.
    #[must_use]
    pub fn with_discard_errors(mut self, discard_errors: bool) -> Self {
        self.discard_errors = discard_errors;
        self
    }
}
