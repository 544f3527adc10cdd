//! # bson_value
//!
//! A BSON codec over a generic JSON-like value model with pluggable
//! string and container types.
//!
//! ## What this crate provides
//!
//! - [`Value`]: a tagged tree of null / boolean / 64-bit signed and
//!   unsigned integers / 64-bit float / string / array / object nodes
//! - A compile-time customization contract ([`StringType`],
//!   [`ArrayType`], [`ObjectType`], bundled by [`ValueTypes`]) so the
//!   tree can run on caller-supplied string and container
//!   implementations — a small-string type, an arena-backed string, a
//!   sorted map — with **byte-identical** codec output across
//!   conforming configurations
//! - [`to_bson`] / [`from_bson`]: an encoder and decoder for the BSON
//!   binary layout, covering the subset of BSON reachable from the
//!   value model's own kinds
//!
//! ## Key Properties
//!
//! - **Byte-exact layout**: little-endian size prefixes, tagged
//!   elements, null-terminated keys, length-prefixed strings, recursive
//!   embedded documents
//! - **Width selection by magnitude**: integers that fit the signed
//!   32-bit range use the 4-byte representation regardless of their
//!   stored width (`-1_i64` encodes in 4 bytes)
//! - **No dynamic dispatch**: the codec is monomorphized per type
//!   configuration; conformance is checked at build time
//! - **No partial results**: decoding returns a complete tree, the
//!   [`Discarded`](Value::Discarded) sentinel, or an error — never a
//!   half-built value
//! - **Pure functions**: no global state; concurrent use is safe as
//!   long as each thread owns its own buffers and trees
//!
//! ## Quick Start
//!
//! ```rust
//! use bson_value::{from_bson, to_bson, to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Document {
//!     entry: bool,
//! }
//!
//! // Build a value tree (via serde, literals, or the decoder)
//! let value: Value = to_value(Document { entry: true }).unwrap();
//!
//! // Encode to BSON
//! let bytes = to_bson(&value).unwrap();
//! assert_eq!(
//!     bytes,
//!     [0x0D, 0x00, 0x00, 0x00, 0x08, b'e', b'n', b't', b'r', b'y', 0x00, 0x01, 0x00]
//! );
//!
//! // Decode back; member order and values are preserved
//! let decoded: Value = from_bson(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! ## Lenient decoding
//!
//! ```rust
//! use bson_value::{from_bson_with_options, DecodeOptions, Value};
//!
//! // Malformed input yields the Discarded sentinel instead of an error
//! let value: Value =
//!     from_bson_with_options(&[0xFF, 0xFF], DecodeOptions::lenient()).unwrap();
//! assert!(value.is_discarded());
//! ```
//!
//! ## Scope
//!
//! Only the BSON subset reachable from the value model is implemented:
//! double, string, embedded document, array, boolean, null, int32, and
//! int64 elements. Binary, ObjectId, Regex, Timestamp, and Decimal128
//! are out of scope, as are textual JSON and other binary encodings.
//!
//! Arrays are encoded as embedded documents whose elements carry
//! *empty* keys rather than stringified indices; decoding relies purely
//! on encounter order. This keeps round-trips exact but is a known
//! divergence from what external BSON readers expect for arrays.

pub mod de;
pub mod error;
pub mod options;
pub mod ser;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use options::DecodeOptions;
pub use ser::ValueSerializer;
pub use types::{ArrayType, DefaultTypes, ObjectType, StringType, ValueTypes};
pub use value::Value;

use serde::Serialize;

/// Encodes a value tree to BSON bytes.
///
/// The root must be an object; any other kind fails with a type error.
/// The sole exception is [`Value::Discarded`], which encodes to an
/// empty byte sequence — there is nothing to serialize.
///
/// The output length always equals the document's own 4-byte size
/// field, and member order follows the object container's iteration
/// order, so output is deterministic whenever that order is stable.
///
/// # Examples
///
/// ```rust
/// use bson_value::{to_bson, DefaultTypes, Value};
/// use indexmap::IndexMap;
///
/// let empty: Value = Value::Object(IndexMap::new());
/// assert_eq!(to_bson(&empty).unwrap(), [0x05, 0x00, 0x00, 0x00, 0x00]);
///
/// assert!(to_bson(&Value::<DefaultTypes>::from(42)).unwrap_err().is_type_error());
/// assert!(to_bson(&Value::<DefaultTypes>::Discarded).unwrap().is_empty());
/// ```
///
/// # Errors
///
/// Returns a type error for a non-object, non-discarded root, for an
/// unsigned integer above `i64::MAX`, for an object key containing a
/// NUL byte, or for a document exceeding the 4-byte size field's range.
pub fn to_bson<T: ValueTypes>(value: &Value<T>) -> Result<Vec<u8>> {
    ser::encode(value)
}

/// Decodes one BSON document into a value tree, using the default
/// options: the buffer must be exactly consumed, and failures are
/// returned as errors.
///
/// # Examples
///
/// ```rust
/// use bson_value::{from_bson, Value};
///
/// let value: Value = from_bson(&[0x05, 0x00, 0x00, 0x00, 0x00]).unwrap();
/// assert_eq!(value.as_object().map(|o| o.len()), Some(0));
/// ```
///
/// # Errors
///
/// Returns a parse error (with byte offset) for any structurally
/// invalid input: bad size field, truncation, unknown element tag,
/// missing terminator, invalid UTF-8, or trailing bytes.
pub fn from_bson<T: ValueTypes>(bytes: &[u8]) -> Result<Value<T>> {
    de::decode(bytes, DecodeOptions::default())
}

/// Decodes one BSON document with explicit [`DecodeOptions`].
///
/// With `strict` disabled, trailing bytes after the document are
/// tolerated. With `discard_errors` enabled, any parse failure yields
/// `Ok(Value::Discarded)` instead of an error; a partially built tree
/// is never returned in either mode.
///
/// # Examples
///
/// ```rust
/// use bson_value::{from_bson_with_options, DecodeOptions, Value};
///
/// let options = DecodeOptions::new().with_discard_errors(true);
/// let value: Value = from_bson_with_options(&[0x01], options).unwrap();
/// assert!(value.is_discarded());
/// ```
///
/// # Errors
///
/// As [`from_bson`], unless `discard_errors` is set.
pub fn from_bson_with_options<T: ValueTypes>(
    bytes: &[u8],
    options: DecodeOptions,
) -> Result<Value<T>> {
    de::decode(bytes, options)
}

/// Converts any `T: Serialize` into a value tree.
///
/// Maps and structs become objects, sequences and tuples become
/// arrays, `Option::None` and units become null. Map keys must
/// serialize as strings.
///
/// # Examples
///
/// ```rust
/// use bson_value::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(Point { x: 10, y: 20 }).unwrap();
/// assert_eq!(value.get("x").and_then(Value::as_i64), Some(10));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (raw byte
/// arrays, enum variants with payloads, non-string map keys).
pub fn to_value<V, T>(value: V) -> Result<Value<T>>
where
    V: Serialize,
    T: ValueTypes,
{
    value.serialize(ValueSerializer::new())
}
