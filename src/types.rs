//! Customization traits for the value model.
//!
//! The [`Value`](crate::Value) tree is parametric over the concrete string
//! and container types that hold its data. This module defines the
//! compile-time contract a substitute type must satisfy:
//!
//! - [`StringType`]: the string representation (keys and string values)
//! - [`ArrayType`]: the ordered element container
//! - [`ObjectType`]: the key-to-value mapping
//! - [`ValueTypes`]: bundles one choice of each into a configuration
//!
//! The codec is written exclusively against these traits and is
//! monomorphized per configuration; there is no dynamic dispatch. Any
//! conforming configuration produces byte-identical encoder output for
//! semantically equal input.
//!
//! ## Provided implementations
//!
//! - `String` as [`StringType`]
//! - `Vec<V>` as [`ArrayType`]
//! - [`IndexMap`] (insertion-ordered) and `BTreeMap` (key-ordered) as
//!   [`ObjectType`]
//! - [`DefaultTypes`]: `String` + `Vec` + `IndexMap`
//!
//! ## Substituting a string type
//!
//! ```rust
//! use bson_value::{StringType, ArrayType, ObjectType, ValueTypes, Value};
//! use std::borrow::Borrow;
//! use std::collections::BTreeMap;
//!
//! // A string type that simply wraps `String` but counts as a distinct type.
//! #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! struct MyString(String);
//!
//! impl Borrow<str> for MyString {
//!     fn borrow(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! impl<'a> From<&'a str> for MyString {
//!     fn from(s: &'a str) -> Self {
//!         MyString(s.to_string())
//!     }
//! }
//!
//! impl StringType for MyString {
//!     fn push_str(&mut self, string: &str) {
//!         self.0.push_str(string);
//!     }
//!     fn push(&mut self, ch: char) {
//!         self.0.push(ch);
//!     }
//!     fn set_byte(&mut self, index: usize, byte: u8) {
//!         StringType::set_byte(&mut self.0, index, byte);
//!     }
//!     fn resize(&mut self, new_len: usize, fill: u8) {
//!         StringType::resize(&mut self.0, new_len, fill);
//!     }
//!     fn as_str(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
//! struct MyTypes;
//!
//! impl ValueTypes for MyTypes {
//!     type String = MyString;
//!     type Array = Vec<Value<MyTypes>>;
//!     type Object = BTreeMap<MyString, Value<MyTypes>>;
//! }
//!
//! let value: Value<MyTypes> = Value::from("hello");
//! assert_eq!(value.as_str(), Some("hello"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// The operation set a string representation must support.
///
/// Covers construction (from `&str`, from raw UTF-8 bytes, from a
/// repeat-count and fill character), mutation (append, indexed byte
/// write, truncate/extend), inspection (length, indexed byte read, last
/// byte, read-only byte view), and comparison (equality, lexicographic
/// ordering, and `str` interoperability through `Borrow<str>`).
///
/// Byte-level mutation exists so that callers can treat the string as a
/// fill buffer; implementations are expected to keep the content valid
/// UTF-8 and may panic if a write would break that.
pub trait StringType:
    Clone + fmt::Debug + Default + Eq + Ord + Hash + Borrow<str> + for<'a> From<&'a str>
{
    /// Constructs a string from a raw byte buffer.
    ///
    /// Returns `None` if the bytes are not valid UTF-8.
    fn from_utf8(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok().map(Self::from)
    }

    /// Constructs a string of `count` copies of `fill`.
    fn repeated(count: usize, fill: char) -> Self {
        let mut s = Self::default();
        for _ in 0..count {
            s.push(fill);
        }
        s
    }

    /// Appends another string.
    fn push_str(&mut self, string: &str);

    /// Appends a single character.
    fn push(&mut self, ch: char);

    /// Reads the byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    fn byte_at(&self, index: usize) -> u8 {
        self.as_bytes()[index]
    }

    /// Overwrites the byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or if the write would produce
    /// invalid UTF-8.
    fn set_byte(&mut self, index: usize, byte: u8);

    /// Returns the length in bytes.
    fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Returns `true` if the string is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Truncates or extends the string to `new_len` bytes, filling new
    /// positions with `fill`.
    ///
    /// # Panics
    ///
    /// Panics if the result would not be valid UTF-8 (truncating inside
    /// a multi-byte character, or a non-ASCII fill byte).
    fn resize(&mut self, new_len: usize, fill: u8);

    /// Returns the last byte, or `None` if the string is empty.
    fn last_byte(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    /// Returns the content as a `&str`.
    fn as_str(&self) -> &str;

    /// Returns a read-only view of the content bytes.
    ///
    /// The view carries no trailing `0x00`; consumers that need a
    /// terminated representation (such as the BSON encoder) append the
    /// terminator themselves.
    fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

impl StringType for String {
    fn from_utf8(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn repeated(count: usize, fill: char) -> Self {
        std::iter::repeat(fill).take(count).collect()
    }

    fn push_str(&mut self, string: &str) {
        String::push_str(self, string);
    }

    fn push(&mut self, ch: char) {
        String::push(self, ch);
    }

    fn set_byte(&mut self, index: usize, byte: u8) {
        let mut bytes = std::mem::take(self).into_bytes();
        bytes[index] = byte;
        match String::from_utf8(bytes) {
            Ok(s) => *self = s,
            Err(e) => panic!("byte write at index {index} produced invalid UTF-8: {e}"),
        }
    }

    fn resize(&mut self, new_len: usize, fill: u8) {
        let mut bytes = std::mem::take(self).into_bytes();
        bytes.resize(new_len, fill);
        match String::from_utf8(bytes) {
            Ok(s) => *self = s,
            Err(e) => panic!("resize to {new_len} bytes produced invalid UTF-8: {e}"),
        }
    }

    fn as_str(&self) -> &str {
        self
    }
}

/// The operation set an ordered element container must support.
pub trait ArrayType<V>: Clone + fmt::Debug + Default + PartialEq {
    /// Iterator over the elements, in element order.
    type Iter<'a>: Iterator<Item = &'a V>
    where
        Self: 'a,
        V: 'a;

    /// Appends an element.
    fn push(&mut self, value: V);

    /// Returns the element at `index`, if any.
    fn get(&self, index: usize) -> Option<&V>;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the container is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the elements in element order.
    fn iter(&self) -> Self::Iter<'_>;
}

impl<V> ArrayType<V> for Vec<V>
where
    V: Clone + fmt::Debug + PartialEq,
{
    type Iter<'a>
        = std::slice::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn push(&mut self, value: V) {
        Vec::push(self, value);
    }

    fn get(&self, index: usize) -> Option<&V> {
        self.as_slice().get(index)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.as_slice().iter()
    }
}

/// The operation set a key-to-value mapping must support.
///
/// Keys are unique: inserting an existing key overwrites its value (and
/// returns the displaced one) rather than duplicating the entry.
/// Iteration order is the container's own stable order; the encoder
/// emits members in exactly that order, so output determinism follows
/// from the container's order being stable for a fixed input.
pub trait ObjectType<K, V>: Clone + fmt::Debug + Default + PartialEq {
    /// Iterator over the entries, in the container's order.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Inserts a key-value pair, returning the displaced value if the
    /// key was already present.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up a value by key.
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the mapping is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries in the container's order.
    fn iter(&self) -> Self::Iter<'_>;
}

impl<K, V> ObjectType<K, V> for IndexMap<K, V>
where
    K: StringType,
    V: Clone + fmt::Debug + PartialEq,
{
    type Iter<'a>
        = indexmap::map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        IndexMap::insert(self, key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        IndexMap::get(self, key)
    }

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        IndexMap::iter(self)
    }
}

impl<K, V> ObjectType<K, V> for BTreeMap<K, V>
where
    K: StringType,
    V: Clone + fmt::Debug + PartialEq,
{
    type Iter<'a>
        = std::collections::btree_map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeMap::iter(self)
    }
}

/// One concrete choice of string and container types for a
/// [`Value`](crate::Value) tree.
///
/// Conformance is checked entirely at compile time; the codec is
/// instantiated once per configuration through monomorphization.
pub trait ValueTypes: Sized {
    /// The string representation, used for both keys and string values.
    type String: StringType;
    /// The array container.
    type Array: ArrayType<Value<Self>>;
    /// The object container. Its iteration order determines encoder
    /// member order.
    type Object: ObjectType<Self::String, Value<Self>>;
}

/// The default configuration: `String` values, `Vec` arrays, and
/// insertion-ordered [`IndexMap`] objects.
///
/// `IndexMap` keeps fields in insertion order, which makes encoder
/// output deterministic and round-trips preserve member order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultTypes;

impl ValueTypes for DefaultTypes {
    type String = String;
    type Array = Vec<Value<DefaultTypes>>;
    type Object = IndexMap<String, Value<DefaultTypes>>;
}
