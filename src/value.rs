//! Dynamic value representation for structured data.
//!
//! This module provides the [`Value`] enum, a JSON-like tree of
//! null/boolean/integer/float/string/array/object nodes. The tree is
//! parametric over the string and container types that hold its data
//! (see [`ValueTypes`]); the default configuration uses `String`,
//! `Vec`, and an insertion-ordered `IndexMap`.
//!
//! ## Core Types
//!
//! - [`Value`]: an enum representing any value (null, bool, signed and
//!   unsigned 64-bit integers, 64-bit float, string, array, object)
//! - [`Value::Discarded`]: a sentinel meaning "no value", produced by
//!   lenient decoding instead of an error
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use bson_value::Value;
//!
//! // From primitives
//! let null: Value = Value::Null;
//! let boolean: Value = Value::from(true);
//! let number: Value = Value::from(42);
//! let text: Value = Value::from("hello");
//!
//! // From Rust types via serde
//! use serde::Serialize;
//! use bson_value::to_value;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value: Value = to_value(Point { x: 10, y: 20 }).unwrap();
//! assert!(value.is_object());
//! ```
//!
//! ### Type Checking and Extraction
//!
//! ```rust
//! use bson_value::Value;
//!
//! let value: Value = Value::from(42);
//! assert!(value.is_int());
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(value.as_str(), None);
//! ```
//!
//! ## Ownership
//!
//! A `Value` tree has no cycles: each array and object exclusively owns
//! its children, `Clone` is a deep copy, and dropping a tree releases it
//! recursively. Mutating one tree from multiple threads requires
//! external synchronization; separate trees are independent.

use crate::types::{ArrayType, ObjectType, StringType};
use crate::{DefaultTypes, ValueTypes};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A dynamically-typed value: a tree of null, boolean, number, string,
/// array, and object nodes.
///
/// The type parameter selects the string and container implementations;
/// see [`ValueTypes`]. With the default parameter this behaves like any
/// other JSON-style value type.
///
/// Integer values keep track of whether they were created signed or
/// unsigned, but equality compares numbers by numeric value across
/// variants: `Value::Int(1) == Value::Uint(1)`. This is what allows an
/// unsigned value to survive a trip through the BSON codec, which has
/// only signed integer representations on the wire.
///
/// # Examples
///
/// ```rust
/// use bson_value::Value;
///
/// let a: Value = Value::Int(1);
/// let b: Value = Value::Uint(1);
/// assert_eq!(a, b);
///
/// let negative: Value = Value::Int(-1);
/// assert_ne!(negative, Value::Uint(u64::MAX));
/// ```
pub enum Value<T: ValueTypes = DefaultTypes> {
    /// The absence of data (JSON `null`).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// An unsigned 64-bit integer.
    Uint(u64),
    /// A 64-bit IEEE-754 float.
    Float(f64),
    /// A string, held in the configuration's string type.
    String(T::String),
    /// An ordered sequence of values.
    Array(T::Array),
    /// A mapping from string keys to values. Keys are unique;
    /// re-insertion overwrites.
    Object(T::Object),
    /// Sentinel meaning "no value".
    ///
    /// Only ever a standalone top-level result (of lenient decoding);
    /// never a legitimate member of an array or object.
    Discarded,
}

impl<T: ValueTypes> Value<T> {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a signed integer.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Returns `true` if the value is an unsigned integer.
    #[inline]
    #[must_use]
    pub const fn is_uint(&self) -> bool {
        matches!(self, Value::Uint(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` if the value is any numeric kind.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_) | Value::Float(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is the discarded sentinel.
    #[inline]
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        matches!(self, Value::Discarded)
    }

    /// If the value is a boolean, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bson_value::Value;
    ///
    /// let yes: Value = Value::Bool(true);
    /// assert_eq!(yes.as_bool(), Some(true));
    ///
    /// let number: Value = Value::from(42);
    /// assert_eq!(number.as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bson_value::{DefaultTypes, Value};
    ///
    /// assert_eq!(Value::<DefaultTypes>::Int(-7).as_i64(), Some(-7));
    /// assert_eq!(Value::<DefaultTypes>::Uint(7).as_i64(), Some(7));
    /// assert_eq!(Value::<DefaultTypes>::Uint(u64::MAX).as_i64(), None);
    /// assert_eq!(Value::<DefaultTypes>::Float(7.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `u64` if it is a non-negative integer.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is any numeric kind.
    ///
    /// Integers are converted; precision may be lost above 2^53.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// If the value is a string, returns its content.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to its container.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&T::Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// If the value is an array, returns a mutable reference to its
    /// container.
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut T::Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to its container.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&T::Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// If the value is an object, returns a mutable reference to its
    /// container.
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut T::Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// If the value is an object, looks up a member by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bson_value::{to_value, Value};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Config { retries: u32 }
    ///
    /// let value: Value = to_value(Config { retries: 3 }).unwrap();
    /// assert_eq!(value.get("retries").and_then(Value::as_u64), Some(3));
    /// assert!(value.get("missing").is_none());
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value<T>> {
        match self {
            Value::Object(o) => o.get(key),
            _ => None,
        }
    }

    /// Returns a static name for the value's kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Uint(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Discarded => "discarded",
        }
    }
}

impl<T: ValueTypes> Default for Value<T> {
    fn default() -> Self {
        Value::Null
    }
}

impl<T: ValueTypes> Clone for Value<T> {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Uint(u) => Value::Uint(*u),
            Value::Float(f) => Value::Float(*f),
            Value::String(s) => Value::String(s.clone()),
            Value::Array(a) => Value::Array(a.clone()),
            Value::Object(o) => Value::Object(o.clone()),
            Value::Discarded => Value::Discarded,
        }
    }
}

impl<T: ValueTypes> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Value::Object(o) => f.debug_tuple("Object").field(o).finish(),
            Value::Discarded => f.write_str("Discarded"),
        }
    }
}

impl<T: ValueTypes> PartialEq for Value<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            // Numbers compare by numeric value across variants.
            (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
                *a >= 0 && *a as u64 == *b
            }
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Uint(a), Value::Float(b)) | (Value::Float(b), Value::Uint(a)) => {
                *a as f64 == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Discarded, Value::Discarded) => true,
            _ => false,
        }
    }
}

impl<T: ValueTypes> From<bool> for Value<T> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_signed {
    ($($ty:ty),*) => {
        $(
            impl<T: ValueTypes> From<$ty> for Value<T> {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl<T: ValueTypes> From<$ty> for Value<T> {
                fn from(value: $ty) -> Self {
                    Value::Uint(value as u64)
                }
            }
        )*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl<T: ValueTypes> From<f32> for Value<T> {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl<T: ValueTypes> From<f64> for Value<T> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a, T: ValueTypes> From<&'a str> for Value<T> {
    fn from(value: &'a str) -> Self {
        Value::String(T::String::from(value))
    }
}

impl<T: ValueTypes> From<String> for Value<T> {
    fn from(value: String) -> Self {
        Value::String(T::String::from(value.as_str()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<indexmap::IndexMap<String, Value>> for Value {
    fn from(value: indexmap::IndexMap<String, Value>) -> Self {
        Value::Object(value)
    }
}

impl<T: ValueTypes> Serialize for Value<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s.as_str()),
            Value::Array(a) => {
                let mut seq = serializer.serialize_seq(Some(a.len()))?;
                for element in a.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.len()))?;
                for (key, value) in o.iter() {
                    map.serialize_entry(key.as_str(), value)?;
                }
                map.end()
            }
            Value::Discarded => Err(serde::ser::Error::custom(
                "cannot serialize a discarded value",
            )),
        }
    }
}

struct ValueVisitor<T: ValueTypes>(PhantomData<T>);

impl<'de, T: ValueTypes> Visitor<'de> for ValueVisitor<T> {
    type Value = Value<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Uint(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(T::String::from(v)))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut array = T::Array::default();
        while let Some(element) = seq.next_element::<Value<T>>()? {
            array.push(element);
        }
        Ok(Value::Array(array))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = T::Object::default();
        while let Some((key, value)) = map.next_entry::<String, Value<T>>()? {
            object.insert(T::String::from(key.as_str()), value);
        }
        Ok(Value::Object(object))
    }
}

impl<'de, T: ValueTypes> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        let value: Value = Value::default();
        assert!(value.is_null());
    }

    #[test]
    fn predicates_match_variants() {
        assert!(Value::<DefaultTypes>::Null.is_null());
        assert!(Value::<DefaultTypes>::Bool(true).is_bool());
        assert!(Value::<DefaultTypes>::Int(-1).is_int());
        assert!(Value::<DefaultTypes>::Uint(1).is_uint());
        assert!(Value::<DefaultTypes>::Float(0.5).is_float());
        assert!(Value::<DefaultTypes>::Int(1).is_number());
        assert!(Value::<DefaultTypes>::from("s").is_string());
        assert!(Value::<DefaultTypes>::Discarded.is_discarded());
    }

    #[test]
    fn numeric_equality_crosses_variants() {
        assert_eq!(Value::<DefaultTypes>::Int(1), Value::Uint(1));
        assert_eq!(Value::<DefaultTypes>::Uint(1), Value::Int(1));
        assert_eq!(Value::<DefaultTypes>::Int(2), Value::Float(2.0));
        assert_eq!(Value::<DefaultTypes>::Uint(2), Value::Float(2.0));
        assert_ne!(Value::<DefaultTypes>::Int(-1), Value::Uint(u64::MAX));
        assert_ne!(Value::<DefaultTypes>::Int(1), Value::Bool(true));
    }

    #[test]
    fn integer_accessors_convert_in_range() {
        assert_eq!(Value::<DefaultTypes>::Uint(7).as_i64(), Some(7));
        assert_eq!(Value::<DefaultTypes>::Uint(u64::MAX).as_i64(), None);
        assert_eq!(Value::<DefaultTypes>::Int(-1).as_u64(), None);
        assert_eq!(Value::<DefaultTypes>::Int(3).as_f64(), Some(3.0));
    }

    #[test]
    fn clone_is_deep() {
        let mut inner = indexmap::IndexMap::new();
        inner.insert("k".to_string(), Value::Int(1));
        let original: Value = Value::Object(inner);
        let mut copy = original.clone();
        copy.as_object_mut()
            .unwrap()
            .insert("k".to_string(), Value::Int(2));
        assert_eq!(original.get("k"), Some(&Value::Int(1)));
        assert_eq!(copy.get("k"), Some(&Value::Int(2)));
    }

    #[test]
    fn object_get_looks_up_members() {
        let mut map = indexmap::IndexMap::new();
        map.insert("present".to_string(), Value::Bool(true));
        let value: Value = Value::Object(map);
        assert_eq!(value.get("present"), Some(&Value::Bool(true)));
        assert_eq!(value.get("absent"), None);
        assert_eq!(Value::<DefaultTypes>::Null.get("present"), None);
    }
}
