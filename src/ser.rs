//! BSON encoding.
//!
//! This module walks a [`Value`] tree and emits the BSON byte layout:
//! each document is a little-endian `i32` total size, a run of elements
//! (one-byte type tag, null-terminated key, type-specific payload), and
//! a terminating `0x00`. Arrays are encoded as embedded documents whose
//! elements carry empty keys; reconstruction relies purely on encounter
//! order.
//!
//! Integer elements pick the narrowest wire representation by numeric
//! magnitude alone: anything that fits the signed 32-bit range uses tag
//! `0x10`, everything else in the signed 64-bit range uses tag `0x12`.
//! The value's stored width does not matter, so a 64-bit `-1` still
//! encodes as a 4-byte field.
//!
//! Only an object is accepted at the root; the sole exception is the
//! [`Discarded`](Value::Discarded) sentinel, which encodes to an empty
//! byte sequence.
//!
//! ## Usage
//!
//! Most users should use [`to_bson`](crate::to_bson) in the crate root:
//!
//! ```rust
//! use bson_value::{to_bson, to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Doc { entry: bool }
//!
//! let value: Value = to_value(Doc { entry: true }).unwrap();
//! let bytes = to_bson(&value).unwrap();
//! assert_eq!(bytes[0], 0x0D); // total size, little endian
//! assert_eq!(*bytes.last().unwrap(), 0x00);
//! ```
//!
//! This module also provides [`ValueSerializer`], a `serde::Serializer`
//! that produces a [`Value`] tree from any `T: Serialize`; it backs
//! [`to_value`](crate::to_value).

use crate::types::{ArrayType, ObjectType, StringType};
use crate::{Error, Result, Value, ValueTypes};
use serde::{ser, Serialize};
use std::marker::PhantomData;

pub(crate) const TAG_DOUBLE: u8 = 0x01;
pub(crate) const TAG_STRING: u8 = 0x02;
pub(crate) const TAG_DOCUMENT: u8 = 0x03;
pub(crate) const TAG_ARRAY: u8 = 0x04;
pub(crate) const TAG_BOOL: u8 = 0x08;
pub(crate) const TAG_NULL: u8 = 0x0A;
pub(crate) const TAG_INT32: u8 = 0x10;
pub(crate) const TAG_INT64: u8 = 0x12;

/// Picks the integer element tag by numeric magnitude alone.
pub(crate) fn integer_tag(value: i64) -> u8 {
    if (i32::MIN as i64..=i32::MAX as i64).contains(&value) {
        TAG_INT32
    } else {
        TAG_INT64
    }
}

pub(crate) fn encode<T: ValueTypes>(value: &Value<T>) -> Result<Vec<u8>> {
    match value {
        Value::Discarded => Ok(Vec::new()),
        Value::Object(object) => {
            let mut encoder = Encoder::new();
            encoder.encode_document::<T>(object)?;
            Ok(encoder.bytes)
        }
        other => Err(Error::type_error(format!(
            "root must be an object to serialize to this binary format; found {}",
            other.kind()
        ))),
    }
}

/// The BSON encoder.
///
/// Writes documents into a growing byte buffer; size prefixes are
/// back-patched once a document's body is complete, so the tree is
/// walked exactly once.
struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    fn new() -> Self {
        // 128 bytes covers typical small documents without reallocating
        Encoder {
            bytes: Vec::with_capacity(128),
        }
    }

    fn encode_document<T: ValueTypes>(&mut self, object: &T::Object) -> Result<()> {
        let start = self.reserve_size();
        for (key, value) in object.iter() {
            self.encode_element::<T>(key.as_bytes(), value)?;
        }
        self.bytes.push(0x00);
        self.patch_size(start)
    }

    fn encode_array<T: ValueTypes>(&mut self, array: &T::Array) -> Result<()> {
        let start = self.reserve_size();
        for element in array.iter() {
            // array elements carry empty keys; order alone is significant
            self.encode_element::<T>(b"", element)?;
        }
        self.bytes.push(0x00);
        self.patch_size(start)
    }

    fn encode_element<T: ValueTypes>(&mut self, key: &[u8], value: &Value<T>) -> Result<()> {
        match value {
            Value::Null => {
                self.bytes.push(TAG_NULL);
                self.write_cstring(key)
            }
            Value::Bool(b) => {
                self.bytes.push(TAG_BOOL);
                self.write_cstring(key)?;
                self.bytes.push(u8::from(*b));
                Ok(())
            }
            Value::Int(i) => {
                self.write_integer(key, *i)
            }
            Value::Uint(u) => {
                let i = i64::try_from(*u).map_err(|_| {
                    Error::type_error(format!(
                        "integer number {u} cannot be represented in this binary format"
                    ))
                })?;
                self.write_integer(key, i)
            }
            Value::Float(f) => {
                self.bytes.push(TAG_DOUBLE);
                self.write_cstring(key)?;
                self.bytes.extend_from_slice(&f.to_le_bytes());
                Ok(())
            }
            Value::String(s) => {
                self.bytes.push(TAG_STRING);
                self.write_cstring(key)?;
                let length = i32::try_from(s.len() + 1).map_err(|_| {
                    Error::type_error("string exceeds the maximum encodable length")
                })?;
                self.bytes.extend_from_slice(&length.to_le_bytes());
                self.bytes.extend_from_slice(s.as_bytes());
                self.bytes.push(0x00);
                Ok(())
            }
            Value::Object(object) => {
                self.bytes.push(TAG_DOCUMENT);
                self.write_cstring(key)?;
                self.encode_document::<T>(object)
            }
            Value::Array(array) => {
                self.bytes.push(TAG_ARRAY);
                self.write_cstring(key)?;
                self.encode_array::<T>(array)
            }
            Value::Discarded => Err(Error::type_error(
                "discarded value cannot appear inside a document",
            )),
        }
    }

    fn write_integer(&mut self, key: &[u8], value: i64) -> Result<()> {
        let tag = integer_tag(value);
        self.bytes.push(tag);
        self.write_cstring(key)?;
        if tag == TAG_INT32 {
            self.bytes.extend_from_slice(&(value as i32).to_le_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    fn write_cstring(&mut self, content: &[u8]) -> Result<()> {
        if content.contains(&0x00) {
            return Err(Error::type_error("object key must not contain a NUL byte"));
        }
        self.bytes.extend_from_slice(content);
        self.bytes.push(0x00);
        Ok(())
    }

    /// Reserves the 4-byte size field and returns its offset.
    fn reserve_size(&mut self) -> usize {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(&[0x00; 4]);
        start
    }

    fn patch_size(&mut self, start: usize) -> Result<()> {
        let length = self.bytes.len() - start;
        let size = i32::try_from(length)
            .map_err(|_| Error::type_error("document exceeds the maximum encodable size"))?;
        self.bytes[start..start + 4].copy_from_slice(&size.to_le_bytes());
        Ok(())
    }
}

/// A `serde::Serializer` that produces a [`Value`] tree.
///
/// Backs [`to_value`](crate::to_value). Maps and structs become
/// objects, sequences and tuples become arrays, `Option::None` and
/// units become null. Map keys must serialize as strings.
pub struct ValueSerializer<T: ValueTypes>(PhantomData<T>);

impl<T: ValueTypes> ValueSerializer<T> {
    #[must_use]
    pub fn new() -> Self {
        ValueSerializer(PhantomData)
    }
}

impl<T: ValueTypes> Default for ValueSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SerializeArray<T: ValueTypes> {
    array: T::Array,
}

pub struct SerializeObject<T: ValueTypes> {
    object: T::Object,
    next_key: Option<T::String>,
}

impl<T: ValueTypes> ser::Serializer for ValueSerializer<T> {
    type Ok = Value<T>;
    type Error = Error;

    type SerializeSeq = SerializeArray<T>;
    type SerializeTuple = SerializeArray<T>;
    type SerializeTupleStruct = SerializeArray<T>;
    type SerializeTupleVariant = SerializeArray<T>;
    type SerializeMap = SerializeObject<T>;
    type SerializeStruct = SerializeObject<T>;
    type SerializeStructVariant = SerializeObject<T>;

    fn serialize_bool(self, v: bool) -> Result<Value<T>> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value<T>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value<T>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value<T>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value<T>> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value<T>> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value<T>> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value<T>> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value<T>> {
        Ok(Value::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value<T>> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value<T>> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value<T>> {
        let mut s = T::String::default();
        s.push(v);
        Ok(Value::String(s))
    }

    fn serialize_str(self, v: &str) -> Result<Value<T>> {
        Ok(Value::String(T::String::from(v)))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value<T>> {
        Err(Error::Message(
            "raw byte arrays have no value representation".to_string(),
        ))
    }

    fn serialize_none(self) -> Result<Value<T>> {
        Ok(Value::Null)
    }

    fn serialize_some<V>(self, value: &V) -> Result<Value<T>>
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value<T>> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value<T>> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value<T>> {
        Ok(Value::String(T::String::from(variant)))
    }

    fn serialize_newtype_struct<V>(self, _name: &'static str, value: &V) -> Result<Value<T>>
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &V,
    ) -> Result<Value<T>>
    where
        V: ?Sized + Serialize,
    {
        Err(Error::Message("newtype variants are not supported".to_string()))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeArray<T>> {
        Ok(SerializeArray {
            array: T::Array::default(),
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeArray<T>> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeArray<T>> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeArray<T>> {
        Err(Error::Message("tuple variants are not supported".to_string()))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeObject<T>> {
        Ok(SerializeObject {
            object: T::Object::default(),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeObject<T>> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeObject<T>> {
        Err(Error::Message("struct variants are not supported".to_string()))
    }
}

impl<T: ValueTypes> ser::SerializeSeq for SerializeArray<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_element<V>(&mut self, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        self.array.push(value.serialize(ValueSerializer::new())?);
        Ok(())
    }

    fn end(self) -> Result<Value<T>> {
        Ok(Value::Array(self.array))
    }
}

impl<T: ValueTypes> ser::SerializeTuple for SerializeArray<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_element<V>(&mut self, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<T>> {
        ser::SerializeSeq::end(self)
    }
}

impl<T: ValueTypes> ser::SerializeTupleStruct for SerializeArray<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_field<V>(&mut self, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<T>> {
        ser::SerializeSeq::end(self)
    }
}

impl<T: ValueTypes> ser::SerializeTupleVariant for SerializeArray<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_field<V>(&mut self, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<T>> {
        ser::SerializeSeq::end(self)
    }
}

impl<T: ValueTypes> ser::SerializeMap for SerializeObject<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_key<V>(&mut self, key: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer::<T>::new())? {
            Value::String(s) => {
                self.next_key = Some(s);
                Ok(())
            }
            other => Err(Error::Message(format!(
                "map keys must be strings, found {}",
                other.kind()
            ))),
        }
    }

    fn serialize_value<V>(&mut self, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Message("serialize_value called without serialize_key".to_string()))?;
        self.object
            .insert(key, value.serialize(ValueSerializer::new())?);
        Ok(())
    }

    fn end(self) -> Result<Value<T>> {
        Ok(Value::Object(self.object))
    }
}

impl<T: ValueTypes> ser::SerializeStruct for SerializeObject<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_field<V>(&mut self, key: &'static str, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        self.object.insert(
            T::String::from(key),
            value.serialize(ValueSerializer::new())?,
        );
        Ok(())
    }

    fn end(self) -> Result<Value<T>> {
        Ok(Value::Object(self.object))
    }
}

impl<T: ValueTypes> ser::SerializeStructVariant for SerializeObject<T> {
    type Ok = Value<T>;
    type Error = Error;

    fn serialize_field<V>(&mut self, key: &'static str, value: &V) -> Result<()>
    where
        V: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Value<T>> {
        ser::SerializeStruct::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_tag_selects_by_magnitude() {
        assert_eq!(integer_tag(0), TAG_INT32);
        assert_eq!(integer_tag(-1), TAG_INT32);
        assert_eq!(integer_tag(i32::MAX as i64), TAG_INT32);
        assert_eq!(integer_tag(i32::MIN as i64), TAG_INT32);
        assert_eq!(integer_tag(i32::MAX as i64 + 1), TAG_INT64);
        assert_eq!(integer_tag(i32::MIN as i64 - 1), TAG_INT64);
        assert_eq!(integer_tag(i64::MAX), TAG_INT64);
        assert_eq!(integer_tag(i64::MIN), TAG_INT64);
    }

    #[test]
    fn cstring_rejects_embedded_nul() {
        let mut encoder = Encoder::new();
        let err = encoder.write_cstring(b"a\x00b").unwrap_err();
        assert!(err.is_type_error());
    }
}
