//! BSON decoding.
//!
//! This module parses a byte buffer into a [`Value`] tree. A document
//! is read as a little-endian `i32` size, a run of elements (tag,
//! null-terminated key, payload), and a `0x00` terminator; the declared
//! size must match the bytes actually consumed. Embedded documents
//! under the array tag are parsed the same way, except their keys are
//! discarded and the payloads populate an array in arrival order.
//!
//! Both integer tags (`0x10` and `0x12`) decode to
//! [`Value::Int`]; an unsigned value that was encoded through the
//! signed wire representation still compares equal afterwards because
//! numeric equality crosses variants.
//!
//! ## Failure policy
//!
//! Every structural problem (bad size, truncation, unknown tag,
//! missing terminator, invalid UTF-8, strict-mode trailing bytes) is a
//! parse error carrying the byte offset at which it was detected. With
//! [`DecodeOptions::discard_errors`] set, the same conditions yield
//! [`Value::Discarded`] instead; a partially built tree is never
//! returned.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use bson_value::{from_bson, Value};
//!
//! let bytes = [
//!     0x0D, 0x00, 0x00, 0x00, // size
//!     0x08, b'e', b'n', b't', b'r', b'y', 0x00, // bool element "entry"
//!     0x01, // true
//!     0x00, // terminator
//! ];
//! let value: Value = from_bson(&bytes).unwrap();
//! assert_eq!(value.get("entry"), Some(&Value::Bool(true)));
//! ```

use crate::ser::{
    TAG_ARRAY, TAG_BOOL, TAG_DOCUMENT, TAG_DOUBLE, TAG_INT32, TAG_INT64, TAG_NULL, TAG_STRING,
};
use crate::types::{ArrayType, ObjectType, StringType};
use crate::{DecodeOptions, Error, Result, Value, ValueTypes};

pub(crate) fn decode<T: ValueTypes>(bytes: &[u8], options: DecodeOptions) -> Result<Value<T>> {
    let mut decoder = Decoder::new(bytes);
    let result = decoder.parse_document::<T>(DocumentKind::Object).and_then(|value| {
        if options.strict && decoder.position != bytes.len() {
            let trailing = bytes.len() - decoder.position;
            return Err(Error::parse(
                decoder.position,
                format!("{trailing} trailing byte(s) after the document"),
            ));
        }
        Ok(value)
    });
    match result {
        Err(_) if options.discard_errors => Ok(Value::Discarded),
        other => other,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Object,
    /// Keys are read and thrown away; only payload order matters.
    Array,
}

/// Hard cap on document/array nesting. A hostile input needs only a
/// few bytes per level, so unbounded recursion would let a short
/// buffer exhaust the stack.
const MAX_DEPTH: usize = 256;

/// Cursor over the input buffer. All reads are bounds-checked and every
/// failure reports the offset at which the read was attempted.
struct Decoder<'de> {
    input: &'de [u8],
    position: usize,
    depth: usize,
}

impl<'de> Decoder<'de> {
    fn new(input: &'de [u8]) -> Self {
        Decoder {
            input,
            position: 0,
            depth: 0,
        }
    }

    fn read_exact(&mut self, count: usize) -> Result<&'de [u8]> {
        let end = self.position.checked_add(count).filter(|e| *e <= self.input.len());
        match end {
            Some(end) => {
                let bytes = &self.input[self.position..end];
                self.position = end;
                Ok(bytes)
            }
            None => Err(Error::parse(self.position, "unexpected end of input")),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_exact(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_exact(8)?);
        Ok(i64::from_le_bytes(buf))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_exact(8)?);
        Ok(f64::from_le_bytes(buf))
    }

    /// Reads up to and including the next `0x00` byte, returning the
    /// content before it.
    fn read_cstring(&mut self) -> Result<&'de str> {
        let start = self.position;
        let remaining = &self.input[start..];
        let terminator = remaining
            .iter()
            .position(|byte| *byte == 0x00)
            .ok_or_else(|| Error::parse(start, "unterminated cstring"))?;
        let content = std::str::from_utf8(&remaining[..terminator])
            .map_err(|_| Error::parse(start, "invalid UTF-8 in cstring"))?;
        self.position = start + terminator + 1;
        Ok(content)
    }

    /// Reads a length-prefixed string payload: LE `i32` byte count
    /// (including the trailing `0x00`), content, terminator.
    fn read_string<T: ValueTypes>(&mut self) -> Result<T::String> {
        let start = self.position;
        let length = self.read_i32()?;
        if length < 1 {
            return Err(Error::parse(
                start,
                format!("invalid string length {length}"),
            ));
        }
        let bytes = self.read_exact(length as usize)?;
        let (content, terminator) = bytes.split_at(length as usize - 1);
        if terminator[0] != 0x00 {
            return Err(Error::parse(
                self.position - 1,
                "string is missing its null terminator",
            ));
        }
        T::String::from_utf8(content)
            .ok_or_else(|| Error::parse(start + 4, "invalid UTF-8 in string"))
    }

    /// Parses one document: size prefix, elements, terminator. The
    /// declared size must match the bytes actually consumed.
    fn parse_document<T: ValueTypes>(&mut self, kind: DocumentKind) -> Result<Value<T>> {
        if self.depth == MAX_DEPTH {
            return Err(Error::parse(
                self.position,
                format!("nesting depth exceeds {MAX_DEPTH}"),
            ));
        }
        self.depth += 1;
        let result = self.parse_document_body::<T>(kind);
        self.depth -= 1;
        result
    }

    fn parse_document_body<T: ValueTypes>(&mut self, kind: DocumentKind) -> Result<Value<T>> {
        let start = self.position;
        let size = self.read_i32()?;
        if size < 5 {
            return Err(Error::parse(start, format!("invalid document size {size}")));
        }
        if size as usize > self.input.len() - start {
            return Err(Error::parse(
                start,
                format!("document size {size} exceeds the available input"),
            ));
        }

        let mut object = T::Object::default();
        let mut array = T::Array::default();
        loop {
            let tag_offset = self.position;
            let tag = self.read_u8()?;
            if tag == 0x00 {
                break;
            }
            let key = self.read_cstring()?;
            let value = self.parse_payload::<T>(tag, tag_offset)?;
            match kind {
                DocumentKind::Object => {
                    object.insert(T::String::from(key), value);
                }
                DocumentKind::Array => array.push(value),
            }
        }

        let consumed = self.position - start;
        if consumed != size as usize {
            return Err(Error::parse(
                start,
                format!("document size mismatch: declared {size}, consumed {consumed}"),
            ));
        }
        Ok(match kind {
            DocumentKind::Object => Value::Object(object),
            DocumentKind::Array => Value::Array(array),
        })
    }

    fn parse_payload<T: ValueTypes>(&mut self, tag: u8, tag_offset: usize) -> Result<Value<T>> {
        match tag {
            TAG_DOUBLE => Ok(Value::Float(self.read_f64()?)),
            TAG_STRING => Ok(Value::String(self.read_string::<T>()?)),
            TAG_DOCUMENT => self.parse_document(DocumentKind::Object),
            TAG_ARRAY => self.parse_document(DocumentKind::Array),
            TAG_BOOL => {
                let offset = self.position;
                match self.read_u8()? {
                    0x00 => Ok(Value::Bool(false)),
                    0x01 => Ok(Value::Bool(true)),
                    other => Err(Error::parse(
                        offset,
                        format!("invalid boolean payload 0x{other:02X}"),
                    )),
                }
            }
            TAG_NULL => Ok(Value::Null),
            TAG_INT32 => Ok(Value::Int(self.read_i32()? as i64)),
            TAG_INT64 => Ok(Value::Int(self.read_i64()?)),
            other => Err(Error::parse(
                tag_offset,
                format!("unrecognized element type 0x{other:02X}"),
            )),
        }
    }
}
