//! Exercises the customization contract with a non-default string type
//! and a sorted object container, checking that codec output is
//! byte-identical to the default configuration for semantically equal
//! input.

use bson_value::{
    from_bson, to_bson, ArrayType, ObjectType, StringType, Value, ValueTypes,
};
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Virtually a string: wraps `String` but counts as a distinct type,
/// so everything must go through the trait surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AltString(String);

impl Borrow<str> for AltString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for AltString {
    fn from(s: &'a str) -> Self {
        AltString(s.to_string())
    }
}

impl StringType for AltString {
    fn push_str(&mut self, string: &str) {
        self.0.push_str(string);
    }

    fn push(&mut self, ch: char) {
        self.0.push(ch);
    }

    fn set_byte(&mut self, index: usize, byte: u8) {
        StringType::set_byte(&mut self.0, index, byte);
    }

    fn resize(&mut self, new_len: usize, fill: u8) {
        StringType::resize(&mut self.0, new_len, fill);
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct AltTypes;

impl ValueTypes for AltTypes {
    type String = AltString;
    type Array = Vec<Value<AltTypes>>;
    type Object = BTreeMap<AltString, Value<AltTypes>>;
}

#[test]
fn string_operations_behave_like_the_default() {
    let mut s = AltString::from("bson");
    assert_eq!(s.len(), 4);
    assert!(!s.is_empty());
    assert_eq!(s.byte_at(0), b'b');
    assert_eq!(s.last_byte(), Some(b'n'));

    s.push_str("str");
    s.push('!');
    assert_eq!(s.as_str(), "bsonstr!");

    s.set_byte(7, b'?');
    assert_eq!(s.as_str(), "bsonstr?");

    s.resize(4, b' ');
    assert_eq!(s.as_str(), "bson");
    s.resize(6, b'x');
    assert_eq!(s.as_str(), "bsonxx");

    assert_eq!(AltString::repeated(3, 'a').as_str(), "aaa");
    assert_eq!(AltString::from_utf8(b"ok").unwrap().as_str(), "ok");
    assert_eq!(AltString::from_utf8(&[0xFF, 0xFE]), None);

    // comparison against both str and AltString operands
    assert_eq!(Borrow::<str>::borrow(&s), "bsonxx");
    assert_eq!(s, AltString::from("bsonxx"));
    assert!(AltString::from("a") < AltString::from("b"));
}

/// Builds the same document in both configurations. Members are
/// inserted in sorted key order so that the insertion-ordered default
/// container iterates in the same order the sorted container does.
fn fixture_keys_sorted() -> (Value, Value<AltTypes>) {
    let mut answer = IndexMap::new();
    answer.insert("everything".to_string(), Value::Int(42));
    let mut object = IndexMap::new();
    object.insert("currency".to_string(), Value::from("USD"));
    object.insert("value".to_string(), Value::Float(42.99));
    let mut default_doc = IndexMap::new();
    default_doc.insert("answer".to_string(), Value::Object(answer));
    default_doc.insert("happy".to_string(), Value::Bool(true));
    default_doc.insert(
        "list".to_string(),
        Value::Array(vec![Value::Int(1), Value::Int(0), Value::Int(2)]),
    );
    default_doc.insert("name".to_string(), Value::from("I'm Batman"));
    default_doc.insert("nothing".to_string(), Value::Null);
    default_doc.insert("object".to_string(), Value::Object(object));
    default_doc.insert("pi".to_string(), Value::Float(3.141));

    let mut alt_answer = BTreeMap::new();
    alt_answer.insert(AltString::from("everything"), Value::Int(42));
    let mut alt_object = BTreeMap::new();
    alt_object.insert(AltString::from("currency"), Value::from("USD"));
    alt_object.insert(AltString::from("value"), Value::Float(42.99));
    let mut alt_doc = BTreeMap::new();
    alt_doc.insert(AltString::from("answer"), Value::Object(alt_answer));
    alt_doc.insert(AltString::from("happy"), Value::Bool(true));
    alt_doc.insert(
        AltString::from("list"),
        Value::Array(vec![Value::Int(1), Value::Int(0), Value::Int(2)]),
    );
    alt_doc.insert(AltString::from("name"), Value::from("I'm Batman"));
    alt_doc.insert(AltString::from("nothing"), Value::Null);
    alt_doc.insert(AltString::from("object"), Value::Object(alt_object));
    alt_doc.insert(AltString::from("pi"), Value::Float(3.141));

    (Value::Object(default_doc), Value::Object(alt_doc))
}

#[test]
fn alternative_configuration_encodes_identical_bytes() {
    let (default_value, alt_value) = fixture_keys_sorted();
    let default_bytes = to_bson(&default_value).unwrap();
    let alt_bytes = to_bson(&alt_value).unwrap();
    assert_eq!(default_bytes, alt_bytes);
}

#[test]
fn alternative_configuration_round_trips() {
    let (_, alt_value) = fixture_keys_sorted();
    let bytes = to_bson(&alt_value).unwrap();
    let decoded: Value<AltTypes> = from_bson(&bytes).unwrap();
    assert_eq!(decoded, alt_value);
}

#[test]
fn sorted_container_reorders_members_on_encode() {
    // BTreeMap iterates by key, not by insertion order
    let mut alt_doc = BTreeMap::new();
    alt_doc.insert(AltString::from("z"), Value::<AltTypes>::Int(1));
    alt_doc.insert(AltString::from("a"), Value::<AltTypes>::Int(2));
    let bytes = to_bson(&Value::<AltTypes>::Object(alt_doc)).unwrap();
    assert_eq!(bytes[5], b'a');
}

#[test]
fn trait_surface_is_enough_to_build_trees() {
    // build an array and an object purely through the trait methods
    let mut array = <AltTypes as ValueTypes>::Array::default();
    ArrayType::push(&mut array, Value::Int(1));
    ArrayType::push(&mut array, Value::from("two"));
    assert_eq!(ArrayType::len(&array), 2);
    assert_eq!(ArrayType::get(&array, 1).and_then(Value::as_str), Some("two"));

    let mut object = <AltTypes as ValueTypes>::Object::default();
    let displaced = ObjectType::insert(&mut object, AltString::from("k"), Value::Array(array));
    assert!(displaced.is_none());
    let displaced = ObjectType::insert(&mut object, AltString::from("k"), Value::Null);
    assert!(displaced.is_some());
    assert_eq!(ObjectType::get(&object, "k"), Some(&Value::Null));
}
