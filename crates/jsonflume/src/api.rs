//! Top-level entry points.
//!
//! One-shot conversion between text and the DOM ([`serialize`] /
//! [`deserialize`]), and the streaming entry points ([`build`], [`read`],
//! [`view`]). Each streaming entry has a type-erased `*_any` variant that
//! hides the sink or stream type behind a trait object; those are the ones
//! to reach for when the handle type would otherwise leak into long-lived
//! signatures, at the cost of one virtual call per write or codepoint.

use alloc::string::String;

use crate::builder::{self, BuildValue};
use crate::deserializer::{Deserializer, Number};
use crate::error::Error;
use crate::reader::{self, ReadValue};
use crate::serializer::Serializer;
use crate::sink::{AnySink, Sink};
use crate::stream::{AnyStream, ByteStream, CodePolicy, Stream, StrStream};
use crate::value::{Kind, Value};
use crate::view::{self, Viewer};

/// A builder root over a type-erased sink.
pub type AnyBuildValue<'a> = BuildValue<AnySink<'a>>;

/// A reader root over a type-erased stream.
pub type AnyReadValue<'a> = ReadValue<AnyStream<'a>>;

/// Serializes a DOM value to a string. An empty `indent` produces compact
/// output.
///
/// ```
/// use jsonflume::{serialize, Value};
///
/// let v: Value = [("a", Value::from(1u64))].into_iter().collect();
/// assert_eq!(serialize(&v, "").unwrap(), r#"{"a":1}"#);
/// ```
pub fn serialize(value: &Value, indent: &str) -> Result<String, Error> {
    let mut ser = Serializer::new(String::new(), indent);
    ser.write_value(value)?;
    Ok(ser.into_sink())
}

/// Serializes a DOM value into `sink`.
pub fn serialize_to<S: Sink>(sink: S, value: &Value, indent: &str) -> Result<(), Error> {
    Serializer::new(sink, indent).write_value(value)
}

fn parse_array<R: Stream>(de: &mut Deserializer<R>, out: &mut Value) -> Result<(), Error> {
    let items = out.arr_mut();
    // The slot may hold an earlier occurrence of a duplicate key.
    items.clear();
    if de.check_is_empty(false)? {
        return Ok(());
    }
    loop {
        items.push(Value::Null);
        let slot = items.last_mut().expect("just pushed");
        parse_value(de, slot)?;
        if de.close_else_separator(false)? {
            return Ok(());
        }
    }
}

fn parse_object<R: Stream>(de: &mut Deserializer<R>, out: &mut Value) -> Result<(), Error> {
    let members = out.obj_mut();
    members.clear();
    if de.check_is_empty(true)? {
        return Ok(());
    }
    loop {
        let mut key = String::new();
        de.read_string(&mut key, true)?;
        // A duplicate key re-parses into the same slot, so the last
        // occurrence wins.
        let slot = members.entry(key).or_insert(Value::Null);
        parse_value(de, slot)?;
        if de.close_else_separator(true)? {
            return Ok(());
        }
    }
}

fn parse_value<R: Stream>(de: &mut Deserializer<R>, out: &mut Value) -> Result<(), Error> {
    match de.peek_or_open_next()? {
        Kind::String => {
            let s = out.str_mut();
            s.clear();
            de.read_string(s, false)
        }
        Kind::Object => parse_object(de, out),
        Kind::Array => parse_array(de, out),
        Kind::Boolean => {
            *out = Value::Boolean(de.read_boolean()?);
            Ok(())
        }
        Kind::Uint | Kind::Int | Kind::Real => {
            *out = match de.read_number()? {
                Number::Uint(v) => Value::Uint(v),
                Number::Int(v) => Value::Int(v),
                Number::Real(v) => Value::Real(v),
            };
            Ok(())
        }
        Kind::Null => {
            de.read_null()?;
            *out = Value::Null;
            Ok(())
        }
    }
}

/// Parses one JSON document from a stream into a DOM value, consuming the
/// stream entirely. Duplicate object keys keep the last occurrence.
pub fn deserialize_stream<R: Stream>(stream: R) -> Result<Value, Error> {
    let mut de = Deserializer::new(stream);
    let mut out = Value::Null;
    parse_value(&mut de, &mut out)?;
    de.check_done()?;
    Ok(out)
}

/// Parses one JSON document from a string into a DOM value.
///
/// ```
/// use jsonflume::{deserialize, Kind};
///
/// let v = deserialize(r#"{"n": -3, "xs": [1, 2.5]}"#).unwrap();
/// assert_eq!(v.get("n").unwrap().kind(), Kind::Int);
/// assert_eq!(v.get("xs").unwrap().at(1).unwrap().real().unwrap(), 2.5);
/// ```
pub fn deserialize(text: &str) -> Result<Value, Error> {
    deserialize_stream(StrStream::new(text))
}

/// Parses one JSON document from raw bytes, decoding UTF-8 with the given
/// malformed-input policy.
pub fn deserialize_bytes(bytes: &[u8], policy: CodePolicy) -> Result<Value, Error> {
    let mut de = Deserializer::with_policy(ByteStream::new(bytes, policy), policy);
    let mut out = Value::Null;
    parse_value(&mut de, &mut out)?;
    de.check_done()?;
    Ok(out)
}

/// Starts a streaming build into `sink` and returns the handle for the
/// document's root value. An empty `indent` produces compact output.
///
/// ```
/// use jsonflume::build;
///
/// let mut out = String::new();
/// let mut arr = build(&mut out, "").arr()?;
/// arr.push(1u64)?.push("two")?;
/// drop(arr);
/// assert_eq!(out, r#"[1,"two"]"#);
/// # Ok::<(), jsonflume::Error>(())
/// ```
pub fn build<S: Sink>(sink: S, indent: &str) -> BuildValue<S> {
    builder::root(sink, indent)
}

/// Like [`build`], but erases the sink type so handles are plain
/// [`AnyBuildValue`] regardless of the destination.
pub fn build_any<'a>(sink: impl Sink + 'a, indent: &str) -> AnyBuildValue<'a> {
    builder::root(alloc::boxed::Box::new(sink), indent)
}

/// Starts a streaming read over `stream` and returns the handle for the
/// document's root value.
pub fn read<R: Stream>(stream: R) -> Result<ReadValue<R>, Error> {
    reader::root(Deserializer::new(stream))
}

/// Like [`read`], but erases the stream type so handles are plain
/// [`AnyReadValue`] regardless of the source.
pub fn read_any<'a>(stream: impl Stream + 'a) -> Result<AnyReadValue<'a>, Error> {
    reader::root(Deserializer::new(alloc::boxed::Box::new(stream)))
}

/// Starts a streaming read over raw bytes, decoding UTF-8 with the given
/// malformed-input policy (applied to `\u` escapes as well).
pub fn read_bytes(bytes: &[u8], policy: CodePolicy) -> Result<ReadValue<ByteStream<'_>>, Error> {
    reader::root(Deserializer::with_policy(
        ByteStream::new(bytes, policy),
        policy,
    ))
}

/// Builds a materialized view from `stream`, consuming it entirely.
pub fn view<R: Stream>(stream: R) -> Result<Viewer, Error> {
    view::build(Deserializer::new(stream))
}

/// Builds a materialized view from a string.
///
/// ```
/// use jsonflume::view_str;
///
/// let v = view_str(r#"{"a": [10, 20]}"#).unwrap();
/// assert_eq!(v.get("a").unwrap().at(1).unwrap().unum().unwrap(), 20);
/// ```
pub fn view_str(text: &str) -> Result<Viewer, Error> {
    view::build(Deserializer::new(StrStream::new(text)))
}

/// Builds a materialized view from raw bytes, decoding UTF-8 with the
/// given malformed-input policy (applied to `\u` escapes as well).
pub fn view_bytes(bytes: &[u8], policy: CodePolicy) -> Result<Viewer, Error> {
    view::build(Deserializer::with_policy(
        ByteStream::new(bytes, policy),
        policy,
    ))
}
