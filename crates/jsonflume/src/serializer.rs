//! Token-level JSON writer.
//!
//! [`Serializer`] emits one well-formed token stream into a [`Sink`]:
//! `begin`/`end` brackets, keys, separators, and primitives, with escape and
//! number formatting handled here and nowhere else. The streaming builder
//! and the one-shot DOM writer both drive this type; neither re-implements
//! any formatting.

use alloc::string::{String, ToString};

use crate::error::Error;
use crate::sink::Sink;
use crate::value::Value;

/// Writes JSON tokens to a sink, tracking depth and separator state.
///
/// The indent string is sanitized at construction: every character that is
/// not a space or horizontal tab is stripped. An empty indent selects
/// compact output (no whitespace between tokens).
#[derive(Debug)]
pub struct Serializer<S: Sink> {
    sink: S,
    indent: String,
    depth: usize,
    has_value: bool,
}

impl<S: Sink> Serializer<S> {
    /// Creates a serializer writing to `sink` with the given indent.
    pub fn new(sink: S, indent: &str) -> Self {
        Self {
            sink,
            indent: indent.chars().filter(|c| *c == ' ' || *c == '\t').collect(),
            depth: 0,
            has_value: false,
        }
    }

    /// Consumes the serializer and hands the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn newline(&mut self) -> Result<(), Error> {
        if self.indent.is_empty() {
            return Ok(());
        }
        self.sink.write_char('\n')?;
        for _ in 0..self.depth {
            self.sink.write_str(&self.indent)?;
        }
        Ok(())
    }

    fn escape_unit(&mut self, unit: u16) -> Result<(), Error> {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [b'\\', b'u', 0, 0, 0, 0];
        for i in 0..4 {
            buf[2 + i] = HEX[usize::from((unit >> (12 - i * 4)) & 0xf)];
        }
        self.sink
            .write_str(core::str::from_utf8(&buf).expect("ascii escape"))
    }

    fn string(&mut self, s: &str) -> Result<(), Error> {
        self.sink.write_char('"')?;
        for c in s.chars() {
            match c {
                '"' => self.sink.write_str("\\\"")?,
                '\\' => self.sink.write_str("\\\\")?,
                '\u{0008}' => self.sink.write_str("\\b")?,
                '\u{000c}' => self.sink.write_str("\\f")?,
                '\n' => self.sink.write_str("\\n")?,
                '\r' => self.sink.write_str("\\r")?,
                '\t' => self.sink.write_str("\\t")?,
                // Unicode line separators, escaped for consumers that
                // treat them as line breaks.
                '\u{2028}' | '\u{2029}' => self.escape_unit(c as u16)?,
                c if (c as u32) > 0xffff => {
                    // Outside the BMP: a surrogate-pair escape keeps the
                    // output seven-bit clean for any consumer.
                    let mut units = [0u16; 2];
                    c.encode_utf16(&mut units);
                    self.escape_unit(units[0])?;
                    self.escape_unit(units[1])?;
                }
                c if c.is_control() => {
                    #[allow(clippy::cast_possible_truncation)]
                    self.escape_unit(c as u16)?;
                }
                c => self.sink.write_char(c)?,
            }
        }
        self.sink.write_char('"')
    }

    fn float(&mut self, v: f64) -> Result<(), Error> {
        // JSON has no inf/nan; clamp to the nearest finite value first.
        // Integer and float Display are locale-independent, and float
        // Display is shortest round-trip.
        let v = if v.is_finite() {
            v
        } else if v.is_nan() || v > 0.0 {
            f64::MAX
        } else {
            f64::MIN
        };
        self.sink.write_str(&v.to_string())
    }

    /// Emits one value token: `null`, a boolean, a number, or a quoted
    /// string. A composite argument is written in full through
    /// [`Self::write_value`].
    pub fn primitive(&mut self, v: &Value) -> Result<(), Error> {
        match v {
            Value::Null => self.sink.write_str("null"),
            Value::Boolean(b) => self.sink.write_str(if *b { "true" } else { "false" }),
            Value::Uint(n) => self.sink.write_str(&n.to_string()),
            Value::Int(n) => self.sink.write_str(&n.to_string()),
            Value::Real(n) => self.float(*n),
            Value::String(s) => self.string(s),
            Value::Array(_) | Value::Object(_) => self.write_value(v),
        }
    }

    /// Opens an object (`{`) or array (`[`).
    pub fn begin(&mut self, object: bool) -> Result<(), Error> {
        self.depth += 1;
        self.has_value = false;
        self.sink.write_char(if object { '{' } else { '[' })
    }

    /// Emits the separator, pretty-mode newline, quoted key, and the `:`
    /// for the next object member.
    pub fn object_key(&mut self, key: &str) -> Result<(), Error> {
        if self.has_value {
            self.sink.write_char(',')?;
        }
        self.has_value = true;
        self.newline()?;
        self.string(key)?;
        self.sink
            .write_str(if self.indent.is_empty() { ":" } else { ": " })
    }

    /// Emits the separator and pretty-mode newline for the next array
    /// element.
    pub fn array_value(&mut self) -> Result<(), Error> {
        if self.has_value {
            self.sink.write_char(',')?;
        }
        self.has_value = true;
        self.newline()
    }

    /// Closes an object (`}`) or array (`]`). A completed composite counts
    /// as a value of its parent, so the sibling flag is set afterwards.
    pub fn end(&mut self, object: bool) -> Result<(), Error> {
        self.depth -= 1;
        if self.has_value {
            self.newline()?;
        }
        self.has_value = true;
        self.sink.write_char(if object { '}' } else { ']' })
    }

    /// Emits an already-formed JSON fragment verbatim, with no escaping.
    /// The caller is trusted to supply exactly one well-formed value.
    pub fn insert(&mut self, raw: &str) -> Result<(), Error> {
        self.sink.write_str(raw)
    }

    /// One-shot recursive write of a DOM value through the token API.
    pub fn write_value(&mut self, v: &Value) -> Result<(), Error> {
        match v {
            Value::Array(items) => {
                self.begin(false)?;
                for item in items {
                    self.array_value()?;
                    self.write_value(item)?;
                }
                self.end(false)
            }
            Value::Object(members) => {
                self.begin(true)?;
                for (key, member) in members {
                    self.object_key(key)?;
                    self.write_value(member)?;
                }
                self.end(true)
            }
            v => self.primitive(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn with_serializer(
        indent: &str,
        f: impl FnOnce(&mut Serializer<String>) -> Result<(), Error>,
    ) -> String {
        let mut ser = Serializer::new(String::new(), indent);
        f(&mut ser).unwrap();
        ser.into_sink()
    }

    #[test]
    fn compact_object() {
        let out = with_serializer("", |ser| {
            ser.begin(true)?;
            ser.object_key("a")?;
            ser.primitive(&Value::Uint(1))?;
            ser.object_key("b")?;
            ser.primitive(&Value::Boolean(true))?;
            ser.end(true)
        });
        assert_eq!(out, r#"{"a":1,"b":true}"#);
    }

    #[test]
    fn pretty_nested() {
        let out = with_serializer("  ", |ser| {
            ser.begin(true)?;
            ser.object_key("xs")?;
            ser.begin(false)?;
            ser.array_value()?;
            ser.primitive(&Value::Null)?;
            ser.end(false)?;
            ser.end(true)
        });
        assert_eq!(out, "{\n  \"xs\": [\n    null\n  ]\n}");
    }

    #[test]
    fn empty_composites_stay_tight_in_pretty_mode() {
        let out = with_serializer("\t", |ser| {
            ser.begin(false)?;
            ser.array_value()?;
            ser.begin(true)?;
            ser.end(true)?;
            ser.array_value()?;
            ser.begin(false)?;
            ser.end(false)?;
            ser.end(false)
        });
        assert_eq!(out, "[\n\t{},\n\t[]\n]");
    }

    #[test]
    fn indent_is_sanitized() {
        // "x\t.y " keeps only the tab and the space.
        let out = with_serializer("x\t.y ", |ser| {
            ser.begin(false)?;
            ser.array_value()?;
            ser.primitive(&Value::Uint(0))?;
            ser.end(false)
        });
        assert_eq!(out, "[\n\t 0\n]");
    }

    #[test]
    fn escapes_mandated_set() {
        let out = with_serializer("", |ser| {
            ser.primitive(&Value::String("\" \\ \u{8} \u{c} \n \r \t".into()))
        });
        assert_eq!(out, r#""\" \\ \b \f \n \r \t""#);
    }

    #[test]
    fn escapes_controls_and_non_bmp() {
        let out = with_serializer("", |ser| {
            ser.primitive(&Value::String("\u{0}\u{7f}\u{10348}é".into()))
        });
        assert_eq!(out, r#""\u0000\u007f\ud800\udf48é""#);
    }

    #[test]
    fn numbers_render_plain_decimal() {
        let out = with_serializer("", |ser| {
            ser.begin(false)?;
            for v in [
                Value::Uint(u64::MAX),
                Value::Int(i64::MIN),
                Value::Real(1.5),
                Value::Real(-0.25),
            ] {
                ser.array_value()?;
                ser.primitive(&v)?;
            }
            ser.end(false)
        });
        assert_eq!(out, "[18446744073709551615,-9223372036854775808,1.5,-0.25]");
    }

    #[test]
    fn non_finite_floats_clamp() {
        let out = with_serializer("", |ser| {
            ser.begin(false)?;
            for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
                ser.array_value()?;
                ser.primitive(&Value::Real(v))?;
            }
            ser.end(false)
        });
        let inner = out.trim_start_matches('[').trim_end_matches(']');
        let rendered: Vec<&str> = inner.split(',').collect();
        assert_eq!(rendered.len(), 3);
        assert!(rendered
            .iter()
            .all(|s| !s.contains("inf") && !s.contains("NaN")));
        assert_eq!(rendered[0].parse::<f64>().unwrap(), f64::MAX);
        assert_eq!(rendered[1].parse::<f64>().unwrap(), f64::MIN);
        assert_eq!(rendered[2].parse::<f64>().unwrap(), f64::MAX);
    }

    #[test]
    fn insert_is_verbatim() {
        let out = with_serializer("", |ser| {
            ser.begin(false)?;
            ser.array_value()?;
            ser.insert(r#"{"raw":  1}"#)?;
            ser.end(false)
        });
        assert_eq!(out, r#"[{"raw":  1}]"#);
    }

    #[test]
    fn write_value_walks_composites() {
        let v = Value::from(alloc::vec![
            Value::from(1u64),
            Value::from("s"),
            Value::Object(crate::Map::new()),
        ]);
        let out = with_serializer("", |ser| ser.write_value(&v));
        assert_eq!(out, r#"[1,"s",{}]"#);
    }
}
