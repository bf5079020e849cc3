//! Byte-level output of [`Object`]s (ISO 32000-1:2008, Section 7.3).
//!
//! Output is compact and deterministic: dictionary keys are sorted, reals
//! carry at most five decimals, and a stream's `/Length` is always taken
//! from its payload.

use crate::object::{Object, ObjectRef};
use std::collections::HashMap;
use std::io::{self, Write};

/// Serializer for indirect objects and the trailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a serializer.
    pub fn new() -> Self {
        Self
    }

    /// Write `id gen obj ... endobj`.
    pub fn write_indirect<W: Write>(
        &self,
        w: &mut W,
        id: u32,
        gen: u16,
        obj: &Object,
    ) -> io::Result<()> {
        writeln!(w, "{} {} obj", id, gen)?;
        self.write_object(w, obj)?;
        w.write_all(b"\nendobj\n")
    }

    /// Write a direct object.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> io::Result<()> {
        match obj {
            Object::Null => w.write_all(b"null"),
            Object::Boolean(b) => write!(w, "{}", b),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => w.write_all(format_real(*r).as_bytes()),
            Object::String(s) => write_string(w, s),
            Object::Name(n) => write_name(w, n),
            Object::Array(items) => {
                w.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.write_all(b" ")?;
                    }
                    self.write_object(w, item)?;
                }
                w.write_all(b"]")
            },
            Object::Dictionary(dict) => self.write_dictionary(w, dict, None),
            Object::Stream { dict, data } => {
                self.write_dictionary(w, dict, Some(data.len()))?;
                w.write_all(b"\nstream\n")?;
                w.write_all(data)?;
                w.write_all(b"\nendstream")
            },
            Object::Reference(r) => write!(w, "{}", r),
        }
    }

    /// `<</Key value/Key value>>`, keys sorted. A stream's length replaces
    /// any `/Length` already in the dictionary.
    fn write_dictionary<W: Write>(
        &self,
        w: &mut W,
        dict: &HashMap<String, Object>,
        stream_length: Option<usize>,
    ) -> io::Result<()> {
        let length = stream_length.map(|len| Object::Integer(len as i64));
        let mut entries: Vec<(&str, &Object)> = dict
            .iter()
            .filter(|(key, _)| length.is_none() || key.as_str() != "Length")
            .map(|(key, value)| (key.as_str(), value))
            .chain(length.as_ref().map(|len| ("Length", len)))
            .collect();
        entries.sort_by_key(|(key, _)| *key);

        w.write_all(b"<<")?;
        for (key, value) in entries {
            write_name(w, key)?;
            w.write_all(b" ")?;
            self.write_object(w, value)?;
        }
        w.write_all(b">>")
    }
}

/// Constructors used when assembling the file.
impl ObjectSerializer {
    /// `/s`
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Text string (see [`Object::text`]).
    pub fn text(s: &str) -> Object {
        Object::text(s)
    }

    /// Integer.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Boolean.
    pub fn boolean(b: bool) -> Object {
        Object::Boolean(b)
    }

    /// Dictionary from `(key, value)` pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(owned_keys(entries))
    }

    /// Stream; `/Length` is added on output.
    pub fn stream(entries: Vec<(&str, Object)>, data: Vec<u8>) -> Object {
        Object::Stream {
            dict: owned_keys(entries),
            data: bytes::Bytes::from(data),
        }
    }

    /// Indirect reference.
    pub fn reference(r: ObjectRef) -> Object {
        Object::Reference(r)
    }

    /// `[llx lly urx ury]` from an origin and a size.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Object {
        Object::Array(
            [x, y, x + width, y + height]
                .into_iter()
                .map(Object::Real)
                .collect(),
        )
    }
}

fn owned_keys(entries: Vec<(&str, Object)>) -> HashMap<String, Object> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn format_real(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.5}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Literal `(...)` when every byte is printable ASCII or a common control
/// character, hex `<...>` otherwise.
fn write_string<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    let literal = data
        .iter()
        .all(|&b| matches!(b, b'\n' | b'\r' | b'\t' | 0x20..=0x7E));
    if !literal {
        w.write_all(b"<")?;
        for byte in data {
            write!(w, "{:02X}", byte)?;
        }
        return w.write_all(b">");
    }

    w.write_all(b"(")?;
    for &byte in data {
        let escaped: &[u8] = match byte {
            b'(' => b"\\(",
            b')' => b"\\)",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            _ => std::slice::from_ref(&byte),
        };
        w.write_all(escaped)?;
    }
    w.write_all(b")")
}

/// Regular characters are written as-is; delimiters, whitespace, `#` and
/// non-ASCII bytes become `#xx`. Content stream operands share this form.
pub(crate) fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    w.write_all(b"/")?;
    for byte in name.bytes() {
        let delimiter = matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        );
        if delimiter || !(0x21..=0x7E).contains(&byte) {
            write!(w, "#{:02X}", byte)?;
        } else {
            w.write_all(&[byte])?;
        }
    }
    Ok(())
}
