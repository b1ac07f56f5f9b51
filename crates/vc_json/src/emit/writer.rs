use alloc::string::String;
use alloc::vec::Vec;
use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_core::Serializer as _;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};
use vc_reflect::ops::PrimitiveRef;

use super::Sink;
use crate::error::{Error, Result};
use crate::settings::{DateFormat, SerializeSettings};
use crate::value::Value;

/// Formats a date as a JSON string content.
pub(crate) fn format_date(date: DateTime<Utc>, format: DateFormat) -> String {
    match format {
        DateFormat::Iso8601 => date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        DateFormat::Epoch => alloc::format!("/Date({})/", date.timestamp_millis()),
    }
}

// -----------------------------------------------------------------------------
// Escaper

/// String escaping driven by `escape_control` and `escape_non_ascii`.
///
/// Quotes and backslashes are always escaped. Control characters are written
/// raw when `control` is off.
#[derive(Clone, Copy)]
struct Escaper {
    control: bool,
    non_ascii: bool,
}

impl Formatter for Escaper {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (at, c) in fragment.char_indices() {
            // DEL is a control character serde_json leaves alone.
            let escape = (self.control && c == '\u{7f}') || (self.non_ascii && !c.is_ascii());
            if !escape {
                continue;
            }
            writer.write_all(fragment[start..at].as_bytes())?;
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = at + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let raw = match char_escape {
            CharEscape::Quote | CharEscape::ReverseSolidus | CharEscape::Solidus => None,
            CharEscape::Backspace => Some(b'\x08'),
            CharEscape::FormFeed => Some(b'\x0c'),
            CharEscape::LineFeed => Some(b'\n'),
            CharEscape::CarriageReturn => Some(b'\r'),
            CharEscape::Tab => Some(b'\t'),
            CharEscape::AsciiControl(byte) => Some(byte),
        };
        match raw {
            Some(byte) if !self.control => writer.write_all(&[byte]),
            _ => CompactFormatter.write_char_escape(writer, char_escape),
        }
    }
}

// -----------------------------------------------------------------------------
// JsonWriter

/// An open container.
enum Frame {
    Array { first: bool },
    Object { first: bool },
}

/// A [`Sink`] producing JSON text, laid out by a serde_json [`Formatter`].
///
/// The text is buffered and only handed out by [`finish`](Self::finish), so
/// a failed walk never leaves partial output behind.
pub(crate) struct JsonWriter<'a, F> {
    buf: Vec<u8>,
    layout: F,
    escaper: Escaper,
    settings: &'a SerializeSettings,
    frames: Vec<Frame>,
    failed: Option<io::Error>,
}

impl<'a, F: Formatter> JsonWriter<'a, F> {
    pub fn new(settings: &'a SerializeSettings, layout: F) -> Self {
        Self {
            buf: Vec::new(),
            layout,
            escaper: Escaper {
                control: settings.escape_control,
                non_ascii: settings.escape_non_ascii,
            },
            settings,
            frames: Vec::new(),
            failed: None,
        }
    }

    /// Returns the text written so far, or the first write error.
    pub fn finish(self) -> Result<String> {
        if let Some(err) = self.failed {
            return Err(Error::Write(err));
        }
        String::from_utf8(self.buf)
            .map_err(|err| Error::Write(io::Error::new(io::ErrorKind::InvalidData, err)))
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result
            && self.failed.is_none()
        {
            self.failed = Some(err);
        }
    }

    /// Separator and indentation before an array item.
    fn before_value(&mut self) {
        if let Some(Frame::Array { first }) = self.frames.last_mut() {
            let first = core::mem::replace(first, false);
            let result = self.layout.begin_array_value(&mut self.buf, first);
            self.check(result);
        }
    }

    fn after_value(&mut self) {
        let result = match self.frames.last() {
            Some(Frame::Array { .. }) => self.layout.end_array_value(&mut self.buf),
            Some(Frame::Object { .. }) => self.layout.end_object_value(&mut self.buf),
            None => Ok(()),
        };
        self.check(result);
    }

    fn write_str(&mut self, value: &str) -> io::Result<()> {
        (&mut serde_json::Serializer::with_formatter(&mut self.buf, self.escaper))
            .serialize_str(value)
            .map_err(io::Error::from)
    }

    /// Writes a number as a string literal.
    fn quoted(
        &mut self,
        write: impl FnOnce(&mut F, &mut Vec<u8>) -> io::Result<()>,
    ) -> io::Result<()> {
        self.layout.begin_string(&mut self.buf)?;
        write(&mut self.layout, &mut self.buf)?;
        self.layout.end_string(&mut self.buf)
    }

    fn write_leaf(&mut self, value: PrimitiveRef<'_>) -> io::Result<()> {
        match value {
            PrimitiveRef::Bool(v) => self.layout.write_bool(&mut self.buf, v),
            PrimitiveRef::Int(v) => self.layout.write_i64(&mut self.buf, v),
            PrimitiveRef::UInt(v) => self.layout.write_u64(&mut self.buf, v),
            // Beyond the precision of most JSON readers.
            PrimitiveRef::BigInt(v) => self.quoted(|f, buf| f.write_i128(buf, v)),
            PrimitiveRef::BigUInt(v) => self.quoted(|f, buf| f.write_u128(buf, v)),
            PrimitiveRef::Float(v) if v.is_finite() => self.layout.write_f64(&mut self.buf, v),
            PrimitiveRef::Float(_) => self.layout.write_null(&mut self.buf),
            PrimitiveRef::Char(v) => self.write_str(v.encode_utf8(&mut [0; 4])),
            PrimitiveRef::Str(v) => self.write_str(v),
            PrimitiveRef::Bytes(v) => {
                let encoded = STANDARD.encode(v);
                self.write_str(&encoded)
            }
            PrimitiveRef::DateTime(v) => {
                let formatted = format_date(v, self.settings.date_format);
                self.write_str(&formatted)
            }
        }
    }

    fn write_key(&mut self, key: &str, first: bool) -> io::Result<()> {
        self.layout.begin_object_key(&mut self.buf, first)?;
        self.write_str(key)?;
        self.layout.end_object_key(&mut self.buf)?;
        self.layout.begin_object_value(&mut self.buf)
    }
}

impl<F: Formatter> Sink for JsonWriter<'_, F> {
    fn null(&mut self) {
        self.before_value();
        let result = self.layout.write_null(&mut self.buf);
        self.check(result);
        self.after_value();
    }

    fn primitive(&mut self, value: PrimitiveRef<'_>) {
        self.before_value();
        let result = self.write_leaf(value);
        self.check(result);
        self.after_value();
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Null => self.null(),
            Value::Primitive(p) => self.primitive(p.as_primitive_ref()),
            Value::Array(items) => {
                self.begin_array();
                for item in items {
                    self.value(item);
                }
                self.end_array();
            }
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                if self.settings.order_names {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }
                self.begin_object();
                for (key, item) in entries {
                    self.key(key);
                    self.value(item);
                }
                self.end_object();
            }
        }
    }

    fn begin_object(&mut self) {
        self.before_value();
        let result = self.layout.begin_object(&mut self.buf);
        self.check(result);
        self.frames.push(Frame::Object { first: true });
    }

    fn key(&mut self, key: &str) {
        let first = match self.frames.last_mut() {
            Some(Frame::Object { first }) => core::mem::replace(first, false),
            _ => false,
        };
        let result = self.write_key(key, first);
        self.check(result);
    }

    fn end_object(&mut self) {
        self.frames.pop();
        let result = self.layout.end_object(&mut self.buf);
        self.check(result);
        self.after_value();
    }

    fn begin_array(&mut self) {
        self.before_value();
        let result = self.layout.begin_array(&mut self.buf);
        self.check(result);
        self.frames.push(Frame::Array { first: true });
    }

    fn end_array(&mut self) {
        self.frames.pop();
        let result = self.layout.end_array(&mut self.buf);
        self.check(result);
        self.after_value();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
    use vc_reflect::ops::PrimitiveRef;

    use super::JsonWriter;
    use crate::SerializeSettings;
    use crate::emit::Sink;

    fn write<F: Formatter>(
        settings: &SerializeSettings,
        layout: F,
        f: impl FnOnce(&mut JsonWriter<'_, F>),
    ) -> String {
        let mut writer = JsonWriter::new(settings, layout);
        f(&mut writer);
        writer.finish().unwrap()
    }

    fn compact(settings: &SerializeSettings, text: &str) -> String {
        write(settings, CompactFormatter, |w| w.primitive(PrimitiveRef::Str(text)))
    }

    #[test]
    fn escaping_is_independent() {
        let text = "a\"b\\c\nd\u{1}é😀\u{7f}";

        let default = compact(&SerializeSettings::DEFAULT, text);
        assert_eq!(default, "\"a\\\"b\\\\c\\nd\\u0001é😀\\u007f\"");

        let ascii = SerializeSettings::DEFAULT.with_escape_non_ascii(true);
        assert_eq!(
            compact(&ascii, text),
            "\"a\\\"b\\\\c\\nd\\u0001\\u00e9\\ud83d\\ude00\\u007f\""
        );

        let raw = SerializeSettings::DEFAULT.with_escape_control(false);
        assert_eq!(compact(&raw, "x\ny\t\"z\""), "\"x\ny\t\\\"z\\\"\"");

        let both = raw.with_escape_non_ascii(true);
        assert_eq!(compact(&both, "é\n"), "\"\\u00e9\n\"");
    }

    #[test]
    fn indentation() {
        let settings = SerializeSettings::DEFAULT;
        let text = write(&settings, PrettyFormatter::with_indent(b"  "), |w| {
            w.begin_object();
            w.key("a");
            w.begin_array();
            w.primitive(PrimitiveRef::Int(1));
            w.primitive(PrimitiveRef::Int(2));
            w.end_array();
            w.key("b");
            w.begin_object();
            w.end_object();
            w.end_object();
        });
        assert_eq!(text, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}");
    }

    #[test]
    fn compact_separators() {
        let text = write(&SerializeSettings::DEFAULT, CompactFormatter, |w| {
            w.begin_array();
            w.begin_object();
            w.key("k");
            w.null();
            w.key("e");
            w.begin_array();
            w.end_array();
            w.end_object();
            w.primitive(PrimitiveRef::Bool(true));
            w.end_array();
        });
        assert_eq!(text, r#"[{"k":null,"e":[]},true]"#);
    }

    #[test]
    fn leaf_literals() {
        let text = write(&SerializeSettings::DEFAULT, CompactFormatter, |w| {
            w.begin_array();
            w.primitive(PrimitiveRef::Float(1.5));
            w.primitive(PrimitiveRef::Float(f64::NAN));
            w.primitive(PrimitiveRef::BigUInt(u128::MAX));
            w.primitive(PrimitiveRef::BigInt(-3));
            w.primitive(PrimitiveRef::Bytes(b"hi"));
            w.primitive(PrimitiveRef::Char('c'));
            w.end_array();
        });
        assert_eq!(
            text,
            "[1.5,null,\"340282366920938463463374607431768211455\",\"-3\",\"aGk=\",\"c\"]"
        );
    }
}
