//! Canonicalization: object graph to [`Value`].
//!
//! Runs the same walker as text emission, feeding a builder instead of a
//! writer, so tags, filters and guards behave identically in both.

use alloc::string::String;
use alloc::vec::Vec;

use vc_reflect::Reflect;
use vc_reflect::ops::PrimitiveRef;

use crate::emit::{Sink, Walker};
use crate::error::Result;
use crate::filter::MemberFilter;
use crate::settings::SerializeSettings;
use crate::value::{Map, Value};

/// Converts an object graph to its canonical value.
///
/// # Examples
///
/// ```
/// use vc_json::{SerializeSettings, Value, to_canonical};
///
/// let value = to_canonical(&vec![Some(1_u8), None], &SerializeSettings::DEFAULT).unwrap();
/// assert_eq!(value, Value::Array(vec![Value::from(1_u64), Value::Null]));
/// ```
pub fn to_canonical(value: &dyn Reflect, settings: &SerializeSettings) -> Result<Value> {
    canonicalize(value, settings, None)
}

/// Like [`to_canonical`], consulting `filter` before every member, entry and
/// item.
pub fn to_canonical_with(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    filter: &dyn MemberFilter,
) -> Result<Value> {
    canonicalize(value, settings, Some(filter))
}

fn canonicalize(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    filter: Option<&dyn MemberFilter>,
) -> Result<Value> {
    let mut walker = Walker::new(settings, filter, ValueBuilder::default());
    walker.walk(value, None)?;
    Ok(walker.into_sink().finish())
}

// -----------------------------------------------------------------------------
// ValueBuilder

enum Frame {
    Array(Vec<Value>),
    /// The open object and the key of the next value.
    Object(Map, Option<String>),
}

/// A [`Sink`] assembling a [`Value`] tree.
#[derive(Default)]
struct ValueBuilder {
    frames: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    fn put(&mut self, value: Value) {
        match self.frames.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(map, key)) => {
                if let Some(key) = key.take() {
                    map.insert(key, value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        self.root.unwrap_or_default()
    }
}

impl Sink for ValueBuilder {
    #[inline]
    fn null(&mut self) {
        self.put(Value::Null);
    }

    #[inline]
    fn primitive(&mut self, value: PrimitiveRef<'_>) {
        self.put(Value::Primitive(value.to_primitive()));
    }

    #[inline]
    fn value(&mut self, value: &Value) {
        self.put(value.clone());
    }

    fn begin_object(&mut self) {
        self.frames.push(Frame::Object(Map::default(), None));
    }

    fn key(&mut self, key: &str) {
        if let Some(Frame::Object(_, pending)) = self.frames.last_mut() {
            *pending = Some(key.into());
        }
    }

    fn end_object(&mut self) {
        if let Some(Frame::Object(map, _)) = self.frames.pop() {
            self.put(Value::Object(map));
        }
    }

    fn begin_array(&mut self) {
        self.frames.push(Frame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(Frame::Array(items)) = self.frames.pop() {
            self.put(Value::Array(items));
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_reflect::Reflect;
    use vc_reflect::derive::Reflect;

    use crate::{SerializeSettings, TypeTagPolicy, Value, to_canonical, to_json_string};

    #[derive(Reflect, Default)]
    struct Label {
        text: String,
        note: Option<String>,
    }

    #[test]
    fn canonical_matches_text() {
        let labels = vec![
            Label { text: "a".into(), note: None },
            Label { text: "b".into(), note: Some("x".into()) },
        ];
        let settings = SerializeSettings::DEFAULT;

        let value = to_canonical(&labels, &settings).unwrap();
        let text = to_json_string(&labels, &settings).unwrap();
        assert_eq!(to_json_string(&value, &settings).unwrap(), text);
        assert_eq!(value.as_array().unwrap()[1].get("note"), Some(&Value::from("x")));
    }

    #[test]
    fn null_values_are_dropped() {
        let label = Label { text: "a".into(), note: None };
        let settings = SerializeSettings::DEFAULT.with_ignore_null_values(true);

        let value = to_canonical(&label, &settings).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn tags_are_embedded() {
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(Label::default()), Box::new(1_i32)];
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);

        let value = to_canonical(&items, &settings).unwrap();
        let items = value.as_array().unwrap();
        assert!(items[0].get("$type").and_then(Value::as_str).unwrap().ends_with("Label"));
        assert_eq!(items[1], Value::from(1_i64));
    }
}
