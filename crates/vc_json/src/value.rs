//! The canonical value model.
//!
//! A [`Value`] is what the canonicalization engine produces, what the parser
//! collaborator returns, and what the rehydration engine consumes. It never
//! refers back into the graph it was built from.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use vc_reflect::Reflect;
use vc_reflect::impls::NonGenericTypeInfoCell;
use vc_reflect::info::{TypeInfo, TypeKind, Typed};
use vc_reflect::ops::{Primitive, ReflectRef};
use vc_utils::hash::FixedHashState;

/// String keyed map of a [`Value::Object`], iterated in insertion order.
pub type Map = IndexMap<String, Value, FixedHashState>;

// -----------------------------------------------------------------------------
// Value

/// A canonical JSON-shaped value.
///
/// Leaves keep their precise kind ([`Primitive`]), so a date or a binary
/// blob stays a date or a blob until it is written as text.
///
/// # Examples
///
/// ```
/// use vc_json::{Map, Value};
///
/// let mut map = Map::default();
/// map.insert("b".into(), Value::from(1_i64));
/// map.insert("a".into(), Value::from("x"));
///
/// let value = Value::Object(map);
/// let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
/// assert_eq!(keys, ["b", "a"]);
/// assert_eq!(value.get("a").and_then(Value::as_str), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Primitive(Primitive),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Primitive(Primitive::Str(s)) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks a key up in an object, `None` for any other value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Short description of the value kind, used in error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Primitive(Primitive::Bool(_)) => "a boolean",
            Self::Primitive(Primitive::Str(_) | Primitive::Char(_)) => "a string",
            Self::Primitive(Primitive::Bytes(_)) => "a binary blob",
            Self::Primitive(Primitive::DateTime(_)) => "a date",
            Self::Primitive(_) => "a number",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $expr:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from($v: $ty) -> Self {
                    $expr
                }
            }
        )*
    };
}

impl_from! {
    bool => |v| Value::Primitive(Primitive::Bool(v)),
    i64 => |v| Value::Primitive(Primitive::Int(v)),
    u64 => |v| Value::Primitive(Primitive::UInt(v)),
    f64 => |v| Value::Primitive(Primitive::Float(v)),
    &str => |v| Value::Primitive(Primitive::Str(v.into())),
    String => |v| Value::Primitive(Primitive::Str(v)),
    Primitive => |v| Value::Primitive(v),
    Vec<Value> => |v| Value::Array(v),
    Map => |v| Value::Object(v),
}

// -----------------------------------------------------------------------------
// Reflection

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>("vc_json::Value", "Value", TypeKind::Opaque)
                .with_default::<Self>()
        })
    }
}

impl Reflect for Value {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Self::Null => ReflectRef::Nullable(None),
            _ => ReflectRef::Opaque(self),
        }
    }
}

// -----------------------------------------------------------------------------
// Serde

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Primitive(p) => match p {
                Primitive::Bool(v) => serializer.serialize_bool(*v),
                Primitive::Int(v) => serializer.serialize_i64(*v),
                Primitive::UInt(v) => serializer.serialize_u64(*v),
                Primitive::BigInt(v) => serializer.serialize_i128(*v),
                Primitive::BigUInt(v) => serializer.serialize_u128(*v),
                Primitive::Float(v) => serializer.serialize_f64(*v),
                Primitive::Char(v) => serializer.serialize_char(*v),
                Primitive::Str(v) => serializer.serialize_str(v),
                Primitive::Bytes(v) => serializer.serialize_str(&STANDARD.encode(v)),
                Primitive::DateTime(v) => {
                    serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                }
            },
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// A [`Visitor`] building [`Value`]s, object keys keep their textual order.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    #[inline]
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(match i64::try_from(v) {
            Ok(v) => Value::from(v),
            Err(_) => Value::from(v),
        })
    }

    #[inline]
    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(Value::Primitive(Primitive::BigInt(v)))
    }

    #[inline]
    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Ok(Value::Primitive(Primitive::BigUInt(v)))
    }

    #[inline]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Primitive(Primitive::Bytes(v.into())))
    }

    #[inline]
    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let capacity = access.size_hint().unwrap_or_default();
        let mut map = Map::with_capacity_and_hasher(capacity, FixedHashState);
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use vc_reflect::Reflect;
    use vc_reflect::info::{ReflectKind, Typed};
    use vc_reflect::ops::{Primitive, ReflectRef};

    use super::Value;

    #[test]
    fn reflects_as_opaque() {
        assert_eq!(Value::type_info().reflect_kind(), ReflectKind::Opaque);
        assert!(Value::Null.reflect_ref().is_null());
        assert!(matches!(Value::from(1_i64).reflect_ref(), ReflectRef::Opaque(_)));
    }

    #[test]
    fn serde_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"z":1,"a":[true,null,"s"],"m":-2.5}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(value.get("z"), Some(&Value::Primitive(Primitive::Int(1))));

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"z":1,"a":[true,null,"s"],"m":-2.5}"#);
    }

    #[test]
    fn large_unsigned_stays_unsigned() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value, Value::Primitive(Primitive::UInt(u64::MAX)));
    }
}
