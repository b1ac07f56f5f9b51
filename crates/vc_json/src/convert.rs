//! Leaf conversion table.
//!
//! A canonical leaf is first normalized to the [`Primitive`] variant the
//! target kind builds from, then handed to [`PrimitiveInfo::build`], which
//! performs the final range check. `None` means no rule applies and the
//! caller falls back to the zero value.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use vc_reflect::Reflect;
use vc_reflect::info::{PrimitiveInfo, PrimitiveKind};
use vc_reflect::ops::Primitive;

use crate::emit::format_date;
use crate::settings::DateFormat;

/// Converts `source` to the primitive type described by `target`.
pub(crate) fn convert_leaf(source: &Primitive, target: &PrimitiveInfo) -> Option<Box<dyn Reflect>> {
    let normalized = match target.kind() {
        // `()` accepts anything.
        PrimitiveKind::Unit => Primitive::Bool(false),
        PrimitiveKind::Bool => Primitive::Bool(to_bool(source)?),
        kind if kind.is_signed() => Primitive::Int(i64::try_from(to_i128(source)?).ok()?),
        kind if kind.is_unsigned() => Primitive::UInt(u64::try_from(to_i128(source)?).ok()?),
        PrimitiveKind::I128 => Primitive::BigInt(to_i128(source)?),
        PrimitiveKind::U128 => Primitive::BigUInt(to_u128(source)?),
        PrimitiveKind::F32 | PrimitiveKind::F64 => Primitive::Float(to_f64(source)?),
        PrimitiveKind::Char => Primitive::Char(to_char(source)?),
        PrimitiveKind::String => Primitive::Str(to_text(source)),
        PrimitiveKind::Bytes => Primitive::Bytes(to_bytes(source)?),
        PrimitiveKind::DateTime => Primitive::DateTime(to_date(source)?),
        _ => return None,
    };
    target.build(normalized)
}

// -----------------------------------------------------------------------------
// Numbers

/// Integral, finite and within `i128`.
fn integral(v: f64) -> Option<i128> {
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
    (v.is_finite() && v.fract() == 0.0 && (-LIMIT..LIMIT).contains(&v)).then_some(v as i128)
}

fn to_i128(source: &Primitive) -> Option<i128> {
    match source {
        Primitive::Bool(v) => Some(i128::from(*v)),
        Primitive::Int(v) => Some(i128::from(*v)),
        Primitive::UInt(v) => Some(i128::from(*v)),
        Primitive::BigInt(v) => Some(*v),
        Primitive::BigUInt(v) => i128::try_from(*v).ok(),
        Primitive::Float(v) => integral(*v),
        Primitive::Str(s) => {
            let s = s.trim();
            s.parse::<i128>().ok().or_else(|| integral(s.parse().ok()?))
        }
        _ => None,
    }
}

fn to_u128(source: &Primitive) -> Option<u128> {
    match source {
        Primitive::BigUInt(v) => Some(*v),
        Primitive::Str(s) => s.trim().parse::<u128>().ok(),
        other => u128::try_from(to_i128(other)?).ok(),
    }
}

fn to_f64(source: &Primitive) -> Option<f64> {
    match source {
        Primitive::Int(v) => Some(*v as f64),
        Primitive::UInt(v) => Some(*v as f64),
        Primitive::BigInt(v) => Some(*v as f64),
        Primitive::BigUInt(v) => Some(*v as f64),
        Primitive::Float(v) => Some(*v),
        Primitive::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Text and others

fn to_bool(source: &Primitive) -> Option<bool> {
    match source {
        Primitive::Bool(v) => Some(*v),
        Primitive::Str(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Primitive::Str(s) if s.eq_ignore_ascii_case("false") => Some(false),
        Primitive::Float(v) => Some(*v != 0.0),
        Primitive::Int(_) | Primitive::UInt(_) | Primitive::BigInt(_) | Primitive::BigUInt(_) => {
            Some(to_i128(source).is_none_or(|v| v != 0))
        }
        _ => None,
    }
}

fn to_char(source: &Primitive) -> Option<char> {
    match source {
        Primitive::Char(c) => Some(*c),
        Primitive::Str(s) => {
            let mut chars = s.chars();
            let c = chars.next()?;
            chars.next().is_none().then_some(c)
        }
        Primitive::Int(_) | Primitive::UInt(_) => {
            char::from_u32(u32::try_from(to_i128(source)?).ok()?)
        }
        _ => None,
    }
}

fn to_text(source: &Primitive) -> String {
    match source {
        Primitive::Str(s) => s.clone(),
        Primitive::Bool(v) => v.to_string(),
        Primitive::Int(v) => v.to_string(),
        Primitive::UInt(v) => v.to_string(),
        Primitive::BigInt(v) => v.to_string(),
        Primitive::BigUInt(v) => v.to_string(),
        Primitive::Float(v) => v.to_string(),
        Primitive::Char(v) => v.to_string(),
        Primitive::Bytes(v) => STANDARD.encode(v),
        Primitive::DateTime(v) => format_date(*v, DateFormat::Iso8601),
    }
}

fn to_bytes(source: &Primitive) -> Option<Vec<u8>> {
    match source {
        Primitive::Bytes(v) => Some(v.clone()),
        Primitive::Str(s) => STANDARD.decode(s).ok(),
        _ => None,
    }
}

fn to_date(source: &Primitive) -> Option<DateTime<Utc>> {
    match source {
        Primitive::DateTime(v) => Some(*v),
        Primitive::Str(s) => parse_date(s.trim()),
        Primitive::Int(_)
        | Primitive::UInt(_)
        | Primitive::BigInt(_)
        | Primitive::BigUInt(_)
        | Primitive::Float(_) => {
            DateTime::from_timestamp_millis(i64::try_from(to_i128(source)?).ok()?)
        }
        _ => None,
    }
}

/// Parses `/Date(ms)/` or RFC 3339.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Some(ms) = s.strip_prefix("/Date(").and_then(|rest| rest.strip_suffix(")/")) {
        return DateTime::from_timestamp_millis(ms.parse().ok()?);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use chrono::{DateTime, Utc};
    use vc_reflect::Reflect;
    use vc_reflect::impls::Bytes;
    use vc_reflect::info::Typed;
    use vc_reflect::ops::Primitive;

    use super::convert_leaf;

    fn convert<T: Typed>(source: Primitive) -> Option<T> {
        let info = T::type_info().as_primitive().unwrap();
        let boxed: Box<dyn Reflect> = convert_leaf(&source, info)?;
        boxed.take::<T>().ok()
    }

    #[test]
    fn integer_narrowing_is_checked() {
        assert_eq!(convert::<u8>(Primitive::Int(200)), Some(200));
        assert_eq!(convert::<u8>(Primitive::Int(300)), None);
        assert_eq!(convert::<i8>(Primitive::UInt(u64::MAX)), None);
        assert_eq!(convert::<i32>(Primitive::Float(4.0)), Some(4));
        assert_eq!(convert::<i32>(Primitive::Float(4.5)), None);
        assert_eq!(convert::<u128>(Primitive::Str(u128::MAX.to_string())), Some(u128::MAX));
        assert_eq!(convert::<i64>(Primitive::Str(" -12 ".into())), Some(-12));
    }

    #[test]
    fn text_rules() {
        assert_eq!(convert::<bool>(Primitive::Str("TRUE".into())), Some(true));
        assert_eq!(convert::<bool>(Primitive::Int(0)), Some(false));
        assert_eq!(convert::<f64>(Primitive::Str("2.5".into())), Some(2.5));
        assert_eq!(convert::<char>(Primitive::Str("x".into())), Some('x'));
        assert_eq!(convert::<char>(Primitive::Str("xy".into())), None);
        assert_eq!(convert::<String>(Primitive::Int(7)), Some(String::from("7")));
        assert_eq!(
            convert::<Bytes>(Primitive::Str("aGk=".into())).map(|b| b.0),
            Some(Vec::from(*b"hi"))
        );
    }

    #[test]
    fn date_rules() {
        let expected = DateTime::<Utc>::from_timestamp_millis(1_714_557_600_000).unwrap();
        let epoch = Primitive::Str("/Date(1714557600000)/".into());
        assert_eq!(convert::<DateTime<Utc>>(epoch), Some(expected));
        let iso = Primitive::Str("2024-05-01T10:00:00Z".into());
        assert_eq!(convert::<DateTime<Utc>>(iso), Some(expected));
        assert_eq!(convert::<DateTime<Utc>>(Primitive::Int(1_714_557_600_000)), Some(expected));
        assert_eq!(convert::<DateTime<Utc>>(Primitive::Bool(true)), None);
    }
}
