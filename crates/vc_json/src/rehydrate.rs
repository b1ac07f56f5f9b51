//! Rehydration: [`Value`] to typed object graph.
//!
//! The declared target type drives the conversion. Type tags only matter
//! under polymorphic (`Box<dyn Reflect>`) slots, where they are resolved
//! through [`bind_to_type`]; everywhere else the `$value` and `$values`
//! wrappers are unwrapped and the tag itself is ignored.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::trace;
use vc_reflect::Reflect;
use vc_reflect::info::{EnumInfo, MemberDescriptor, PrimitiveInfo, TypeInfo, TypeKind, Typed};
use vc_reflect::members::{get_all_field_members, get_members};
use vc_reflect::ops::Primitive;
use vc_reflect::shape::{ContainerKind, ShapeFacts, shape_facts};

use crate::binder::bind_to_type;
use crate::convert::convert_leaf;
use crate::error::{Error, Result};
use crate::settings::DeserializeSettings;
use crate::shape::{evaluate_dictionary_shape, evaluate_list_shape};
use crate::tag::{TYPE_KEY, VALUE_KEY, VALUES_KEY, is_reserved};
use crate::value::Value;

/// Builds a value of type `target` from a canonical value.
///
/// # Examples
///
/// ```
/// use vc_json::{DeserializeSettings, Value, from_canonical, parse};
/// use vc_reflect::info::Typed;
///
/// let value = parse("[1, 2, 300]").unwrap();
/// let target = <Vec<u16>>::type_info();
/// let list = from_canonical(&value, target, &DeserializeSettings::DEFAULT).unwrap();
/// assert_eq!(list.take::<Vec<u16>>().unwrap(), [1, 2, 300]);
/// ```
pub fn from_canonical(
    value: &Value,
    target: &'static TypeInfo,
    settings: &DeserializeSettings,
) -> Result<Box<dyn Reflect>> {
    Rehydrator { settings, depth: 0 }.convert(value, target)
}

/// Typed variant of [`from_canonical`].
pub fn from_canonical_as<T: Typed>(value: &Value, settings: &DeserializeSettings) -> Result<T> {
    let target = T::type_info();
    let built = from_canonical(value, target, settings)?;
    T::take_boxed(built).map_err(|found| Error::IncompatibleTargetType {
        expected: target.path().into(),
        found: format!("a value of `{}`", found.reflect_type_info().path()),
    })
}

// -----------------------------------------------------------------------------
// Rehydrator

struct Rehydrator<'a> {
    settings: &'a DeserializeSettings,
    depth: usize,
}

/// The payload of a tagged node: `$value` or `$values` when present.
fn untagged(value: &Value) -> &Value {
    match value {
        Value::Object(map) if map.contains_key(TYPE_KEY) => map
            .get(VALUE_KEY)
            .or_else(|| map.get(VALUES_KEY))
            .unwrap_or(value),
        _ => value,
    }
}

fn incompatible(target: &TypeInfo, found: impl Into<String>) -> Error {
    Error::IncompatibleTargetType {
        expected: target.path().into(),
        found: found.into(),
    }
}

impl Rehydrator<'_> {
    fn convert(&mut self, value: &Value, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        match target.kind() {
            TypeKind::Any => return self.polymorphic(value),
            TypeKind::Opaque => {
                if target.type_is::<Value>() {
                    return Ok(Box::new(value.clone()));
                }
                return self.zero(value, target);
            }
            _ => {}
        }

        let value = untagged(value);
        match target.kind() {
            TypeKind::Nullable(nullable) => {
                let inner = match value {
                    Value::Null => None,
                    value => Some(self.convert(value, nullable.inner())?),
                };
                nullable
                    .wrap(inner)
                    .map_err(|found| incompatible(target, found.reflect_type_info().path()))
            }
            TypeKind::Shared(shared) => {
                let inner = self.convert(value, shared.inner())?;
                shared
                    .wrap(inner)
                    .map_err(|found| incompatible(target, found.reflect_type_info().path()))
            }
            TypeKind::Primitive(info) => self.leaf(value, target, info),
            TypeKind::Enum(info) => self.variant(value, target, info),
            TypeKind::List(_) | TypeKind::Map(_) | TypeKind::Record(_) => {
                let facts = shape_facts(target);
                match facts.container {
                    ContainerKind::Sequence => self.list(value, target),
                    ContainerKind::StringMap | ContainerKind::PairMap => self.map(value, target),
                    ContainerKind::Record | ContainerKind::Dynamic => {
                        self.record(value, target, facts)
                    }
                    ContainerKind::None => self.zero(value, target),
                }
            }
            TypeKind::Any | TypeKind::Opaque => self.zero(value, target),
        }
    }

    /// A `Box<dyn Reflect>` slot: the tag decides, the canonical value is
    /// the fallback.
    fn polymorphic(&mut self, value: &Value) -> Result<Box<dyn Reflect>> {
        if self.settings.trust_type_tags
            && let Some(name) = value.get(TYPE_KEY).and_then(Value::as_str)
            && let Some(bound) = bind_to_type(name, self.settings)
            && !matches!(bound.kind(), TypeKind::Any)
        {
            return self.convert(value, bound);
        }
        Ok(Box::new(value.clone()))
    }

    /// The zero value of `target`, used when no conversion rule applies.
    fn zero(&self, value: &Value, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        match target.kind() {
            TypeKind::Any => Ok(Box::new(Value::Null)),
            TypeKind::Shared(shared) => {
                let inner = self.zero(value, shared.inner())?;
                shared
                    .wrap(inner)
                    .map_err(|found| incompatible(target, found.reflect_type_info().path()))
            }
            _ => target.default_value().ok_or_else(|| incompatible(target, value.describe())),
        }
    }

    /// Runs `body` one level deeper, after the depth check.
    fn descend(
        &mut self,
        value: &Value,
        target: &'static TypeInfo,
        body: impl FnOnce(&mut Self) -> Result<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>> {
        if self.depth >= self.settings.max_object_depth {
            if self.settings.raise_on_max_depth {
                return Err(Error::MaxDepthExceeded {
                    max_depth: self.settings.max_object_depth,
                });
            }
            trace!(
                type_path = target.path(),
                depth = self.depth,
                "maximum depth reached, using the zero value"
            );
            return self.zero(value, target);
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    // -------------------------------------------------------------------------
    // Leaves

    fn leaf(
        &self,
        value: &Value,
        target: &'static TypeInfo,
        info: &PrimitiveInfo,
    ) -> Result<Box<dyn Reflect>> {
        if let Value::Primitive(source) = value
            && let Some(built) = convert_leaf(source, info)
        {
            return Ok(built);
        }
        trace!(
            type_path = target.path(),
            found = value.describe(),
            "no conversion rule, using the zero value"
        );
        self.zero(value, target)
    }

    fn variant(
        &self,
        value: &Value,
        target: &'static TypeInfo,
        info: &EnumInfo,
    ) -> Result<Box<dyn Reflect>> {
        let index = match value {
            Value::Primitive(Primitive::Str(name)) => {
                info.index_of_name(name, self.settings.case_sensitive)
            }
            Value::Primitive(Primitive::Int(d)) => info.index_of_discriminant(*d),
            Value::Primitive(Primitive::UInt(d)) => i64::try_from(*d)
                .ok()
                .and_then(|d| info.index_of_discriminant(d)),
            _ => None,
        };
        match index.and_then(|index| info.build(index)) {
            Some(built) => Ok(built),
            None => {
                trace!(type_path = target.path(), "unknown variant, using the zero value");
                self.zero(value, target)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Containers

    fn list(&mut self, value: &Value, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        let (Some(shape), Value::Array(items)) = (evaluate_list_shape(target), value) else {
            return self.zero(value, target);
        };

        self.descend(value, target, |this| {
            if let Some(len) = shape.exact_len
                && len != items.len()
            {
                return Err(incompatible(target, format!("an array of {} items", items.len())));
            }

            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                elements.push(this.convert(item, shape.element)?);
            }

            let built = (shape.collect)(elements)
                .ok_or_else(|| incompatible(shape.backing, value.describe()))?;
            match shape.read_only_wrap {
                Some(wrap) => wrap(built).ok_or_else(|| incompatible(target, shape.backing.path())),
                None => Ok(built),
            }
        })
    }

    fn map(&mut self, value: &Value, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        let (Some(shape), Value::Object(entries)) = (evaluate_dictionary_shape(target), value)
        else {
            return self.zero(value, target);
        };

        self.descend(value, target, |this| {
            let mut pairs = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                if is_reserved(key) {
                    continue;
                }
                let key = this.convert(&Value::from(key.as_str()), shape.key)?;
                pairs.push((key, this.convert(item, shape.value)?));
            }

            let built = (shape.collect)(pairs)
                .ok_or_else(|| incompatible(shape.backing, value.describe()))?;
            match shape.read_only_wrap {
                Some(wrap) => wrap(built).ok_or_else(|| incompatible(target, shape.backing.path())),
                None => Ok(built),
            }
        })
    }

    // -------------------------------------------------------------------------
    // Records

    fn record(
        &mut self,
        value: &Value,
        target: &'static TypeInfo,
        facts: &ShapeFacts,
    ) -> Result<Box<dyn Reflect>> {
        let Value::Object(entries) = value else {
            return self.zero(value, target);
        };

        self.descend(value, target, |this| {
            let mut instance = this.zero(value, target)?;
            let case_sensitive = this.settings.case_sensitive;
            let table = if facts.is_anonymous_like {
                get_all_field_members(target, case_sensitive)
            } else {
                get_members(target, case_sensitive)
            };

            for (key, item) in entries {
                if is_reserved(key) {
                    continue;
                }
                match table.get(key) {
                    Some(member) if member.can_write() => {
                        this.assign(&mut *instance, target, member, item)?;
                    }
                    Some(_) => trace!(
                        type_path = target.path(),
                        member = key.as_str(),
                        "read-only member, skipping"
                    ),
                    None => this.unknown(&mut *instance, target, key, item)?,
                }
            }
            Ok(instance)
        })
    }

    fn assign(
        &mut self,
        instance: &mut dyn Reflect,
        target: &'static TypeInfo,
        member: &MemberDescriptor,
        item: &Value,
    ) -> Result<()> {
        let converted = self.convert(item, member.declared())?;
        if let Err(rejected) = member.set(instance, converted) {
            trace!(
                type_path = target.path(),
                member = member.name(),
                found = rejected.reflect_type_info().path(),
                "member rejected the value, skipping"
            );
        }
        Ok(())
    }

    fn unknown(
        &mut self,
        instance: &mut dyn Reflect,
        target: &'static TypeInfo,
        key: &str,
        item: &Value,
    ) -> Result<()> {
        if let Some(record) = instance.as_dynamic_record_mut() {
            record.insert_dynamic(key.into(), self.polymorphic(item)?);
            return Ok(());
        }
        if self.settings.raise_on_missing_member {
            return Err(Error::MissingMember {
                type_path: target.path().into(),
                member: key.into(),
            });
        }
        trace!(type_path = target.path(), member = key, "no matching member, dropping key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_reflect::Reflect;
    use vc_reflect::derive::Reflect;
    use vc_reflect::impls::{Expando, Shared};
    use vc_reflect::info::Typed;

    use super::{from_canonical, from_canonical_as};
    use crate::{DeserializeSettings, Error, SerializeSettings, TypeTagPolicy, Value};
    use crate::{to_canonical, to_json_string, to_typed};

    #[derive(Reflect, Default, Debug, PartialEq)]
    pub struct Leaf {
        pub n: i32,
    }

    #[derive(Reflect, Default)]
    pub struct Catalog {
        pub name: String,
        pub items: Vec<Box<dyn Reflect>>,
        pub stock: BTreeMap<u16, Leaf>,
    }

    #[derive(Reflect, Default)]
    pub struct Outer {
        pub middle: Middle,
    }

    #[derive(Reflect, Default)]
    pub struct Middle {
        pub inner: Inner,
    }

    #[derive(Reflect, Default)]
    pub struct Inner {
        pub value: i32,
    }

    #[derive(Reflect, Default)]
    #[reflect(dynamic)]
    pub struct Bag {
        pub title: String,
        #[reflect(extra)]
        extra: Expando,
    }

    fn shared_leaf(back: &dyn Reflect) -> i32 {
        back.downcast_ref::<Shared<Leaf>>().map_or(-1, |cell| cell.read().n)
    }

    #[test]
    fn canonical_round_trip_with_tags() {
        let catalog = Catalog {
            name: "spring".into(),
            items: vec![
                Box::new(Leaf { n: 1 }),
                Box::new(Shared::new(Leaf { n: 2 })),
                Box::new(7_u128),
            ],
            stock: [(3, Leaf { n: 30 }), (4, Leaf { n: 40 })].into(),
        };
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        let value = to_canonical(&catalog, &settings).unwrap();
        assert_eq!(
            value.get("$type").and_then(Value::as_str),
            Some("vc_json::rehydrate::tests::Catalog")
        );

        let back: Catalog = from_canonical_as(&value, &DeserializeSettings::DEFAULT).unwrap();
        assert_eq!(back.name, "spring");
        assert_eq!(back.stock, catalog.stock);
        assert_eq!(back.items.len(), 3);
        assert_eq!(back.items[0].downcast_ref::<Leaf>(), Some(&Leaf { n: 1 }));
        assert_eq!(shared_leaf(&*back.items[1]), 2);
        assert_eq!(back.items[2].downcast_ref::<u128>(), Some(&7));
    }

    #[test]
    fn depth_policy_on_nested_records() {
        let outer = Outer {
            middle: Middle {
                inner: Inner { value: 5 },
            },
        };

        let truncated = SerializeSettings::DEFAULT.with_max_object_depth(2);
        assert_eq!(to_json_string(&outer, &truncated).unwrap(), r#"{"middle":{"inner":{}}}"#);
        let err = to_json_string(&outer, &truncated.with_raise_on_max_depth(true)).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 2 }));

        let value = to_canonical(&outer, &SerializeSettings::DEFAULT).unwrap();
        let fits = DeserializeSettings::DEFAULT.with_max_object_depth(3);
        let back: Outer = from_canonical_as(&value, &fits).unwrap();
        assert_eq!(back.middle.inner.value, 5);

        let read = DeserializeSettings::DEFAULT.with_max_object_depth(2);
        let back: Outer = from_canonical_as(&value, &read).unwrap();
        assert_eq!(back.middle.inner.value, 0);

        let strict = read.with_raise_on_max_depth(true);
        let err = from_canonical(&value, Outer::type_info(), &strict).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 2 }));
    }

    #[test]
    fn boxed_dynamic_record_keeps_all_members() {
        let mut bag = Bag {
            title: "notes".into(),
            extra: Expando::default(),
        };
        bag.extra.insert("color", Box::new(String::from("red")));
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(bag)];

        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);
        let text = to_json_string(&items, &settings).unwrap();
        assert_eq!(
            text,
            r#"[{"$type":"vc_json::rehydrate::tests::Bag","title":"notes","color":"red"}]"#
        );

        let back: Vec<Box<dyn Reflect>> = to_typed(&text, &DeserializeSettings::DEFAULT).unwrap();
        let bag = back[0].downcast_ref::<Bag>().unwrap();
        assert_eq!(bag.title, "notes");
        assert_eq!(
            bag.extra.get("color").and_then(|v| v.downcast_ref::<Value>()),
            Some(&Value::from("red"))
        );
    }

    #[test]
    fn shared_cells_in_polymorphic_slots() {
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(Shared::new(Leaf { n: 1 }))];
        let tag = r#""$type":"vc_reflect::impls::Shared<vc_json::rehydrate::tests::Leaf>""#;

        let auto = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);
        let text = to_json_string(&items, &auto).unwrap();
        assert_eq!(text, alloc::format!("[{{{tag},\"n\":1}}]"));

        let all = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        let tagged = to_json_string(&items, &all).unwrap();
        assert!(tagged.contains(tag));
        assert!(!tagged.contains(r#""$type":"vc_json::rehydrate::tests::Leaf""#));

        for text in [text, tagged] {
            let back: Vec<Box<dyn Reflect>> =
                to_typed(&text, &DeserializeSettings::DEFAULT).unwrap();
            assert!(back[0].is::<Shared<Leaf>>());
            assert_eq!(shared_leaf(&*back[0]), 1);
        }
    }
}
