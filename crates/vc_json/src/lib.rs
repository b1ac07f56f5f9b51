#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod binder;
mod canonical;
mod convert;
mod emit;
mod error;
mod filter;
mod rehydrate;
mod settings;
mod shape;
mod tag;
mod value;

pub mod stack;

// -----------------------------------------------------------------------------
// Exports

pub use binder::{TypeBinder, bind_to_type};
pub use canonical::{to_canonical, to_canonical_with};
pub use emit::{to_json_string, to_json_string_with, write_json};
pub use error::{Error, Result};
pub use filter::{MemberFilter, Slot};
pub use rehydrate::{from_canonical, from_canonical_as};
pub use settings::{DateFormat, Formatting, TypeNameFormat, TypeTagPolicy};
pub use settings::{DeserializeSettings, SerializeSettings};
pub use shape::{DictionaryShape, ListShape, evaluate_dictionary_shape, evaluate_list_shape};
pub use tag::{TYPE_KEY, VALUE_KEY, VALUES_KEY};
pub use value::{Map, Value};

use alloc::boxed::Box;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_reflect::registry::TypeRegistryArc;

// -----------------------------------------------------------------------------
// Entry points

/// Parses JSON text into a canonical [`Value`], keeping key order.
///
/// # Examples
///
/// ```
/// let value = vc_json::parse(r#"{"b": 1, "a": [true, null]}"#).unwrap();
/// let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
/// assert_eq!(keys, ["b", "a"]);
/// ```
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Parses JSON text into whatever its tags describe.
///
/// The text is rehydrated as a `Box<dyn Reflect>` slot: a resolvable root
/// `$type` tag produces that type, anything else the canonical [`Value`].
pub fn to_object(text: &str, settings: &DeserializeSettings) -> Result<Box<dyn Reflect>> {
    from_canonical(&parse(text)?, <Box<dyn Reflect>>::type_info(), settings)
}

/// Parses JSON text into a `T`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_json::{DeserializeSettings, to_typed};
///
/// let text = r#"{"a": "1", "b": 2.0}"#;
/// let map: BTreeMap<String, u8> = to_typed(text, &DeserializeSettings::DEFAULT).unwrap();
/// assert_eq!(map["a"], 1);
/// assert_eq!(map["b"], 2);
/// ```
pub fn to_typed<T: Typed>(text: &str, settings: &DeserializeSettings) -> Result<T> {
    from_canonical_as(&parse(text)?, settings)
}

/// Registers `T` and its dependencies in the global registry, so that tags
/// naming them can be resolved.
///
/// Returns `true` if `T` was new.
#[inline]
pub fn register<T: Typed>() -> bool {
    TypeRegistryArc::global().write().register::<T>()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeMap, BTreeSet};
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use chrono::{DateTime, Utc};
    use vc_reflect::Reflect;
    use vc_reflect::derive::Reflect;
    use vc_reflect::impls::{Bytes, Expando, Shared};
    use vc_reflect::info::{TypeInfo, Typed};

    use crate::{DateFormat, DeserializeSettings, Error, Formatting, SerializeSettings};
    use crate::{TypeTagPolicy, Value};
    use crate::{parse, to_canonical, to_json_string, to_object, to_typed};

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Reflect, Debug, PartialEq, Clone, Copy)]
    enum Kind {
        Small = 1,
        Large = 5,
    }

    #[derive(Reflect, Default)]
    struct Inventory {
        name: String,
        kind: Option<Kind>,
        counts: Vec<u32>,
        prices: BTreeMap<String, f64>,
        labels: BTreeSet<String>,
        by_id: BTreeMap<u16, Point>,
        items: Vec<Box<dyn Reflect>>,
        blob: Bytes,
        big: u128,
        when: DateTime<Utc>,
    }

    #[derive(Reflect, Default)]
    struct Greeting {
        #[reflect(rename = "Value1")]
        first: String,
        #[reflect(rename = "Value2")]
        second: String,
    }

    #[derive(Reflect, Default)]
    struct Node {
        label: String,
        next: Option<Shared<Node>>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Account {
        #[reflect(rename = "UserName")]
        user_name: String,
        age: u8,
    }

    fn sample() -> Inventory {
        Inventory {
            name: "depot".into(),
            kind: Some(Kind::Large),
            counts: vec![3, 1, 4],
            prices: [("apple".to_string(), 1.5), ("pear".to_string(), 2.0)].into(),
            labels: ["fresh".to_string(), "local".to_string()].into(),
            by_id: [(7, Point { x: 1, y: 2 })].into(),
            items: vec![
                Box::new(Point { x: 3, y: 4 }),
                Box::new(9_u128),
                Box::new("loose".to_string()),
            ],
            blob: Bytes(vec![0, 1, 254, 255]),
            big: u128::MAX,
            when: DateTime::from_timestamp_millis(1_714_557_600_123).unwrap(),
        }
    }

    #[test]
    fn round_trip_with_tags() {
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        let text = to_json_string(&sample(), &settings).unwrap();
        assert!(text.starts_with(r#"{"$type":"vc_json::tests::Inventory""#));

        let back: Inventory = to_typed(&text, &DeserializeSettings::DEFAULT).unwrap();
        let expected = sample();
        assert_eq!(back.name, expected.name);
        assert_eq!(back.kind, expected.kind);
        assert_eq!(back.counts, expected.counts);
        assert_eq!(back.prices, expected.prices);
        assert_eq!(back.labels, expected.labels);
        assert_eq!(back.by_id, expected.by_id);
        assert_eq!(back.blob.0, expected.blob.0);
        assert_eq!(back.big, expected.big);
        assert_eq!(back.when, expected.when);

        assert_eq!(back.items.len(), 3);
        assert_eq!(back.items[0].downcast_ref::<Point>(), Some(&Point { x: 3, y: 4 }));
        assert_eq!(back.items[1].downcast_ref::<u128>(), Some(&9));
        assert_eq!(back.items[2].downcast_ref::<Value>(), Some(&Value::from("loose")));

        // The object entry point follows the root tag.
        let object = to_object(&text, &DeserializeSettings::DEFAULT).unwrap();
        assert!(object.is::<Inventory>());
    }

    #[test]
    fn text_is_valid_json() {
        let text = to_json_string(&sample(), &SerializeSettings::DEFAULT).unwrap();
        let checked: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(checked["big"], serde_json::Value::from(u128::MAX.to_string()));
        assert_eq!(checked["when"], serde_json::Value::from("2024-05-01T10:00:00.123Z"));
        assert_eq!(checked["by_id"]["7"]["y"], serde_json::Value::from(2));
    }

    #[test]
    fn example_output() {
        let greeting = Greeting {
            first: "Hello".into(),
            second: "World".into(),
        };

        let plain = to_json_string(&greeting, &SerializeSettings::DEFAULT).unwrap();
        assert_eq!(plain, r#"{"Value1":"Hello","Value2":"World"}"#);

        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        let tagged = to_json_string(&greeting, &settings).unwrap();
        assert_eq!(
            tagged,
            r#"{"$type":"vc_json::tests::Greeting","Value1":"Hello","Value2":"World"}"#
        );
    }

    #[test]
    fn auto_tags_polymorphic_items() {
        let items: Vec<Box<dyn Reflect>> = vec![
            Box::new(Point { x: 1, y: 2 }),
            Box::new(Point { x: 3, y: 4 }),
            Box::new(5_i32),
        ];
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);

        let text = to_json_string(&items, &settings).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"[{"$type":"vc_json::tests::Point","x":1,"y":2},"#,
                r#"{"$type":"vc_json::tests::Point","x":3,"y":4},5]"#
            )
        );

        let concrete = vec![Point { x: 1, y: 2 }];
        assert_eq!(to_json_string(&concrete, &settings).unwrap(), r#"[{"x":1,"y":2}]"#);
    }

    #[test]
    fn cycle_policy() {
        let a = Shared::new(Node {
            label: "a".into(),
            next: None,
        });
        a.write().next = Some(a.clone());

        let text = to_json_string(&a, &SerializeSettings::DEFAULT).unwrap();
        assert_eq!(text, r#"{"label":"a","next":null}"#);

        let dropped = SerializeSettings::DEFAULT.with_ignore_null_values(true);
        assert_eq!(to_json_string(&a, &dropped).unwrap(), r#"{"label":"a"}"#);

        let strict = SerializeSettings::DEFAULT.with_raise_on_circular_ref(true);
        let err = to_json_string(&a, &strict).unwrap_err();
        assert!(matches!(err, Error::CircularReference { .. }));

        // Break the cycle so the cell is freed.
        a.write().next = None;
    }

    #[test]
    fn depth_policy() {
        let nested = vec![vec![vec![1_u8]]];

        let fits = SerializeSettings::DEFAULT.with_max_object_depth(3);
        assert_eq!(to_json_string(&nested, &fits).unwrap(), "[[[1]]]");

        let truncated = SerializeSettings::DEFAULT.with_max_object_depth(2);
        assert_eq!(to_json_string(&nested, &truncated).unwrap(), "[[[]]]");

        let strict = truncated.with_raise_on_max_depth(true);
        let err = to_json_string(&nested, &strict).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 2 }));

        let read = DeserializeSettings::DEFAULT.with_max_object_depth(2);
        let back: Vec<Vec<Vec<u8>>> = to_typed("[[[1]]]", &read).unwrap();
        assert_eq!(back, vec![vec![Vec::<u8>::new()]]);

        let strict = read.with_raise_on_max_depth(true);
        let err = to_typed::<Vec<Vec<Vec<u8>>>>("[[[1]]]", &strict).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded { .. }));
    }

    #[test]
    fn failed_write_leaves_buffer_untouched() {
        let nested = vec![vec![1_u8]];
        let strict = SerializeSettings::DEFAULT
            .with_max_object_depth(1)
            .with_raise_on_max_depth(true);

        let mut out = String::from("prefix");
        assert!(crate::write_json(&nested, &strict, &mut out).is_err());
        assert_eq!(out, "prefix");
    }

    #[test]
    fn concurrent_calls_match_sequential() {
        let graphs: Vec<Inventory> = (0..8)
            .map(|i| {
                let mut inventory = sample();
                inventory.name = alloc::format!("depot-{i}");
                inventory.counts.push(i);
                inventory
            })
            .collect();
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);

        let sequential: Vec<String> = graphs
            .iter()
            .map(|g| to_json_string(g, &settings).unwrap())
            .collect();

        let settings = &settings;
        let concurrent: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = graphs
                .iter()
                .map(|g| scope.spawn(move || to_json_string(g, settings).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn ordering_and_casing() {
        let account = Account {
            user_name: "ada".into(),
            age: 36,
        };

        let mut bag = Expando::default();
        bag.insert("z", Box::new(1_u8));
        bag.insert("a", Box::new(2_u8));
        let ordered = SerializeSettings::DEFAULT.with_order_names(true);
        assert_eq!(to_json_string(&bag, &SerializeSettings::DEFAULT).unwrap(), r#"{"z":1,"a":2}"#);
        assert_eq!(to_json_string(&bag, &ordered).unwrap(), r#"{"a":2,"z":1}"#);

        let lower = SerializeSettings::DEFAULT.with_case_sensitive(false);
        assert_eq!(to_json_string(&account, &lower).unwrap(), r#"{"username":"ada","age":36}"#);

        let text = r#"{"USERNAME":"bob","age":"41"}"#;
        let relaxed = DeserializeSettings::DEFAULT.with_case_sensitive(false);
        let back: Account = to_typed(text, &relaxed).unwrap();
        assert_eq!(back, Account { user_name: "bob".into(), age: 41 });

        let exact: Account = to_typed(text, &DeserializeSettings::DEFAULT).unwrap();
        assert_eq!(exact.user_name, "");
    }

    #[test]
    fn missing_member_policy() {
        let text = r#"{"x":1,"y":2,"z":3}"#;
        let point: Point = to_typed(text, &DeserializeSettings::DEFAULT).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });

        let strict = DeserializeSettings::DEFAULT.with_raise_on_missing_member(true);
        let err = to_typed::<Point>(text, &strict).unwrap_err();
        assert!(matches!(err, Error::MissingMember { ref member, .. } if member == "z"));
    }

    #[test]
    fn dynamic_records_keep_unknown_keys() {
        let text = r#"{"a":1,"b":{"c":[true]}}"#;
        let bag: Expando = to_typed(text, &DeserializeSettings::DEFAULT).unwrap();
        assert_eq!(bag.get("a").and_then(|v| v.downcast_ref::<Value>()), Some(&Value::from(1_i64)));

        assert_eq!(to_json_string(&bag, &SerializeSettings::DEFAULT).unwrap(), text);
    }

    #[test]
    fn binder_redirects_and_trust() {
        let text = r#"{"$type":"legacy::Spot","x":5,"y":6}"#;
        let binder = |name: &str| -> Option<&'static TypeInfo> {
            (name == "legacy::Spot").then(Point::type_info)
        };
        let settings = DeserializeSettings::DEFAULT.with_binder(binder);

        let object = to_object(text, &settings).unwrap();
        assert_eq!(object.downcast_ref::<Point>(), Some(&Point { x: 5, y: 6 }));

        let distrust = settings.with_trust_type_tags(false);
        let object = to_object(text, &distrust).unwrap();
        assert_eq!(object.downcast_ref::<Value>(), Some(&parse(text).unwrap()));

        let text = r#"{"$type":"nowhere::Thing"}"#;
        let unknown = to_object(text, &DeserializeSettings::DEFAULT).unwrap();
        assert!(unknown.is::<Value>());
    }

    #[test]
    fn enums_and_dates_by_number() {
        let settings = SerializeSettings::DEFAULT
            .with_enum_as_number(true)
            .with_date_format(DateFormat::Epoch);

        assert_eq!(to_json_string(&Kind::Large, &settings).unwrap(), "5");
        let when: DateTime<Utc> = DateTime::from_timestamp_millis(86_400_000).unwrap();
        assert_eq!(to_json_string(&when, &settings).unwrap(), r#""/Date(86400000)/""#);

        let read = DeserializeSettings::DEFAULT;
        assert_eq!(to_typed::<Kind>("5", &read).unwrap(), Kind::Large);
        let relaxed = read.clone().with_case_sensitive(false);
        assert_eq!(to_typed::<Kind>(r#""large""#, &relaxed).unwrap(), Kind::Large);
        // Unknown variants fall back to the first one.
        assert_eq!(to_typed::<Kind>("9", &read).unwrap(), Kind::Small);
        assert_eq!(to_typed::<DateTime<Utc>>(r#""/Date(86400000)/""#, &read).unwrap(), when);
    }

    #[test]
    fn null_items_are_dropped() {
        let items = vec![Some(1_u8), None, Some(3)];
        let settings = SerializeSettings::DEFAULT.with_ignore_null_list_items(true);
        assert_eq!(to_json_string(&items, &settings).unwrap(), "[1,3]");
        assert_eq!(to_json_string(&items, &SerializeSettings::DEFAULT).unwrap(), "[1,null,3]");
    }

    #[test]
    fn indented_text() {
        let points = vec![Point { x: 1, y: 2 }];
        let settings = SerializeSettings::DEFAULT.with_formatting(Formatting::Indented(2));
        let text = to_json_string(&points, &settings).unwrap();
        assert_eq!(text, "[\n  {\n    \"x\": 1,\n    \"y\": 2\n  }\n]");

        let flat = SerializeSettings::DEFAULT.with_formatting(Formatting::Indented(0));
        assert_eq!(to_json_string(&points, &flat).unwrap(), "[\n{\n\"x\": 1,\n\"y\": 2\n}\n]");
    }

    #[test]
    fn canonical_root_is_written_verbatim() {
        let value = to_canonical(&Greeting::default(), &SerializeSettings::DEFAULT).unwrap();
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        assert_eq!(to_json_string(&value, &settings).unwrap(), r#"{"Value1":"","Value2":""}"#);
    }

    #[test]
    fn fixed_arrays_require_exact_length() {
        let read = DeserializeSettings::DEFAULT;
        assert_eq!(to_typed::<[u8; 2]>("[1,2]", &read).unwrap(), [1, 2]);

        let err = to_typed::<[u8; 2]>("[1,2,3]", &read).unwrap_err();
        assert!(matches!(err, Error::IncompatibleTargetType { .. }));
    }
}
