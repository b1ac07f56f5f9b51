use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{trace, warn};
use vc_reflect::Reflect;
use vc_reflect::info::{NullableInfo, SharedInfo, TypeInfo, Typed};
use vc_reflect::members::{MemberTable, get_all_field_members, get_members};
use vc_reflect::ops::{DynamicRecord, List, Map, PrimitiveRef, ReflectRef, SharedRef};
use vc_reflect::shape::shape_facts;

use super::Sink;
use super::writer::format_date;
use crate::binder::ensure_registered;
use crate::error::{Error, Result};
use crate::filter::{MemberFilter, Slot};
use crate::settings::{SerializeSettings, TypeTagPolicy};
use crate::stack::{Identity, PooledStack, checkout};
use crate::tag::{self, NodeKind, TYPE_KEY, VALUE_KEY, VALUES_KEY};
use crate::value::Value;

/// A member or entry waiting to be written.
struct Entry<'v> {
    key: Cow<'v, str>,
    value: &'v dyn Reflect,
    declared: Option<&'static TypeInfo>,
}

/// The type a tag names, and the declared type of the slot it is compared
/// with.
///
/// For the content of a shared cell both come from the cell: the tag names
/// `Shared<T>` and is decided against the slot holding the cell.
#[derive(Clone, Copy)]
struct TagTarget {
    info: &'static TypeInfo,
    declared: Option<&'static TypeInfo>,
}

// -----------------------------------------------------------------------------
// Walker

/// Single-pass traversal of an object graph, feeding a [`Sink`].
///
/// The walker owns the ancestor stack of the call and the current depth;
/// every composite frame pushes and pops them on all exits.
pub(crate) struct Walker<'a, S> {
    settings: &'a SerializeSettings,
    filter: Option<&'a dyn MemberFilter>,
    stack: PooledStack,
    depth: usize,
    /// Set by a shared cell for the node holding its content.
    through: Option<TagTarget>,
    sink: S,
}

impl<'a, S: Sink> Walker<'a, S> {
    pub fn new(
        settings: &'a SerializeSettings,
        filter: Option<&'a dyn MemberFilter>,
        sink: S,
    ) -> Self {
        Self {
            settings,
            filter,
            stack: checkout(),
            depth: 0,
            through: None,
            sink,
        }
    }

    #[inline]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Writes `value`, whose slot declares `declared` (`None` at the root).
    pub fn walk(&mut self, value: &dyn Reflect, declared: Option<&'static TypeInfo>) -> Result<()> {
        let info = value.reflect_type_info();
        let through = self.through.take();
        let tag_as = through.unwrap_or(TagTarget { info, declared });

        match value.reflect_ref() {
            ReflectRef::Nullable(None) => {
                self.sink.null();
                Ok(())
            }
            ReflectRef::Nullable(Some(inner)) => {
                let inner_declared = info.as_nullable().ok().map(NullableInfo::inner);
                self.through = through;
                self.walk(inner, inner_declared.or(declared))
            }
            ReflectRef::Primitive(leaf) => {
                let ambiguous = info.as_primitive().is_ok_and(|p| p.kind().is_ambiguous());
                // A bare literal never identifies the cell type.
                self.leaf(tag_as, leaf, ambiguous || through.is_some());
                Ok(())
            }
            ReflectRef::Enum(value) => {
                let leaf = if self.settings.enum_as_number {
                    PrimitiveRef::Int(value.discriminant())
                } else {
                    PrimitiveRef::Str(value.variant_name())
                };
                self.leaf(tag_as, leaf, through.is_some());
                Ok(())
            }
            ReflectRef::Opaque(opaque) => {
                match opaque.downcast_ref::<Value>() {
                    Some(value) => self.sink.value(value),
                    None => {
                        trace!(
                            type_path = info.path(),
                            "opaque value without representation, writing null"
                        );
                        self.sink.null();
                    }
                }
                Ok(())
            }
            ReflectRef::Shared(shared) => self.shared(shared, info, tag_as),
            ReflectRef::Map(map) => {
                self.composite(value, info, tag_as, NodeKind::Object, |this, tagged| {
                    this.map(map, info, tagged.then_some(tag_as.info))
                })
            }
            ReflectRef::Dynamic(record) => {
                self.composite(value, info, tag_as, NodeKind::Object, |this, tagged| {
                    this.dynamic(record, info, tagged.then_some(tag_as.info))
                })
            }
            ReflectRef::List(list) => {
                self.composite(value, info, tag_as, NodeKind::Array, |this, tagged| {
                    this.list(list, info, tagged.then_some(tag_as.info))
                })
            }
            ReflectRef::Record(record) => {
                self.composite(value, info, tag_as, NodeKind::Object, |this, tagged| {
                    this.record(record, info, tagged.then_some(tag_as.info))
                })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Leaves

    fn leaf(&mut self, tag_as: TagTarget, leaf: PrimitiveRef<'_>, ambiguous: bool) {
        let node = NodeKind::Leaf { ambiguous };
        if tag::wants_tag(self.settings, node, tag_as.info, tag_as.declared) {
            self.sink.begin_object();
            self.write_tag(tag_as.info);
            self.sink.key(VALUE_KEY);
            self.sink.primitive(leaf);
            self.sink.end_object();
        } else {
            self.sink.primitive(leaf);
        }
    }

    fn write_tag(&mut self, info: &'static TypeInfo) {
        ensure_registered(info);
        self.sink.key(TYPE_KEY);
        self.sink.primitive(PrimitiveRef::Str(tag::type_name(self.settings, info)));
    }

    // -------------------------------------------------------------------------
    // Frames

    /// Runs `body` inside a composite frame, after the cycle and depth
    /// checks. `body` receives whether the node is tagged.
    fn composite(
        &mut self,
        value: &dyn Reflect,
        info: &'static TypeInfo,
        tag_as: TagTarget,
        kind: NodeKind,
        body: impl FnOnce(&mut Self, bool) -> Result<()>,
    ) -> Result<()> {
        let identity = Identity::of(value);
        if self.stack.contains(identity) {
            return self.circular(info);
        }

        if self.depth >= self.settings.max_object_depth {
            if self.settings.raise_on_max_depth {
                return Err(Error::MaxDepthExceeded {
                    max_depth: self.settings.max_object_depth,
                });
            }
            trace!(
                type_path = info.path(),
                depth = self.depth,
                "maximum depth reached, truncating branch"
            );
            match kind {
                NodeKind::Array => {
                    self.sink.begin_array();
                    self.sink.end_array();
                }
                _ => {
                    self.sink.begin_object();
                    self.sink.end_object();
                }
            }
            return Ok(());
        }

        let tagged = tag::wants_tag(self.settings, kind, tag_as.info, tag_as.declared);
        self.stack.push(identity);
        self.depth += 1;
        let result = body(self, tagged);
        self.depth -= 1;
        self.stack.pop();
        result
    }

    fn circular(&mut self, info: &'static TypeInfo) -> Result<()> {
        if self.settings.raise_on_circular_ref {
            return Err(Error::CircularReference {
                type_path: info.path().into(),
            });
        }
        trace!(type_path = info.path(), "circular reference, writing null");
        self.sink.null();
        Ok(())
    }

    fn shared(
        &mut self,
        shared: &dyn SharedRef,
        info: &'static TypeInfo,
        through: TagTarget,
    ) -> Result<()> {
        let identity = Identity::new(shared.identity(), info.id());
        if self.stack.contains(identity) {
            return self.circular(info);
        }

        let declared = info.as_shared().ok().map(SharedInfo::inner);
        self.stack.push(identity);
        let mut result = Ok(());
        shared.visit(&mut |inner| {
            self.through = Some(through);
            result = self.walk(inner, declared);
        });
        self.through = None;
        self.stack.pop();
        result
    }

    // -------------------------------------------------------------------------
    // Objects

    fn record(
        &mut self,
        record: &dyn Reflect,
        info: &'static TypeInfo,
        tag: Option<&'static TypeInfo>,
    ) -> Result<()> {
        let mut entries = Vec::new();
        self.collect_members(record, info, &mut entries);
        self.write_object(tag, entries)
    }

    fn dynamic(
        &mut self,
        record: &dyn DynamicRecord,
        info: &'static TypeInfo,
        tag: Option<&'static TypeInfo>,
    ) -> Result<()> {
        // Getters downcast their owner, which must be the record itself and
        // not the `Box<dyn Reflect>` slot holding it.
        let owner: &dyn Reflect = record;
        let mut entries = Vec::new();
        self.collect_members(owner, info, &mut entries);

        let any = <Box<dyn Reflect> as Typed>::type_info();
        for (name, value) in record.dynamic_members() {
            let key = self.fold_name(name);
            if entries.iter().any(|e| e.key == key) {
                warn!(
                    type_path = info.path(),
                    member = name,
                    "dynamic member shadows a declared member, skipping"
                );
                continue;
            }
            if !self.include(Slot::Member { owner: info, name }, value) || self.collides(&key) {
                continue;
            }
            entries.push(Entry {
                key,
                value,
                declared: Some(any),
            });
        }

        self.write_object(tag, entries)
    }

    fn member_table(&self, info: &'static TypeInfo) -> &'static MemberTable {
        if shape_facts(info).is_anonymous_like {
            get_all_field_members(info, self.settings.case_sensitive)
        } else {
            get_members(info, self.settings.case_sensitive)
        }
    }

    fn collect_members<'v>(
        &self,
        owner: &'v dyn Reflect,
        info: &'static TypeInfo,
        entries: &mut Vec<Entry<'v>>,
    ) {
        for member in self.member_table(info).iter() {
            if !member.can_read() {
                continue;
            }
            let name = member.name();
            let Some(value) = member.get(owner) else {
                trace!(type_path = info.path(), member = name, "member getter failed, skipping");
                continue;
            };
            let key = self.fold_name(name);
            if !self.include(Slot::Member { owner: info, name }, value) || self.collides(&key) {
                continue;
            }
            entries.push(Entry {
                key,
                value,
                declared: Some(member.declared()),
            });
        }
    }

    fn map(
        &mut self,
        map: &dyn Map,
        info: &'static TypeInfo,
        tag: Option<&'static TypeInfo>,
    ) -> Result<()> {
        let declared = shape_facts(info).element_type;
        let mut entries = Vec::with_capacity(map.len());

        for (key, value) in map.iter() {
            let Some(key) = self.stringify_key(key) else {
                trace!(type_path = info.path(), "map key has no string form, skipping entry");
                continue;
            };
            if !self.include(Slot::Entry { key: &key }, value) || self.collides(&key) {
                continue;
            }
            entries.push(Entry { key, value, declared });
        }

        self.write_object(tag, entries)
    }

    /// Writes an object, prefixed with the tag of `tag` when set.
    fn write_object(
        &mut self,
        tag: Option<&'static TypeInfo>,
        mut entries: Vec<Entry<'_>>,
    ) -> Result<()> {
        if self.settings.order_names {
            entries.sort_by(|a, b| a.key.cmp(&b.key));
        }

        self.sink.begin_object();
        if let Some(tag) = tag {
            self.write_tag(tag);
        }
        for entry in entries {
            if self.settings.ignore_null_values && self.resolves_to_null(entry.value) {
                continue;
            }
            self.sink.key(&entry.key);
            self.walk(entry.value, entry.declared)?;
        }
        self.sink.end_object();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sequences

    fn list(
        &mut self,
        list: &dyn List,
        info: &'static TypeInfo,
        tag: Option<&'static TypeInfo>,
    ) -> Result<()> {
        let declared = shape_facts(info).element_type;

        if let Some(tag) = tag {
            self.sink.begin_object();
            self.write_tag(tag);
            self.sink.key(VALUES_KEY);
        }
        self.sink.begin_array();
        for (index, item) in list.iter().enumerate() {
            if !self.include(Slot::Item { index }, item) {
                continue;
            }
            if self.settings.ignore_null_list_items && self.resolves_to_null(item) {
                continue;
            }
            self.walk(item, declared)?;
        }
        self.sink.end_array();
        if tag.is_some() {
            self.sink.end_object();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers

    fn include(&self, slot: Slot<'_>, value: &dyn Reflect) -> bool {
        match self.filter {
            Some(filter) => filter.include(slot, value),
            None => true,
        }
    }

    /// A key equal to a reserved key would corrupt tagged output.
    fn collides(&self, key: &str) -> bool {
        let collides = self.settings.type_tags != TypeTagPolicy::None && tag::is_reserved(key);
        if collides {
            warn!(key, "member name collides with a reserved key, skipping");
        }
        collides
    }

    fn fold_name<'v>(&self, name: &'v str) -> Cow<'v, str> {
        if self.settings.case_sensitive || !name.chars().any(char::is_uppercase) {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }

    /// Returns `true` if `value` would be written as `null`.
    fn resolves_to_null(&self, value: &dyn Reflect) -> bool {
        match value.reflect_ref() {
            ReflectRef::Nullable(None) => true,
            ReflectRef::Nullable(Some(inner)) => self.resolves_to_null(inner),
            ReflectRef::Opaque(opaque) => match opaque.downcast_ref::<Value>() {
                Some(value) => value.is_null(),
                None => true,
            },
            ReflectRef::Shared(shared) => {
                !self.settings.raise_on_circular_ref
                    && self.stack.contains(Identity::new(shared.identity(), value.ty_id()))
            }
            _ => false,
        }
    }

    fn stringify_key<'v>(&self, key: &'v dyn Reflect) -> Option<Cow<'v, str>> {
        let text = match key.reflect_ref() {
            ReflectRef::Primitive(leaf) => match leaf {
                PrimitiveRef::Str(s) => return Some(Cow::Borrowed(s)),
                PrimitiveRef::Bool(v) => v.to_string(),
                PrimitiveRef::Int(v) => v.to_string(),
                PrimitiveRef::UInt(v) => v.to_string(),
                PrimitiveRef::BigInt(v) => v.to_string(),
                PrimitiveRef::BigUInt(v) => v.to_string(),
                PrimitiveRef::Float(v) => v.to_string(),
                PrimitiveRef::Char(v) => v.to_string(),
                PrimitiveRef::Bytes(v) => STANDARD.encode(v),
                PrimitiveRef::DateTime(v) => format_date(v, self.settings.date_format),
            },
            ReflectRef::Enum(value) => return Some(Cow::Borrowed(value.variant_name())),
            ReflectRef::Opaque(opaque) => {
                return opaque.downcast_ref::<Value>()?.as_str().map(Cow::Borrowed);
            }
            _ => return None,
        };
        Some(Cow::Owned(text))
    }
}
