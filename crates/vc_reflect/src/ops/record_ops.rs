use alloc::boxed::Box;
use alloc::string::String;

use crate::Reflect;

/// A record whose instances carry members on top of the declared ones.
///
/// Declared members are still described by [`RecordInfo`]; this trait only
/// exposes the per-instance extras.
///
/// [`RecordInfo`]: crate::info::RecordInfo
pub trait DynamicRecord: Reflect {
    /// Iterates over the dynamic members in insertion order.
    fn dynamic_members(&self) -> Box<dyn Iterator<Item = (&str, &dyn Reflect)> + '_>;

    /// Inserts or replaces a dynamic member.
    fn insert_dynamic(&mut self, name: String, value: Box<dyn Reflect>);
}
