use alloc::boxed::Box;

use crate::Reflect;

/// A dictionary of reflected keys and values.
pub trait Map: Reflect {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Iterates over the entries in storage order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Returns `true` if the dictionary has no entry.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
