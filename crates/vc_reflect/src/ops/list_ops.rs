use alloc::boxed::Box;

use crate::Reflect;

/// A sequence of reflected items.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::List;
///
/// let list: &dyn List = &vec![1_u8, 2, 3];
/// let sum: u8 = list.iter().filter_map(|v| v.downcast_ref::<u8>()).sum();
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(sum, 6);
/// ```
pub trait List: Reflect {
    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Iterates over the items in storage order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Returns `true` if the sequence has no item.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
