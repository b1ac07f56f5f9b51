//! Pooled ancestor tracking for cycle detection.
//!
//! Each top-level call checks a [`TraversalStack`] out of a bounded free
//! list and gives it back, cleared but still allocated, when the
//! [`PooledStack`] guard drops.

use alloc::vec::Vec;
use core::any::TypeId;
use core::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use vc_reflect::Reflect;

/// Maximum number of idle stacks kept by the pool.
pub const POOL_CAPACITY: usize = 16;

static POOL: Mutex<Vec<TraversalStack>> = Mutex::new(Vec::new());

// -----------------------------------------------------------------------------
// Identity

/// Identity of a node: its address and its type.
///
/// A record and its first field share an address, the type tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    addr: usize,
    type_id: TypeId,
}

impl Identity {
    #[inline]
    pub const fn new(addr: usize, type_id: TypeId) -> Self {
        Self { addr, type_id }
    }

    /// Identity of a value in place.
    #[inline]
    pub fn of(value: &dyn Reflect) -> Self {
        Self::new(core::ptr::from_ref(value).cast::<()>().addr(), value.ty_id())
    }
}

// -----------------------------------------------------------------------------
// TraversalStack

/// The ancestors of the node being visited.
#[derive(Debug, Default)]
pub struct TraversalStack {
    entries: Vec<Identity>,
}

impl TraversalStack {
    #[inline]
    pub fn push(&mut self, identity: Identity) {
        self.entries.push(identity);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Identity> {
        self.entries.pop()
    }

    /// Returns `true` if `identity` is an ancestor.
    #[inline]
    pub fn contains(&self, identity: Identity) -> bool {
        self.entries.contains(&identity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn clear(&mut self) {
        self.entries.clear();
    }
}

// -----------------------------------------------------------------------------
// Pool

/// A [`TraversalStack`] checked out of the pool.
#[derive(Debug)]
pub struct PooledStack(TraversalStack);

/// Takes an idle stack out of the pool, or allocates a new one.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use vc_json::stack::{Identity, checkout};
///
/// let mut stack = checkout();
/// let id = Identity::new(0x10, TypeId::of::<u8>());
/// stack.push(id);
/// assert!(stack.contains(id));
/// drop(stack);
///
/// assert!(checkout().is_empty());
/// ```
pub fn checkout() -> PooledStack {
    let stack = POOL.lock().unwrap_or_else(PoisonError::into_inner).pop();
    PooledStack(stack.unwrap_or_default())
}

impl Deref for PooledStack {
    type Target = TraversalStack;

    #[inline]
    fn deref(&self) -> &TraversalStack {
        &self.0
    }
}

impl DerefMut for PooledStack {
    #[inline]
    fn deref_mut(&mut self) -> &mut TraversalStack {
        &mut self.0
    }
}

impl Drop for PooledStack {
    fn drop(&mut self) {
        let mut stack = core::mem::take(&mut self.0);
        stack.clear();
        let mut pool = POOL.lock().unwrap_or_else(PoisonError::into_inner);
        if pool.len() < POOL_CAPACITY {
            pool.push(stack);
        }
    }
}

#[cfg(test)]
pub(crate) fn idle_stacks() -> usize {
    POOL.lock().unwrap_or_else(PoisonError::into_inner).len()
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{Identity, POOL_CAPACITY, checkout, idle_stacks};

    #[test]
    fn identity_includes_type() {
        let a = Identity::new(8, TypeId::of::<u8>());
        let b = Identity::new(8, TypeId::of::<u16>());
        assert_ne!(a, b);

        let value = 3_u32;
        assert_eq!(Identity::of(&value), Identity::of(&value));
    }

    #[test]
    fn pool_is_bounded() {
        let stacks: Vec<_> = (0..POOL_CAPACITY * 2).map(|_| checkout()).collect();
        drop(stacks);
        assert!(idle_stacks() <= POOL_CAPACITY);
    }

    #[test]
    fn released_stacks_are_cleared() {
        let mut stack = checkout();
        stack.push(Identity::new(1, TypeId::of::<()>()));
        stack.push(Identity::new(2, TypeId::of::<()>()));
        assert_eq!(stack.len(), 2);
        assert!(stack.pop().is_some());
        drop(stack);

        let again = checkout();
        assert!(again.is_empty());
    }
}
