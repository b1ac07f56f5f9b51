//! Process-wide memo tables.
//!
//! Both containers hand out `&'static` references: every value is leaked on
//! insertion and never removed, so a hit only needs a shared read lock and
//! returns without copying.
//!
//! The build closure of `get_or_build` runs while the write lock is held, so
//! the first caller for a key builds it exactly once and later callers reuse
//! the result. Such a closure must not re-enter the same cache; recursive
//! builders use `TypeCache::insert` instead.

use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt::Debug;
use core::hash::Hash;
use std::sync::{PoisonError, RwLock};

use hashbrown::Equivalent;

use crate::TypeIdMap;
use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// TypeCache

/// A read-mostly, build-once cache keyed by [`TypeId`].
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use vc_utils::TypeCache;
///
/// static NAMES: TypeCache<String> = TypeCache::new();
///
/// let a = NAMES.get_or_build(TypeId::of::<u8>(), || "u8".to_string());
/// let b = NAMES.get_or_build(TypeId::of::<u8>(), || unreachable!());
///
/// assert!(core::ptr::eq(a, b));
/// ```
pub struct TypeCache<V: 'static>(RwLock<TypeIdMap<&'static V>>);

impl<V: 'static> TypeCache<V> {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the cached value of the given type, if present.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static V> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    /// Returns the cached value, building it with `build` on the first request.
    #[inline]
    pub fn get_or_build(&self, type_id: TypeId, build: impl FnOnce() -> V) -> &'static V {
        match self.get(type_id) {
            Some(value) => value,
            None => self.build_slow(type_id, build),
        }
    }

    #[inline(never)]
    fn build_slow(&self, type_id: TypeId, build: impl FnOnce() -> V) -> &'static V {
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race between the read and write lock.
        *table.get_or_insert(type_id, || Box::leak(Box::new(build())))
    }

    /// Inserts `value` unless the type already has an entry.
    ///
    /// Returns the value that ends up in the cache, the first insertion wins.
    /// Unlike [`get_or_build`](Self::get_or_build), the value is built before
    /// the lock is taken, so building it may itself query this cache.
    pub fn insert(&self, type_id: TypeId, value: V) -> &'static V {
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *table.get_or_insert(type_id, || Box::leak(Box::new(value)))
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<V: Debug + 'static> Debug for TypeCache<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let table = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_list().entries(table.values()).finish()
    }
}

// -----------------------------------------------------------------------------
// MemoCache

/// A read-mostly, build-once cache with an arbitrary hashable key.
///
/// # Examples
///
/// ```
/// use vc_utils::MemoCache;
///
/// static LENGTHS: MemoCache<String, usize> = MemoCache::new();
///
/// assert_eq!(LENGTHS.get("abc"), None);
/// let len = LENGTHS.insert("abc".to_string(), 3);
///
/// assert_eq!(*len, 3);
/// assert_eq!(LENGTHS.get("abc"), Some(&3));
/// ```
pub struct MemoCache<K, V: 'static>(RwLock<HashMap<K, &'static V>>);

impl<K: Eq + Hash, V: 'static> MemoCache<K, V> {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(hashbrown::HashMap::with_hasher(
            crate::hash::FixedHashState,
        )))
    }

    /// Returns the cached value of `key`, if present.
    pub fn get<Q>(&self, key: &Q) -> Option<&'static V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Inserts `value` unless the key is already present.
    ///
    /// Returns the value that ends up in the cache, the first insertion wins.
    pub fn insert(&self, key: K, value: V) -> &'static V {
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *table.entry(key).or_insert_with(|| Box::leak(Box::new(value)))
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;
    use std::thread;

    use super::{MemoCache, TypeCache};

    #[test]
    fn type_cache_builds_once_across_threads() {
        static CACHE: TypeCache<u64> = TypeCache::new();
        static BUILDS: core::sync::atomic::AtomicUsize = core::sync::atomic::AtomicUsize::new(0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    *CACHE.get_or_build(TypeId::of::<i8>(), || {
                        BUILDS.fetch_add(1, core::sync::atomic::Ordering::SeqCst);
                        7
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 7);
        }
        assert_eq!(BUILDS.load(core::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(CACHE.len(), 1);
    }

    #[test]
    fn memo_cache_first_insert_wins() {
        static CACHE: MemoCache<String, i32> = MemoCache::new();

        assert_eq!(*CACHE.insert("a".to_string(), 1), 1);
        assert_eq!(*CACHE.insert("a".to_string(), 2), 1);
        assert_eq!(CACHE.get("a"), Some(&1));
        assert_eq!(CACHE.len(), 1);
    }
}
