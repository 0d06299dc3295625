//! Hash containers with a fixed seed.
//!
//! Lookup tables in this crate are keyed by `TypeId` or by static strings,
//! neither of which is attacker controlled, so a fixed `foldhash` seed is used
//! and containers can be built in `const` context.

use foldhash::fast::FixedState;

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// Fixed hash state shared by every container in this crate.
pub(crate) type FixedHashState = FixedState;

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
pub(crate) type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

#[inline]
pub(crate) const fn new_map<K, V>() -> HashMap<K, V> {
    hashbrown::HashMap::with_hasher(FIXED_HASH_STATE)
}

#[inline]
pub(crate) const fn new_set<T>() -> HashSet<T> {
    hashbrown::HashSet::with_hasher(FIXED_HASH_STATE)
}
