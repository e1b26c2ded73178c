use core::any::TypeId;
use core::hash::{BuildHasher, Hasher};

use hashbrown::HashMap;

// -----------------------------------------------------------------------------
// TypeIdHasher

/// Passes the `u64` written by [`TypeId`]'s `Hash` impl straight through.
///
/// `TypeId` is already a high quality hash, so hashing it again only costs.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct TypeIdHasher {
    hash: u64,
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, _: &[u8]) {
        unreachable!("`TypeId` hashes through `write_u64`");
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct TypeIdHashState;

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher::default()
    }
}

// -----------------------------------------------------------------------------
// TypeIdMap

/// Map keyed by [`TypeId`].
pub(crate) type TypeIdMap<V> = HashMap<TypeId, V, TypeIdHashState>;

#[inline]
pub(crate) fn new_type_map<V>() -> TypeIdMap<V> {
    HashMap::with_hasher(TypeIdHashState)
}

// -----------------------------------------------------------------------------
// Tests
