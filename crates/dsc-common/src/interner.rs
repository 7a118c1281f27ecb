//! String interning for declaration names.
//!
//! Names are interned once and passed around as `u32` handles (`Atom`), so
//! comparing two declaration names is an integer comparison and descriptors
//! stay `Copy`-friendly.
//!
//! The interner is sharded: resolution may intern names from one thread while
//! analysis passes intern names of freshly substituted types from others.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and compare in O(1).
/// To get the actual string, use [`ShardedInterner::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for the empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Names every compilation touches: the special root name, intrinsic type
/// names, and a few conventional identifiers.
const COMMON_STRINGS: &[&str] = &[
    "<root>", "Any", "Nothing", "Unit", "Boolean", "Char", "Int", "Long", "Double", "String",
    "T", "K", "V", "R", "E", "value", "size", "get", "set", "invoke", "equals", "hashCode",
    "toString", "Deprecated", "Suppress",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Sharded string interner for concurrent use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
/// The shard index lives in the low bits of each atom.
pub struct ShardedInterner {
    shards: [RwLock<ShardState>; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create a new interner with the empty string pre-interned as `Atom::NONE`.
    pub fn new() -> Self {
        let shards: [RwLock<ShardState>; SHARD_COUNT] =
            std::array::from_fn(|_| RwLock::new(ShardState::default()));
        {
            let mut state = shards[0].write().unwrap_or_else(PoisonError::into_inner);
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }
        ShardedInterner { shards }
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        {
            let state = self.shards[shard_idx]
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(&atom) = state.map.get(s) {
                return atom;
            }
        }

        let mut state = self.shards[shard_idx]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string value.
    /// Unknown atoms resolve to the empty string.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    /// Try to resolve an Atom, returning None if it was never handed out.
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (shard_idx, local_index) = Self::split_atom(atom);
        let state = self
            .shards
            .get(shard_idx)?
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        state.strings.get(local_index).cloned()
    }

    /// Get the number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .strings
                    .len()
            })
            .sum()
    }

    /// Check if the interner only holds the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern names used by nearly every compilation.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }

    #[inline]
    fn split_atom(atom: Atom) -> (usize, usize) {
        let raw = atom.0;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
