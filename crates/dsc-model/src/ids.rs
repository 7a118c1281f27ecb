//! Descriptor identifiers.
//!
//! A `DescriptorId` names one declaration for the whole compilation. Parents
//! are referenced by id, never by owning pointer, so the ownership direction
//! of the tree (container owns children) stays explicit.
//!
//! ## Allocation
//!
//! | Phase | Who allocates | Notes |
//! |-------|---------------|-------|
//! | Resolution | `ModuleBuilder` via a shared `DescriptorIdAllocator` | one allocator per compilation |
//! | Substitution | nobody | specialized copies keep the original's id |

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for allocator instances; only used to tell allocators apart
/// in traces.
static NEXT_ALLOCATOR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a declaration, unique within one compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(pub u32);

impl DescriptorId {
    /// Sentinel value for invalid `DescriptorId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DescriptorId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out `DescriptorId`s for one compilation.
///
/// Shared by every `ModuleBuilder` of the compilation so ids never collide
/// across modules. Thread-safe; allocation is a single atomic increment.
pub struct DescriptorIdAllocator {
    instance_id: u64,
    next_id: AtomicU32,
}

impl Default for DescriptorIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorIdAllocator {
    pub fn new() -> Self {
        let instance_id = NEXT_ALLOCATOR_ID.fetch_add(1, Ordering::Relaxed);
        trace!(instance_id, "DescriptorIdAllocator::new");
        Self {
            instance_id,
            next_id: AtomicU32::new(DescriptorId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `DescriptorId`.
    pub fn allocate(&self) -> DescriptorId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        trace!(
            instance_id = self.instance_id,
            allocated = id,
            "DescriptorIdAllocator::allocate"
        );
        DescriptorId(id)
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next_id.load(Ordering::Relaxed) - DescriptorId::FIRST_VALID
    }
}
