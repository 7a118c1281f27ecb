//! Centralized limits and thresholds for the descriptor model.
//!
//! Every limit here has a per-compilation override in
//! [`ModelOptions`](crate::options::ModelOptions); these constants are the
//! defaults.

// =============================================================================
// Containment
// =============================================================================

/// Maximum nesting depth of the containment tree (module at depth 0).
///
/// The builder refuses to nest declarations deeper than this and `freeze`
/// treats a longer parent chain as a structural violation. Real programs stay
/// far below it; hitting it means the resolver fed a runaway scope chain.
pub const MAX_CONTAINMENT_DEPTH: usize = 256;

// =============================================================================
// Substitution
// =============================================================================

/// Maximum nesting depth while rebuilding a type during substitution.
///
/// Interned types are finite trees, so this only trips on pathological
/// inputs. Exceeding it yields the error type instead of overflowing the
/// stack.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 64;

/// Maximum number of type arguments accepted for one class type.
pub const MAX_TYPE_ARGUMENTS: usize = 64;
