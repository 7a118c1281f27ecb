//! Structural-invariant violations.
//!
//! Every `ModelError` means the resolver asked for a tree this model cannot
//! represent. They are internal-consistency failures: callers propagate them
//! and stop analysis. User-facing problems (unresolved names, redeclarations)
//! are reported by the resolver, never through this type.

use crate::descriptors::DescriptorKind;
use crate::ids::DescriptorId;
use dsc_common::interner::Atom;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// A declaration names a container that was never declared.
    UnknownContainer { container: DescriptorId },
    /// The container kind cannot hold the requested child kind.
    InvalidContainer {
        container: DescriptorId,
        container_kind: DescriptorKind,
        child_kind: DescriptorKind,
    },
    /// An operation addressed a descriptor that does not exist.
    UnknownDescriptor { id: DescriptorId },
    /// An operation needs a specific kind of descriptor.
    WrongKind {
        id: DescriptorId,
        expected: DescriptorKind,
        found: DescriptorKind,
    },
    /// Following `container` links from `at` revisits a node.
    ContainmentCycle { at: DescriptorId },
    /// The containment chain is longer than the configured limit.
    ContainmentTooDeep {
        id: DescriptorId,
        depth: usize,
        limit: usize,
    },
    /// A module was frozen without its root namespace.
    MissingRootNamespace { module: DescriptorId },
    /// A conflict policy picked a declaration that was not a candidate.
    InvalidConflictResolution {
        container: DescriptorId,
        name: Atom,
        chosen: DescriptorId,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownContainer { container } => {
                write!(f, "unknown containing declaration {container}")
            }
            ModelError::InvalidContainer {
                container,
                container_kind,
                child_kind,
            } => write!(
                f,
                "{} {container} cannot contain a {}",
                container_kind.name(),
                child_kind.name()
            ),
            ModelError::UnknownDescriptor { id } => write!(f, "unknown descriptor {id}"),
            ModelError::WrongKind {
                id,
                expected,
                found,
            } => write!(
                f,
                "descriptor {id} is a {}, expected a {}",
                found.name(),
                expected.name()
            ),
            ModelError::ContainmentCycle { at } => {
                write!(f, "containment cycle through descriptor {at}")
            }
            ModelError::ContainmentTooDeep { id, depth, limit } => write!(
                f,
                "descriptor {id} is nested {depth} levels deep (limit {limit})"
            ),
            ModelError::MissingRootNamespace { module } => {
                write!(f, "module {module} has no root namespace")
            }
            ModelError::InvalidConflictResolution {
                container,
                name,
                chosen,
            } => write!(
                f,
                "conflict policy chose {chosen} for name atom {} in {container}, which is not a candidate",
                name.0
            ),
        }
    }
}

impl std::error::Error for ModelError {}
