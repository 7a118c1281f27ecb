//! Frozen descriptor table.
//!
//! The result of [`ModuleBuilder::freeze`](crate::builder::ModuleBuilder::freeze):
//! the canonical descriptor tree of one module plus an id index used to
//! resolve the non-owning `container` links in O(1). The table is immutable
//! and `Send + Sync`; share it behind an `Arc` for parallel analysis.

use crate::descriptors::{
    Declaration, DeclarationDescriptor, DescriptorKind, ModuleDescriptor, NamespaceDescriptor,
};
use crate::error::ModelError;
use crate::ids::DescriptorId;
use crate::visitor::collect_descriptor_ids;
use dsc_common::interner::Atom;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

pub struct DescriptorTable {
    module: Arc<ModuleDescriptor>,
    index: FxHashMap<DescriptorId, DeclarationDescriptor>,
    /// Pre-order ids, module first.
    order: Vec<DescriptorId>,
}

impl DescriptorTable {
    pub(crate) fn new(
        module: Arc<ModuleDescriptor>,
        index: FxHashMap<DescriptorId, DeclarationDescriptor>,
    ) -> Self {
        let order = collect_descriptor_ids(&DeclarationDescriptor::Module(module.clone()));
        Self {
            module,
            index,
            order,
        }
    }

    pub fn module(&self) -> &Arc<ModuleDescriptor> {
        &self.module
    }

    pub fn root_namespace(&self) -> &Arc<NamespaceDescriptor> {
        self.module.root_namespace()
    }

    pub fn get(&self, id: DescriptorId) -> Option<&DeclarationDescriptor> {
        self.index.get(&id)
    }

    pub fn contains(&self, id: DescriptorId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of descriptors, module and root namespace included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptors in pre-order, module first.
    pub fn iter(&self) -> impl Iterator<Item = &DeclarationDescriptor> {
        self.order.iter().filter_map(|id| self.index.get(id))
    }

    pub fn ids(&self) -> &[DescriptorId] {
        &self.order
    }

    pub fn of_kind(&self, kind: DescriptorKind) -> impl Iterator<Item = &DeclarationDescriptor> {
        self.iter().filter(move |descriptor| descriptor.kind() == kind)
    }

    /// The declaration that directly contains `declaration`.
    ///
    /// `None` for the module. Also works for substituted copies, which keep
    /// the container of their original.
    pub fn containing_declaration<D>(&self, declaration: &D) -> Option<&DeclarationDescriptor>
    where
        D: Declaration + ?Sized,
    {
        declaration
            .containing_declaration()
            .and_then(|container| self.index.get(&container))
    }

    /// Containers of `id` from the innermost outwards, ending at the module.
    pub fn parents(&self, id: DescriptorId) -> Parents<'_> {
        Parents {
            table: self,
            next: self.get(id).and_then(|d| d.containing_declaration()),
            remaining: self.order.len(),
        }
    }

    /// Distance from the module; the module itself is at depth 0.
    pub fn depth(&self, id: DescriptorId) -> Option<usize> {
        self.contains(id).then(|| self.parents(id).count())
    }

    /// Follow `path` from the root namespace, one member name per segment.
    ///
    /// Namespaces are preferred at every intermediate step; the last segment
    /// returns the first binding.
    pub fn resolve_path(&self, path: &[Atom]) -> Option<&DeclarationDescriptor> {
        let (last, prefix) = path.split_last()?;
        let mut scope: &DeclarationDescriptor = self.get(self.root_namespace().header.id)?;
        for &segment in prefix {
            scope = match scope {
                DeclarationDescriptor::Namespace(ns) => ns
                    .lookup_kind(segment, DescriptorKind::Namespace)
                    .or_else(|| ns.lookup(segment))?,
                DeclarationDescriptor::Class(class) => class.lookup(segment)?,
                _ => return None,
            };
        }
        match scope {
            DeclarationDescriptor::Namespace(ns) => ns.lookup(*last),
            DeclarationDescriptor::Class(class) => class.lookup(*last),
            _ => None,
        }
    }

    /// Check that every container link resolves, every child is admissible
    /// in its container and every parent chain reaches the module without
    /// revisiting a node.
    pub fn verify(&self) -> Result<(), ModelError> {
        let root = self.root_namespace().header.id;
        for descriptor in self.iter() {
            let id = descriptor.id();
            if let Some(container) = self.containing_declaration(descriptor) {
                let admissible = if id == root {
                    container.kind() == DescriptorKind::Module
                } else {
                    container.kind().can_contain(descriptor.kind())
                };
                if !admissible {
                    return Err(ModelError::InvalidContainer {
                        container: container.id(),
                        container_kind: container.kind(),
                        child_kind: descriptor.kind(),
                    });
                }
            }

            let mut seen = FxHashSet::default();
            seen.insert(id);
            let mut current = descriptor.containing_declaration();
            while let Some(parent) = current {
                if !seen.insert(parent) {
                    return Err(ModelError::ContainmentCycle { at: id });
                }
                let Some(parent_descriptor) = self.get(parent) else {
                    return Err(ModelError::UnknownContainer { container: parent });
                };
                current = parent_descriptor.containing_declaration();
            }
        }
        Ok(())
    }
}

/// Iterator over the containers of a descriptor, innermost first.
pub struct Parents<'a> {
    table: &'a DescriptorTable,
    next: Option<DescriptorId>,
    /// Bounds the walk even if a link were corrupt.
    remaining: usize,
}

impl<'a> Iterator for Parents<'a> {
    type Item = &'a DeclarationDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let parent = self.table.get(self.next?)?;
        self.next = parent.containing_declaration();
        Some(parent)
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
