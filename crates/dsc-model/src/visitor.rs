//! Declaration Visitor Pattern
//!
//! Downstream phases (checking, rendering, serialization) add operations over
//! descriptors by implementing [`DeclarationVisitor`] instead of matching on
//! [`DeclarationDescriptor`] everywhere.
//!
//! # Usage
//!
//! ```ignore
//! struct IsGeneric;
//!
//! impl DeclarationVisitor for IsGeneric {
//!     type Output = bool;
//!
//!     fn visit_declaration(&mut self, _: &DeclarationHeader, _: DescriptorKind, _: ()) -> bool {
//!         false
//!     }
//!
//!     fn visit_class(&mut self, class: &ClassDescriptor, _: ()) -> bool {
//!         class.is_generic()
//!     }
//! }
//!
//! let generic = descriptor.accept(&mut IsGeneric, ());
//! ```
//!
//! Each concrete descriptor calls exactly one `visit_*` method. Methods a
//! visitor does not override fall back to `visit_declaration`, so adding a
//! variant never breaks visitors that rely on the fallback.

use crate::descriptors::{
    ClassDescriptor, Declaration, DeclarationDescriptor, DeclarationHeader, DescriptorKind,
    FunctionDescriptor, ModuleDescriptor, NamespaceDescriptor, PropertyDescriptor,
    TypeParameterDescriptor, ValueParameterDescriptor,
};
use crate::ids::DescriptorId;
use crate::intern::TypeInterner;
use crate::types::TypeId;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

// =============================================================================
// Declaration Visitor Trait
// =============================================================================

/// Double-dispatch target for descriptors.
///
/// `D` is auxiliary data threaded through `accept` without interpretation.
pub trait DeclarationVisitor<D = ()>: Sized {
    /// The output type produced by visiting.
    type Output;

    /// Fallback for every variant the visitor does not handle explicitly.
    fn visit_declaration(
        &mut self,
        header: &DeclarationHeader,
        kind: DescriptorKind,
        data: D,
    ) -> Self::Output;

    fn visit_module(&mut self, module: &ModuleDescriptor, data: D) -> Self::Output {
        self.visit_declaration(&module.header, DescriptorKind::Module, data)
    }

    fn visit_namespace(&mut self, namespace: &NamespaceDescriptor, data: D) -> Self::Output {
        self.visit_declaration(&namespace.header, DescriptorKind::Namespace, data)
    }

    fn visit_class(&mut self, class: &ClassDescriptor, data: D) -> Self::Output {
        self.visit_declaration(&class.header, DescriptorKind::Class, data)
    }

    fn visit_function(&mut self, function: &FunctionDescriptor, data: D) -> Self::Output {
        self.visit_declaration(&function.header, DescriptorKind::Function, data)
    }

    fn visit_property(&mut self, property: &PropertyDescriptor, data: D) -> Self::Output {
        self.visit_declaration(&property.header, DescriptorKind::Property, data)
    }

    fn visit_type_parameter(
        &mut self,
        param: &TypeParameterDescriptor,
        data: D,
    ) -> Self::Output {
        self.visit_declaration(&param.header, DescriptorKind::TypeParameter, data)
    }

    fn visit_value_parameter(
        &mut self,
        param: &ValueParameterDescriptor,
        data: D,
    ) -> Self::Output {
        self.visit_declaration(&param.header, DescriptorKind::ValueParameter, data)
    }

    /// Visit any descriptor by dispatching to the matching method.
    fn visit(&mut self, descriptor: &DeclarationDescriptor, data: D) -> Self::Output {
        descriptor.accept(self, data)
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Pre-order walk over `root` and everything it contains.
///
/// `f` receives each descriptor with its depth relative to `root`.
pub fn walk_descriptors(root: &DeclarationDescriptor, mut f: impl FnMut(&DeclarationDescriptor, usize)) {
    let mut stack = vec![(root.clone(), 0usize)];
    while let Some((descriptor, depth)) = stack.pop() {
        f(&descriptor, depth);
        let mut children: SmallVec<[DeclarationDescriptor; 8]> = SmallVec::new();
        descriptor.for_each_child(|child| children.push(child.clone()));
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
}

/// Ids of `root` and all descendants, in pre-order.
pub fn collect_descriptor_ids(root: &DeclarationDescriptor) -> Vec<DescriptorId> {
    let mut collector = DescriptorCollector::default();
    walk_descriptors(root, |descriptor, _| descriptor.accept(&mut collector, ()));
    collector.ids
}

// =============================================================================
// Common Visitor Implementations
// =============================================================================

/// Reports which concrete method a descriptor dispatched to.
pub struct DescriptorKindVisitor;

impl DeclarationVisitor for DescriptorKindVisitor {
    type Output = DescriptorKind;

    fn visit_declaration(
        &mut self,
        _header: &DeclarationHeader,
        kind: DescriptorKind,
        _data: (),
    ) -> Self::Output {
        kind
    }
}

/// Records the id of every descriptor it visits.
#[derive(Default)]
pub struct DescriptorCollector {
    pub ids: Vec<DescriptorId>,
}

impl DeclarationVisitor for DescriptorCollector {
    type Output = ();

    fn visit_declaration(&mut self, header: &DeclarationHeader, _: DescriptorKind, _: ()) {
        self.ids.push(header.id);
    }
}

/// Collects the type parameters a descriptor's own signature mentions.
///
/// Only the descriptor's types count (property type, parameter and return
/// types, supertypes, bounds); nested members are not entered. Pair with
/// [`walk_descriptors`] for a whole subtree, or use [`free_type_parameters`].
pub struct TypeParameterUsageVisitor<'a> {
    interner: &'a TypeInterner,
    seen: FxHashSet<DescriptorId>,
    /// Mentioned type parameters in first-mention order.
    pub used: Vec<DescriptorId>,
}

impl<'a> TypeParameterUsageVisitor<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self {
            interner,
            seen: FxHashSet::default(),
            used: Vec::new(),
        }
    }

    fn note(&mut self, type_id: TypeId) {
        self.interner
            .collect_type_parameters(type_id, &mut self.seen, &mut self.used);
    }
}

impl DeclarationVisitor for TypeParameterUsageVisitor<'_> {
    type Output = ();

    fn visit_declaration(&mut self, _: &DeclarationHeader, _: DescriptorKind, _: ()) {}

    fn visit_class(&mut self, class: &ClassDescriptor, _: ()) {
        for &ty in class.type_arguments.iter().chain(&class.supertypes) {
            self.note(ty);
        }
    }

    fn visit_function(&mut self, function: &FunctionDescriptor, _: ()) {
        for param in &function.value_parameters {
            self.note(param.ty);
        }
        self.note(function.return_type);
    }

    fn visit_property(&mut self, property: &PropertyDescriptor, _: ()) {
        self.note(property.ty);
    }

    fn visit_type_parameter(&mut self, param: &TypeParameterDescriptor, _: ()) {
        for &bound in &param.upper_bounds {
            self.note(bound);
        }
    }

    fn visit_value_parameter(&mut self, param: &ValueParameterDescriptor, _: ()) {
        self.note(param.ty);
    }
}

/// Type parameters mentioned inside `root` but declared outside it.
///
/// These are the parameters a substitution of `root` can meaningfully map;
/// e.g. for a method of `Box<T>` this is `[T]`, for `Box` itself it is empty.
pub fn free_type_parameters(
    interner: &TypeInterner,
    root: &DeclarationDescriptor,
) -> Vec<DescriptorId> {
    let mut usage = TypeParameterUsageVisitor::new(interner);
    let mut declared = FxHashSet::default();
    walk_descriptors(root, |descriptor, _| {
        if descriptor.kind() == DescriptorKind::TypeParameter {
            declared.insert(descriptor.id());
        }
        descriptor.accept(&mut usage, ());
    });
    usage
        .used
        .into_iter()
        .filter(|id| !declared.contains(id))
        .collect()
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
