//! Type substitution.
//!
//! Maps type-parameter descriptors to concrete types and produces specialized
//! copies of descriptors that mention them.
//!
//! - `TypeSubstitution`: the map. Ephemeral; built per use site.
//! - `TypeSubstitutor`: applies a map to types, with a depth guard.
//! - `Substitutable`: per-descriptor specialization. Each implementation
//!   returns its own concrete type, so a substituted class is still a
//!   `ClassDescriptor` at the call site.
//!
//! Substitution never mutates its input and never writes results back into a
//! descriptor table. Unmapped type parameters are left alone and map entries
//! for unrelated parameters are ignored, so one map can be reused across many
//! descriptors.

use crate::descriptors::{
    ClassDescriptor, Declaration, DeclarationDescriptor, FunctionDescriptor, ModuleDescriptor,
    NamespaceDescriptor, PropertyDescriptor, TypeParameterDescriptor, ValueParameterDescriptor,
};
use crate::ids::DescriptorId;
use crate::intern::TypeInterner;
use crate::types::{ClassTypeRef, FunctionTypeShape, TypeData, TypeId};
use dsc_common::limits::MAX_SUBSTITUTION_DEPTH;
use dsc_common::options::ModelOptions;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace, warn};

// =============================================================================
// TypeSubstitution - the map
// =============================================================================

/// Mapping from type-parameter descriptor to its replacement type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSubstitution {
    map: FxHashMap<DescriptorId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `type_params` with `type_args` positionally. Surplus entries on
    /// either side are dropped.
    pub fn from_args(type_params: &[Arc<TypeParameterDescriptor>], type_args: &[TypeId]) -> Self {
        let map = type_params
            .iter()
            .zip(type_args)
            .map(|(param, &arg)| (param.header.id, arg))
            .collect();
        Self { map }
    }

    pub fn insert(&mut self, param: DescriptorId, replacement: TypeId) {
        self.map.insert(param, replacement);
    }

    pub fn get(&self, param: DescriptorId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, TypeId)> + '_ {
        self.map.iter().map(|(&k, &v)| (k, v))
    }

    /// The single map equivalent to applying `self` and then `next`.
    ///
    /// `next` is applied to every output of `self` with its own depth limit;
    /// keys only `next` maps are added unchanged.
    pub fn compose(&self, next: &TypeSubstitutor<'_>) -> TypeSubstitution {
        let mut map: FxHashMap<DescriptorId, TypeId> = self
            .map
            .iter()
            .map(|(&param, &ty)| (param, next.substitute_type(ty)))
            .collect();
        for (&param, &ty) in &next.substitution.map {
            map.entry(param).or_insert(ty);
        }
        TypeSubstitution { map }
    }
}

// =============================================================================
// TypeSubstitutor - applies a map
// =============================================================================

/// Applies a `TypeSubstitution` to types.
pub struct TypeSubstitutor<'a> {
    interner: &'a TypeInterner,
    substitution: &'a TypeSubstitution,
    max_depth: u32,
}

impl<'a> TypeSubstitutor<'a> {
    pub fn new(interner: &'a TypeInterner, substitution: &'a TypeSubstitution) -> Self {
        Self {
            interner,
            substitution,
            max_depth: MAX_SUBSTITUTION_DEPTH,
        }
    }

    pub fn with_options(
        interner: &'a TypeInterner,
        substitution: &'a TypeSubstitution,
        options: &ModelOptions,
    ) -> Self {
        Self {
            interner,
            substitution,
            max_depth: options.max_substitution_depth,
        }
    }

    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    pub fn substitution(&self) -> &'a TypeSubstitution {
        self.substitution
    }

    pub fn is_empty(&self) -> bool {
        self.substitution.is_empty()
    }

    /// Replace every mapped type parameter inside `type_id`.
    pub fn substitute_type(&self, type_id: TypeId) -> TypeId {
        if self.is_empty() {
            return type_id;
        }
        self.substitute_at(type_id, 0)
    }

    pub fn substitute_types(&self, types: &[TypeId]) -> SmallVec<[TypeId; 4]> {
        types.iter().map(|&ty| self.substitute_type(ty)).collect()
    }

    fn substitute_at(&self, type_id: TypeId, depth: u32) -> TypeId {
        if depth > self.max_depth {
            // Parameter-free subterms are left as they are at any depth.
            if !self.interner.contains_type_parameters(type_id) {
                return type_id;
            }
            warn!(
                type_id = type_id.0,
                limit = self.max_depth,
                "type substitution exceeded the depth limit"
            );
            return TypeId::ERROR;
        }
        let Some(data) = self.interner.lookup(type_id) else {
            return type_id;
        };
        match data {
            TypeData::Intrinsic(_) | TypeData::Error => type_id,
            TypeData::TypeParameter(param) => self.substitution.get(param.id).unwrap_or(type_id),
            TypeData::Class(class) => {
                let arguments: SmallVec<[TypeId; 2]> = class
                    .arguments
                    .iter()
                    .map(|&arg| self.substitute_at(arg, depth + 1))
                    .collect();
                if arguments == class.arguments {
                    return type_id;
                }
                self.interner.intern(TypeData::Class(ClassTypeRef {
                    arguments,
                    ..class
                }))
            }
            TypeData::Function(shape) => {
                let parameters: SmallVec<[TypeId; 4]> = shape
                    .parameters
                    .iter()
                    .map(|&param| self.substitute_at(param, depth + 1))
                    .collect();
                let return_type = self.substitute_at(shape.return_type, depth + 1);
                if parameters == shape.parameters && return_type == shape.return_type {
                    return type_id;
                }
                self.interner.intern(TypeData::Function(FunctionTypeShape {
                    parameters,
                    return_type,
                }))
            }
            TypeData::Nullable(inner) => {
                let replaced = self.substitute_at(inner, depth + 1);
                if replaced == inner {
                    type_id
                } else {
                    self.interner.nullable(replaced)
                }
            }
        }
    }
}

// =============================================================================
// Substitutable - per-descriptor specialization
// =============================================================================

/// Produce a specialized copy of a descriptor.
///
/// The result keeps the original's id, name, container, annotations and
/// member structure; only type-parameter occurrences change.
pub trait Substitutable: Sized {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self;
}

impl<T: Substitutable> Substitutable for Arc<T> {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Arc::new(T::substitute(self, substitutor))
    }
}

impl Substitutable for ModuleDescriptor {
    /// Modules declare no type parameters; the copy shares the root namespace.
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        if !substitutor.is_empty() {
            trace!(module = %self.header.id, "substitution into a module is a no-op");
        }
        Self {
            header: self.header.clone(),
            root_namespace: self.root_namespace.clone(),
        }
    }
}

impl Substitutable for NamespaceDescriptor {
    /// Namespaces hold no free type parameters; the copy shares its members.
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        if !substitutor.is_empty() {
            trace!(namespace = %self.header.id, "substitution into a namespace is a no-op");
        }
        Self {
            header: self.header.clone(),
            members: self.members.clone(),
        }
    }
}

impl Substitutable for ClassDescriptor {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Self {
            header: self.header.clone(),
            class_kind: self.class_kind,
            type_parameters: self
                .type_parameters
                .iter()
                .map(|param| param.substitute(substitutor))
                .collect(),
            type_arguments: self
                .type_arguments
                .iter()
                .map(|&arg| substitutor.substitute_type(arg))
                .collect(),
            supertypes: self
                .supertypes
                .iter()
                .map(|&ty| substitutor.substitute_type(ty))
                .collect(),
            members: self
                .members
                .map_members(|member| member.substitute(substitutor)),
        }
    }
}

impl Substitutable for FunctionDescriptor {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Self {
            header: self.header.clone(),
            type_parameters: self
                .type_parameters
                .iter()
                .map(|param| param.substitute(substitutor))
                .collect(),
            value_parameters: self
                .value_parameters
                .iter()
                .map(|param| param.substitute(substitutor))
                .collect(),
            return_type: substitutor.substitute_type(self.return_type),
        }
    }
}

impl Substitutable for PropertyDescriptor {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Self {
            header: self.header.clone(),
            ty: substitutor.substitute_type(self.ty),
            mutable: self.mutable,
        }
    }
}

impl Substitutable for TypeParameterDescriptor {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Self {
            header: self.header.clone(),
            index: self.index,
            variance: self.variance,
            reified: self.reified,
            upper_bounds: self
                .upper_bounds
                .iter()
                .map(|&bound| substitutor.substitute_type(bound))
                .collect(),
        }
    }
}

impl Substitutable for ValueParameterDescriptor {
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        Self {
            header: self.header.clone(),
            index: self.index,
            ty: substitutor.substitute_type(self.ty),
            has_default: self.has_default,
            vararg: self.vararg,
        }
    }
}

impl Substitutable for DeclarationDescriptor {
    /// Specialize whatever variant this is; the variant is preserved.
    fn substitute(&self, substitutor: &TypeSubstitutor<'_>) -> Self {
        debug!(
            id = %self.id(),
            kind = self.kind().name(),
            entries = substitutor.substitution().len(),
            "substitute"
        );
        match self {
            DeclarationDescriptor::Module(d) => DeclarationDescriptor::Module(d.substitute(substitutor)),
            DeclarationDescriptor::Namespace(d) => {
                DeclarationDescriptor::Namespace(d.substitute(substitutor))
            }
            DeclarationDescriptor::Class(d) => DeclarationDescriptor::Class(d.substitute(substitutor)),
            DeclarationDescriptor::Function(d) => {
                DeclarationDescriptor::Function(d.substitute(substitutor))
            }
            DeclarationDescriptor::Property(d) => {
                DeclarationDescriptor::Property(d.substitute(substitutor))
            }
            DeclarationDescriptor::TypeParameter(d) => {
                DeclarationDescriptor::TypeParameter(d.substitute(substitutor))
            }
            DeclarationDescriptor::ValueParameter(d) => {
                DeclarationDescriptor::ValueParameter(d.substitute(substitutor))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
