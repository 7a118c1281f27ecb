//! Type interning for structural deduplication.
//!
//! Converts `TypeData` keys into `TypeId` handles:
//! - O(1) type equality (compare `TypeId` values)
//! - each unique structure stored once
//! - safe to share across analysis passes; interning takes `&self`

use crate::ids::DescriptorId;
use crate::types::{
    ClassTypeRef, FunctionTypeShape, IntrinsicKind, TypeData, TypeId, TypeParamRef,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dsc_common::interner::{Atom, ShardedInterner};
use dsc_common::options::ModelOptions;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Type interning table, also owning the name interner of the compilation.
pub struct TypeInterner {
    /// `TypeId` -> `TypeData`; index is the raw id.
    types: RwLock<Vec<TypeData>>,
    /// `TypeData` -> `TypeId` for deduplication.
    index: DashMap<TypeData, TypeId>,
    /// Interner for declaration and type names.
    pub string_interner: ShardedInterner,
    max_type_arguments: usize,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics.
    pub fn new() -> Self {
        Self::with_options(&ModelOptions::default())
    }

    pub fn with_options(options: &ModelOptions) -> Self {
        let mut types = Vec::with_capacity(64);
        let index = DashMap::new();
        types.push(TypeData::Error);
        index.insert(TypeData::Error, TypeId::ERROR);
        for kind in IntrinsicKind::ALL {
            let key = TypeData::Intrinsic(kind);
            types.push(key.clone());
            index.insert(key, kind.type_id());
        }

        let string_interner = ShardedInterner::new();
        if options.intern_common_names {
            string_interner.intern_common();
        }

        TypeInterner {
            types: RwLock::new(types),
            index,
            string_interner,
            max_type_arguments: options.max_type_arguments,
        }
    }

    /// Intern a name into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    /// Resolve an Atom back to its string value.
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    /// Resolve an Atom without allocating a new String.
    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    /// Intern a type key and return its `TypeId`.
    /// If the key already exists, returns the existing `TypeId`.
    pub fn intern(&self, key: TypeData) -> TypeId {
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        // The entry guard serializes racing interners of the same key.
        match self.index.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    /// Look up the `TypeData` for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0 as usize)
            .cloned()
    }

    /// Number of interned types, intrinsics and the error type included.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        kind.type_id()
    }

    pub fn type_parameter(&self, id: DescriptorId, name: Atom) -> TypeId {
        self.intern(TypeData::TypeParameter(TypeParamRef { id, name }))
    }

    /// Class type `name<arguments>`. Oversized argument lists yield `ERROR`.
    pub fn class_type(&self, class: DescriptorId, name: Atom, arguments: &[TypeId]) -> TypeId {
        if arguments.len() > self.max_type_arguments {
            warn!(
                class = %class,
                count = arguments.len(),
                limit = self.max_type_arguments,
                "class type exceeds the type argument limit"
            );
            return TypeId::ERROR;
        }
        self.intern(TypeData::Class(ClassTypeRef {
            class,
            name,
            arguments: SmallVec::from_slice(arguments),
        }))
    }

    pub fn function(&self, parameters: &[TypeId], return_type: TypeId) -> TypeId {
        self.intern(TypeData::Function(FunctionTypeShape {
            parameters: SmallVec::from_slice(parameters),
            return_type,
        }))
    }

    /// `inner?`. Nullability is idempotent; `ERROR?` stays `ERROR`.
    pub fn nullable(&self, inner: TypeId) -> TypeId {
        if inner.is_error() {
            return TypeId::ERROR;
        }
        if let Some(TypeData::Nullable(_)) = self.lookup(inner) {
            return inner;
        }
        self.intern(TypeData::Nullable(inner))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Type parameters mentioned anywhere in `type_id`, in first-mention order.
    pub fn type_parameters_of(&self, type_id: TypeId) -> Vec<DescriptorId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        self.collect_type_parameters(type_id, &mut seen, &mut out);
        out
    }

    pub(crate) fn collect_type_parameters(
        &self,
        type_id: TypeId,
        seen: &mut FxHashSet<DescriptorId>,
        out: &mut Vec<DescriptorId>,
    ) {
        let Some(data) = self.lookup(type_id) else {
            return;
        };
        if let TypeData::TypeParameter(param) = &data {
            if seen.insert(param.id) {
                out.push(param.id);
            }
            return;
        }
        data.for_each_child(|child| self.collect_type_parameters(child, seen, out));
    }

    pub fn contains_type_parameters(&self, type_id: TypeId) -> bool {
        !self.type_parameters_of(type_id).is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
