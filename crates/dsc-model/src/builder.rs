//! Two-phase construction of a module's descriptor tree.
//!
//! During name resolution a single `ModuleBuilder` owns the mutable state:
//! declarations are appended to their containers and can be looked up by
//! name while later declarations are still being resolved. `freeze` ends the
//! phase: conflicts are settled by a `ConflictPolicy` and the immutable tree
//! is assembled bottom-up, members before containers, into a
//! [`DescriptorTable`].
//!
//! Nothing is ever removed or overwritten while building. A second
//! declaration with the same (name, kind) in one container is recorded as a
//! [`NameConflict`]; lookup keeps answering with the first binding until the
//! policy decides at freeze time.

use crate::annotations::Annotation;
use crate::descriptors::{
    ClassDescriptor, ClassKind, Declaration, DeclarationDescriptor, DeclarationHeader, DescriptorKind,
    FunctionDescriptor, MemberScope, ModuleDescriptor, NamespaceDescriptor, PropertyDescriptor,
    TypeParameterDescriptor, ValueParameterDescriptor, Variance,
};
use crate::error::ModelError;
use crate::ids::{DescriptorId, DescriptorIdAllocator};
use crate::intern::TypeInterner;
use crate::table::DescriptorTable;
use crate::types::TypeId;
use dsc_common::interner::Atom;
use dsc_common::options::ModelOptions;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Name of every module's root namespace.
pub const ROOT_NAMESPACE_NAME: &str = "<root>";

// =============================================================================
// Requests
// =============================================================================

/// Kind-specific data of a declaration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationDetail {
    Namespace,
    Class {
        class_kind: ClassKind,
        supertypes: Vec<TypeId>,
    },
    Function {
        return_type: TypeId,
    },
    Property {
        ty: TypeId,
        mutable: bool,
    },
    TypeParameter {
        variance: Variance,
        reified: bool,
        upper_bounds: SmallVec<[TypeId; 1]>,
    },
    ValueParameter {
        ty: TypeId,
        has_default: bool,
        vararg: bool,
    },
}

impl DeclarationDetail {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            DeclarationDetail::Namespace => DescriptorKind::Namespace,
            DeclarationDetail::Class { .. } => DescriptorKind::Class,
            DeclarationDetail::Function { .. } => DescriptorKind::Function,
            DeclarationDetail::Property { .. } => DescriptorKind::Property,
            DeclarationDetail::TypeParameter { .. } => DescriptorKind::TypeParameter,
            DeclarationDetail::ValueParameter { .. } => DescriptorKind::ValueParameter,
        }
    }
}

/// One (name, kind, containing scope) triple from the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationRequest {
    pub name: Atom,
    /// `None` declares into the root namespace.
    pub container: Option<DescriptorId>,
    pub detail: DeclarationDetail,
    pub annotations: Vec<Annotation>,
}

impl DeclarationRequest {
    pub fn new(name: Atom, container: Option<DescriptorId>, detail: DeclarationDetail) -> Self {
        Self {
            name,
            container,
            detail,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn kind(&self) -> DescriptorKind {
        self.detail.kind()
    }
}

// =============================================================================
// Conflicts
// =============================================================================

/// Several declarations bound to the same (name, kind) in one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameConflict {
    pub container: DescriptorId,
    pub name: Atom,
    pub kind: DescriptorKind,
    /// Every competing declaration, in declaration order.
    pub candidates: SmallVec<[DescriptorId; 2]>,
}

impl NameConflict {
    pub fn first(&self) -> DescriptorId {
        self.candidates[0]
    }

    pub fn last(&self) -> DescriptorId {
        self.candidates[self.candidates.len() - 1]
    }
}

/// Decides which declaration survives a conflict at freeze time.
///
/// Returning an id that is not among `conflict.candidates` makes `freeze`
/// fail with [`ModelError::InvalidConflictResolution`].
pub trait ConflictPolicy {
    fn resolve(&mut self, conflict: &NameConflict) -> DescriptorId;
}

impl<F> ConflictPolicy for F
where
    F: FnMut(&NameConflict) -> DescriptorId,
{
    fn resolve(&mut self, conflict: &NameConflict) -> DescriptorId {
        self(conflict)
    }
}

/// Keep the earliest declaration.
#[derive(Copy, Clone, Debug, Default)]
pub struct FirstWins;

impl ConflictPolicy for FirstWins {
    fn resolve(&mut self, conflict: &NameConflict) -> DescriptorId {
        conflict.first()
    }
}

/// Keep the latest declaration.
#[derive(Copy, Clone, Debug, Default)]
pub struct LastWins;

impl ConflictPolicy for LastWins {
    fn resolve(&mut self, conflict: &NameConflict) -> DescriptorId {
        conflict.last()
    }
}

/// Keep the earliest declaration and remember every conflict seen, so the
/// resolver can report redeclarations after freezing.
#[derive(Clone, Debug, Default)]
pub struct CollectConflicts {
    pub collected: Vec<NameConflict>,
}

impl CollectConflicts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConflictPolicy for CollectConflicts {
    fn resolve(&mut self, conflict: &NameConflict) -> DescriptorId {
        self.collected.push(conflict.clone());
        conflict.first()
    }
}

// =============================================================================
// ModuleBuilder
// =============================================================================

struct PendingDeclaration {
    name: Atom,
    kind: DescriptorKind,
    container: Option<DescriptorId>,
    /// Module = 0, root namespace = 1.
    depth: usize,
    annotations: Vec<Annotation>,
    /// `None` only for the module itself.
    detail: Option<DeclarationDetail>,
    children: Vec<DescriptorId>,
    /// First binding per (name, kind).
    bindings: FxHashMap<(Atom, DescriptorKind), DescriptorId>,
}

fn fail(err: ModelError) -> ModelError {
    error!(error = %err, "descriptor model invariant violated");
    err
}

/// Single-writer builder for one module.
pub struct ModuleBuilder<'a> {
    interner: &'a TypeInterner,
    ids: &'a DescriptorIdAllocator,
    options: ModelOptions,
    module: DescriptorId,
    root_namespace: DescriptorId,
    nodes: IndexMap<DescriptorId, PendingDeclaration>,
    conflicts: IndexMap<(DescriptorId, Atom, DescriptorKind), NameConflict>,
}

impl<'a> ModuleBuilder<'a> {
    pub fn new(name: &str, interner: &'a TypeInterner, ids: &'a DescriptorIdAllocator) -> Self {
        Self::with_options(name, interner, ids, ModelOptions::default())
    }

    /// Start a module; its root namespace is created immediately.
    pub fn with_options(
        name: &str,
        interner: &'a TypeInterner,
        ids: &'a DescriptorIdAllocator,
        options: ModelOptions,
    ) -> Self {
        let module = ids.allocate();
        let root_namespace = ids.allocate();
        let mut nodes = IndexMap::new();
        nodes.insert(
            module,
            PendingDeclaration {
                name: interner.intern_string(name),
                kind: DescriptorKind::Module,
                container: None,
                depth: 0,
                annotations: Vec::new(),
                detail: None,
                children: vec![root_namespace],
                bindings: FxHashMap::default(),
            },
        );
        nodes.insert(
            root_namespace,
            PendingDeclaration {
                name: interner.intern_string(ROOT_NAMESPACE_NAME),
                kind: DescriptorKind::Namespace,
                container: Some(module),
                depth: 1,
                annotations: Vec::new(),
                detail: Some(DeclarationDetail::Namespace),
                children: Vec::new(),
                bindings: FxHashMap::default(),
            },
        );
        debug!(module = %module, name, "ModuleBuilder::new");
        Self {
            interner,
            ids,
            options,
            module,
            root_namespace,
            nodes,
            conflicts: IndexMap::new(),
        }
    }

    pub fn module_id(&self) -> DescriptorId {
        self.module
    }

    pub fn root_namespace(&self) -> DescriptorId {
        self.root_namespace
    }

    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Number of declarations so far, module and root namespace included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: DescriptorId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn kind_of(&self, id: DescriptorId) -> Option<DescriptorKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }

    pub fn name_of(&self, id: DescriptorId) -> Option<Atom> {
        self.nodes.get(&id).map(|node| node.name)
    }

    pub fn container_of(&self, id: DescriptorId) -> Option<DescriptorId> {
        self.nodes.get(&id).and_then(|node| node.container)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Append a declaration to its container.
    ///
    /// Declaring a namespace whose name is already bound to a namespace in the
    /// same container returns the existing one, which gains the request's
    /// annotations. Any other repeated (name, kind) pair gets a fresh id and
    /// is recorded as a conflict.
    pub fn declare(&mut self, request: DeclarationRequest) -> Result<DescriptorId, ModelError> {
        let kind = request.kind();
        let container = request.container.unwrap_or(self.root_namespace);
        let Some(parent) = self.nodes.get(&container) else {
            return Err(fail(ModelError::UnknownContainer { container }));
        };
        if !parent.kind.can_contain(kind) {
            return Err(fail(ModelError::InvalidContainer {
                container,
                container_kind: parent.kind,
                child_kind: kind,
            }));
        }
        let depth = parent.depth + 1;
        if depth > self.options.max_containment_depth {
            return Err(fail(ModelError::ContainmentTooDeep {
                id: container,
                depth,
                limit: self.options.max_containment_depth,
            }));
        }

        let key = (request.name, kind);
        let existing = parent.bindings.get(&key).copied();
        if kind == DescriptorKind::Namespace
            && let Some(existing) = existing
        {
            trace!(
                namespace = %existing,
                annotations = request.annotations.len(),
                "namespace reopened"
            );
            if let Some(node) = self.nodes.get_mut(&existing) {
                node.annotations.extend(request.annotations);
            }
            return Ok(existing);
        }

        let id = self.ids.allocate();
        let DeclarationRequest {
            name,
            detail,
            annotations,
            ..
        } = request;
        self.nodes.insert(
            id,
            PendingDeclaration {
                name,
                kind,
                container: Some(container),
                depth,
                annotations,
                detail: Some(detail),
                children: Vec::new(),
                bindings: FxHashMap::default(),
            },
        );

        let parent = &mut self.nodes[&container];
        parent.children.push(id);
        match existing {
            Some(first) => {
                warn!(
                    container = %container,
                    name = %self.interner.resolve_atom_ref(name),
                    kind = kind.name(),
                    first = %first,
                    duplicate = %id,
                    "duplicate declaration"
                );
                self.conflicts
                    .entry((container, name, kind))
                    .or_insert_with(|| NameConflict {
                        container,
                        name,
                        kind,
                        candidates: smallvec![first],
                    })
                    .candidates
                    .push(id);
            }
            None => {
                parent.bindings.insert(key, id);
            }
        }
        debug!(
            id = %id,
            container = %container,
            kind = kind.name(),
            name = %self.interner.resolve_atom_ref(name),
            "declare"
        );
        Ok(id)
    }

    /// Declare or reopen a namespace.
    pub fn declare_namespace(
        &mut self,
        container: Option<DescriptorId>,
        name: &str,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            container,
            DeclarationDetail::Namespace,
        ))
    }

    pub fn declare_class(
        &mut self,
        container: Option<DescriptorId>,
        name: &str,
        class_kind: ClassKind,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            container,
            DeclarationDetail::Class {
                class_kind,
                supertypes: Vec::new(),
            },
        ))
    }

    pub fn declare_function(
        &mut self,
        container: Option<DescriptorId>,
        name: &str,
        return_type: TypeId,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            container,
            DeclarationDetail::Function { return_type },
        ))
    }

    pub fn declare_property(
        &mut self,
        container: Option<DescriptorId>,
        name: &str,
        ty: TypeId,
        mutable: bool,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            container,
            DeclarationDetail::Property { ty, mutable },
        ))
    }

    /// Declare a type parameter of a class or function.
    pub fn declare_type_parameter(
        &mut self,
        owner: DescriptorId,
        name: &str,
        variance: Variance,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            Some(owner),
            DeclarationDetail::TypeParameter {
                variance,
                reified: false,
                upper_bounds: SmallVec::new(),
            },
        ))
    }

    pub fn declare_value_parameter(
        &mut self,
        function: DescriptorId,
        name: &str,
        ty: TypeId,
    ) -> Result<DescriptorId, ModelError> {
        let name = self.interner.intern_string(name);
        self.declare(DeclarationRequest::new(
            name,
            Some(function),
            DeclarationDetail::ValueParameter {
                ty,
                has_default: false,
                vararg: false,
            },
        ))
    }

    // =========================================================================
    // Completion of declared signatures
    // =========================================================================

    fn node_mut(
        &mut self,
        id: DescriptorId,
        expected: DescriptorKind,
    ) -> Result<&mut PendingDeclaration, ModelError> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Err(fail(ModelError::UnknownDescriptor { id }));
        };
        if node.kind != expected {
            return Err(fail(ModelError::WrongKind {
                id,
                expected,
                found: node.kind,
            }));
        }
        Ok(node)
    }

    pub fn add_upper_bound(&mut self, param: DescriptorId, bound: TypeId) -> Result<(), ModelError> {
        let node = self.node_mut(param, DescriptorKind::TypeParameter)?;
        if let Some(DeclarationDetail::TypeParameter { upper_bounds, .. }) = &mut node.detail {
            upper_bounds.push(bound);
        }
        Ok(())
    }

    pub fn set_supertypes(
        &mut self,
        class: DescriptorId,
        supertypes: Vec<TypeId>,
    ) -> Result<(), ModelError> {
        let node = self.node_mut(class, DescriptorKind::Class)?;
        if let Some(DeclarationDetail::Class {
            supertypes: current,
            ..
        }) = &mut node.detail
        {
            *current = supertypes;
        }
        Ok(())
    }

    pub fn set_return_type(
        &mut self,
        function: DescriptorId,
        ty: TypeId,
    ) -> Result<(), ModelError> {
        let node = self.node_mut(function, DescriptorKind::Function)?;
        if let Some(DeclarationDetail::Function { return_type }) = &mut node.detail {
            *return_type = ty;
        }
        Ok(())
    }

    /// Set the declared type of a property or value parameter.
    pub fn set_declared_type(&mut self, id: DescriptorId, ty: TypeId) -> Result<(), ModelError> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Err(fail(ModelError::UnknownDescriptor { id }));
        };
        match &mut node.detail {
            Some(
                DeclarationDetail::Property { ty: current, .. }
                | DeclarationDetail::ValueParameter { ty: current, .. },
            ) => {
                *current = ty;
                Ok(())
            }
            _ => Err(fail(ModelError::WrongKind {
                id,
                expected: DescriptorKind::Property,
                found: node.kind,
            })),
        }
    }

    /// Append an annotation to any declaration.
    pub fn annotate(&mut self, id: DescriptorId, annotation: Annotation) -> Result<(), ModelError> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Err(fail(ModelError::UnknownDescriptor { id }));
        };
        node.annotations.push(annotation);
        Ok(())
    }

    // =========================================================================
    // Types of declared entities
    // =========================================================================

    /// The type mentioning type parameter `param`.
    pub fn type_parameter_type(&self, param: DescriptorId) -> Result<TypeId, ModelError> {
        let node = self.node(param, DescriptorKind::TypeParameter)?;
        Ok(self.interner.type_parameter(param, node.name))
    }

    /// `class<arguments>`.
    pub fn class_type(
        &self,
        class: DescriptorId,
        arguments: &[TypeId],
    ) -> Result<TypeId, ModelError> {
        let node = self.node(class, DescriptorKind::Class)?;
        Ok(self.interner.class_type(class, node.name, arguments))
    }

    fn node(
        &self,
        id: DescriptorId,
        expected: DescriptorKind,
    ) -> Result<&PendingDeclaration, ModelError> {
        let Some(node) = self.nodes.get(&id) else {
            return Err(fail(ModelError::UnknownDescriptor { id }));
        };
        if node.kind != expected {
            return Err(fail(ModelError::WrongKind {
                id,
                expected,
                found: node.kind,
            }));
        }
        Ok(node)
    }

    // =========================================================================
    // Lookup during resolution
    // =========================================================================

    /// First declaration bound to `name` in `container`, any kind.
    /// `None` as container means the root namespace.
    pub fn lookup(&self, container: Option<DescriptorId>, name: Atom) -> Option<DescriptorId> {
        let container = container.unwrap_or(self.root_namespace);
        let parent = self.nodes.get(&container)?;
        parent
            .children
            .iter()
            .copied()
            .find(|child| parent.bindings.get(&(name, self.nodes[child].kind)) == Some(child))
    }

    /// First declaration bound to (`name`, `kind`) in `container`.
    pub fn lookup_kind(
        &self,
        container: Option<DescriptorId>,
        name: Atom,
        kind: DescriptorKind,
    ) -> Option<DescriptorId> {
        let container = container.unwrap_or(self.root_namespace);
        self.nodes.get(&container)?.bindings.get(&(name, kind)).copied()
    }

    /// Conflicts recorded so far, in order of first occurrence.
    pub fn conflicts(&self) -> impl Iterator<Item = &NameConflict> {
        self.conflicts.values()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    // =========================================================================
    // Freeze
    // =========================================================================

    /// End the building phase.
    ///
    /// Every conflict is settled by `policy`; losing declarations are dropped
    /// with their whole subtree. The surviving declarations are assembled
    /// into immutable descriptors, children before their containers.
    pub fn freeze<P>(self, policy: &mut P) -> Result<DescriptorTable, ModelError>
    where
        P: ConflictPolicy + ?Sized,
    {
        self.validate_chains()?;
        let dropped = self.resolve_conflicts(policy)?;

        let mut index = FxHashMap::default();
        let module = match self.build(self.module, &dropped, &mut index)? {
            DeclarationDescriptor::Module(module) => module,
            _ => {
                return Err(fail(ModelError::WrongKind {
                    id: self.module,
                    expected: DescriptorKind::Module,
                    found: self.nodes[&self.module].kind,
                }));
            }
        };
        debug!(
            module = %self.module,
            declarations = index.len(),
            conflicts = self.conflicts.len(),
            dropped = dropped.len(),
            "freeze"
        );
        Ok(DescriptorTable::new(module, index))
    }

    /// Every parent chain must reach the module within the depth limit.
    fn validate_chains(&self) -> Result<(), ModelError> {
        let limit = self.options.max_containment_depth;
        for (&id, node) in &self.nodes {
            let mut current = node.container;
            let mut steps = 0usize;
            while let Some(parent) = current {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(fail(ModelError::ContainmentCycle { at: id }));
                }
                if steps > limit {
                    return Err(fail(ModelError::ContainmentTooDeep {
                        id,
                        depth: steps,
                        limit,
                    }));
                }
                let Some(parent_node) = self.nodes.get(&parent) else {
                    return Err(fail(ModelError::UnknownContainer { container: parent }));
                };
                current = parent_node.container;
            }
            if id != self.module && steps == 0 {
                return Err(fail(ModelError::UnknownContainer {
                    container: DescriptorId::INVALID,
                }));
            }
        }
        Ok(())
    }

    fn resolve_conflicts<P>(&self, policy: &mut P) -> Result<FxHashSet<DescriptorId>, ModelError>
    where
        P: ConflictPolicy + ?Sized,
    {
        let mut dropped = FxHashSet::default();
        for conflict in self.conflicts.values() {
            let chosen = policy.resolve(conflict);
            if !conflict.candidates.contains(&chosen) {
                return Err(fail(ModelError::InvalidConflictResolution {
                    container: conflict.container,
                    name: conflict.name,
                    chosen,
                }));
            }
            debug!(
                container = %conflict.container,
                kind = conflict.kind.name(),
                candidates = conflict.candidates.len(),
                chosen = %chosen,
                "conflict resolved"
            );
            dropped.extend(
                conflict
                    .candidates
                    .iter()
                    .copied()
                    .filter(|&candidate| candidate != chosen),
            );
        }
        Ok(dropped)
    }

    /// Position of `id` among its surviving siblings of the same kind.
    fn sibling_index(
        &self,
        id: DescriptorId,
        node: &PendingDeclaration,
        dropped: &FxHashSet<DescriptorId>,
    ) -> u32 {
        let Some(parent) = node.container.and_then(|c| self.nodes.get(&c)) else {
            return 0;
        };
        parent
            .children
            .iter()
            .filter(|&&child| !dropped.contains(&child) && self.nodes[&child].kind == node.kind)
            .position(|&child| child == id)
            .unwrap_or(0) as u32
    }

    fn build_children(
        &self,
        node: &PendingDeclaration,
        dropped: &FxHashSet<DescriptorId>,
        index: &mut FxHashMap<DescriptorId, DeclarationDescriptor>,
    ) -> Result<Vec<DeclarationDescriptor>, ModelError> {
        node.children
            .iter()
            .filter(|&&child| !dropped.contains(&child))
            .map(|&child| self.build(child, dropped, index))
            .collect()
    }

    fn build(
        &self,
        id: DescriptorId,
        dropped: &FxHashSet<DescriptorId>,
        index: &mut FxHashMap<DescriptorId, DeclarationDescriptor>,
    ) -> Result<DeclarationDescriptor, ModelError> {
        let Some(node) = self.nodes.get(&id) else {
            return Err(fail(ModelError::UnknownDescriptor { id }));
        };
        let children = self.build_children(node, dropped, index)?;
        let header = DeclarationHeader {
            id,
            name: node.name,
            container: node.container,
            annotations: node.annotations.clone(),
        };

        let descriptor = match &node.detail {
            None => {
                let Some(DeclarationDescriptor::Namespace(root_namespace)) =
                    children.into_iter().next()
                else {
                    return Err(fail(ModelError::MissingRootNamespace { module: id }));
                };
                DeclarationDescriptor::Module(Arc::new(ModuleDescriptor {
                    header,
                    root_namespace,
                }))
            }
            Some(DeclarationDetail::Namespace) => {
                DeclarationDescriptor::Namespace(Arc::new(NamespaceDescriptor {
                    header,
                    members: MemberScope::new(children),
                }))
            }
            Some(DeclarationDetail::Class {
                class_kind,
                supertypes,
            }) => {
                let mut type_parameters = Vec::new();
                let mut members = Vec::new();
                for child in children {
                    match child {
                        DeclarationDescriptor::TypeParameter(param) => type_parameters.push(param),
                        other => members.push(other),
                    }
                }
                let type_arguments = type_parameters
                    .iter()
                    .map(|param| param.default_type(self.interner))
                    .collect();
                DeclarationDescriptor::Class(Arc::new(ClassDescriptor {
                    header,
                    class_kind: *class_kind,
                    type_parameters,
                    type_arguments,
                    supertypes: supertypes.clone(),
                    members: MemberScope::new(members),
                }))
            }
            Some(DeclarationDetail::Function { return_type }) => {
                let mut type_parameters = Vec::new();
                let mut value_parameters = Vec::new();
                for child in children {
                    match child {
                        DeclarationDescriptor::TypeParameter(param) => type_parameters.push(param),
                        DeclarationDescriptor::ValueParameter(param) => {
                            value_parameters.push(param)
                        }
                        other => {
                            return Err(fail(ModelError::InvalidContainer {
                                container: id,
                                container_kind: DescriptorKind::Function,
                                child_kind: other.kind(),
                            }));
                        }
                    }
                }
                DeclarationDescriptor::Function(Arc::new(FunctionDescriptor {
                    header,
                    type_parameters,
                    value_parameters,
                    return_type: *return_type,
                }))
            }
            Some(DeclarationDetail::Property { ty, mutable }) => {
                DeclarationDescriptor::Property(Arc::new(PropertyDescriptor {
                    header,
                    ty: *ty,
                    mutable: *mutable,
                }))
            }
            Some(DeclarationDetail::TypeParameter {
                variance,
                reified,
                upper_bounds,
            }) => DeclarationDescriptor::TypeParameter(Arc::new(TypeParameterDescriptor {
                header,
                index: self.sibling_index(id, node, dropped),
                variance: *variance,
                reified: *reified,
                upper_bounds: upper_bounds.clone(),
            })),
            Some(DeclarationDetail::ValueParameter {
                ty,
                has_default,
                vararg,
            }) => DeclarationDescriptor::ValueParameter(Arc::new(ValueParameterDescriptor {
                header,
                index: self.sibling_index(id, node, dropped),
                ty: *ty,
                has_default: *has_default,
                vararg: *vararg,
            })),
        };
        trace!(id = %id, kind = node.kind.name(), "built descriptor");
        index.insert(id, descriptor.clone());
        Ok(descriptor)
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
