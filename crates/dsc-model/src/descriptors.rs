//! Declaration descriptors.
//!
//! Every resolved named entity is one of seven concrete descriptors. They
//! share a `DeclarationHeader` (identity, name, containing declaration,
//! annotations) and are otherwise plain immutable data:
//!
//! | Kind | Children | Capabilities |
//! |------|----------|--------------|
//! | Module | root namespace | container |
//! | Namespace | namespaces, classes, functions, properties | container |
//! | Class | type parameters, classes, functions, properties | container, generic |
//! | Function | type parameters, value parameters | container, typed, generic |
//! | Property | - | typed |
//! | TypeParameter | - | - |
//! | ValueParameter | - | typed |
//!
//! Containers own their children through `Arc`; children point back with a
//! `DescriptorId` only. Resolve that handle with
//! [`DescriptorTable::containing_declaration`](crate::table::DescriptorTable::containing_declaration).

use crate::annotations::Annotation;
use crate::ids::DescriptorId;
use crate::intern::TypeInterner;
use crate::types::TypeId;
use crate::visitor::DeclarationVisitor;
use bitflags::bitflags;
use dsc_common::interner::Atom;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

bitflags! {
    /// What a descriptor kind can do, independent of its concrete variant.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Owns child declarations.
        const CONTAINER = 1 << 0;
        /// Has a declared type (property type, parameter type, return type).
        const TYPED_MEMBER = 1 << 1;
        /// Declares its own type parameters.
        const GENERIC_HOLDER = 1 << 2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Module,
    Namespace,
    Class,
    Function,
    Property,
    TypeParameter,
    ValueParameter,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 7] = [
        DescriptorKind::Module,
        DescriptorKind::Namespace,
        DescriptorKind::Class,
        DescriptorKind::Function,
        DescriptorKind::Property,
        DescriptorKind::TypeParameter,
        DescriptorKind::ValueParameter,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            DescriptorKind::Module => "module",
            DescriptorKind::Namespace => "namespace",
            DescriptorKind::Class => "class",
            DescriptorKind::Function => "function",
            DescriptorKind::Property => "property",
            DescriptorKind::TypeParameter => "type parameter",
            DescriptorKind::ValueParameter => "value parameter",
        }
    }

    pub const fn capabilities(self) -> Capabilities {
        match self {
            DescriptorKind::Module | DescriptorKind::Namespace => Capabilities::CONTAINER,
            DescriptorKind::Class => Capabilities::CONTAINER.union(Capabilities::GENERIC_HOLDER),
            DescriptorKind::Function => Capabilities::CONTAINER
                .union(Capabilities::TYPED_MEMBER)
                .union(Capabilities::GENERIC_HOLDER),
            DescriptorKind::Property | DescriptorKind::ValueParameter => {
                Capabilities::TYPED_MEMBER
            }
            DescriptorKind::TypeParameter => Capabilities::empty(),
        }
    }

    /// Whether a declaration of kind `child` may be nested directly in `self`.
    ///
    /// Modules only ever hold their root namespace, which the builder creates
    /// itself; nothing can be declared into a module directly.
    pub const fn can_contain(self, child: DescriptorKind) -> bool {
        match self {
            DescriptorKind::Module => false,
            DescriptorKind::Namespace => matches!(
                child,
                DescriptorKind::Namespace
                    | DescriptorKind::Class
                    | DescriptorKind::Function
                    | DescriptorKind::Property
            ),
            DescriptorKind::Class => matches!(
                child,
                DescriptorKind::Class
                    | DescriptorKind::Function
                    | DescriptorKind::Property
                    | DescriptorKind::TypeParameter
            ),
            DescriptorKind::Function => matches!(
                child,
                DescriptorKind::TypeParameter | DescriptorKind::ValueParameter
            ),
            DescriptorKind::Property
            | DescriptorKind::TypeParameter
            | DescriptorKind::ValueParameter => false,
        }
    }
}

/// Flavor of a class-like declaration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    EnumClass,
    AnnotationClass,
}

impl ClassKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Object => "object",
            ClassKind::EnumClass => "enum class",
            ClassKind::AnnotationClass => "annotation class",
        }
    }
}

/// Declaration-site variance of a type parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

impl Variance {
    pub const fn label(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

// =============================================================================
// Header and the Declaration contract
// =============================================================================

/// Data every declaration carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationHeader {
    pub id: DescriptorId,
    pub name: Atom,
    /// Non-owning link to the parent. `None` only for modules.
    pub container: Option<DescriptorId>,
    pub annotations: Vec<Annotation>,
}

/// Read API shared by every descriptor.
pub trait Declaration {
    fn header(&self) -> &DeclarationHeader;

    fn kind(&self) -> DescriptorKind;

    /// Double dispatch into `visitor`; `data` is passed through untouched.
    fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: DeclarationVisitor<D>;

    fn id(&self) -> DescriptorId {
        self.header().id
    }

    fn name(&self) -> Atom {
        self.header().name
    }

    fn containing_declaration(&self) -> Option<DescriptorId> {
        self.header().container
    }

    fn annotations(&self) -> &[Annotation] {
        &self.header().annotations
    }

    fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }
}

macro_rules! impl_declaration {
    ($ty:ty, $kind:ident, $visit:ident) => {
        impl Declaration for $ty {
            fn header(&self) -> &DeclarationHeader {
                &self.header
            }

            fn kind(&self) -> DescriptorKind {
                DescriptorKind::$kind
            }

            fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
            where
                V: DeclarationVisitor<D>,
            {
                visitor.$visit(self, data)
            }
        }
    };
}

// =============================================================================
// Member scope
// =============================================================================

/// Ordered children of a namespace or class with a by-name index.
///
/// After freeze every (name, kind) pair is bound at most once.
#[derive(Clone, Debug, Default)]
pub struct MemberScope {
    members: Vec<DeclarationDescriptor>,
    by_name: FxHashMap<Atom, SmallVec<[u32; 1]>>,
}

impl MemberScope {
    pub fn new(members: Vec<DeclarationDescriptor>) -> Self {
        let mut by_name: FxHashMap<Atom, SmallVec<[u32; 1]>> = FxHashMap::default();
        for (i, member) in members.iter().enumerate() {
            by_name.entry(member.name()).or_default().push(i as u32);
        }
        Self { members, by_name }
    }

    /// First binding of `name`, in declaration order.
    pub fn lookup(&self, name: Atom) -> Option<&DeclarationDescriptor> {
        self.lookup_all(name).next()
    }

    /// The binding of `name` with the given kind.
    pub fn lookup_kind(&self, name: Atom, kind: DescriptorKind) -> Option<&DeclarationDescriptor> {
        self.lookup_all(name).find(|member| member.kind() == kind)
    }

    /// Every binding of `name` (one per kind), in declaration order.
    pub fn lookup_all(&self, name: Atom) -> impl Iterator<Item = &DeclarationDescriptor> {
        self.by_name
            .get(&name)
            .into_iter()
            .flat_map(|slots| slots.iter())
            .map(|&slot| &self.members[slot as usize])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclarationDescriptor> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Rebuild the scope with every member passed through `f`.
    /// `f` must preserve names; the index is reused as is.
    pub(crate) fn map_members(
        &self,
        f: impl FnMut(&DeclarationDescriptor) -> DeclarationDescriptor,
    ) -> Self {
        Self {
            members: self.members.iter().map(f).collect(),
            by_name: self.by_name.clone(),
        }
    }
}

impl PartialEq for MemberScope {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for MemberScope {}

impl<'a> IntoIterator for &'a MemberScope {
    type Item = &'a DeclarationDescriptor;
    type IntoIter = std::slice::Iter<'a, DeclarationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Concrete descriptors
// =============================================================================

/// Root of one compiled unit. Owns exactly one root namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub header: DeclarationHeader,
    pub(crate) root_namespace: Arc<NamespaceDescriptor>,
}

impl ModuleDescriptor {
    pub fn root_namespace(&self) -> &Arc<NamespaceDescriptor> {
        &self.root_namespace
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    pub header: DeclarationHeader,
    pub members: MemberScope,
}

impl NamespaceDescriptor {
    pub fn lookup(&self, name: Atom) -> Option<&DeclarationDescriptor> {
        self.members.lookup(name)
    }

    pub fn lookup_kind(&self, name: Atom, kind: DescriptorKind) -> Option<&DeclarationDescriptor> {
        self.members.lookup_kind(name, kind)
    }

    pub fn lookup_all(&self, name: Atom) -> impl Iterator<Item = &DeclarationDescriptor> {
        self.members.lookup_all(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDescriptor {
    pub header: DeclarationHeader,
    pub class_kind: ClassKind,
    pub type_parameters: Vec<Arc<TypeParameterDescriptor>>,
    /// Arguments this class is viewed at. For a canonical class these are its
    /// own type parameters; a specialization carries the substituted types.
    pub type_arguments: SmallVec<[TypeId; 2]>,
    pub supertypes: Vec<TypeId>,
    pub members: MemberScope,
}

impl ClassDescriptor {
    pub fn lookup(&self, name: Atom) -> Option<&DeclarationDescriptor> {
        self.members.lookup(name)
    }

    pub fn lookup_kind(&self, name: Atom, kind: DescriptorKind) -> Option<&DeclarationDescriptor> {
        self.members.lookup_kind(name, kind)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// The class type at this descriptor's type arguments: `Box<T>` for the
    /// canonical class, `Box<Int>` for its specialization.
    pub fn default_type(&self, interner: &TypeInterner) -> TypeId {
        interner.class_type(self.header.id, self.header.name, &self.type_arguments)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub header: DeclarationHeader,
    pub type_parameters: Vec<Arc<TypeParameterDescriptor>>,
    pub value_parameters: Vec<Arc<ValueParameterDescriptor>>,
    pub return_type: TypeId,
}

impl FunctionDescriptor {
    /// `(P1, P2) -> R` built from the value parameters and return type.
    pub fn function_type(&self, interner: &TypeInterner) -> TypeId {
        let params: SmallVec<[TypeId; 4]> =
            self.value_parameters.iter().map(|param| param.ty).collect();
        interner.function(&params, self.return_type)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub header: DeclarationHeader,
    pub ty: TypeId,
    /// `var` when true, `val` otherwise.
    pub mutable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameterDescriptor {
    pub header: DeclarationHeader,
    /// Position within the owner's type parameter list.
    pub index: u32,
    pub variance: Variance,
    pub reified: bool,
    pub upper_bounds: SmallVec<[TypeId; 1]>,
}

impl TypeParameterDescriptor {
    /// The type that mentions this parameter.
    pub fn default_type(&self, interner: &TypeInterner) -> TypeId {
        interner.type_parameter(self.header.id, self.header.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParameterDescriptor {
    pub header: DeclarationHeader,
    pub index: u32,
    pub ty: TypeId,
    pub has_default: bool,
    pub vararg: bool,
}

impl_declaration!(ModuleDescriptor, Module, visit_module);
impl_declaration!(NamespaceDescriptor, Namespace, visit_namespace);
impl_declaration!(ClassDescriptor, Class, visit_class);
impl_declaration!(FunctionDescriptor, Function, visit_function);
impl_declaration!(PropertyDescriptor, Property, visit_property);
impl_declaration!(TypeParameterDescriptor, TypeParameter, visit_type_parameter);
impl_declaration!(ValueParameterDescriptor, ValueParameter, visit_value_parameter);

// =============================================================================
// DeclarationDescriptor - the tagged union
// =============================================================================

/// Any descriptor. Cloning is an `Arc` bump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationDescriptor {
    Module(Arc<ModuleDescriptor>),
    Namespace(Arc<NamespaceDescriptor>),
    Class(Arc<ClassDescriptor>),
    Function(Arc<FunctionDescriptor>),
    Property(Arc<PropertyDescriptor>),
    TypeParameter(Arc<TypeParameterDescriptor>),
    ValueParameter(Arc<ValueParameterDescriptor>),
}

macro_rules! delegate {
    ($self:ident, $d:ident => $e:expr) => {
        match $self {
            DeclarationDescriptor::Module($d) => $e,
            DeclarationDescriptor::Namespace($d) => $e,
            DeclarationDescriptor::Class($d) => $e,
            DeclarationDescriptor::Function($d) => $e,
            DeclarationDescriptor::Property($d) => $e,
            DeclarationDescriptor::TypeParameter($d) => $e,
            DeclarationDescriptor::ValueParameter($d) => $e,
        }
    };
}

impl Declaration for DeclarationDescriptor {
    fn header(&self) -> &DeclarationHeader {
        delegate!(self, d => &d.header)
    }

    fn kind(&self) -> DescriptorKind {
        delegate!(self, d => d.kind())
    }

    fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: DeclarationVisitor<D>,
    {
        delegate!(self, d => d.accept(visitor, data))
    }
}

impl DeclarationDescriptor {
    /// Invoke `f` on every direct child, in declaration order.
    ///
    /// Order: a module's root namespace; type parameters before value
    /// parameters or members.
    pub fn for_each_child(&self, mut f: impl FnMut(&DeclarationDescriptor)) {
        match self {
            DeclarationDescriptor::Module(module) => {
                f(&DeclarationDescriptor::Namespace(module.root_namespace.clone()));
            }
            DeclarationDescriptor::Namespace(namespace) => namespace.members.iter().for_each(f),
            DeclarationDescriptor::Class(class) => {
                for param in &class.type_parameters {
                    f(&DeclarationDescriptor::TypeParameter(param.clone()));
                }
                class.members.iter().for_each(f);
            }
            DeclarationDescriptor::Function(function) => {
                for param in &function.type_parameters {
                    f(&DeclarationDescriptor::TypeParameter(param.clone()));
                }
                for param in &function.value_parameters {
                    f(&DeclarationDescriptor::ValueParameter(param.clone()));
                }
            }
            DeclarationDescriptor::Property(_)
            | DeclarationDescriptor::TypeParameter(_)
            | DeclarationDescriptor::ValueParameter(_) => {}
        }
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &DeclarationDescriptor) -> bool {
        match (self, other) {
            (DeclarationDescriptor::Module(a), DeclarationDescriptor::Module(b)) => {
                Arc::ptr_eq(a, b)
            }
            (DeclarationDescriptor::Namespace(a), DeclarationDescriptor::Namespace(b)) => {
                Arc::ptr_eq(a, b)
            }
            (DeclarationDescriptor::Class(a), DeclarationDescriptor::Class(b)) => Arc::ptr_eq(a, b),
            (DeclarationDescriptor::Function(a), DeclarationDescriptor::Function(b)) => {
                Arc::ptr_eq(a, b)
            }
            (DeclarationDescriptor::Property(a), DeclarationDescriptor::Property(b)) => {
                Arc::ptr_eq(a, b)
            }
            (DeclarationDescriptor::TypeParameter(a), DeclarationDescriptor::TypeParameter(b)) => {
                Arc::ptr_eq(a, b)
            }
            (DeclarationDescriptor::ValueParameter(a), DeclarationDescriptor::ValueParameter(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }

    pub fn as_module(&self) -> Option<&Arc<ModuleDescriptor>> {
        match self {
            DeclarationDescriptor::Module(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Arc<NamespaceDescriptor>> {
        match self {
            DeclarationDescriptor::Namespace(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Arc<ClassDescriptor>> {
        match self {
            DeclarationDescriptor::Class(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<FunctionDescriptor>> {
        match self {
            DeclarationDescriptor::Function(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Arc<PropertyDescriptor>> {
        match self {
            DeclarationDescriptor::Property(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&Arc<TypeParameterDescriptor>> {
        match self {
            DeclarationDescriptor::TypeParameter(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_value_parameter(&self) -> Option<&Arc<ValueParameterDescriptor>> {
        match self {
            DeclarationDescriptor::ValueParameter(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/descriptors_tests.rs"]
mod tests;
