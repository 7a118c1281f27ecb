//! Declaration Descriptor Model
//!
//! In-memory representation of every named entity after name resolution:
//! modules, namespaces, classes, functions, properties, type parameters and
//! value parameters.
//!
//! - **Builder / freeze**: `ModuleBuilder` collects declarations during
//!   resolution; `freeze` produces an immutable, shareable `DescriptorTable`
//! - **Containment**: containers own children through `Arc`, children link
//!   back by `DescriptorId`, resolved in O(1) by the table
//! - **Substitution**: `Substitutable::substitute` specializes generic
//!   descriptors without touching the canonical tree
//! - **Visitors**: `DeclarationVisitor` adds operations over the closed set of
//!   descriptor kinds
pub mod annotations;
pub mod builder;
pub mod descriptors;
pub mod error;
mod format;
pub mod ids;
mod intern;
pub mod render;
pub mod substitute;
pub mod table;
pub mod types;
pub mod visitor;
pub use annotations::{Annotation, AnnotationArgument, ConstantValue};
pub use builder::{
    CollectConflicts, ConflictPolicy, DeclarationDetail, DeclarationRequest, FirstWins, LastWins,
    ModuleBuilder, NameConflict, ROOT_NAMESPACE_NAME,
};
pub use descriptors::{
    Capabilities, ClassDescriptor, ClassKind, Declaration, DeclarationDescriptor,
    DeclarationHeader, DescriptorKind, FunctionDescriptor, MemberScope, ModuleDescriptor,
    NamespaceDescriptor, PropertyDescriptor, TypeParameterDescriptor, ValueParameterDescriptor,
    Variance,
};
pub use error::ModelError;
pub use format::TypeFormatter;
pub use ids::{DescriptorId, DescriptorIdAllocator};
pub use intern::TypeInterner;
pub use render::{DescriptorRenderer, render_tree};
pub use substitute::{Substitutable, TypeSubstitution, TypeSubstitutor};
pub use table::{DescriptorTable, Parents};
pub use types::{IntrinsicKind, TypeData, TypeId};
pub use visitor::{
    DeclarationVisitor, DescriptorCollector, DescriptorKindVisitor, TypeParameterUsageVisitor,
    collect_descriptor_ids, free_type_parameters, walk_descriptors,
};

pub use dsc_common::interner::Atom;
