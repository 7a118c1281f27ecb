//! Type representation referenced by descriptors.
//!
//! Types are interned: `TypeData` is the structural key and `TypeId` the
//! handle. Two structurally equal types always share one `TypeId`, which is
//! what makes substituted descriptors comparable with `==`.

use crate::ids::DescriptorId;
use dsc_common::interner::Atom;
use smallvec::SmallVec;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Unresolvable or malformed type.
    pub const ERROR: Self = Self(0);
    pub const ANY: Self = Self(1);
    pub const NOTHING: Self = Self(2);
    pub const UNIT: Self = Self(3);
    pub const BOOLEAN: Self = Self(4);
    pub const CHAR: Self = Self(5);
    pub const INT: Self = Self(6);
    pub const LONG: Self = Self(7);
    pub const DOUBLE: Self = Self(8);
    pub const STRING: Self = Self(9);

    /// First id handed out to a non-intrinsic type.
    pub const FIRST_USER: u32 = 10;

    pub const fn is_intrinsic(self) -> bool {
        self.0 > Self::ERROR.0 && self.0 < Self::FIRST_USER
    }

    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

/// Built-in types with fixed ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Nothing,
    Unit,
    Boolean,
    Char,
    Int,
    Long,
    Double,
    String,
}

impl IntrinsicKind {
    /// All intrinsics in `TypeId` order.
    pub const ALL: [IntrinsicKind; 9] = [
        IntrinsicKind::Any,
        IntrinsicKind::Nothing,
        IntrinsicKind::Unit,
        IntrinsicKind::Boolean,
        IntrinsicKind::Char,
        IntrinsicKind::Int,
        IntrinsicKind::Long,
        IntrinsicKind::Double,
        IntrinsicKind::String,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Nothing => TypeId::NOTHING,
            IntrinsicKind::Unit => TypeId::UNIT,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Char => TypeId::CHAR,
            IntrinsicKind::Int => TypeId::INT,
            IntrinsicKind::Long => TypeId::LONG,
            IntrinsicKind::Double => TypeId::DOUBLE,
            IntrinsicKind::String => TypeId::STRING,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "Any",
            IntrinsicKind::Nothing => "Nothing",
            IntrinsicKind::Unit => "Unit",
            IntrinsicKind::Boolean => "Boolean",
            IntrinsicKind::Char => "Char",
            IntrinsicKind::Int => "Int",
            IntrinsicKind::Long => "Long",
            IntrinsicKind::Double => "Double",
            IntrinsicKind::String => "String",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A mention of a type parameter inside a type.
///
/// The name rides along so types can be rendered without the descriptor table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamRef {
    pub id: DescriptorId,
    pub name: Atom,
}

/// A class applied to type arguments, e.g. `Box<Int>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassTypeRef {
    pub class: DescriptorId,
    pub name: Atom,
    pub arguments: SmallVec<[TypeId; 2]>,
}

/// A function type, e.g. `(Int, T) -> R`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionTypeShape {
    pub parameters: SmallVec<[TypeId; 4]>,
    pub return_type: TypeId,
}

/// Structural key of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    TypeParameter(TypeParamRef),
    Class(ClassTypeRef),
    Function(FunctionTypeShape),
    Nullable(TypeId),
    Error,
}

impl TypeData {
    /// Invoke `f` on every directly nested type.
    pub fn for_each_child(&self, mut f: impl FnMut(TypeId)) {
        match self {
            TypeData::Class(class) => class.arguments.iter().copied().for_each(f),
            TypeData::Function(shape) => {
                shape.parameters.iter().copied().for_each(&mut f);
                f(shape.return_type);
            }
            TypeData::Nullable(inner) => f(*inner),
            TypeData::Intrinsic(_) | TypeData::TypeParameter(_) | TypeData::Error => {}
        }
    }
}
