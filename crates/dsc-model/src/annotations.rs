//! Annotations attached to declarations.
//!
//! Annotations are opaque metadata to this model: stored in declaration
//! order, copied unchanged by substitution.

use dsc_common::interner::Atom;
use smallvec::SmallVec;

/// Constant value of an annotation argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Int(i64),
    Bool(bool),
    String(Atom),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationArgument {
    /// `None` for positional arguments.
    pub name: Option<Atom>,
    pub value: ConstantValue,
}

/// One annotation use, e.g. `@Deprecated(message = "use Cell")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub name: Atom,
    pub arguments: SmallVec<[AnnotationArgument; 1]>,
}

impl Annotation {
    /// Annotation without arguments.
    pub fn marker(name: Atom) -> Self {
        Self {
            name,
            arguments: SmallVec::new(),
        }
    }

    pub fn with_argument(mut self, name: Option<Atom>, value: ConstantValue) -> Self {
        self.arguments.push(AnnotationArgument { name, value });
        self
    }

    /// Value of the named argument, if present.
    pub fn argument(&self, name: Atom) -> Option<&ConstantValue> {
        self.arguments
            .iter()
            .find(|arg| arg.name == Some(name))
            .map(|arg| &arg.value)
    }
}
