//! Human-readable rendering of types, used by the descriptor renderer and
//! diagnostics of downstream phases.

use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId};
use std::fmt::Write;

/// Renders `TypeId`s as source-like text: `Box<Int>`, `(T) -> R`, `String?`.
pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self { interner }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, type_id);
        out
    }

    /// Comma-separated list, as used inside `<...>` and `(...)`.
    pub fn format_list(&self, types: &[TypeId]) -> String {
        let mut out = String::new();
        self.write_list(&mut out, types);
        out
    }

    fn write_list(&self, out: &mut String, types: &[TypeId]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, *ty);
        }
    }

    fn write_type(&self, out: &mut String, type_id: TypeId) {
        match self.interner.lookup(type_id) {
            Some(TypeData::Intrinsic(kind)) => out.push_str(kind.name()),
            Some(TypeData::TypeParameter(param)) => {
                out.push_str(&self.interner.resolve_atom_ref(param.name));
            }
            Some(TypeData::Class(class)) => {
                out.push_str(&self.interner.resolve_atom_ref(class.name));
                if !class.arguments.is_empty() {
                    out.push('<');
                    self.write_list(out, &class.arguments);
                    out.push('>');
                }
            }
            Some(TypeData::Function(shape)) => {
                out.push('(');
                self.write_list(out, &shape.parameters);
                out.push_str(") -> ");
                self.write_type(out, shape.return_type);
            }
            Some(TypeData::Nullable(inner)) => {
                let needs_parens = matches!(
                    self.interner.lookup(inner),
                    Some(TypeData::Function(_))
                );
                if needs_parens {
                    out.push('(');
                    self.write_type(out, inner);
                    out.push(')');
                } else {
                    self.write_type(out, inner);
                }
                out.push('?');
            }
            Some(TypeData::Error) => out.push_str("<error>"),
            None => {
                let _ = write!(out, "<unknown type {}>", type_id.0);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
