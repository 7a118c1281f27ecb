//! Source-like rendering of descriptors, for diagnostics and tree dumps.
//!
//! ```text
//! module app
//!   namespace <root>
//!     class Box<T>
//!       T
//!       val value: T
//!       fun <R> map(f: (T) -> R): Box<R>
//! ```

use crate::annotations::{Annotation, ConstantValue};
use crate::descriptors::{
    ClassDescriptor, Declaration, DeclarationDescriptor, DeclarationHeader, DescriptorKind,
    FunctionDescriptor, ModuleDescriptor, NamespaceDescriptor, PropertyDescriptor,
    TypeParameterDescriptor, ValueParameterDescriptor,
};
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::visitor::{DeclarationVisitor, walk_descriptors};
use dsc_common::interner::Atom;
use std::fmt::Write;
use std::sync::Arc;

/// Renders one descriptor as a single signature line.
pub struct DescriptorRenderer<'a> {
    interner: &'a TypeInterner,
    types: TypeFormatter<'a>,
    /// Append ` #id` to every line.
    pub show_ids: bool,
}

impl<'a> DescriptorRenderer<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self {
            interner,
            types: TypeFormatter::new(interner),
            show_ids: false,
        }
    }

    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    pub fn render(&mut self, descriptor: &DeclarationDescriptor) -> String {
        descriptor.accept(self, ())
    }

    fn name(&self, atom: Atom) -> Arc<str> {
        self.interner.resolve_atom_ref(atom)
    }

    fn start(&self, header: &DeclarationHeader) -> String {
        let mut out = String::new();
        for annotation in &header.annotations {
            self.write_annotation(&mut out, annotation);
            out.push(' ');
        }
        out
    }

    fn finish(&self, mut out: String, header: &DeclarationHeader) -> String {
        if self.show_ids {
            let _ = write!(out, " {}", header.id);
        }
        out
    }

    fn write_annotation(&self, out: &mut String, annotation: &Annotation) {
        out.push('@');
        out.push_str(&self.name(annotation.name));
        if annotation.arguments.is_empty() {
            return;
        }
        out.push('(');
        for (i, arg) in annotation.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(name) = arg.name {
                let _ = write!(out, "{} = ", self.name(name));
            }
            match &arg.value {
                ConstantValue::Int(value) => {
                    let _ = write!(out, "{value}");
                }
                ConstantValue::Bool(value) => {
                    let _ = write!(out, "{value}");
                }
                ConstantValue::String(value) => {
                    let _ = write!(out, "{:?}", &*self.name(*value));
                }
            }
        }
        out.push(')');
    }

    fn write_type_parameter(&self, out: &mut String, param: &TypeParameterDescriptor) {
        if param.reified {
            out.push_str("reified ");
        }
        let variance = param.variance.label();
        if !variance.is_empty() {
            out.push_str(variance);
            out.push(' ');
        }
        out.push_str(&self.name(param.header.name));
        for (i, bound) in param.upper_bounds.iter().enumerate() {
            out.push_str(if i == 0 { " : " } else { " & " });
            out.push_str(&self.types.format(*bound));
        }
    }

    fn write_type_parameters(&self, out: &mut String, params: &[Arc<TypeParameterDescriptor>]) {
        if params.is_empty() {
            return;
        }
        out.push('<');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type_parameter(out, param);
        }
        out.push('>');
    }

    fn write_value_parameter(&self, out: &mut String, param: &ValueParameterDescriptor) {
        if param.vararg {
            out.push_str("vararg ");
        }
        let _ = write!(
            out,
            "{}: {}",
            self.name(param.header.name),
            self.types.format(param.ty)
        );
        if param.has_default {
            out.push_str(" = ...");
        }
    }

    /// Whether `class` is viewed at its own type parameters.
    fn is_canonical(&self, class: &ClassDescriptor) -> bool {
        class.type_arguments.len() == class.type_parameters.len()
            && class
                .type_parameters
                .iter()
                .zip(&class.type_arguments)
                .all(|(param, &arg)| param.default_type(self.interner) == arg)
    }
}

impl DeclarationVisitor for DescriptorRenderer<'_> {
    type Output = String;

    fn visit_declaration(&mut self, header: &DeclarationHeader, kind: DescriptorKind, _: ()) -> String {
        let mut out = self.start(header);
        let _ = write!(out, "{} {}", kind.name(), self.name(header.name));
        self.finish(out, header)
    }

    fn visit_module(&mut self, module: &ModuleDescriptor, _: ()) -> String {
        let mut out = self.start(&module.header);
        let _ = write!(out, "module {}", self.name(module.header.name));
        self.finish(out, &module.header)
    }

    fn visit_namespace(&mut self, namespace: &NamespaceDescriptor, _: ()) -> String {
        let mut out = self.start(&namespace.header);
        let _ = write!(out, "namespace {}", self.name(namespace.header.name));
        self.finish(out, &namespace.header)
    }

    fn visit_class(&mut self, class: &ClassDescriptor, _: ()) -> String {
        let mut out = self.start(&class.header);
        let _ = write!(
            out,
            "{} {}",
            class.class_kind.keyword(),
            self.name(class.header.name)
        );
        if self.is_canonical(class) {
            self.write_type_parameters(&mut out, &class.type_parameters);
        } else {
            let _ = write!(out, "<{}>", self.types.format_list(&class.type_arguments));
        }
        if !class.supertypes.is_empty() {
            let _ = write!(out, " : {}", self.types.format_list(&class.supertypes));
        }
        self.finish(out, &class.header)
    }

    fn visit_function(&mut self, function: &FunctionDescriptor, _: ()) -> String {
        let mut out = self.start(&function.header);
        out.push_str("fun ");
        if !function.type_parameters.is_empty() {
            self.write_type_parameters(&mut out, &function.type_parameters);
            out.push(' ');
        }
        out.push_str(&self.name(function.header.name));
        out.push('(');
        for (i, param) in function.value_parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_value_parameter(&mut out, param);
        }
        let _ = write!(out, "): {}", self.types.format(function.return_type));
        self.finish(out, &function.header)
    }

    fn visit_property(&mut self, property: &PropertyDescriptor, _: ()) -> String {
        let mut out = self.start(&property.header);
        let _ = write!(
            out,
            "{} {}: {}",
            if property.mutable { "var" } else { "val" },
            self.name(property.header.name),
            self.types.format(property.ty)
        );
        self.finish(out, &property.header)
    }

    fn visit_type_parameter(&mut self, param: &TypeParameterDescriptor, _: ()) -> String {
        let mut out = self.start(&param.header);
        self.write_type_parameter(&mut out, param);
        self.finish(out, &param.header)
    }

    fn visit_value_parameter(&mut self, param: &ValueParameterDescriptor, _: ()) -> String {
        let mut out = self.start(&param.header);
        self.write_value_parameter(&mut out, param);
        self.finish(out, &param.header)
    }
}

/// Indented dump of `root` and everything it contains, one line per
/// descriptor, two spaces per nesting level.
pub fn render_tree(interner: &TypeInterner, root: &DeclarationDescriptor, show_ids: bool) -> String {
    let mut renderer = DescriptorRenderer::new(interner).with_ids(show_ids);
    let mut out = String::new();
    walk_descriptors(root, |descriptor, depth| {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&renderer.render(descriptor));
        out.push('\n');
    });
    out
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
