use super::*;
use crate::builder::{DeclarationDetail, DeclarationRequest, FirstWins, ModuleBuilder};
use crate::descriptors::{ClassKind, Variance};
use crate::ids::DescriptorIdAllocator;
use crate::substitute::{Substitutable, TypeSubstitution, TypeSubstitutor};
use crate::types::TypeId;

#[test]
fn test_render_tree_of_generic_class() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let mut builder = ModuleBuilder::new("app", &interner, &ids);
    let boxed = builder
        .declare_class(None, "Box", ClassKind::Class)
        .expect("Box");
    let t = builder
        .declare_type_parameter(boxed, "T", Variance::Out)
        .expect("T");
    let t_type = builder.type_parameter_type(t).expect("T type");
    builder
        .declare_property(Some(boxed), "value", t_type, false)
        .expect("value");
    let map = builder
        .declare_function(Some(boxed), "map", TypeId::UNIT)
        .expect("map");
    let r = builder
        .declare_type_parameter(map, "R", Variance::Invariant)
        .expect("R");
    let r_type = builder.type_parameter_type(r).expect("R type");
    builder
        .declare_value_parameter(map, "f", interner.function(&[t_type], r_type))
        .expect("f");
    let box_r = builder.class_type(boxed, &[r_type]).expect("Box<R>");
    builder.set_return_type(map, box_r).expect("return");
    let table = builder.freeze(&mut FirstWins).expect("freeze");

    let root = DeclarationDescriptor::Module(table.module().clone());
    let expected = "\
module app
  namespace <root>
    class Box<out T>
      out T
      val value: T
      fun <R> map(f: (T) -> R): Box<R>
        R
        f: (T) -> R
";
    assert_eq!(render_tree(&interner, &root, false), expected);
}

#[test]
fn test_render_specialized_class() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let mut builder = ModuleBuilder::new("app", &interner, &ids);
    let boxed = builder
        .declare_class(None, "Box", ClassKind::Class)
        .expect("Box");
    let t = builder
        .declare_type_parameter(boxed, "T", Variance::Invariant)
        .expect("T");
    let t_type = builder.type_parameter_type(t).expect("T type");
    builder
        .declare_property(Some(boxed), "value", t_type, true)
        .expect("value");
    let table = builder.freeze(&mut FirstWins).expect("freeze");
    let class = table.get(boxed).expect("Box").clone();

    let mut map = TypeSubstitution::new();
    map.insert(t, TypeId::INT);
    let specialized = class.substitute(&TypeSubstitutor::new(&interner, &map));
    let mut renderer = DescriptorRenderer::new(&interner);
    assert_eq!(renderer.render(&class), "class Box<T>");
    assert_eq!(renderer.render(&specialized), "class Box<Int>");
    assert_eq!(
        render_tree(&interner, &specialized, false),
        "class Box<Int>\n  T\n  var value: Int\n"
    );
}

#[test]
fn test_render_annotations_parameters_and_ids() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let mut builder = ModuleBuilder::new("app", &interner, &ids);
    let request = DeclarationRequest::new(
        interner.intern_string("log"),
        None,
        DeclarationDetail::Function {
            return_type: TypeId::UNIT,
        },
    )
    .with_annotation(
        Annotation::marker(interner.intern_string("Deprecated"))
            .with_argument(None, ConstantValue::String(interner.intern_string("use print")))
            .with_argument(
                Some(interner.intern_string("level")),
                ConstantValue::Int(2),
            ),
    );
    let log = builder.declare(request).expect("log");
    let param = DeclarationRequest::new(
        interner.intern_string("parts"),
        Some(log),
        DeclarationDetail::ValueParameter {
            ty: interner.nullable(TypeId::STRING),
            has_default: true,
            vararg: true,
        },
    );
    builder.declare(param).expect("parts");
    let table = builder.freeze(&mut FirstWins).expect("freeze");
    let log = table.get(log).expect("log");

    let mut renderer = DescriptorRenderer::new(&interner);
    assert_eq!(
        renderer.render(log),
        "@Deprecated(\"use print\", level = 2) fun log(vararg parts: String? = ...): Unit"
    );
    let mut with_ids = DescriptorRenderer::new(&interner).with_ids(true);
    assert_eq!(
        with_ids.render(&DeclarationDescriptor::Module(table.module().clone())),
        format!("module app {}", table.module().header.id)
    );
}

#[test]
fn test_render_bounds_and_supertypes() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let mut builder = ModuleBuilder::new("app", &interner, &ids);
    let comparable = builder
        .declare_class(None, "Comparable", ClassKind::Interface)
        .expect("Comparable");
    let sorted = builder
        .declare_class(None, "SortedSet", ClassKind::Class)
        .expect("SortedSet");
    let e = builder
        .declare_type_parameter(sorted, "E", Variance::In)
        .expect("E");
    let e_type = builder.type_parameter_type(e).expect("E type");
    let bound = builder.class_type(comparable, &[e_type]).expect("bound");
    builder.add_upper_bound(e, bound).expect("bound");
    builder.add_upper_bound(e, TypeId::ANY).expect("bound");
    let super_type = builder.class_type(comparable, &[e_type]).expect("super");
    builder.set_supertypes(sorted, vec![super_type]).expect("supertypes");
    let table = builder.freeze(&mut FirstWins).expect("freeze");

    let mut renderer = DescriptorRenderer::new(&interner);
    assert_eq!(
        renderer.render(table.get(sorted).expect("SortedSet")),
        "class SortedSet<in E : Comparable<E> & Any> : Comparable<E>"
    );
    assert_eq!(
        renderer.render(table.get(comparable).expect("Comparable")),
        "interface Comparable"
    );
}
