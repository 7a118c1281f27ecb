use super::*;
use crate::annotations::ConstantValue;
use crate::builder::{FirstWins, ModuleBuilder};
use crate::ids::DescriptorIdAllocator;
use crate::table::DescriptorTable;

fn freeze_sample(interner: &TypeInterner, ids: &DescriptorIdAllocator) -> DescriptorTable {
    let mut builder = ModuleBuilder::new("app", interner, ids);
    let class = builder
        .declare_class(None, "Box", ClassKind::Class)
        .expect("class");
    let t = builder
        .declare_type_parameter(class, "T", Variance::Out)
        .expect("type parameter");
    let t_type = builder.type_parameter_type(t).expect("T type");
    builder
        .declare_property(Some(class), "value", t_type, false)
        .expect("property");
    let get = builder
        .declare_function(Some(class), "get", t_type)
        .expect("function");
    builder
        .declare_value_parameter(get, "index", TypeId::INT)
        .expect("value parameter");
    let deprecated = Annotation::marker(interner.intern_string("Deprecated")).with_argument(
        Some(interner.intern_string("message")),
        ConstantValue::String(interner.intern_string("use Cell")),
    );
    builder.annotate(class, deprecated).expect("annotate");
    builder.freeze(&mut FirstWins).expect("freeze")
}

#[test]
fn test_capabilities_per_kind() {
    use DescriptorKind::*;
    assert_eq!(Module.capabilities(), Capabilities::CONTAINER);
    assert_eq!(Namespace.capabilities(), Capabilities::CONTAINER);
    assert_eq!(
        Class.capabilities(),
        Capabilities::CONTAINER | Capabilities::GENERIC_HOLDER
    );
    assert_eq!(Function.capabilities(), Capabilities::all());
    assert_eq!(Property.capabilities(), Capabilities::TYPED_MEMBER);
    assert_eq!(ValueParameter.capabilities(), Capabilities::TYPED_MEMBER);
    assert!(TypeParameter.capabilities().is_empty());
}

#[test]
fn test_admissible_children() {
    use DescriptorKind::*;
    for child in DescriptorKind::ALL {
        assert!(!Module.can_contain(child), "module admitted {child:?}");
        assert!(!Property.can_contain(child));
        assert!(!TypeParameter.can_contain(child));
        assert!(!ValueParameter.can_contain(child));
    }
    assert!(Namespace.can_contain(Namespace));
    assert!(Namespace.can_contain(Class));
    assert!(!Namespace.can_contain(TypeParameter));
    assert!(Class.can_contain(TypeParameter));
    assert!(!Class.can_contain(ValueParameter));
    assert!(!Class.can_contain(Namespace));
    assert!(Function.can_contain(ValueParameter));
    assert!(!Function.can_contain(Property));
}

#[test]
fn test_declaration_accessors() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let table = freeze_sample(&interner, &ids);
    let root = table.root_namespace();
    let boxed = root
        .lookup(interner.intern_string("Box"))
        .and_then(DeclarationDescriptor::as_class)
        .expect("Box is a class");

    assert_eq!(boxed.kind(), DescriptorKind::Class);
    assert_eq!(boxed.name(), interner.intern_string("Box"));
    assert_eq!(boxed.containing_declaration(), Some(root.id()));
    assert_eq!(boxed.annotations().len(), 1);
    assert_eq!(
        boxed.annotations()[0].argument(interner.intern_string("message")),
        Some(&ConstantValue::String(interner.intern_string("use Cell")))
    );
    assert!(boxed.is_generic());
    assert_eq!(boxed.type_parameters[0].variance, Variance::Out);
    assert_eq!(
        boxed.type_arguments.as_slice(),
        &[boxed.type_parameters[0].default_type(&interner)]
    );
    assert_eq!(table.module().containing_declaration(), None);
}

#[test]
fn test_member_scope_lookup() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let table = freeze_sample(&interner, &ids);
    let boxed = table
        .root_namespace()
        .lookup(interner.intern_string("Box"))
        .and_then(DeclarationDescriptor::as_class)
        .expect("Box")
        .clone();

    let value = interner.intern_string("value");
    assert_eq!(
        boxed.lookup(value).map(|d| d.kind()),
        Some(DescriptorKind::Property)
    );
    assert!(boxed.lookup_kind(value, DescriptorKind::Function).is_none());
    assert!(boxed.lookup(interner.intern_string("missing")).is_none());
    // Type parameters are not members.
    assert!(boxed.lookup(interner.intern_string("T")).is_none());
    assert_eq!(boxed.members.len(), 2);
    let names: Vec<_> = boxed.members.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec![value, interner.intern_string("get")]);
}

#[test]
fn test_for_each_child_order() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let table = freeze_sample(&interner, &ids);
    let boxed = table
        .root_namespace()
        .lookup(interner.intern_string("Box"))
        .expect("Box")
        .clone();

    let mut kinds = Vec::new();
    boxed.for_each_child(|child| kinds.push(child.kind()));
    assert_eq!(
        kinds,
        vec![
            DescriptorKind::TypeParameter,
            DescriptorKind::Property,
            DescriptorKind::Function,
        ]
    );

    let module = DeclarationDescriptor::Module(table.module().clone());
    let mut children = Vec::new();
    module.for_each_child(|child| children.push(child.id()));
    assert_eq!(children, vec![table.root_namespace().id()]);
}

#[test]
fn test_downcasts_and_ptr_eq() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let table = freeze_sample(&interner, &ids);
    let boxed = table
        .root_namespace()
        .lookup(interner.intern_string("Box"))
        .expect("Box");

    assert!(boxed.as_class().is_some());
    assert!(boxed.as_function().is_none());
    assert!(boxed.as_module().is_none());
    let same = table.get(boxed.id()).expect("indexed");
    assert!(boxed.ptr_eq(same));
    let copy = DeclarationDescriptor::Class(Arc::new((**boxed.as_class().expect("class")).clone()));
    assert!(!boxed.ptr_eq(&copy));
    assert_eq!(boxed, &copy);
}

#[test]
fn test_function_type() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let table = freeze_sample(&interner, &ids);
    let get = table
        .of_kind(DescriptorKind::Function)
        .next()
        .and_then(DeclarationDescriptor::as_function)
        .expect("get")
        .clone();
    assert_eq!(get.value_parameters[0].index, 0);
    assert_eq!(
        get.function_type(&interner),
        interner.function(&[TypeId::INT], get.return_type)
    );
}
