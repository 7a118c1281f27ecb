use super::*;
use crate::ids::DescriptorId;

#[test]
fn test_format_intrinsics_and_classes() {
    let interner = TypeInterner::new();
    let formatter = TypeFormatter::new(&interner);
    let map = interner.class_type(
        DescriptorId(1),
        interner.intern_string("Map"),
        &[TypeId::STRING, TypeId::INT],
    );
    assert_eq!(formatter.format(TypeId::INT), "Int");
    assert_eq!(formatter.format(map), "Map<String, Int>");
    assert_eq!(formatter.format(TypeId::ERROR), "<error>");
}

#[test]
fn test_format_functions_and_nullables() {
    let interner = TypeInterner::new();
    let formatter = TypeFormatter::new(&interner);
    let t = interner.type_parameter(DescriptorId(4), interner.intern_string("T"));
    let f = interner.function(&[t, TypeId::INT], TypeId::BOOLEAN);
    assert_eq!(formatter.format(f), "(T, Int) -> Boolean");
    assert_eq!(formatter.format(interner.nullable(t)), "T?");
    assert_eq!(
        formatter.format(interner.nullable(f)),
        "((T, Int) -> Boolean)?"
    );
    assert_eq!(formatter.format_list(&[t, TypeId::UNIT]), "T, Unit");
}

#[test]
fn test_format_unknown_type() {
    let interner = TypeInterner::new();
    assert_eq!(
        TypeFormatter::new(&interner).format(TypeId(999)),
        "<unknown type 999>"
    );
}
