use super::*;
use dsc_model::{
    ConstantValue, Declaration, DeclarationDescriptor, DescriptorIdAllocator, DescriptorTable,
    FirstWins, TypeData, TypeInterner,
};

const BOX_STREAM: &str = r#"{
  "module": "app",
  "declarations": [
    { "key": "box", "kind": "class", "name": "Box" },
    { "key": "box.T", "kind": "type_parameter", "name": "T", "container": "box", "variance": "out" },
    { "kind": "property", "name": "value", "container": "box", "type": { "param": "box.T" } },
    {
      "key": "box.map", "kind": "function", "name": "map", "container": "box",
      "returns": { "class": "box", "args": [{ "param": "box.map.R" }] }
    },
    { "key": "box.map.R", "kind": "type_parameter", "name": "R", "container": "box.map" },
    {
      "kind": "value_parameter", "name": "f", "container": "box.map",
      "type": { "function": { "params": [{ "param": "box.T" }], "ret": { "param": "box.map.R" } } }
    }
  ]
}"#;

fn load(interner: &TypeInterner, text: &str) -> Result<(DescriptorTable, StreamIndex)> {
    let ids = DescriptorIdAllocator::new();
    let stream = DeclarationStream::from_json(text)?;
    let mut builder = ModuleBuilder::new(&stream.module, interner, &ids);
    let index = load_stream(&mut builder, &stream)?;
    Ok((builder.freeze(&mut FirstWins)?, index))
}

#[test]
fn test_parse_defaults() {
    let stream = DeclarationStream::from_json(
        r#"{ "module": "m", "declarations": [{ "kind": "class", "name": "A" }] }"#,
    )
    .expect("parse");
    assert_eq!(stream.module, "m");
    let decl = &stream.declarations[0];
    assert_eq!(decl.kind, StreamKind::Class);
    assert_eq!(decl.key, None);
    assert_eq!(decl.container, None);
    assert_eq!(decl.class_kind, StreamClassKind::Class);
    assert_eq!(decl.variance, StreamVariance::Invariant);
    assert!(!decl.mutable && !decl.vararg && !decl.has_default);
}

#[test]
fn test_parse_rejects_unknown_fields() {
    let err = DeclarationStream::from_json(
        r#"{ "module": "m", "declarations": [{ "kind": "class", "name": "A", "color": 1 }] }"#,
    );
    assert!(err.is_err());
}

#[test]
fn test_type_spec_shapes() {
    let spec: TypeSpec = serde_json::from_str(r#"{ "intrinsic": "Int" }"#).expect("intrinsic");
    assert_eq!(spec, TypeSpec::Intrinsic { intrinsic: "Int".into() });

    let spec: TypeSpec = serde_json::from_str(r#"{ "class": "box" }"#).expect("class");
    assert_eq!(
        spec,
        TypeSpec::Class {
            class: "box".into(),
            args: Vec::new()
        }
    );

    let spec: TypeSpec =
        serde_json::from_str(r#"{ "nullable": { "param": "t" } }"#).expect("nullable");
    assert_eq!(
        spec,
        TypeSpec::Nullable {
            nullable: Box::new(TypeSpec::Param { param: "t".into() })
        }
    );
}

#[test]
fn test_load_box_with_forward_reference() {
    let interner = TypeInterner::new();
    let (table, index) = load(&interner, BOX_STREAM).expect("load");
    table.verify().expect("valid table");

    let class = table
        .get(index.resolve("box").expect("box"))
        .and_then(DeclarationDescriptor::as_class)
        .expect("class");
    assert_eq!(class.type_parameters.len(), 1);
    assert_eq!(class.type_parameters[0].variance, Variance::Out);
    let t = class.type_parameters[0].default_type(&interner);

    let value = class
        .lookup(interner.intern_string("value"))
        .and_then(DeclarationDescriptor::as_property)
        .expect("property");
    assert_eq!(value.ty, t);

    let map = table
        .get(index.resolve("box.map").expect("map"))
        .and_then(DeclarationDescriptor::as_function)
        .expect("function");
    let r = map.type_parameters[0].default_type(&interner);
    match interner.lookup(map.return_type) {
        Some(TypeData::Class(class_ref)) => {
            assert_eq!(class_ref.class, class.header.id);
            assert_eq!(class_ref.arguments.as_slice(), &[r]);
        }
        other => panic!("expected class type, got {other:?}"),
    }
    assert_eq!(map.value_parameters[0].ty, interner.function(&[t], r));
}

#[test]
fn test_function_without_return_is_unit() {
    let interner = TypeInterner::new();
    let (table, index) = load(
        &interner,
        r#"{ "module": "m", "declarations": [{ "key": "f", "kind": "function", "name": "run" }] }"#,
    )
    .expect("load");
    let function = table
        .get(index.resolve("f").expect("f"))
        .and_then(DeclarationDescriptor::as_function)
        .expect("function");
    assert_eq!(function.return_type, TypeId::UNIT);
}

#[test]
fn test_unknown_container_key() {
    let interner = TypeInterner::new();
    let err = load(
        &interner,
        r#"{ "module": "m", "declarations": [{ "kind": "property", "name": "p", "container": "nope", "type": { "intrinsic": "Int" } }] }"#,
    )
    .err()
    .expect("error");
    assert!(format!("{err:#}").contains("unknown declaration key `nope`"));
}

#[test]
fn test_unknown_intrinsic() {
    let interner = TypeInterner::new();
    let err = load(
        &interner,
        r#"{ "module": "m", "declarations": [{ "kind": "property", "name": "p", "type": { "intrinsic": "Float" } }] }"#,
    )
    .err()
    .expect("error");
    assert!(format!("{err:#}").contains("unknown intrinsic type `Float`"));
}

#[test]
fn test_duplicate_key() {
    let interner = TypeInterner::new();
    let err = load(
        &interner,
        r#"{ "module": "m", "declarations": [
            { "key": "a", "kind": "class", "name": "A" },
            { "key": "a", "kind": "class", "name": "B" }
        ] }"#,
    )
    .err()
    .expect("error");
    assert!(format!("{err:#}").contains("duplicate declaration key `a`"));
}

#[test]
fn test_property_needs_type() {
    let interner = TypeInterner::new();
    let err = load(
        &interner,
        r#"{ "module": "m", "declarations": [{ "kind": "property", "name": "p" }] }"#,
    )
    .err()
    .expect("error");
    assert!(format!("{err:#}").contains("property `p` has no type"));
}

#[test]
fn test_inadmissible_container() {
    let interner = TypeInterner::new();
    let result = load(
        &interner,
        r#"{ "module": "m", "declarations": [
            { "key": "p", "kind": "property", "name": "p", "type": { "intrinsic": "Int" } },
            { "kind": "class", "name": "Inner", "container": "p" }
        ] }"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_annotations_loaded() {
    let interner = TypeInterner::new();
    let (table, index) = load(
        &interner,
        r#"{ "module": "m", "declarations": [{
            "key": "old", "kind": "function", "name": "old",
            "annotations": [
                { "name": "Deprecated", "args": [{ "value": "use new" }, { "name": "level", "value": 2 }] },
                { "name": "Inline" }
            ]
        }] }"#,
    )
    .expect("load");
    let function = table.get(index.resolve("old").expect("old")).expect("descriptor");
    let annotations = function.annotations();
    assert_eq!(annotations.len(), 2);
    assert_eq!(&*interner.resolve_atom_ref(annotations[0].name), "Deprecated");
    assert_eq!(
        annotations[0].arguments[0].value,
        ConstantValue::String(interner.intern_string("use new"))
    );
    assert_eq!(
        annotations[0].argument(interner.intern_string("level")),
        Some(&ConstantValue::Int(2))
    );
    assert!(annotations[1].arguments.is_empty());
}

#[test]
fn test_parse_intrinsic() {
    assert_eq!(parse_intrinsic("String").expect("String"), TypeId::STRING);
    assert!(parse_intrinsic("string").is_err());
}
