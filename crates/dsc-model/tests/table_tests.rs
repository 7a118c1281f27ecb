use super::*;
use crate::builder::{FirstWins, ModuleBuilder};
use crate::descriptors::{ClassKind, Variance};
use crate::ids::DescriptorIdAllocator;
use crate::intern::TypeInterner;
use crate::types::TypeId;

struct Sample {
    table: DescriptorTable,
    util: DescriptorId,
    boxed: DescriptorId,
    value: DescriptorId,
    map: DescriptorId,
    f: DescriptorId,
}

fn sample(interner: &TypeInterner, ids: &DescriptorIdAllocator) -> Sample {
    let mut builder = ModuleBuilder::new("app", interner, ids);
    let util = builder.declare_namespace(None, "util").expect("util");
    let boxed = builder
        .declare_class(Some(util), "Box", ClassKind::Class)
        .expect("Box");
    let t = builder
        .declare_type_parameter(boxed, "T", Variance::Invariant)
        .expect("T");
    let t_type = builder.type_parameter_type(t).expect("T type");
    let value = builder
        .declare_property(Some(boxed), "value", t_type, false)
        .expect("value");
    let map = builder
        .declare_function(Some(boxed), "map", TypeId::UNIT)
        .expect("map");
    let f = builder
        .declare_value_parameter(map, "f", t_type)
        .expect("f");
    Sample {
        table: builder.freeze(&mut FirstWins).expect("freeze"),
        util,
        boxed,
        value,
        map,
        f,
    }
}

#[test]
fn test_table_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DescriptorTable>();
    assert_send_sync::<DeclarationDescriptor>();
}

#[test]
fn test_get_indexes_every_descriptor() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    // module, root, util, Box, T, value, map, f
    assert_eq!(s.table.len(), 8);
    for id in s.table.ids() {
        assert_eq!(s.table.get(*id).map(|d| d.id()), Some(*id));
    }
    assert!(s.table.get(DescriptorId(12345)).is_none());
    assert_eq!(s.table.ids()[0], s.table.module().id());
}

#[test]
fn test_containing_declaration_navigation() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    let value = s.table.get(s.value).expect("value");
    assert_eq!(
        s.table.containing_declaration(value).map(|d| d.id()),
        Some(s.boxed)
    );
    let boxed = s.table.get(s.boxed).expect("Box");
    assert_eq!(
        s.table.containing_declaration(boxed).map(|d| d.id()),
        Some(s.util)
    );
    let module = s.table.get(s.table.module().id()).expect("module");
    assert!(s.table.containing_declaration(module).is_none());
}

#[test]
fn test_parent_chain_is_acyclic_and_reaches_module() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    let module = s.table.module().id();
    for descriptor in s.table.iter() {
        let chain: Vec<DescriptorId> = s.table.parents(descriptor.id()).map(|d| d.id()).collect();
        let mut seen = rustc_hash::FxHashSet::default();
        seen.insert(descriptor.id());
        for id in &chain {
            assert!(seen.insert(*id), "repeated {id} above {}", descriptor.id());
        }
        if descriptor.id() == module {
            assert!(chain.is_empty());
        } else {
            assert_eq!(chain.last(), Some(&module));
        }
    }
    assert!(s.table.verify().is_ok());
}

#[test]
fn test_depth() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    assert_eq!(s.table.depth(s.table.module().id()), Some(0));
    assert_eq!(s.table.depth(s.util), Some(2));
    assert_eq!(s.table.depth(s.f), Some(5));
    assert_eq!(s.table.depth(DescriptorId(999)), None);
}

#[test]
fn test_resolve_path() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    let path = |segments: &[&str]| -> Vec<Atom> {
        segments.iter().map(|s| interner.intern_string(s)).collect()
    };
    assert_eq!(
        s.table.resolve_path(&path(&["util", "Box", "map"])).map(|d| d.id()),
        Some(s.map)
    );
    assert_eq!(
        s.table.resolve_path(&path(&["util"])).map(|d| d.id()),
        Some(s.util)
    );
    assert!(s.table.resolve_path(&path(&["util", "Missing"])).is_none());
    assert!(s.table.resolve_path(&path(&["util", "Box", "value", "x"])).is_none());
    assert!(s.table.resolve_path(&[]).is_none());
}

#[test]
fn test_of_kind() {
    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    let namespaces: Vec<_> = s.table.of_kind(DescriptorKind::Namespace).map(|d| d.id()).collect();
    assert_eq!(namespaces, vec![s.table.root_namespace().id(), s.util]);
    assert_eq!(s.table.of_kind(DescriptorKind::ValueParameter).count(), 1);
}

#[test]
fn test_shared_table_read_in_parallel() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let ids = DescriptorIdAllocator::new();
    let s = sample(&interner, &ids);
    let table = Arc::new(s.table);
    let depths: Vec<Option<usize>> = table
        .ids()
        .par_iter()
        .map(|&id| table.depth(id))
        .collect();
    assert_eq!(depths.len(), table.len());
    assert!(depths.iter().all(Option::is_some));
}
