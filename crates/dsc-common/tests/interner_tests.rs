use super::*;

#[test]
fn test_intern_deduplicates() {
    let interner = ShardedInterner::new();
    let a1 = interner.intern("Box");
    let a2 = interner.intern("Box");
    let b = interner.intern("Cell");
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
    assert_eq!(&*interner.resolve(a1), "Box");
    assert_eq!(&*interner.resolve(b), "Cell");
}

#[test]
fn test_empty_string_is_none() {
    let interner = ShardedInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
    assert!(interner.is_empty());
}

#[test]
fn test_unknown_atom_resolves_to_empty() {
    let interner = ShardedInterner::new();
    assert!(interner.try_resolve(Atom(0xFFFF_0)).is_none());
    assert_eq!(&*interner.resolve(Atom(0xFFFF_0)), "");
}

#[test]
fn test_intern_common_is_idempotent() {
    let interner = ShardedInterner::new();
    interner.intern_common();
    let len = interner.len();
    interner.intern_common();
    assert_eq!(interner.len(), len);
    assert_eq!(&*interner.resolve(interner.intern("<root>")), "<root>");
}

#[test]
fn test_concurrent_interning_agrees() {
    use std::sync::Arc;
    use std::thread;

    let interner = Arc::new(ShardedInterner::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = interner.clone();
            thread::spawn(move || {
                (0..200)
                    .map(|i| interner.intern(&format!("name{i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Atom>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread completed"))
        .collect();
    for other in &results[1..] {
        assert_eq!(&results[0], other);
    }
    assert_eq!(interner.len(), 201);
}
