//! Property tests for the pruning invariants of path operations.

use nest_map::{ops, KeyPath, MapError, NestedMap};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Create(KeyPath, NestedMap),
    Update(KeyPath, NestedMap),
    Delete(KeyPath),
}

fn key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c"]).prop_map(String::from)
}

fn path() -> impl Strategy<Value = KeyPath> {
    prop::collection::vec(key(), 0..4).prop_map(KeyPath::new)
}

fn value() -> impl Strategy<Value = NestedMap> {
    let leaf = "[a-z]{0,3}".prop_map(NestedMap::leaf);
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop::collection::btree_map(key(), inner, 0..3).prop_map(NestedMap::Container)
    })
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (path(), value()).prop_map(|(p, v)| Op::Create(p, v)),
        (path(), value()).prop_map(|(p, v)| Op::Update(p, v)),
        path().prop_map(Op::Delete),
    ]
}

fn apply(root: &mut NestedMap, op: Op) -> Result<(), MapError> {
    match op {
        Op::Create(path, value) => ops::create(root, &path, value),
        Op::Update(path, value) => ops::update(root, &path, value),
        Op::Delete(path) => ops::delete(root, &path).map(drop),
    }
}

fn build(ops: Vec<Op>) -> NestedMap {
    let mut root = NestedMap::new();
    for op in ops {
        let _ = apply(&mut root, op);
    }
    root
}

fn has_empty_container_below(node: &NestedMap) -> bool {
    match node {
        NestedMap::Leaf(_) => false,
        NestedMap::Container(children) => children
            .values()
            .any(|child| child.is_empty_container() || has_empty_container_below(child)),
    }
}

proptest! {
    #[test]
    fn no_empty_container_survives(ops in prop::collection::vec(op(), 0..24)) {
        let mut root = NestedMap::new();
        for op in ops {
            let before = root.clone();
            if apply(&mut root, op).is_err() {
                prop_assert_eq!(&root, &before);
            }
            prop_assert!(root.is_container());
            prop_assert!(!has_empty_container_below(&root));
        }
    }

    #[test]
    fn second_delete_finds_nothing(ops in prop::collection::vec(op(), 0..16), target in path()) {
        let mut root = build(ops);
        if ops::delete(&mut root, &target).is_ok() {
            let after_first = root.clone();
            let second = ops::delete(&mut root, &target);
            let is_not_found = matches!(
                second,
                Err(MapError::PathNotFound(_)) | Err(MapError::PathThroughLeaf { .. })
            );
            prop_assert!(is_not_found);
            prop_assert_eq!(root, after_first);
        }
    }

    #[test]
    fn update_with_empty_equals_delete(
        ops in prop::collection::vec(op(), 0..16),
        target in path(),
    ) {
        let root = build(ops);
        let mut updated = root.clone();
        let mut deleted = root;
        let update_ok = ops::update(&mut updated, &target, NestedMap::new()).is_ok();
        let delete_ok = ops::delete(&mut deleted, &target).is_ok();
        prop_assert_eq!(update_ok, delete_ok);
        prop_assert_eq!(updated, deleted);
    }

    #[test]
    fn created_value_reads_back_pruned(target in path(), value in value()) {
        let mut root = NestedMap::new();
        let mut expected = value.clone();
        expected.prune();
        if ops::create(&mut root, &target, value).is_ok() {
            prop_assert_eq!(ops::get(&root, &target).unwrap(), &expected);
        }
    }
}
