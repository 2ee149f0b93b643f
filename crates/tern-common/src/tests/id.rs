use super::*;

#[test]
fn local_and_namespace() {
    let id = Id::new("A::B::c");
    assert_eq!(id.local(), Id::new("c"));
    assert_eq!(id.namespace(), Id::new("A::B"));
    assert!(id.is_qualified());

    let plain = Id::new("x");
    assert_eq!(plain.local(), plain);
    assert!(plain.namespace().is_empty());
    assert!(!plain.is_qualified());
}

#[test]
fn first_and_rest() {
    let id = Id::new("A::B::c");
    assert_eq!(id.first(), Id::new("A"));
    assert_eq!(id.rest(), Id::new("B::c"));
    assert_eq!(Id::new("x").rest(), Id::default());
}

#[test]
fn join() {
    assert_eq!(Id::new("A").join(&Id::new("b")), Id::new("A::b"));
    assert_eq!(Id::default().join(&Id::new("b")), Id::new("b"));
    assert_eq!(Id::new("A").join(&Id::default()), Id::new("A"));
}

#[test]
fn components() {
    let id = Id::new("A::B::c");
    assert_eq!(id.components().collect::<Vec<_>>(), vec!["A", "B", "c"]);
}
