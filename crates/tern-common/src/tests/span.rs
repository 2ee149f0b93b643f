use super::*;

#[test]
fn merge_covers_both() {
    let a = Span::new(4, 10);
    let b = Span::new(8, 20);
    assert_eq!(a.merge(b), Span::new(4, 20));
    assert_eq!(b.merge(a), Span::new(4, 20));
}

#[test]
fn dummy_is_distinguishable() {
    assert!(Span::dummy().is_dummy());
    assert!(!Span::new(0, 0).is_dummy());
}

#[test]
fn location_display() {
    let loc = Location::new("m.tn", Span::new(3, 7));
    assert_eq!(loc.to_string(), "m.tn:3..7");
    assert_eq!(Location::default().to_string(), "<no location>");
    assert_eq!(Location::file_only("m.tn").to_string(), "m.tn");
}

#[test]
fn empty_and_len() {
    assert!(Span::at(5).is_empty());
    assert_eq!(Span::new(5, 9).len(), 4);
}
