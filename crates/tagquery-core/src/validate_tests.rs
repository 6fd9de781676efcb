use crate::{InvalidTree, OwnedTree, TreeBuilder, validate_tree};

#[test]
fn well_formed_tree() {
    let source = "class A\nend";
    let tree = TreeBuilder::new(source)
        .start("class", 0..11)
        .token("class", 0..5)
        .field("name")
        .leaf("constant", 6..7)
        .token("end", 8..11)
        .finish()
        .build()
        .unwrap();
    assert_eq!(validate_tree(&tree, source), Ok(()));
}

#[test]
fn missing_root() {
    assert_eq!(
        validate_tree(&OwnedTree::empty(), "x"),
        Err(InvalidTree::MissingRoot)
    );
    assert_eq!(
        validate_tree(&None::<OwnedTree>, "x"),
        Err(InvalidTree::MissingRoot)
    );
}

#[test]
fn span_past_end_of_source() {
    let tree = TreeBuilder::new("ab").leaf("word", 0..5).build().unwrap();
    let err = validate_tree(&tree, "ab").unwrap_err();
    assert_eq!(
        err.to_string(),
        "node `word` spans 0..5, outside source of 2 bytes"
    );
}

#[test]
fn span_inside_multibyte_char() {
    let source = "é";
    let tree = TreeBuilder::new(source).leaf("word", 0..1).build().unwrap();
    assert_eq!(
        validate_tree(&tree, source),
        Err(InvalidTree::NotCharBoundary {
            kind: "word".into(),
            offset: 1
        })
    );
}

#[test]
fn child_outside_parent() {
    let source = "abcdef";
    let tree = TreeBuilder::new(source)
        .start("outer", 0..3)
        .leaf("inner", 2..5)
        .finish()
        .build()
        .unwrap();
    assert!(matches!(
        validate_tree(&tree, source),
        Err(InvalidTree::ChildOutsideParent { kind, .. }) if kind == "inner"
    ));
}

#[test]
fn overlapping_siblings() {
    let source = "abcdef";
    let tree = TreeBuilder::new(source)
        .start("outer", 0..6)
        .leaf("a", 0..3)
        .leaf("b", 2..4)
        .finish()
        .build()
        .unwrap();
    assert!(matches!(
        validate_tree(&tree, source),
        Err(InvalidTree::OverlappingSiblings { kind, .. }) if kind == "b"
    ));
}
