use super::{Expr, PredicateArg, Root, parse};

fn root(source: &str) -> Root {
    let result = parse(source).unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.root
}

#[test]
fn rules_and_patterns() {
    let root = root("(module) @m\n[(a) (b)]\n\"end\"\n_");
    let kinds: Vec<_> = root
        .rules()
        .map(|r| match r.pattern().unwrap() {
            Expr::Capture(_) => "capture",
            Expr::Alt(_) => "alt",
            Expr::Str(_) => "str",
            Expr::Wildcard(_) => "wildcard",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["capture", "alt", "str", "wildcard"]);
}

#[test]
fn tree_accessors() {
    let root = root("(class name: (constant) !superclass (_))");
    let Some(Expr::Tree(tree)) = root.rules().next().and_then(|r| r.pattern()) else {
        panic!("expected tree");
    };
    assert_eq!(tree.node_kind().unwrap().text(), "class");
    assert!(!tree.is_wildcard());

    let children: Vec<_> = tree.children().collect();
    assert_eq!(children.len(), 3);

    let Expr::Field(field) = &children[0] else {
        panic!("expected field");
    };
    assert_eq!(field.name().unwrap().text(), "name");
    assert!(matches!(field.value(), Some(Expr::Tree(_))));

    let Expr::NegatedField(negated) = &children[1] else {
        panic!("expected negated field");
    };
    assert_eq!(negated.name().unwrap().text(), "superclass");

    let Expr::Tree(any) = &children[2] else {
        panic!("expected wildcard tree");
    };
    assert!(any.is_wildcard());
    assert!(any.node_kind().is_none());
}

#[test]
fn capture_and_quantifier() {
    let root = root("(comment)+ @doc");
    let Some(Expr::Capture(capture)) = root.rules().next().and_then(|r| r.pattern()) else {
        panic!("expected capture");
    };
    assert_eq!(capture.name().unwrap().text(), "doc");

    let Some(Expr::Quantifier(quantifier)) = capture.inner() else {
        panic!("expected quantifier");
    };
    assert_eq!(quantifier.operator().unwrap().text(), "+");
    assert!(matches!(quantifier.inner(), Some(Expr::Tree(_))));
}

#[test]
fn predicate_arguments() {
    let root = root(r#"((a) @x (#any-of? @x "one" two))"#);
    let rule = root.rules().next().unwrap();
    let predicates: Vec<_> = rule.predicates().collect();
    assert_eq!(predicates.len(), 1);

    let predicate = &predicates[0];
    assert_eq!(predicate.name().unwrap().text(), "#any-of?");

    let args: Vec<_> = predicate.args().collect();
    assert_eq!(args.len(), 3);
    let PredicateArg::Capture(capture) = &args[0] else {
        panic!("expected capture argument");
    };
    assert_eq!(capture.name().unwrap().text(), "x");
    let PredicateArg::Str(text) = &args[1] else {
        panic!("expected string argument");
    };
    assert_eq!(text.value().unwrap().text(), "one");
    let PredicateArg::Ident(word) = &args[2] else {
        panic!("expected identifier argument");
    };
    assert_eq!(word.text(), "two");
}

#[test]
fn empty_string_has_no_value() {
    let root = root(r#""""#);
    let Some(Expr::Str(text)) = root.rules().next().and_then(|r| r.pattern()) else {
        panic!("expected string");
    };
    assert!(text.value().is_none());
}

#[test]
fn group_children_skip_predicates() {
    let root = root(r#"((a) . (b) (#eq? @x "y"))"#);
    let Some(Expr::Group(group)) = root.rules().next().and_then(|r| r.pattern()) else {
        panic!("expected group");
    };
    let children: Vec<_> = group.children().collect();
    assert_eq!(children.len(), 3);
    assert!(matches!(children[1], Expr::Anchor(_)));
}
