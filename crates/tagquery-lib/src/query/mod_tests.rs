use indoc::indoc;

use crate::{Query, QueryBuilder, RuleInfo};

#[test]
fn rule_introspection() {
    let source = "(module) @m\n((class) @c (#set! kind x) (#strip! @c \"x\"))";
    let query = Query::new(source).unwrap();

    assert_eq!(query.source(), source);
    assert_eq!(query.rule_count(), 2);
    assert_eq!(
        query.rule(1),
        Some(RuleInfo {
            index: 1,
            byte_range: 12..56,
            captures: &["c".to_string()],
            predicates: vec!["set!", "strip!"],
        })
    );
    assert_eq!(query.rule(0).unwrap().byte_range, 0..11);
    assert!(query.rule(2).is_none());
    assert!(query.dump_rule(2).is_none());
}

#[test]
fn capture_names_in_first_seen_order() {
    let source = indoc! {"
        (a) @x @y
        (b) @y @z
    "};
    let query = Query::new(source).unwrap();
    assert_eq!(query.capture_names(), ["x", "y", "z"]);
}

#[test]
fn empty_rule_text() {
    let query = Query::new("; nothing but a comment\n").unwrap();
    assert_eq!(query.rule_count(), 0);
    assert!(query.capture_names().is_empty());
}

#[test]
fn query_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Query>();
}

#[test]
fn builder_defaults_compile_large_rule_sets() {
    let source = "(identifier) @id\n".repeat(500);
    let query = QueryBuilder::new(&source).build().unwrap();
    assert_eq!(query.rule_count(), 500);
    assert_eq!(query.capture_names(), ["id"]);
}
