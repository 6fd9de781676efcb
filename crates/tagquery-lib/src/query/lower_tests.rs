use indoc::indoc;

use crate::{DiagnosticKind, Error, Query};

fn dump(source: &str) -> String {
    let query = Query::new(source).unwrap();
    (0..query.rule_count())
        .filter_map(|i| query.dump_rule(i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First diagnostic of a failed compile, as `Kind: message`.
fn error(source: &str) -> String {
    let Err(Error::Syntax(err)) = Query::new(source) else {
        panic!("expected a syntax error for {source:?}");
    };
    let first = err.diagnostics.first().unwrap();
    format!("{:?}: {}", first.kind(), first.message())
}

#[test]
fn node_with_fields_and_children() {
    insta::assert_snapshot!(
        dump("(class name: (constant) @name !superclass (body)) @definition.class"),
        @"(class name: (constant) @name !superclass (body)) @definition.class"
    );
}

#[test]
fn fields_print_before_children() {
    insta::assert_snapshot!(
        dump(r#"(pair "=" value: (string) key: (_))"#),
        @r#"(pair value: (string) key: (_) "=")"#
    );
}

#[test]
fn top_level_group_is_the_rule_sequence() {
    insta::assert_snapshot!(
        dump(r#"((comment)* @doc . (class) @c (#strip! @doc "^#"))"#),
        @"(comment)* @doc . (class) @c"
    );
}

#[test]
fn nested_group_and_alternation() {
    let source = indoc! {r#"
        [(a) "end" _] @x
        (a ((b) (c))+)
        (array (identifier) @last .)
    "#};

    insta::assert_snapshot!(dump(source), @r#"
    [(a) "end" _] @x
    (a ((b) (c))+)
    (array (identifier) @last .)
    "#);
}

#[test]
fn stacked_captures_on_field() {
    insta::assert_snapshot!(dump("(a f: (b) @x @y)"), @"(a f: (b) @x @y)");
}

#[test]
fn string_escapes_are_resolved() {
    insta::assert_snapshot!(dump(r#""a\"b""#), @r#""a\"b""#);
}

#[test]
fn capture_table_in_source_order() {
    let query = Query::new("(class name: (_) @name) @definition.class").unwrap();
    let rule = query.rule(0).unwrap();
    assert_eq!(rule.captures, ["name", "definition.class"]);
}

#[test]
fn undefined_capture() {
    insta::assert_snapshot!(
        error(r#"((a) @x (#eq? @y "z"))"#),
        @"UndefinedCapture: capture `@y` is not defined in this rule"
    );
}

#[test]
fn unknown_predicate() {
    insta::assert_snapshot!(
        error("(a) @x (#frob? @x)"),
        @"UnknownPredicate: unknown predicate `#frob?`"
    );
}

#[test]
fn predicate_arity() {
    insta::assert_snapshot!(
        error("((a) @x (#eq? @x))"),
        @"PredicateArity: wrong number of predicate arguments: `#eq?` takes 2 arguments, found 1"
    );
    insta::assert_snapshot!(
        error("((a) @x (#any-of? @x))"),
        @"PredicateArity: wrong number of predicate arguments: `#any-of?` takes at least 2 arguments, found 1"
    );
    insta::assert_snapshot!(
        error("((a) (#set! a b c))"),
        @"PredicateArity: wrong number of predicate arguments: `#set!` takes 1 to 2 arguments, found 3"
    );
}

#[test]
fn predicate_argument_kinds() {
    insta::assert_snapshot!(
        error(r#"((a) @x (#eq? "z" @x))"#),
        @"PredicateArgument: invalid predicate argument: argument 1 of `#eq?` must be a capture"
    );
    insta::assert_snapshot!(
        error("((a) @x (#match? @x x))"),
        @"PredicateArgument: invalid predicate argument: argument 2 of `#match?` must be a string"
    );
    insta::assert_snapshot!(
        error("((a) @x (#set! @x))"),
        @"PredicateArgument: invalid predicate argument: argument 1 of `#set!` must be a string or identifier"
    );
}

#[test]
fn regex_errors() {
    insta::assert_snapshot!(
        error(r#"((a) @x (#match? @x ""))"#),
        @"EmptyRegex: empty regex pattern"
    );
    assert!(error(r#"((a) @x (#match? @x "("))"#).starts_with("RegexSyntaxError: invalid regex: "));
    assert!(error(r#"((a) @x (#strip! @x "[z-a]"))"#).starts_with("RegexSyntaxError: "));
}

#[test]
fn invalid_escape() {
    insta::assert_snapshot!(
        error(r#"((a) @x (#eq? @x "\q"))"#),
        @r"InvalidEscape: invalid escape sequence: `\q`"
    );
}

#[test]
fn quantified_field() {
    insta::assert_snapshot!(
        error("(a f: (b)*)"),
        @"QuantifiedField: field `f` cannot be quantified"
    );
}

#[test]
fn field_sequence_value() {
    insta::assert_snapshot!(
        error("(a f: ((b) (c)))"),
        @"FieldSequenceValue: field `f` cannot match a sequence"
    );
}

#[test]
fn field_outside_node() {
    insta::assert_snapshot!(
        error("f: (b)"),
        @"FieldOutsideNode: field constraint outside a node pattern: `f`"
    );
}

#[test]
fn anchor_as_field_value() {
    insta::assert_snapshot!(
        error("(a f: .)"),
        @"AnchorOutsideNode: anchor outside a node pattern or group"
    );
}

#[test]
fn every_rule_reports() {
    let source = indoc! {r#"
        ((a) @x (#eq? @y "z"))
        ((b) @x (#frob? @x))
    "#};
    let Err(Error::Syntax(err)) = Query::new(source) else {
        panic!("expected a syntax error");
    };
    let kinds: Vec<_> = err.diagnostics.filtered().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UndefinedCapture, DiagnosticKind::UnknownPredicate]
    );
    assert_eq!(err.rule_index, 0);
}

#[test]
fn regex_predicates_compare_by_source() {
    let predicates = |source: &str| Query::new(source).unwrap().rules()[0].predicates.clone();
    let doc = r#"((comment) @c (#match? @c "^#") (#strip! @c "^#\\s*"))"#;

    assert_eq!(predicates(doc), predicates(doc));
    assert_ne!(
        predicates(doc),
        predicates(r#"((comment) @c (#match? @c "^;") (#strip! @c "^#\\s*"))"#)
    );
}
