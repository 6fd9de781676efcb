use crate::{DiagnosticKind, Error, Query, QueryBuilder, SyntaxError};

fn syntax_error(source: &str) -> SyntaxError {
    match Query::new(source).unwrap_err() {
        Error::Syntax(err) => err,
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn syntax_error_points_at_rule_and_offset() {
    let err = syntax_error("(class) @c\n(module");

    assert_eq!(err.rule_index, 1);
    assert_eq!(err.offset, 11);
    insta::assert_snapshot!(
        err.to_string(),
        @"syntax error in rule 1 at byte 11: missing closing `)`; expected `)`"
    );
}

#[test]
fn syntax_error_in_predicate() {
    let err = syntax_error("(class) @c (#frob? @c)");

    assert_eq!(err.rule_index, 0);
    assert_eq!(err.offset, 12);
    assert_eq!(err.message, "unknown predicate `#frob?`");
}

#[test]
fn syntax_error_between_rules() {
    let err = syntax_error("(a) @a\n@x");

    assert_eq!(err.rule_index, 1);
    assert_eq!(err.offset, 7);
}

#[test]
fn syntax_error_keeps_every_diagnostic() {
    let err = syntax_error(r#"((class) @c (#eq? @d "x") (#match? @c ""))"#);

    let kinds: Vec<_> = err.diagnostics.iter().map(|d| d.kind()).collect();
    assert!(kinds.contains(&DiagnosticKind::UndefinedCapture));
    assert!(kinds.contains(&DiagnosticKind::EmptyRegex));
}

#[test]
fn syntax_error_renders_snippet() {
    let source = "(class) @c\n(module";
    let err = syntax_error(source);

    let rendered = err.render(source);
    assert!(rendered.contains("missing closing `)`"), "{rendered}");
    assert!(rendered.contains("node started here"), "{rendered}");
}

#[test]
fn error_display_is_transparent() {
    let err = Query::new("(class").unwrap_err();
    assert!(err.to_string().starts_with("syntax error in rule 0 at byte 0"));
}

#[test]
fn parse_fuel_exhaustion() {
    let err = QueryBuilder::new("(a) (b) (c)")
        .with_parse_fuel(Some(1))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ExecFuelExhausted));
}

#[test]
fn recursion_limit_exceeded() {
    let err = QueryBuilder::new("((((((((((a))))))))))")
        .with_recursion_limit(Some(3))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::RecursionLimitExceeded));
}

#[test]
fn unlimited_builder_compiles() {
    let query = QueryBuilder::new("((((((((((a) @a)))))))))")
        .with_parse_fuel(None)
        .with_recursion_limit(None)
        .build()
        .unwrap();
    assert_eq!(query.rule_count(), 1);
}
