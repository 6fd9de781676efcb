use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyRegex, range(0, 2))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    insta::assert_snapshot!(
        diagnostics.iter().next().unwrap().to_string(),
        @"error at 0..2: empty regex pattern"
    );
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedCapture, range(5, 7))
        .message("doc")
        .emit();

    let first = diagnostics.first().unwrap();
    assert_eq!(first.kind(), DiagnosticKind::UndefinedCapture);
    assert_eq!(first.message(), "capture `@doc` is not defined in this rule");
}

#[test]
fn default_hint_is_attached() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldOutsideNode, range(0, 4))
        .message("`name`")
        .emit();

    insta::assert_snapshot!(
        diagnostics.iter().next().unwrap().to_string(),
        @"error at 0..4: field constraint outside a node pattern: `name` (hint: fields constrain a node: `(class name: (constant))`)"
    );
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(0, 5))
        .message("primary")
        .related_to("related info", range(6, 10))
        .emit();

    let rendered = diagnostics.printer("hello world!").render();
    assert!(rendered.contains("missing closing `)`; primary"), "{rendered}");
    assert!(rendered.contains("related info"), "{rendered}");
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::BareIdentifier, range(1, 6))
        .fix("wrap in parentheses", "(class)")
        .emit();

    let rendered = diagnostics.render("(class name)");
    assert!(rendered.contains("bare identifier is not a pattern"), "{rendered}");
    assert!(rendered.contains("wrap in parentheses"), "{rendered}");
}

#[test]
fn plain_format_without_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyTree, range(0, 2))
        .emit();

    let rendered = DiagnosticsPrinter::new(&diagnostics).render();
    assert!(rendered.contains("empty `()` is not allowed"), "{rendered}");
}

#[test]
fn path_appears_in_render() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyRegex, range(0, 2))
        .emit();

    let rendered = diagnostics.printer("\"\"").path("tags.scm").render();
    assert!(rendered.contains("tags.scm"), "{rendered}");
}

#[test]
fn containment_suppresses_lower_priority() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(0, 20))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(5, 6))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered.first().unwrap().kind(),
        DiagnosticKind::UnclosedTree
    );
}

#[test]
fn root_cause_beats_structural_at_same_start() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, range(3, 4))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(3, 10))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered.first().unwrap().kind(),
        DiagnosticKind::ExpectedExpression
    );
}

#[test]
fn filtered_is_sorted_by_position() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyRegex, range(10, 12))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnknownPredicate, range(1, 5))
        .message("frob?")
        .emit();

    let starts: Vec<u32> = diagnostics
        .filtered()
        .iter()
        .map(|d| d.range().start().into())
        .collect();
    assert_eq!(starts, [1, 10]);
}

#[test]
fn priority_follows_declaration_order() {
    assert!(DiagnosticKind::UnclosedTree.suppresses(&DiagnosticKind::BareIdentifier));
    assert!(!DiagnosticKind::RegexSyntaxError.suppresses(&DiagnosticKind::InvalidEscape));
    assert!(DiagnosticKind::UnclosedAlternation.is_structural_error());
    assert!(DiagnosticKind::ExpectedCaptureName.is_root_cause_error());
}

#[test]
fn filtering_ignores_report_order() {
    let reports = [
        (DiagnosticKind::UnclosedTree, range(3, 10)),
        (DiagnosticKind::ExpectedExpression, range(3, 4)),
        (DiagnosticKind::UnexpectedToken, range(6, 7)),
    ];
    let kinds = |order: &[usize]| -> Vec<DiagnosticKind> {
        let mut diagnostics = Diagnostics::new();
        for &i in order {
            let (kind, range) = reports[i];
            diagnostics.report(kind, range).emit();
        }
        diagnostics.filtered().iter().map(|d| d.kind()).collect()
    };

    let forward = kinds(&[0, 1, 2]);
    assert_eq!(forward, [DiagnosticKind::ExpectedExpression]);
    assert_eq!(kinds(&[2, 1, 0]), forward);
    assert_eq!(kinds(&[1, 2, 0]), forward);
}

#[test]
fn empty_span_renders_under_next_char() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedCaptureName, range(4, 4))
        .emit();

    let rendered = diagnostics.render("(a) é");
    assert!(rendered.contains("expected capture name"), "{rendered}");
}
