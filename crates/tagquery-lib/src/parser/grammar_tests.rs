use std::fmt::Write;

use indoc::indoc;
use rowan::NodeOrToken;

use super::{SyntaxNode, parse};

/// CST without trivia, one element per line.
fn dump(source: &str) -> String {
    let result = parse(source).unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let mut out = String::new();
    write_node(&mut out, result.root.as_cst(), 0);
    out
}

fn write_node(out: &mut String, node: &SyntaxNode, depth: usize) {
    let indent = "  ".repeat(depth);
    writeln!(out, "{indent}{:?}", node.kind()).unwrap();
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => write_node(out, &n, depth + 1),
            NodeOrToken::Token(t) if !t.kind().is_trivia() => {
                writeln!(out, "{indent}  {:?} {:?}", t.kind(), t.text()).unwrap();
            }
            NodeOrToken::Token(_) => {}
        }
    }
}

/// Filtered diagnostics, one per line.
fn errors(source: &str) -> String {
    let result = parse(source).unwrap();
    result
        .diagnostics
        .filtered()
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn field_value_capture_wraps_field() {
    insta::assert_snapshot!(dump("(class name: (constant) @name) @definition.class"), @r#"
    Root
      Rule
        Capture
          Tree
            ParenOpen "("
            Id "class"
            Capture
              Field
                Id "name"
                Colon ":"
                Tree
                  ParenOpen "("
                  Id "constant"
                  ParenClose ")"
              At "@"
              Id "name"
            ParenClose ")"
          At "@"
          Id "definition.class"
    "#);
}

#[test]
fn children_of_every_kind() {
    insta::assert_snapshot!(dump(r#"(array . [(identifier) "x"]* _ !key)"#), @r#"
    Root
      Rule
        Tree
          ParenOpen "("
          Id "array"
          Anchor
            Dot "."
          Quantifier
            Alt
              BracketOpen "["
              Tree
                ParenOpen "("
                Id "identifier"
                ParenClose ")"
              Str
                DoubleQuote "\""
                StrVal "x"
                DoubleQuote "\""
              BracketClose "]"
            Star "*"
          Wildcard
            Underscore "_"
          NegatedField
            Negation "!"
            Id "key"
          ParenClose ")"
    "#);
}

#[test]
fn group_with_predicates() {
    insta::assert_snapshot!(dump(r#"((comment) @c (#strip! @c "^#") (#set! kind))"#), @r##"
    Root
      Rule
        Group
          ParenOpen "("
          Capture
            Tree
              ParenOpen "("
              Id "comment"
              ParenClose ")"
            At "@"
            Id "c"
          Predicate
            ParenOpen "("
            PredicateName "#strip!"
            CaptureRef
              At "@"
              Id "c"
            Str
              DoubleQuote "\""
              StrVal "^#"
              DoubleQuote "\""
            ParenClose ")"
          Predicate
            ParenOpen "("
            PredicateName "#set!"
            Id "kind"
            ParenClose ")"
          ParenClose ")"
    "##);
}

#[test]
fn trailing_predicates_join_the_rule() {
    let source = indoc! {r#"
        ; first
        (a) @x (#eq? @x "y")
        (b)
    "#};

    insta::assert_snapshot!(dump(source), @r##"
    Root
      Rule
        Capture
          Tree
            ParenOpen "("
            Id "a"
            ParenClose ")"
          At "@"
          Id "x"
        Predicate
          ParenOpen "("
          PredicateName "#eq?"
          CaptureRef
            At "@"
            Id "x"
          Str
            DoubleQuote "\""
            StrVal "y"
            DoubleQuote "\""
          ParenClose ")"
      Rule
        Tree
          ParenOpen "("
          Id "b"
          ParenClose ")"
    "##);
}

#[test]
fn bare_identifier() {
    insta::assert_snapshot!(
        errors("(class name (constant))"),
        @"error at 7..11: bare identifier is not a pattern (fix: wrap in parentheses)"
    );
}

#[test]
fn empty_tree() {
    insta::assert_snapshot!(
        errors("()"),
        @"error at 1..2: empty `()` is not allowed (hint: use `(_)` to match any named node, or `_` for any node)"
    );
}

#[test]
fn comma_separator() {
    insta::assert_snapshot!(
        errors("[(a), (b)]"),
        @"error at 4..5: unexpected separator: patterns are separated by whitespace, not `,` (fix: remove)"
    );
}

#[test]
fn missing_capture_name() {
    insta::assert_snapshot!(errors("(a) @"), @"error at 5..5: expected capture name");
}

#[test]
fn unclosed_alternation() {
    insta::assert_snapshot!(
        errors("[(a)"),
        @"error at 0..4: missing closing `]`; expected `]` (related: alternation started here at 0..1)"
    );
}

#[test]
fn predicate_without_rule() {
    insta::assert_snapshot!(
        errors(r#"(#eq? @a "b")"#),
        @"error at 0..1: predicate must follow a pattern"
    );
}

#[test]
fn capture_without_target() {
    insta::assert_snapshot!(errors("@ (b)"), @"error at 0..1: capture has no target");
}

#[test]
fn anchor_inside_alternation() {
    insta::assert_snapshot!(
        errors("[(a) . (b)]"),
        @"error at 5..6: unexpected token: anchors are not valid between alternatives"
    );
}
