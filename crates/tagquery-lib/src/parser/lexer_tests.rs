use super::lexer::lex;

fn snapshot(source: &str) -> String {
    lex(source)
        .iter()
        .map(|t| format!("{:?} {:?}", t.kind, t.text(source)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn node_with_field_and_capture() {
    insta::assert_snapshot!(snapshot("(class name: (constant) @name)"), @r#"
    ParenOpen "("
    Id "class"
    Whitespace " "
    Id "name"
    Colon ":"
    Whitespace " "
    ParenOpen "("
    Id "constant"
    ParenClose ")"
    Whitespace " "
    At "@"
    Id "name"
    ParenClose ")"
    "#);
}

#[test]
fn dotted_capture_names_and_predicates() {
    insta::assert_snapshot!(snapshot("(#select-adjacent! @doc @definition.class)"), @r##"
    ParenOpen "("
    PredicateName "#select-adjacent!"
    Whitespace " "
    At "@"
    Id "doc"
    Whitespace " "
    At "@"
    Id "definition.class"
    ParenClose ")"
    "##);
}

#[test]
fn string_literals_split_into_quotes() {
    insta::assert_snapshot!(snapshot(r#""a\"b" """#), @r#"
    DoubleQuote "\""
    StrVal "a\\\"b"
    DoubleQuote "\""
    Whitespace " "
    DoubleQuote "\""
    DoubleQuote "\""
    "#);
}

#[test]
fn wildcard_and_underscore_identifiers() {
    insta::assert_snapshot!(snapshot("_ (_) _foo"), @r#"
    Underscore "_"
    Whitespace " "
    ParenOpen "("
    Underscore "_"
    ParenClose ")"
    Whitespace " "
    Id "_foo"
    "#);
}

#[test]
fn anchors_quantifiers_and_negation() {
    insta::assert_snapshot!(snapshot(". * + ? !"), @r#"
    Dot "."
    Whitespace " "
    Star "*"
    Whitespace " "
    Plus "+"
    Whitespace " "
    Question "?"
    Whitespace " "
    Negation "!"
    "#);
}

#[test]
fn line_comments_are_trivia() {
    insta::assert_snapshot!(snapshot("; Methods\n(a)"), @r#"
    LineComment "; Methods"
    Newline "\n"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    "#);
}

#[test]
fn unknown_characters_coalesce() {
    insta::assert_snapshot!(snapshot("(a) $$% (b)"), @r#"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    Whitespace " "
    Garbage "$$%"
    Whitespace " "
    ParenOpen "("
    Id "b"
    ParenClose ")"
    "#);
}
