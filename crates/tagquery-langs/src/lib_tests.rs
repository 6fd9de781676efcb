use indoc::indoc;

use super::*;

#[test]
fn lang_from_name() {
    assert_eq!(from_name("ruby").unwrap().name(), "ruby");
    assert_eq!(from_name("Ruby").unwrap().name(), "ruby");
    assert_eq!(from_name("RB").unwrap().name(), "ruby");
    assert!(from_name("unknown").is_none());
}

#[test]
fn lang_from_extension() {
    assert_eq!(from_ext("rb").unwrap().name(), "ruby");
    assert_eq!(from_ext("Rakefile").map(|l| l.name()), None);
    assert_eq!(from_ext("gemspec").unwrap().name(), "ruby");
}

#[test]
fn all_returns_bundled_langs() {
    let langs = all();
    assert!(!langs.is_empty());
    for lang in &langs {
        assert!(!lang.tags().is_empty());
        assert!(lang.tags_query().is_ok(), "{} rules compile", lang.name());
    }
}

#[test]
fn ruby_tags_compile_once() {
    let first = ruby::tags_query().unwrap();
    let second = ruby::tags_query().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.rule_count(), 4);
    insta::assert_debug_snapshot!(first.capture_names(), @r#"
    [
        "doc",
        "name",
        "definition.function",
        "definition.class",
        "definition.module",
    ]
    "#);
}

#[cfg(feature = "lang-ruby")]
mod ruby_tags {
    use super::*;

    /// One line per match: the rule, then each capture's kind and text.
    fn tags(source: &str) -> String {
        let tree = ruby::parse(source).unwrap();
        let query = ruby::tags_query().unwrap();

        let mut out = String::new();
        for m in query.matches(&tree, source).unwrap() {
            out.push_str(&format!("rule {}\n", m.rule_index));
            for (name, nodes) in &m.captures {
                for node in nodes {
                    out.push_str(&format!("  @{name} {} {:?}\n", node.kind, node.text));
                }
            }
        }
        out
    }

    #[test]
    fn module_definition() {
        insta::assert_snapshot!(tags("module Foo\nend\n"), @r#"
        rule 3
          @name constant "Foo"
          @definition.module module "module Foo\nend"
        "#);
    }

    #[test]
    fn nested_module_name() {
        insta::assert_snapshot!(tags("module A::B\nend\n"), @r#"
        rule 3
          @name constant "B"
          @definition.module module "module A::B\nend"
        "#);
    }

    #[test]
    fn documented_class() {
        let source = indoc! {"
            # Widgets.
            # Thread safe.
            class A::B
            end
        "};

        insta::assert_snapshot!(tags(source), @r##"
        rule 2
          @doc comment "Widgets."
          @doc comment "Thread safe."
          @name constant "B"
          @definition.class class "# Widgets.\n# Thread safe.\nclass A::B\nend"
        "##);
    }

    #[test]
    fn undocumented_class() {
        insta::assert_snapshot!(tags("class Plain\nend\n"), @r#"
        rule 2
          @name constant "Plain"
          @definition.class class "class Plain\nend"
        "#);
    }

    #[test]
    fn code_between_comment_and_class() {
        let source = indoc! {"
            # Stray.
            x = 1
            class A
            end
        "};

        insta::assert_snapshot!(tags(source), @r#"
        rule 2
          @name constant "A"
          @definition.class class "class A\nend"
        "#);
    }

    #[test]
    fn blank_line_between_comment_and_class() {
        let source = indoc! {"
            # Widgets.

            class A
            end
        "};

        insta::assert_snapshot!(tags(source), @r#"
        rule 2
          @name constant "A"
          @definition.class class "class A\nend"
        "#);
    }

    #[test]
    fn magic_comment_header_keeps_class() {
        let source = indoc! {"
            # frozen_string_literal: true
            require 'x'
            class Foo
            end
        "};

        insta::assert_snapshot!(tags(source), @r#"
        rule 2
          @name constant "Foo"
          @definition.class class "class Foo\nend"
        "#);
    }

    #[test]
    fn documented_class_then_method() {
        let source = indoc! {"
            # Docs.
            class X
            end
            def foo
            end
        "};

        insta::assert_snapshot!(tags(source), @r##"
        rule 0
          @name identifier "foo"
          @definition.function method "def foo\nend"
        rule 2
          @doc comment "Docs."
          @name constant "X"
          @definition.class class "# Docs.\nclass X\nend"
        "##);
    }

    #[test]
    fn documented_methods() {
        let source = indoc! {"
            # Says hi.
            def hi
            end

            def self.build
            end
        "};

        insta::assert_snapshot!(tags(source), @r##"
        rule 0
          @doc comment "Says hi."
          @name identifier "hi"
          @definition.function method "# Says hi.\ndef hi\nend"
        rule 0
          @name identifier "build"
          @definition.function singleton_method "def self.build\nend"
        "##);
    }

    #[test]
    fn alias_is_a_method() {
        insta::assert_snapshot!(tags("alias greet hi\n"), @r#"
        rule 1
          @name identifier "greet"
          @definition.function alias "alias greet hi"
        "#);
    }

    #[test]
    fn lang_parse_matches_ruby_parse() {
        let source = "class A\nend\n";
        let via_lang = from_ext("rb").unwrap().parse(source).unwrap();
        let direct = ruby::parse(source).unwrap();

        assert_eq!(
            via_lang.root_node().to_sexp(),
            direct.root_node().to_sexp()
        );
        assert!(!direct.root_node().has_error());
    }
}
