//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }

            pub fn text_range(&self) -> TextRange {
                self.0.text_range()
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Rule, Rule);
ast_node!(Tree, Tree);
ast_node!(Str, Str);
ast_node!(Wildcard, Wildcard);
ast_node!(Field, Field);
ast_node!(NegatedField, NegatedField);
ast_node!(Capture, Capture);
ast_node!(Quantifier, Quantifier);
ast_node!(Alt, Alt);
ast_node!(Group, Group);
ast_node!(Anchor, Anchor);
ast_node!(Predicate, Predicate);
ast_node!(CaptureRef, CaptureRef);

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// Expression: any pattern that can appear in a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Tree(Tree),
    Str(Str),
    Wildcard(Wildcard),
    Field(Field),
    NegatedField(NegatedField),
    Capture(Capture),
    Quantifier(Quantifier),
    Alt(Alt),
    Group(Group),
    Anchor(Anchor),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Tree => Tree::cast(node).map(Expr::Tree),
            SyntaxKind::Str => Str::cast(node).map(Expr::Str),
            SyntaxKind::Wildcard => Wildcard::cast(node).map(Expr::Wildcard),
            SyntaxKind::Field => Field::cast(node).map(Expr::Field),
            SyntaxKind::NegatedField => NegatedField::cast(node).map(Expr::NegatedField),
            SyntaxKind::Capture => Capture::cast(node).map(Expr::Capture),
            SyntaxKind::Quantifier => Quantifier::cast(node).map(Expr::Quantifier),
            SyntaxKind::Alt => Alt::cast(node).map(Expr::Alt),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Anchor => Anchor::cast(node).map(Expr::Anchor),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Tree(n) => n.as_cst(),
            Expr::Str(n) => n.as_cst(),
            Expr::Wildcard(n) => n.as_cst(),
            Expr::Field(n) => n.as_cst(),
            Expr::NegatedField(n) => n.as_cst(),
            Expr::Capture(n) => n.as_cst(),
            Expr::Quantifier(n) => n.as_cst(),
            Expr::Alt(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Anchor(n) => n.as_cst(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.as_cst().text_range()
    }
}

impl Root {
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.0.children().filter_map(Rule::cast)
    }
}

impl Rule {
    pub fn pattern(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// Every predicate of the rule in source order, wherever it is nested.
    pub fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.0.descendants().filter_map(Predicate::cast)
    }
}

impl Tree {
    /// Node kind, or `None` for `(_ ...)`.
    pub fn node_kind(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn is_wildcard(&self) -> bool {
        first_token(&self.0, SyntaxKind::Underscore).is_some()
    }

    pub fn children(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Group {
    pub fn children(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Alt {
    pub fn branches(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Str {
    /// Raw string content, escapes unresolved. `None` for `""`.
    pub fn value(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::StrVal)
    }
}

impl Field {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl NegatedField {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}

impl Capture {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Quantifier {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::Star | SyntaxKind::Plus | SyntaxKind::Question
                )
            })
    }
}

/// One predicate argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateArg {
    Capture(CaptureRef),
    Str(Str),
    Ident(SyntaxToken),
}

impl PredicateArg {
    pub fn text_range(&self) -> TextRange {
        match self {
            PredicateArg::Capture(c) => c.text_range(),
            PredicateArg::Str(s) => s.text_range(),
            PredicateArg::Ident(t) => t.text_range(),
        }
    }
}

impl Predicate {
    /// The `#name?` token.
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::PredicateName)
    }

    pub fn args(&self) -> impl Iterator<Item = PredicateArg> + '_ {
        self.0.children_with_tokens().filter_map(|it| match it {
            rowan::NodeOrToken::Node(node) => match node.kind() {
                SyntaxKind::CaptureRef => CaptureRef::cast(node).map(PredicateArg::Capture),
                SyntaxKind::Str => Str::cast(node).map(PredicateArg::Str),
                _ => None,
            },
            rowan::NodeOrToken::Token(token) => {
                (token.kind() == SyntaxKind::Id).then_some(PredicateArg::Ident(token))
            }
        })
    }
}

impl CaptureRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}
