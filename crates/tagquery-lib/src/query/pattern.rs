//! Compiled pattern representation.
//!
//! Lowering turns each rule's AST into a [`Sequence`] of [`Pattern`]s. Patterns
//! own their strings and carry no CST nodes, so a compiled query is `Send + Sync`.

use std::fmt::{self, Write};
use std::ops::Range;

use super::predicate::Predicate;

/// Index into a rule's capture name table.
pub type CaptureId = u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Captures binding every node this pattern consumes.
    pub captures: Vec<CaptureId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    Shape(Shape),
    /// Anonymous node with this exact type.
    Literal(String),
    /// Any node, named or anonymous.
    Wildcard,
    /// First matching branch wins.
    Alternation(Vec<Pattern>),
    Repetition {
        inner: Box<Pattern>,
        quantifier: Quantifier,
    },
    Sequence(Sequence),
}

/// `(kind field: value !field child*)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// `None` matches any named node.
    pub kind: Option<String>,
    pub fields: Vec<FieldConstraint>,
    pub negated_fields: Vec<String>,
    pub children: Sequence,
}

impl Shape {
    /// A shape that only inspects the node itself.
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty() && self.negated_fields.is_empty() && self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConstraint {
    pub name: String,
    pub value: Pattern,
}

/// Ordered sibling patterns with optional `.` anchors.
///
/// `anchors[i]` sits before `items[i]`; `anchors[items.len()]` is the trailing anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub items: Vec<Pattern>,
    pub anchors: Vec<bool>,
}

impl Sequence {
    pub fn new(items: Vec<Pattern>, anchors: Vec<bool>) -> Self {
        assert_eq!(
            anchors.len(),
            items.len() + 1,
            "sequence needs one anchor slot per gap"
        );
        Self { items, anchors }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.anchors.iter().any(|a| *a)
    }

    pub fn anchored_before(&self, index: usize) -> bool {
        self.anchors.get(index).copied().unwrap_or(false)
    }

    pub fn anchored_after(&self) -> bool {
        self.anchors.last().copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
}

impl Quantifier {
    pub fn min(self) -> usize {
        match self {
            Quantifier::OneOrMore => 1,
            Quantifier::ZeroOrMore | Quantifier::ZeroOrOne => 0,
        }
    }

    pub fn max(self) -> Option<usize> {
        match self {
            Quantifier::ZeroOrOne => Some(1),
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
            Quantifier::ZeroOrOne => "?",
        }
    }
}

/// One compiled rule: its top-level sequence, capture table and predicates.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub range: Range<usize>,
    pub pattern: Sequence,
    pub captures: Vec<String>,
    pub predicates: Vec<Predicate>,
}

impl CompiledRule {
    pub fn capture_name(&self, id: CaptureId) -> &str {
        &self.captures[id as usize]
    }

    /// Normalized s-expression form of the rule's pattern.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let printer = PatternPrinter { rule: self };
        // Writing into a String cannot fail.
        let _ = printer.write_sequence(&mut out, &self.pattern);
        out
    }
}

struct PatternPrinter<'r> {
    rule: &'r CompiledRule,
}

impl PatternPrinter<'_> {
    fn write_sequence(&self, w: &mut impl Write, seq: &Sequence) -> fmt::Result {
        for (i, item) in seq.items.iter().enumerate() {
            if i > 0 {
                w.write_char(' ')?;
            }
            if seq.anchored_before(i) {
                w.write_str(". ")?;
            }
            self.write_pattern(w, item)?;
        }
        if seq.anchored_after() {
            if !seq.items.is_empty() {
                w.write_char(' ')?;
            }
            w.write_char('.')?;
        }
        Ok(())
    }

    fn write_pattern(&self, w: &mut impl Write, pattern: &Pattern) -> fmt::Result {
        match &pattern.kind {
            PatternKind::Shape(shape) => {
                w.write_char('(')?;
                w.write_str(shape.kind.as_deref().unwrap_or("_"))?;
                for field in &shape.fields {
                    write!(w, " {}: ", field.name)?;
                    self.write_pattern(w, &field.value)?;
                }
                for name in &shape.negated_fields {
                    write!(w, " !{name}")?;
                }
                if !shape.children.is_empty() {
                    w.write_char(' ')?;
                    self.write_sequence(w, &shape.children)?;
                }
                w.write_char(')')?;
            }
            PatternKind::Literal(text) => write!(w, "{text:?}")?,
            PatternKind::Wildcard => w.write_char('_')?,
            PatternKind::Alternation(branches) => {
                w.write_char('[')?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        w.write_char(' ')?;
                    }
                    self.write_pattern(w, branch)?;
                }
                w.write_char(']')?;
            }
            PatternKind::Repetition { inner, quantifier } => {
                self.write_pattern(w, inner)?;
                w.write_str(quantifier.as_str())?;
            }
            PatternKind::Sequence(seq) => {
                w.write_char('(')?;
                self.write_sequence(w, seq)?;
                w.write_char(')')?;
            }
        }
        for id in &pattern.captures {
            write!(w, " @{}", self.rule.capture_name(*id))?;
        }
        Ok(())
    }
}
