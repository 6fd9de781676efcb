//! AST to pattern lowering.
//!
//! Each rule is lowered independently: its capture table is built first (in
//! source order), then its pattern, then its predicates. Semantic problems are
//! reported to the shared diagnostics; the returned rules are only usable when
//! no diagnostic was reported.

use indexmap::IndexMap;
use rowan::NodeOrToken;

use super::pattern::{
    CaptureId, CompiledRule, FieldConstraint, Pattern, PatternKind, Quantifier, Sequence, Shape,
};
use super::predicate::{lower_predicate, lower_string};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::{self, Expr, Root, SyntaxKind};

pub fn lower_root(root: &Root, diag: &mut Diagnostics) -> Vec<CompiledRule> {
    root.rules()
        .filter_map(|rule| RuleLowering::new(&rule, diag).lower(&rule))
        .collect()
}

struct RuleLowering<'d> {
    captures: IndexMap<String, CaptureId>,
    diag: &'d mut Diagnostics,
}

impl<'d> RuleLowering<'d> {
    fn new(rule: &parser::Rule, diag: &'d mut Diagnostics) -> Self {
        let mut captures = IndexMap::new();
        for element in rule.as_cst().descendants_with_tokens() {
            let NodeOrToken::Token(token) = element else {
                continue;
            };
            let in_capture = token
                .parent()
                .is_some_and(|p| p.kind() == SyntaxKind::Capture);
            if token.kind() == SyntaxKind::Id && in_capture {
                let next = captures.len() as CaptureId;
                captures.entry(token.text().to_string()).or_insert(next);
            }
        }
        Self { captures, diag }
    }

    fn lower(mut self, rule: &parser::Rule) -> Option<CompiledRule> {
        // A rule without a pattern only exists after a parse error.
        let pattern = rule.pattern()?;
        let pattern = match &pattern {
            Expr::Group(group) => self.lower_sequence(group.children()),
            _ => self
                .lower_expr(&pattern)
                .map(|p| Sequence::new(vec![p], vec![false, false])),
        };

        let predicates: Vec<_> = rule
            .predicates()
            .map(|pred| lower_predicate(&pred, &self.captures, self.diag))
            .collect();

        let pattern = pattern?;
        let predicates = predicates.into_iter().collect::<Option<Vec<_>>>()?;
        let range = rule.text_range();
        Some(CompiledRule {
            range: u32::from(range.start()) as usize..u32::from(range.end()) as usize,
            pattern,
            captures: self.captures.into_keys().collect(),
            predicates,
        })
    }

    fn lower_expr(&mut self, expr: &Expr) -> Option<Pattern> {
        let kind = match expr {
            Expr::Tree(tree) => PatternKind::Shape(self.lower_tree(tree)?),
            Expr::Str(s) => PatternKind::Literal(lower_string(s, self.diag)?),
            Expr::Wildcard(_) => PatternKind::Wildcard,
            Expr::Alt(alt) => {
                let branches: Vec<_> = alt
                    .branches()
                    .map(|b| self.lower_expr(&b))
                    .collect();
                PatternKind::Alternation(branches.into_iter().collect::<Option<Vec<_>>>()?)
            }
            Expr::Group(group) => {
                PatternKind::Sequence(self.lower_sequence(group.children())?)
            }
            Expr::Quantifier(q) => {
                let inner = q.inner()?;
                if let Some(field) = peel_field(&inner) {
                    let name = field.name().map(|t| t.text().to_string());
                    let report = self
                        .diag
                        .report(DiagnosticKind::QuantifiedField, q.text_range());
                    match name {
                        Some(name) => report.message(name).emit(),
                        None => report.emit(),
                    }
                    return None;
                }
                let quantifier = match q.operator()?.kind() {
                    SyntaxKind::Star => Quantifier::ZeroOrMore,
                    SyntaxKind::Plus => Quantifier::OneOrMore,
                    _ => Quantifier::ZeroOrOne,
                };
                let inner = self.lower_expr(&inner)?;
                PatternKind::Repetition {
                    inner: Box::new(inner),
                    quantifier,
                }
            }
            Expr::Capture(capture) => {
                let inner = capture.inner()?;
                let mut pattern = self.lower_expr(&inner)?;
                if let Some(id) = self.capture_id(capture) {
                    pattern.captures.push(id);
                }
                return Some(pattern);
            }
            Expr::Field(field) => {
                self.report_field_outside_node(field.text_range(), field.name());
                return None;
            }
            Expr::NegatedField(field) => {
                self.report_field_outside_node(field.text_range(), field.name());
                return None;
            }
            Expr::Anchor(anchor) => {
                self.diag
                    .report(DiagnosticKind::AnchorOutsideNode, anchor.text_range())
                    .emit();
                return None;
            }
        };
        Some(Pattern {
            kind,
            captures: Vec::new(),
        })
    }

    fn lower_tree(&mut self, tree: &parser::Tree) -> Option<Shape> {
        let kind = match tree.node_kind() {
            Some(token) => Some(token.text().to_string()),
            None if tree.is_wildcard() => None,
            // `()` was reported by the parser.
            None => return None,
        };

        let mut fields = Vec::new();
        let mut negated_fields = Vec::new();
        let mut rest = Vec::new();
        let mut ok = true;

        for child in tree.children() {
            if let Expr::NegatedField(neg) = &child {
                match neg.name() {
                    Some(name) => negated_fields.push(name.text().to_string()),
                    None => ok = false,
                }
            } else if peel_field(&child).is_some() {
                match self.lower_field(&child) {
                    Some(field) => fields.push(field),
                    None => ok = false,
                }
            } else {
                rest.push(child);
            }
        }

        let children = self.lower_sequence(rest.into_iter());
        if !ok {
            return None;
        }
        Some(Shape {
            kind,
            fields,
            negated_fields,
            children: children?,
        })
    }

    /// `field: value`, possibly wrapped in captures that bind the value.
    fn lower_field(&mut self, expr: &Expr) -> Option<FieldConstraint> {
        let field = peel_field(expr)?;
        let name = field.name()?.text().to_string();
        let value = field.value()?;

        let mut value = match &value {
            Expr::Group(group) => {
                self.diag
                    .report(DiagnosticKind::FieldSequenceValue, group.text_range())
                    .message(&name)
                    .emit();
                return None;
            }
            _ => self.lower_expr(&value)?,
        };

        // Captures written after the field bind its value, innermost first.
        let mut wrappers = Vec::new();
        let mut current = expr.clone();
        while let Expr::Capture(capture) = current {
            current = capture.inner()?;
            wrappers.push(capture);
        }
        for capture in wrappers.iter().rev() {
            if let Some(id) = self.capture_id(capture) {
                value.captures.push(id);
            }
        }

        Some(FieldConstraint { name, value })
    }

    /// Lowers sibling patterns, folding `.` anchors into the gaps between them.
    fn lower_sequence(&mut self, children: impl Iterator<Item = Expr>) -> Option<Sequence> {
        let mut items = Vec::new();
        let mut anchors = vec![false];
        let mut ok = true;

        for child in children {
            if let Expr::Anchor(_) = child {
                if let Some(last) = anchors.last_mut() {
                    *last = true;
                }
                continue;
            }
            match self.lower_expr(&child) {
                Some(p) => {
                    items.push(p);
                    anchors.push(false);
                }
                None => ok = false,
            }
        }

        ok.then(|| Sequence::new(items, anchors))
    }

    fn capture_id(&self, capture: &parser::Capture) -> Option<CaptureId> {
        let name = capture.name()?;
        self.captures.get(name.text()).copied()
    }

    fn report_field_outside_node(
        &mut self,
        range: rowan::TextRange,
        name: Option<parser::SyntaxToken>,
    ) {
        let report = self.diag.report(DiagnosticKind::FieldOutsideNode, range);
        match name {
            Some(name) => report.message(format!("`{}`", name.text())).emit(),
            None => report.emit(),
        }
    }
}

/// The field under any number of captures, if `expr` is one.
fn peel_field(expr: &Expr) -> Option<parser::Field> {
    match expr {
        Expr::Field(field) => Some(field.clone()),
        Expr::Capture(capture) => peel_field(&capture.inner()?),
        _ => None,
    }
}
