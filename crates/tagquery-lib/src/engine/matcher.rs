//! Structural matcher.
//!
//! Unifies one rule's patterns with a sibling list. Matching is greedy and
//! never backtracks: an alternation commits to its first matching branch and
//! a repetition keeps every node it consumed.
//!
//! Every successful pattern reports the sibling indices it consumed. A capture
//! binds exactly those nodes, so a capture on a repetition binds each repeated
//! node and a capture on a group binds each node of the group.

use std::marker::PhantomData;

use tagquery_core::{Child, TreeNode};

use super::trace::Tracer;
use crate::query::{
    CaptureId, CompiledRule, Pattern, PatternKind, Quantifier, Sequence, Shape,
};

/// How an item of a sequence may be placed relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Must start exactly at the position, unless it consumes nothing.
    Pinned,
    /// May skip anonymous siblings only (`.` anchor).
    Adjacent,
    /// May skip any siblings.
    Scan,
}

#[derive(Debug, Clone, Copy)]
struct SequenceMatch {
    /// First consumed sibling, `None` when the sequence consumed nothing.
    first: Option<usize>,
    end: usize,
}

/// Rollback point: lengths of the binding and consumed lists.
type Mark = (usize, usize);

pub(crate) struct Matcher<'a, 'r, 'x, N, R> {
    rule: &'r CompiledRule,
    tracer: &'x mut R,
    bindings: Vec<(CaptureId, N)>,
    _tree: PhantomData<&'a ()>,
}

impl<'a, 'r, 'x, N: TreeNode<'a>, R: Tracer> Matcher<'a, 'r, 'x, N, R> {
    pub fn new(rule: &'r CompiledRule, tracer: &'x mut R) -> Self {
        Self {
            rule,
            tracer,
            bindings: Vec::new(),
            _tree: PhantomData,
        }
    }

    /// Tries the rule with its first consumed node pinned to `siblings[start]`.
    ///
    /// Returns one past the last consumed sibling. A rule that would consume
    /// nothing does not match.
    pub fn match_rule_at(&mut self, siblings: &[Child<'a, N>], start: usize) -> Option<usize> {
        self.bindings.clear();
        let rule = self.rule;
        let mut consumed = Vec::new();
        let m = self.match_sequence(&rule.pattern, siblings, start, true, &mut consumed)?;
        (m.first == Some(start)).then_some(m.end)
    }

    /// Every `(capture, node)` pair bound by the last successful match.
    pub fn into_bindings(self) -> Vec<(CaptureId, N)> {
        self.bindings
    }

    fn mark(&self, consumed: &[usize]) -> Mark {
        (self.bindings.len(), consumed.len())
    }

    fn reset(&mut self, mark: Mark, consumed: &mut Vec<usize>) {
        self.bindings.truncate(mark.0);
        consumed.truncate(mark.1);
    }

    fn match_sequence(
        &mut self,
        seq: &Sequence,
        siblings: &[Child<'a, N>],
        from: usize,
        pinned: bool,
        consumed: &mut Vec<usize>,
    ) -> Option<SequenceMatch> {
        let mark = self.mark(consumed);
        let mut pos = from;
        let mut first = None;

        for (i, item) in seq.items.iter().enumerate() {
            let placement = if pinned && first.is_none() {
                Placement::Pinned
            } else if seq.anchored_before(i) {
                Placement::Adjacent
            } else {
                Placement::Scan
            };

            let last = seq.anchored_after() && i + 1 == seq.items.len();
            let Some((start, end)) =
                self.match_item(item, siblings, pos, placement, last, consumed)
            else {
                self.reset(mark, consumed);
                return None;
            };
            if end > start && first.is_none() {
                first = Some(start);
            }
            pos = end;
        }

        if seq.anchored_after() && !at_tail(siblings, pos) {
            self.reset(mark, consumed);
            return None;
        }

        Some(SequenceMatch { first, end: pos })
    }

    /// Places one sequence item at or after `pos`. Returns its `(start, end)`.
    ///
    /// An item that can match empty only does so at `pos`, after no consuming
    /// placement was found. With `last`, a placement must leave no named
    /// sibling after it.
    fn match_item(
        &mut self,
        item: &Pattern,
        siblings: &[Child<'a, N>],
        pos: usize,
        placement: Placement,
        last: bool,
        consumed: &mut Vec<usize>,
    ) -> Option<(usize, usize)> {
        if placement == Placement::Pinned {
            return self
                .match_pattern(item, siblings, pos, consumed)
                .map(|end| (pos, end));
        }

        let mut empty_at_pos = false;
        let mut at = pos;
        loop {
            let mark = self.mark(consumed);
            match self.match_pattern(item, siblings, at, consumed) {
                Some(end) if end > at && (!last || at_tail(siblings, end)) => {
                    return Some((at, end));
                }
                Some(end) => {
                    self.reset(mark, consumed);
                    empty_at_pos |= end == at && at == pos;
                }
                None => {}
            }
            let Some(child) = siblings.get(at) else {
                break;
            };
            if placement == Placement::Adjacent && child.node.is_named() {
                break;
            }
            at += 1;
        }

        empty_at_pos.then_some((pos, pos))
    }

    /// Matches `pattern` starting exactly at `siblings[pos]` and binds its captures.
    ///
    /// On failure, bindings and consumed indices are rolled back.
    fn match_pattern(
        &mut self,
        pattern: &Pattern,
        siblings: &[Child<'a, N>],
        pos: usize,
        consumed: &mut Vec<usize>,
    ) -> Option<usize> {
        let mark = self.mark(consumed);
        let Some(end) = self.match_kind(&pattern.kind, siblings, pos, consumed) else {
            self.reset(mark, consumed);
            return None;
        };

        for &id in &pattern.captures {
            for &index in &consumed[mark.1..] {
                self.bindings.push((id, siblings[index].node));
            }
        }
        Some(end)
    }

    fn match_kind(
        &mut self,
        kind: &PatternKind,
        siblings: &[Child<'a, N>],
        pos: usize,
        consumed: &mut Vec<usize>,
    ) -> Option<usize> {
        match kind {
            PatternKind::Shape(shape) => {
                let node = siblings.get(pos)?.node;
                if !self.match_shape(shape, node) {
                    return None;
                }
                consumed.push(pos);
                Some(pos + 1)
            }
            PatternKind::Literal(text) => {
                let node = siblings.get(pos)?.node;
                if node.is_named() || node.kind() != text {
                    return None;
                }
                consumed.push(pos);
                Some(pos + 1)
            }
            PatternKind::Wildcard => {
                siblings.get(pos)?;
                consumed.push(pos);
                Some(pos + 1)
            }
            PatternKind::Alternation(branches) => branches
                .iter()
                .find_map(|branch| self.match_pattern(branch, siblings, pos, consumed)),
            PatternKind::Repetition { inner, quantifier } => {
                self.match_repetition(inner, *quantifier, siblings, pos, consumed)
            }
            PatternKind::Sequence(seq) => self
                .match_sequence(seq, siblings, pos, true, consumed)
                .map(|m| m.end),
        }
    }

    fn match_repetition(
        &mut self,
        inner: &Pattern,
        quantifier: Quantifier,
        siblings: &[Child<'a, N>],
        pos: usize,
        consumed: &mut Vec<usize>,
    ) -> Option<usize> {
        let mut end = pos;
        let mut count = 0;
        while quantifier.max().is_none_or(|max| count < max) {
            let Some(next) = self.repeat_once(inner, siblings, end, count > 0, consumed) else {
                break;
            };
            end = next;
            count += 1;
        }
        (count >= quantifier.min()).then_some(end)
    }

    /// One more repetition at `from`, skipping anonymous siblings between repeats.
    fn repeat_once(
        &mut self,
        inner: &Pattern,
        siblings: &[Child<'a, N>],
        from: usize,
        skip_anonymous: bool,
        consumed: &mut Vec<usize>,
    ) -> Option<usize> {
        let mut at = from;
        loop {
            let mark = self.mark(consumed);
            match self.match_pattern(inner, siblings, at, consumed) {
                Some(end) if end > at => return Some(end),
                // No progress: stop instead of looping forever.
                Some(_) => {
                    self.reset(mark, consumed);
                    return None;
                }
                None => {}
            }
            let child = siblings.get(at)?;
            if !skip_anonymous || child.node.is_named() {
                return None;
            }
            at += 1;
        }
    }

    fn match_shape(&mut self, shape: &Shape, node: N) -> bool {
        let kind_matches =
            node.is_named() && shape.kind.as_deref().is_none_or(|kind| node.kind() == kind);
        if !kind_matches {
            self.tracer.trace_match_failure(node);
            return false;
        }
        self.tracer.trace_match_success(node);

        if shape.is_leaf() {
            return true;
        }

        let children = node.children();

        for name in &shape.negated_fields {
            if children.iter().any(|c| c.field == Some(name.as_str())) {
                self.tracer.trace_field_failure(name, node);
                return false;
            }
        }

        for field in &shape.fields {
            if !self.match_field(&field.name, &field.value, &children) {
                self.tracer.trace_field_failure(&field.name, node);
                return false;
            }
        }

        let mut consumed = Vec::new();
        self.match_sequence(&shape.children, &children, 0, false, &mut consumed)
            .is_some()
    }

    /// The first child in field `name` that `value` matches as a whole.
    fn match_field(&mut self, name: &str, value: &Pattern, children: &[Child<'a, N>]) -> bool {
        let mut consumed = Vec::new();
        for (i, child) in children.iter().enumerate() {
            if child.field != Some(name) {
                continue;
            }
            let mark = self.mark(&consumed);
            if self.match_pattern(value, children, i, &mut consumed) == Some(i + 1) {
                return true;
            }
            self.reset(mark, &mut consumed);
        }
        false
    }
}

/// No named sibling at or after `pos`.
fn at_tail<'a, N: TreeNode<'a>>(siblings: &[Child<'a, N>], pos: usize) -> bool {
    siblings[pos..].iter().all(|c| !c.node.is_named())
}
