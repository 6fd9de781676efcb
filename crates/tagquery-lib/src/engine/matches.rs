//! Lazy traversal producing match results.
//!
//! Rules run one after another. For each rule the tree is walked depth-first
//! with an explicit stack of sibling lists, so deep trees cannot overflow the
//! call stack and iteration can stop at any result.

use std::ops::Range;

use tagquery_core::{Child, TreeNode};

use super::matcher::Matcher;
use super::predicates::finish_match;
use super::result::MatchResult;
use super::trace::{NoopTracer, Tracer};
use crate::query::Query;

/// Narrows a traversal without changing what a match is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Only matches whose span intersects this range; subtrees outside it are skipped.
    pub byte_range: Option<Range<usize>>,
    /// Deepest level at which a match may begin. The root is depth 0.
    pub max_start_depth: Option<usize>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_range(mut self, range: Range<usize>) -> Self {
        self.byte_range = Some(range);
        self
    }

    pub fn with_max_start_depth(mut self, depth: usize) -> Self {
        self.max_start_depth = Some(depth);
        self
    }

    fn may_start(&self, depth: usize) -> bool {
        self.max_start_depth.is_none_or(|max| depth <= max)
    }

    fn intersects(&self, range: &Range<usize>) -> bool {
        match &self.byte_range {
            None => true,
            Some(wanted) => range.start < wanted.end && wanted.start < range.end,
        }
    }
}

/// One sibling list being scanned.
struct Frame<'a, N> {
    siblings: Vec<Child<'a, N>>,
    depth: usize,
    /// Sibling to visit next.
    next: usize,
    /// Whether the rule was already tried at `next`.
    tried: bool,
    /// Siblings before this index belong to an accepted match.
    resume: usize,
}

impl<'a, N> Frame<'a, N> {
    fn new(siblings: Vec<Child<'a, N>>, depth: usize) -> Self {
        Self {
            siblings,
            depth,
            next: 0,
            tried: false,
            resume: 0,
        }
    }
}

/// Iterator over the matches of a query in a tree.
///
/// Results are ordered by rule, then by the tree position of their first node.
/// Created by [`Query::matches`].
pub struct Matches<'a, N, R = NoopTracer> {
    query: &'a Query,
    root: N,
    source: &'a str,
    options: MatchOptions,
    tracer: R,
    rule_index: usize,
    started: bool,
    stack: Vec<Frame<'a, N>>,
}

impl<'a, N: TreeNode<'a>, R: Tracer> Matches<'a, N, R> {
    pub(crate) fn new(
        query: &'a Query,
        root: N,
        source: &'a str,
        options: MatchOptions,
        tracer: R,
    ) -> Self {
        Self {
            query,
            root,
            source,
            options,
            tracer,
            rule_index: 0,
            started: false,
            stack: Vec::new(),
        }
    }

    pub fn tracer(&self) -> &R {
        &self.tracer
    }

    pub fn into_tracer(self) -> R {
        self.tracer
    }
}

impl<'a, N: TreeNode<'a>, R: Tracer> Iterator for Matches<'a, N, R> {
    type Item = MatchResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query;
        let rules = query.rules();

        while let Some(rule) = rules.get(self.rule_index) {
            if !self.started {
                self.started = true;
                self.tracer.trace_rule(self.rule_index);
                let root = Child {
                    field: None,
                    node: self.root,
                };
                self.stack.push(Frame::new(vec![root], 0));
            }

            let Some(frame) = self.stack.last_mut() else {
                self.rule_index += 1;
                self.started = false;
                continue;
            };

            let index = frame.next;
            let Some(child) = frame.siblings.get(index).copied() else {
                self.stack.pop();
                continue;
            };

            if !frame.tried {
                frame.tried = true;
                if index < frame.resume || !self.options.may_start(frame.depth) {
                    continue;
                }

                self.tracer.trace_candidate(self.rule_index, child.node);
                let mut matcher = Matcher::new(rule, &mut self.tracer);
                let Some(end) = matcher.match_rule_at(&frame.siblings, index) else {
                    continue;
                };

                let bindings = matcher.into_bindings();
                let Some(result) =
                    finish_match(self.rule_index, rule, bindings, self.source, &mut self.tracer)
                else {
                    continue;
                };
                frame.resume = end;

                let span = child.node.byte_range().start
                    ..frame.siblings[end - 1].node.byte_range().end;
                if self.options.intersects(&span) {
                    self.tracer.trace_emit(self.rule_index);
                    return Some(result);
                }
                continue;
            }

            frame.next += 1;
            frame.tried = false;
            let depth = frame.depth + 1;
            if self.options.may_start(depth) && self.options.intersects(&child.node.byte_range())
            {
                let children = child.node.children();
                if !children.is_empty() {
                    self.stack.push(Frame::new(children, depth));
                }
            }
        }

        None
    }
}
