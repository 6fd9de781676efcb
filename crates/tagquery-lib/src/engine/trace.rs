//! Instrumentation hooks for the matcher.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The matcher is generic over its tracer. With `NoopTracer` every hook is an
//! `#[inline(always)]` empty function and the calls compile away. `LogTracer`
//! forwards the same events to `tracing`.

use tagquery_core::TreeNode;

/// Tracer trait for matcher instrumentation.
///
/// Hooks receive the raw data the matcher already has; formatting happens
/// in the implementation.
pub trait Tracer {
    /// Called when traversal for a rule begins.
    fn trace_rule(&mut self, rule_index: usize);

    /// Called before a rule is tried at a sibling position.
    fn trace_candidate<'t, N: TreeNode<'t>>(&mut self, rule_index: usize, node: N);

    /// Called after a node passes a shape's type check.
    fn trace_match_success<'t, N: TreeNode<'t>>(&mut self, node: N);

    /// Called after a node fails a shape's type check.
    fn trace_match_failure<'t, N: TreeNode<'t>>(&mut self, node: N);

    /// Called when no child of `node` satisfies a field constraint.
    fn trace_field_failure<'t, N: TreeNode<'t>>(&mut self, field: &str, node: N);

    /// Called after a predicate is evaluated.
    fn trace_predicate(&mut self, name: &'static str, passed: bool);

    /// Called when a result is about to be yielded.
    fn trace_emit(&mut self, rule_index: usize);
}

/// No-op tracer that gets optimized away completely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_rule(&mut self, _rule_index: usize) {}

    #[inline(always)]
    fn trace_candidate<'t, N: TreeNode<'t>>(&mut self, _rule_index: usize, _node: N) {}

    #[inline(always)]
    fn trace_match_success<'t, N: TreeNode<'t>>(&mut self, _node: N) {}

    #[inline(always)]
    fn trace_match_failure<'t, N: TreeNode<'t>>(&mut self, _node: N) {}

    #[inline(always)]
    fn trace_field_failure<'t, N: TreeNode<'t>>(&mut self, _field: &str, _node: N) {}

    #[inline(always)]
    fn trace_predicate(&mut self, _name: &'static str, _passed: bool) {}

    #[inline(always)]
    fn trace_emit(&mut self, _rule_index: usize) {}
}

/// Forwards matcher events to `tracing`: rule, predicate and emit events at
/// `debug`, per-node checks at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer {
    candidates: usize,
    emitted: usize,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions tried so far, across all rules.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl Tracer for LogTracer {
    fn trace_rule(&mut self, rule_index: usize) {
        tracing::debug!(rule = rule_index, "matching rule");
    }

    fn trace_candidate<'t, N: TreeNode<'t>>(&mut self, rule_index: usize, node: N) {
        self.candidates += 1;
        tracing::trace!(
            rule = rule_index,
            kind = node.kind(),
            start = node.byte_range().start,
            "candidate"
        );
    }

    fn trace_match_success<'t, N: TreeNode<'t>>(&mut self, node: N) {
        tracing::trace!(kind = node.kind(), range = ?node.byte_range(), "shape matched");
    }

    fn trace_match_failure<'t, N: TreeNode<'t>>(&mut self, node: N) {
        tracing::trace!(kind = node.kind(), range = ?node.byte_range(), "shape rejected");
    }

    fn trace_field_failure<'t, N: TreeNode<'t>>(&mut self, field: &str, node: N) {
        tracing::trace!(field, kind = node.kind(), "field constraint failed");
    }

    fn trace_predicate(&mut self, name: &'static str, passed: bool) {
        tracing::debug!(predicate = name, passed, "predicate evaluated");
    }

    fn trace_emit(&mut self, rule_index: usize) {
        self.emitted += 1;
        tracing::debug!(rule = rule_index, "match");
    }
}
