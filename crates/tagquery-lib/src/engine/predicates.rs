//! Predicate evaluation over a structural match.
//!
//! Predicates run in declaration order. Gating predicates read node text
//! straight from the source, so an earlier `strip!` never changes their
//! outcome.

use std::borrow::Cow;

use indexmap::IndexMap;
use tagquery_core::TreeNode;

use super::result::{CapturedNode, MatchResult};
use super::trace::Tracer;
use crate::query::{CaptureId, CompiledRule, Operand, Predicate};

/// Applies the rule's predicates to `bindings` and assembles the result.
///
/// Returns `None` when a gating predicate fails.
pub(crate) fn finish_match<'a, N: TreeNode<'a>, R: Tracer>(
    rule_index: usize,
    rule: &'a CompiledRule,
    bindings: Vec<(CaptureId, N)>,
    source: &'a str,
    tracer: &mut R,
) -> Option<MatchResult<'a>> {
    let mut nodes: Vec<Vec<N>> = vec![Vec::new(); rule.captures.len()];
    for (id, node) in bindings {
        nodes[id as usize].push(node);
    }
    for list in &mut nodes {
        list.sort_by_key(|n| n.byte_range().start);
        list.dedup_by_key(|n| n.id());
    }

    let mut exposed: Vec<Vec<CapturedNode<'a>>> = nodes
        .iter()
        .map(|list| list.iter().map(|n| CapturedNode::new(*n, source)).collect())
        .collect();
    let mut properties = IndexMap::new();

    for predicate in &rule.predicates {
        let passed = match predicate {
            Predicate::Eq {
                capture,
                operand,
                negated,
                any,
            } => {
                let rhs = match operand {
                    Operand::Text(text) => Some(text.as_str()),
                    Operand::Capture(other) => {
                        nodes[*other as usize].first().map(|n| node_text(*n, source))
                    }
                };
                match rhs {
                    Some(rhs) => quantified(&nodes[*capture as usize], *any, |n| {
                        (node_text(n, source) == rhs) != *negated
                    }),
                    None => true,
                }
            }
            Predicate::Match {
                capture,
                regex,
                negated,
                any,
            } => quantified(&nodes[*capture as usize], *any, |n| {
                regex.is_match(node_text(n, source)) != *negated
            }),
            Predicate::AnyOf {
                capture,
                values,
                negated,
            } => quantified(&nodes[*capture as usize], false, |n| {
                let text = node_text(n, source);
                values.iter().any(|v| v == text) != *negated
            }),
            Predicate::SelectAdjacent { first, second } => {
                let (first, second) = (*first as usize, *second as usize);
                match (nodes[first].last().copied(), nodes[second].first().copied()) {
                    (Some(tail), Some(target)) => {
                        let adjacent = are_adjacent(tail, target);
                        if adjacent {
                            let run = adjacent_run(&nodes[first]);
                            nodes[first].drain(..run);
                            exposed[first].drain(..run);
                            widen(&mut exposed[second], nodes[first][0], source);
                        }
                        adjacent
                    }
                    _ => true,
                }
            }
            Predicate::Strip { capture, regex } => {
                for captured in &mut exposed[*capture as usize] {
                    captured.text = Cow::Owned(regex.strip(&captured.text));
                }
                true
            }
            Predicate::Set { key, value } => {
                properties.insert(key.as_str(), value.as_deref());
                true
            }
        };

        tracer.trace_predicate(predicate.name(), passed);
        if !passed && predicate.is_gating() {
            return None;
        }
    }

    let mut captures = IndexMap::new();
    for (id, list) in exposed.into_iter().enumerate() {
        if !list.is_empty() {
            captures.insert(rule.captures[id].as_str(), list);
        }
    }

    Some(MatchResult {
        rule_index,
        captures,
        properties,
    })
}

fn node_text<'a, N: TreeNode<'a>>(node: N, source: &'a str) -> &'a str {
    node.text(source).unwrap_or_default()
}

/// Every node satisfies `check`, or with `any`, at least one does.
fn quantified<'a, N: TreeNode<'a>>(nodes: &[N], any: bool, check: impl Fn(N) -> bool) -> bool {
    if any {
        nodes.iter().any(|n| check(*n))
    } else {
        nodes.iter().all(|n| check(*n))
    }
}

/// `b` follows `a` under the same parent with only anonymous siblings
/// between, and no blank line anywhere along the way.
fn are_adjacent<'a, N: TreeNode<'a>>(a: N, b: N) -> bool {
    let mut prev = a;
    while let Some(node) = prev.next_sibling() {
        if prev.end_point().row + 1 < node.start_point().row {
            return false;
        }
        if node.id() == b.id() {
            return true;
        }
        if node.is_named() {
            return false;
        }
        prev = node;
    }
    false
}

/// Index where the trailing run of mutually adjacent nodes begins.
fn adjacent_run<'a, N: TreeNode<'a>>(nodes: &[N]) -> usize {
    let mut start = nodes.len().saturating_sub(1);
    while start > 0 && are_adjacent(nodes[start - 1], nodes[start]) {
        start -= 1;
    }
    start
}

/// Stretches each captured span back to `head` and re-slices its text.
fn widen<'a, N: TreeNode<'a>>(captured: &mut [CapturedNode<'a>], head: N, source: &'a str) {
    let start = head.byte_range().start;
    for node in captured {
        if start >= node.byte_range.start {
            continue;
        }
        node.byte_range.start = start;
        node.start = head.start_point();
        node.text = Cow::Borrowed(source.get(node.byte_range.clone()).unwrap_or_default());
    }
}
