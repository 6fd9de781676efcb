//! Match results handed to the indexer.

use std::borrow::Cow;
use std::ops::Range;

use indexmap::IndexMap;
use serde::Serialize;
use tagquery_core::{Point, TreeNode};

/// One node bound to a capture, with the span and text the indexer sees.
///
/// `byte_range`, points and `text` may differ from the node itself after
/// `select-adjacent!` (widened span) or `strip!` (edited text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedNode<'a> {
    pub kind: &'a str,
    /// Identity of the underlying node, from [`TreeNode::id`].
    #[serde(skip)]
    pub node_id: usize,
    pub byte_range: Range<usize>,
    pub start: Point,
    pub end: Point,
    pub text: Cow<'a, str>,
}

impl<'a> CapturedNode<'a> {
    pub(crate) fn new<N: TreeNode<'a>>(node: N, source: &'a str) -> Self {
        Self {
            kind: node.kind(),
            node_id: node.id(),
            byte_range: node.byte_range(),
            start: node.start_point(),
            end: node.end_point(),
            text: Cow::Borrowed(node.text(source).unwrap_or_default()),
        }
    }
}

/// A rule that matched, with its bound captures in declaration order.
///
/// Captures that bound no node are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult<'a> {
    pub rule_index: usize,
    pub captures: IndexMap<&'a str, Vec<CapturedNode<'a>>>,
    /// Properties attached by `#set!`.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<&'a str, Option<&'a str>>,
}

impl<'a> MatchResult<'a> {
    /// Nodes bound to `name`, empty when the capture did not bind.
    pub fn capture(&self, name: &str) -> &[CapturedNode<'a>] {
        self.captures.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.capture(name).iter().map(|c| c.text.as_ref()).collect()
    }

    /// Union of every captured span.
    pub fn byte_range(&self) -> Option<Range<usize>> {
        let mut spans = self.captures.values().flatten().map(|c| &c.byte_range);
        let first = spans.next()?.clone();
        Some(spans.fold(first, |acc, r| acc.start.min(r.start)..acc.end.max(r.end)))
    }
}
