//! Arena-backed syntax tree.
//!
//! Used for fixtures, for trees produced by parsers other than tree-sitter,
//! and for shipping a tree across threads without a parser in scope.

use std::fmt;
use std::ops::Range;

use serde::Deserialize;

use crate::{Child, Point, SyntaxTree, TreeNode};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("tree has no root node")]
    EmptyTree,

    #[error("second root node `{kind}`; a tree has exactly one root")]
    MultipleRoots { kind: String },

    #[error("`finish` called with no open node")]
    UnbalancedFinish,

    #[error("node `{kind}` was never finished")]
    UnclosedNode { kind: String },

    #[error("field `{field}` was not followed by a node")]
    DanglingField { field: String },

    #[error("invalid tree description: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: String,
    named: bool,
    field: Option<String>,
    range: Range<usize>,
    start: Point,
    end: Point,
    parent: Option<usize>,
    /// Position within the parent's child list.
    slot: usize,
    children: Vec<usize>,
}

/// Syntax tree owning all of its nodes. Node 0 is the root.
#[derive(Debug, Clone, Default)]
pub struct OwnedTree {
    nodes: Vec<NodeData>,
}

impl OwnedTree {
    /// A tree with no nodes at all; [`SyntaxTree::root`] returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds a tree from a JSON description (see [`NodeSpec`]).
    pub fn from_json(source: &str, json: &str) -> Result<Self, TreeError> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(source, &spec))
    }

    pub fn from_spec(source: &str, spec: &NodeSpec) -> Self {
        let mut builder = TreeBuilder::new(source);
        builder.push_spec(spec, None);
        // A spec always describes exactly one balanced root.
        Self {
            nodes: builder.nodes,
        }
    }

    fn node(&self, index: usize) -> OwnedNode<'_> {
        OwnedNode { tree: self, index }
    }
}

impl SyntaxTree for OwnedTree {
    type Node<'t> = OwnedNode<'t>;

    fn root(&self) -> Option<OwnedNode<'_>> {
        (!self.nodes.is_empty()).then(|| self.node(0))
    }
}

/// Handle to one node of an [`OwnedTree`].
#[derive(Clone, Copy)]
pub struct OwnedNode<'t> {
    tree: &'t OwnedTree,
    index: usize,
}

impl<'t> OwnedNode<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.index]
    }

    /// Field this node is reachable through from its parent.
    pub fn field(&self) -> Option<&'t str> {
        self.data().field.as_deref()
    }
}

impl PartialEq for OwnedNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for OwnedNode<'_> {}

impl fmt::Debug for OwnedNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        write!(f, "{}@{}..{}", data.kind, data.range.start, data.range.end)
    }
}

impl<'t> TreeNode<'t> for OwnedNode<'t> {
    fn id(&self) -> usize {
        self.index
    }

    fn kind(&self) -> &'t str {
        &self.data().kind
    }

    fn is_named(&self) -> bool {
        self.data().named
    }

    fn byte_range(&self) -> Range<usize> {
        self.data().range.clone()
    }

    fn start_point(&self) -> Point {
        self.data().start
    }

    fn end_point(&self) -> Point {
        self.data().end
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| self.tree.node(index))
    }

    fn next_sibling(&self) -> Option<Self> {
        let data = self.data();
        let parent = &self.tree.nodes[data.parent?];
        parent
            .children
            .get(data.slot + 1)
            .map(|&index| self.tree.node(index))
    }

    fn children(&self) -> Vec<Child<'t, Self>> {
        self.data()
            .children
            .iter()
            .map(|&index| {
                let node = self.tree.node(index);
                Child {
                    field: node.field(),
                    node,
                }
            })
            .collect()
    }
}

// ============================================================================
// JSON description
// ============================================================================

/// Serialized node description accepted by [`OwnedTree::from_json`].
///
/// ```json
/// { "kind": "module", "start": 0, "end": 14, "children": [
///     { "kind": "module", "named": false, "start": 0, "end": 6 },
///     { "kind": "constant", "field": "name", "start": 7, "end": 10 },
///     { "kind": "end", "named": false, "start": 11, "end": 14 } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    #[serde(default = "default_named")]
    pub named: bool,
    #[serde(default)]
    pub field: Option<String>,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_named() -> bool {
    true
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental construction of an [`OwnedTree`] from byte ranges.
///
/// Methods chain; the first structural mistake is remembered and reported by
/// [`TreeBuilder::build`]. Ranges are taken as given: bounds are checked when
/// a tree is matched, not here.
pub struct TreeBuilder<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
    nodes: Vec<NodeData>,
    open: Vec<usize>,
    pending_field: Option<String>,
    error: Option<TreeError>,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
            nodes: Vec::new(),
            open: Vec::new(),
            pending_field: None,
            error: None,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Puts the next node into field `name` of the current parent.
    pub fn field(mut self, name: &str) -> Self {
        self.pending_field = Some(name.to_owned());
        self
    }

    /// Opens a named node; children follow until [`TreeBuilder::finish`].
    pub fn start(mut self, kind: &str, range: Range<usize>) -> Self {
        if let Some(index) = self.push(kind, true, range) {
            self.open.push(index);
        }
        self
    }

    /// Named node without children.
    pub fn leaf(mut self, kind: &str, range: Range<usize>) -> Self {
        self.push(kind, true, range);
        self
    }

    /// Anonymous (literal) token.
    pub fn token(mut self, kind: &str, range: Range<usize>) -> Self {
        self.push(kind, false, range);
        self
    }

    /// Closes the innermost open node.
    pub fn finish(mut self) -> Self {
        if self.open.pop().is_none() {
            self.fail(TreeError::UnbalancedFinish);
        }
        self
    }

    pub fn build(mut self) -> Result<OwnedTree, TreeError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if let Some(field) = self.pending_field.take() {
            return Err(TreeError::DanglingField { field });
        }
        if let Some(&index) = self.open.last() {
            return Err(TreeError::UnclosedNode {
                kind: self.nodes[index].kind.clone(),
            });
        }
        if self.nodes.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        Ok(OwnedTree { nodes: self.nodes })
    }

    fn fail(&mut self, error: TreeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn push(&mut self, kind: &str, named: bool, range: Range<usize>) -> Option<usize> {
        let parent = self.open.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            self.fail(TreeError::MultipleRoots {
                kind: kind.to_owned(),
            });
            return None;
        }
        let field = self.pending_field.take();
        Some(self.insert(kind, named, field, range, parent))
    }

    fn insert(
        &mut self,
        kind: &str,
        named: bool,
        field: Option<String>,
        range: Range<usize>,
        parent: Option<usize>,
    ) -> usize {
        let index = self.nodes.len();
        let slot = match parent {
            Some(p) => {
                let siblings = &mut self.nodes[p].children;
                siblings.push(index);
                siblings.len() - 1
            }
            None => 0,
        };
        let start = self.point_at(range.start);
        let end = self.point_at(range.end);
        self.nodes.push(NodeData {
            kind: kind.to_owned(),
            named,
            field,
            range,
            start,
            end,
            parent,
            slot,
            children: Vec::new(),
        });
        index
    }

    fn push_spec(&mut self, spec: &NodeSpec, parent: Option<usize>) {
        let index = self.insert(
            &spec.kind,
            spec.named,
            spec.field.clone(),
            spec.start..spec.end,
            parent,
        );
        for child in &spec.children {
            self.push_spec(child, Some(index));
        }
    }

    fn point_at(&self, offset: usize) -> Point {
        let row = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Point::new(row, offset - self.line_starts[row])
    }
}
