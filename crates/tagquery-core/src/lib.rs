#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Syntax tree contract consumed by the tagquery matcher.
//!
//! Two layers:
//! - **Contract**: [`TreeNode`] / [`SyntaxTree`], the read-only view a parser
//!   hands to the matcher (type name, named flag, fields, ordered children,
//!   byte and row/column spans)
//! - **Implementations**: [`OwnedTree`] (arena tree, built by hand or from
//!   JSON) and, behind the `tree-sitter` feature, `tree_sitter::Tree`

use std::fmt;
use std::ops::Range;

mod owned;
mod validate;

#[cfg(feature = "tree-sitter")]
mod ts;

#[cfg(test)]
mod validate_tests;

pub use owned::{NodeSpec, OwnedNode, OwnedTree, TreeBuilder, TreeError};
pub use validate::{InvalidTree, validate_tree};

// ============================================================================
// Positions
// ============================================================================

/// Zero-based row and byte column, as reported by tree-sitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

// ============================================================================
// Tree Contract
// ============================================================================

/// A child node together with the field it is reachable through.
#[derive(Debug, Clone, Copy)]
pub struct Child<'t, N> {
    pub field: Option<&'t str>,
    pub node: N,
}

/// Read-only view of one syntax tree node.
///
/// Handles are cheap to copy and borrow the tree for `'t`.
pub trait TreeNode<'t>: Copy + fmt::Debug {
    /// Identity that is stable for the lifetime of the tree.
    fn id(&self) -> usize;

    /// Node type name (`"class"`, `"identifier"`, `"::"`).
    fn kind(&self) -> &'t str;

    /// Named nodes come from grammar rules; anonymous ones are literal tokens.
    fn is_named(&self) -> bool;

    fn byte_range(&self) -> Range<usize>;

    fn start_point(&self) -> Point;

    fn end_point(&self) -> Point;

    fn parent(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    /// All children in source order, named and anonymous.
    fn children(&self) -> Vec<Child<'t, Self>>;

    fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.byte_range())
    }
}

/// A whole tree. `root` is `None` for a tree with nothing to traverse.
pub trait SyntaxTree {
    type Node<'t>: TreeNode<'t>
    where
        Self: 't;

    fn root(&self) -> Option<Self::Node<'_>>;
}

impl<T: SyntaxTree> SyntaxTree for Option<T> {
    type Node<'t>
        = T::Node<'t>
    where
        Self: 't;

    fn root(&self) -> Option<Self::Node<'_>> {
        self.as_ref()?.root()
    }
}

impl<T: SyntaxTree> SyntaxTree for &T {
    type Node<'t>
        = T::Node<'t>
    where
        Self: 't;

    fn root(&self) -> Option<Self::Node<'_>> {
        (**self).root()
    }
}
