//! Structural sanity checks run before a tree is matched.

use std::ops::Range;

use crate::{SyntaxTree, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTree {
    #[error("tree has no root node")]
    MissingRoot,

    #[error("node `{kind}` spans {range:?}, outside source of {len} bytes")]
    OutOfBounds {
        kind: String,
        range: Range<usize>,
        len: usize,
    },

    #[error("node `{kind}` span {range:?} is reversed")]
    ReversedSpan { kind: String, range: Range<usize> },

    #[error("node `{kind}` boundary {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { kind: String, offset: usize },

    #[error("node `{kind}` at {range:?} lies outside its parent `{parent}` at {parent_range:?}")]
    ChildOutsideParent {
        kind: String,
        range: Range<usize>,
        parent: String,
        parent_range: Range<usize>,
    },

    #[error("node `{kind}` at {range:?} overlaps its preceding sibling")]
    OverlappingSiblings { kind: String, range: Range<usize> },
}

/// Checks that every node of `tree` can be traversed and sliced from `source`.
///
/// Walks the tree iteratively so deep trees cannot exhaust the stack.
pub fn validate_tree<T: SyntaxTree>(tree: &T, source: &str) -> Result<(), InvalidTree> {
    let root = tree.root().ok_or(InvalidTree::MissingRoot)?;
    check_span(root, source)?;

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let outer = node.byte_range();
        let mut prev_end = outer.start;
        for child in node.children() {
            let child = child.node;
            check_span(child, source)?;
            let range = child.byte_range();
            if range.start < outer.start || range.end > outer.end {
                return Err(InvalidTree::ChildOutsideParent {
                    kind: child.kind().to_owned(),
                    range,
                    parent: node.kind().to_owned(),
                    parent_range: outer,
                });
            }
            if range.start < prev_end {
                return Err(InvalidTree::OverlappingSiblings {
                    kind: child.kind().to_owned(),
                    range,
                });
            }
            prev_end = range.end;
            stack.push(child);
        }
    }
    Ok(())
}

fn check_span<'t, N: TreeNode<'t>>(node: N, source: &str) -> Result<(), InvalidTree> {
    let range = node.byte_range();
    if range.start > range.end {
        return Err(InvalidTree::ReversedSpan {
            kind: node.kind().to_owned(),
            range,
        });
    }
    if range.end > source.len() {
        return Err(InvalidTree::OutOfBounds {
            kind: node.kind().to_owned(),
            range,
            len: source.len(),
        });
    }
    for offset in [range.start, range.end] {
        if !source.is_char_boundary(offset) {
            return Err(InvalidTree::NotCharBoundary {
                kind: node.kind().to_owned(),
                offset,
            });
        }
    }
    Ok(())
}
