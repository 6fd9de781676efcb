//! `TreeNode` for tree-sitter trees.

use std::ops::Range;

use tree_sitter::{Node, Tree};

use crate::{Child, Point, SyntaxTree, TreeNode};

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Point::new(p.row, p.column)
    }
}

impl<'t> TreeNode<'t> for Node<'t> {
    fn id(&self) -> usize {
        Node::id(self)
    }

    fn kind(&self) -> &'t str {
        Node::kind(self)
    }

    fn is_named(&self) -> bool {
        Node::is_named(self)
    }

    fn byte_range(&self) -> Range<usize> {
        Node::byte_range(self)
    }

    fn start_point(&self) -> Point {
        self.start_position().into()
    }

    fn end_point(&self) -> Point {
        self.end_position().into()
    }

    fn parent(&self) -> Option<Self> {
        Node::parent(self)
    }

    fn next_sibling(&self) -> Option<Self> {
        Node::next_sibling(self)
    }

    fn children(&self) -> Vec<Child<'t, Self>> {
        let mut out = Vec::with_capacity(self.child_count());
        let mut cursor = self.walk();
        if !cursor.goto_first_child() {
            return out;
        }
        loop {
            out.push(Child {
                field: cursor.field_name(),
                node: cursor.node(),
            });
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        out
    }
}

impl SyntaxTree for Tree {
    type Node<'t> = Node<'t>;

    fn root(&self) -> Option<Node<'_>> {
        Some(self.root_node())
    }
}
