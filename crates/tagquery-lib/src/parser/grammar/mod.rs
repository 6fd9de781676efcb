//! Grammar productions for the rule language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! The grammar follows tree-sitter query syntax: node patterns, fields,
//! alternations, grouped sequences, quantifiers, captures, anchors and predicates.

mod atoms;
mod expressions;
mod fields;
mod items;
mod predicates;
