//! Parser for rule text.
//!
//! The output is a lossless rowan tree: every byte of input, trivia and
//! garbage included, ends up in it. The parser never gives up on a syntax
//! error. A token it cannot place is wrapped in an `Error` node and
//! consumed, while a missing token is reported and left for the enclosing
//! production. Quantifiers and captures wrap what precedes them through
//! checkpoints.
//!
//! Running out of exec or recursion fuel is the only way parsing fails.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lexer_tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    Alt, Anchor, Capture, CaptureRef, Expr, Field, Group, NegatedField, Predicate, PredicateArg,
    Quantifier, Root, Rule, Str, Tree, Wildcard,
};

pub use core::{ParseResult, Parser};

use crate::Error;
use lexer::lex;

/// Parses with default fuel (unbounded). Returns Err only on fuel exhaustion.
pub fn parse(source: &str) -> Result<ParseResult, Error> {
    Parser::new(source, lex(source)).parse()
}
