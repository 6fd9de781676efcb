//! tagquery: tree-sitter style tag rules compiled once and matched against syntax trees.
//!
//! # Example
//!
//! ```
//! use tagquery_core::TreeBuilder;
//! use tagquery_lib::Query;
//!
//! let rules = r#"
//!     (module name: (constant) @name) @definition.module
//! "#;
//! let query = Query::new(rules).expect("valid rules");
//!
//! let source = "module Foo\nend";
//! let tree = TreeBuilder::new(source)
//!     .start("program", 0..14)
//!     .start("module", 0..14)
//!     .token("module", 0..6)
//!     .field("name")
//!     .leaf("constant", 7..10)
//!     .token("end", 11..14)
//!     .finish()
//!     .finish()
//!     .build()
//!     .expect("balanced tree");
//!
//! let matches: Vec<_> = query.matches(&tree, source).expect("valid tree").collect();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].texts("name"), ["Foo"]);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod engine;
pub mod parser;
pub mod query;

#[cfg(test)]
mod lib_tests;

use rowan::TextSize;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use engine::{
    CapturedNode, LogTracer, MatchOptions, MatchResult, Matches, NoopTracer, RuntimeError, Tracer,
};
pub use query::{Query, QueryBuilder, ReloadableQuery, RuleInfo};

/// Errors that can occur while compiling rule text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed rule text.
///
/// `rule_index` and `offset` point at the first problem a user should fix;
/// `diagnostics` holds every problem found, for rendering.
#[derive(Debug, Clone, thiserror::Error)]
#[error("syntax error in rule {rule_index} at byte {offset}: {message}")]
pub struct SyntaxError {
    pub rule_index: usize,
    pub offset: usize,
    pub message: String,
    pub diagnostics: Diagnostics,
}

impl SyntaxError {
    /// Builds the error from the diagnostics of a failed compile.
    ///
    /// Returns `None` when there is nothing to report.
    pub(crate) fn from_diagnostics(
        root: &parser::Root,
        diagnostics: Diagnostics,
    ) -> Option<Self> {
        let first = diagnostics.first()?;
        let offset = first.range().start();
        Some(Self {
            rule_index: rule_index_at(root, offset),
            offset: u32::from(offset) as usize,
            message: first.message().to_string(),
            diagnostics,
        })
    }

    /// Renders every diagnostic against the rule text with source snippets.
    pub fn render(&self, source: &str) -> String {
        self.diagnostics.filtered().render(source)
    }
}

/// Index of the rule containing `offset`, or the number of rules that end before it.
fn rule_index_at(root: &parser::Root, offset: TextSize) -> usize {
    let mut preceding = 0;
    for (i, rule) in root.rules().enumerate() {
        let range = rule.text_range();
        if range.contains(offset) {
            return i;
        }
        if range.end() <= offset {
            preceding += 1;
        }
    }
    preceding
}
