//! Rule compilation.
//!
//! Stages: lex → parse → lower. The parser and the lowering pass report to one
//! `Diagnostics`; any diagnostic fails the compile with a [`SyntaxError`].

mod escape;
mod lower;
mod pattern;
mod predicate;
mod reload;

#[cfg(test)]
mod escape_tests;
#[cfg(test)]
mod lower_tests;
#[cfg(test)]
mod mod_tests;

use std::ops::Range;

use indexmap::IndexSet;
use tagquery_core::{InvalidTree, SyntaxTree, validate_tree};

use crate::engine::{MatchOptions, Matches, NoopTracer, RuntimeError, Tracer};
use crate::parser::Parser;
use crate::parser::lexer::lex;
use crate::{Error, SyntaxError};

pub(crate) use pattern::{
    CaptureId, CompiledRule, Pattern, PatternKind, Quantifier, Sequence, Shape,
};
pub(crate) use predicate::{Operand, Predicate};
pub use reload::ReloadableQuery;

const DEFAULT_PARSE_FUEL: u32 = 1_000_000;
const DEFAULT_RECURSION_LIMIT: u32 = 4096;

/// Compile settings. Both limits bound work on hostile rule text.
pub struct QueryBuilder<'s> {
    source: &'s str,
    parse_fuel: Option<u32>,
    recursion_limit: Option<u32>,
}

impl<'s> QueryBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            parse_fuel: Some(DEFAULT_PARSE_FUEL),
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// `None` removes the limit.
    pub fn with_parse_fuel(mut self, fuel: Option<u32>) -> Self {
        self.parse_fuel = fuel;
        self
    }

    /// `None` removes the limit.
    pub fn with_recursion_limit(mut self, limit: Option<u32>) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn build(self) -> Result<Query, Error> {
        let tokens = lex(self.source);
        let parsed = Parser::new(self.source, tokens)
            .with_exec_fuel(self.parse_fuel)
            .with_recursion_fuel(self.recursion_limit)
            .parse()?;

        let mut diagnostics = parsed.diagnostics;
        let rules = lower::lower_root(&parsed.root, &mut diagnostics);

        if let Some(err) = SyntaxError::from_diagnostics(&parsed.root, diagnostics) {
            tracing::debug!(
                rule = err.rule_index,
                offset = err.offset,
                "rejected tag rules: {}",
                err.message
            );
            return Err(err.into());
        }

        let mut names = IndexSet::new();
        for rule in &rules {
            names.extend(rule.captures.iter().cloned());
        }

        tracing::debug!(
            rules = rules.len(),
            captures = names.len(),
            parse_fuel = parsed.exec_fuel_consumed,
            "compiled tag rules"
        );

        Ok(Query {
            source: self.source.to_string(),
            rules,
            capture_names: names.into_iter().collect(),
        })
    }
}

/// An immutable, compiled rule set.
///
/// Holds no syntax nodes, so it can be shared across threads and matched
/// against many trees at once.
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    rules: Vec<CompiledRule>,
    capture_names: Vec<String>,
}

/// Read-only view of one compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo<'q> {
    pub index: usize,
    /// Span of the rule in the rule text.
    pub byte_range: Range<usize>,
    /// Declared capture names in source order.
    pub captures: &'q [String],
    /// Predicate names in declaration order, without `#`.
    pub predicates: Vec<&'static str>,
}

impl Query {
    /// Compiles with default limits.
    pub fn new(source: &str) -> Result<Self, Error> {
        QueryBuilder::new(source).build()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Every capture name used by any rule, in first-seen order.
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    pub fn rule(&self, index: usize) -> Option<RuleInfo<'_>> {
        let rule = self.rules.get(index)?;
        Some(RuleInfo {
            index,
            byte_range: rule.range.clone(),
            captures: &rule.captures,
            predicates: rule.predicates.iter().map(Predicate::name).collect(),
        })
    }

    /// Normalized pattern of one rule, for debugging.
    pub fn dump_rule(&self, index: usize) -> Option<String> {
        self.rules.get(index).map(CompiledRule::dump)
    }

    pub(crate) fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Lazily matches every rule against `tree`.
    ///
    /// The tree is validated up front; an unusable tree fails with
    /// [`RuntimeError::InvalidInput`] before any result is produced.
    pub fn matches<'a, T: SyntaxTree>(
        &'a self,
        tree: &'a T,
        source: &'a str,
    ) -> Result<Matches<'a, T::Node<'a>>, RuntimeError> {
        self.matches_with(tree, source, MatchOptions::default())
    }

    pub fn matches_with<'a, T: SyntaxTree>(
        &'a self,
        tree: &'a T,
        source: &'a str,
        options: MatchOptions,
    ) -> Result<Matches<'a, T::Node<'a>>, RuntimeError> {
        self.matches_traced(tree, source, options, NoopTracer)
    }

    pub fn matches_traced<'a, T: SyntaxTree, R: Tracer>(
        &'a self,
        tree: &'a T,
        source: &'a str,
        options: MatchOptions,
        tracer: R,
    ) -> Result<Matches<'a, T::Node<'a>, R>, RuntimeError> {
        validate_tree(tree, source)?;
        let root = tree
            .root()
            .ok_or(RuntimeError::InvalidInput(InvalidTree::MissingRoot))?;
        Ok(Matches::new(self, root, source, options, tracer))
    }
}
