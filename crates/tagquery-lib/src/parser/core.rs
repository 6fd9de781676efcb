//! Token cursor, tree building and error reporting for the grammar.
//!
//! The grammar never sees trivia. Looking at the current token steps over
//! it; the skipped run stays pending and is written just before the next
//! node or token, so it always lands in the enclosing node.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNodeBuilder, TextRange, TextSize};

use super::ast::Root;
use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::Token;
use crate::Error;
use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics};

/// Lookaheads allowed without consuming a token before the parser is declared stuck.
const STALL_LIMIT: u32 = 256;

#[derive(Debug)]
pub struct ParseResult {
    pub root: Root,
    pub diagnostics: Diagnostics,
    pub exec_fuel_consumed: u32,
}

/// Work budget of one parse. `None` limits are unbounded.
#[derive(Debug, Default)]
struct Fuel {
    steps: Option<u32>,
    spent: u32,
    max_depth: Option<u32>,
    depth: u32,
}

impl Fuel {
    fn step(&mut self) -> Result<(), Error> {
        if self.steps.is_some_and(|limit| self.spent >= limit) {
            return Err(Error::ExecFuelExhausted);
        }
        self.spent += 1;
        Ok(())
    }

    fn descend(&mut self) -> Result<(), Error> {
        if self.max_depth.is_some_and(|limit| self.depth >= limit) {
            return Err(Error::RecursionLimitExceeded);
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// A `(` or `[` still waiting for its closer.
#[derive(Debug, Clone, Copy)]
pub(super) struct OpenDelimiter {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Next token to look at. Everything in `written..pos` is pending trivia.
    pos: usize,
    written: usize,
    builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    open: Vec<OpenDelimiter>,
    /// Start of the last reported error; a second error there is noise.
    last_error: Option<TextSize>,
    fuel: Fuel,
    fatal: Option<Error>,
    stall: Cell<u32>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            written: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            open: Vec::new(),
            last_error: None,
            fuel: Fuel::default(),
            fatal: None,
            stall: Cell::new(0),
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.steps = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.max_depth = limit;
        self
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_root();
        if let Some(err) = self.fatal {
            return Err(err);
        }
        let root = SyntaxNode::new_root(self.builder.finish());
        let root = Root::cast(root).expect("parse_root always opens a Root node");
        Ok(ParseResult {
            root,
            diagnostics: self.diagnostics,
            exec_fuel_consumed: self.fuel.spent,
        })
    }

    fn fail(&mut self, err: Error) {
        self.fatal.get_or_insert(err);
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal.is_some()
    }

    // Lookahead

    pub(super) fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(|t| t.kind.is_trivia()) {
            self.pos += 1;
        }
    }

    /// The `n`th significant token from the cursor.
    fn peek(&mut self, n: usize) -> Option<Token> {
        let stalled = self.stall.get() + 1;
        assert!(stalled < STALL_LIMIT, "parser is stuck at token {}", self.pos);
        self.stall.set(stalled);

        self.skip_trivia();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .copied()
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.peek(0).map_or(SyntaxKind::Eof, |t| t.kind)
    }

    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.peek(1).is_some_and(|t| t.kind == kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        match self.peek(0) {
            Some(token) => token.span,
            None => TextRange::empty(self.eof_offset()),
        }
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        let source = self.source;
        self.peek(0).map_or("", |t| t.text(source))
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub(super) fn eof(&self) -> bool {
        self.tokens[self.pos..].iter().all(|t| t.kind.is_trivia())
    }

    pub(super) fn should_stop(&self) -> bool {
        self.has_fatal_error() || self.eof()
    }

    // Tree building

    /// Writes pending trivia into the node currently open.
    pub(super) fn flush_trivia(&mut self) {
        while self.written < self.pos {
            let token = self.tokens[self.written];
            self.builder.token(token.kind.into(), token.text(self.source));
            self.written += 1;
        }
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    /// Moves the current token into the tree.
    pub(super) fn bump(&mut self) {
        self.skip_trivia();
        self.flush_trivia();
        let Some(token) = self.tokens.get(self.pos).copied() else {
            return;
        };
        if let Err(err) = self.fuel.step() {
            self.fail(err);
        }
        self.stall.set(0);
        self.builder.token(token.kind.into(), token.text(self.source));
        self.pos += 1;
        self.written = self.pos;
    }

    /// Bumps a token the caller has already checked the kind of.
    pub(super) fn bump_kind(&mut self, kind: SyntaxKind) {
        debug_assert_eq!(self.current(), kind, "grammar bumped an unexpected token");
        self.bump();
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let found = self.currently_is(kind);
        if found {
            self.bump();
        }
        found
    }

    /// Consumes `kind`, or reports what was expected and leaves the input alone.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        let found = self.eat_token(kind);
        if !found {
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
        }
        found
    }

    pub(super) fn bump_as_error(&mut self) {
        if self.eof() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    // Nesting

    pub(super) fn enter_recursion(&mut self) -> bool {
        match self.fuel.descend() {
            Ok(()) => {
                self.stall.set(0);
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    pub(super) fn exit_recursion(&mut self) {
        self.fuel.ascend();
        self.stall.set(0);
    }

    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.open.push(OpenDelimiter { kind, span });
    }

    pub(super) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.open.pop()
    }

    // Errors

    /// Starts a diagnostic at `range` unless one was already reported there.
    fn report_once(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
    ) -> Option<DiagnosticBuilder<'_>> {
        if self.last_error.replace(range.start()) == Some(range.start()) {
            return None;
        }
        Some(self.diagnostics.report(kind, range))
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        if let Some(diagnostic) = self.report_once(kind, range) {
            diagnostic.emit();
        }
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if let Some(diagnostic) = self.report_once(kind, range) {
            diagnostic.message(message).emit();
        }
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    pub(super) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Reports an error with a suggested replacement for `range`.
    pub(super) fn error_with_fix(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
        fix: (&str, &str),
    ) {
        if let Some(diagnostic) = self.report_once(kind, range) {
            diagnostic.message(message).fix(fix.0, fix.1).emit();
        }
    }

    /// Reports the innermost unclosed delimiter, spanning from its opener to here.
    pub(super) fn error_unclosed(&mut self) {
        let Some(open) = self.open.last().copied() else {
            return;
        };
        let (kind, closer, what) = if open.kind == SyntaxKind::BracketOpen {
            (DiagnosticKind::UnclosedAlternation, "`]`", "alternation")
        } else {
            (DiagnosticKind::UnclosedTree, "`)`", "node")
        };
        let here = self.current_span();
        if self.last_error.replace(here.start()) == Some(here.start()) {
            return;
        }
        self.diagnostics
            .report(kind, open.span.cover(here))
            .message(format!("expected {closer}"))
            .related_to(format!("{what} started here"), open.span)
            .emit();
    }
}
