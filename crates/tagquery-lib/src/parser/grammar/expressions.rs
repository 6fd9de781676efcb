use rowan::Checkpoint;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{
    ALT_RECOVERY, EXPR_FIRST, QUANTIFIERS, SEPARATORS, TREE_RECOVERY,
};

impl Parser<'_> {
    /// Core recursive descent. Dispatches based on lookahead, then checks for quantifier/capture suffix.
    pub(crate) fn parse_expr(&mut self) {
        self.parse_expr_inner(true)
    }

    /// Parse expression without applying quantifier/capture suffix.
    /// Used for field values so that `field: (x) @c` parses as `(field: (x)) @c`.
    pub(crate) fn parse_expr_no_suffix(&mut self) {
        self.parse_expr_inner(false)
    }

    fn parse_expr_inner(&mut self, with_suffix: bool) {
        if !self.enter_recursion() {
            self.start_node(SyntaxKind::Error);
            while !self.should_stop() {
                self.bump();
            }
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();

        match self.current() {
            SyntaxKind::ParenOpen => self.parse_paren(),
            SyntaxKind::BracketOpen => self.parse_alt(),
            SyntaxKind::Underscore => self.parse_wildcard(),
            SyntaxKind::DoubleQuote => self.parse_str(),
            SyntaxKind::Dot => self.parse_anchor(),
            SyntaxKind::Negation => self.parse_negated_field(),
            SyntaxKind::Id => self.parse_tree_or_field(),
            _ => {
                self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "not a valid pattern");
            }
        }

        if with_suffix {
            self.try_parse_quantifier(checkpoint);
            self.try_parse_captures(checkpoint);
        }

        self.exit_recursion();
    }

    /// `(kind ...)` | `(_ ...)` | `(pattern pattern ...)` | `(#predicate ...)`
    fn parse_paren(&mut self) {
        if self.currently_at_predicate() {
            // Predicates are not patterns; they only appear in child lists.
            let span = self.current_span();
            self.diagnostics
                .report(DiagnosticKind::PredicateWithoutRule, span)
                .message("a predicate cannot be quantified or captured")
                .emit();
            self.parse_predicate();
            return;
        }

        let checkpoint = self.checkpoint();
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump(); // consume '('

        match self.current() {
            SyntaxKind::ParenClose => {
                self.start_node_at(checkpoint, SyntaxKind::Tree);
                self.error(DiagnosticKind::EmptyTree);
                self.pop_delimiter();
                self.bump(); // consume ')'
                self.finish_node();
                return;
            }
            SyntaxKind::Underscore | SyntaxKind::Id => {
                self.start_node_at(checkpoint, SyntaxKind::Tree);
                self.bump(); // node kind
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::Group);
            }
        }

        self.parse_children();

        self.pop_delimiter();
        self.expect(SyntaxKind::ParenClose, "closing ')'");
        self.finish_node();
    }

    /// Child list of a node pattern or group, up to the closing `)`.
    fn parse_children(&mut self) {
        loop {
            if self.eof() {
                self.error_unclosed();
                break;
            }
            if self.has_fatal_error() {
                break;
            }
            if self.currently_is(SyntaxKind::ParenClose) {
                break;
            }
            if self.currently_is_one_of(SEPARATORS) {
                self.error_skip_separator();
                continue;
            }
            if self.currently_at_predicate() {
                self.parse_predicate();
                continue;
            }
            if self.currently_is_one_of(EXPR_FIRST) {
                self.parse_expr();
                continue;
            }
            if self.currently_is(SyntaxKind::At) {
                self.error_and_bump(DiagnosticKind::CaptureWithoutTarget);
                continue;
            }
            if self.currently_is_one_of(TREE_RECOVERY) {
                break;
            }
            self.error_and_bump_msg(
                DiagnosticKind::UnexpectedToken,
                "not valid inside a node; try `(child)` or close with `)`",
            );
        }
    }

    /// Alternation: `[pattern1 pattern2 ...]`
    fn parse_alt(&mut self) {
        self.start_node(SyntaxKind::Alt);
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.expect(SyntaxKind::BracketOpen, "opening '[' for alternation");

        self.parse_alt_children();

        self.pop_delimiter();
        self.expect(SyntaxKind::BracketClose, "closing ']' for alternation");
        self.finish_node();
    }

    fn parse_alt_children(&mut self) {
        loop {
            if self.eof() {
                self.error_unclosed();
                break;
            }
            if self.has_fatal_error() {
                break;
            }
            if self.currently_is(SyntaxKind::BracketClose) {
                break;
            }
            if self.currently_is_one_of(SEPARATORS) {
                self.error_skip_separator();
                continue;
            }
            if self.currently_is(SyntaxKind::Dot) {
                self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "anchors are not valid between alternatives",
                );
                continue;
            }
            if self.currently_is_one_of(EXPR_FIRST) {
                self.parse_expr();
                continue;
            }
            if self.currently_is_one_of(ALT_RECOVERY) {
                break;
            }
            self.error_and_bump_msg(
                DiagnosticKind::UnexpectedToken,
                "not valid inside alternation; try `(node)` or close with `]`",
            );
        }
    }

    /// Skip a stray comma and emit a helpful error.
    fn error_skip_separator(&mut self) {
        let span = self.current_span();
        self.error_with_fix(
            DiagnosticKind::InvalidSeparator,
            span,
            "patterns are separated by whitespace, not `,`",
            ("remove", ""),
        );
        self.bump_as_error();
    }

    /// If current token is a quantifier, wrap preceding expression using checkpoint.
    fn try_parse_quantifier(&mut self, checkpoint: Checkpoint) {
        if self.currently_is_one_of(QUANTIFIERS) {
            self.start_node_at(checkpoint, SyntaxKind::Quantifier);
            self.bump();
            self.finish_node();
        }
    }

    /// Wrap preceding expression with one `Capture` per `@name` suffix.
    fn try_parse_captures(&mut self, checkpoint: Checkpoint) {
        while !self.should_stop() && self.currently_is(SyntaxKind::At) {
            self.start_node_at(checkpoint, SyntaxKind::Capture);
            self.flush_trivia();
            self.parse_capture_suffix();
            self.finish_node();
        }
    }
}
