use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::ROOT_EXPR_FIRST;

impl Parser<'_> {
    /// Rule file: a sequence of top-level rules, each optionally followed by predicates.
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        while !self.should_stop() {
            if self.currently_at_predicate() {
                // Predicate with no rule in front of it.
                let span = self.current_span();
                self.diagnostics
                    .report(DiagnosticKind::PredicateWithoutRule, span)
                    .emit();
                self.parse_predicate();
                continue;
            }

            if self.currently_is_one_of(ROOT_EXPR_FIRST) {
                self.parse_rule();
                continue;
            }

            match self.current() {
                SyntaxKind::At => self.error_and_bump(DiagnosticKind::CaptureWithoutTarget),
                SyntaxKind::Dot | SyntaxKind::Negation => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "only valid inside a node pattern",
                ),
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "try `(node)`, `[a b]`, `\"literal\"`, or `_`",
                ),
            }
            self.error_until_next_rule();
        }

        self.skip_trivia();
        self.flush_trivia();
        self.finish_node();
    }

    /// `pattern (#predicate ...)*`
    fn parse_rule(&mut self) {
        self.start_node(SyntaxKind::Rule);
        self.parse_expr();
        while !self.should_stop() && self.currently_at_predicate() {
            self.parse_predicate();
        }
        self.finish_node();
    }

    pub(crate) fn error_until_next_rule(&mut self) {
        if self.should_stop() || self.currently_at_rule_start() {
            return;
        }

        self.start_node(SyntaxKind::Error);
        while !self.should_stop() && !self.currently_at_rule_start() {
            self.bump();
            self.skip_trivia();
        }
        self.finish_node();
    }

    pub(crate) fn currently_at_rule_start(&mut self) -> bool {
        self.currently_is_one_of(ROOT_EXPR_FIRST)
    }

    /// LL(2): `(` followed by `#name`.
    pub(crate) fn currently_at_predicate(&mut self) -> bool {
        self.currently_is(SyntaxKind::ParenOpen) && self.next_is(SyntaxKind::PredicateName)
    }
}
