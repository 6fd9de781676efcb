use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::EXPR_FIRST;

impl Parser<'_> {
    /// `@name`
    pub(crate) fn parse_capture_suffix(&mut self) {
        self.bump(); // consume At

        if !self.currently_is(SyntaxKind::Id) {
            self.error(DiagnosticKind::ExpectedCaptureName);
            return;
        }
        self.bump(); // consume Id
    }

    /// Negated field assertion: `!field` (field must be absent)
    pub(crate) fn parse_negated_field(&mut self) {
        self.start_node(SyntaxKind::NegatedField);
        self.expect(SyntaxKind::Negation, "'!' for negated field");

        if !self.currently_is(SyntaxKind::Id) {
            self.error(DiagnosticKind::ExpectedFieldName);
            self.finish_node();
            return;
        }

        self.bump();
        self.finish_node();
    }

    /// Disambiguate `field: pattern` from a bare identifier via LL(2) lookahead.
    pub(crate) fn parse_tree_or_field(&mut self) {
        if self.next_is(SyntaxKind::Colon) {
            self.parse_field();
            return;
        }

        // Bare identifiers are not valid patterns; node kinds require parentheses
        let span = self.current_span();
        let text = self.current_text();
        self.diagnostics
            .report(DiagnosticKind::BareIdentifier, span)
            .fix("wrap in parentheses", format!("({text})"))
            .emit();
        self.bump_as_error();
    }

    /// Field constraint: `field_name: pattern`
    pub(crate) fn parse_field(&mut self) {
        self.start_node(SyntaxKind::Field);

        self.bump_kind(SyntaxKind::Id);

        self.expect(
            SyntaxKind::Colon,
            "':' to separate field name from its value",
        );

        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_expr_no_suffix();
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpression, "after `field:`");
        }

        self.finish_node();
    }
}
