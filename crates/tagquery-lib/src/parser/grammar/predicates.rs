use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::PREDICATE_RECOVERY;

impl Parser<'_> {
    /// `(#name arg*)` where each arg is `@capture`, `"string"` or a bare identifier.
    ///
    /// Arity and argument kinds are checked during lowering, where the predicate
    /// name is known to be one of the supported ones.
    pub(crate) fn parse_predicate(&mut self) {
        self.start_node(SyntaxKind::Predicate);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump(); // consume '('
        self.bump_kind(SyntaxKind::PredicateName);

        loop {
            if self.eof() {
                self.error_unclosed();
                break;
            }
            if self.has_fatal_error() {
                break;
            }
            match self.current() {
                SyntaxKind::ParenClose => break,
                SyntaxKind::At => self.parse_capture_ref(),
                SyntaxKind::DoubleQuote => self.parse_str(),
                SyntaxKind::Id => self.bump(),
                kind if PREDICATE_RECOVERY.contains(kind) => {
                    self.error_msg(
                        DiagnosticKind::UnexpectedToken,
                        "predicate arguments are `@capture`, `\"string\"` or identifiers",
                    );
                    break;
                }
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "predicate arguments are `@capture`, `\"string\"` or identifiers",
                ),
            }
        }

        self.pop_delimiter();
        self.expect(SyntaxKind::ParenClose, "closing ')' for predicate");
        self.finish_node();
    }

    /// `@name` as a predicate argument.
    fn parse_capture_ref(&mut self) {
        self.start_node(SyntaxKind::CaptureRef);
        self.bump(); // consume At
        if self.currently_is(SyntaxKind::Id) {
            self.bump();
        } else {
            self.error(DiagnosticKind::ExpectedCaptureName);
        }
        self.finish_node();
    }
}
