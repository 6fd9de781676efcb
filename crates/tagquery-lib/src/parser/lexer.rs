//! Tokenizer for rule text.
//!
//! Tokens carry a kind and a span, never text. A run of characters logos
//! cannot classify becomes a single `Garbage` token, so an unterminated
//! string shows up as garbage from its quote to the next recognizable token.

use std::ops::Range;

use logos::Logos;
use rowan::{TextRange, TextSize};

use super::cst::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    fn at(kind: SyntaxKind, bytes: Range<usize>) -> Self {
        let offset = |n: usize| TextSize::new(n as u32);
        Self {
            kind,
            span: TextRange::new(offset(bytes.start), offset(bytes.end)),
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span]
    }
}

/// Splits `source` into tokens, trivia included.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut garbage: Option<Range<usize>> = None;

    for (kind, bytes) in SyntaxKind::lexer(source).spanned() {
        let Ok(kind) = kind else {
            garbage = Some(match garbage {
                Some(run) => run.start..bytes.end,
                None => bytes,
            });
            continue;
        };
        if let Some(run) = garbage.take() {
            tokens.push(Token::at(SyntaxKind::Garbage, run));
        }
        match kind {
            SyntaxKind::StringLiteral => push_string(&mut tokens, bytes),
            _ => tokens.push(Token::at(kind, bytes)),
        }
    }
    tokens.extend(garbage.map(|run| Token::at(SyntaxKind::Garbage, run)));

    tokens
}

/// `"abc"` becomes `"`, `abc`, `"`. An empty literal has no `StrVal`.
fn push_string(tokens: &mut Vec<Token>, bytes: Range<usize>) {
    let close = bytes.end - 1;
    tokens.push(Token::at(SyntaxKind::DoubleQuote, bytes.start..bytes.start + 1));
    if close > bytes.start + 1 {
        tokens.push(Token::at(SyntaxKind::StrVal, bytes.start + 1..close));
    }
    tokens.push(Token::at(SyntaxKind::DoubleQuote, close..bytes.end));
}
