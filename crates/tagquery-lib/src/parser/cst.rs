//! Token and node kinds of rule text, and the rowan language they live in.
//!
//! Logos recognizes the token kinds straight off the enum; node kinds carry
//! no lexer attribute and are only produced by the parser.

use std::fmt;

use logos::Logos;
use rowan::Language;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Punctuation
    #[token("(")]
    ParenOpen = 0,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(":")]
    Colon,
    #[token("!")]
    Negation,
    #[token("_")]
    Underscore,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    /// Not a separator in rule text; lexed so the parser can point at it.
    #[token(",")]
    Comma,

    // Quantifiers
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("?")]
    Question,

    /// Whole `"..."` literal. [`lex`](super::lexer::lex) splits it before the parser sees it.
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[doc(hidden)]
    StringLiteral,
    DoubleQuote,
    /// Raw text between the quotes, escapes unresolved.
    StrVal,

    /// Node kinds, field names and capture names: `singleton_method`,
    /// `definition.class`, `not-a-kind`.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_.\-]*")]
    #[regex(r"_[a-zA-Z0-9_.\-]+")]
    Id,

    /// `#` name with an optional `?` or `!` suffix.
    #[regex(r"#[a-zA-Z_][a-zA-Z0-9_\-]*[?!]?")]
    PredicateName,

    // Trivia
    #[regex(r"[ \t]+")]
    Whitespace,
    #[token("\n")]
    #[token("\r\n")]
    Newline,
    #[regex(r";[^\n]*", allow_greedy = true)]
    LineComment,

    /// Characters the lexer could not classify, coalesced.
    Garbage,
    /// Lookahead past the last token. Never appears in a tree.
    Eof,

    // Nodes
    Root,
    Rule,
    Tree,
    Str,
    Wildcard,
    Field,
    NegatedField,
    Capture,
    Quantifier,
    Alt,
    Group,
    Anchor,
    Predicate,
    CaptureRef,
    Error,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Every kind, indexed by discriminant.
    pub const ALL: [SyntaxKind; 38] = [
        ParenOpen,
        ParenClose,
        BracketOpen,
        BracketClose,
        Colon,
        Negation,
        Underscore,
        Dot,
        At,
        Comma,
        Star,
        Plus,
        Question,
        StringLiteral,
        DoubleQuote,
        StrVal,
        Id,
        PredicateName,
        Whitespace,
        Newline,
        LineComment,
        Garbage,
        Eof,
        Root,
        Rule,
        Tree,
        Str,
        Wildcard,
        Field,
        NegatedField,
        Capture,
        Quantifier,
        Alt,
        Group,
        Anchor,
        Predicate,
        CaptureRef,
        Error,
    ];

    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleLang {}

impl Language for RuleLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        // Only this crate builds trees, and only from `SyntaxKind`s.
        SyntaxKind::from_raw(raw.0).unwrap_or(Error)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<RuleLang>;
pub type SyntaxToken = rowan::SyntaxToken<RuleLang>;

/// Set of token kinds, one bit per discriminant.
///
/// Only token kinds, the ones declared before `Eof`, can be members.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::single(kinds[i]));
            i += 1;
        }
        set
    }

    pub const fn single(kind: SyntaxKind) -> Self {
        assert!((kind as u16) < (Eof as u16), "only token kinds fit in a TokenSet");
        TokenSet(1 << kind as u16)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as u16) < (Eof as u16) && self.0 & (1 << kind as u16) != 0
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(SyntaxKind::ALL.iter().filter(|k| self.contains(**k)))
            .finish()
    }
}

/// Lookahead sets used by the grammar.
pub mod token_sets {
    use super::*;

    /// Tokens that can begin a pattern inside a node or group.
    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        Underscore,
        Id,
        DoubleQuote,
        Dot,
        Negation,
    ]);

    /// Tokens that can begin a top-level rule.
    pub const ROOT_EXPR_FIRST: TokenSet =
        TokenSet::new(&[ParenOpen, BracketOpen, Underscore, Id, DoubleQuote]);

    pub const QUANTIFIERS: TokenSet = TokenSet::new(&[Star, Plus, Question]);

    pub const SEPARATORS: TokenSet = TokenSet::single(Comma);

    /// Inside a node: these start a new construct, so a stray token before them is skipped alone.
    pub const TREE_RECOVERY: TokenSet = TokenSet::new(&[ParenOpen, BracketOpen]);

    /// Inside an alternation: a `)` ends the enclosing node.
    pub const ALT_RECOVERY: TokenSet = TokenSet::single(ParenClose);

    /// Inside a predicate: tokens that cannot be arguments.
    pub const PREDICATE_RECOVERY: TokenSet =
        TokenSet::new(&[ParenOpen, BracketOpen, BracketClose]);
}
