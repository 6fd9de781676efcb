use rowan::TextRange;

/// What went wrong. Declaration order is priority order, highest first:
/// an error hides lower-priority errors reported inside its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Structural
    UnclosedTree,
    UnclosedAlternation,

    // Missing pieces
    ExpectedExpression,
    ExpectedCaptureName,
    ExpectedFieldName,

    // Misplaced or malformed input
    EmptyTree,
    BareIdentifier,
    InvalidSeparator,
    UnexpectedToken,
    CaptureWithoutTarget,
    PredicateWithoutRule,
    InvalidEscape,

    // Found while lowering
    UnknownPredicate,
    PredicateArity,
    PredicateArgument,
    UndefinedCapture,
    EmptyRegex,
    RegexSyntaxError,
    QuantifiedField,
    FieldSequenceValue,
    FieldOutsideNode,
    AnchorOutsideNode,
}

impl DiagnosticKind {
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// An unclosed delimiter. Its span runs to wherever the parser noticed,
    /// so it usually covers the real mistake.
    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedTree | Self::UnclosedAlternation)
    }

    /// Something required is missing at this offset.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedExpression | Self::ExpectedCaptureName | Self::ExpectedFieldName
        )
    }

    /// Hint attached to every report of this kind.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExpectedFieldName => Some("e.g., `!superclass`"),
            Self::EmptyTree => Some("use `(_)` to match any named node, or `_` for any node"),
            Self::UnknownPredicate => Some(
                "supported: eq? not-eq? any-eq? any-not-eq? match? not-match? any-match? \
                 any-not-match? any-of? not-any-of? select-adjacent! strip! set!",
            ),
            Self::FieldOutsideNode => Some("fields constrain a node: `(class name: (constant))`"),
            _ => None,
        }
    }

    /// Message shown when the reporter gives no detail.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnclosedTree => "missing closing `)`",
            Self::UnclosedAlternation => "missing closing `]`",

            Self::ExpectedExpression => "expected a pattern",
            Self::ExpectedCaptureName => "expected capture name",
            Self::ExpectedFieldName => "expected field name",

            Self::EmptyTree => "empty `()` is not allowed",
            Self::BareIdentifier => "bare identifier is not a pattern",
            Self::InvalidSeparator => "unexpected separator",
            Self::UnexpectedToken => "unexpected token",
            Self::CaptureWithoutTarget => "capture has no target",
            Self::PredicateWithoutRule => "predicate must follow a pattern",
            Self::InvalidEscape => "invalid escape sequence",

            Self::UnknownPredicate => "unknown predicate",
            Self::PredicateArity => "wrong number of predicate arguments",
            Self::PredicateArgument => "invalid predicate argument",
            Self::UndefinedCapture => "capture is not defined in this rule",
            Self::EmptyRegex => "empty regex pattern",
            Self::RegexSyntaxError => "invalid regex",
            Self::QuantifiedField => "a field cannot be quantified",
            Self::FieldSequenceValue => "field cannot match a sequence",
            Self::FieldOutsideNode => "field constraint outside a node pattern",
            Self::AnchorOutsideNode => "anchor outside a node pattern or group",
        }
    }

    /// Message for a report carrying `detail`. Name-bearing kinds splice the
    /// name in; the rest append it to the title.
    pub fn with_detail(&self, detail: &str) -> String {
        match self {
            Self::UnknownPredicate => format!("unknown predicate `#{detail}`"),
            Self::UndefinedCapture => format!("capture `@{detail}` is not defined in this rule"),
            Self::FieldSequenceValue => format!("field `{detail}` cannot match a sequence"),
            Self::QuantifiedField => format!("field `{detail}` cannot be quantified"),
            Self::UnclosedTree | Self::UnclosedAlternation => format!("{}; {detail}", self.title()),
            _ => format!("{}: {detail}", self.title()),
        }
    }
}

/// Suggested edit of the primary span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub description: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: TextRange,
    pub message: String,
}

/// One compile problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.title().to_string(),
            fix: None,
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
