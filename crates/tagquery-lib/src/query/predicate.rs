//! Predicates and directives attached to a rule.
//!
//! Text predicates (`eq?`, `match?`, `any-of?` and their variants) and
//! `select-adjacent!` gate a match. `strip!` and `set!` only shape the result.

use indexmap::IndexMap;
use regex_automata::meta::Regex;
use regex_syntax::ast;
use rowan::TextRange;

use super::escape::unescape;
use super::pattern::CaptureId;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::{self, PredicateArg};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq {
        capture: CaptureId,
        operand: Operand,
        negated: bool,
        any: bool,
    },
    Match {
        capture: CaptureId,
        regex: TextRegex,
        negated: bool,
        any: bool,
    },
    AnyOf {
        capture: CaptureId,
        values: Vec<String>,
        negated: bool,
    },
    SelectAdjacent {
        first: CaptureId,
        second: CaptureId,
    },
    Strip {
        capture: CaptureId,
        regex: TextRegex,
    },
    Set {
        key: String,
        value: Option<String>,
    },
}

impl Predicate {
    /// Name as written after `#`.
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Eq { negated, any, .. } => match (*any, *negated) {
                (false, false) => "eq?",
                (false, true) => "not-eq?",
                (true, false) => "any-eq?",
                (true, true) => "any-not-eq?",
            },
            Predicate::Match { negated, any, .. } => match (*any, *negated) {
                (false, false) => "match?",
                (false, true) => "not-match?",
                (true, false) => "any-match?",
                (true, true) => "any-not-match?",
            },
            Predicate::AnyOf { negated: false, .. } => "any-of?",
            Predicate::AnyOf { negated: true, .. } => "not-any-of?",
            Predicate::SelectAdjacent { .. } => "select-adjacent!",
            Predicate::Strip { .. } => "strip!",
            Predicate::Set { .. } => "set!",
        }
    }

    /// Whether a failing evaluation discards the match.
    pub fn is_gating(&self) -> bool {
        !matches!(self, Predicate::Strip { .. } | Predicate::Set { .. })
    }
}

/// Right-hand side of `eq?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Capture(CaptureId),
    Text(String),
}

/// Compiled regex that remembers its pattern.
#[derive(Debug, Clone)]
pub struct TextRegex {
    pattern: String,
    regex: Regex,
}

impl TextRegex {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// `text` with every match removed.
    pub fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.regex.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

impl PartialEq for TextRegex {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for TextRegex {}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Eq { negated: bool, any: bool },
    Match { negated: bool, any: bool },
    AnyOf { negated: bool },
    SelectAdjacent,
    Strip,
    Set,
}

impl Kind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "eq?" => Kind::Eq { negated: false, any: false },
            "not-eq?" => Kind::Eq { negated: true, any: false },
            "any-eq?" => Kind::Eq { negated: false, any: true },
            "any-not-eq?" => Kind::Eq { negated: true, any: true },
            "match?" => Kind::Match { negated: false, any: false },
            "not-match?" => Kind::Match { negated: true, any: false },
            "any-match?" => Kind::Match { negated: false, any: true },
            "any-not-match?" => Kind::Match { negated: true, any: true },
            "any-of?" => Kind::AnyOf { negated: false },
            "not-any-of?" => Kind::AnyOf { negated: true },
            "select-adjacent!" => Kind::SelectAdjacent,
            "strip!" => Kind::Strip,
            "set!" => Kind::Set,
            _ => return None,
        })
    }
}

/// Validates one predicate against the rule's declared captures and compiles it.
///
/// Problems are reported to `diag`; `None` means at least one was reported.
pub fn lower_predicate(
    pred: &parser::Predicate,
    captures: &IndexMap<String, CaptureId>,
    diag: &mut Diagnostics,
) -> Option<Predicate> {
    let name_token = pred.name()?;
    let name = name_token.text().trim_start_matches('#');
    let Some(kind) = Kind::from_name(name) else {
        diag.report(DiagnosticKind::UnknownPredicate, name_token.text_range())
            .message(name)
            .emit();
        return None;
    };

    let mut lowering = PredicateLowering {
        name,
        range: pred.text_range(),
        args: pred.args().collect(),
        captures,
        diag,
    };

    match kind {
        Kind::Eq { negated, any } => {
            lowering.arity(2, Some(2))?;
            let capture = lowering.capture(0)?;
            let operand = if matches!(lowering.args[1], PredicateArg::Capture(_)) {
                Operand::Capture(lowering.capture(1)?)
            } else {
                Operand::Text(lowering.string(1)?)
            };
            Some(Predicate::Eq {
                capture,
                operand,
                negated,
                any,
            })
        }
        Kind::Match { negated, any } => {
            lowering.arity(2, Some(2))?;
            let capture = lowering.capture(0)?;
            let regex = lowering.regex(1)?;
            Some(Predicate::Match {
                capture,
                regex,
                negated,
                any,
            })
        }
        Kind::AnyOf { negated } => {
            lowering.arity(2, None)?;
            let capture = lowering.capture(0)?;
            let n = lowering.args.len();
            let values = (1..n)
                .map(|i| lowering.string(i))
                .collect::<Option<Vec<_>>>()?;
            Some(Predicate::AnyOf {
                capture,
                values,
                negated,
            })
        }
        Kind::SelectAdjacent => {
            lowering.arity(2, Some(2))?;
            let first = lowering.capture(0)?;
            let second = lowering.capture(1)?;
            Some(Predicate::SelectAdjacent { first, second })
        }
        Kind::Strip => {
            lowering.arity(2, Some(2))?;
            let capture = lowering.capture(0)?;
            let regex = lowering.regex(1)?;
            Some(Predicate::Strip { capture, regex })
        }
        Kind::Set => {
            lowering.arity(1, Some(2))?;
            let key = lowering.word(0)?;
            let value = match lowering.args.len() {
                2 => Some(lowering.word(1)?),
                _ => None,
            };
            Some(Predicate::Set { key, value })
        }
    }
}

struct PredicateLowering<'a, 'd> {
    name: &'a str,
    range: TextRange,
    args: Vec<PredicateArg>,
    captures: &'a IndexMap<String, CaptureId>,
    diag: &'d mut Diagnostics,
}

impl PredicateLowering<'_, '_> {
    fn arity(&mut self, min: usize, max: Option<usize>) -> Option<()> {
        let n = self.args.len();
        if n >= min && max.is_none_or(|max| n <= max) {
            return Some(());
        }
        let expected = match max {
            Some(max) if max == min => format!("{min}"),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        self.diag
            .report(DiagnosticKind::PredicateArity, self.range)
            .message(format!(
                "`#{}` takes {expected} arguments, found {n}",
                self.name
            ))
            .emit();
        None
    }

    fn capture(&mut self, index: usize) -> Option<CaptureId> {
        let PredicateArg::Capture(capture_ref) = &self.args[index] else {
            let range = self.args[index].text_range();
            self.diag
                .report(DiagnosticKind::PredicateArgument, range)
                .message(format!(
                    "argument {} of `#{}` must be a capture",
                    index + 1,
                    self.name
                ))
                .emit();
            return None;
        };
        // A missing name was already reported by the parser.
        let token = capture_ref.name()?;
        match self.captures.get(token.text()) {
            Some(id) => Some(*id),
            None => {
                self.diag
                    .report(DiagnosticKind::UndefinedCapture, token.text_range())
                    .message(token.text())
                    .emit();
                None
            }
        }
    }

    fn string(&mut self, index: usize) -> Option<String> {
        let PredicateArg::Str(s) = &self.args[index] else {
            let range = self.args[index].text_range();
            self.diag
                .report(DiagnosticKind::PredicateArgument, range)
                .message(format!(
                    "argument {} of `#{}` must be a string",
                    index + 1,
                    self.name
                ))
                .emit();
            return None;
        };
        lower_string(s, self.diag)
    }

    /// A string or a bare identifier.
    fn word(&mut self, index: usize) -> Option<String> {
        match &self.args[index] {
            PredicateArg::Ident(token) => Some(token.text().to_string()),
            PredicateArg::Str(s) => lower_string(s, self.diag),
            PredicateArg::Capture(c) => {
                self.diag
                    .report(DiagnosticKind::PredicateArgument, c.text_range())
                    .message(format!(
                        "argument {} of `#{}` must be a string or identifier",
                        index + 1,
                        self.name
                    ))
                    .emit();
                None
            }
        }
    }

    fn regex(&mut self, index: usize) -> Option<TextRegex> {
        let range = self.args[index].text_range();
        let pattern = self.string(index)?;
        compile_regex(&pattern, range, self.diag)
    }
}

/// Unescaped content of a string literal, reporting bad escapes.
pub fn lower_string(s: &parser::Str, diag: &mut Diagnostics) -> Option<String> {
    let Some(token) = s.value() else {
        return Some(String::new());
    };
    match unescape(token.text()) {
        Ok(value) => Some(value),
        Err(err) => {
            let start = u32::from(token.text_range().start()) + err.range.start as u32;
            let end = u32::from(token.text_range().start()) + err.range.end as u32;
            diag.report(
                DiagnosticKind::InvalidEscape,
                TextRange::new(start.into(), end.into()),
            )
            .message(format!("`{}`", err.sequence))
            .emit();
            None
        }
    }
}

fn compile_regex(pattern: &str, range: TextRange, diag: &mut Diagnostics) -> Option<TextRegex> {
    if pattern.is_empty() {
        diag.report(DiagnosticKind::EmptyRegex, range).emit();
        return None;
    }

    // Octal off so `\1` reads as an (unsupported) backreference.
    if let Err(e) = ast::parse::ParserBuilder::new()
        .octal(false)
        .build()
        .parse(pattern)
    {
        diag.report(DiagnosticKind::RegexSyntaxError, range)
            .message(e.kind().to_string())
            .emit();
        return None;
    }

    match Regex::new(pattern) {
        Ok(regex) => Some(TextRegex {
            pattern: pattern.to_string(),
            regex,
        }),
        Err(e) => {
            diag.report(DiagnosticKind::RegexSyntaxError, range)
                .message(e.to_string())
                .emit();
            None
        }
    }
}
