//! Compile diagnostics: collection, cascade filtering and rendering.

mod message;
mod printer;

#[cfg(test)]
mod tests;

use rowan::TextRange;

pub use message::{DiagnosticKind, DiagnosticMessage, Fix, RelatedInfo};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<DiagnosticMessage>);

/// A report under construction. Nothing is recorded until [`emit`](Self::emit).
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Vec<DiagnosticMessage>,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a report of `kind` at `range`, titled with the kind's own message.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: &mut self.0,
            message: DiagnosticMessage::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.0.iter()
    }

    /// Drops errors that are fallout of another one, then sorts by position.
    ///
    /// The result does not depend on the order errors were reported in.
    pub fn filtered(&self) -> Diagnostics {
        let mut kept: Vec<_> = self
            .0
            .iter()
            .enumerate()
            .filter(|&(i, b)| {
                !self
                    .0
                    .iter()
                    .enumerate()
                    .any(|(j, a)| i != j && hides(a, b))
            })
            .map(|(_, m)| m.clone())
            .collect();
        kept.sort_by_key(|m| (m.range.start(), m.kind));
        Diagnostics(kept)
    }

    /// The error to fix first.
    pub fn first(&self) -> Option<DiagnosticMessage> {
        self.filtered().0.into_iter().next()
    }

    pub fn printer<'d, 's>(&'d self, source: &'s str) -> DiagnosticsPrinter<'d, 's> {
        DiagnosticsPrinter::new(self).source(source)
    }

    pub fn render(&self, source: &str) -> String {
        self.printer(source).render()
    }
}

/// Whether `b` is noise next to `a`.
///
/// At the same offset a missing piece outranks an unclosed delimiter, which
/// otherwise would win on priority. Elsewhere `a` must strictly contain `b`.
fn hides(a: &DiagnosticMessage, b: &DiagnosticMessage) -> bool {
    let (a_kind, b_kind) = (a.kind, b.kind);
    if a.range.start() == b.range.start() {
        if a_kind.is_structural_error() && b_kind.is_root_cause_error() {
            return false;
        }
        return (a_kind.is_root_cause_error() && b_kind.is_structural_error())
            || a_kind.suppresses(&b_kind);
    }
    a.range.start() < b.range.start()
        && b.range.end() <= a.range.end()
        && a_kind.suppresses(&b_kind)
}

impl DiagnosticBuilder<'_> {
    /// Replaces the title with one carrying `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        self.message.message = self.message.kind.with_detail(&detail.into());
        self
    }

    pub fn related_to(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix {
            description: description.into(),
            replacement: replacement.into(),
        });
        self
    }

    pub fn emit(self) {
        self.sink.push(self.message);
    }
}
