use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::{DiagnosticMessage, Diagnostics};

/// Renders diagnostics as annotated source snippets, or as one line per
/// error when no source is attached.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    renderer: Renderer,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            renderer: Renderer::plain(),
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in snippet headers.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.renderer = if colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        self
    }

    pub fn render(&self) -> String {
        let blocks: Vec<String> = match self.source {
            Some(source) => self
                .diagnostics
                .iter()
                .map(|d| self.snippet(d, source))
                .collect(),
            None => self.diagnostics.iter().map(ToString::to_string).collect(),
        };
        blocks.join("\n")
    }

    fn snippet(&self, diagnostic: &DiagnosticMessage, source: &str) -> String {
        let primary = span_of(diagnostic.range, source);
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(primary.clone())
                .label(&diagnostic.message),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        let snippet = diagnostic.related.iter().fold(snippet, |snippet, related| {
            snippet.annotation(
                AnnotationKind::Context
                    .span(span_of(related.range, source))
                    .label(&related.message),
            )
        });

        let mut report = vec![Level::ERROR.primary_title(&diagnostic.message).element(snippet)];
        if let Some(fix) = &diagnostic.fix {
            report.push(
                Level::HELP.secondary_title(&fix.description).element(
                    Snippet::source(source)
                        .line_start(1)
                        .patch(Patch::new(primary, &fix.replacement)),
                ),
            );
        }
        report.extend(
            diagnostic
                .hints
                .iter()
                .map(|hint| Group::with_title(Level::HELP.secondary_title(hint))),
        );
        self.renderer.render(&report)
    }
}

/// Byte span to underline. An empty range is widened to the character after
/// it so the caret has something to sit under.
fn span_of(range: TextRange, source: &str) -> std::ops::Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start < end {
        return start..end;
    }
    let next = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + next
}
