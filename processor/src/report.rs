use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Severity of a processing note.
///
/// `Always` marks notes that must reach the user regardless of any
/// verbosity filtering, such as validation verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLevel {
    Info,
    Warning,
    Error,
    Always,
}

impl NoteLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteLevel::Info => "info",
            NoteLevel::Warning => "warning",
            NoteLevel::Error => "error",
            NoteLevel::Always => "note",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            NoteLevel::Info | NoteLevel::Always => Severity::Note,
            NoteLevel::Warning => Severity::Warning,
            NoteLevel::Error => Severity::Error,
        }
    }
}

/// One leveled message produced while processing a command block.
/// Notes about remote state usually have no span; notes about document
/// content carry the span of the offending block or section.
#[derive(Debug, Clone)]
pub struct Note {
    pub level: NoteLevel,
    pub message: String,
    pub span: Option<Range<usize>>,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.as_str(), self.message)
    }
}

/// Collects processing notes for one document run.
///
/// Expected conditions (missing attribute, not-found, already-exists) flow
/// through here rather than through error returns: handlers record a note,
/// flip their validity flag, and keep going.
#[derive(Debug, Default)]
pub struct Reporter {
    notes: Vec<Note>,
    pub source_id: usize,
}

impl Reporter {
    pub fn new(source_id: usize) -> Self {
        Reporter {
            notes: Vec::new(),
            source_id,
        }
    }

    pub fn push(&mut self, level: NoteLevel, message: impl Into<String>) {
        self.notes.push(Note {
            level,
            message: message.into(),
            span: None,
        });
    }

    pub fn push_spanned(
        &mut self,
        level: NoteLevel,
        message: impl Into<String>,
        span: Range<usize>,
    ) {
        self.notes.push(Note {
            level,
            message: message.into(),
            span: Some(span),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoteLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoteLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoteLevel::Error, message);
    }

    pub fn always(&mut self, message: impl Into<String>) {
        self.push(NoteLevel::Always, message);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn has_errors(&self) -> bool {
        self.notes.iter().any(|n| n.level == NoteLevel::Error)
    }

    /// Convert collected notes to codespan diagnostics for terminal display.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic<usize>> {
        self.notes
            .iter()
            .map(|note| {
                let diagnostic =
                    Diagnostic::new(note.level.severity()).with_message(&note.message);
                match &note.span {
                    Some(span) => diagnostic
                        .with_labels(vec![Label::primary(self.source_id, span.clone())]),
                    None => diagnostic,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_tracks_error_notes_only() {
        let mut reporter = Reporter::new(0);
        reporter.info("fine");
        reporter.warning("also fine");
        assert!(!reporter.has_errors());
        reporter.error("broken");
        assert!(reporter.has_errors());
    }

    #[test]
    fn spanned_notes_become_labeled_diagnostics() {
        let mut reporter = Reporter::new(3);
        reporter.push_spanned(NoteLevel::Error, "bad block", 5..12);
        let diagnostics = reporter.to_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].labels.len(), 1);
        assert_eq!(diagnostics[0].labels[0].file_id, 3);
    }
}
