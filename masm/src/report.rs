//! Diagnostic records and the reporter they are streamed through.
//!
//! The reporter is injected into every stage, so the driver can print to
//! stderr while tests capture the exact error stream.

use colored::Colorize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single message tied to a source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file_name: String,
    pub line_number: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file_name: &str, line_number: u32, message: String) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            file_name: file_name.to_owned(),
            line_number,
            message,
        }
    }

    pub fn warning(file_name: &str, line_number: u32, message: String) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            file_name: file_name.to_owned(),
            line_number,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{} (file {}, line {}): {}",
            tag, self.file_name, self.line_number, self.message
        )
    }
}

/// Sink for diagnostics.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Prints diagnostics to stderr with a colored severity tag.
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        let tag = match diagnostic.severity {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        eprintln!(
            "{} (file {}, line {}): {}",
            tag, diagnostic.file_name, diagnostic.line_number, diagnostic.message
        );
    }
}

/// Keeps every reported diagnostic, in order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> CollectingReporter {
        CollectingReporter::default()
    }

    pub fn errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics.len() - self.errors()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
