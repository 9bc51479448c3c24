//! Diagnostic types for cargo-guardlint.

use crate::cli::Severity;
use guardlint::Finding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A finding as rendered by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Check id (e.g., call-pair-check)
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Rendered message
    pub message: String,

    /// Source location
    pub location: Location,

    /// Additional context/notes
    pub notes: Vec<String>,

    /// Suggested fix
    pub suggestion: Option<Suggestion>,
}

/// Source code location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
}

/// A suggested fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
    pub applicability: Applicability,
}

/// How confident we are in the suggestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Applicability {
    /// Needs human decision
    HasPlaceholders,
}

/// Check id with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticCode {
    pub code: String,
    pub category: Category,
}

/// Diagnostic categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    /// Acquire/release pairing
    ResourceLifecycle,
    /// Writes that need a guard call
    GuardedMutation,
    /// Checks registered by other modules
    Other,
}

impl DiagnosticCode {
    pub fn new(code: &str) -> Self {
        let category = match code {
            "call-pair-check" => Category::ResourceLifecycle,
            "persistent-data-check" => Category::GuardedMutation,
            _ => Category::Other,
        };

        Self {
            code: code.to_string(),
            category,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Diagnostic {
    /// Wrap a library finding at the given severity.
    pub fn from_finding(finding: &Finding, severity: Severity) -> Self {
        let code = DiagnosticCode::new(&finding.check);
        let (notes, suggestion) = match code.category {
            Category::ResourceLifecycle => (
                vec!["no release call appears anywhere in this function".to_string()],
                Some(Suggestion {
                    message: "release the resource on every path, or hand it to an owner that does".to_string(),
                    applicability: Applicability::HasPlaceholders,
                }),
            ),
            Category::GuardedMutation => (
                vec!["no guard call appears anywhere in this function".to_string()],
                Some(Suggestion {
                    message: "call one of the guard operations in this function before the write".to_string(),
                    applicability: Applicability::HasPlaceholders,
                }),
            ),
            Category::Other => (Vec::new(), None),
        };

        Self {
            code,
            severity,
            message: finding.message(),
            location: Location {
                file: finding.file.clone(),
                line: finding.location.line,
                column: finding.location.column,
                end_line: Some(finding.location.end_line),
                end_column: Some(finding.location.end_column),
            },
            notes,
            suggestion,
        }
    }

    /// Create a diagnostic builder
    pub fn builder(code: &str) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }
}

/// Builder for constructing diagnostics
pub struct DiagnosticBuilder {
    code: DiagnosticCode,
    severity: Severity,
    message: Option<String>,
    location: Option<Location>,
    notes: Vec<String>,
}

impl DiagnosticBuilder {
    pub fn new(code: &str) -> Self {
        Self {
            code: DiagnosticCode::new(code),
            severity: Severity::Warning,
            message: None,
            location: None,
            notes: Vec::new(),
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    pub fn location(mut self, loc: Location) -> Self {
        self.location = Some(loc);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message.unwrap_or_default(),
            location: self.location.unwrap_or(Location {
                file: PathBuf::new(),
                line: 0,
                column: 0,
                end_line: None,
                end_column: None,
            }),
            notes: self.notes,
            suggestion: None,
        }
    }
}
