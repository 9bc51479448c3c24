//! Report generation for cargo-guardlint.

use crate::cli::{OutputFormat, Severity};
use crate::diagnostics::Diagnostic;
use crate::output::{self, SarifTool};

/// Analysis report containing all diagnostics.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
    files_analyzed: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add diagnostics from a file analysis
    pub fn add_diagnostics(&mut self, diags: Vec<Diagnostic>) {
        self.diagnostics.extend(diags);
        self.files_analyzed += 1;
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn hint_count(&self) -> usize {
        self.count(Severity::Hint)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    /// Print with specific format
    pub fn print_with_format(&self, format: &OutputFormat) {
        match format {
            OutputFormat::Sarif => {
                let sarif = output::generate_sarif(&self.diagnostics, &SarifTool::guardlint());
                println!("{}", serde_json::to_string_pretty(&sarif).unwrap_or_default());
            }
            OutputFormat::Junit => {
                println!("{}", output::generate_junit(&self.diagnostics));
            }
            OutputFormat::Checkstyle => {
                println!("{}", output::generate_checkstyle(&self.diagnostics));
            }
            OutputFormat::Json => {
                for diag in &self.diagnostics {
                    output::print_diagnostic(diag, format);
                }
                println!("{}", serde_json::json!({
                    "summary": {
                        "files_analyzed": self.files_analyzed,
                        "errors": self.error_count(),
                        "warnings": self.warning_count(),
                        "hints": self.hint_count()
                    }
                }));
            }
            OutputFormat::Compact => {
                for diag in &self.diagnostics {
                    output::print_diagnostic(diag, format);
                }
            }
            OutputFormat::Terminal => {
                // Errors first; the sort is stable so file order is kept within a severity
                let mut sorted: Vec<&Diagnostic> = self.diagnostics.iter().collect();
                sorted.sort_by(|a, b| b.severity.cmp(&a.severity));

                for diag in sorted {
                    output::print_diagnostic(diag, format);
                }

                println!();
                output::print_summary(self.error_count(), self.warning_count(), self.hint_count());
                println!("Analyzed {} files", self.files_analyzed);
            }
        }
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
