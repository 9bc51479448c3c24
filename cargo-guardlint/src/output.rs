//! Output formatting for cargo-guardlint diagnostics.

use crate::cli::{OutputFormat, Severity};
use crate::diagnostics::{Applicability, Diagnostic};
use crate::explain;
use colored::*;
use std::collections::{BTreeMap, HashSet};

/// Format a header line
pub fn header(text: &str) -> String {
    format!("{} {}", "cargo-guardlint".cyan().bold(), text)
}

/// Print a diagnostic to the terminal
pub fn print_diagnostic(diag: &Diagnostic, format: &OutputFormat) {
    match format {
        OutputFormat::Terminal => print_terminal(diag),
        OutputFormat::Compact => println!("{}", compact_line(diag)),
        OutputFormat::Json => print_json(diag),
        OutputFormat::Sarif => {}      // Handled at report level
        OutputFormat::Junit => {}      // Handled at report level
        OutputFormat::Checkstyle => {} // Handled at report level
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Hint => "hint".cyan().bold(),
    }
}

fn print_terminal(diag: &Diagnostic) {
    println!(
        "{}[{}]: {}",
        severity_label(diag.severity),
        diag.code.code.bold(),
        diag.message.bold()
    );

    println!(
        "  {} {}:{}:{}",
        "-->".blue().bold(),
        diag.location.file.display(),
        diag.location.line,
        diag.location.column
    );

    // Source context
    if let Ok(source) = std::fs::read_to_string(&diag.location.file) {
        let lines: Vec<&str> = source.lines().collect();
        if diag.location.line > 0 && diag.location.line <= lines.len() {
            let line_num = diag.location.line;
            let padding = " ".repeat(line_num.to_string().len());

            println!("   {} {}", padding, "|".blue().bold());
            println!(
                "   {} {} {}",
                line_num.to_string().blue().bold(),
                "|".blue().bold(),
                lines[line_num - 1]
            );

            if diag.location.column > 0 {
                let underline_start = diag.location.column - 1;
                // Multi-line spans are underlined to the end of the first line.
                let underline_len = match (diag.location.end_line, diag.location.end_column) {
                    (Some(end_line), Some(end_col)) if end_line == line_num => {
                        end_col.saturating_sub(diag.location.column).max(1)
                    }
                    _ => lines[line_num - 1].len().saturating_sub(underline_start).max(1),
                };

                let underline = format!("{}{}", " ".repeat(underline_start), "^".repeat(underline_len));
                let colored_underline = match diag.severity {
                    Severity::Error => underline.red().bold(),
                    Severity::Warning => underline.yellow().bold(),
                    Severity::Hint => underline.cyan().bold(),
                };

                println!("   {} {} {}", padding, "|".blue().bold(), colored_underline);
            }

            println!("   {} {}", padding, "|".blue().bold());
        }
    }

    for note in &diag.notes {
        println!("   {} {}: {}", "=".blue().bold(), "note".bold(), note);
    }

    if let Some(ref suggestion) = diag.suggestion {
        let help_prefix = match suggestion.applicability {
            Applicability::HasPlaceholders => "help",
        };
        println!(
            "   {} {}: {}",
            "=".blue().bold(),
            help_prefix.green().bold(),
            suggestion.message
        );
    }

    println!(
        "   {} see: {}",
        "=".blue().bold(),
        format!("cargo guardlint explain {}", diag.code.code).dimmed()
    );

    println!();
}

/// `file:line:col: severity: message [check]`, the clang-tidy line format.
pub fn compact_line(diag: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {}: {} [{}]",
        diag.location.file.display(),
        diag.location.line,
        diag.location.column,
        diag.severity.as_str(),
        diag.message,
        diag.code.code
    )
}

fn print_json(diag: &Diagnostic) {
    match serde_json::to_string(diag) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("failed to serialize diagnostic: {}", e),
    }
}

/// Which tool a SARIF log is attributed to.
pub struct SarifTool<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
    pub information_uri: &'a str,
}

impl SarifTool<'static> {
    pub fn guardlint() -> Self {
        Self {
            name: "cargo-guardlint",
            version: Some(env!("CARGO_PKG_VERSION")),
            information_uri: "https://docs.rs/guardlint",
        }
    }
}

/// Generate SARIF 2.1.0 output for all diagnostics
pub fn generate_sarif(diagnostics: &[Diagnostic], tool: &SarifTool<'_>) -> serde_json::Value {
    let results: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            let mut region = serde_json::json!({
                "startLine": d.location.line,
                "startColumn": d.location.column,
            });
            if let (Some(end_line), Some(end_column)) = (d.location.end_line, d.location.end_column) {
                region["endLine"] = end_line.into();
                region["endColumn"] = end_column.into();
            }
            serde_json::json!({
                "ruleId": d.code.code,
                "level": match d.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Hint => "note",
                },
                "message": {
                    "text": d.message
                },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": d.location.file.to_string_lossy()
                        },
                        "region": region
                    }
                }]
            })
        })
        .collect();

    let mut driver = serde_json::json!({
        "name": tool.name,
        "informationUri": tool.information_uri,
        "rules": generate_rules(diagnostics, tool),
    });
    if let Some(version) = tool.version {
        driver["version"] = version.into();
    }

    serde_json::json!({
        "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": { "driver": driver },
            "results": results,
            "columnKind": "utf16CodeUnits"
        }]
    })
}

/// One rule entry per distinct check id, in first-seen order.
fn generate_rules(diagnostics: &[Diagnostic], tool: &SarifTool<'_>) -> Vec<serde_json::Value> {
    let mut seen = HashSet::new();
    let mut rules = Vec::new();
    for d in diagnostics {
        if !seen.insert(d.code.code.as_str()) {
            continue;
        }
        let description = explain::get_explanation(&d.code.code)
            .map(|e| e.summary.to_string())
            .unwrap_or_else(|| format!("Diagnostic emitted by {} rule {}", tool.name, d.code.code));
        rules.push(serde_json::json!({
            "id": d.code.code,
            "name": d.code.code,
            "shortDescription": { "text": d.code.code },
            "fullDescription": { "text": description },
            "defaultConfiguration": { "level": "warning" }
        }));
    }
    rules
}

/// Print a summary line
pub fn print_summary(errors: usize, warnings: usize, hints: usize) {
    if errors == 0 && warnings == 0 && hints == 0 {
        println!("{}", "No issues found ✓".green().bold());
        return;
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let mut parts = Vec::new();

    if errors > 0 {
        parts.push(format!("{} error{}", errors, plural(errors)).red().bold().to_string());
    }
    if warnings > 0 {
        parts.push(format!("{} warning{}", warnings, plural(warnings)).yellow().bold().to_string());
    }
    if hints > 0 {
        parts.push(format!("{} hint{}", hints, plural(hints)).cyan().to_string());
    }

    println!("{}: {}", "Summary".bold(), parts.join(", "));
}

/// Generate JUnit XML output for test reporting systems
pub fn generate_junit(diagnostics: &[Diagnostic]) -> String {
    let failures = diagnostics.iter().filter(|d| d.severity >= Severity::Warning).count();
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites name=\"cargo-guardlint\" tests=\"{}\" failures=\"{}\">\n  <testsuite name=\"guardlint-analysis\">\n",
        diagnostics.len(),
        failures
    );

    for diag in diagnostics {
        xml.push_str(&format!(
            "    <testcase name=\"{}\" classname=\"{}\">\n",
            escape_xml(&diag.code.code),
            escape_xml(&diag.location.file.to_string_lossy())
        ));

        let position = format!(
            "{}:{}:{}",
            diag.location.file.display(),
            diag.location.line,
            diag.location.column
        );
        match diag.severity {
            Severity::Error | Severity::Warning => {
                xml.push_str(&format!(
                    "      <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                    escape_xml(&diag.message),
                    diag.severity.as_str(),
                    escape_xml(&position)
                ));
            }
            Severity::Hint => {
                xml.push_str(&format!(
                    "      <system-out>{}: {}</system-out>\n",
                    escape_xml(&diag.code.code),
                    escape_xml(&diag.message)
                ));
            }
        }

        xml.push_str("    </testcase>\n");
    }

    xml.push_str("  </testsuite>\n</testsuites>");
    xml
}

/// Generate Checkstyle XML output for Jenkins and legacy CI
pub fn generate_checkstyle(diagnostics: &[Diagnostic]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<checkstyle version=\"4.3\">\n");

    // Group by file, in path order
    let mut by_file: BTreeMap<String, Vec<&Diagnostic>> = BTreeMap::new();
    for diag in diagnostics {
        let file = diag.location.file.to_string_lossy().to_string();
        by_file.entry(file).or_default().push(diag);
    }

    for (file, diags) in by_file {
        xml.push_str(&format!("  <file name=\"{}\">\n", escape_xml(&file)));

        for diag in diags {
            let severity = match diag.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Hint => "info",
            };

            xml.push_str(&format!(
                "    <error line=\"{}\" column=\"{}\" severity=\"{}\" message=\"{}\" source=\"guardlint.{}\"/>\n",
                diag.location.line,
                diag.location.column,
                severity,
                escape_xml(&diag.message),
                escape_xml(&diag.code.code)
            ));
        }

        xml.push_str("  </file>\n");
    }

    xml.push_str("</checkstyle>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;
    use std::path::PathBuf;

    fn diag(code: &str, severity: Severity, message: &str) -> Diagnostic {
        Diagnostic::builder(code)
            .severity(severity)
            .message(message)
            .location(Location {
                file: PathBuf::from("src/io.rs"),
                line: 4,
                column: 13,
                end_line: Some(4),
                end_column: Some(30),
            })
            .build()
    }

    #[test]
    fn test_compact_is_tidy_format() {
        let d = diag("call-pair-check", Severity::Warning, "function 'leak' calls fopen but does not call fclose; potential resource leak");
        assert_eq!(
            compact_line(&d),
            "src/io.rs:4:13: warning: function 'leak' calls fopen but does not call fclose; potential resource leak [call-pair-check]"
        );
    }

    #[test]
    fn test_sarif_rules_are_distinct() {
        let diags = vec![
            diag("call-pair-check", Severity::Warning, "a"),
            diag("call-pair-check", Severity::Error, "b"),
            diag("persistent-data-check", Severity::Warning, "c"),
        ];
        let sarif = generate_sarif(&diags, &SarifTool::guardlint());
        let run = &sarif["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 2);
        assert_eq!(run["results"].as_array().unwrap().len(), 3);
        assert_eq!(run["results"][1]["level"], "error");
        assert_eq!(run["results"][0]["locations"][0]["physicalLocation"]["region"]["endColumn"], 30);
    }

    #[test]
    fn test_xml_escaping() {
        let d = diag("call-pair-check", Severity::Warning, "function 'a<b>' & more");
        let xml = generate_checkstyle(&[d.clone()]);
        assert!(xml.contains("message=\"function &apos;a&lt;b&gt;&apos; &amp; more\""));
        let junit = generate_junit(&[d]);
        assert!(junit.contains("failures=\"1\""));
    }
}
