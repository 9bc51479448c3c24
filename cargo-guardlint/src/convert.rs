//! `cargo guardlint convert`: clang-tidy text logs to SARIF 2.1.0.

use crate::cli::Severity;
use crate::diagnostics::{Diagnostic, Location};
use crate::output::{self, SarifTool};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

const LINE_PATTERN: &str = r"^(?P<file>.*?):(?P<line>\d+):(?P<col>\d+):\s+(?P<severity>warning|error|note):\s+(?P<message>.*?)\s*\[(?P<rule>[^\]]+)\]\s*$";

/// The tool converted logs are attributed to.
pub fn clang_tidy() -> SarifTool<'static> {
    SarifTool {
        name: "clang-tidy",
        version: None,
        information_uri: "https://clang.llvm.org/extra/clang-tidy/",
    }
}

/// Parse every `file:line:col: severity: message [check]` line of a log.
///
/// Other lines (source excerpts, carets, summaries) are skipped. Paths are
/// resolved against `base` when relative. `warning` keeps its level; `error`
/// and `note` both become errors.
pub fn parse_log(text: &str, base: &Path) -> Result<Vec<Diagnostic>> {
    let re = Regex::new(LINE_PATTERN).context("invalid diagnostic line pattern")?;

    let mut diags = Vec::new();
    for line in text.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let (Ok(line_no), Ok(col)) = (caps["line"].parse::<usize>(), caps["col"].parse::<usize>()) else {
            log::debug!("skipping line with out-of-range position: {}", line);
            continue;
        };

        let severity = if &caps["severity"] == "warning" {
            Severity::Warning
        } else {
            Severity::Error
        };

        let mut builder = Diagnostic::builder(&caps["rule"]);
        if &caps["severity"] == "note" {
            builder = builder.note("reported as a note by clang-tidy");
        }

        diags.push(
            builder
                .severity(severity)
                .message(&caps["message"])
                .location(Location {
                    file: absolute(&caps["file"], base),
                    line: line_no,
                    column: col,
                    end_line: None,
                    end_column: None,
                })
                .build(),
        );
    }
    Ok(diags)
}

fn absolute(file: &str, base: &Path) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Read `input`, convert it and write pretty-printed SARIF to `output`.
///
/// Returns the number of results written.
pub fn convert(input: &Path, output: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let base = std::env::current_dir().context("failed to resolve the working directory")?;

    let diags = parse_log(&text, &base)?;
    let sarif = output::generate_sarif(&diags, &clang_tidy());
    let json = serde_json::to_string_pretty(&sarif).context("failed to serialize SARIF")?;

    std::fs::write(output, json).with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("converted {} diagnostics from {}", diags.len(), input.display());
    Ok(diags.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
src/io.c:12:5: warning: function 'leak' calls fopen but does not call fclose; potential resource leak [call-pair-check]
    FILE *f = fopen(path, \"r\");
    ^
/abs/obj.c:3:9: error: setting Persistent Data without a prior Update/UpdateNoRecompute in this function [persistent-data-check]
src/io.c:20:1: note: previous definition is here [bugprone-macro-parentheses]
2 warnings generated.
";

    #[test]
    fn test_parse_log_keeps_only_diagnostic_lines() {
        let diags = parse_log(LOG, Path::new("/work")).unwrap();
        assert_eq!(diags.len(), 3);

        assert_eq!(diags[0].code.code, "call-pair-check");
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].location.file, PathBuf::from("/work/src/io.c"));
        assert_eq!((diags[0].location.line, diags[0].location.column), (12, 5));
        assert!(diags[0].message.ends_with("potential resource leak"));

        assert_eq!(diags[1].location.file, PathBuf::from("/abs/obj.c"));
        assert_eq!(diags[1].severity, Severity::Error);

        assert_eq!(diags[2].severity, Severity::Error);
        assert_eq!(diags[2].message, "previous definition is here");
        assert_eq!(diags[2].notes.len(), 1);
    }

    #[test]
    fn test_sarif_attributed_to_clang_tidy() {
        let diags = parse_log(LOG, Path::new("/work")).unwrap();
        let sarif = output::generate_sarif(&diags, &clang_tidy());
        let run = &sarif["runs"][0];

        assert_eq!(sarif["version"], "2.1.0");
        assert_eq!(run["tool"]["driver"]["name"], "clang-tidy");
        assert!(run["tool"]["driver"].get("version").is_none());
        assert_eq!(run["columnKind"], "utf16CodeUnits");
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 3);
        assert_eq!(
            run["tool"]["driver"]["rules"][2]["fullDescription"]["text"],
            "Diagnostic emitted by clang-tidy rule bugprone-macro-parentheses"
        );

        let region = &run["results"][0]["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 12);
        assert_eq!(region["startColumn"], 5);
        assert!(region.get("endLine").is_none());
    }

    #[test]
    fn test_convert_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tidy.log");
        let out = dir.path().join("out.sarif");
        std::fs::write(&input, LOG).unwrap();

        assert_eq!(convert(&input, &out).unwrap(), 3);
        let sarif: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(sarif["runs"][0]["results"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_log() {
        assert!(parse_log("no diagnostics here\n", Path::new("/")).unwrap().is_empty());
    }
}
