//! cargo-guardlint: command-line front end for guardlint
//!
//! Reports functions that acquire a resource without releasing it and
//! persistent-data writes in functions that never call a guard.
//!
//! # Usage
//!
//! ```bash
//! # Run every check on the current crate
//! cargo guardlint
//!
//! # Select checks with globs
//! cargo guardlint --checks 'call-pair-*'
//! cargo guardlint --checks '*,-persistent-data-check'
//!
//! # Output formats for CI
//! cargo guardlint --format sarif      # GitHub Actions
//! cargo guardlint --format compact    # file:line:col: warning: message [check]
//! cargo guardlint --format junit      # Test reporters
//!
//! # Levels and paths
//! cargo guardlint --deny call-pair-check --allow persistent-data-check
//! cargo guardlint --exclude "**/tests/**" --system-path "vendor/**"
//!
//! # Subcommands
//! cargo guardlint explain call-pair-check
//! cargo guardlint show src/io.rs
//! cargo guardlint list
//! cargo guardlint init
//! cargo guardlint convert tidy.log report.sarif
//! ```

mod cli;
mod config;
mod convert;
mod diagnostics;
mod explain;
mod output;
mod parser;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command, OutputFormat, Severity};
use config::LintLevel;
use diagnostics::Diagnostic;
use guardlint::{CheckRegistry, Engine, Origin};
use std::path::Path;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Some(ref cmd) = args.command {
        return handle_subcommand(cmd, &args);
    }

    let analyzer = Analyzer::new(args)?;
    let report = analyzer.run()?;

    report.print_with_format(&analyzer.args.format);

    // Exit codes
    if report.has_errors() {
        std::process::exit(1);
    } else if report.has_warnings() && analyzer.config.global.deny_warnings {
        std::process::exit(1);
    } else if analyzer.has_denied_issues(&report) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn handle_subcommand(cmd: &Command, args: &Args) -> Result<()> {
    match cmd {
        Command::Explain { check } => {
            if let Some(explanation) = explain::get_explanation(check) {
                explain::print_explanation(&explanation);
            } else {
                eprintln!("Unknown check: {}", check);
                eprintln!("Run `cargo guardlint list` to see all available checks.");
                std::process::exit(1);
            }
        }

        Command::Show { file } => {
            let analyzer = Analyzer::new(args.clone())?;

            if !file.exists() {
                eprintln!("File not found: {}", file.display());
                std::process::exit(1);
            }

            println!("{}", output::header(&format!("Analyzing {}", file.display())));

            let diags = match analyzer.analyze_file(file) {
                Ok(diags) => diags,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(1);
                }
            };

            if diags.is_empty() {
                println!("No issues found in {}.", file.display());
            } else {
                for diag in &diags {
                    output::print_diagnostic(diag, &OutputFormat::Terminal);
                }
                output::print_summary(
                    diags.iter().filter(|d| d.severity == Severity::Error).count(),
                    diags.iter().filter(|d| d.severity == Severity::Warning).count(),
                    diags.iter().filter(|d| d.severity == Severity::Hint).count(),
                );
            }
        }

        Command::Init { force } => {
            let config_path = args.path.join(&args.config);

            if config_path.exists() && !force {
                eprintln!("{} already exists. Use --force to overwrite.", config_path.display());
                std::process::exit(1);
            }

            std::fs::write(&config_path, config::generate_default_config())?;
            println!("Created {}", config_path.display());
        }

        Command::List => {
            explain::list_all_codes(&CheckRegistry::with_builtin_checks());
        }

        Command::Convert { input, output } => {
            let count = convert::convert(input, output)?;
            println!("Wrote {} results to {}", count, output.display());
        }
    }

    Ok(())
}

struct Analyzer {
    args: Args,
    config: config::Config,
    engine: Engine,
}

impl Analyzer {
    fn new(args: Args) -> Result<Self> {
        let config = config::Config::load(&args)?;
        let registry = CheckRegistry::with_builtin_checks();
        let engine = Engine::from_registry(&registry, &config.selection()?, &config.rules);
        log::debug!("enabled checks: {}", engine.checks().collect::<Vec<_>>().join(", "));
        Ok(Self { args, config, engine })
    }

    fn run(&self) -> Result<report::Report> {
        let mut report = report::Report::new();

        let mut source_files = parser::find_rust_files(&self.args.path)?;
        source_files.retain(|path| !self.config.is_excluded(parser::relative_to(path, &self.args.path)));

        // Quiet mode for non-terminal formats
        let quiet = !matches!(self.args.format, OutputFormat::Terminal);

        if !quiet {
            println!(
                "{}",
                output::header(&format!("Analyzing {} files", source_files.len()))
            );
        }

        for file_path in &source_files {
            log::debug!("checking {}", file_path.display());

            match self.analyze_file(file_path) {
                Ok(diags) => {
                    report.add_diagnostics(diags);

                    if self.args.fail_fast && report.has_errors() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("ERROR: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Ok(report)
    }

    /// Run the enabled checks on one file and apply levels and filters.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let origin = if self.config.is_system_path(parser::relative_to(path, &self.args.path)) {
            Origin::System
        } else {
            Origin::User
        };

        let ast = parser::parse_file(path, origin)?;
        let findings = self.engine.run(&ast);

        Ok(findings
            .iter()
            .filter_map(|finding| {
                let severity = match self.config.lint_level(&finding.check) {
                    LintLevel::Allow => return None,
                    LintLevel::Warn => Severity::Warning,
                    LintLevel::Deny => Severity::Error,
                };
                Some(Diagnostic::from_finding(finding, severity))
            })
            .filter(|d| d.severity >= self.config.global.min_severity)
            .collect())
    }

    /// Check if any diagnostics belong to a denied check
    fn has_denied_issues(&self, report: &report::Report) -> bool {
        report
            .diagnostics()
            .iter()
            .any(|d| self.config.lint_level(&d.code.code) == LintLevel::Deny)
    }
}
