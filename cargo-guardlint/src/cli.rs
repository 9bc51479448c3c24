//! Command-line interface for cargo-guardlint.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cargo-guardlint",
    bin_name = "cargo",
    about = "Static analysis for unpaired acquire/release calls and unguarded persistent-data writes",
    version,
    after_help = "EXAMPLES:
    cargo guardlint                               Run every check
    cargo guardlint --checks '*,-persistent-*'    Run only the call-pair check
    cargo guardlint --format sarif                Output for GitHub Actions
    cargo guardlint --system-path 'vendor/**'     Treat vendored code as system source
    cargo guardlint explain call-pair-check       Explain a check
    cargo guardlint show src/io.rs                Show findings for one file
    cargo guardlint convert tidy.log out.sarif    Convert a clang-tidy log to SARIF"
)]
pub struct Args {
    /// Cargo subcommand (guardlint)
    #[arg(hide = true)]
    pub subcommand: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to analyze (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: PathBuf,

    /// Checks to run: comma separated globs, `-` disables (e.g. `*,-persistent-data-check`)
    #[arg(long, short = 'c', value_name = "SELECTION")]
    pub checks: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Treat findings of a check as errors (e.g., --deny call-pair-check)
    #[arg(long, short = 'D', value_name = "CHECK")]
    pub deny: Vec<String>,

    /// Suppress findings of a check
    #[arg(long, short = 'A', value_name = "CHECK")]
    pub allow: Vec<String>,

    /// Treat warnings as errors
    #[arg(long, short = 'W')]
    pub deny_warnings: bool,

    /// Exclude paths from analysis (glob pattern)
    #[arg(long, short = 'e', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Mark matching files as system source (glob pattern)
    #[arg(long, value_name = "PATTERN")]
    pub system_path: Vec<String>,

    /// Show verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file path, relative to --path
    #[arg(long, default_value = ".guardlint.toml", global = true)]
    pub config: PathBuf,

    /// Minimum severity to report
    #[arg(long, value_enum)]
    pub min_severity: Option<Severity>,

    /// Fail fast: stop on first error
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Explain a check in detail
    Explain {
        /// Check id to explain (e.g., call-pair-check)
        check: String,
    },

    /// Show findings for a specific file with full context
    Show {
        /// File path to analyze
        file: PathBuf,
    },

    /// Initialize a .guardlint.toml configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// List all available checks
    List,

    /// Convert a clang-tidy text log to SARIF 2.1.0
    Convert {
        /// Log with lines like `file:line:col: warning: message [check]`
        input: PathBuf,

        /// SARIF file to write
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output with colors
    #[default]
    Terminal,
    /// JSON output for programmatic consumption
    Json,
    /// SARIF format for GitHub Actions / VS Code
    Sarif,
    /// JUnit XML format for test reporting systems
    Junit,
    /// Checkstyle XML format for Jenkins and legacy CI
    Checkstyle,
    /// clang-tidy style one-line-per-issue format
    Compact,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational hints
    #[default]
    Hint,
    /// Warnings - probably wrong
    Warning,
    /// Errors - definitely wrong
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}
