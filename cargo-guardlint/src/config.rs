//! Configuration for cargo-guardlint.
//!
//! Loads settings from `.guardlint.toml` in the project root.

use crate::cli::{Args, Severity};
use anyhow::{Context, Result};
use guardlint::{CheckSelection, RuleOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration loaded from `.guardlint.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings
    pub global: GlobalConfig,

    /// Per-check levels and switches
    pub lints: LintConfig,

    /// Rule options, keyed `call-pair` and `persistent-data`
    pub rules: RuleOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Minimum severity to report
    pub min_severity: Severity,

    /// Paths to exclude from analysis
    pub exclude: Vec<String>,

    /// Paths whose code counts as system source
    pub system_paths: Vec<String>,

    /// Whether to fail on warnings in CI
    pub deny_warnings: bool,

    /// Check selection, e.g. `*,-persistent-data-check`
    pub checks: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Check levels: "allow", "warn", "deny"
    pub levels: HashMap<String, LintLevel>,

    /// Checks to completely disable
    pub disabled: Vec<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Hint,
            exclude: vec!["target/**".to_string()],
            system_paths: Vec::new(),
            deny_warnings: false,
            checks: "*".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `.guardlint.toml` or use defaults
    pub fn load(args: &Args) -> Result<Self> {
        let config_path = args.path.join(&args.config);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
            log::debug!("loaded configuration from {}", config_path.display());
            config
        } else {
            Config::default()
        };

        config.apply_cli_overrides(args);
        Ok(config)
    }

    /// Apply command-line argument overrides
    fn apply_cli_overrides(&mut self, args: &Args) {
        if args.deny_warnings {
            self.global.deny_warnings = true;
        }
        if let Some(min) = args.min_severity {
            self.global.min_severity = min;
        }
        if let Some(ref checks) = args.checks {
            self.global.checks = checks.clone();
        }
        self.global.exclude.extend(args.exclude.iter().cloned());
        self.global.system_paths.extend(args.system_path.iter().cloned());

        for id in &args.allow {
            self.lints.levels.insert(id.clone(), LintLevel::Allow);
        }
        for id in &args.deny {
            self.lints.levels.insert(id.clone(), LintLevel::Deny);
        }
    }

    /// Checks to run, with `disabled` folded in as negative patterns.
    pub fn selection(&self) -> Result<CheckSelection> {
        let mut patterns = self.global.checks.clone();
        for id in &self.lints.disabled {
            patterns.push_str(",-");
            patterns.push_str(id);
        }
        CheckSelection::parse(&patterns).map_err(Into::into)
    }

    /// Get the level for a check
    pub fn lint_level(&self, check: &str) -> LintLevel {
        self.lints.levels.get(check).copied().unwrap_or(LintLevel::Warn)
    }

    /// Check if a path should be excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        matches_any(&self.global.exclude, path)
    }

    /// Check if a path is system source
    pub fn is_system_path(&self, path: &Path) -> bool {
        matches_any(&self.global.system_paths, path)
    }
}

fn matches_any(patterns: &[String], path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let path_str = path_str.strip_prefix("./").unwrap_or(&path_str);
    patterns.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(path_str))
            .unwrap_or_else(|e| {
                log::warn!("ignoring invalid path pattern '{}': {}", pattern, e);
                false
            })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    Allow,
    Warn,
    Deny,
}

/// Generate a default `.guardlint.toml` configuration file
pub fn generate_default_config() -> String {
    r#"# guardlint static analysis configuration

[global]
# Minimum severity to report: "hint", "warning", "error"
min_severity = "hint"

# Paths to exclude from analysis (glob patterns)
exclude = [
    "target/**",
]

# Paths treated as system source (vendored or generated code)
system_paths = [
    "vendor/**",
]

# Fail on warnings (useful for CI)
deny_warnings = false

# Checks to run: comma separated globs, a leading '-' disables
checks = "*"

[lints]
# Completely disable specific checks
disabled = []

[lints.levels]
# Override check levels: "allow", "warn", "deny"
# call-pair-check = "deny"

[rules.call-pair]
acquire = "fopen"
release = "fclose"
# "skip" or "include" code under system_paths
system-source = "skip"

[rules.persistent-data]
member = "m_pJPersistentObjectData"
guards = ["Update", "UpdateNoRecompute"]
system-source = "include"
# Also accept `member.` besides `member->`
match-dot-access = false
# Look up guard calls once per function instead of once per write
cache-guard-lookups = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardlint::ExclusionPolicy;

    #[test]
    fn test_default_config_round_trips() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.global.system_paths, vec!["vendor/**"]);
        assert_eq!(config.rules, RuleOptions::default());
        assert_eq!(config.lint_level("call-pair-check"), LintLevel::Warn);
    }

    #[test]
    fn test_levels_and_disabled() {
        let config: Config = toml::from_str(
            r#"
            [lints]
            disabled = ["persistent-data-check"]

            [lints.levels]
            call-pair-check = "deny"

            [rules.persistent-data]
            system-source = "skip"
            "#,
        )
        .unwrap();
        assert_eq!(config.lint_level("call-pair-check"), LintLevel::Deny);
        let selection = config.selection().unwrap();
        assert!(selection.is_enabled("call-pair-check"));
        assert!(!selection.is_enabled("persistent-data-check"));
        assert_eq!(config.rules.persistent_data.system_source, ExclusionPolicy::Skip);
    }

    #[test]
    fn test_path_patterns() {
        let mut config = Config::default();
        config.global.system_paths.push("vendor/**".to_string());
        assert!(config.is_excluded(Path::new("./target/debug/build.rs")));
        assert!(config.is_system_path(Path::new("vendor/libc/src/lib.rs")));
        assert!(!config.is_system_path(Path::new("src/lib.rs")));
    }
}
