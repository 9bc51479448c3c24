//! Source file discovery and loading for cargo-guardlint.

use anyhow::{Context, Result};
use guardlint::{frontend, Ast, Origin};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find all Rust source files under `root`, or `root` itself if it is a file.
pub fn find_rust_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !is_target_dir(e)))
    {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();

        if entry.file_type().is_file() && path.extension().map_or(false, |e| e == "rs") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read, parse and lower a Rust source file.
pub fn parse_file(path: &Path, origin: Origin) -> Result<Ast> {
    frontend::parse_file(path, origin).with_context(|| format!("failed to analyze {}", path.display()))
}

/// `path` relative to `root`, for matching path globs.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_target_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_name() == "target"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_rust_files_skips_hidden_and_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "fn a() {}").unwrap();
        fs::write(dir.path().join("src/nested/b.rs"), "fn b() {}").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "").unwrap();
        fs::write(dir.path().join("target/debug/gen.rs"), "fn g() {}").unwrap();
        fs::write(dir.path().join(".git/hook.rs"), "fn h() {}").unwrap();

        let files = find_rust_files(dir.path()).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|f| relative_to(f, dir.path()).to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["src/lib.rs", "src/nested/b.rs"]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.rs");
        fs::write(&file, "fn one() {}").unwrap();
        assert_eq!(find_rust_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_parse_error_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.rs");
        fs::write(&file, "fn (").unwrap();
        let err = parse_file(&file, Origin::User).unwrap_err();
        assert!(format!("{err:#}").contains("bad.rs"));
    }
}
