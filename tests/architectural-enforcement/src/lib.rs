//! Architectural Enforcement
//!
//! Source scans that keep the workspace honest:
//! - no blocking or timed sleeps in production code (wait on timers and I/O)
//! - no `unwrap()`/`expect()` in production code (propagate errors)
//!
//! Only production code is scanned: everything from a file's first
//! `#[cfg(test)]` onwards is skipped, as are `tests/` directories.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden call found in a source file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root (two levels above this crate)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Production source directories of the workspace
pub const SOURCE_DIRS: &[&str] = &["folio/core/src", "tui/src"];

/// Scan every `.rs` file under `dir` for any of `patterns`
pub fn scan_directory(dir: &Path, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !dir.exists() {
        return violations;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            if let Ok(content) = fs::read_to_string(entry.path()) {
                violations.extend(scan_source(entry.path(), &content, patterns));
            }
        }
    }

    violations
}

/// Scan one file's contents, stopping at its test module
pub fn scan_source(path: &Path, content: &str, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }

        // Skip comments
        let code_part = line.split("//").next().unwrap_or(line);

        if patterns.iter().any(|p| code_part.contains(p)) {
            violations.push(Violation {
                path: path.to_path_buf(),
                line: idx + 1,
                text: line.trim().to_string(),
            });
        }
    }

    violations
}

/// Scan all production source directories
pub fn scan_workspace(patterns: &[&str]) -> Vec<Violation> {
    let root = workspace_root();
    SOURCE_DIRS
        .iter()
        .flat_map(|dir| scan_directory(&root.join(dir), patterns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
fn run() {
    tokio::time::sleep_until(deadline).await;
    // std::thread::sleep(d) in a comment is fine
    std::thread::sleep(d);
}

#[cfg(test)]
mod tests {
    fn slow() { std::thread::sleep(d); }
}
";

    #[test]
    fn test_scan_source_skips_comments_and_tests() {
        let found = scan_source(Path::new("x.rs"), SAMPLE, &["::sleep("]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 4);
        assert_eq!(found[0].to_string(), "x.rs:4 - std::thread::sleep(d);");
    }

    #[test]
    fn test_source_dirs_exist() {
        let root = workspace_root();
        for dir in SOURCE_DIRS {
            assert!(root.join(dir).is_dir(), "missing {}", dir);
        }
    }
}
