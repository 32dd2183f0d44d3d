//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleeping outside the sequencer's timer module
//! - No UI framework inside the reveal core
//! - No panicking shortcuts in production code
//!
//! The helpers here read source files as text. Everything from the first
//! `#[cfg(test)]` line of a file onwards counts as test code, matching how
//! every module keeps its tests at the bottom.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root (two levels above this crate)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir` (workspace-relative), sorted
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// One line of production code with comments stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    /// 1-based line number
    pub number: usize,
    /// Code before any `//`
    pub code: String,
}

/// Production lines of a source file
pub fn production_lines(content: &str) -> Vec<CodeLine> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(idx, line)| CodeLine {
            number: idx + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
        })
        .filter(|line| !line.code.trim().is_empty())
        .collect()
}

/// A line breaking a rule
#[derive(Debug, Clone)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending code
    pub code: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = workspace_root();
        let shown = self.path.strip_prefix(&root).unwrap_or(&self.path);
        write!(f, "{}:{} - {}", shown.display(), self.line, self.code.trim())
    }
}

/// Production lines under `dir` for which `is_violation` holds
pub fn scan(dir: &str, is_violation: impl Fn(&Path, &str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for line in production_lines(&content) {
            if is_violation(&path, &line.code) {
                violations.push(Violation {
                    path: path.clone(),
                    line: line.number,
                    code: line.code,
                });
            }
        }
    }
    violations
}

/// Print violations and fail
///
/// # Panics
///
/// Panics when `violations` is not empty.
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s): {rule}", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let source = "fn a() {}\n// note\nlet x = 1; // trailing\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].code.trim(), "let x = 1;");
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
