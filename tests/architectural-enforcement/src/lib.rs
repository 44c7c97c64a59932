//! Architectural Enforcement
//!
//! Source scanners shared by the enforcement tests in `tests/`:
//! - The rendering path never panics
//! - Nothing sleeps on the event loop
//!
//! These are line-based checks, not a parser. A file's production code ends
//! at its first `#[cfg(test)]`, which is where every module keeps its tests.

use std::fs;
use std::path::{Path, PathBuf};

/// One line of production code with comments stripped
#[derive(Clone, Debug)]
pub struct SourceLine {
    pub path: PathBuf,
    pub number: usize,
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// Root of the workspace, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Source directory of the TUI crate
pub fn tui_src() -> PathBuf {
    workspace_root().join("tui").join("src")
}

/// Production lines of every `.rs` file below `dir`
pub fn production_lines(dir: &Path) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    if !dir.exists() {
        return lines;
    }

    for entry in walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            lines.extend(production_lines_of(entry.path()));
        }
    }
    lines
}

/// Production lines of a single file
pub fn production_lines_of(path: &Path) -> Vec<SourceLine> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(idx, line)| SourceLine {
            path: path.to_path_buf(),
            number: idx + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
        })
        .filter(|line| !line.code.trim().is_empty())
        .collect()
}

/// Lines containing any of `patterns`
pub fn find(lines: &[SourceLine], patterns: &[&str]) -> Vec<SourceLine> {
    lines
        .iter()
        .filter(|line| patterns.iter().any(|p| line.code.contains(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_sources_are_found() {
        assert!(!production_lines(&tui_src()).is_empty());
    }

    #[test]
    fn test_test_modules_and_comments_are_skipped() {
        let dir = std::env::temp_dir().join(format!("arch-enforce-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("sample.rs");
        fs::write(
            &file,
            "fn a() {} // x.unwrap()\n\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n",
        )
        .unwrap();

        let lines = production_lines_of(&file);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].code.trim(), "fn a() {}");
        assert!(find(&lines, &[".unwrap()"]).is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
