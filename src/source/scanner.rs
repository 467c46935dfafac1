use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::types::Result;

/// Default maximum file size for analysis (1MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Finds RPG source members under a directory.
///
/// Honors `.gitignore` files even outside a git checkout, skips anything
/// matching an exclude glob and matches extensions case-insensitively
/// (`ORDENTRY.RPGLE` is as common as `ordentry.rpgle` on exported members).
pub struct SourceScanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
}

impl SourceScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: AnalysisConfig::default().extensions,
            exclude: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Self {
        Self::new(root)
            .with_extensions(config.extensions.clone())
            .with_exclude(&config.exclude)
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Invalid patterns are dropped with a warning
    pub fn with_exclude(mut self, patterns: &[String]) -> Self {
        self.exclude = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Matching files, sorted by path
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .follow_links(false)
            .build();

        let mut files: Vec<PathBuf> = walker
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| {
                self.has_source_extension(path)
                    && !self.should_exclude(path)
                    && self.check_size(path)
            })
            .collect();
        files.sort();

        debug!("Found {} source files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|p| p.matches(&path_str))
    }

    fn check_size(&self, path: &Path) -> bool {
        path.metadata()
            .map(|m| m.len() <= self.max_file_size)
            .unwrap_or(false)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "     H DFTACTGRP(*NO)\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "qrpglesrc/ORDENTRY.RPGLE");
        touch(dir.path(), "qrpglesrc/custupd.sqlrpgle");
        touch(dir.path(), "qclsrc/nightly.clle");
        touch(dir.path(), "docs/readme.md");

        let files = SourceScanner::new(dir.path()).scan().unwrap();
        assert_eq!(
            names(dir.path(), &files),
            vec![
                "qclsrc/nightly.clle",
                "qrpglesrc/ORDENTRY.RPGLE",
                "qrpglesrc/custupd.sqlrpgle"
            ]
        );
    }

    #[test]
    fn test_scan_applies_excludes_and_gitignore() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/keep.rpgle");
        touch(dir.path(), "output/java_project/generated.rpgle");
        touch(dir.path(), "legacy/old.rpgle");
        fs::write(dir.path().join(".gitignore"), "legacy/\n").unwrap();

        let scanner = SourceScanner::from_config(dir.path(), &AnalysisConfig::default());
        let files = scanner.scan().unwrap();
        assert_eq!(names(dir.path(), &files), vec!["src/keep.rpgle"]);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_dropped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.rpgle");
        let scanner = SourceScanner::new(dir.path()).with_exclude(&["[".to_string()]);
        assert_eq!(scanner.scan().unwrap().len(), 1);
    }

    #[test]
    fn test_max_file_size() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.rpgle");
        let scanner = SourceScanner::new(dir.path()).with_max_file_size(4);
        assert!(scanner.scan().unwrap().is_empty());
    }
}
