//! Input discovery and loading.

mod scanner;

pub use scanner::SourceScanner;

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::types::{ModernizeError, Result, SourceFile};

/// Load every input named on the command line.
///
/// Directories are scanned for RPG members; plain files are taken as given
/// whatever their extension. Files are keyed by name downstream, so a second
/// file with an already-seen name is skipped.
pub fn load_sources(paths: &[PathBuf], config: &AnalysisConfig) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(SourceScanner::from_config(path, config).scan()?);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(ModernizeError::InvalidInput(format!(
                "Input not found: {}",
                path.display()
            )));
        }
    }

    let mut seen = HashSet::new();
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let source = SourceFile::load(&path)?;
        if !seen.insert(source.name().to_string()) {
            warn!("Skipping {}: another input is already named {}", path.display(), source.name());
            continue;
        }
        sources.push(source);
    }

    if sources.is_empty() {
        return Err(ModernizeError::InvalidInput(
            "No RPG source files found in the given inputs".to_string(),
        ));
    }
    info!("Loaded {} source file(s)", sources.len());
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_files_and_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/ORDENTRY.rpgle"), "CALLP VALIDATE").unwrap();
        fs::write(dir.path().join("src/notes.md"), "ignored").unwrap();
        fs::write(dir.path().join("single.member"), "DCL-S X;").unwrap();

        let sources = load_sources(
            &[dir.path().join("src"), dir.path().join("single.member")],
            &AnalysisConfig::default(),
        )
        .unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["ORDENTRY.rpgle", "single.member"]);
        assert_eq!(sources[0].content(), "CALLP VALIDATE");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/PGM.rpgle"), "first").unwrap();
        fs::write(dir.path().join("b/PGM.rpgle"), "second").unwrap();

        let sources = load_sources(
            &[dir.path().join("a/PGM.rpgle"), dir.path().join("b/PGM.rpgle")],
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].content(), "first");
    }

    #[test]
    fn test_missing_input_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err = load_sources(&[dir.path().join("nope.rpgle")], &AnalysisConfig::default())
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_directory_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err =
            load_sources(&[dir.path().to_path_buf()], &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, ModernizeError::InvalidInput(_)));
    }
}
