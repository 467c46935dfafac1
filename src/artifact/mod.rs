//! Artifact Writing
//!
//! Persists generated files under one output root and records what was
//! written in an [`OutputManifest`]. A write that fails at its intended path
//! is retried once as a flat file in the root, tagged with the original path.

pub mod archive;
pub mod npm;
pub mod scaffold;

pub use archive::{zip_dir, zip_entries};
pub use npm::{NpmOutcome, npm_install};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{
    ArtifactCategory, GeneratedArtifact, ModernizeError, OutputManifest, Result, stays_within_root,
};

pub struct ArtifactWriter {
    root: PathBuf,
    manifest: OutputManifest,
}

impl ArtifactWriter {
    /// Create the writer, making sure `root` exists
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            manifest: OutputManifest::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &OutputManifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> OutputManifest {
        self.manifest
    }

    /// Record a path produced outside the writer (archives, copied trees)
    pub fn record(&mut self, category: ArtifactCategory, path: impl Into<PathBuf>) {
        self.manifest.record(category, path);
    }

    /// Write `content` at `relative` under the root without recording it.
    /// Returns the path actually written. Absolute paths and paths with `..`
    /// are refused.
    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let relative = relative.as_ref();
        if !stays_within_root(relative) {
            return Err(ModernizeError::Artifact {
                path: relative.display().to_string(),
                message: "path escapes the output directory".to_string(),
            });
        }
        let target = self.root.join(relative);
        match write_with_parents(&target, content) {
            Ok(()) => {
                debug!("Wrote {} ({} chars)", target.display(), content.len());
                Ok(target)
            }
            Err(e) => {
                warn!("Failed to write {}: {}", target.display(), e);
                self.write_flat(&target, content)
            }
        }
    }

    /// Write and record under `category`
    pub fn write(
        &mut self,
        category: ArtifactCategory,
        relative: impl AsRef<Path>,
        content: &str,
    ) -> Result<PathBuf> {
        let path = self.write_file(relative, content)?;
        self.manifest.record(category, &path);
        Ok(path)
    }

    /// Write every artifact below `base` (relative to the root) without
    /// recording them individually. Artifacts whose path would leave the
    /// root are skipped.
    pub fn write_all(
        &self,
        base: impl AsRef<Path>,
        files: &[GeneratedArtifact],
    ) -> Result<Vec<PathBuf>> {
        let base = base.as_ref();
        files
            .iter()
            .filter(|file| {
                let keep = file.stays_within_root();
                if !keep {
                    warn!("Skipping {}: path escapes the output directory", file.path.display());
                }
                keep
            })
            .map(|file| self.write_file(base.join(&file.path), &file.content))
            .collect()
    }

    fn write_flat(&self, original: &Path, content: &str) -> Result<PathBuf> {
        let name = original
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| ModernizeError::Artifact {
                path: original.display().to_string(),
                message: "path has no file name".to_string(),
            })?;
        let fallback = self.root.join(name);
        let tagged = format!("/* Original path: {} */\n{}", original.display(), content);

        write_with_parents(&fallback, &tagged).map_err(|e| ModernizeError::Artifact {
            path: original.display().to_string(),
            message: e.to_string(),
        })?;
        warn!(
            "Saved {} to alternative location {}",
            original.display(),
            fallback.display()
        );
        Ok(fallback)
    }
}

fn write_with_parents(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_records() {
        let dir = TempDir::new().unwrap();
        let mut writer = ArtifactWriter::new(dir.path().join("out")).unwrap();

        let path = writer
            .write(ArtifactCategory::ConversionPlans, "plans/PGM_conversion_plan.md", "# Plan")
            .unwrap();

        assert_eq!(path, dir.path().join("out/plans/PGM_conversion_plan.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Plan");
        assert_eq!(writer.manifest().get(ArtifactCategory::ConversionPlans), &[path]);
    }

    #[test]
    fn test_write_file_does_not_record() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path()).unwrap();
        writer.write_file("a/b.txt", "x").unwrap();
        assert!(writer.manifest().is_empty());
    }

    #[test]
    fn test_unwritable_path_falls_back_to_flat_file() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path()).unwrap();
        // A regular file where a directory is needed
        fs::write(dir.path().join("blocker"), "").unwrap();

        let path = writer
            .write_file("blocker/com/acme/OrderService.java", "class OrderService {}")
            .unwrap();

        assert_eq!(path, dir.path().join("OrderService.java"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("/* Original path: "));
        assert!(content.contains("blocker/com/acme/OrderService.java */\n"));
        assert!(content.ends_with("class OrderService {}"));
    }

    #[test]
    fn test_write_all_under_base() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path()).unwrap();
        let files = vec![
            GeneratedArtifact::new("pom.xml", "<project/>"),
            GeneratedArtifact::new("src/main/java/A.java", "class A {}"),
        ];

        let written = writer.write_all("java_project", &files).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("java_project/src/main/java/A.java").is_file());
    }

    #[test]
    fn test_paths_outside_root_are_refused() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("out")).unwrap();

        let err = writer.write_file("../escaped.txt", "x").unwrap_err();
        assert!(matches!(err, ModernizeError::Artifact { .. }));
        assert!(!dir.path().join("escaped.txt").exists());

        let files = vec![
            GeneratedArtifact::new("src/../../../escaped.java", "class Evil {}"),
            GeneratedArtifact::new("src/main/java/A.java", "class A {}"),
        ];
        let written = writer.write_all("java_project", &files).unwrap();
        assert_eq!(written, vec![dir.path().join("out/java_project/src/main/java/A.java")]);
        assert!(!dir.path().join("escaped.java").exists());
    }
}
