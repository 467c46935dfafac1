//! Zip archives of generated output.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::types::{GeneratedArtifact, Result};

fn options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Zip entry name for `path` relative to `base`, always `/` separated
fn entry_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Archive every file under `source` into `dest`, with entry names relative
/// to `source`. `dest` may live inside `source`; it is never archived into
/// itself. Returns the number of entries written.
pub fn zip_dir(source: &Path, dest: &Path) -> Result<usize> {
    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path() != dest {
            files.push(entry.into_path());
        }
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut zip = ZipWriter::new(File::create(dest)?);
    let mut count = 0;
    for path in &files {
        let Some(name) = entry_name(source, path) else {
            continue;
        };
        zip.start_file(name, options())?;
        io::copy(&mut File::open(path)?, &mut zip)?;
        count += 1;
    }
    zip.finish()?;

    debug!("Archived {} files from {} into {}", count, source.display(), dest.display());
    Ok(count)
}

/// Archive in-memory files into `dest`. Files whose path would unpack
/// outside the archive root are left out.
pub fn zip_entries(dest: &Path, files: &[GeneratedArtifact]) -> Result<usize> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut zip = ZipWriter::new(File::create(dest)?);
    let mut count = 0;
    for file in files {
        if !file.stays_within_root() {
            warn!("Skipping {}: path escapes the archive root", file.path.display());
            continue;
        }
        let name = file
            .path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options())?;
        zip.write_all(file.content.as_bytes())?;
        count += 1;
    }
    zip.finish()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_zip_dir_relative_entries() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("java_project");
        fs::create_dir_all(project.join("src/main/java/com/example")).unwrap();
        fs::write(project.join("pom.xml"), "<project/>").unwrap();
        fs::write(project.join("README.md"), "# readme").unwrap();
        fs::write(
            project.join("src/main/java/com/example/Application.java"),
            "class Application {}",
        )
        .unwrap();

        let dest = dir.path().join("java_project.zip");
        let count = zip_dir(&project, &dest).unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            entry_names(&dest),
            vec![
                "README.md",
                "pom.xml",
                "src/main/java/com/example/Application.java"
            ]
        );

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("src/main/java/com/example/Application.java")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "class Application {}");
    }

    #[test]
    fn test_zip_dir_skips_its_own_archive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pseudocode.txt"), "MAIN").unwrap();
        let dest = dir.path().join("project.zip");

        assert_eq!(zip_dir(dir.path(), &dest).unwrap(), 1);
        assert_eq!(entry_names(&dest), vec!["pseudocode.txt"]);
    }

    #[test]
    fn test_zip_entries() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("angular_project.zip");
        let files = vec![
            GeneratedArtifact::new("src/app/app.module.ts", "export class AppModule {}"),
            GeneratedArtifact::new("README.md", "# Angular"),
            GeneratedArtifact::new("../../outside.ts", "export {}"),
        ];

        assert_eq!(zip_entries(&dest, &files).unwrap(), 2);
        assert_eq!(entry_names(&dest), vec!["README.md", "src/app/app.module.ts"]);
    }
}
