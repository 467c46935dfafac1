//! Generated artifacts and the manifest that groups them for display.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// A (path, content) pair produced by a stage. Paths are relative to the
/// output root until the writer resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedArtifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// False when the path is absolute or climbs out of its root with `..`
    pub fn stays_within_root(&self) -> bool {
        stays_within_root(&self.path)
    }
}

/// True when `path` is relative and has no `..` component
pub fn stays_within_root(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// =============================================================================
// Artifact Category
// =============================================================================

/// Display groups for written files. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ArtifactCategory {
    BusinessDocumentation,
    CombinedDocumentation,
    ApplicationBusinessLogic,
    ConversionPlans,
    ServiceBoundaryRecommendations,
    AnalysisResults,
    ArchitectureRecommendations,
    DomainPackageRecommendations,
    SpringBootStructure,
    JavaProject,
    ModernizationDocuments,
    GeneratedCode,
    AngularComponent,
    AngularProject,
    FigmaAnalysis,
}

impl ArtifactCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BusinessDocumentation => "Business Documentation",
            Self::CombinedDocumentation => "Combined Documentation",
            Self::ApplicationBusinessLogic => "Application Business Logic",
            Self::ConversionPlans => "Conversion Plans",
            Self::ServiceBoundaryRecommendations => "Service Boundary Recommendations",
            Self::AnalysisResults => "Analysis Results",
            Self::ArchitectureRecommendations => "Architecture Recommendations",
            Self::DomainPackageRecommendations => "Domain Package Recommendations",
            Self::SpringBootStructure => "Spring Boot Structure",
            Self::JavaProject => "Java Project",
            Self::ModernizationDocuments => "Modernization Documents",
            Self::GeneratedCode => "Generated Code",
            Self::AngularComponent => "Angular Component",
            Self::AngularProject => "Angular Project",
            Self::FigmaAnalysis => "Figma Analysis",
        }
    }
}

impl std::fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Output Manifest
// =============================================================================

/// Category label -> written paths, in write order within each category
#[derive(Debug, Clone, Default)]
pub struct OutputManifest {
    entries: BTreeMap<ArtifactCategory, Vec<PathBuf>>,
}

impl OutputManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written path. Re-recording the same path is a no-op.
    pub fn record(&mut self, category: ArtifactCategory, path: impl Into<PathBuf>) {
        let path = path.into();
        let paths = self.entries.entry(category).or_default();
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    pub fn get(&self, category: ArtifactCategory) -> &[PathBuf] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactCategory, &[PathBuf])> {
        self.entries.iter().map(|(c, p)| (*c, p.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Merge another manifest into this one
    pub fn extend(&mut self, other: OutputManifest) {
        for (category, paths) in other.entries {
            for path in paths {
                self.record(category, path);
            }
        }
    }

    /// Markdown listing, paths shown relative to `root` when possible
    pub fn to_markdown(&self, root: &Path) -> String {
        let mut out = String::from("# Generated Artifacts\n");
        for (category, paths) in self.iter() {
            out.push_str(&format!("\n## {}\n\n", category.label()));
            for path in paths {
                let shown = path.strip_prefix(root).unwrap_or(path);
                out.push_str(&format!("- `{}`\n", shown.display()));
            }
        }
        out
    }

    /// JSON object keyed by category label
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(category, paths)| {
                let list = paths
                    .iter()
                    .map(|p| serde_json::Value::String(p.display().to_string()))
                    .collect();
                (category.label().to_string(), serde_json::Value::Array(list))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_within_root() {
        assert!(stays_within_root(Path::new("src/main/java/A.java")));
        assert!(stays_within_root(Path::new("./pom.xml")));
        assert!(!stays_within_root(Path::new("src/../../../../tmp/escape.java")));
        assert!(!stays_within_root(Path::new("/etc/passwd")));
        assert!(!GeneratedArtifact::new("../x.ts", "").stays_within_root());
    }

    #[test]
    fn test_manifest_record_dedup() {
        let mut manifest = OutputManifest::new();
        manifest.record(ArtifactCategory::BusinessDocumentation, "out/a_business_doc.md");
        manifest.record(ArtifactCategory::BusinessDocumentation, "out/a_business_doc.md");
        manifest.record(ArtifactCategory::JavaProject, "out/java_project.zip");

        assert_eq!(manifest.total(), 2);
        assert_eq!(manifest.get(ArtifactCategory::BusinessDocumentation).len(), 1);
        assert!(manifest.get(ArtifactCategory::ConversionPlans).is_empty());
    }

    #[test]
    fn test_manifest_category_order() {
        let mut manifest = OutputManifest::new();
        manifest.record(ArtifactCategory::JavaProject, "z");
        manifest.record(ArtifactCategory::BusinessDocumentation, "a");

        let order: Vec<_> = manifest.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                ArtifactCategory::BusinessDocumentation,
                ArtifactCategory::JavaProject
            ]
        );
    }

    #[test]
    fn test_manifest_markdown_relative_paths() {
        let mut manifest = OutputManifest::new();
        manifest.record(
            ArtifactCategory::ConversionPlans,
            PathBuf::from("/tmp/out/PGM_conversion_plan.md"),
        );
        let md = manifest.to_markdown(Path::new("/tmp/out"));
        assert!(md.contains("## Conversion Plans"));
        assert!(md.contains("- `PGM_conversion_plan.md`"));
    }

    #[test]
    fn test_manifest_json_labels() {
        let mut manifest = OutputManifest::new();
        manifest.record(ArtifactCategory::AnalysisResults, "r.json");
        let json = manifest.to_json();
        assert_eq!(json["Analysis Results"][0], "r.json");
    }

    #[test]
    fn test_manifest_extend() {
        let mut a = OutputManifest::new();
        a.record(ArtifactCategory::GeneratedCode, "x");
        let mut b = OutputManifest::new();
        b.record(ArtifactCategory::GeneratedCode, "x");
        b.record(ArtifactCategory::GeneratedCode, "y");
        a.extend(b);
        assert_eq!(a.get(ArtifactCategory::GeneratedCode).len(), 2);
    }
}
