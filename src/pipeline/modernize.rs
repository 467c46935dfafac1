//! Single-program modernization.
//!
//! Pseudocode, flow diagram and business document first, then a target
//! project skeleton whose business logic is filled in by a second model call.
//! The whole output directory is zipped at the end.

use std::path::{Path, PathBuf};
use tracing::info;

use super::progress::ProgressTracker;
use crate::ai::LlmGateway;
use crate::ai::prompt::rpg as prompts;
use crate::artifact::scaffold::{
    complete_structure, integrate_java_methods, integrate_python_functions,
};
use crate::artifact::{ArtifactWriter, zip_dir};
use crate::extract::{extract_java_structure, extract_python_structure, fenced_blocks};
use crate::types::{
    ArtifactCategory, GeneratedArtifact, OutputManifest, Result, RpgType, SourceFile,
    TargetLanguage,
};

const STEPS: [&str; 6] = [
    "Generating pseudocode",
    "Generating flow diagram",
    "Generating business document",
    "Generating target structure",
    "Generating target logic",
    "Packaging project",
];

pub const PSEUDOCODE_FILE: &str = "pseudocode.txt";
pub const FLOW_DIAGRAM_FILE: &str = "flow_diagram.md";
pub const BUSINESS_DOCUMENT_FILE: &str = "business_document.md";

/// `<dir>/<stem>_output` next to the input file
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rpg".to_string());
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_output"))
}

pub struct ModernizeOutcome {
    pub manifest: OutputManifest,
    pub output_dir: PathBuf,
    pub archive: PathBuf,
    /// Target files as finally written, paths relative to the output dir
    pub files: Vec<GeneratedArtifact>,
}

pub struct ModernizePipeline<'a> {
    gateway: &'a LlmGateway,
    rpg_type: RpgType,
    target: TargetLanguage,
    writer: ArtifactWriter,
    progress: ProgressTracker,
}

impl<'a> ModernizePipeline<'a> {
    pub fn new(
        gateway: &'a LlmGateway,
        rpg_type: RpgType,
        target: TargetLanguage,
        output_dir: &Path,
    ) -> Result<Self> {
        Ok(Self {
            gateway,
            rpg_type,
            target,
            writer: ArtifactWriter::new(output_dir)?,
            progress: ProgressTracker::new(STEPS.len()),
        })
    }

    /// Tracker this pipeline reports to; subscribe before calling `run`
    pub fn progress(&self) -> ProgressTracker {
        self.progress.clone()
    }

    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = progress;
        self
    }

    fn step(&self, index: usize) {
        self.progress.start_step(index + 1, STEPS[index]);
    }

    /// Missing replies degrade to empty text so later steps still run
    async fn ask(&self, stage: &str, prompt: &str, max_tokens: u32) -> String {
        match self.gateway.complete(stage, prompt, max_tokens).await {
            Some(text) => text,
            None => {
                self.progress.skipped(stage, "no response from LLM");
                String::new()
            }
        }
    }

    fn document(&mut self, file: &str, content: &str) -> Result<()> {
        if !content.is_empty() {
            self.writer
                .write(ArtifactCategory::ModernizationDocuments, file, content)?;
        }
        Ok(())
    }

    pub async fn run(mut self, source: &SourceFile) -> Result<ModernizeOutcome> {
        info!(
            "Modernizing {} ({} RPG) to {}",
            source.name(),
            self.rpg_type,
            self.target
        );
        let code = source.content();

        self.step(0);
        let pseudocode = self
            .ask(
                "pseudocode",
                &prompts::pseudocode(self.rpg_type, code),
                prompts::DEFAULT_MAX_TOKENS,
            )
            .await;
        self.document(PSEUDOCODE_FILE, &pseudocode)?;

        self.step(1);
        let diagram = self
            .ask(
                "flow_diagram",
                &prompts::flow_diagram(code, &pseudocode),
                prompts::DEFAULT_MAX_TOKENS,
            )
            .await;
        self.document(FLOW_DIAGRAM_FILE, &diagram)?;

        self.step(2);
        let business = self
            .ask(
                "business_document",
                &prompts::business_document(code, &pseudocode),
                prompts::BUSINESS_DOCUMENT_MAX_TOKENS,
            )
            .await;
        self.document(BUSINESS_DOCUMENT_FILE, &business)?;

        self.step(3);
        let reply = self
            .ask(
                "structure",
                &prompts::structure(self.target, &pseudocode),
                prompts::DEFAULT_MAX_TOKENS,
            )
            .await;
        let structure = match self.target {
            TargetLanguage::Java => complete_structure(extract_java_structure(&reply)),
            TargetLanguage::Python => extract_python_structure(&reply),
        };
        for file in &structure {
            self.writer
                .write(ArtifactCategory::GeneratedCode, &file.path, &file.content)?;
        }

        self.step(4);
        let files = self.integrate_logic(&pseudocode, structure).await?;

        self.step(5);
        let archive = self.writer.root().join(self.target.archive_name());
        let count = zip_dir(self.writer.root(), &archive)?;
        info!("Packed {} file(s) into {}", count, archive.display());
        self.writer.record(ArtifactCategory::GeneratedCode, &archive);

        self.progress
            .finish(true, &format!("{} target file(s) generated", files.len()));
        Ok(ModernizeOutcome {
            output_dir: self.writer.root().to_path_buf(),
            manifest: self.writer.into_manifest(),
            archive,
            files,
        })
    }

    /// Ask for the business logic and merge it into the skeleton. Only files
    /// whose content changed are written again.
    async fn integrate_logic(
        &mut self,
        pseudocode: &str,
        structure: Vec<GeneratedArtifact>,
    ) -> Result<Vec<GeneratedArtifact>> {
        let info = prompts::structure_info(
            self.target,
            structure.iter().map(|f| f.path.to_str().unwrap_or_default()),
        );
        let reply = self
            .ask(
                "logic",
                &prompts::logic(self.target, pseudocode, &info),
                prompts::DEFAULT_MAX_TOKENS,
            )
            .await;
        let blocks = fenced_blocks(&reply, self.target.fence());

        let mut updated = structure.clone();
        let changed = match self.target {
            TargetLanguage::Java => integrate_java_methods(&mut updated, &blocks),
            TargetLanguage::Python => integrate_python_functions(&mut updated, &blocks),
        };
        if !changed {
            self.progress
                .skipped("logic", "no code blocks could be merged into the structure");
            return Ok(updated);
        }

        for (before, after) in structure.iter().zip(&updated) {
            if before.content != after.content {
                self.writer.write_file(&after.path, &after.content)?;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RPG_SYSTEM_PROMPT;
    use crate::ai::provider::scripted::ScriptedProvider;
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = "     C     *ENTRY        PLIST\n     C                   EXSR      PRTRPT\n";

    const JAVA_STRUCTURE: &str = "Here is the project.\n\n\
        ```java\n// File: src/main/java/com/acme/report/service/ReportServiceImpl.java\n\
        package com.acme.report.service;\n\npublic class ReportServiceImpl {\n}\n```\n";

    fn gateway(provider: ScriptedProvider) -> LlmGateway {
        let (_, shared) = provider.shared();
        LlmGateway::new(shared).with_system_prompt(RPG_SYSTEM_PROMPT)
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/work/src/CUSTRPT.rpgle")),
            PathBuf::from("/work/src/CUSTRPT_output")
        );
        assert_eq!(
            default_output_dir(Path::new("CUSTRPT.txt")),
            PathBuf::from("CUSTRPT_output")
        );
    }

    #[tokio::test]
    async fn test_java_flow_integrates_methods_and_zips() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(
            ScriptedProvider::new()
                .on("Produce only the structured pseudocode", "1. Read customer file\n2. Print report")
                .on("Java Spring Boot architect", JAVA_STRUCTURE)
                .on(
                    "Java methods within the provided Spring Boot",
                    "```java\npublic void printReport() {\n}\n```",
                )
                .otherwise("# Document"),
        );
        let source = SourceFile::new("CUSTRPT.rpgle", SOURCE);

        let pipeline =
            ModernizePipeline::new(&gateway, RpgType::Modern, TargetLanguage::Java, dir.path())
                .unwrap();
        let outcome = pipeline.run(&source).await.unwrap();

        assert!(dir.path().join(PSEUDOCODE_FILE).is_file());
        assert!(dir.path().join("pom.xml").is_file());
        assert!(outcome.archive.ends_with("java_spring_boot_project.zip"));
        assert!(outcome.archive.is_file());

        let impl_path = outcome
            .files
            .iter()
            .find(|f| f.path.to_string_lossy().ends_with("ReportServiceImpl.java"))
            .unwrap();
        let on_disk = fs::read_to_string(dir.path().join(&impl_path.path)).unwrap();
        assert_eq!(on_disk, impl_path.content);
        assert!(on_disk.contains("public class ReportServiceImpl {\n\npublic void printReport() {\n}\n\n\n}"));
        assert!(!outcome.manifest.get(ArtifactCategory::ModernizationDocuments).is_empty());
    }

    #[tokio::test]
    async fn test_python_flow_appends_functions() {
        let dir = TempDir::new().unwrap();
        let structure = "main.py\n```python\nfrom logic_module import run\n```\n\
                         logic_module.py\n```python\ndef run():\n    pass\n```\n\
                         data_access.py\n```python\ndef get_customer_record(cid):\n    pass\n```\n";
        let gateway = gateway(
            ScriptedProvider::new()
                .on("Translate the core logic", "```python\ndef print_report():\n    return 1\n```")
                .on("Python application designer", structure)
                .otherwise("Pseudocode text"),
        );
        let source = SourceFile::new("CUSTRPT.rpgle", SOURCE);

        let pipeline =
            ModernizePipeline::new(&gateway, RpgType::Synon, TargetLanguage::Python, dir.path())
                .unwrap();
        let outcome = pipeline.run(&source).await.unwrap();

        let logic = fs::read_to_string(dir.path().join("logic_module.py")).unwrap();
        assert_eq!(logic, "def run():\n    pass\n\ndef print_report():\n    return 1\n");
        assert!(dir.path().join("python_project.zip").is_file());
        assert_eq!(outcome.files.len(), 3);
    }

    #[tokio::test]
    async fn test_unreachable_llm_still_yields_java_skeleton() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(ScriptedProvider::new());
        let source = SourceFile::new("CUSTRPT.rpgle", SOURCE);

        let pipeline =
            ModernizePipeline::new(&gateway, RpgType::Modern, TargetLanguage::Java, dir.path())
                .unwrap();
        let outcome = pipeline.run(&source).await.unwrap();

        // No documents, but the completed structure is written and zipped
        assert!(!dir.path().join(PSEUDOCODE_FILE).exists());
        assert!(outcome.manifest.get(ArtifactCategory::ModernizationDocuments).is_empty());
        assert!(outcome
            .files
            .iter()
            .any(|f| f.path.to_string_lossy().ends_with("MainController.java")));
        let archive = zip::ZipArchive::new(fs::File::open(&outcome.archive).unwrap()).unwrap();
        assert!(archive.file_names().any(|n| n == "pom.xml"));
    }
}
