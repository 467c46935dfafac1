//! Batch RPGLE analysis.
//!
//! Runs the nine steps over every loaded program in order. Each step reads
//! whatever earlier steps produced and tolerates gaps: a file whose parse
//! failed still gets dependencies, metadata and Java code, and the
//! cross-file reports are built from the files that did succeed.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::progress::ProgressTracker;
use crate::ai::LlmGateway;
use crate::ai::prompt::analysis as prompts;
use crate::artifact::scaffold::analysis_project_files;
use crate::artifact::{ArtifactWriter, zip_dir};
use crate::config::AnalysisConfig;
use crate::extract::{extract_java_files, extract_json_object, java_base_name};
use crate::types::{
    ArtifactCategory, OutputManifest, Result, SourceFile, StageResults, UNKNOWN, json_array,
    json_string, json_string_or, pretty_json, truncate_chars,
};

pub const JAVA_PROJECT_DIR: &str = "java_project";
pub const JAVA_PROJECT_ARCHIVE: &str = "java_project.zip";
pub const ANALYSIS_RESULTS_FILE: &str = "rpgle_analysis_results.json";

const NO_SUMMARY: &str = "No summary available";

// =============================================================================
// Steps
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisStep {
    Parse = 1,
    Dependencies = 2,
    Formats = 3,
    Metadata = 4,
    BusinessLogic = 5,
    CombinedDocs = 6,
    ApplicationLogic = 7,
    Recommendations = 8,
    CodeGeneration = 9,
}

impl AnalysisStep {
    pub const COUNT: usize = 9;

    pub const ALL: [AnalysisStep; Self::COUNT] = [
        Self::Parse,
        Self::Dependencies,
        Self::Formats,
        Self::Metadata,
        Self::BusinessLogic,
        Self::CombinedDocs,
        Self::ApplicationLogic,
        Self::Recommendations,
        Self::CodeGeneration,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Parse => "Parsing RPGLE programs",
            Self::Dependencies => "Analyzing dependencies",
            Self::Formats => "Detecting formats",
            Self::Metadata => "Extracting metadata",
            Self::BusinessLogic => "Generating business logic documentation",
            Self::CombinedDocs => "Creating combined documentation",
            Self::ApplicationLogic => "Generating application business logic",
            Self::Recommendations => "Generating additional documentation",
            Self::CodeGeneration => "Generating Java code",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index.checked_sub(1)?).copied()
    }
}

// =============================================================================
// Session
// =============================================================================

/// Everything the steps accumulate for one run, keyed by file name
#[derive(Debug, Default, Serialize)]
pub struct AnalysisSession {
    pub parsed: StageResults,
    pub dependencies: StageResults,
    pub summaries: BTreeMap<String, String>,
    pub formats: StageResults,
    pub metadata: StageResults,
    pub business_docs: BTreeMap<String, String>,
}

impl AnalysisSession {
    /// The `rpgle_analysis_results.json` document
    pub fn results_json(&self) -> Value {
        json!({
            "parsed_results": self.parsed,
            "dependencies": self.dependencies,
            "formats": self.formats,
            "metadata": self.metadata,
        })
    }
}

pub struct AnalysisOutcome {
    pub session: AnalysisSession,
    pub manifest: OutputManifest,
    pub output_dir: PathBuf,
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct AnalysisPipeline<'a> {
    gateway: &'a LlmGateway,
    config: AnalysisConfig,
    writer: ArtifactWriter,
    progress: ProgressTracker,
    session: AnalysisSession,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn new(gateway: &'a LlmGateway, config: AnalysisConfig, output_dir: &Path) -> Result<Self> {
        Ok(Self {
            gateway,
            config,
            writer: ArtifactWriter::new(output_dir)?,
            progress: ProgressTracker::new(AnalysisStep::COUNT),
            session: AnalysisSession::default(),
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

    pub async fn run(mut self, sources: &[SourceFile]) -> Result<AnalysisOutcome> {
        info!(
            "Analyzing {} program(s) with {} ({})",
            sources.len(),
            self.gateway.provider_name(),
            self.gateway.model()
        );

        for step in AnalysisStep::ALL {
            self.progress.start_step(step.index(), step.name());
            match step {
                AnalysisStep::Parse => self.parse(sources).await,
                AnalysisStep::Dependencies => self.dependencies(sources).await,
                AnalysisStep::Formats => self.formats(sources).await,
                AnalysisStep::Metadata => self.metadata(sources).await,
                AnalysisStep::BusinessLogic => self.business_logic(sources).await?,
                AnalysisStep::CombinedDocs => self.combined_docs(sources)?,
                AnalysisStep::ApplicationLogic => self.application_logic().await?,
                AnalysisStep::Recommendations => self.recommendations(sources).await?,
                AnalysisStep::CodeGeneration => self.java_code(sources).await?,
            }
        }

        let manifest = self.writer.manifest().clone();
        self.progress.finish(
            true,
            &format!("Generated {} artifact(s)", manifest.total()),
        );
        Ok(AnalysisOutcome {
            session: self.session,
            output_dir: self.writer.root().to_path_buf(),
            manifest,
        })
    }

    fn source_excerpt<'s>(&self, source: &'s SourceFile) -> &'s str {
        truncate_chars(source.content(), self.config.source_chars)
    }

    /// One LLM call whose reply should hold a JSON object
    async fn json_stage(
        &self,
        stage: &str,
        file: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Option<Value> {
        self.progress.item(file);
        let Some(reply) = self.gateway.complete(stage, prompt, max_tokens).await else {
            self.progress.skipped(file, "no response from LLM");
            return None;
        };
        let parsed = extract_json_object(&reply);
        if parsed.is_none() {
            self.progress.skipped(file, "could not extract JSON from LLM response");
        }
        parsed
    }

    async fn text_stage(
        &self,
        stage: &str,
        item: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Option<String> {
        self.progress.item(item);
        let reply = self.gateway.complete(stage, prompt, max_tokens).await;
        if reply.is_none() {
            self.progress.skipped(item, "no response from LLM");
        }
        reply
    }

    // -------------------------------------------------------------------------
    // Steps 1-4: per-file structured analysis
    // -------------------------------------------------------------------------

    async fn parse(&mut self, sources: &[SourceFile]) {
        for source in sources {
            let prompt = prompts::parse(source.content());
            if let Some(value) = self
                .json_stage("parse", source.name(), &prompt, prompts::PARSE_MAX_TOKENS)
                .await
            {
                self.session.parsed.insert(source.name().to_string(), value);
            }
        }
    }

    async fn dependencies(&mut self, sources: &[SourceFile]) {
        for source in sources {
            let prompt = prompts::dependencies(self.source_excerpt(source));
            if let Some(deps) = self
                .json_stage("dependencies", source.name(), &prompt, prompts::DEFAULT_MAX_TOKENS)
                .await
            {
                self.session.summaries.insert(
                    source.name().to_string(),
                    json_string_or(&deps, "brief_summary", NO_SUMMARY),
                );
                self.session.dependencies.insert(source.name().to_string(), deps);
            }
        }
    }

    async fn formats(&mut self, sources: &[SourceFile]) {
        for source in sources {
            let prompt = prompts::formats(self.source_excerpt(source));
            if let Some(value) = self
                .json_stage("formats", source.name(), &prompt, prompts::DEFAULT_MAX_TOKENS)
                .await
            {
                self.session.formats.insert(source.name().to_string(), value);
            }
        }
    }

    async fn metadata(&mut self, sources: &[SourceFile]) {
        for source in sources {
            let prompt = prompts::metadata(self.source_excerpt(source));
            if let Some(value) = self
                .json_stage("metadata", source.name(), &prompt, prompts::DEFAULT_MAX_TOKENS)
                .await
            {
                self.session.metadata.insert(source.name().to_string(), value);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Steps 5-6: documentation
    // -------------------------------------------------------------------------

    async fn business_logic(&mut self, sources: &[SourceFile]) -> Result<()> {
        for source in sources {
            let Some(parsed) = self.session.parsed.get(source.name()) else {
                continue;
            };
            let prompt = prompts::business_docs(&pretty_json(parsed), source.content());
            let Some(doc) = self
                .text_stage("business_docs", source.name(), &prompt, prompts::BUSINESS_DOC_MAX_TOKENS)
                .await
            else {
                continue;
            };

            self.writer.write(
                ArtifactCategory::BusinessDocumentation,
                format!("{}_business_doc.md", source.name()),
                &doc,
            )?;
            self.session.business_docs.insert(source.name().to_string(), doc);
        }
        Ok(())
    }

    fn combined_docs(&mut self, sources: &[SourceFile]) -> Result<()> {
        for source in sources {
            let (Some(parsed), Some(doc)) = (
                self.session.parsed.get(source.name()),
                self.session.business_docs.get(source.name()),
            ) else {
                continue;
            };
            self.progress.item(source.name());
            let combined = combined_document(source, doc, parsed);
            self.writer.write(
                ArtifactCategory::CombinedDocumentation,
                format!("{}_combined_doc.md", source.name()),
                &combined,
            )?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Step 7: application-level business logic
    // -------------------------------------------------------------------------

    async fn application_logic(&mut self) -> Result<()> {
        if self.session.parsed.is_empty() {
            debug!("No parsed programs; skipping application business logic");
            return Ok(());
        }

        let app_info = application_info(&self.session);
        let prompt = prompts::application_logic(&pretty_json(&app_info));
        if let Some(doc) = self
            .text_stage(
                "application_logic",
                "application",
                &prompt,
                prompts::APPLICATION_LOGIC_MAX_TOKENS,
            )
            .await
        {
            self.writer.write(
                ArtifactCategory::ApplicationBusinessLogic,
                "application_business_logic.md",
                &doc,
            )?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Step 8: recommendations, conversion plans and the JSON dump
    // -------------------------------------------------------------------------

    async fn recommendations(&mut self, sources: &[SourceFile]) -> Result<()> {
        let programs = Value::Array(program_summary(&self.session));
        self.report(
            "architecture",
            &prompts::architecture(&pretty_json(&programs)),
            prompts::RECOMMENDATION_MAX_TOKENS,
            ArtifactCategory::ArchitectureRecommendations,
            "architecture_recommendations.md",
        )
        .await?;

        let (concepts, structures) = domain_inputs(&self.session);
        self.report(
            "domain",
            &prompts::domain(
                &pretty_json(&Value::Array(concepts)),
                &pretty_json(&Value::Array(structures)),
            ),
            prompts::RECOMMENDATION_MAX_TOKENS,
            ArtifactCategory::DomainPackageRecommendations,
            "domain_package_recommendations.md",
        )
        .await?;

        let (procedures, call_deps) = service_inputs(&self.session);
        self.report(
            "service_boundaries",
            &prompts::service_boundaries(
                &pretty_json(&Value::Array(procedures)),
                &pretty_json(&Value::Object(call_deps)),
            ),
            prompts::RECOMMENDATION_MAX_TOKENS,
            ArtifactCategory::ServiceBoundaryRecommendations,
            "service_boundary_recommendations.md",
        )
        .await?;

        let (names, purposes, accesses) = spring_inputs(&self.session);
        self.report(
            "spring_structure",
            &prompts::spring_structure(&names, &purposes, &accesses),
            prompts::SPRING_STRUCTURE_MAX_TOKENS,
            ArtifactCategory::SpringBootStructure,
            "spring_boot_structure.md",
        )
        .await?;

        for source in sources {
            if !self.session.parsed.contains_key(source.name()) {
                continue;
            }
            self.conversion_plan(source.name()).await?;
        }

        self.writer.write(
            ArtifactCategory::AnalysisResults,
            ANALYSIS_RESULTS_FILE,
            &pretty_json(&self.session.results_json()),
        )?;
        Ok(())
    }

    async fn report(
        &mut self,
        stage: &str,
        prompt: &str,
        max_tokens: u32,
        category: ArtifactCategory,
        file_name: &str,
    ) -> Result<()> {
        if let Some(doc) = self.text_stage(stage, file_name, prompt, max_tokens).await {
            self.writer.write(category, file_name, &doc)?;
        }
        Ok(())
    }

    /// Needs all three per-file analyses; otherwise the file gets no plan.
    async fn conversion_plan(&mut self, filename: &str) -> Result<()> {
        let (Some(deps), Some(_), Some(meta)) = (
            self.session.dependencies.get(filename),
            self.session.formats.get(filename),
            self.session.metadata.get(filename),
        ) else {
            return Ok(());
        };

        let prompt = prompts::conversion_plan(meta, deps);
        if let Some(plan) = self
            .text_stage("conversion_plan", filename, &prompt, prompts::DEFAULT_MAX_TOKENS)
            .await
        {
            self.writer.write(
                ArtifactCategory::ConversionPlans,
                format!("{filename}_conversion_plan.md"),
                &format!("# Conversion Plan for {filename}\n\n{plan}"),
            )?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Step 9: Java project
    // -------------------------------------------------------------------------

    async fn java_code(&mut self, sources: &[SourceFile]) -> Result<()> {
        // Without any parse result every loaded file is converted
        let targets: Vec<&SourceFile> = if self.session.parsed.is_empty() {
            sources.iter().collect()
        } else {
            sources
                .iter()
                .filter(|s| self.session.parsed.contains_key(s.name()))
                .collect()
        };

        for source in targets {
            let program_name = self
                .session
                .parsed
                .get(source.name())
                .and_then(|p| json_string(p, "programName"))
                .unwrap_or_else(|| source.stem().to_string());
            let base_name = java_base_name(&program_name, source.name());
            let business_logic = self
                .session
                .business_docs
                .get(source.name())
                .map(|doc| truncate_chars(doc, self.config.conversion_logic_chars))
                .unwrap_or_default();

            let prompt = prompts::java_conversion(&prompts::JavaConversionInput {
                program_name: &program_name,
                filename: source.name(),
                base_name: &base_name,
                business_logic,
                code: truncate_chars(source.content(), self.config.conversion_code_chars),
            });
            let Some(reply) = self
                .text_stage(
                    "java_conversion",
                    source.name(),
                    &prompt,
                    prompts::JAVA_CONVERSION_MAX_TOKENS,
                )
                .await
            else {
                continue;
            };

            let files = extract_java_files(&reply);
            if files.is_empty() {
                self.progress.skipped(source.name(), "no Java files found in LLM response");
                continue;
            }
            info!("Extracted {} Java file(s) for {}", files.len(), source.name());
            self.writer.write_all(JAVA_PROJECT_DIR, &files)?;
        }

        let project_dir = self.writer.root().join(JAVA_PROJECT_DIR);
        let defaults = analysis_project_files(sources.iter().map(SourceFile::name), |rel| {
            project_dir.join(rel).exists()
        });
        self.writer.write_all(JAVA_PROJECT_DIR, &defaults)?;

        let archive = self.writer.root().join(JAVA_PROJECT_ARCHIVE);
        let count = zip_dir(&project_dir, &archive)?;
        info!("Packed {} file(s) into {}", count, archive.display());
        self.writer.record(ArtifactCategory::JavaProject, archive);
        Ok(())
    }
}

// =============================================================================
// Cross-file inputs
// =============================================================================

fn combined_document(source: &SourceFile, doc: &str, parsed: &Value) -> String {
    format!(
        "# Combined Documentation for {name}\n\n\
         ## Part 1: Business Logic Documentation\n\n\
         {doc}\n\n\
         ## Part 2: Parsed RPGLE Program Structure\n\n\
         ```json\n{structure}\n```\n\n\
         ## Part 3: Original RPGLE Code\n\n\
         ```rpgle\n{code}\n```\n",
        name = source.name(),
        structure = pretty_json(parsed),
        code = source.content(),
    )
}

/// Names of the entries in `requiredLists.<list>`
fn required_list_names(parsed: &Value, list: &str) -> Vec<Value> {
    parsed
        .get("requiredLists")
        .map(|lists| json_array(lists, list))
        .unwrap_or_default()
        .iter()
        .map(|entry| Value::String(json_string_or(entry, "name", "")))
        .collect()
}

/// Program table, call/database/copybook relationships and every earlier
/// result, as fed to the application-level prompt
fn application_info(session: &AnalysisSession) -> Value {
    let mut programs = Map::new();
    let mut relationships = Map::new();

    for (filename, data) in &session.parsed {
        let program_name = json_string_or(data, "programName", filename);
        programs.insert(
            program_name.clone(),
            json!({
                "filename": filename,
                "type": json_string_or(data, "programType", UNKNOWN),
                "purpose": json_string_or(data, "programPurpose", UNKNOWN),
            }),
        );

        let calls: Vec<Value> = data
            .get("requiredLists")
            .map(|lists| json_array(lists, "externalPrograms"))
            .unwrap_or_default()
            .iter()
            .map(|ep| {
                json!([
                    json_string_or(ep, "name", ""),
                    json_string_or(ep, "calledFrom", ""),
                    json_string_or(ep, "purpose", ""),
                ])
            })
            .collect();
        relationships.insert(
            program_name,
            json!({
                "calls": calls,
                "databases": required_list_names(data, "databases"),
                "copyBooks": required_list_names(data, "copyBooks"),
            }),
        );
    }

    json!({
        "programs": programs,
        "relationships": relationships,
        "parsed_details": session.parsed,
        "business_docs": session.business_docs,
    })
}

fn field_or_unknown(value: &Value, key: &str) -> Value {
    value
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::String(UNKNOWN.to_string()))
}

fn field_or_empty(value: Option<&Value>, key: &str) -> Value {
    value
        .and_then(|v| v.get(key))
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

fn program_summary(session: &AnalysisSession) -> Vec<Value> {
    session
        .metadata
        .iter()
        .map(|(filename, meta)| {
            let deps = session.dependencies.get(filename);
            json!({
                "filename": filename,
                "program_name": field_or_unknown(meta, "program_name"),
                "purpose": field_or_unknown(meta, "purpose"),
                "procedures": field_or_empty(Some(meta), "procedures"),
                "program_calls": field_or_empty(deps, "program_calls"),
                "file_accesses": field_or_empty(deps, "file_accesses"),
            })
        })
        .collect()
}

fn domain_inputs(session: &AnalysisSession) -> (Vec<Value>, Vec<Value>) {
    let mut concepts = Vec::new();
    let mut structures = Vec::new();
    for (filename, meta) in &session.metadata {
        concepts.extend(json_array(meta, "business_rules").iter().cloned());
        if let Some(formats) = session.formats.get(filename) {
            structures.extend(json_array(formats, "data_structures").iter().cloned());
        }
    }
    (concepts, structures)
}

fn service_inputs(session: &AnalysisSession) -> (Vec<Value>, Map<String, Value>) {
    let procedures = session
        .metadata
        .iter()
        .flat_map(|(filename, meta)| {
            json_array(meta, "procedures")
                .iter()
                .map(move |procedure| json!({"filename": filename, "procedure": procedure}))
        })
        .collect();

    let call_deps = session
        .dependencies
        .iter()
        .filter(|(_, deps)| !json_array(deps, "program_calls").is_empty())
        .map(|(filename, deps)| (filename.clone(), Value::from(json_array(deps, "program_calls").to_vec())))
        .collect();

    (procedures, call_deps)
}

fn spring_inputs(session: &AnalysisSession) -> (Vec<String>, Vec<String>, Vec<String>) {
    let known = |meta: &Value, key: &str| json_string(meta, key).filter(|v| v != UNKNOWN);
    let names = session
        .metadata
        .values()
        .filter_map(|meta| known(meta, "program_name"))
        .collect();
    let purposes = session
        .metadata
        .values()
        .filter_map(|meta| known(meta, "purpose"))
        .collect();

    let accesses: BTreeSet<String> = session
        .dependencies
        .values()
        .flat_map(|deps| json_array(deps, "file_accesses"))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    (names, purposes, accesses.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RPG_SYSTEM_PROMPT;
    use crate::ai::provider::scripted::ScriptedProvider;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    const ORDENTRY: &str = r#"**FREE
ctl-opt dftactgrp(*no);
dcl-f ORDERS usage(*update) keyed;
dcl-s orderId packed(9:0);

CALLP "VALIDATE"(orderId);
*inlr = *on;
"#;

    const DEPENDENCIES_REPLY: &str = r#"Here is the analysis:
{"program_calls": ["VALIDATE"], "file_accesses": ["ORDERS"], "copybooks": [], "imports": [], "brief_summary": "Validates and updates orders"}
"#;

    fn gateway(provider: ScriptedProvider) -> (std::sync::Arc<ScriptedProvider>, LlmGateway) {
        let (handle, shared) = provider.shared();
        (handle, LlmGateway::new(shared).with_system_prompt(RPG_SYSTEM_PROMPT))
    }

    #[test]
    fn test_step_table() {
        assert_eq!(AnalysisStep::ALL.len(), AnalysisStep::COUNT);
        for (i, step) in AnalysisStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i + 1);
            assert_eq!(AnalysisStep::from_index(i + 1), Some(*step));
        }
        assert_eq!(AnalysisStep::from_index(0), None);
        assert_eq!(AnalysisStep::from_index(10), None);
    }

    #[tokio::test]
    async fn test_dependency_stage_surfaces_called_program() {
        let dir = TempDir::new().unwrap();
        let (_, gateway) = gateway(
            ScriptedProvider::new().on("identify all dependencies", DEPENDENCIES_REPLY),
        );
        let sources = vec![SourceFile::new("ORDENTRY.rpgle", ORDENTRY)];

        let outcome = AnalysisPipeline::new(&gateway, AnalysisConfig::default(), dir.path())
            .unwrap()
            .run(&sources)
            .await
            .unwrap();

        let deps = &outcome.session.dependencies["ORDENTRY.rpgle"];
        assert_eq!(deps["program_calls"], json!(["VALIDATE"]));
        assert_eq!(
            outcome.session.summaries["ORDENTRY.rpgle"],
            "Validates and updates orders"
        );

        let dump: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join(ANALYSIS_RESULTS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            dump["dependencies"]["ORDENTRY.rpgle"]["program_calls"][0],
            "VALIDATE"
        );
        assert_eq!(dump["parsed_results"], json!({}));
    }

    #[tokio::test]
    async fn test_failed_llm_still_produces_java_project() {
        let dir = TempDir::new().unwrap();
        let (_, gateway) = gateway(ScriptedProvider::new());
        let sources = vec![SourceFile::new("ORDENTRY.rpgle", ORDENTRY)];

        let outcome = AnalysisPipeline::new(&gateway, AnalysisConfig::default(), dir.path())
            .unwrap()
            .run(&sources)
            .await
            .unwrap();

        assert!(outcome.session.parsed.is_empty());
        assert!(outcome.manifest.get(ArtifactCategory::BusinessDocumentation).is_empty());
        assert_eq!(
            outcome.manifest.get(ArtifactCategory::JavaProject),
            &[dir.path().join(JAVA_PROJECT_ARCHIVE)]
        );

        let archive = zip::ZipArchive::new(
            fs::File::open(dir.path().join(JAVA_PROJECT_ARCHIVE)).unwrap(),
        )
        .unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "README.md",
                "pom.xml",
                "src/main/java/com/example/Application.java",
                "src/main/resources/application.properties",
            ]
        );
    }

    #[tokio::test]
    async fn test_full_run_writes_every_document() {
        let dir = TempDir::new().unwrap();
        let parse_reply = json!({
            "programName": "ORDER_ENTRY",
            "programType": "Interactive",
            "programPurpose": "Order entry",
            "requiredLists": {
                "externalPrograms": [{"name": "VALIDATE", "calledFrom": "main", "purpose": "check order"}],
                "databases": [{"name": "ORDERS"}],
                "copyBooks": []
            }
        })
        .to_string();
        let metadata_reply = json!({
            "program_name": "ORDENTRY",
            "purpose": "Order entry",
            "procedures": ["main"],
            "business_rules": ["Orders need a customer"]
        })
        .to_string();
        let formats_reply = json!({"format_type": "free", "data_structures": ["orderDs"]}).to_string();
        let java_reply = "src/main/java/com/example/service/OrderEntryService.java\n\
                          ```java\npackage com.example.service;\npublic class OrderEntryService {}\n```\n";

        let (provider, gateway) = gateway(
            ScriptedProvider::new()
                .on("Enhanced Prompt for Parsing", parse_reply)
                .on("identify all dependencies", DEPENDENCIES_REPLY)
                .on("format specifications", formats_reply)
                .on("Extract detailed metadata", metadata_reply)
                .on("RPGLE to Spring Boot Java Conversion", java_reply)
                .otherwise("# Generated document"),
        );
        let sources = vec![SourceFile::new("ORDENTRY.rpgle", ORDENTRY)];

        let outcome = AnalysisPipeline::new(&gateway, AnalysisConfig::default(), dir.path())
            .unwrap()
            .run(&sources)
            .await
            .unwrap();

        for file in [
            "ORDENTRY.rpgle_business_doc.md",
            "ORDENTRY.rpgle_combined_doc.md",
            "application_business_logic.md",
            "architecture_recommendations.md",
            "domain_package_recommendations.md",
            "service_boundary_recommendations.md",
            "spring_boot_structure.md",
            "ORDENTRY.rpgle_conversion_plan.md",
            ANALYSIS_RESULTS_FILE,
            JAVA_PROJECT_ARCHIVE,
        ] {
            assert!(dir.path().join(file).is_file(), "{file} was not written");
        }

        let combined = fs::read_to_string(dir.path().join("ORDENTRY.rpgle_combined_doc.md")).unwrap();
        assert!(combined.starts_with("# Combined Documentation for ORDENTRY.rpgle\n\n## Part 1"));
        assert!(combined.contains("```rpgle\n**FREE"));

        let plan = fs::read_to_string(dir.path().join("ORDENTRY.rpgle_conversion_plan.md")).unwrap();
        assert_eq!(plan, "# Conversion Plan for ORDENTRY.rpgle\n\n# Generated document");

        // Parsed program name drives the Java class names
        let prompts = provider.prompts();
        let java_prompt = prompts
            .iter()
            .find(|p| p.contains("RPGLE to Spring Boot Java Conversion"))
            .unwrap();
        assert!(java_prompt.contains("OrderEntryService"));
        assert!(java_prompt.contains("# Generated document"));

        let app_prompt = prompts
            .iter()
            .find(|p| p.contains("Application Business Logic Analysis"))
            .unwrap();
        assert!(app_prompt.contains("\"VALIDATE\""));

        let mut archive = zip::ZipArchive::new(
            fs::File::open(dir.path().join(JAVA_PROJECT_ARCHIVE)).unwrap(),
        )
        .unwrap();
        let mut service = String::new();
        archive
            .by_name("src/main/java/com/example/service/OrderEntryService.java")
            .unwrap()
            .read_to_string(&mut service)
            .unwrap();
        assert!(service.contains("public class OrderEntryService {}"));
        assert_eq!(outcome.manifest.get(ArtifactCategory::ConversionPlans).len(), 1);
    }

    #[test]
    fn test_spring_inputs_drop_unknown_and_dedupe_files() {
        let mut session = AnalysisSession::default();
        session.metadata.insert(
            "A.rpgle".into(),
            json!({"program_name": "Unknown", "purpose": "Billing"}),
        );
        session.metadata.insert("B.rpgle".into(), json!({"program_name": "CUSTUPD"}));
        session
            .dependencies
            .insert("A.rpgle".into(), json!({"file_accesses": ["ORDERS", "CUSTMAST"]}));
        session
            .dependencies
            .insert("B.rpgle".into(), json!({"file_accesses": ["ORDERS"]}));

        let (names, purposes, accesses) = spring_inputs(&session);
        assert_eq!(names, vec!["CUSTUPD"]);
        assert_eq!(purposes, vec!["Billing"]);
        assert_eq!(accesses, vec!["CUSTMAST", "ORDERS"]);
    }

    #[test]
    fn test_service_inputs_skip_files_without_calls() {
        let mut session = AnalysisSession::default();
        session
            .metadata
            .insert("A.rpgle".into(), json!({"procedures": ["main", "validate"]}));
        session
            .dependencies
            .insert("A.rpgle".into(), json!({"program_calls": ["VALIDATE"]}));
        session
            .dependencies
            .insert("B.rpgle".into(), json!({"program_calls": []}));

        let (procedures, call_deps) = service_inputs(&session);
        assert_eq!(procedures.len(), 2);
        assert_eq!(procedures[1], json!({"filename": "A.rpgle", "procedure": "validate"}));
        assert_eq!(Value::Object(call_deps), json!({"A.rpgle": ["VALIDATE"]}));
    }
}
