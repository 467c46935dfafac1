//! Figma design export to an Angular Material workspace.
//!
//! The document tree is reduced to names, types and the few properties that
//! matter for layout, analysed by the model, and then turned into a map of
//! project files. The result ships as a zip together with an analysis report.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::progress::ProgressTracker;
use crate::ai::LlmGateway;
use crate::ai::prompt::figma as prompts;
use crate::artifact::scaffold::with_workspace_defaults;
use crate::artifact::{ArtifactWriter, zip_entries};
use crate::extract::{extract_named_blocks, parse_json_response, strip_json_fence};
use crate::types::{ArtifactCategory, OutputManifest, Result, pretty_json, truncate_chars};

pub const PROJECT_ARCHIVE: &str = "angular_project.zip";

const RAW_CONTENT_CHARS: usize = 1000;
const LAYOUT_TYPES: &[&str] = &["FRAME", "GROUP", "COMPONENT"];
const STYLE_KEYS: &[&str] = &["style", "fills", "strokes", "effects"];

// =============================================================================
// Report format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    Json,
    #[default]
    Markdown,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!("Unknown report format: {}. Valid values: json, markdown", s)),
        }
    }
}

// =============================================================================
// Component tree
// =============================================================================

/// Reduced tree of the export's `document` node, `{}` without one
pub fn component_tree(figma: &Value) -> Value {
    figma
        .get("document")
        .map(process_node)
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn str_field(node: &Value, key: &str) -> Value {
    Value::String(
        node.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}

fn nested_or(node: &Value, outer: &str, key: &str, default: Value) -> Value {
    node.get(outer)
        .and_then(|o| o.get(key))
        .cloned()
        .unwrap_or(default)
}

fn process_node(node: &Value) -> Value {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();
    let mut properties = Map::new();

    for key in STYLE_KEYS {
        if let Some(value) = node.get(*key) {
            properties.insert((*key).to_string(), value.clone());
        }
    }

    if node_type == "TEXT"
        && let Some(text) = node.get("characters")
    {
        properties.insert("text".into(), text.clone());
        properties.insert("fontSize".into(), nested_or(node, "style", "fontSize", json!(14)));
        properties.insert("fontWeight".into(), nested_or(node, "style", "fontWeight", json!(400)));
    }

    if LAYOUT_TYPES.contains(&node_type) {
        properties.insert("width".into(), nested_or(node, "size", "width", json!(0)));
        properties.insert("height".into(), nested_or(node, "size", "height", json!(0)));
        for (key, default) in [
            ("layoutMode", "NONE"),
            ("primaryAxisAlignItems", "MIN"),
            ("counterAxisAlignItems", "MIN"),
        ] {
            properties.insert(
                key.into(),
                node.get(key).cloned().unwrap_or_else(|| json!(default)),
            );
        }
    }

    let children: Vec<Value> = node
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(process_node).collect())
        .unwrap_or_default();

    json!({
        "id": str_field(node, "id"),
        "name": str_field(node, "name"),
        "type": str_field(node, "type"),
        "children": children,
        "properties": properties,
    })
}

// =============================================================================
// Model replies
// =============================================================================

/// Parsed analysis, or an error object carrying the start of the reply
fn semantic_analysis_from(reply: &str) -> Value {
    match parse_json_response(reply) {
        Some(value) => value,
        None => {
            warn!("Semantic analysis reply was not valid JSON");
            json!({
                "error": "Failed to parse AI response",
                "raw_content": format!(
                    "{}... (truncated)",
                    truncate_chars(strip_json_fence(reply), RAW_CONTENT_CHARS)
                ),
            })
        }
    }
}

/// Path to content map from the code generation reply. Non-string values are
/// kept as pretty JSON; a reply that is not a JSON object is salvaged block by
/// block.
fn project_files_from(reply: &str) -> BTreeMap<String, String> {
    match parse_json_response(reply) {
        Some(Value::Object(map)) if !map.is_empty() => map
            .into_iter()
            .map(|(path, content)| {
                let content = match content {
                    Value::String(s) => s,
                    other => pretty_json(&other),
                };
                (path, content)
            })
            .collect(),
        _ => {
            warn!("Code generation reply was not a JSON file map, salvaging code blocks");
            extract_named_blocks(reply)
        }
    }
}

// =============================================================================
// Analysis report
// =============================================================================

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn semantic_markdown(analysis: &Value) -> String {
    let mut md = String::from("# Semantic Analysis\n\n");
    let Some(categories) = analysis.as_object() else {
        let _ = write!(md, "{}\n\n", scalar_text(analysis));
        return md;
    };

    for (category, body) in categories {
        let _ = write!(md, "## {category}\n\n");
        match body {
            Value::Object(entries) => {
                for (key, value) in entries {
                    let _ = write!(md, "### {key}\n\n");
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                let _ = writeln!(md, "- {}", scalar_text(item));
                            }
                        }
                        Value::Object(_) => {
                            let _ = writeln!(md, "```json\n{}\n```", pretty_json(value));
                        }
                        other => {
                            let _ = write!(md, "{}\n\n", scalar_text(other));
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if item.is_object() {
                        let _ = writeln!(md, "```json\n{}\n```", pretty_json(item));
                    } else {
                        let _ = writeln!(md, "- {}", scalar_text(item));
                    }
                }
            }
            other => {
                let _ = write!(md, "{}\n\n", scalar_text(other));
            }
        }
    }
    md
}

/// Report files for the component tree and semantic analysis
pub fn analysis_report(
    tree: &Value,
    analysis: &Value,
    format: ReportFormat,
) -> Vec<(String, String)> {
    match format {
        ReportFormat::Json => vec![
            ("component_tree.json".to_string(), pretty_json(tree)),
            ("semantic_analysis.json".to_string(), pretty_json(analysis)),
        ],
        ReportFormat::Markdown => vec![
            (
                "component_tree.md".to_string(),
                format!("# Component Tree Analysis\n\n```json\n{}\n```\n", pretty_json(tree)),
            ),
            ("semantic_analysis.md".to_string(), semantic_markdown(analysis)),
        ],
    }
}

// =============================================================================
// Project summary
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub total: usize,
    pub components: usize,
    pub templates: usize,
    pub styles: usize,
    pub models: usize,
    pub services: usize,
    pub modules: usize,
    pub config: usize,
    /// Indented Markdown list of directories and files
    pub tree: String,
}

#[derive(Default)]
struct TreeNode {
    dirs: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

impl TreeNode {
    fn insert(&mut self, path: &str) {
        let mut parts: Vec<&str> = path.split('/').collect();
        let Some(file) = parts.pop() else {
            return;
        };
        let mut node = self;
        for dir in parts {
            node = node.dirs.entry(dir.to_string()).or_default();
        }
        node.files.push(file.to_string());
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let mut files = self.files.clone();
        files.sort();
        for file in files {
            let _ = writeln!(out, "{prefix}- {file}");
        }
        for (dir, child) in &self.dirs {
            let _ = writeln!(out, "{prefix}- {dir}/");
            child.render(&format!("{prefix}  "), out);
        }
    }
}

impl ProjectSummary {
    pub fn from_files<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut summary = Self::default();
        let mut tree = TreeNode::default();
        for path in paths {
            summary.total += 1;
            let counter = if path.ends_with(".component.ts") {
                &mut summary.components
            } else if path.ends_with(".html") {
                &mut summary.templates
            } else if path.ends_with(".scss") || path.ends_with(".css") {
                &mut summary.styles
            } else if path.ends_with(".model.ts") || path.ends_with("interface.ts") {
                &mut summary.models
            } else if path.ends_with(".service.ts") {
                &mut summary.services
            } else if path.ends_with(".module.ts") {
                &mut summary.modules
            } else {
                &mut summary.config
            };
            *counter += 1;
            tree.insert(path);
        }
        tree.render("", &mut summary.tree);
        summary
    }

    pub fn to_markdown(&self) -> String {
        format!(
            "### Summary\n\n\
             - Total Files: {}\n- Components: {}\n- Templates: {}\n- Style Files: {}\n\
             - Models/Interfaces: {}\n- Services: {}\n- Modules: {}\n- Configuration Files: {}\n\n\
             ### File Structure\n\n{}",
            self.total,
            self.components,
            self.templates,
            self.styles,
            self.models,
            self.services,
            self.modules,
            self.config,
            self.tree
        )
    }
}

// =============================================================================
// Pipeline
// =============================================================================

const STEPS: [&str; 6] = [
    "Parsing Figma JSON",
    "Analyzing component structure",
    "Generating optimized prompt",
    "Generating Angular code",
    "Creating analysis files",
    "Creating Angular project ZIP package",
];

pub struct FigmaOutcome {
    pub component_tree: Value,
    pub semantic_analysis: Value,
    /// Files returned by the model, before workspace defaults
    pub files: BTreeMap<String, String>,
    pub summary: ProjectSummary,
    pub archive: PathBuf,
    pub manifest: OutputManifest,
}

pub struct FigmaPipeline<'a> {
    gateway: &'a LlmGateway,
    format: ReportFormat,
    writer: ArtifactWriter,
    progress: ProgressTracker,
}

impl<'a> FigmaPipeline<'a> {
    pub fn new(gateway: &'a LlmGateway, format: ReportFormat, output_dir: &Path) -> Result<Self> {
        Ok(Self {
            gateway,
            format,
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

    async fn ask(&self, stage: &str, prompt: &str) -> String {
        match self.gateway.complete(stage, prompt, prompts::MAX_TOKENS).await {
            Some(reply) => reply,
            None => {
                self.progress.skipped(stage, "no response from LLM");
                String::new()
            }
        }
    }

    pub async fn run(mut self, figma: &Value) -> Result<FigmaOutcome> {
        self.step(0);
        let tree = component_tree(figma);

        self.step(1);
        let reply = self
            .ask("semantic_analysis", &prompts::semantic_analysis(&pretty_json(&tree)))
            .await;
        let analysis = semantic_analysis_from(&reply);

        self.step(2);
        let prompt = prompts::code_generation(
            &pretty_json(&analysis),
            &pretty_json(&prompts::angular_patterns()),
        );

        self.step(3);
        let reply = self.ask("code_generation", &prompt).await;
        let files = project_files_from(&reply);
        info!("Code generation produced {} file(s)", files.len());

        self.step(4);
        for (name, content) in analysis_report(&tree, &analysis, self.format) {
            self.writer
                .write(ArtifactCategory::FigmaAnalysis, &name, &content)?;
        }

        self.step(5);
        let archive = self.writer.root().join(PROJECT_ARCHIVE);
        let entries = zip_entries(&archive, &with_workspace_defaults(&files))?;
        info!("Packed {} file(s) into {}", entries, archive.display());
        self.writer.record(ArtifactCategory::AngularProject, &archive);

        let summary = ProjectSummary::from_files(files.keys().map(String::as_str));
        self.progress
            .finish(true, &format!("{} generated file(s)", summary.total));
        Ok(FigmaOutcome {
            component_tree: tree,
            semantic_analysis: analysis,
            files,
            summary,
            archive,
            manifest: self.writer.into_manifest(),
        })
    }
}
