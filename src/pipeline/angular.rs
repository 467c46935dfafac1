//! Angular component generation from a JSON element tree.
//!
//! The component's template, stylesheet and class are requested one file at a
//! time. By default the component is then wrapped in a runnable demo project
//! and `npm install` is attempted.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::progress::ProgressTracker;
use crate::ai::LlmGateway;
use crate::ai::prompt::angular as prompts;
use crate::artifact::scaffold::{
    APP_COMPONENT_HTML_PATH, APP_COMPONENT_TS_PATH, APP_MODULE_PATH, AngularProject,
    missing_required_files,
};
use crate::artifact::{ArtifactWriter, NpmOutcome, npm_install};
use crate::extract::{clean_code, split_app_component};
use crate::types::{
    ArtifactCategory, OutputManifest, Result, StyleType, json_string_or, pretty_json,
};

pub const DEFAULT_COMPONENT_NAME: &str = "MyExampleComponent";

/// Name and element tree taken from a component description
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub name: String,
    /// Pretty-printed `rootElement`, `{}` when absent
    pub root_element: String,
}

impl ComponentSpec {
    pub fn from_json(description: &Value) -> Self {
        let root = description
            .get("rootElement")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        Self {
            name: json_string_or(description, "componentName", DEFAULT_COMPONENT_NAME),
            root_element: pretty_json(&root),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AngularOptions {
    pub style: StyleType,
    pub create_project: bool,
    pub skip_install: bool,
}

impl Default for AngularOptions {
    fn default() -> Self {
        Self {
            style: StyleType::Scss,
            create_project: true,
            skip_install: false,
        }
    }
}

pub struct AngularOutcome {
    pub manifest: OutputManifest,
    pub component_dir: PathBuf,
    pub project_dir: Option<PathBuf>,
    pub npm: Option<NpmOutcome>,
}

pub struct AngularPipeline<'a> {
    gateway: &'a LlmGateway,
    options: AngularOptions,
    writer: ArtifactWriter,
    progress: ProgressTracker,
}

impl<'a> AngularPipeline<'a> {
    pub fn new(
        gateway: &'a LlmGateway,
        options: AngularOptions,
        output_dir: &Path,
    ) -> Result<Self> {
        let steps = if options.create_project { 5 } else { 3 };
        Ok(Self {
            gateway,
            options,
            writer: ArtifactWriter::new(output_dir)?,
            progress: ProgressTracker::new(steps),
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

    async fn ask(&self, stage: &str, prompt: &str) -> Option<String> {
        let reply = self
            .gateway
            .complete(stage, prompt, prompts::DEFAULT_MAX_TOKENS)
            .await;
        if reply.is_none() {
            self.progress.skipped(stage, "generation failed");
        }
        reply
    }

    pub async fn run(mut self, description: &Value) -> Result<AngularOutcome> {
        let spec = ComponentSpec::from_json(description);
        let project = AngularProject::new(&spec.name);
        let kebab = project.kebab().to_string();
        let style = self.options.style;
        info!("Processing component: {}", spec.name);

        self.progress.start_step(1, "Generating HTML");
        let html = self.ask("html", &prompts::html(&spec.name, &spec.root_element)).await;
        self.component_file(&kebab, "html", html.map(|raw| clean_code(&raw, "html")))?;

        let ext = style.extension();
        self.progress
            .start_step(2, &format!("Generating {}", ext.to_uppercase()));
        let styles = self
            .ask("styling", &prompts::styling(&spec.name, &spec.root_element, style))
            .await;
        self.component_file(&kebab, ext, styles.map(|raw| clean_code(&raw, ext)))?;

        self.progress.start_step(3, "Generating TypeScript");
        let ts = self.ask("typescript", &prompts::typescript(&spec.name, style)).await;
        self.component_file(&kebab, "ts", ts.map(|raw| clean_code(&raw, "typescript")))?;

        let component_dir = self.writer.root().join(&kebab);
        let (project_dir, npm) = if self.options.create_project {
            let dir = self.create_project(&spec.name, &project, &component_dir).await?;
            self.progress.start_step(5, "Installing dependencies");
            let npm = npm_install(&dir, self.options.skip_install).await;
            (Some(dir), Some(npm))
        } else {
            (None, None)
        };

        self.progress.finish(
            true,
            &format!("Generated {} artifact(s)", self.writer.manifest().total()),
        );
        Ok(AngularOutcome {
            manifest: self.writer.into_manifest(),
            component_dir,
            project_dir,
            npm,
        })
    }

    fn component_file(&mut self, kebab: &str, ext: &str, code: Option<String>) -> Result<()> {
        if let Some(code) = code {
            self.writer.write(
                ArtifactCategory::AngularComponent,
                format!("{kebab}/{kebab}.component.{ext}"),
                &code,
            )?;
        }
        Ok(())
    }

    async fn create_project(
        &mut self,
        component_name: &str,
        project: &AngularProject,
        component_dir: &Path,
    ) -> Result<PathBuf> {
        self.progress.start_step(4, "Creating Angular project");
        let base = PathBuf::from(project.dir_name());
        let project_dir = self.writer.root().join(&base);
        info!("Creating Angular project in {}", project_dir.display());

        // Component files generated above, whatever made it to disk
        if component_dir.is_dir() {
            for entry in fs::read_dir(component_dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    let content = fs::read_to_string(entry.path())?;
                    self.writer.write_file(
                        base.join(project.component_dir()).join(entry.file_name()),
                        &content,
                    )?;
                }
            }
        }
        self.writer.write_all(&base, &project.static_files())?;

        let module = self
            .ask("app_module", &prompts::app_module(component_name))
            .await
            .map(|raw| clean_code(&raw, "typescript"))
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| project.fallback_app_module());
        self.writer.write_file(base.join(APP_MODULE_PATH), &module)?;

        let (ts, html) = match self
            .ask("app_component", &prompts::app_component(component_name))
            .await
        {
            Some(reply) => split_app_component(&reply),
            None => (None, None),
        };
        if ts.is_none() || html.is_none() {
            info!("Using fallback app component file(s)");
        }
        self.writer.write_file(
            base.join(APP_COMPONENT_TS_PATH),
            &ts.unwrap_or_else(|| project.fallback_app_component_ts()),
        )?;
        self.writer.write_file(
            base.join(APP_COMPONENT_HTML_PATH),
            &html.unwrap_or_else(|| project.fallback_app_component_html()),
        )?;

        self.writer.write_all(&base, &project.trailing_files())?;
        fs::create_dir_all(project_dir.join("src/assets/images"))?;

        for missing in missing_required_files(&project_dir) {
            warn!("Required file missing, recreating: {}", missing);
            if let Some(content) = project.required_fallback(missing) {
                self.writer.write_file(base.join(missing), &content)?;
            }
        }

        self.writer
            .record(ArtifactCategory::AngularProject, &project_dir);
        Ok(project_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ANGULAR_SYSTEM_PROMPT;
    use crate::ai::provider::scripted::ScriptedProvider;
    use serde_json::json;
    use tempfile::TempDir;

    fn gateway(provider: ScriptedProvider) -> LlmGateway {
        let (_, shared) = provider.shared();
        LlmGateway::new(shared).with_system_prompt(ANGULAR_SYSTEM_PROMPT)
    }

    fn description() -> Value {
        json!({
            "componentName": "UserProfileCard",
            "rootElement": {
                "tag": "div",
                "name": "card",
                "children": [{"tag": "img", "name": "avatar"}]
            }
        })
    }

    #[test]
    fn test_component_spec_defaults() {
        let spec = ComponentSpec::from_json(&json!({}));
        assert_eq!(spec.name, DEFAULT_COMPONENT_NAME);
        assert_eq!(spec.root_element, "{}");

        let spec = ComponentSpec::from_json(&description());
        assert_eq!(spec.name, "UserProfileCard");
        assert!(spec.root_element.contains("\"avatar\""));
    }

    #[tokio::test]
    async fn test_component_only() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(
            ScriptedProvider::new()
                .on("Generate the HTML template", "```html\n<div class=\"card\"></div>\n```")
                .on("stylesheet", "```scss\n.card { padding: 8px; }\n```")
                .on("TypeScript class definition", "export class UserProfileCardComponent {}"),
        );
        let options = AngularOptions {
            create_project: false,
            ..Default::default()
        };

        let outcome = AngularPipeline::new(&gateway, options, dir.path())
            .unwrap()
            .run(&description())
            .await
            .unwrap();

        let component = dir.path().join("user-profile-card");
        assert_eq!(outcome.component_dir, component);
        assert_eq!(
            fs::read_to_string(component.join("user-profile-card.component.html")).unwrap(),
            "<div class=\"card\"></div>"
        );
        assert_eq!(
            fs::read_to_string(component.join("user-profile-card.component.scss")).unwrap(),
            ".card { padding: 8px; }"
        );
        assert!(component.join("user-profile-card.component.ts").is_file());
        assert!(outcome.project_dir.is_none());
        assert_eq!(outcome.manifest.get(ArtifactCategory::AngularComponent).len(), 3);
    }

    #[tokio::test]
    async fn test_project_falls_back_when_llm_is_down() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(ScriptedProvider::new());
        let options = AngularOptions {
            style: StyleType::Css,
            create_project: true,
            skip_install: true,
        };

        let outcome = AngularPipeline::new(&gateway, options, dir.path())
            .unwrap()
            .run(&description())
            .await
            .unwrap();

        let project = outcome.project_dir.unwrap();
        assert_eq!(project, dir.path().join("angular-user-profile-card-project"));
        assert!(missing_required_files(&project).is_empty());
        assert!(project.join("src/assets/images").is_dir());
        assert!(project.join("package.json").is_file());

        let module = fs::read_to_string(project.join(APP_MODULE_PATH)).unwrap();
        assert!(module.contains("import { UserProfileCardComponent } from './user-profile-card/user-profile-card.component';"));
        assert_eq!(outcome.npm, Some(NpmOutcome::Skipped));
        assert!(outcome.manifest.get(ArtifactCategory::AngularComponent).is_empty());
    }

    #[tokio::test]
    async fn test_project_uses_model_app_files() {
        let dir = TempDir::new().unwrap();
        let app_component = "--- app.component.ts ---\n```typescript\n\
            import { Component } from '@angular/core';\nexport class AppComponent { title = 'Cards'; }\n```\n\
            --- app.component.html ---\n```html\n<main><app-user-profile-card></app-user-profile-card></main>\n```\n";
        let gateway = gateway(
            ScriptedProvider::new()
                .on("Generate the HTML template", "<div class=\"card\"></div>")
                .on("app module file", "```typescript\nexport class AppModule { }\n```")
                .on("basic app component files", app_component)
                .otherwise(".card {}"),
        );
        let options = AngularOptions {
            skip_install: true,
            ..Default::default()
        };

        let outcome = AngularPipeline::new(&gateway, options, dir.path())
            .unwrap()
            .run(&description())
            .await
            .unwrap();

        let project = outcome.project_dir.unwrap();
        assert_eq!(
            fs::read_to_string(project.join(APP_MODULE_PATH)).unwrap(),
            "export class AppModule { }"
        );
        assert!(fs::read_to_string(project.join(APP_COMPONENT_TS_PATH))
            .unwrap()
            .contains("title = 'Cards'"));
        assert_eq!(
            fs::read_to_string(project.join(APP_COMPONENT_HTML_PATH)).unwrap(),
            "<main><app-user-profile-card></app-user-profile-card></main>"
        );
        // Component files are copied into the project
        assert_eq!(
            fs::read_to_string(project.join("src/app/user-profile-card/user-profile-card.component.html"))
                .unwrap(),
            "<div class=\"card\"></div>"
        );
    }
}
