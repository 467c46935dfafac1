//! Runnable Angular workspace around one generated component.

use serde_json::json;
use std::path::Path;

use crate::extract::to_kebab_case;
use crate::types::{GeneratedArtifact, pretty_json};

pub const APP_MODULE_PATH: &str = "src/app/app.module.ts";
pub const APP_COMPONENT_TS_PATH: &str = "src/app/app.component.ts";
pub const APP_COMPONENT_HTML_PATH: &str = "src/app/app.component.html";
pub const APP_COMPONENT_CSS_PATH: &str = "src/app/app.component.css";

/// Files a project must contain before `npm install` is worth running
pub const REQUIRED_FILES: &[&str] = &[
    APP_MODULE_PATH,
    APP_COMPONENT_TS_PATH,
    APP_COMPONENT_HTML_PATH,
    APP_COMPONENT_CSS_PATH,
    "src/main.ts",
    "src/index.html",
];

const STYLES_CSS: &str = r#"/* You can add global styles to this file, and also import other style files */
body {
  font-family: Arial, sans-serif;
  margin: 0;
  padding: 20px;
  background-color: #f5f5f5;
}
"#;

const MAIN_TS: &str = r#"import { platformBrowserDynamic } from '@angular/platform-browser-dynamic';

import { AppModule } from './app/app.module';

platformBrowserDynamic().bootstrapModule(AppModule)
  .catch(err => console.error(err));
"#;

const APP_COMPONENT_CSS: &str = r#".app-header {
  background-color: #3498db;
  color: white;
  padding: 20px;
  text-align: center;
  border-radius: 5px;
  margin-bottom: 20px;
}

.component-container {
  display: flex;
  justify-content: center;
  padding: 20px;
}
"#;

/// Naming shared by every file of one demo project
#[derive(Debug, Clone)]
pub struct AngularProject {
    component: String,
    kebab: String,
}

impl AngularProject {
    pub fn new(component_name: &str) -> Self {
        Self {
            component: component_name.to_string(),
            kebab: to_kebab_case(component_name),
        }
    }

    pub fn kebab(&self) -> &str {
        &self.kebab
    }

    /// `angular-{kebab}-project`
    pub fn dir_name(&self) -> String {
        format!("angular-{}-project", self.kebab)
    }

    /// Where the component's own files live inside the project
    pub fn component_dir(&self) -> String {
        format!("src/app/{}", self.kebab)
    }

    fn app_name(&self) -> String {
        format!("angular-{}-demo", self.kebab)
    }

    fn title(&self) -> String {
        format!("Angular {} Demo", self.component)
    }

    /// Workspace configuration and static sources. The app module and app
    /// component come from the model and are handled separately.
    pub fn static_files(&self) -> Vec<GeneratedArtifact> {
        vec![
            GeneratedArtifact::new("package.json", pretty_json(&self.package_json())),
            GeneratedArtifact::new("angular.json", pretty_json(&self.angular_json())),
            GeneratedArtifact::new("tsconfig.json", pretty_json(&tsconfig_json())),
            GeneratedArtifact::new("tsconfig.app.json", pretty_json(&tsconfig_app_json())),
            GeneratedArtifact::new("src/index.html", self.index_html()),
            GeneratedArtifact::new("src/styles.css", STYLES_CSS),
            GeneratedArtifact::new("src/main.ts", MAIN_TS),
        ]
    }

    pub fn trailing_files(&self) -> Vec<GeneratedArtifact> {
        vec![
            GeneratedArtifact::new(APP_COMPONENT_CSS_PATH, APP_COMPONENT_CSS),
            GeneratedArtifact::new("README.md", self.readme()),
        ]
    }

    fn package_json(&self) -> serde_json::Value {
        json!({
            "name": self.app_name(),
            "version": "0.0.0",
            "scripts": {
                "ng": "ng",
                "start": "ng serve",
                "build": "ng build",
                "watch": "ng build --watch --configuration development",
                "test": "ng test"
            },
            "private": true,
            "dependencies": {
                "@angular/animations": "^17.1.0",
                "@angular/common": "^17.1.0",
                "@angular/compiler": "^17.1.0",
                "@angular/core": "^17.1.0",
                "@angular/forms": "^17.1.0",
                "@angular/platform-browser": "^17.1.0",
                "@angular/platform-browser-dynamic": "^17.1.0",
                "@angular/router": "^17.1.0",
                "rxjs": "~7.8.0",
                "tslib": "^2.3.0",
                "zone.js": "~0.14.3"
            },
            "devDependencies": {
                "@angular-devkit/build-angular": "^17.1.1",
                "@angular/cli": "^17.1.1",
                "@angular/compiler-cli": "^17.1.0",
                "@types/jasmine": "~5.1.0",
                "jasmine-core": "~5.1.0",
                "karma": "~6.4.0",
                "karma-chrome-launcher": "~3.2.0",
                "karma-coverage": "~2.2.0",
                "karma-jasmine": "~5.1.0",
                "karma-jasmine-html-reporter": "~2.1.0",
                "typescript": "~5.3.2"
            }
        })
    }

    fn angular_json(&self) -> serde_json::Value {
        let app = self.app_name();
        let mut projects = serde_json::Map::new();
        projects.insert(
            app.clone(),
            json!({
                "projectType": "application",
                "schematics": {},
                "root": "",
                "sourceRoot": "src",
                "prefix": "app",
                "architect": {
                    "build": {
                        "builder": "@angular-devkit/build-angular:browser",
                        "options": {
                            "outputPath": "dist/angular-demo",
                            "index": "src/index.html",
                            "main": "src/main.ts",
                            "polyfills": ["zone.js"],
                            "tsConfig": "tsconfig.app.json",
                            "assets": ["src/favicon.ico", "src/assets"],
                            "styles": ["src/styles.css"],
                            "scripts": []
                        },
                        "configurations": {
                            "production": {
                                "budgets": [
                                    {"type": "initial", "maximumWarning": "500kb", "maximumError": "1mb"},
                                    {"type": "anyComponentStyle", "maximumWarning": "2kb", "maximumError": "4kb"}
                                ],
                                "outputHashing": "all"
                            },
                            "development": {
                                "buildOptimizer": false,
                                "optimization": false,
                                "vendorChunk": true,
                                "extractLicenses": false,
                                "sourceMap": true,
                                "namedChunks": true
                            }
                        },
                        "defaultConfiguration": "production"
                    },
                    "serve": {
                        "builder": "@angular-devkit/build-angular:dev-server",
                        "configurations": {
                            "production": {"browserTarget": format!("{app}:build:production")},
                            "development": {"browserTarget": format!("{app}:build:development")}
                        },
                        "defaultConfiguration": "development"
                    },
                    "extract-i18n": {
                        "builder": "@angular-devkit/build-angular:extract-i18n",
                        "options": {"browserTarget": format!("{app}:build")}
                    }
                }
            }),
        );

        json!({
            "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
            "version": 1,
            "newProjectRoot": "projects",
            "projects": projects
        })
    }

    fn index_html(&self) -> String {
        format!(
            r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{}</title>
  <base href="/">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" type="image/x-icon" href="favicon.ico">
</head>
<body>
  <app-root></app-root>
</body>
</html>
"#,
            self.title()
        )
    }

    fn readme(&self) -> String {
        format!(
            "# {}\n\n\
             This project was generated with the AI Angular Code Generator.\n\n\
             ## Development server\n\n\
             Run `npm start` to start a dev server. Navigate to `http://localhost:4200/`. \
             The application will automatically reload if you change any of the source files.\n\n\
             ## Build\n\n\
             Run `npm run build` to build the project. \
             The build artifacts will be stored in the `dist/` directory.\n",
            self.title()
        )
    }

    pub fn fallback_app_module(&self) -> String {
        let name = &self.component;
        let kebab = &self.kebab;
        format!(
            r#"import {{ NgModule }} from '@angular/core';
import {{ BrowserModule }} from '@angular/platform-browser';
import {{ AppComponent }} from './app.component';
import {{ {name}Component }} from './{kebab}/{kebab}.component';

@NgModule({{
  declarations: [
    AppComponent,
    {name}Component
  ],
  imports: [
    BrowserModule
  ],
  providers: [],
  bootstrap: [AppComponent]
}})
export class AppModule {{ }}
"#
        )
    }

    pub fn fallback_app_component_ts(&self) -> String {
        format!(
            r#"import {{ Component }} from '@angular/core';

@Component({{
  selector: 'app-root',
  templateUrl: './app.component.html',
  styleUrls: ['./app.component.css']
}})
export class AppComponent {{
  title: string = '{}';
}}
"#,
            self.title()
        )
    }

    pub fn fallback_app_component_html(&self) -> String {
        let kebab = &self.kebab;
        format!(
            r#"<div class="app-container">
  <header class="app-header">
    <h1>{{{{title}}}}</h1>
  </header>

  <main class="component-container">
    <app-{kebab}></app-{kebab}>
  </main>
</div>
"#
        )
    }

    /// Replacement content for a required file found missing after writing
    pub fn required_fallback(&self, relative: &str) -> Option<String> {
        match relative {
            APP_MODULE_PATH => Some(self.fallback_app_module()),
            APP_COMPONENT_TS_PATH => Some(self.fallback_app_component_ts()),
            APP_COMPONENT_HTML_PATH => Some(self.fallback_app_component_html()),
            APP_COMPONENT_CSS_PATH => Some(APP_COMPONENT_CSS.to_string()),
            "src/main.ts" => Some(MAIN_TS.to_string()),
            "src/index.html" => Some(self.index_html()),
            _ => None,
        }
    }
}

fn tsconfig_json() -> serde_json::Value {
    json!({
        "compileOnSave": false,
        "compilerOptions": {
            "baseUrl": "./",
            "outDir": "./dist/out-tsc",
            "forceConsistentCasingInFileNames": true,
            "strict": true,
            "noImplicitOverride": true,
            "noPropertyAccessFromIndexSignature": true,
            "noImplicitReturns": true,
            "noFallthroughCasesInSwitch": true,
            "sourceMap": true,
            "declaration": false,
            "downlevelIteration": true,
            "experimentalDecorators": true,
            "moduleResolution": "node",
            "importHelpers": true,
            "target": "ES2022",
            "module": "ES2022",
            "useDefineForClassFields": false,
            "lib": ["ES2022", "dom"]
        },
        "angularCompilerOptions": {
            "enableI18nLegacyMessageIdFormat": false,
            "strictInjectionParameters": true,
            "strictInputAccessModifiers": true,
            "strictTemplates": true
        }
    })
}

fn tsconfig_app_json() -> serde_json::Value {
    json!({
        "extends": "./tsconfig.json",
        "compilerOptions": {"outDir": "./out-tsc/app", "types": []},
        "files": ["src/main.ts"],
        "include": ["src/**/*.d.ts"]
    })
}

/// Required files absent or empty under `project_dir`
pub fn missing_required_files(project_dir: &Path) -> Vec<&'static str> {
    REQUIRED_FILES
        .iter()
        .copied()
        .filter(|rel| {
            std::fs::metadata(project_dir.join(rel))
                .map(|m| m.len() == 0)
                .unwrap_or(true)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_naming() {
        let project = AngularProject::new("UserProfileCard");
        assert_eq!(project.kebab(), "user-profile-card");
        assert_eq!(project.dir_name(), "angular-user-profile-card-project");
        assert_eq!(project.component_dir(), "src/app/user-profile-card");
    }

    #[test]
    fn test_static_files_are_valid_json_where_expected() {
        let project = AngularProject::new("UserProfileCard");
        let files = project.static_files();

        let angular = files.iter().find(|f| f.path.ends_with("angular.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&angular.content).unwrap();
        let app = &value["projects"]["angular-user-profile-card-demo"];
        assert_eq!(app["architect"]["build"]["options"]["outputPath"], "dist/angular-demo");
        assert_eq!(
            app["architect"]["serve"]["configurations"]["development"]["browserTarget"],
            "angular-user-profile-card-demo:build:development"
        );

        let package = files.iter().find(|f| f.path.ends_with("package.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&package.content).unwrap();
        assert_eq!(value["dependencies"]["@angular/core"], "^17.1.0");

        let index = files.iter().find(|f| f.path.ends_with("index.html")).unwrap();
        assert!(index.content.contains("<title>Angular UserProfileCard Demo</title>"));
    }

    #[test]
    fn test_fallbacks_reference_component() {
        let project = AngularProject::new("UserProfileCard");
        assert!(project.fallback_app_module().contains(
            "import { UserProfileCardComponent } from './user-profile-card/user-profile-card.component';"
        ));
        assert!(project
            .fallback_app_component_ts()
            .contains("title: string = 'Angular UserProfileCard Demo';"));
        let html = project.fallback_app_component_html();
        assert!(html.contains("<h1>{{title}}</h1>"));
        assert!(html.contains("<app-user-profile-card></app-user-profile-card>"));
    }

    #[test]
    fn test_missing_required_files() {
        let dir = TempDir::new().unwrap();
        let project = AngularProject::new("Card");
        for rel in REQUIRED_FILES {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, project.required_fallback(rel).unwrap()).unwrap();
        }
        assert!(missing_required_files(dir.path()).is_empty());

        std::fs::write(dir.path().join(APP_MODULE_PATH), "").unwrap();
        std::fs::remove_file(dir.path().join("src/main.ts")).unwrap();
        assert_eq!(missing_required_files(dir.path()), vec![APP_MODULE_PATH, "src/main.ts"]);
    }
}
