//! Default workspace files for a Figma-derived Angular project.
//!
//! The model returns only the files it wrote. Anything a runnable Angular
//! Material workspace needs that it left out is filled in here.

use std::collections::BTreeMap;

use crate::types::GeneratedArtifact;

const README: &str = r#"# Generated Angular Project

This Angular project was automatically generated from a Figma design.

## Getting Started

1. Install dependencies:
   ```
   npm install
   ```

2. Run the development server:
   ```
   ng serve
   ```

3. Navigate to `http://localhost:4200/` in your browser.

## Project Structure

The project follows standard Angular architecture:

- `src/app/`: Contains the components generated from the Figma design
- `src/assets/`: Contains static assets
- `src/styles.scss`: Global styles

## Dependencies

This project requires:

- Angular 17+
- Angular Material
- TypeScript 5+
"#;

const PACKAGE_JSON: &str = r#"{
  "name": "figma-to-angular",
  "version": "0.0.1",
  "scripts": {
    "ng": "ng",
    "start": "ng serve",
    "build": "ng build",
    "watch": "ng build --watch --configuration development",
    "test": "ng test"
  },
  "private": true,
  "dependencies": {
    "@angular/animations": "^17.0.0",
    "@angular/cdk": "^17.0.0",
    "@angular/common": "^17.0.0",
    "@angular/compiler": "^17.0.0",
    "@angular/core": "^17.0.0",
    "@angular/forms": "^17.0.0",
    "@angular/material": "^17.0.0",
    "@angular/platform-browser": "^17.0.0",
    "@angular/platform-browser-dynamic": "^17.0.0",
    "@angular/router": "^17.0.0",
    "rxjs": "~7.8.0",
    "tslib": "^2.3.0",
    "zone.js": "~0.14.2"
  },
  "devDependencies": {
    "@angular-devkit/build-angular": "^17.0.0",
    "@angular/cli": "^17.0.0",
    "@angular/compiler-cli": "^17.0.0",
    "@types/jasmine": "~4.3.0",
    "jasmine-core": "~4.6.0",
    "karma": "~6.4.0",
    "karma-chrome-launcher": "~3.2.0",
    "karma-coverage": "~2.2.0",
    "karma-jasmine": "~5.1.0",
    "karma-jasmine-html-reporter": "~2.1.0",
    "typescript": "~5.2.2"
  }
}"#;

const ANGULAR_JSON: &str = r#"{
  "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
  "version": 1,
  "newProjectRoot": "projects",
  "projects": {
    "figma-to-angular": {
      "projectType": "application",
      "schematics": {
        "@schematics/angular:component": {
          "style": "scss"
        }
      },
      "root": "",
      "sourceRoot": "src",
      "prefix": "app",
      "architect": {
        "build": {
          "builder": "@angular-devkit/build-angular:browser",
          "options": {
            "outputPath": "dist/figma-to-angular",
            "index": "src/index.html",
            "main": "src/main.ts",
            "polyfills": ["zone.js"],
            "tsConfig": "tsconfig.app.json",
            "inlineStyleLanguage": "scss",
            "assets": ["src/favicon.ico", "src/assets"],
            "styles": ["src/styles.scss"],
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
            "production": {"browserTarget": "figma-to-angular:build:production"},
            "development": {"browserTarget": "figma-to-angular:build:development"}
          },
          "defaultConfiguration": "development"
        },
        "extract-i18n": {
          "builder": "@angular-devkit/build-angular:extract-i18n",
          "options": {"browserTarget": "figma-to-angular:build"}
        },
        "test": {
          "builder": "@angular-devkit/build-angular:karma",
          "options": {
            "polyfills": ["zone.js", "zone.js/testing"],
            "tsConfig": "tsconfig.spec.json",
            "inlineStyleLanguage": "scss",
            "assets": ["src/favicon.ico", "src/assets"],
            "styles": ["src/styles.scss"],
            "scripts": []
          }
        }
      }
    }
  }
}"#;

const TSCONFIG_JSON: &str = r#"{
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
}"#;

const MAIN_TS: &str = r#"import { platformBrowserDynamic } from '@angular/platform-browser-dynamic';

import { AppModule } from './app/app.module';

platformBrowserDynamic().bootstrapModule(AppModule)
  .catch(err => console.error(err));
"#;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Figma to Angular</title>
  <base href="/">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" type="image/x-icon" href="favicon.ico">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap" rel="stylesheet">
  <link href="https://fonts.googleapis.com/icon?family=Material+Icons" rel="stylesheet">
</head>
<body>
  <app-root></app-root>
</body>
</html>
"#;

const STYLES_SCSS: &str = r#"/* You can add global styles to this file, and also import other style files */
@import '@angular/material/prebuilt-themes/indigo-pink.css';

html, body {
  height: 100%;
  margin: 0;
  font-family: 'Inter', sans-serif;
}

body {
  background-color: #f8f8f8;
  color: #333333;
}

.container {
  padding: 16px;
  max-width: 1440px;
  margin: 0 auto;
}

.card {
  background: white;
  border-radius: 8px;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
  padding: 16px;
  margin-bottom: 16px;
}

h1, h2, h3, h4, h5, h6 {
  margin-top: 0;
  font-weight: 600;
}

.form-control {
  margin-bottom: 16px;
}

.btn {
  border: none;
  border-radius: 4px;
  padding: 8px 16px;
  font-weight: 500;
  cursor: pointer;
  transition: background-color 0.3s ease;
}

.btn-primary {
  background-color: #1976d2;
  color: white;
}

.btn-primary:hover {
  background-color: #1565c0;
}

@media (max-width: 768px) {
  .container {
    padding: 12px;
  }
}
"#;

const APP_MODULE: &str = r#"import { NgModule } from '@angular/core';
import { BrowserModule } from '@angular/platform-browser';
import { BrowserAnimationsModule } from '@angular/platform-browser/animations';
import { FormsModule, ReactiveFormsModule } from '@angular/forms';
import { HttpClientModule } from '@angular/common/http';
import { RouterModule } from '@angular/router';

import { MatToolbarModule } from '@angular/material/toolbar';
import { MatButtonModule } from '@angular/material/button';
import { MatIconModule } from '@angular/material/icon';
import { MatCardModule } from '@angular/material/card';
import { MatTableModule } from '@angular/material/table';
import { MatChipsModule } from '@angular/material/chips';
import { MatMenuModule } from '@angular/material/menu';
import { MatBadgeModule } from '@angular/material/badge';

import { AppComponent } from './app.component';

@NgModule({
  declarations: [
    AppComponent
  ],
  imports: [
    BrowserModule,
    BrowserAnimationsModule,
    FormsModule,
    ReactiveFormsModule,
    HttpClientModule,
    RouterModule.forRoot([]),
    MatToolbarModule,
    MatButtonModule,
    MatIconModule,
    MatCardModule,
    MatTableModule,
    MatChipsModule,
    MatMenuModule,
    MatBadgeModule
  ],
  providers: [],
  bootstrap: [AppComponent]
})
export class AppModule { }
"#;

const APP_COMPONENT_TS: &str = r#"import { Component } from '@angular/core';

@Component({
  selector: 'app-root',
  templateUrl: './app.component.html',
  styleUrls: ['./app.component.scss']
})
export class AppComponent {
  title = 'Figma to Angular';
}
"#;

const APP_COMPONENT_HTML: &str = r#"<div class="app-container">
  <router-outlet></router-outlet>
</div>
"#;

const APP_COMPONENT_SCSS: &str = r#".app-container {
  min-height: 100vh;
  display: flex;
  flex-direction: column;
}
"#;

const DEFAULTS: &[(&str, &str)] = &[
    ("package.json", PACKAGE_JSON),
    ("angular.json", ANGULAR_JSON),
    ("tsconfig.json", TSCONFIG_JSON),
    ("src/main.ts", MAIN_TS),
    ("src/index.html", INDEX_HTML),
    ("src/styles.scss", STYLES_SCSS),
    ("src/app/app.module.ts", APP_MODULE),
    ("src/app/app.component.ts", APP_COMPONENT_TS),
    ("src/app/app.component.html", APP_COMPONENT_HTML),
    ("src/app/app.component.scss", APP_COMPONENT_SCSS),
];

/// Model files plus workspace defaults for every path the model omitted.
/// The project README is always the generated one.
pub fn with_workspace_defaults(files: &BTreeMap<String, String>) -> Vec<GeneratedArtifact> {
    let mut merged: BTreeMap<&str, &str> = files
        .iter()
        .map(|(path, content)| (path.as_str(), content.as_str()))
        .collect();
    for &(path, content) in DEFAULTS {
        merged.entry(path).or_insert(content);
    }
    merged.insert("README.md", README);

    merged
        .into_iter()
        .map(|(path, content)| GeneratedArtifact::new(path, content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_files_win_over_defaults() {
        let mut files = BTreeMap::new();
        files.insert("src/app/app.module.ts".to_string(), "// generated".to_string());
        files.insert("src/app/header/header.component.ts".to_string(), "// header".to_string());

        let merged = with_workspace_defaults(&files);
        let module = merged
            .iter()
            .find(|f| f.path.as_os_str() == "src/app/app.module.ts")
            .unwrap();
        assert_eq!(module.content, "// generated");
        assert!(merged.iter().any(|f| f.path.as_os_str() == "src/app/header/header.component.ts"));
        assert!(merged.iter().any(|f| f.path.as_os_str() == "package.json"));
        assert_eq!(merged.len(), DEFAULTS.len() + 2);
    }

    #[test]
    fn test_readme_is_always_generated() {
        let mut files = BTreeMap::new();
        files.insert("README.md".to_string(), "model readme".to_string());
        let merged = with_workspace_defaults(&files);
        let readme = merged.iter().find(|f| f.path.as_os_str() == "README.md").unwrap();
        assert!(readme.content.starts_with("# Generated Angular Project"));
    }

    #[test]
    fn test_default_json_files_parse() {
        for (path, content) in DEFAULTS.iter().filter(|(p, _)| p.ends_with(".json")) {
            assert!(
                serde_json::from_str::<serde_json::Value>(content).is_ok(),
                "{path} is not valid JSON"
            );
        }
    }
}
