//! Multi-file extraction from LLM replies.
//!
//! Replies that should contain several source files rarely follow one
//! layout. Each extractor here accepts the shapes seen in practice and
//! returns paths relative to the project root; nothing touches the disk.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::types::GeneratedArtifact;

static JAVA_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:src|java|com)/.+\.java").expect("valid java path regex"));
static JAVA_PATH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:src|java|com)/\S+\.java$").expect("valid java path line regex")
});
static PACKAGE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)package\s+((?:com|org)\.[^\s;]*)").expect("valid package regex")
});
static NAMED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:typescript|html|scss|json)?\s+([\s\S]+?)```").expect("valid block regex")
});
static COMPONENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export class (\w+)Component").expect("valid component class regex")
});

const JAVA_SOURCE_ROOT: &str = "src/main/java/";
pub const DEFAULT_BASE_PACKAGE: &str = "com.company.modernizedapp";

/// Message written when no Angular files could be recovered
pub const NO_ANGULAR_CODE: &str =
    "Failed to generate valid Angular code. Please check the model response.";

/// Prefix `src/main/java/` unless the path is already under `src/`.
pub fn normalize_java_path(path: &str) -> String {
    if path.starts_with("src/") {
        path.to_string()
    } else {
        format!("{JAVA_SOURCE_ROOT}{path}")
    }
}

// =============================================================================
// Path-and-block Java replies
// =============================================================================

/// Info string of a fence line, `None` when the line is not a fence
fn fence_tag(line: &str) -> Option<&str> {
    line.trim().strip_prefix("```").map(str::trim)
}

fn is_java_tag(tag: &str) -> bool {
    tag.is_empty() || tag.eq_ignore_ascii_case("java")
}

/// Path lines outside fences, and the bodies of Java or untagged fences.
/// Every opener consumes its own closing fence whatever its language.
fn java_paths_and_blocks(response: &str) -> (Vec<&str>, Vec<&str>) {
    let mut paths = Vec::new();
    let mut blocks = Vec::new();
    // (is_java, body start offset) of the open fence
    let mut open: Option<(bool, usize)> = None;
    let mut offset = 0;

    for line in response.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        match (open, fence_tag(line)) {
            (None, Some(tag)) => open = Some((is_java_tag(tag), offset)),
            (Some((is_java, body)), Some(_)) => {
                if is_java {
                    blocks.push(&response[body..start]);
                }
                open = None;
            }
            (None, None) => {
                if let Some(m) = JAVA_PATH.find(line.trim_end()) {
                    paths.push(m.as_str().trim());
                }
            }
            (Some(_), None) => {}
        }
    }
    (paths, blocks)
}

/// Extract `(path, code)` pairs from a reply that lists Java files as a path
/// line followed by a fenced block.
///
/// When the number of path lines equals the number of Java blocks they are
/// paired in order. Otherwise a line scanner walks the reply, starting a new
/// file at each path line outside a fence. Paths that would leave the project
/// root are dropped.
pub fn extract_java_files(response: &str) -> Vec<GeneratedArtifact> {
    let (paths, blocks) = java_paths_and_blocks(response);

    let files: Vec<GeneratedArtifact> = if paths.len() == blocks.len() {
        paths
            .into_iter()
            .zip(blocks)
            .map(|(path, code)| GeneratedArtifact::new(normalize_java_path(path), code))
            .collect()
    } else {
        warn!(
            paths = paths.len(),
            blocks = blocks.len(),
            "Mismatched file paths and code blocks, scanning line by line"
        );
        scan_java_files(response)
    };

    files
        .into_iter()
        .filter(|file| {
            let keep = file.stays_within_root();
            if !keep {
                warn!("Dropping {}: path escapes the project root", file.path.display());
            }
            keep
        })
        .collect()
}

/// `**src/a/B.java**`, `` `src/a/B.java`: `` and `File: src/a/B.java` all name
/// the same path.
fn path_marker(line: &str) -> Option<&str> {
    let decoration = |c: char| matches!(c, '*' | '`' | '#' | ':' | '-' | ' ' | '\t');
    let mut candidate = line.trim_matches(decoration);
    if let Some(rest) = candidate
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("file:"))
        .and_then(|_| candidate.get(5..))
    {
        candidate = rest.trim_matches(decoration);
    }
    JAVA_PATH_LINE.is_match(candidate).then_some(candidate)
}

fn scan_java_files(response: &str) -> Vec<GeneratedArtifact> {
    let mut files = Vec::new();
    let mut current: Option<&str> = None;
    let mut code: Vec<&str> = Vec::new();
    // Some(is_java) while inside a fence
    let mut fence: Option<bool> = None;

    let mut flush = |path: Option<&str>, code: &mut Vec<&str>| {
        if let Some(path) = path
            && !code.is_empty()
        {
            files.push(GeneratedArtifact::new(
                normalize_java_path(path),
                code.join("\n"),
            ));
        }
        code.clear();
    };

    for line in response.lines() {
        let trimmed = line.trim();
        if let Some(tag) = fence_tag(trimmed) {
            fence = match fence {
                None => Some(is_java_tag(tag)),
                Some(_) => None,
            };
        } else if fence.is_none() {
            if let Some(path) = path_marker(trimmed) {
                flush(current, &mut code);
                current = Some(path);
            }
        } else if fence == Some(true) && current.is_some() {
            code.push(line);
        }
    }
    flush(current, &mut code);

    debug!("Line scanner recovered {} Java files", files.len());
    files
}

// =============================================================================
// Target structure replies
// =============================================================================

/// Java layer suffixes and the sub-package each one lands in
const JAVA_LAYERS: &[(&str, &str)] = &[
    ("Controller", "controller"),
    ("Service", "service"),
    ("ServiceImpl", "service"),
    ("Repository", "repository"),
    ("DTO", "dto"),
    ("Entity", "model"),
];

/// Files recovered from a Spring Boot structure reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaStructure {
    pub base_package: String,
    pub files: Vec<GeneratedArtifact>,
}

impl JavaStructure {
    /// `src/main/java/com/acme/app` for `com.acme.app`
    pub fn package_dir(&self) -> String {
        format!("{JAVA_SOURCE_ROOT}{}", self.base_package.replace('.', "/"))
    }

    pub fn has_layer(&self, subdir: &str) -> bool {
        let prefix = format!("{}/{subdir}/", self.package_dir());
        self.files
            .iter()
            .any(|f| f.path.to_string_lossy().starts_with(&prefix))
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path.as_os_str() == path)
    }
}

/// First `package com.` declaration in the reply, else the first
/// `package org.` one.
pub fn base_package(response: &str) -> String {
    let declared: Vec<&str> = PACKAGE_DECL
        .captures_iter(response)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    declared
        .iter()
        .find(|pkg| pkg.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("com.")))
        .or_else(|| declared.first())
        .map(|pkg| pkg.to_string())
        .unwrap_or_else(|| DEFAULT_BASE_PACKAGE.to_string())
}

/// Name following `class ` on the first line that declares one and whose
/// name contains `suffix`.
fn layer_class_name(block: &str, suffix: &str) -> Option<String> {
    let suffix = suffix.to_lowercase();
    block.lines().find_map(|line| {
        let (_, after) = line.split_once("class ")?;
        let name = after
            .split(' ')
            .next()
            .unwrap_or_default()
            .split('{')
            .next()
            .unwrap_or_default()
            .trim();
        (!name.is_empty() && name.to_lowercase().contains(&suffix)).then(|| name.to_string())
    })
}

fn pom_block(response: &str) -> Option<String> {
    if !response.to_lowercase().contains("pom.xml") {
        return None;
    }

    let mut found = None;
    let mut current: Option<String> = None;
    for line in response.lines() {
        let trimmed = line.trim();
        let opens = trimmed.starts_with("```xml")
            || (trimmed.starts_with("```") && trimmed.to_lowercase().contains("pom"));
        if opens {
            current = Some(String::new());
        } else if trimmed.starts_with("```") {
            if let Some(body) = current.take()
                && body.contains("<project")
            {
                found = Some(body);
            }
        } else if let Some(body) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    found
}

/// Recover Spring Boot layer classes and `pom.xml` from a structure reply.
///
/// A ```` ```java ```` block is filed under a layer when it mentions the
/// layer's `{Suffix}.java` and declares a class whose name contains the
/// suffix. Later blocks win when two map to the same path.
pub fn extract_java_structure(response: &str) -> JavaStructure {
    let base_package = base_package(response);
    let package_dir = format!("{JAVA_SOURCE_ROOT}{}", base_package.replace('.', "/"));
    let blocks = super::code::fenced_blocks(response, "java");

    let mut files: BTreeMap<String, String> = BTreeMap::new();
    for (suffix, subdir) in JAVA_LAYERS {
        let marker = format!("{suffix}.java").to_lowercase();
        for block in &blocks {
            if !block.to_lowercase().contains(&marker) {
                continue;
            }
            if let Some(class) = layer_class_name(block, suffix) {
                files.insert(format!("{package_dir}/{subdir}/{class}.java"), block.clone());
            }
        }
    }
    if let Some(pom) = pom_block(response) {
        files.insert("pom.xml".to_string(), pom);
    }

    debug!(
        "Structure reply yielded {} files under {}",
        files.len(),
        base_package
    );
    JavaStructure {
        base_package,
        files: files
            .into_iter()
            .map(|(path, content)| GeneratedArtifact::new(path, content))
            .collect(),
    }
}

/// Python module files expected in a structure reply
pub const PYTHON_MODULES: &[&str] = &["main.py", "logic_module.py", "data_access.py", "models.py"];

/// Recover each Python module from the first ```` ```python ```` block that
/// follows a line naming it.
pub fn extract_python_structure(response: &str) -> Vec<GeneratedArtifact> {
    PYTHON_MODULES
        .iter()
        .filter_map(|module| {
            let mut named = false;
            let mut current: Option<String> = None;
            for line in response.lines() {
                let trimmed = line.trim();
                if current.is_some() {
                    if trimmed.starts_with("```") {
                        return current.map(|body| GeneratedArtifact::new(*module, body));
                    }
                    if let Some(body) = current.as_mut() {
                        body.push_str(line);
                        body.push('\n');
                    }
                } else if line.contains(module) && !line.contains("```") {
                    named = true;
                } else if named && trimmed.starts_with("```python") {
                    current = Some(String::new());
                }
            }
            None
        })
        .collect()
}

// =============================================================================
// Angular salvage
// =============================================================================

fn guess_angular_path(index: usize, content: &str) -> String {
    if content.contains("export class") && content.to_lowercase().contains(".component") {
        return match COMPONENT_CLASS.captures(content).and_then(|c| c.get(1)) {
            Some(name) => {
                let name = name.as_str().to_lowercase();
                format!("src/app/{name}/{name}.component.ts")
            }
            None => format!("extracted_file_{index}.txt"),
        };
    }
    if content.contains("<div") || content.contains("<app-") {
        format!("src/app/component_{index}.html")
    } else if content.contains('$') && content.contains('{') && content.contains(':') {
        format!("src/app/styles_{index}.scss")
    } else if content.contains("interface") || content.contains("type") {
        format!("src/app/models/model_{index}.ts")
    } else {
        format!("extracted_file_{index}.txt")
    }
}

/// Recover Angular files from fenced blocks when the reply was meant to be a
/// JSON map of paths but did not parse. File names are guessed from content.
pub fn extract_named_blocks(response: &str) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    for (index, caps) in NAMED_BLOCK.captures_iter(response).enumerate() {
        if let Some(content) = caps.get(1) {
            let content = content.as_str();
            files.insert(guess_angular_path(index, content), content.to_string());
        }
    }

    if files.is_empty() {
        warn!("No code blocks to salvage from the code generation reply");
        files.insert("error.txt".to_string(), NO_ANGULAR_CODE.to_string());
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[GeneratedArtifact]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_normalize_java_path() {
        assert_eq!(normalize_java_path("src/main/java/A.java"), "src/main/java/A.java");
        assert_eq!(normalize_java_path("com/acme/A.java"), "src/main/java/com/acme/A.java");
    }

    #[test]
    fn test_paths_and_blocks_pair_in_order() {
        let reply = "src/main/java/com/example/model/Order.java\n\
                     ```java\npublic class Order {}\n```\n\
                     com/example/service/OrderService.java\n\
                     ```java\npublic class OrderService {}\n```\n";
        let files = extract_java_files(reply);
        assert_eq!(
            paths(&files),
            vec![
                "src/main/java/com/example/model/Order.java",
                "src/main/java/com/example/service/OrderService.java",
            ]
        );
        assert_eq!(files[0].content, "public class Order {}\n");
        assert_eq!(files[1].content, "public class OrderService {}\n");
    }

    #[test]
    fn test_mismatch_falls_back_to_scanner() {
        let reply = "src/main/java/A.java\n\
                     src/main/java/B.java\n\
                     ```java\nclass B {\n}\n```\n";
        let files = extract_java_files(reply);
        assert_eq!(paths(&files), vec!["src/main/java/B.java"]);
        assert_eq!(files[0].content, "class B {\n}");
    }

    #[test]
    fn test_other_language_fences_do_not_shift_pairing() {
        let reply = "src/main/java/com/x/A.java\n```java\nclass A {}\n```\n\
                     pom.xml\n```xml\n<project/>\n```\n\
                     src/main/java/com/x/B.java\n```java\nclass B {}\n```\n";
        let files = extract_java_files(reply);
        assert_eq!(
            paths(&files),
            vec!["src/main/java/com/x/A.java", "src/main/java/com/x/B.java"]
        );
        assert_eq!(files[0].content, "class A {}\n");
        assert_eq!(files[1].content, "class B {}\n");
    }

    #[test]
    fn test_scanner_steps_over_other_language_fences() {
        // Two paths, one Java block: the last well-formed file survives
        let reply = "src/main/java/com/x/A.java\n```xml\n<project/>\n```\n\
                     src/main/java/com/x/B.java\n```java\nclass B {}\n```\n";
        let files = extract_java_files(reply);
        assert_eq!(paths(&files), vec!["src/main/java/com/x/B.java"]);
        assert_eq!(files[0].content, "class B {}");
    }

    #[test]
    fn test_paths_escaping_the_root_are_dropped() {
        let reply = "src/../../../../tmp/escape.java\n```java\nclass Evil {}\n```\n";
        assert!(extract_java_files(reply).is_empty());

        let reply = "src/main/java/A.java\n```java\nclass A {}\n```\n\
                     com/../../../B.java\n```java\nclass B {}\n```\n";
        assert_eq!(paths(&extract_java_files(reply)), vec!["src/main/java/A.java"]);
    }

    #[test]
    fn test_scanner_accepts_decorated_markers() {
        let reply = "Here are the files.\n\n\
                     **src/main/java/com/x/A.java**\n```java\nclass A {}\n```\n\
                     File: `com/x/B.java`\n```java\nclass B {}\n```\n\
                     ```xml\n<project/>\n```\n";
        let files = scan_java_files(reply);
        assert_eq!(
            paths(&files),
            vec!["src/main/java/com/x/A.java", "src/main/java/com/x/B.java"]
        );
        assert_eq!(files[1].content, "class B {}");
    }

    #[test]
    fn test_no_paths_no_blocks() {
        assert!(extract_java_files("I could not convert this program.").is_empty());
    }

    #[test]
    fn test_base_package() {
        assert_eq!(
            base_package("```java\npackage com.acme.orders.controller;\n"),
            "com.acme.orders.controller"
        );
        assert_eq!(
            base_package("package org.legacy;\n...\npackage com.acme;"),
            "com.acme"
        );
        assert_eq!(base_package("Package Org.Example;\nmore"), "Org.Example");
        assert_eq!(base_package("no package here"), DEFAULT_BASE_PACKAGE);
    }

    #[test]
    fn test_extract_java_structure() {
        let reply = "Base package: package com.acme.app;\n\
                     // OrderController.java\n\
                     ```java\n// OrderController.java\npublic class OrderController {\n}\n```\n\
                     ```java\n// OrderServiceImpl.java\npublic class OrderServiceImpl implements OrderService {\n}\n```\n\
                     The pom.xml:\n```xml\n<project>\n</project>\n```\n";
        let structure = extract_java_structure(reply);
        assert_eq!(structure.base_package, "com.acme.app");
        assert_eq!(structure.package_dir(), "src/main/java/com/acme/app");
        assert!(structure.has_file("src/main/java/com/acme/app/controller/OrderController.java"));
        assert!(structure.has_file("src/main/java/com/acme/app/service/OrderServiceImpl.java"));
        assert!(structure.has_file("pom.xml"));
        assert!(structure.has_layer("controller"));
        assert!(!structure.has_layer("repository"));
    }

    #[test]
    fn test_block_without_matching_class_is_skipped() {
        let reply = "```java\n// mentions Controller.java\npublic class Helper {}\n```\n";
        assert!(extract_java_structure(reply).files.is_empty());
    }

    #[test]
    fn test_extract_python_structure() {
        let reply = "### main.py\n```python\nfrom logic_module import run\nrun()\n```\n\
                     ### models.py\n```python\nclass Order:\n    pass\n```\n";
        let files = extract_python_structure(reply);
        assert_eq!(paths(&files), vec!["main.py", "models.py"]);
        assert_eq!(files[0].content, "from logic_module import run\nrun()\n");
    }

    #[test]
    fn test_named_blocks_guesses_paths() {
        let reply = "```typescript\nexport class HeaderComponent {}\n// header.component.html\n```\n\
                     ```html\n<div class=\"x\"></div>\n```\n\
                     ```scss\n$primary: #fff;\n.a { color: $primary; }\n```\n\
                     ```typescript\nexport interface User { id: number }\n```\n\
                     ```json\n[1, 2]\n```\n";
        let files = extract_named_blocks(reply);
        let keys: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "extracted_file_4.txt",
                "src/app/component_1.html",
                "src/app/header/header.component.ts",
                "src/app/models/model_3.ts",
                "src/app/styles_2.scss",
            ]
        );
    }

    #[test]
    fn test_named_blocks_without_blocks() {
        let files = extract_named_blocks("nothing useful");
        assert_eq!(files.get("error.txt").map(String::as_str), Some(NO_ANGULAR_CODE));
    }
}
