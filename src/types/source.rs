//! Input sources and the flavour enums that steer prompt selection.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::Result;

// =============================================================================
// Source File
// =============================================================================

/// An uploaded program: file name plus raw text. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    name: String,
    content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk. Bytes that are not UTF-8 are replaced rather
    /// than rejected, since IBM i exports are not always clean.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// File name without its final extension (`ORDENTRY.rpgle` -> `ORDENTRY`)
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(0) | None => &self.name,
            Some(idx) => &self.name[..idx],
        }
    }
}

// =============================================================================
// RPG Type
// =============================================================================

/// Dialect of the incoming RPG program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RpgType {
    /// Synon/2E generated RPG with action diagrams
    Synon,
    /// Free-format or fixed-format hand written RPGLE
    #[default]
    Modern,
}

impl std::fmt::Display for RpgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpgType::Synon => write!(f, "synon"),
            RpgType::Modern => write!(f, "modern"),
        }
    }
}

impl std::str::FromStr for RpgType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "synon" => Ok(RpgType::Synon),
            "modern" => Ok(RpgType::Modern),
            _ => Err(format!("Unknown RPG type: {}. Valid values: synon, modern", s)),
        }
    }
}

// =============================================================================
// Target Language
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Java,
    Python,
}

impl TargetLanguage {
    /// Info-string used on fenced code blocks
    pub fn fence(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "java",
            TargetLanguage::Python => "python",
        }
    }

    /// Name of the archive produced by the single-file flow
    pub fn archive_name(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "java_spring_boot_project.zip",
            TargetLanguage::Python => "python_project.zip",
        }
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Java => write!(f, "java"),
            TargetLanguage::Python => write!(f, "python"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(TargetLanguage::Java),
            "python" => Ok(TargetLanguage::Python),
            _ => Err(format!(
                "Unknown target language: {}. Valid values: java, python",
                s
            )),
        }
    }
}

// =============================================================================
// Style Type
// =============================================================================

/// Stylesheet dialect for generated Angular components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    #[default]
    Scss,
    Css,
}

impl StyleType {
    pub fn extension(&self) -> &'static str {
        match self {
            StyleType::Scss => "scss",
            StyleType::Css => "css",
        }
    }
}

impl std::fmt::Display for StyleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for StyleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scss" => Ok(StyleType::Scss),
            "css" => Ok(StyleType::Css),
            _ => Err(format!("Unknown style type: {}. Valid values: scss, css", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_source_stem() {
        assert_eq!(SourceFile::new("ORDENTRY.rpgle", "").stem(), "ORDENTRY");
        assert_eq!(SourceFile::new("a.b.sqlrpgle", "").stem(), "a.b");
        assert_eq!(SourceFile::new("NOEXT", "").stem(), "NOEXT");
        assert_eq!(SourceFile::new(".hidden", "").stem(), ".hidden");
    }

    #[test]
    fn test_source_load_lossy() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("PGM.rpgle");
        std::fs::write(&path, b"dcl-s x \xff;").unwrap();

        let src = SourceFile::load(&path).unwrap();
        assert_eq!(src.name(), "PGM.rpgle");
        assert!(src.content().starts_with("dcl-s x "));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(RpgType::from_str("SYNON").unwrap(), RpgType::Synon);
        assert!(RpgType::from_str("cobol").is_err());
        assert_eq!(TargetLanguage::from_str("python").unwrap(), TargetLanguage::Python);
        assert_eq!(StyleType::from_str("css").unwrap(), StyleType::Css);
        assert_eq!(StyleType::Scss.to_string(), "scss");
    }
}
