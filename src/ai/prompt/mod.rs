//! Prompt construction
//!
//! Every stage talks to the model through a prompt assembled here. The
//! builder keeps sections in insertion order and renders them as plain
//! Markdown-flavoured text, which is what the providers see verbatim.
//!
//! Template modules:
//! - [`rpg`]: single-program modernization (pseudocode, flow, structure, logic)
//! - [`analysis`]: the nine-step batch analysis
//! - [`angular`]: component generation from a JSON description
//! - [`figma`]: design tree analysis and Angular code generation

pub mod analysis;
pub mod angular;
pub mod figma;
pub mod rpg;

pub use crate::types::truncate_chars;

/// System prompt for RPGLE analysis and conversion calls
pub const RPG_SYSTEM_PROMPT: &str = "You are an expert RPGLE and Java developer assistant.";

/// System prompt for Angular component generation
pub const ANGULAR_SYSTEM_PROMPT: &str =
    "You are an expert Angular code generator. Output only raw code as requested.";

/// System prompt for the Figma conversion flow
pub const FIGMA_SYSTEM_PROMPT: &str =
    "You are an expert UI/UX engineer specializing in converting design systems to Angular code.";

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Opening sentence that sets the model's role
    Role(String),
    /// Numbered list under an optional header
    Numbered {
        header: Option<String>,
        items: Vec<String>,
    },
    /// Bulleted list under an optional header
    Bulleted {
        header: Option<String>,
        items: Vec<String>,
    },
    /// Ordered `key: value` lines
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Fenced code block; an empty language renders a bare fence
    Code { language: String, content: String },
    /// Custom section
    Custom(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Role(role.into()));
        self
    }

    /// Numbered list without a header
    pub fn numbered<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_list(None, items, true)
    }

    /// Numbered list under `header`
    pub fn numbered_section<I, S>(self, header: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_list(Some(header), items, true)
    }

    pub fn bullets<I, S>(self, header: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_list(Some(header), items, false)
    }

    /// Add a context line. Consecutive calls share one block and keep order.
    pub fn context_item(mut self, key: &str, value: impl Into<String>) -> Self {
        let entry = (key.to_string(), value.into());
        if let Some(PromptSection::Context(items)) = self.sections.last_mut() {
            items.push(entry);
        } else {
            self.sections.push(PromptSection::Context(vec![entry]));
        }
        self
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.into(),
        });
        self
    }

    /// Text under a header line. The header is rendered as given.
    pub fn section(mut self, header: &str, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.into(),
        });
        self
    }

    pub fn code(mut self, language: &str, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.into(),
        });
        self
    }

    pub fn custom(mut self, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Custom(content.into()));
        self
    }

    fn push_list<I, S>(mut self, header: Option<&str>, items: I, numbered: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header = header.map(str::to_string);
        let items = items.into_iter().map(Into::into).collect();
        self.sections.push(if numbered {
            PromptSection::Numbered { header, items }
        } else {
            PromptSection::Bulleted { header, items }
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role(role) => {
                    prompt.push_str(&role);
                    prompt.push_str("\n\n");
                }
                PromptSection::Numbered { header, items } => {
                    if let Some(h) = header {
                        prompt.push_str(&h);
                        prompt.push('\n');
                    }
                    for (i, item) in items.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Bulleted { header, items } => {
                    if let Some(h) = header {
                        prompt.push_str(&h);
                        prompt.push('\n');
                    }
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Context(items) => {
                    for (key, value) in items {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&h);
                        prompt.push('\n');
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    if !content.ends_with('\n') {
                        prompt.push('\n');
                    }
                    prompt.push_str("```\n\n");
                }
                PromptSection::Custom(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("Act as an RPG analyst.")
            .numbered_section("Instructions:", ["Read the code", "Summarize it"])
            .build();

        assert!(prompt.starts_with("Act as an RPG analyst.\n\n"));
        assert!(prompt.contains("Instructions:\n1. Read the code\n2. Summarize it"));
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Program Name", "ORDENTRY")
            .context_item("Filename", "ORDENTRY.rpgle")
            .build();

        assert_eq!(prompt, "Program Name: ORDENTRY\nFilename: ORDENTRY.rpgle");
    }

    #[test]
    fn test_context_blocks_split_by_other_sections() {
        let prompt = PromptBuilder::new()
            .context_item("A", "1")
            .text("between")
            .context_item("B", "2")
            .build();

        assert_eq!(prompt, "A: 1\n\nbetween\n\nB: 2");
    }

    #[test]
    fn test_code_block_fencing() {
        let prompt = PromptBuilder::new()
            .code("rpgle", "dcl-s x int(10);")
            .code("", "already terminated\n")
            .build();

        assert!(prompt.contains("```rpgle\ndcl-s x int(10);\n```"));
        assert!(prompt.contains("```\nalready terminated\n```"));
    }

    #[test]
    fn test_bullets_and_sections() {
        let prompt = PromptBuilder::new()
            .bullets("Return the results in JSON format with these keys:", ["a", "b"])
            .section("## Task", "Convert it.")
            .build();

        assert!(prompt.contains("with these keys:\n- a\n- b\n"));
        assert!(prompt.ends_with("## Task\nConvert it."));
    }
}
