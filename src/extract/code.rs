//! Fenced code block helpers.

use regex::Regex;
use std::sync::LazyLock;

static ANY_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:[a-z]*)?\s*\n(.*?)\n?\s*```\s*$").expect("valid fence regex")
});
static TS_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:typescript|ts)?\s*\n(.*?)\n?\s*```\s*$")
        .expect("valid typescript fence regex")
});
static HTML_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:html)?\s*\n(.*?)\n?\s*```\s*$").expect("valid html fence regex")
});

/// Minimum trimmed length for an app component section to be used
const MIN_SECTION_LEN: usize = 10;

/// Strip a single wrapping fence from a reply that should be one raw file.
///
/// A fence tagged with `language` is tried first, then any lowercase tag.
/// Text without a wrapping fence is only trimmed.
pub fn clean_code(raw: &str, language: &str) -> String {
    let tagged = Regex::new(&format!(
        r"(?is)^\s*```(?:{})?\s*\n(.*?)\n?\s*```\s*$",
        regex::escape(language)
    ))
    .ok();

    let captured = tagged
        .as_ref()
        .and_then(|re| re.captures(raw))
        .or_else(|| ANY_FENCE.captures(raw))
        .and_then(|caps| caps.get(1));

    match captured {
        Some(body) => body.as_str().trim().to_string(),
        None => raw.trim().to_string(),
    }
}

fn strip_fence(re: &Regex, text: &str) -> String {
    match re.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Bodies of every fenced block whose opening line starts with
/// ```` ```{language} ````, each line kept with its trailing newline.
///
/// A block left open at the end of the text is dropped.
pub fn fenced_blocks(text: &str, language: &str) -> Vec<String> {
    let opener = format!("```{language}");
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if current.is_none() {
            if trimmed.starts_with(&opener) {
                current = Some(String::new());
            }
        } else if trimmed.starts_with("```") {
            blocks.extend(current.take());
        } else if let Some(body) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }

    blocks
}

/// Body following a `--- {name} ---` marker, up to the next `---` or the end.
pub fn split_section(text: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r"(?s)---\s*{}\s*---(.*?)(?:---|$)",
        regex::escape(name)
    ))
    .ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Split a combined app component reply into its TypeScript and HTML parts.
///
/// A part is returned only when it is longer than a few characters and has
/// no fence left in it after cleanup.
pub fn split_app_component(text: &str) -> (Option<String>, Option<String>) {
    let usable = |code: String| {
        (code.trim().len() > MIN_SECTION_LEN && !code.contains("```")).then_some(code)
    };

    let ts = split_section(text, "app.component.ts")
        .map(|s| strip_fence(&TS_FENCE, &s))
        .and_then(usable);
    let html = split_section(text, "app.component.html")
        .map(|s| strip_fence(&HTML_FENCE, &s))
        .and_then(usable);
    (ts, html)
}
