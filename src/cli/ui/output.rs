use std::path::Path;

use console::style;

use crate::types::OutputManifest;

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold().underlined());
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    /// Generated files grouped by category, paths shown relative to `root`
    pub fn manifest(&self, manifest: &OutputManifest, root: &Path) {
        if self.quiet {
            return;
        }
        if manifest.is_empty() {
            self.warning("No files were generated");
            return;
        }
        for (category, paths) in manifest.iter() {
            self.section(&format!("{} ({})", category.label(), paths.len()));
            for path in paths {
                let shown = path.strip_prefix(root).unwrap_or(path);
                println!("  {}", shown.display());
            }
        }
        println!();
        self.success(&format!(
            "{} file(s) written to {}",
            manifest.total(),
            root.display()
        ));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
