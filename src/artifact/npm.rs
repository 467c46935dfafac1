//! Best-effort `npm install` for scaffolded Angular projects.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpmOutcome {
    Installed,
    Skipped,
    /// npm ran and exited unsuccessfully
    Failed(String),
    /// npm is not on PATH
    NotFound,
}

impl NpmOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

/// Run `npm install` in `project_dir`. Failures are reported, never raised.
pub async fn npm_install(project_dir: &Path, skip: bool) -> NpmOutcome {
    if skip {
        return NpmOutcome::Skipped;
    }

    info!("Installing Angular dependencies in {}", project_dir.display());
    let result = Command::new("npm")
        .arg("install")
        .current_dir(project_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => NpmOutcome::Installed,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| output.status.to_string());
            warn!("npm install failed: {}", reason);
            NpmOutcome::Failed(reason)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("npm not found; run 'npm install' manually in {}", project_dir.display());
            NpmOutcome::NotFound
        }
        Err(e) => {
            warn!("npm install could not start: {}", e);
            NpmOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skip_does_not_spawn() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(npm_install(dir.path(), true).await, NpmOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_missing_project_dir_is_not_an_install() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = npm_install(&dir.path().join("absent"), false).await;
        assert!(!outcome.is_installed());
    }
}
