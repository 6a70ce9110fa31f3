//! Docs publishing pipeline.

use crate::config::DocsConfig;
use crate::doxyfile::update_doxyfile;
use crate::toolchain::{install_doxygen, install_theme};
use crate::version::{git_info, VersionInfo};
use crate::Result;
use ledci_core::{run_command, CommandSpec, LockedPrinter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a publish run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub version: VersionInfo,
    pub doxygen_bin: PathBuf,
    pub html_dir: PathBuf,
}

/// Run `doxygen_bin <doxyfile_name>` from `docs_dir` and print its output.
///
/// A non-zero exit is an error.
pub async fn generate_docs(
    doxygen_bin: &Path,
    docs_dir: &Path,
    doxyfile_name: &str,
    printer: &LockedPrinter,
) -> Result<String> {
    info!(bin = %doxygen_bin.display(), "Generating documentation");
    let spec = CommandSpec::new(doxygen_bin.to_string_lossy(), [doxyfile_name])
        .current_dir(docs_dir);
    printer.print(format!("Running: {}", spec.display()));

    let output = run_command(&spec).await?;
    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        printer.print(stdout);
    }
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        printer.print(stderr);
    }
    Ok(output.stdout)
}

/// Version → install → theme → patch → generate.
pub struct DocsPublisher {
    config: DocsConfig,
    printer: LockedPrinter,
}

impl DocsPublisher {
    pub fn new(config: DocsConfig, printer: LockedPrinter) -> Self {
        Self { config, printer }
    }

    /// Run the whole pipeline. The first failing step aborts it.
    pub async fn run(&self) -> Result<PublishReport> {
        let config = &self.config;

        let version = git_info(&config.repo_dir, config.release_tag.as_deref()).await?;
        self.printer
            .print(format!("Project number: {}", version.project_number));
        self.printer
            .print(format!("Commit message: {}", version.commit_message));

        let doxygen_bin = install_doxygen(config).await?;
        install_theme(config).await?;
        update_doxyfile(&config.doxyfile_path(), &version.project_number).await?;
        generate_docs(&doxygen_bin, &config.docs_dir, &config.doxyfile_name, &self.printer).await?;

        let html_dir = if config.html_dir.is_absolute() {
            config.html_dir.clone()
        } else {
            std::env::current_dir()?.join(&config.html_dir)
        };
        self.printer
            .print(format!("\nDocs generated in: {}", html_dir.display()));
        self.printer
            .print(format!("Commit message: {}", version.commit_message));

        Ok(PublishReport {
            version,
            doxygen_bin,
            html_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocsError;
    use ledci_core::CiError;

    #[tokio::test]
    async fn test_generate_runs_in_docs_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Doxyfile"), "PROJECT_NUMBER = 1\n").unwrap();
        let printer = LockedPrinter::capture();

        // `cat Doxyfile` only succeeds when run from the docs dir.
        let stdout = generate_docs(Path::new("cat"), dir.path(), "Doxyfile", &printer)
            .await
            .unwrap();

        assert_eq!(stdout, "PROJECT_NUMBER = 1\n");
        let log = printer.captured().unwrap();
        assert!(log.contains("Running: cat Doxyfile"));
        assert!(log.contains("PROJECT_NUMBER = 1"));
    }

    #[tokio::test]
    async fn test_generate_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let printer = LockedPrinter::capture();

        let err = generate_docs(Path::new("cat"), dir.path(), "Doxyfile", &printer)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DocsError::Command(CiError::CommandFailed { .. })
        ));
    }
}
