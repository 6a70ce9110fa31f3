//! Compiling a single example for a single board.

use crate::board::Board;
use crate::config::{CompileConfig, LIBRARY_DIRS};
use async_trait::async_trait;
use ledci_core::{run_command, CommandSpec, LockedPrinter};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Result of one compile: success flag plus the tool's merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub success: bool,
    pub output: String,
}

impl BuildOutcome {
    pub fn passed(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Something that can build one example for one board.
///
/// `Err` is reserved for failing to run the build at all (missing tool,
/// unwritable build dir); a build that ran and failed is `Ok` with
/// `success == false`.
#[async_trait]
pub trait BoardCompiler: Send + Sync {
    async fn compile(&self, board: &Board, example: &str) -> anyhow::Result<BuildOutcome>;
}

/// Rewrite `lib/src` and `lib\src` to `src` so IDEs can open the paths.
///
/// Applied until no alias remains, which also makes it idempotent.
pub fn normalize_output(output: &str) -> String {
    let mut text = output.to_string();
    while text.contains("lib/src") || text.contains("lib\\src") {
        text = text.replace("lib/src", "src").replace("lib\\src", "src");
    }
    text
}

/// Compiler backed by `pio ci`.
#[derive(Debug, Clone)]
pub struct PioCompiler {
    config: CompileConfig,
    printer: LockedPrinter,
}

impl PioCompiler {
    pub fn new(config: CompileConfig, printer: LockedPrinter) -> Self {
        Self { config, printer }
    }

    /// Persistent build directory for `board`, resolved against the project root.
    pub fn build_dir(&self, board: &Board) -> PathBuf {
        self.config.resolved_build_root().join(board.name())
    }

    /// The `pio ci` invocation for `example` on `board`.
    pub fn command(&self, board: &Board, example: &str) -> CommandSpec {
        let build_dir = self.build_dir(board);
        let mut args = vec!["ci".to_string(), "--board".to_string(), board.name().to_string()];
        args.extend(LIBRARY_DIRS.iter().map(|dir| format!("--lib={dir}")));
        args.push("--keep-build-dir".to_string());
        args.push(format!("--build-dir={}", to_posix(&build_dir)));
        args.push(format!("examples/{example}/*ino"));

        CommandSpec::new(self.config.tool.clone(), args)
            .current_dir(self.config.project_root.clone())
            .merged()
            .unchecked()
    }
}

fn to_posix(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[async_trait]
impl BoardCompiler for PioCompiler {
    async fn compile(&self, board: &Board, example: &str) -> anyhow::Result<BuildOutcome> {
        let build_dir = self.build_dir(board);
        tokio::fs::create_dir_all(&build_dir).await?;

        // Only the copied sketch is regenerated; the rest of the dir is build cache.
        let src_dir = build_dir.join("src");
        if tokio::fs::try_exists(&src_dir).await? {
            debug!(path = %src_dir.display(), "Removing previous sketch sources");
            tokio::fs::remove_dir_all(&src_dir).await?;
        }

        self.printer
            .print(format!("*** Building example {example} for board {board} ***"));

        let spec = self.command(board, example);
        self.printer.print(format!(
            "\n\n******************************\n\
             * Running command:\n\
             *     {}\n\
             ******************************\n",
            spec.display()
        ));

        let output = run_command(&spec).await?;
        let stdout = normalize_output(&output.stdout);
        self.printer.print(&stdout);

        if !output.success {
            self.printer
                .print(format!("*** Error compiling example {example} for board {board} ***"));
            return Ok(BuildOutcome::failed(stdout));
        }

        self.printer
            .print(format!("*** Finished building example {example} for board {board} ***"));
        Ok(BuildOutcome::passed(stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_rewrites_both_separators() {
        let raw = "In file included from lib/src/FastLED.h:3,\n  lib\\src\\fl\\math.h:9: error";
        assert_eq!(
            normalize_output(raw),
            "In file included from src/FastLED.h:3,\n  src\\fl\\math.h:9: error"
        );
    }

    #[test]
    fn test_normalize_without_alias_is_noop() {
        let raw = "Compiling .pio/build/uno/src/main.cpp.o\nRAM: 12%";
        assert_eq!(normalize_output(raw), raw);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["lib/src/a.h", "lib/lib/src/x", "plain", "lib\\lib/src"] {
            let once = normalize_output(raw);
            assert_eq!(normalize_output(&once), once);
            assert!(!once.contains("lib/src") && !once.contains("lib\\src"));
        }
    }

    #[test]
    fn test_command_shape() {
        let config = CompileConfig::default().with_build_root(Some(PathBuf::from("out")));
        let compiler = PioCompiler::new(config, LockedPrinter::capture());
        let spec = compiler.command(&Board::new("uno"), "Blink");

        assert_eq!(spec.program, "pio");
        assert_eq!(
            spec.args,
            vec![
                "ci",
                "--board",
                "uno",
                "--lib=ci",
                "--lib=src",
                "--keep-build-dir",
                "--build-dir=./out/uno",
                "examples/Blink/*ino",
            ]
        );
        assert!(spec.merge_stderr);
        assert!(!spec.check);
    }

    #[tokio::test]
    async fn test_compile_clears_only_sketch_sources() {
        let root = tempdir().unwrap();
        let config = CompileConfig::default()
            .with_project_root(root.path())
            .with_build_root(Some(root.path().join(".build")))
            .with_tool("true");
        let printer = LockedPrinter::capture();
        let compiler = PioCompiler::new(config, printer.clone());

        let board = Board::new("uno");
        let build_dir = compiler.build_dir(&board);
        std::fs::create_dir_all(build_dir.join("src")).unwrap();
        std::fs::create_dir_all(build_dir.join(".pio")).unwrap();
        std::fs::write(build_dir.join("src/Blink.ino"), "stale").unwrap();
        std::fs::write(build_dir.join(".pio/cache.o"), "cache").unwrap();

        let outcome = compiler.compile(&board, "Blink").await.unwrap();

        assert!(outcome.success);
        assert!(!build_dir.join("src").exists());
        assert!(build_dir.join(".pio/cache.o").exists());
        let log = printer.captured().unwrap();
        assert!(log.contains("*** Building example Blink for board uno ***"));
        assert!(log.contains("*** Finished building example Blink for board uno ***"));
    }

    #[tokio::test]
    async fn test_compile_failure_carries_output() {
        let root = tempdir().unwrap();
        let config = CompileConfig::default()
            .with_project_root(root.path())
            .with_build_root(Some(root.path().join(".build")))
            .with_tool("false");
        let printer = LockedPrinter::capture();
        let compiler = PioCompiler::new(config, printer.clone());

        let outcome = compiler.compile(&Board::new("esp32dev"), "Fade").await.unwrap();

        assert!(!outcome.success);
        assert!(root.path().join(".build/esp32dev").is_dir());
        let log = printer.captured().unwrap();
        assert!(log.contains("*** Error compiling example Fade for board esp32dev ***"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_relative_build_root_is_under_project_root() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        let tool = root.path().join("fake-pio");
        // Reports whether the sketch dir still exists where the tool looks for it.
        std::fs::write(
            &tool,
            "#!/bin/sh\n\
             for arg in \"$@\"; do\n\
               case \"$arg\" in --build-dir=*) dir=\"${arg#--build-dir=}\";; esac\n\
             done\n\
             if [ -d \"$dir/src\" ]; then echo \"stale sources in $dir\"; exit 1; fi\n\
             echo \"clean build in $dir\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let stale = root.path().join(".build/uno/src");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("Blink.ino"), "stale").unwrap();

        let config = CompileConfig::default()
            .with_project_root(root.path())
            .with_tool(tool.to_string_lossy());
        let compiler = PioCompiler::new(config, LockedPrinter::capture());
        let board = Board::new("uno");

        assert_eq!(compiler.build_dir(&board), root.path().join(".build/uno"));
        let outcome = compiler.compile(&board, "Blink").await.unwrap();

        assert!(outcome.success, "tool saw stale sources: {}", outcome.output);
        assert!(outcome.output.contains("clean build in"));
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_missing_tool_is_error() {
        let root = tempdir().unwrap();
        let config = CompileConfig::default()
            .with_project_root(root.path())
            .with_build_root(Some(root.path().join(".build")))
            .with_tool("/nonexistent-pio-binary");
        let compiler = PioCompiler::new(config, LockedPrinter::capture());

        assert!(compiler.compile(&Board::new("uno"), "Blink").await.is_err());
    }
}
