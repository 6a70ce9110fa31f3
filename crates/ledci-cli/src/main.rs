//! ledci - CI helpers for the LED library
//!
//! ## Commands
//!
//! - `compile`: build example sketches for one or more boards with PlatformIO
//! - `docs`: install Doxygen, stamp the version into the Doxyfile, generate docs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledci_compile::{
    discover_examples, parse_names, BatchContext, BatchOutcome, Board, CompileConfig,
    CompilePipeline, ErrorSignal, FirstBuildGate, PioCompiler,
};
use ledci_core::LockedPrinter;
use ledci_docs::{DocsConfig, DocsPublisher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "ledci")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CI helpers: board compiles and docs publishing", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile examples for each board, one concurrent batch per board
    Compile {
        /// Boards to build (comma-separated, e.g. uno,esp32dev)
        #[arg(short, long)]
        boards: String,

        /// Examples to build (comma-separated; default: everything under examples/)
        #[arg(short, long)]
        examples: Option<String>,

        /// Root of per-board build directories, relative to the project root (default: .build)
        #[arg(long)]
        build_dir: Option<PathBuf>,

        /// Project root containing examples/, src/ and ci/
        #[arg(long, default_value = ".")]
        project_root: PathBuf,

        /// Serialize first builds even outside GitHub Actions
        #[arg(long)]
        constrained: bool,

        /// Write a JSON summary of batch outcomes to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Build Doxygen documentation
    Docs {
        /// Release tag to stamp into the docs (overrides git tags)
        #[arg(long, env = "RELEASE_TAG")]
        release_tag: Option<String>,

        /// Directory containing the Doxyfile
        #[arg(long, default_value = "docs")]
        docs_dir: PathBuf,

        /// Where Doxygen is downloaded and unpacked (default: system temp dir)
        #[arg(long)]
        tool_dir: Option<PathBuf>,

        /// Doxygen release to install
        #[arg(long, default_value = ledci_docs::config::DOXYGEN_VERSION)]
        doxygen_version: String,

        /// doxygen-awesome-css release to install
        #[arg(long, default_value = ledci_docs::config::DOXYGEN_AWESOME_VERSION)]
        theme_version: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    ledci_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Compile {
            boards,
            examples,
            build_dir,
            project_root,
            constrained,
            report,
        } => {
            cmd_compile(
                &boards,
                examples.as_deref(),
                build_dir,
                project_root,
                constrained,
                report,
            )
            .await
        }
        Commands::Docs {
            release_tag,
            docs_dir,
            tool_dir,
            doxygen_version,
            theme_version,
        } => cmd_docs(release_tag, docs_dir, tool_dir, doxygen_version, theme_version).await,
    }
}

/// Compile every example for every board
async fn cmd_compile(
    boards: &str,
    examples: Option<&str>,
    build_dir: Option<PathBuf>,
    project_root: PathBuf,
    constrained: bool,
    report: Option<PathBuf>,
) -> Result<()> {
    let boards = Board::parse_list(boards);
    if boards.is_empty() {
        anyhow::bail!("No boards given");
    }

    let examples = match examples {
        Some(list) => parse_names(list),
        None => discover_examples(&project_root)?,
    };
    if examples.is_empty() {
        anyhow::bail!("No examples to build");
    }

    let config = CompileConfig::from_env()
        .with_project_root(project_root)
        .with_build_root(build_dir);
    let config = if constrained {
        config.with_constrained(true)
    } else {
        config
    };

    info!(
        boards = ?boards.iter().map(Board::name).collect::<Vec<_>>(),
        examples = examples.len(),
        constrained = config.constrained,
        "Compiling"
    );

    let printer = LockedPrinter::stdout();
    let gate = Arc::new(FirstBuildGate::new(config.constrained));
    let compiler = Arc::new(PioCompiler::new(config, printer.clone()));
    let ctx = BatchContext::new(compiler, gate, ErrorSignal::new(), printer.clone());

    let result = CompilePipeline::run(ctx, boards, examples).await;

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Wrote compile report");
    }

    for failure in result.failures() {
        if let BatchOutcome::Failed { message } = &failure.outcome {
            printer.print(message);
        }
    }

    if !result.success() {
        anyhow::bail!("Compilation failed for {} board(s)", result.failures().len());
    }

    printer.print(format!(
        "All {} board(s) compiled in {} ms",
        result.boards.len(),
        result.duration_ms
    ));
    Ok(())
}

/// Resolve version, install Doxygen and theme, patch Doxyfile, generate
async fn cmd_docs(
    release_tag: Option<String>,
    docs_dir: PathBuf,
    tool_dir: Option<PathBuf>,
    doxygen_version: String,
    theme_version: String,
) -> Result<()> {
    // Doxygen runs from the docs dir, so the tool dir must not be relative.
    let tool_dir = match tool_dir {
        Some(dir) if dir.is_relative() => std::env::current_dir()?.join(dir),
        Some(dir) => dir,
        None => std::env::temp_dir(),
    };

    let config = DocsConfig {
        html_dir: docs_dir.join("html"),
        docs_dir,
        tool_dir,
        doxygen_version,
        theme_version,
        ..DocsConfig::default()
    }
    .with_release_tag(release_tag);

    let publisher = DocsPublisher::new(config, LockedPrinter::stdout());
    let report = publisher
        .run()
        .await
        .context("Documentation build failed")?;

    info!(
        version = %report.version.project_number,
        html_dir = %report.html_dir.display(),
        "Docs published"
    );
    Ok(())
}
