//! Sequential compilation of every example for one board.

use crate::board::Board;
use crate::compiler::{BoardCompiler, BuildOutcome};
use crate::gate::FirstBuildGate;
use crate::signal::ErrorSignal;
use ledci_core::LockedPrinter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// How a batch ended.
///
/// `Skipped` means another batch failed first; callers that only see
/// [`BatchOutcome::into_pair`] cannot tell it apart from success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Succeeded,
    Failed { message: String },
    Skipped,
}

impl BatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }

    /// The `(success, message)` pair: skipped batches report `(true, "")`.
    pub fn into_pair(self) -> (bool, String) {
        match self {
            BatchOutcome::Succeeded | BatchOutcome::Skipped => (true, String::new()),
            BatchOutcome::Failed { message } => (false, message),
        }
    }
}

/// Collaborators shared by every concurrently running batch.
#[derive(Clone)]
pub struct BatchContext {
    pub compiler: Arc<dyn BoardCompiler>,
    pub gate: Arc<FirstBuildGate>,
    pub errors: ErrorSignal,
    pub printer: LockedPrinter,
}

impl BatchContext {
    pub fn new(
        compiler: Arc<dyn BoardCompiler>,
        gate: Arc<FirstBuildGate>,
        errors: ErrorSignal,
        printer: LockedPrinter,
    ) -> Self {
        Self {
            compiler,
            gate,
            errors,
            printer,
        }
    }
}

/// Compile `examples` for `board` in order, stopping at the first failure.
///
/// The error signal is checked before every example (and again after waiting
/// for the gate); once raised the batch returns `Skipped`. A failure raises
/// the signal and returns `Failed` naming the example and board.
pub async fn compile_examples(
    ctx: &BatchContext,
    board: &Board,
    examples: &[String],
) -> BatchOutcome {
    for (index, example) in examples.iter().enumerate() {
        if ctx.errors.is_raised() {
            warn!(board = %board, example = %example, "Skipping batch after failure elsewhere");
            return BatchOutcome::Skipped;
        }

        let is_first = index == 0;
        ctx.printer
            .print(format!("\n*** Building {example} for board {board} ***"));
        if is_first {
            ctx.printer
                .print(format!("*** Building for first example {example} board {board} ***"));
        }

        let result = if is_first && ctx.gate.enabled() {
            let _guard = ctx.gate.acquire().await;
            if ctx.errors.is_raised() {
                warn!(
                    board = %board,
                    example = %example,
                    "Skipping first build after failure elsewhere"
                );
                return BatchOutcome::Skipped;
            }
            ctx.compiler.compile(board, example).await
        } else {
            ctx.compiler.compile(board, example).await
        };

        let outcome = result.unwrap_or_else(|e| BuildOutcome::failed(format!("{e:#}")));
        if !outcome.success {
            ctx.errors.raise();
            info!(board = %board, example = %example, "Build failed");
            return BatchOutcome::Failed {
                message: format!(
                    "Error building {example} for board {board}. stdout:\n{}",
                    outcome.output
                ),
            };
        }
    }

    BatchOutcome::Succeeded
}
