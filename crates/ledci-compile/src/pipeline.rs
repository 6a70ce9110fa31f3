//! Multi-board compile orchestration.

use crate::batch::{compile_examples, BatchContext, BatchOutcome};
use crate::board::Board;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Outcome of one board's batch.
#[derive(Debug, Clone, Serialize)]
pub struct BoardResult {
    pub board: Board,
    pub outcome: BatchOutcome,
}

/// Result of compiling every board.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// One entry per board, in the order boards were given.
    pub boards: Vec<BoardResult>,

    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl PipelineResult {
    /// True when no batch failed (skipped batches count as success).
    pub fn success(&self) -> bool {
        !self.boards.iter().any(|b| b.outcome.is_failure())
    }

    /// Batches that failed.
    pub fn failures(&self) -> Vec<&BoardResult> {
        self.boards.iter().filter(|b| b.outcome.is_failure()).collect()
    }

    /// Number of batches that were skipped after another failed.
    pub fn skipped_count(&self) -> usize {
        self.boards
            .iter()
            .filter(|b| b.outcome == BatchOutcome::Skipped)
            .count()
    }
}

/// Runs one concurrent batch per board.
pub struct CompilePipeline;

impl CompilePipeline {
    /// Compile `examples` for every board concurrently.
    ///
    /// All batches share `ctx`, so one failure stops the others at their next
    /// example. A batch task that panics is reported as a failure for its board.
    pub async fn run(
        ctx: BatchContext,
        boards: Vec<Board>,
        examples: Vec<String>,
    ) -> PipelineResult {
        let start = Instant::now();
        let examples = Arc::new(examples);

        info!(
            boards = boards.len(),
            examples = examples.len(),
            gated = ctx.gate.enabled(),
            "Starting compile pipeline"
        );

        let tasks: Vec<_> = boards
            .iter()
            .cloned()
            .map(|board| {
                let ctx = ctx.clone();
                let examples = examples.clone();
                tokio::spawn(async move { compile_examples(&ctx, &board, &examples).await })
            })
            .collect();

        let joined = futures::future::join_all(tasks).await;

        let results: Vec<BoardResult> = boards
            .into_iter()
            .zip(joined)
            .map(|(board, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    ctx.errors.raise();
                    BatchOutcome::Failed {
                        message: format!("Batch for board {board} aborted: {e}"),
                    }
                });
                BoardResult { board, outcome }
            })
            .collect();

        let result = PipelineResult {
            boards: results,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if result.success() {
            info!(duration_ms = result.duration_ms, "Compile pipeline completed successfully");
        } else {
            error!(
                failed = result.failures().len(),
                skipped = result.skipped_count(),
                "Compile pipeline failed"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_result_counts() {
        let result = PipelineResult {
            boards: vec![
                BoardResult {
                    board: Board::new("uno"),
                    outcome: BatchOutcome::Failed {
                        message: "Error building Blink for board uno".to_string(),
                    },
                },
                BoardResult {
                    board: Board::new("esp32dev"),
                    outcome: BatchOutcome::Skipped,
                },
                BoardResult {
                    board: Board::new("teensy41"),
                    outcome: BatchOutcome::Succeeded,
                },
            ],
            duration_ms: 300,
        };

        assert!(!result.success());
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].board.name(), "uno");
        assert_eq!(result.skipped_count(), 1);
    }

    #[test]
    fn test_pipeline_result_all_passed() {
        let result = PipelineResult {
            boards: vec![BoardResult {
                board: Board::new("uno"),
                outcome: BatchOutcome::Succeeded,
            }],
            duration_ms: 10,
        };
        assert!(result.success());
        assert!(result.failures().is_empty());
    }

    #[test]
    fn test_pipeline_result_serializes() {
        let result = PipelineResult {
            boards: vec![BoardResult {
                board: Board::new("uno"),
                outcome: BatchOutcome::Skipped,
            }],
            duration_ms: 5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["boards"][0]["board"], "uno");
        assert_eq!(json["boards"][0]["outcome"]["status"], "skipped");
    }
}
