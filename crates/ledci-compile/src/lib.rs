//! ledci-compile - build example sketches for every board
//!
//! Provides a compile orchestrator that:
//! - Runs `pio ci` once per (board, example) pair
//! - Runs one batch per board, all batches concurrently
//! - Serializes each batch's first build behind a gate on constrained CI runners
//! - Stops all batches once any build fails

pub mod batch;
pub mod board;
pub mod compiler;
pub mod config;
pub mod fakes;
pub mod gate;
pub mod pipeline;
pub mod signal;

// Re-export key types
pub use batch::{compile_examples, BatchContext, BatchOutcome};
pub use board::{discover_examples, parse_names, Board};
pub use compiler::{normalize_output, BoardCompiler, BuildOutcome, PioCompiler};
pub use config::CompileConfig;
pub use gate::FirstBuildGate;
pub use pipeline::{BoardResult, CompilePipeline, PipelineResult};
pub use signal::ErrorSignal;
