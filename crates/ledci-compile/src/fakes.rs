//! In-memory compiler fake (testing only)
//!
//! `ScriptedCompiler` satisfies [`BoardCompiler`] without touching PlatformIO:
//! it records every call and fails the (board, example) pairs it was told to.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::board::Board;
use crate::compiler::{BoardCompiler, BuildOutcome};
use crate::gate::FirstBuildGate;

/// One recorded compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub board: String,
    pub example: String,
    /// Whether the first-build gate was held during the call.
    pub gate_held: bool,
}

/// Scripted compiler that records calls.
#[derive(Debug, Default)]
pub struct ScriptedCompiler {
    failures: HashSet<(String, String)>,
    errors: HashSet<(String, String)>,
    delay: Option<Duration>,
    gate: Option<Arc<FirstBuildGate>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `example` on `board` produce a failed build.
    pub fn failing(mut self, board: &str, example: &str) -> Self {
        self.failures.insert((board.to_string(), example.to_string()));
        self
    }

    /// Make `example` on `board` return `Err`, as if the tool could not run.
    pub fn erroring(mut self, board: &str, example: &str) -> Self {
        self.errors.insert((board.to_string(), example.to_string()));
        self
    }

    /// Sleep this long inside every compile.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Observe this gate so each invocation records whether it was held.
    pub fn observing(mut self, gate: Arc<FirstBuildGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// All calls so far, in call order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made for one board.
    pub fn invocations_for(&self, board: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|call| call.board == board)
            .collect()
    }
}

#[async_trait]
impl BoardCompiler for ScriptedCompiler {
    async fn compile(&self, board: &Board, example: &str) -> anyhow::Result<BuildOutcome> {
        let gate_held = self.gate.as_ref().is_some_and(|gate| gate.is_held());
        self.calls.lock().unwrap().push(Invocation {
            board: board.name().to_string(),
            example: example.to_string(),
            gate_held,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = (board.name().to_string(), example.to_string());
        if self.errors.contains(&key) {
            anyhow::bail!("failed to launch build tool for {example} on {board}");
        }
        if self.failures.contains(&key) {
            return Ok(BuildOutcome::failed(format!(
                "examples/{example}/{example}.ino:1:1: error: scripted failure on {board}"
            )));
        }
        Ok(BuildOutcome::passed(format!("built {example} for {board}")))
    }
}
