//! Board descriptors and example discovery.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A hardware target understood by PlatformIO (`uno`, `esp32dev`, ...).
///
/// The name is opaque; it is passed to `pio ci --board` and namespaces the
/// board's build directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub board_name: String,
}

impl Board {
    pub fn new(board_name: impl Into<String>) -> Self {
        Self {
            board_name: board_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.board_name
    }

    /// Parse a comma-separated board list, skipping blanks.
    pub fn parse_list(list: &str) -> Vec<Board> {
        parse_names(list).into_iter().map(Board::new).collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_name)
    }
}

/// Split a comma-separated list of names, trimming each and skipping blanks.
pub fn parse_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Example sketch names under `<project_root>/examples`.
///
/// An example is a directory directly under `examples/` holding at least one
/// `*.ino` file. Names are returned sorted.
pub fn discover_examples(project_root: &Path) -> anyhow::Result<Vec<String>> {
    let examples_dir = project_root.join("examples");
    if !examples_dir.is_dir() {
        anyhow::bail!("No examples directory at {}", examples_dir.display());
    }

    let mut examples = Vec::new();
    for entry in std::fs::read_dir(&examples_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if has_sketch(&entry.path())? {
            examples.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    examples.sort();
    Ok(examples)
}

fn has_sketch(dir: &Path) -> anyhow::Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "ino") {
            return Ok(true);
        }
    }
    Ok(false)
}
