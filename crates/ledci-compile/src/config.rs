//! Compile configuration.

use std::path::PathBuf;

/// Environment variable whose presence marks a GitHub Actions runner.
pub const CONSTRAINED_ENV_VAR: &str = "GITHUB_ACTIONS";

/// Default root for per-board build directories.
pub const DEFAULT_BUILD_ROOT: &str = ".build";

/// Library search paths handed to every `pio ci` call.
pub const LIBRARY_DIRS: [&str; 2] = ["ci", "src"];

/// Settings for compiling examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    /// Directory the build tool runs from; `examples/` lives here.
    pub project_root: PathBuf,

    /// Root of the per-board build directories.
    pub build_root: PathBuf,

    /// Build tool executable.
    pub tool: String,

    /// Memory-limited CI runner: serialize first builds.
    pub constrained: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            tool: "pio".to_string(),
            constrained: false,
        }
    }
}

impl CompileConfig {
    /// Defaults, with `constrained` detected from the environment.
    pub fn from_env() -> Self {
        Self {
            constrained: std::env::var_os(CONSTRAINED_ENV_VAR).is_some(),
            ..Self::default()
        }
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Override the build root; `None` keeps the current one.
    pub fn with_build_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.build_root = root;
        }
        self
    }

    /// Build root as the build tool sees it.
    ///
    /// The tool runs from `project_root`, so a relative root is taken relative
    /// to the project, not to the current directory.
    pub fn resolved_build_root(&self) -> PathBuf {
        if self.build_root.is_relative() {
            self.project_root.join(&self.build_root)
        } else {
            self.build_root.clone()
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_constrained(mut self, constrained: bool) -> Self {
        self.constrained = constrained;
        self
    }
}
