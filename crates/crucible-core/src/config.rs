//! Configuration for the pipeline and the external toolchain.

use std::path::PathBuf;
use std::time::Duration;

/// Placeholder in a command template replaced with the workspace source path.
pub const SOURCE_PLACEHOLDER: &str = "{source}";
/// Placeholder in a command template replaced with the workspace artifact path.
pub const ARTIFACT_PLACEHOLDER: &str = "{artifact}";

/// Command templates for the external compiler and the produced artifact.
///
/// Commands are argv vectors, never shell strings: each element is passed to
/// the process as-is after placeholder substitution, so untrusted source text
/// can never reach a shell. The defaults target a local `g++` and run the
/// artifact directly.
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    /// Fixed name of the source file written into each workspace.
    pub source_filename: String,
    /// Fixed name of the compiled artifact inside each workspace.
    pub artifact_filename: String,
    /// Compiler argv template; `{source}` and `{artifact}` are substituted
    /// with absolute workspace paths.
    pub compile_argv: Vec<String>,
    /// Run argv template for the compiled artifact; `{artifact}` is
    /// substituted with its absolute path.
    pub run_argv: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            source_filename: "main.cpp".to_string(),
            artifact_filename: default_artifact_filename(),
            compile_argv: vec![
                "g++".to_string(),
                SOURCE_PLACEHOLDER.to_string(),
                "-o".to_string(),
                ARTIFACT_PLACEHOLDER.to_string(),
            ],
            run_argv: vec![ARTIFACT_PLACEHOLDER.to_string()],
        }
    }
}

impl ToolchainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the compiler binary, keeping the default argument shape.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compile_argv[0] = compiler.into();
        self
    }

    /// Set the full compiler argv template.
    pub fn with_compile_argv(mut self, argv: Vec<String>) -> Self {
        self.compile_argv = argv;
        self
    }

    /// Set the full run argv template.
    pub fn with_run_argv(mut self, argv: Vec<String>) -> Self {
        self.run_argv = argv;
        self
    }
}

fn default_artifact_filename() -> String {
    if cfg!(windows) {
        "main.exe".to_string()
    } else {
        "main".to_string()
    }
}

/// Limits and layout for pipeline runs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent directory under which per-request workspaces are created.
    pub workspace_root: PathBuf,
    /// Wall-clock bound on the compiler subprocess.
    pub compile_timeout: Duration,
    /// Wall-clock bound on the executed artifact.
    pub execute_timeout: Duration,
    /// Cap on simultaneously running pipelines across all sessions.
    pub max_concurrent: usize,
    /// External toolchain command templates.
    pub toolchain: ToolchainConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir().join("crucible"),
            compile_timeout: Duration::from_secs(10),
            execute_timeout: Duration::from_secs(5),
            max_concurrent: 8,
            toolchain: ToolchainConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent directory for per-request workspaces.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// Set the compile-stage timeout.
    pub fn with_compile_timeout(mut self, timeout: Duration) -> Self {
        self.compile_timeout = timeout;
        self
    }

    /// Set the execute-stage timeout.
    pub fn with_execute_timeout(mut self, timeout: Duration) -> Self {
        self.execute_timeout = timeout;
        self
    }

    /// Set the cap on simultaneous pipeline runs.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Set the toolchain command templates.
    pub fn with_toolchain(mut self, toolchain: ToolchainConfig) -> Self {
        self.toolchain = toolchain;
        self
    }
}
