//! Compiler invocation against a workspace.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ToolchainConfig;
use crate::core_types::{Stage, StageOutcome};
use crate::errors::Fault;
use crate::workspace::Workspace;

use super::{render_argv, run_bounded};

/// Writes source into a workspace and runs the external compiler over it.
#[derive(Debug, Clone)]
pub struct CompilerInvoker {
    toolchain: ToolchainConfig,
    timeout: Duration,
}

impl CompilerInvoker {
    pub fn new(toolchain: ToolchainConfig, timeout: Duration) -> Self {
        Self { toolchain, timeout }
    }

    /// Path the compiled artifact will have inside the given workspace.
    pub fn artifact_path(&self, workspace: &Workspace) -> PathBuf {
        workspace.path_of(&self.toolchain.artifact_filename)
    }

    /// Write `source_code` verbatim and invoke the compiler, bounded by the
    /// compile timeout.
    ///
    /// A completed compiler run is returned as a `StageOutcome` even when it
    /// exited non-zero; the caller decides how to classify the diagnostics.
    /// An exit of zero without the artifact on disk is a fault: the toolchain
    /// claimed success but produced nothing we can run.
    pub async fn compile(
        &self,
        workspace: &Workspace,
        source_code: &str,
    ) -> Result<StageOutcome, Fault> {
        let source = workspace.path_of(&self.toolchain.source_filename);
        tokio::fs::write(&source, source_code)
            .await
            .map_err(|e| Fault::SourceWrite(e.to_string()))?;
        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            return Err(Fault::SourceMissing);
        }

        let artifact = self.artifact_path(workspace);
        let argv = render_argv(&self.toolchain.compile_argv, &source, &artifact);
        let outcome = run_bounded(Stage::Compile, &argv, workspace.dir(), self.timeout).await?;

        if outcome.success() && !tokio::fs::try_exists(&artifact).await.unwrap_or(false) {
            return Err(Fault::MissingArtifact);
        }
        Ok(outcome)
    }
}
