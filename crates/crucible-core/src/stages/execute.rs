//! Execution of the compiled artifact.

use std::time::Duration;

use crate::config::ToolchainConfig;
use crate::core_types::{Stage, StageOutcome};
use crate::errors::Fault;
use crate::workspace::Workspace;

use super::{render_argv, run_bounded};

/// Runs the compiled artifact inside its workspace under a wall-clock bound
/// distinct from the compile bound.
#[derive(Debug, Clone)]
pub struct ExecutionInvoker {
    toolchain: ToolchainConfig,
    timeout: Duration,
}

impl ExecutionInvoker {
    pub fn new(toolchain: ToolchainConfig, timeout: Duration) -> Self {
        Self { toolchain, timeout }
    }

    /// Run the artifact and capture its output.
    ///
    /// The program's exit status is recorded but does not constitute failure;
    /// user code exiting non-zero is user content. Only a timeout or a launch
    /// fault escalates.
    pub async fn execute(&self, workspace: &Workspace) -> Result<StageOutcome, Fault> {
        let source = workspace.path_of(&self.toolchain.source_filename);
        let artifact = workspace.path_of(&self.toolchain.artifact_filename);
        let argv = render_argv(&self.toolchain.run_argv, &source, &artifact);
        run_bounded(Stage::Execute, &argv, workspace.dir(), self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceManager;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    async fn workspace_with_script(script: &str) -> (tempfile::TempDir, Workspace) {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());
        let workspace = manager.acquire().await.unwrap();
        tokio::fs::write(workspace.path_of("main"), script).await.unwrap();
        (root, workspace)
    }

    fn sh_invoker(timeout: Duration) -> ExecutionInvoker {
        let toolchain = ToolchainConfig::new().with_run_argv(argv(&["sh", "{artifact}"]));
        ExecutionInvoker::new(toolchain, timeout)
    }

    #[tokio::test]
    async fn execute_captures_exact_program_output() {
        let (_root, workspace) = workspace_with_script("echo hello\n").await;
        let invoker = sh_invoker(Duration::from_secs(5));

        let outcome = invoker.execute(&workspace).await.unwrap();
        assert_eq!(outcome.stdout, b"hello\n");
        assert!(outcome.stderr.is_empty());
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn nonzero_exit_is_still_an_outcome() {
        let (_root, workspace) = workspace_with_script("echo partial; exit 3\n").await;
        let invoker = sh_invoker(Duration::from_secs(5));

        let outcome = invoker.execute(&workspace).await.unwrap();
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stdout, b"partial\n");
    }

    #[tokio::test]
    async fn runaway_program_hits_the_execution_timeout() {
        let (_root, workspace) = workspace_with_script("while true; do :; done\n").await;
        let invoker = sh_invoker(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let fault = invoker.execute(&workspace).await.unwrap_err();
        assert!(matches!(fault, Fault::ExecutionTimeout(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
