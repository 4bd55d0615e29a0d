//! Pipeline orchestration: one request in, exactly one result out.
//!
//! The orchestrator sequences workspace acquisition, compilation, and
//! execution, and converts every failure mode into the diagnostic text of an
//! error result before returning. Nothing here propagates an error to the
//! caller: the transport layer above always has exactly one `RunResult` to
//! send back, including under timeouts and toolchain anomalies. A semaphore
//! caps simultaneous runs so a hostile client cannot fan out unbounded
//! compiler subprocesses.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::config::PipelineConfig;
use crate::core_types::{RunRequest, RunResult};
use crate::errors::Fault;
use crate::stages::{CompilerInvoker, ExecutionInvoker};
use crate::workspace::{Workspace, WorkspaceManager};

/// Literal payload used when a run produces no visible output.
pub const NO_OUTPUT_PLACEHOLDER: &str = "No output produced";

/// Anything that can turn a run request into a result.
///
/// The transport layer dispatches through this trait so it can be exercised
/// against a stub in tests.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, request: RunRequest) -> RunResult;
}

/// The compile-execute orchestrator.
pub struct Pipeline {
    workspaces: WorkspaceManager,
    compiler: CompilerInvoker,
    executor: ExecutionInvoker,
    limiter: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let workspaces = WorkspaceManager::new(&config.workspace_root);
        let compiler = CompilerInvoker::new(config.toolchain.clone(), config.compile_timeout);
        let executor = ExecutionInvoker::new(config.toolchain.clone(), config.execute_timeout);
        Self {
            workspaces,
            compiler,
            executor,
            limiter: Arc::new(Semaphore::new(config.max_concurrent)),
        }
    }

    async fn run_stages(
        &self,
        workspace: &Workspace,
        request: &RunRequest,
    ) -> Result<RunResult, Fault> {
        let compiled = self.compiler.compile(workspace, &request.source_code).await?;
        if !compiled.success() {
            log::info!(
                "run {}: compiler exited with {:?}",
                workspace.id(),
                compiled.exit_code
            );
            return Ok(RunResult::error(compiled.stderr_text()));
        }

        let executed = self.executor.execute(workspace).await?;
        log::info!(
            "run {}: program exited with {:?}",
            workspace.id(),
            executed.exit_code
        );

        let output = executed.combined_output();
        if output.trim().is_empty() {
            Ok(RunResult::execution(NO_OUTPUT_PLACEHOLDER))
        } else {
            Ok(RunResult::execution(output))
        }
    }
}

#[async_trait]
impl CodeRunner for Pipeline {
    /// Run one request through compile and execute.
    ///
    /// The workspace acquired at the start is released on every path out of
    /// this function, and every fault is rendered into an error result here.
    async fn run(&self, request: RunRequest) -> RunResult {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => return RunResult::error("server is shutting down"),
        };

        let workspace = match self.workspaces.acquire().await {
            Ok(workspace) => workspace,
            Err(fault) => {
                log::error!("workspace acquisition failed: {}", fault);
                return RunResult::error(fault.to_string());
            }
        };

        let staged = self.run_stages(&workspace, &request).await;
        self.workspaces.release(workspace).await;

        staged.unwrap_or_else(|fault| {
            log::warn!("run failed with fault: {}", fault);
            RunResult::error(fault.to_string())
        })
    }
}
