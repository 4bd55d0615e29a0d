//! Stage invokers for the two subprocess steps of a run.
//!
//! Both stages share one spawning discipline: direct argv invocation (no
//! shell), stdin closed, stdout/stderr captured independently, working
//! directory pinned to the request's workspace, and a wall-clock bound
//! enforced by `tokio::time::timeout` with `kill_on_drop` so an expired
//! subprocess is forcibly terminated rather than orphaned.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::{ARTIFACT_PLACEHOLDER, SOURCE_PLACEHOLDER};
use crate::core_types::{Stage, StageOutcome};
use crate::errors::Fault;

mod compile;
mod execute;

pub use compile::CompilerInvoker;
pub use execute::ExecutionInvoker;

/// Substitute the source/artifact placeholders in a command template with
/// absolute workspace paths.
fn render_argv(template: &[String], source: &Path, artifact: &Path) -> Vec<String> {
    let source = source.to_string_lossy();
    let artifact = artifact.to_string_lossy();
    template
        .iter()
        .map(|arg| {
            arg.replace(SOURCE_PLACEHOLDER, &source)
                .replace(ARTIFACT_PLACEHOLDER, &artifact)
        })
        .collect()
}

/// Spawn one stage subprocess and wait for it under a wall-clock bound.
///
/// Returns a `StageOutcome` whenever the process ran to completion, whatever
/// it exited with; launch failures and expired bounds become faults. On
/// timeout the child is killed through `kill_on_drop`.
async fn run_bounded(
    stage: Stage,
    argv: &[String],
    cwd: &Path,
    limit: Duration,
) -> Result<StageOutcome, Fault> {
    let (program, args) = argv.split_first().ok_or_else(|| Fault::Spawn {
        stage,
        program: String::new(),
        message: "empty command template".to_string(),
    })?;

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    log::debug!("spawning {} stage: {:?}", stage, argv);
    let child = command
        .spawn()
        .map_err(|e| Fault::spawn(stage, program.clone(), &e))?;

    let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(Fault::Io(e.to_string())),
        Err(_) => {
            log::warn!("{} stage exceeded its {:?} bound, killing subprocess", stage, limit);
            return Err(match stage {
                Stage::Compile => Fault::CompileTimeout(limit),
                Stage::Execute => Fault::ExecutionTimeout(limit),
            });
        }
    };

    log::debug!("{} stage exited with {:?}", stage, output.status.code());
    Ok(StageOutcome {
        stage,
        exit_code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
