//! Error types for pipeline failure handling.
//!
//! A `Fault` is a system-level failure: something went wrong in our plumbing
//! or the toolchain misbehaved, as opposed to the user's code failing to
//! compile or exiting non-zero (both of which are ordinary stage outcomes).
//! Faults never escape the pipeline; the orchestrator renders each one into
//! the diagnostic text of an error reply.

use std::time::Duration;

use thiserror::Error;

use crate::core_types::Stage;

#[derive(Error, Debug)]
pub enum Fault {
    #[error("source file could not be written: {0}")]
    SourceWrite(String),
    #[error("source file not present after write")]
    SourceMissing,
    #[error("compiled binary not found after compilation")]
    MissingArtifact,
    #[error("compilation exceeded the {}s time limit", .0.as_secs())]
    CompileTimeout(Duration),
    #[error("execution exceeded the {}s time limit", .0.as_secs())]
    ExecutionTimeout(Duration),
    #[error("failed to launch {stage} process '{program}': {message}")]
    Spawn {
        stage: Stage,
        program: String,
        message: String,
    },
    #[error("workspace error: {0}")]
    Workspace(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl Fault {
    pub fn spawn(stage: Stage, program: impl Into<String>, err: &std::io::Error) -> Self {
        Fault::Spawn {
            stage,
            program: program.into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Fault {
    fn from(err: std::io::Error) -> Self {
        Fault::Io(err.to_string())
    }
}
