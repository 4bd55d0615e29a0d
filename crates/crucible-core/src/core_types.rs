//! Core type definitions for the compile-execute pipeline.
//!
//! These types form the contract between the stage invokers, the pipeline
//! orchestrator, and the transport layer above it. Stage outcomes keep stdout
//! and stderr separate so the orchestrator can decide how to surface them;
//! the final `RunResult` is the only value that crosses the crate boundary
//! back toward the client.

/// A single run request, constructed per inbound message and discarded once
/// the pipeline returns.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source_code: String,
}

impl RunRequest {
    pub fn new(source_code: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
        }
    }
}

/// Pipeline stage a subprocess ran under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Execute,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Compile => write!(f, "compile"),
            Stage::Execute => write!(f, "execute"),
        }
    }
}

/// Captured result of one stage subprocess that ran to completion.
///
/// A non-zero exit status is data, not an error: the compiler reporting
/// diagnostics and a user program returning 1 both land here.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub stage: Stage,
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl StageOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Lossy text view of stderr, used for compile diagnostics.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Combined program output, stdout followed by stderr. The ordering is
    /// observable by clients and must not change.
    pub fn combined_output(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        text
    }
}

/// The single reply produced for every request.
///
/// `Execution` covers any run where the user's program actually ran,
/// whatever it exited with. `Error` covers compile diagnostics and every
/// system-level fault, already rendered to a human-readable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Execution { data: String },
    Error { data: String },
}

impl RunResult {
    pub fn execution(data: impl Into<String>) -> Self {
        RunResult::Execution { data: data.into() }
    }

    pub fn error(data: impl Into<String>) -> Self {
        RunResult::Error { data: data.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RunResult::Error { .. })
    }

    pub fn data(&self) -> &str {
        match self {
            RunResult::Execution { data } | RunResult::Error { data } => data,
        }
    }
}
