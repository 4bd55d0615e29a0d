//! Compile-execute pipeline for running untrusted C++ submissions.
//!
//! This crate turns one "run" request into a bounded sequence of subprocess
//! operations: write the source into an isolated workspace, invoke the native
//! compiler, run the produced binary, and collapse whatever happened into a
//! single result for the transport layer. The design centers on deterministic
//! resource reclamation: every request owns a private workspace directory
//! that is removed on every exit path, and every subprocess wait carries a
//! wall-clock bound backed by forced termination.
//!
//! # Architecture Overview
//!
//! - **Workspace management**: per-request, collision-free scratch
//!   directories with idempotent teardown
//! - **Stage invokers**: compiler and executor subprocesses with independent
//!   output capture and per-stage timeouts
//! - **Pipeline orchestration**: the state machine mapping stage outcomes and
//!   faults onto exactly one reply per request
//! - **Configuration**: toolchain command templates and pipeline limits
//!
//! No kernel-level sandboxing is provided here; the pipeline bounds time and
//! disk layout only. Callers that need real isolation must wrap the run
//! command with an external jail.

pub mod config;
pub mod core_types;
pub mod errors;
pub mod pipeline;
pub mod stages;
pub mod workspace;

pub use config::{PipelineConfig, ToolchainConfig};
pub use core_types::{RunRequest, RunResult, Stage, StageOutcome};
pub use errors::Fault;
pub use pipeline::{CodeRunner, Pipeline, NO_OUTPUT_PLACEHOLDER};
pub use workspace::{Workspace, WorkspaceManager};
