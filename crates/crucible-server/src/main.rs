//! Playground server binary: compile-and-run C++ over WebSocket.
//!
//! Hosts the crucible pipeline behind the axum transport. The bind address,
//! per-stage timeouts, concurrency cap, and compiler binary are all surfaced
//! as flags so deployments can tune limits without rebuilding.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crucible_core::{Pipeline, PipelineConfig, ToolchainConfig};
use crucible_server::{shutdown_signal, CrucibleServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "crucible-server")]
#[command(about = "WebSocket server that compiles and runs C++ submissions")]
#[command(version)]
struct Args {
    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1:8765")]
    bind: String,

    /// Compile-stage timeout in seconds
    #[arg(long, default_value = "10")]
    compile_timeout: u64,

    /// Execute-stage timeout in seconds
    #[arg(long, default_value = "5")]
    execute_timeout: u64,

    /// Maximum number of simultaneous pipeline runs
    #[arg(long, default_value = "8")]
    max_concurrent: usize,

    /// Compiler binary to invoke
    #[arg(long, default_value = "g++")]
    compiler: String,

    /// Parent directory for per-request workspaces (defaults to the system
    /// temp directory)
    #[arg(long)]
    workspace_root: Option<PathBuf>,

    /// Enable CORS
    #[arg(long, default_value = "true")]
    cors: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level_filter = args.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let mut pipeline_config = PipelineConfig::new()
        .with_compile_timeout(Duration::from_secs(args.compile_timeout))
        .with_execute_timeout(Duration::from_secs(args.execute_timeout))
        .with_max_concurrent(args.max_concurrent)
        .with_toolchain(ToolchainConfig::new().with_compiler(&args.compiler));
    if let Some(root) = args.workspace_root {
        pipeline_config = pipeline_config.with_workspace_root(root);
    }

    log::info!(
        "pipeline limits: compile {}s, execute {}s, {} concurrent runs, compiler '{}'",
        args.compile_timeout,
        args.execute_timeout,
        pipeline_config.max_concurrent,
        args.compiler
    );
    log::info!(
        "workspaces under {}",
        pipeline_config.workspace_root.display()
    );

    let pipeline = Arc::new(Pipeline::new(pipeline_config));

    let server_config = ServerConfig::default()
        .with_bind_addr_str(&args.bind)?
        .with_cors(args.cors);
    let server = CrucibleServer::with_config(pipeline, server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
