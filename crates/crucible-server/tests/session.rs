//! End-to-end dispatch tests: wire message in, wire message out, with a real
//! pipeline underneath. The toolchain is stubbed with `cp` + `sh` so the
//! suite runs without a C++ compiler while exercising the same subprocess
//! machinery.

use std::sync::Arc;
use std::time::Duration;

use crucible_core::{Pipeline, PipelineConfig, ToolchainConfig};
use crucible_server::session::dispatch;
use crucible_server::ServerMessage;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn sh_pipeline(root: &std::path::Path) -> Pipeline {
    let toolchain = ToolchainConfig::new()
        .with_compile_argv(argv(&["cp", "{source}", "{artifact}"]))
        .with_run_argv(argv(&["sh", "{artifact}"]));
    Pipeline::new(
        PipelineConfig::new()
            .with_workspace_root(root)
            .with_compile_timeout(Duration::from_secs(5))
            .with_execute_timeout(Duration::from_millis(500))
            .with_toolchain(toolchain),
    )
}

fn run_frame(code: &str) -> String {
    serde_json::json!({ "type": "run", "code": code }).to_string()
}

async fn workspace_count(root: &std::path::Path) -> usize {
    let mut count = 0;
    let mut entries = tokio::fs::read_dir(root).await.unwrap();
    while entries.next_entry().await.unwrap().is_some() {
        count += 1;
    }
    count
}

#[tokio::test]
async fn run_round_trip_returns_the_program_output() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = sh_pipeline(root.path());

    let reply = dispatch(&pipeline, &run_frame("echo hello")).await;
    assert_eq!(reply.to_json(), r#"{"type":"execution","data":"hello\n"}"#);
}

#[tokio::test]
async fn silent_run_returns_the_placeholder_not_an_empty_string() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = sh_pipeline(root.path());

    let reply = dispatch(&pipeline, &run_frame(":")).await;
    assert_eq!(
        reply,
        ServerMessage::Execution {
            data: "No output produced".to_string()
        }
    );
}

#[tokio::test]
async fn timeout_is_reported_as_an_error_reply() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = sh_pipeline(root.path());

    let reply = dispatch(&pipeline, &run_frame("while true; do :; done")).await;
    match reply {
        ServerMessage::Error { data } => assert!(data.contains("time limit")),
        other => panic!("expected an error reply, got {:?}", other),
    }
    assert_eq!(workspace_count(root.path()).await, 0);
}

#[tokio::test]
async fn unknown_message_type_is_rejected_without_leaving_a_workspace() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = sh_pipeline(root.path());

    let reply = dispatch(&pipeline, r#"{"type": "shutdown"}"#).await;
    assert!(matches!(reply, ServerMessage::Error { .. }));
    // The pipeline never ran: nothing was created under the root.
    assert!(!root.path().join("run-").exists());
    assert_eq!(workspace_count(root.path()).await, 0);
}

#[tokio::test]
async fn every_frame_gets_exactly_one_reply_in_order() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = sh_pipeline(root.path());

    let frames = [
        run_frame("echo first"),
        "garbage".to_string(),
        run_frame("echo third"),
    ];
    let mut replies = Vec::new();
    for frame in &frames {
        replies.push(dispatch(&pipeline, frame).await);
    }

    assert_eq!(replies.len(), frames.len());
    assert_eq!(
        replies[0],
        ServerMessage::Execution {
            data: "first\n".to_string()
        }
    );
    assert!(matches!(replies[1], ServerMessage::Error { .. }));
    assert_eq!(
        replies[2],
        ServerMessage::Execution {
            data: "third\n".to_string()
        }
    );
}

#[tokio::test]
async fn concurrent_sessions_get_their_own_output_and_leave_nothing_behind() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = Arc::new(sh_pipeline(root.path()));

    let mut handles = Vec::new();
    for i in 0..4 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            let reply = dispatch(pipeline.as_ref(), &run_frame(&format!("echo session-{}", i))).await;
            (i, reply)
        }));
    }

    for handle in handles {
        let (i, reply) = handle.await.unwrap();
        assert_eq!(
            reply,
            ServerMessage::Execution {
                data: format!("session-{}\n", i)
            }
        );
    }
    assert_eq!(workspace_count(root.path()).await, 0);
}
