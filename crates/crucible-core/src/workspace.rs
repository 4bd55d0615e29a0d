//! Per-request workspace directories.
//!
//! Every pipeline run owns a private directory holding its source file and
//! compiled artifact. Names are collision-free UUID tokens under a shared
//! root, so concurrent requests operate on disjoint subtrees without any
//! locking. Removal is idempotent, and a handle that is dropped without an
//! explicit release still removes its directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::Fault;

/// Allocates and tears down per-request workspaces under a single root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, uniquely named workspace directory.
    pub async fn acquire(&self) -> Result<Workspace, Fault> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Fault::Workspace(format!("creating workspace root: {}", e)))?;

        let id = Uuid::new_v4();
        let dir = self.root.join(format!("run-{}", id));
        tokio::fs::create_dir(&dir)
            .await
            .map_err(|e| Fault::Workspace(format!("creating workspace {}: {}", dir.display(), e)))?;

        log::debug!("acquired workspace {}", dir.display());
        Ok(Workspace { id, dir, released: false })
    }

    /// Remove a workspace and everything in it. Tolerates a directory that
    /// was already partially or fully removed.
    pub async fn release(&self, mut workspace: Workspace) {
        workspace.released = true;
        match tokio::fs::remove_dir_all(&workspace.dir).await {
            Ok(()) => log::debug!("released workspace {}", workspace.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "failed to remove workspace {}: {}",
                workspace.dir.display(),
                e
            ),
        }
    }
}

/// Handle to one request's private directory.
///
/// The pipeline releases the handle on every exit path; `Drop` covers the
/// remaining unwind paths with a synchronous best-effort removal.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    dir: PathBuf,
    released: bool,
}

impl Workspace {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of a file inside this workspace.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, WorkspaceManager) {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());
        (root, manager)
    }

    #[tokio::test]
    async fn acquire_creates_a_directory_under_the_root() {
        let (root, manager) = manager();
        let workspace = manager.acquire().await.unwrap();
        assert!(workspace.dir().is_dir());
        assert!(workspace.dir().starts_with(root.path()));
        manager.release(workspace).await;
    }

    #[tokio::test]
    async fn acquired_workspaces_never_collide() {
        let (_root, manager) = manager();
        let a = manager.acquire().await.unwrap();
        let b = manager.acquire().await.unwrap();
        assert_ne!(a.dir(), b.dir());
        assert_ne!(a.id(), b.id());
        manager.release(a).await;
        manager.release(b).await;
    }

    #[tokio::test]
    async fn release_removes_the_directory_and_contents() {
        let (_root, manager) = manager();
        let workspace = manager.acquire().await.unwrap();
        let dir = workspace.dir().to_path_buf();
        tokio::fs::write(workspace.path_of("main.cpp"), b"int main() {}")
            .await
            .unwrap();
        manager.release(workspace).await;
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn release_tolerates_an_already_removed_directory() {
        let (_root, manager) = manager();
        let workspace = manager.acquire().await.unwrap();
        tokio::fs::remove_dir_all(workspace.dir()).await.unwrap();
        manager.release(workspace).await;
    }

    #[tokio::test]
    async fn dropping_an_unreleased_handle_removes_the_directory() {
        let (_root, manager) = manager();
        let workspace = manager.acquire().await.unwrap();
        let dir = workspace.dir().to_path_buf();
        drop(workspace);
        assert!(!dir.exists());
    }
}
