//! Ephemeral workspace backing one execution attempt.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

/// Scratch directory holding the source file and compiled artifact of one
/// sandbox invocation.
///
/// The directory is owned exclusively by the invocation that created it and
/// is removed recursively when the value is dropped, so cleanup runs on
/// every exit path: success, compile failure, timeout kill, and panic
/// unwind alike.
pub struct ScratchWorkspace {
    dir: TempDir,
    source_file: String,
    artifact_file: String,
}

impl ScratchWorkspace {
    /// Allocate a uniquely named scratch directory with paths for one
    /// source file and its artifact.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("dojo-run-").tempdir()?;
        let stem = format!("code_{}", Uuid::new_v4());
        Ok(Self {
            dir,
            source_file: format!("{stem}.cpp"),
            artifact_file: stem,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_path(&self) -> PathBuf {
        self.dir.path().join(&self.source_file)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.path().join(&self.artifact_file)
    }

    /// Write the submitted source text verbatim into the workspace.
    pub async fn write_source(&self, source: &str) -> io::Result<()> {
        tokio::fs::write(self.source_path(), source).await
    }
}
