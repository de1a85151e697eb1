//! Isolated scratch directories for running collectors.
//!
//! Each suite runs inside its own temporary directory populated with copies of
//! the fixture files it needs. Commands receive the directory explicitly; the
//! process working directory is never changed. The directory is removed when
//! the [`Workspace`] is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to create workspace: {0}")]
    Create(#[source] std::io::Error),
    #[error("Failed to copy fixture {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to remove workspace: {0}")]
    Cleanup(#[source] std::io::Error),
}

const WORKSPACE_PREFIX: &str = "efficiency-eval-";

/// A temporary directory owned for the duration of one suite run.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn create() -> Result<Self, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(WorkspaceError::Create)?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Create a workspace holding copies of `fixtures`, resolved against `source_root`.
    ///
    /// Fixtures that do not exist are skipped with a warning.
    pub fn with_fixtures(source_root: &Path, fixtures: &[PathBuf]) -> Result<Self, WorkspaceError> {
        let workspace = Self::create()?;
        for fixture in fixtures {
            let source = source_root.join(fixture);
            if !source.exists() {
                warn!("Fixture {} does not exist, skipping", source.display());
                continue;
            }
            let name = match fixture.file_name() {
                Some(name) => name,
                None => {
                    warn!("Fixture {} has no file name, skipping", fixture.display());
                    continue;
                }
            };
            copy_recursive(&source, &workspace.path().join(name))?;
        }
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace now, reporting failures instead of ignoring them on drop.
    pub fn close(self) -> Result<(), WorkspaceError> {
        self.dir.close().map_err(WorkspaceError::Cleanup)
    }
}

fn copy_recursive(source: &Path, target: &Path) -> Result<(), WorkspaceError> {
    let copy_err = |e: std::io::Error| WorkspaceError::Copy {
        path: source.to_path_buf(),
        source: e,
    };

    if source.is_dir() {
        fs::create_dir_all(target).map_err(copy_err)?;
        for entry in fs::read_dir(source).map_err(copy_err)? {
            let entry = entry.map_err(copy_err)?;
            copy_recursive(&entry.path(), &target.join(entry.file_name()))?;
        }
    } else {
        fs::copy(source, target).map_err(copy_err)?;
    }
    Ok(())
}
