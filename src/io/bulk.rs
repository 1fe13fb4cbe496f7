//! Scoped bulk-operation context muting reactive import hooks
//!
//! A [`BulkOperation`] guard is acquired at batch start and released on drop, so
//! every exit path (success, early return, error) ends the scope. Collaborators
//! that write files receive the guard and forward it to the [`ImportHook`],
//! which ignores writes made while any bulk scope is open.

use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Tracks how many bulk scopes are currently open
#[derive(Debug, Default)]
pub struct BulkState {
    depth: Cell<usize>,
}

impl BulkState {
    /// Create a state with no open scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bulk scope; it closes when the returned guard is dropped
    pub fn begin(&self) -> BulkOperation<'_> {
        self.depth.set(self.depth.get() + 1);
        BulkOperation { state: self }
    }

    /// Whether any bulk scope is open
    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Guard for one open bulk scope
#[derive(Debug)]
pub struct BulkOperation<'a> {
    state: &'a BulkState,
}

impl BulkOperation<'_> {
    /// State this scope belongs to
    pub const fn state(&self) -> &BulkState {
        self.state
    }
}

impl Drop for BulkOperation<'_> {
    fn drop(&mut self) {
        self.state.depth.set(self.state.depth.get().saturating_sub(1));
    }
}

/// Reactive collaborator notified whenever the pipeline writes a file
pub trait ImportHook {
    /// Called after `path` was written
    fn on_file_written(&mut self, path: &Path, state: &BulkState);
}

/// Hook that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl ImportHook for NoopHook {
    fn on_file_written(&mut self, _path: &Path, _state: &BulkState) {}
}

/// Queues files written under a watched folder for re-import
#[derive(Debug)]
pub struct PendingImports {
    watched: PathBuf,
    pending: Vec<PathBuf>,
}

impl PendingImports {
    /// Watch every file written below `watched`
    pub fn new(watched: impl Into<PathBuf>) -> Self {
        Self {
            watched: watched.into(),
            pending: Vec::new(),
        }
    }

    /// Files queued so far
    pub fn pending(&self) -> &[PathBuf] {
        &self.pending
    }
}

impl ImportHook for PendingImports {
    fn on_file_written(&mut self, path: &Path, state: &BulkState) {
        if state.is_active() || !path.starts_with(&self.watched) {
            return;
        }
        tracing::debug!("Queued for import: {}", path.display());
        self.pending.push(path.to_path_buf());
    }
}
