//! Deletion of compressed variants no longer bound to any slot

use crate::catalog::slot::Slot;
use crate::io::assets::reference_key;
use crate::io::image::has_image_extension;
use crate::io::progress::ProgressManager;
use crate::pipeline::assign::variant_id;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counts produced by one reconciliation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Variants removed
    pub deleted: usize,
    /// Variants still referenced
    pub kept: usize,
    /// Unreferenced variants whose removal failed
    pub failed: usize,
    /// Whether the pass stopped early on request
    pub cancelled: bool,
    /// Paths removed in this pass
    pub deleted_paths: Vec<PathBuf>,
}

/// Normalized identifiers of every image bound to any slot
pub fn referenced_set(slots: &[Slot]) -> HashSet<String> {
    slots
        .iter()
        .flat_map(|slot| slot.bindings.iter())
        .filter(|id| !id.is_empty())
        .map(|id| reference_key(id))
        .collect()
}

/// Removes unreferenced variants from one compressed-output folder
pub struct ReferenceReconciler {
    folder: PathBuf,
    folder_id: String,
}

impl ReferenceReconciler {
    /// `folder` is the filesystem location, `folder_id` its project-relative identifier
    pub fn new(folder: impl Into<PathBuf>, folder_id: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            folder_id: folder_id.into(),
        }
    }

    /// Image files currently present in the folder, with their identifiers
    pub fn variants(&self) -> Vec<(PathBuf, String)> {
        if !self.folder.is_dir() {
            return Vec::new();
        }
        let mut found: Vec<(PathBuf, String)> = WalkDir::new(&self.folder)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && has_image_extension(entry.path()))
            .filter_map(|entry| {
                let path = entry.into_path();
                variant_id(&self.folder, &self.folder_id, &path).map(|id| (path, id))
            })
            .collect();
        found.sort();
        found
    }

    /// Delete every variant whose identifier is not bound by any of `slots`
    ///
    /// Individual deletion failures are logged and counted; the pass continues.
    pub fn reconcile(&self, slots: &[Slot], progress: &mut ProgressManager) -> ReconcileReport {
        let referenced = referenced_set(slots);
        let variants = self.variants();
        let mut report = ReconcileReport::default();

        progress.begin_phase("Delete unreferenced", variants.len());
        for (path, id) in variants {
            if !progress.next_unit(&id) {
                report.cancelled = true;
                break;
            }
            if referenced.contains(&reference_key(&id)) {
                report.kept += 1;
                continue;
            }
            if !self.owns(&path) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Deleted {}", path.display());
                    report.deleted += 1;
                    report.deleted_paths.push(path);
                }
                Err(e) => {
                    tracing::error!("Failed to delete '{}': {e}", path.display());
                    report.failed += 1;
                }
            }
        }
        progress.finish_phase();
        report
    }

    fn owns(&self, path: &Path) -> bool {
        path.starts_with(&self.folder)
    }
}
