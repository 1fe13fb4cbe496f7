//! Idempotent generation of long-side-normalized variants from a raw image pool

use crate::catalog::slot::Orientation;
use crate::io::bulk::{BulkOperation, ImportHook};
use crate::io::configuration::VARIANT_EXTENSION;
use crate::io::error::{Result, fs_error};
use crate::io::image::{ImageCodec, has_image_extension, sanitize_file_name};
use crate::io::progress::ProgressManager;
use crate::pipeline::normalize::scaled_dimensions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One raw candidate image with its decoded dimensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    /// File path of the raw image
    pub path: PathBuf,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

impl SourceImage {
    /// File stem used as the base of generated names
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Counts produced by one compression pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressionReport {
    /// Newly written variants taller than wide
    pub portrait: usize,
    /// Newly written variants at least as wide as tall
    pub landscape: usize,
    /// Sources whose variant already existed
    pub skipped_existing: usize,
    /// Sources that failed to resize or write
    pub failed: usize,
    /// Whether the pass stopped early on request
    pub cancelled: bool,
    /// Paths written in this pass
    pub written: Vec<PathBuf>,
}

/// Whether the path's file stem contains `filter`, ignoring ASCII case
pub fn matches_name_filter(path: &Path, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|stem| stem.contains(&filter.to_ascii_lowercase()))
}

/// Collect every readable image below `folder` whose name passes `name_filter`
///
/// Unreadable entries are logged and skipped. The result is sorted by path.
pub fn load_source_library(
    folder: &Path,
    name_filter: &str,
    codec: &(impl ImageCodec + ?Sized),
) -> Vec<SourceImage> {
    let mut library = Vec::new();

    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under '{}': {e}", folder.display());
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || !has_image_extension(path)
            || !matches_name_filter(path, name_filter)
        {
            continue;
        }
        match codec.dimensions(path) {
            Ok((width, height)) => library.push(SourceImage {
                path: path.to_path_buf(),
                width,
                height,
            }),
            Err(e) => tracing::warn!("Skipping source: {e}"),
        }
    }

    library.sort_by(|a, b| a.path.cmp(&b.path));
    library
}

/// Deterministic variant name: `{sanitized stem}_{w}x{h}.png`
pub fn variant_file_name(stem: &str, width: u32, height: u32) -> String {
    format!(
        "{}_{width}x{height}.{VARIANT_EXTENSION}",
        sanitize_file_name(stem)
    )
}

/// Writes resized variants, never overwriting an existing file
pub struct CompressionPipeline<'a, K: ImageCodec + ?Sized> {
    codec: &'a K,
    max_long_exclusive: u32,
}

impl<'a, K: ImageCodec + ?Sized> CompressionPipeline<'a, K> {
    /// Create a pipeline bounding the long side of every variant
    pub const fn new(codec: &'a K, max_long_exclusive: u32) -> Self {
        Self {
            codec,
            max_long_exclusive,
        }
    }

    /// Generate variants for `sources` into `output`
    ///
    /// Per-source failures are logged and counted; they never abort the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output folder cannot be created
    pub fn compress(
        &self,
        sources: &[SourceImage],
        output: &Path,
        bulk: &BulkOperation<'_>,
        hook: &mut dyn ImportHook,
        progress: &mut ProgressManager,
    ) -> Result<CompressionReport> {
        std::fs::create_dir_all(output).map_err(|e| fs_error(output, "create directory", e))?;

        let mut report = CompressionReport::default();
        progress.begin_phase("Generate resized images", sources.len());

        for source in sources {
            if !progress.next_unit(&source.path.display().to_string()) {
                report.cancelled = true;
                break;
            }

            let (width, height) =
                scaled_dimensions(source.width, source.height, self.max_long_exclusive);
            let out_path = output.join(variant_file_name(&source.stem(), width, height));

            if out_path.exists() {
                report.skipped_existing += 1;
                continue;
            }

            if let Err(e) = self
                .codec
                .resize_png(&source.path, &out_path, width, height)
            {
                tracing::error!("Failed to generate '{}': {e}", out_path.display());
                report.failed += 1;
                continue;
            }
            tracing::debug!(
                "Generated {} from {}",
                out_path.display(),
                source.path.display()
            );
            hook.on_file_written(&out_path, bulk.state());

            match Orientation::of_dimensions(width, height) {
                Orientation::Portrait => report.portrait += 1,
                Orientation::Landscape => report.landscape += 1,
            }
            report.written.push(out_path);
        }

        progress.finish_phase();
        Ok(report)
    }
}
