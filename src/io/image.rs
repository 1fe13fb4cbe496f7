//! Image decode, resize and PNG encode primitives

use crate::io::error::{Result, SlotError};
use image::ImageFormat;
use image::imageops::FilterType;
use std::path::Path;

/// Decode/resize/encode primitive the compression pipeline delegates to
pub trait ImageCodec {
    /// Read pixel dimensions of an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a supported image
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;

    /// Resize `source` to exactly `width`x`height` and write it as PNG to `destination`
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, resizing or writing fails
    fn resize_png(&self, source: &Path, destination: &Path, width: u32, height: u32)
    -> Result<()>;
}

/// Codec backed by the `image` crate
#[derive(Clone, Copy, Debug)]
pub struct PngResizer {
    filter: FilterType,
}

impl Default for PngResizer {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl PngResizer {
    /// Create a resizer using a specific resampling filter
    pub const fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl ImageCodec for PngResizer {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path).map_err(|e| SlotError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn resize_png(
        &self,
        source: &Path,
        destination: &Path,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let img = image::open(source).map_err(|e| SlotError::ImageLoad {
            path: source.to_path_buf(),
            source: e,
        })?;

        let resized = if img.width() == width && img.height() == height {
            img
        } else {
            img.resize_exact(width, height, self.filter)
        };

        // Normalize to RGBA8 so 32-bit float sources still encode as PNG
        resized
            .to_rgba8()
            .save_with_format(destination, ImageFormat::Png)
            .map_err(|e| SlotError::ImageExport {
                path: destination.to_path_buf(),
                source: e,
            })
    }
}

// Characters rejected by at least one mainstream filesystem
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace every character invalid in a file name with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Whether a path has one of the accepted image extensions
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            crate::io::configuration::IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
