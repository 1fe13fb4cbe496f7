//! Pipeline constants and runtime configuration defaults

use crate::io::assets::canonical_id;
use crate::io::error::{Result, SlotError, invalid_parameter};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Folder layout
/// Root output area holding per-size folders and the compressed folder
pub const DEFAULT_ROOT_FOLDER: &str = "Assets/PictureChanger";
/// Default input folder for the raw random-image pool
pub const DEFAULT_RANDOM_FOLDER: &str = "Assets/sameR&D/Picture";
/// Name of the compressed-output subfolder under the root
pub const DEFAULT_COMPRESSED_FOLDER_NAME: &str = "Compressed1023";
/// File name of the usage report written by a scan
pub const REPORT_FILE_NAME: &str = "picture_changer_report.txt";

// The long side of every generated variant stays strictly below this
/// Exclusive upper bound for the long side of compressed variants
pub const DEFAULT_MAX_LONG_SIDE_EXCLUSIVE: u32 = 1023;

/// Substring a raw source file name must contain (case-insensitive)
pub const DEFAULT_NAME_FILTER: &str = "VRChat";

/// Hierarchy marker identifying slots eligible for random assignment
pub const DEFAULT_FRAME_MARKER: &str = "P_PictureFrame";

/// Node name identifying standalone material picture slots
pub const PICTURE_NODE_NAME: &str = "Picture";

/// Extension used for every generated variant
pub const VARIANT_EXTENSION: &str = "png";

/// Image extensions accepted in the raw pool and the compressed folder
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tga", "gif", "webp", "tif", "tiff",
];

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Runtime configuration; every field falls back to its default when absent or empty
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory every asset identifier is relative to
    pub project_root: PathBuf,
    /// Root output area, relative to the project root
    pub root_folder: String,
    /// Raw random-image pool, relative to the project root
    pub random_input_folder: String,
    /// Compressed-output subfolder name under the root folder
    pub compressed_folder_name: String,
    /// Exclusive upper bound for the long side of generated variants
    pub max_long_side_exclusive: u32,
    /// Case-insensitive substring required in raw source file names
    pub name_filter: String,
    /// Marker a slot's hierarchy path must contain to receive random images
    pub frame_marker: String,
    /// Emit per-file detail logs
    pub verbose_logging: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            random_input_folder: DEFAULT_RANDOM_FOLDER.to_string(),
            compressed_folder_name: DEFAULT_COMPRESSED_FOLDER_NAME.to_string(),
            max_long_side_exclusive: DEFAULT_MAX_LONG_SIDE_EXCLUSIVE,
            name_filter: DEFAULT_NAME_FILTER.to_string(),
            frame_marker: DEFAULT_FRAME_MARKER.to_string(),
            verbose_logging: false,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration file and fill empty values with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SlotError::FileSystem {
            path: path.to_path_buf(),
            operation: "read configuration",
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| SlotError::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(config.with_defaults())
    }

    /// Replace empty or non-positive values with their defaults
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.project_root.as_os_str().is_empty() {
            self.project_root = defaults.project_root;
        }
        if self.root_folder.is_empty() {
            self.root_folder = defaults.root_folder;
        }
        if self.random_input_folder.is_empty() {
            self.random_input_folder = defaults.random_input_folder;
        }
        if self.compressed_folder_name.is_empty() {
            self.compressed_folder_name = defaults.compressed_folder_name;
        }
        if self.max_long_side_exclusive == 0 {
            self.max_long_side_exclusive = defaults.max_long_side_exclusive;
        }
        if self.frame_marker.is_empty() {
            self.frame_marker = defaults.frame_marker;
        }
        self
    }

    /// Check values the pipeline cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error if the long-side bound leaves no room for a 1-pixel image
    pub fn validate(&self) -> Result<()> {
        if self.max_long_side_exclusive < 2 {
            return Err(invalid_parameter(
                "max_long_side_exclusive",
                &self.max_long_side_exclusive,
                &"must be at least 2",
            ));
        }
        Ok(())
    }

    /// Project-relative identifier of the root output folder
    pub fn root_id(&self) -> String {
        canonical_id(&self.root_folder)
    }

    /// Project-relative identifier of the compressed-output folder
    pub fn compressed_id(&self) -> String {
        canonical_id(&format!("{}/{}", self.root_id(), self.compressed_folder_name))
    }

    /// Absolute-or-relative filesystem path of an identifier
    pub fn resolve(&self, id: &str) -> PathBuf {
        self.project_root.join(id)
    }

    /// Filesystem path of the compressed-output folder
    pub fn compressed_dir(&self) -> PathBuf {
        self.resolve(&self.compressed_id())
    }

    /// Filesystem path of the raw random-image pool
    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.random_input_folder)
    }
}
