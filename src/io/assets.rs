//! Image asset lookup keyed by project-relative identifiers

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Immutable description of one image asset
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageAsset {
    /// Project-relative identifier with `/` separators
    pub id: String,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

impl ImageAsset {
    /// Create an asset record
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// File stem of the identifier
    pub fn display_name(&self) -> &str {
        let file = self.id.rsplit('/').next().unwrap_or(&self.id);
        file.rsplit_once('.').map_or(file, |(stem, _)| stem)
    }

    /// Landscape wins ties
    pub const fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

/// Resolves image identifiers to their dimensions
pub trait AssetCatalog {
    /// Look up an asset; `None` when the identifier does not resolve to a readable image
    fn resolve(&self, id: &str) -> Option<ImageAsset>;
}

/// Catalog reading image headers from disk below a project root
pub struct FsAssetCatalog {
    project_root: PathBuf,
    cache: RefCell<HashMap<String, Option<(u32, u32)>>>,
}

impl FsAssetCatalog {
    /// Create a catalog rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl AssetCatalog for FsAssetCatalog {
    fn resolve(&self, id: &str) -> Option<ImageAsset> {
        if let Some(cached) = self.cache.borrow().get(id) {
            return (*cached).map(|(w, h)| ImageAsset::new(id, w, h));
        }

        let path = self.project_root.join(id);
        let dimensions = match image::image_dimensions(&path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::debug!("Unresolvable image '{}': {e}", path.display());
                None
            }
        };
        self.cache.borrow_mut().insert(id.to_string(), dimensions);
        dimensions.map(|(w, h)| ImageAsset::new(id, w, h))
    }
}

/// Catalog backed by a fixed map, for snapshots captured elsewhere
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    assets: HashMap<String, (u32, u32)>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, replacing any previous entry
    pub fn insert(&mut self, id: impl Into<String>, width: u32, height: u32) {
        self.assets.insert(id.into(), (width, height));
    }

    /// Builder-style variant of [`Self::insert`]
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(id, width, height);
        self
    }
}

impl AssetCatalog for InMemoryCatalog {
    fn resolve(&self, id: &str) -> Option<ImageAsset> {
        self.assets
            .get(id)
            .map(|&(w, h)| ImageAsset::new(id, w, h))
    }
}

/// Canonical spelling of a project-relative identifier
///
/// Both separators are accepted; empty and `.` segments are dropped, so
/// `./Assets//Frames\a.png` and `Assets/Frames/a.png` name the same file.
/// A leading `/` is kept.
pub fn canonical_id(id: &str) -> String {
    let joined = id
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if id.starts_with(['/', '\\']) {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Key used to compare identifiers: canonical spelling, ASCII case folded
pub fn reference_key(id: &str) -> String {
    canonical_id(id).to_ascii_lowercase()
}
