//! JSON content manifest describing templates, composed scenes and their node trees

use crate::io::error::{Result, SlotError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Whether a container is a reusable template or a composed scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Reusable template (prefab)
    Template,
    /// Composed scene built from templates
    ComposedScene,
}

impl ContainerKind {
    /// Human-readable label used in reports
    pub const fn label(self) -> &'static str {
        match self {
            Self::Template => "Template",
            Self::ComposedScene => "Scene",
        }
    }
}

/// Renderable mesh attached to a node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Local bounding box extents
    pub size: [f32; 3],
}

/// Primary visual material of a node
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Main image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    /// Any other image-valued properties, keyed by property name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub images: BTreeMap<String, String>,
}

/// Picture-changer component holding an ordered image list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureChanger {
    /// Bound image references in display order
    pub images: Vec<String>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn is_unit_scale(scale: &[f32; 3]) -> bool {
    *scale == unit_scale()
}

/// One node of a container's hierarchy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Node name, unique among its siblings by convention
    pub name: String,
    /// Accumulated world scale
    #[serde(default = "unit_scale", skip_serializing_if = "is_unit_scale")]
    pub world_scale: [f32; 3],
    /// Renderable mesh, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Mesh>,
    /// Primary visual material, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    /// Picture-changer component, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_changer: Option<PictureChanger>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create a bare node with unit scale and no components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world_scale: unit_scale(),
            mesh: None,
            material: None,
            picture_changer: None,
            children: Vec::new(),
        }
    }
}

/// A template or composed scene with its root nodes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Container identifier (asset path)
    pub path: String,
    /// Template or composed scene
    pub kind: ContainerKind,
    /// Top-level nodes
    #[serde(default)]
    pub roots: Vec<ContentNode>,
    #[serde(skip)]
    modified: bool,
}

impl Container {
    /// Create an empty container
    pub fn new(path: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            path: path.into(),
            kind,
            roots: Vec::new(),
            modified: false,
        }
    }

    /// Resolve a child-index address to a node
    pub fn node(&self, address: &[usize]) -> Option<&ContentNode> {
        let (first, rest) = address.split_first()?;
        let mut node = self.roots.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    /// Resolve a child-index address to a mutable node
    pub fn node_mut(&mut self, address: &[usize]) -> Option<&mut ContentNode> {
        let (first, rest) = address.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for index in rest {
            node = node.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Flag the container for persistence
    pub const fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Whether bindings changed since load
    pub const fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Snapshot of every container the pipeline operates on
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentManifest {
    /// All templates and composed scenes
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl ContentManifest {
    /// Read a manifest from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SlotError::FileSystem {
            path: path.to_path_buf(),
            operation: "read manifest",
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| SlotError::Manifest {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the manifest back to disk
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| SlotError::Manifest {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, text).map_err(|e| SlotError::FileSystem {
            path: path.to_path_buf(),
            operation: "write manifest",
            source: e,
        })
    }

    /// Look up a container by path
    pub fn container_mut(&mut self, path: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.path == path)
    }

    /// Number of containers with pending binding changes
    pub fn modified_count(&self) -> usize {
        self.containers.iter().filter(|c| c.is_modified()).count()
    }
}
