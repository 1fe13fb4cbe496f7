use crate::io::manifest::ContainerKind;
use std::fmt;

/// Portrait or landscape classification of a slot or image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Taller than wide
    Portrait,
    /// Wider than tall, or square
    Landscape,
}

impl Orientation {
    /// Orientation of a `width`x`height` image; landscape wins ties
    pub const fn of_dimensions(width: u32, height: u32) -> Self {
        if width >= height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Whether this is [`Orientation::Portrait`]
    pub const fn is_portrait(self) -> bool {
        matches!(self, Self::Portrait)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => write!(f, "portrait"),
            Self::Landscape => write!(f, "landscape"),
        }
    }
}

/// Classification label for a slot's current bound-image dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeGroup {
    /// Every bound image shares this width and height
    Exact {
        /// Shared pixel width
        width: u32,
        /// Shared pixel height
        height: u32,
    },
    /// Bound images differ in dimensions
    Mixed,
    /// No bound image could be resolved
    Unknown,
}

impl SizeGroup {
    /// Classify a set of dimensions
    pub fn from_dimensions(sizes: &[(u32, u32)]) -> Self {
        let Some(&(width, height)) = sizes.first() else {
            return Self::Unknown;
        };
        let uniform_width = sizes.iter().all(|&(w, _)| w == width);
        let uniform_height = sizes.iter().all(|&(_, h)| h == height);
        if uniform_width && uniform_height {
            Self::Exact { width, height }
        } else {
            Self::Mixed
        }
    }

    /// Parse the literal `WxH` form; `Mixed` and `Unknown` parse to themselves
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Mixed" => Some(Self::Mixed),
            "Unknown" => Some(Self::Unknown),
            _ => {
                let (w, h) = label.split_once('x')?;
                Some(Self::Exact {
                    width: w.parse().ok()?,
                    height: h.parse().ok()?,
                })
            }
        }
    }

    /// Whether a per-size output folder exists for this group
    pub const fn has_folder(self) -> bool {
        matches!(self, Self::Exact { .. })
    }
}

impl fmt::Display for SizeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { width, height } => write!(f, "{width}x{height}"),
            Self::Mixed => write!(f, "Mixed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// How a slot holds its images
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Picture-changer component with an ordered image list
    Changer,
    /// Standalone picture node showing its material's main image
    MaterialPicture,
}

impl SlotKind {
    /// Human-readable label used in reports
    pub const fn label(self) -> &'static str {
        match self {
            Self::Changer => "PictureChanger",
            Self::MaterialPicture => "Picture Material",
        }
    }
}

/// One picture-holder node discovered by a scan
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Container identifier (template or composed-scene path)
    pub container: String,
    /// Template or composed scene
    pub container_kind: ContainerKind,
    /// `/`-joined node names from the root, unique within the container
    pub hierarchy_path: String,
    /// Child indices from the container root to the node
    pub address: Vec<usize>,
    /// Changer or material picture
    pub kind: SlotKind,
    /// Currently bound image identifiers, in order
    pub bindings: Vec<String>,
    /// Dimensions the size group was derived from
    pub sizes: Vec<(u32, u32)>,
    /// Derived size group
    pub size_group: SizeGroup,
    /// Derived orientation
    pub orientation: Orientation,
    /// Whether the node has a material to show a picture with
    pub has_material: bool,
}

impl Slot {
    /// Number of images the slot should hold after assignment
    pub fn desired_count(&self) -> usize {
        match self.kind {
            SlotKind::Changer => self.bindings.len().max(1),
            SlotKind::MaterialPicture => 1,
        }
    }

    /// Whether the slot sits under a frame marked for random assignment
    pub fn is_frame(&self, marker: &str) -> bool {
        !marker.is_empty() && self.hierarchy_path.contains(marker)
    }

    /// Whether new bindings can be written; a material picture needs a material
    pub const fn accepts_images(&self) -> bool {
        match self.kind {
            SlotKind::Changer => true,
            SlotKind::MaterialPicture => self.has_material,
        }
    }
}
