//! Randomized, orientation-pure assignment of compressed variants to frame slots
//!
//! Each batch shuffles one pool per orientation and walks it with a cursor,
//! drawing without replacement first so a batch spreads across as many distinct
//! images as possible. When a pool runs dry the cursor wraps inside the same
//! pool; a slot never receives an image of the other orientation.

use crate::catalog::slot::{Orientation, Slot, SlotKind};
use crate::io::assets::{ImageAsset, canonical_id};
use crate::io::error::{Result, SlotError};
use crate::io::image::{ImageCodec, has_image_extension};
use crate::io::manifest::Container;
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::Path;
use walkdir::WalkDir;

/// Read every variant in the compressed folder, sorted by identifier
///
/// `folder` is the filesystem location, `folder_id` its project-relative identifier.
/// Unreadable files are logged and left out.
pub fn load_compressed_variants(
    folder: &Path,
    folder_id: &str,
    codec: &(impl ImageCodec + ?Sized),
) -> Vec<ImageAsset> {
    let mut variants = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under '{}': {e}", folder.display());
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !has_image_extension(path) {
            continue;
        }
        let Some(id) = variant_id(folder, folder_id, path) else {
            continue;
        };
        match codec.dimensions(path) {
            Ok((width, height)) => variants.push(ImageAsset::new(id, width, height)),
            Err(e) => tracing::warn!("Skipping variant: {e}"),
        }
    }
    variants.sort_by(|a, b| a.id.cmp(&b.id));
    variants
}

/// Project-relative identifier of a file found below `folder`
pub fn variant_id(folder: &Path, folder_id: &str, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(folder).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(canonical_id(&format!("{folder_id}/{}", parts.join("/"))))
}

/// Shuffled variants of one orientation with a consumption cursor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrientationPool {
    items: Vec<ImageAsset>,
    cursor: usize,
}

impl OrientationPool {
    /// Wrap an already ordered sequence; the cursor starts at zero
    pub const fn new(items: Vec<ImageAsset>) -> Self {
        Self { items, cursor: 0 }
    }

    /// Number of variants in the pool
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool holds no variant
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current cursor position
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pool contents in draw order
    pub fn items(&self) -> &[ImageAsset] {
        &self.items
    }

    /// Draw `desired` variants, wrapping to the start once the pool is exhausted
    ///
    /// Returns fewer than `desired` only when the pool is empty.
    pub fn draw(&mut self, desired: usize) -> Vec<ImageAsset> {
        let mut picked = Vec::with_capacity(desired);
        if self.items.is_empty() {
            return picked;
        }

        while picked.len() < desired {
            if self.cursor >= self.items.len() {
                self.cursor = 0;
            }
            let Some(item) = self.items.get(self.cursor) else {
                break;
            };
            picked.push(item.clone());
            self.cursor += 1;
        }
        picked
    }
}

/// Portrait and landscape pools built for one assignment batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrientationPools {
    /// Variants taller than wide
    pub portrait: OrientationPool,
    /// Variants at least as wide as tall
    pub landscape: OrientationPool,
}

impl OrientationPools {
    /// Partition `variants` by orientation and shuffle each pool independently
    pub fn build<R: Rng + ?Sized>(variants: &[ImageAsset], rng: &mut R) -> Self {
        let (mut landscape, mut portrait): (Vec<ImageAsset>, Vec<ImageAsset>) =
            variants.iter().cloned().partition(ImageAsset::is_landscape);
        portrait.shuffle(rng);
        landscape.shuffle(rng);
        Self {
            portrait: OrientationPool::new(portrait),
            landscape: OrientationPool::new(landscape),
        }
    }

    /// Pool serving slots of `orientation`
    pub const fn pool_mut(&mut self, orientation: Orientation) -> &mut OrientationPool {
        match orientation {
            Orientation::Portrait => &mut self.portrait,
            Orientation::Landscape => &mut self.landscape,
        }
    }
}

/// Outcome of one assignment batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Indices (into the slot slice) of slots whose bindings were rewritten
    pub assigned: Vec<usize>,
    /// Eligible slots left untouched because their pool was empty
    pub skipped_empty_pool: usize,
    /// Slots outside any frame, or material pictures without a material
    pub ineligible: usize,
}

/// Assigns pool variants to slots under a frame marker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomAssignmentEngine {
    frame_marker: String,
}

impl RandomAssignmentEngine {
    /// Create an engine for slots whose hierarchy path contains `frame_marker`
    pub fn new(frame_marker: impl Into<String>) -> Self {
        Self {
            frame_marker: frame_marker.into(),
        }
    }

    /// Build fresh pools from `variants` and assign them to `slots`
    pub fn assign<R: Rng + ?Sized>(
        &self,
        slots: &mut [Slot],
        variants: &[ImageAsset],
        rng: &mut R,
    ) -> AssignmentReport {
        let mut pools = OrientationPools::build(variants, rng);
        self.assign_from_pools(slots, &mut pools)
    }

    /// Assign from pools whose cursors persist across calls
    pub fn assign_from_pools(
        &self,
        slots: &mut [Slot],
        pools: &mut OrientationPools,
    ) -> AssignmentReport {
        let mut report = AssignmentReport::default();

        for (index, slot) in slots.iter_mut().enumerate() {
            if !slot.is_frame(&self.frame_marker) || !slot.accepts_images() {
                report.ineligible += 1;
                continue;
            }

            let picked = pools.pool_mut(slot.orientation).draw(slot.desired_count());
            if picked.is_empty() {
                tracing::debug!(
                    "No {} variants for {} in {}",
                    slot.orientation,
                    slot.hierarchy_path,
                    slot.container
                );
                report.skipped_empty_pool += 1;
                continue;
            }

            slot.sizes = picked.iter().map(|a| (a.width, a.height)).collect();
            slot.bindings = picked.into_iter().map(|a| a.id).collect();
            report.assigned.push(index);
        }

        report
    }
}

/// Write a slot's bindings back into its container, marking it modified when anything changed
///
/// # Errors
///
/// Returns an error if the slot's address no longer resolves in `container`
pub fn write_bindings(container: &mut Container, slot: &Slot) -> Result<()> {
    let node = container
        .node_mut(&slot.address)
        .ok_or_else(|| SlotError::MissingNode {
            container: slot.container.clone(),
            hierarchy_path: slot.hierarchy_path.clone(),
        })?;

    let written = match slot.kind {
        SlotKind::Changer => {
            node.picture_changer.get_or_insert_with(Default::default).images =
                slot.bindings.clone();
            true
        }
        // Nodes without a material are left alone
        SlotKind::MaterialPicture => node.material.as_mut().is_some_and(|material| {
            material.main_image = slot.bindings.first().cloned();
            true
        }),
    };
    if written {
        container.mark_modified();
    }
    Ok(())
}
