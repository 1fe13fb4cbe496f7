//! Slot discovery over template and composed-scene containers

use crate::catalog::orientation::{Geometry, OrientationClassifier};
use crate::catalog::slot::{SizeGroup, Slot, SlotKind};
use crate::io::assets::AssetCatalog;
use crate::io::configuration::PICTURE_NODE_NAME;
use crate::io::manifest::{Container, ContentManifest, ContentNode, Material};
use std::collections::BTreeSet;

/// Builds [`Slot`] records for picture-holding nodes
pub struct SlotCatalogScanner<'a, C: AssetCatalog + ?Sized> {
    catalog: &'a C,
    classifier: &'a OrientationClassifier,
}

// Names from the root down to the current node, plus its child-index address
struct Walk<'n> {
    names: Vec<&'n str>,
    address: Vec<usize>,
}

impl<'a, C: AssetCatalog + ?Sized> SlotCatalogScanner<'a, C> {
    /// Create a scanner resolving dimensions through `catalog`
    pub const fn new(catalog: &'a C, classifier: &'a OrientationClassifier) -> Self {
        Self {
            catalog,
            classifier,
        }
    }

    /// Scan every container of a manifest
    pub fn scan(&self, manifest: &ContentManifest) -> Vec<Slot> {
        manifest
            .containers
            .iter()
            .flat_map(|container| self.scan_container(container))
            .collect()
    }

    /// Scan one container in depth-first order
    pub fn scan_container(&self, container: &Container) -> Vec<Slot> {
        let mut slots = Vec::new();
        let mut walk = Walk {
            names: Vec::new(),
            address: Vec::new(),
        };
        for (index, root) in container.roots.iter().enumerate() {
            self.visit(container, root, index, &mut walk, &mut slots);
        }
        slots
    }

    fn visit<'n>(
        &self,
        container: &Container,
        node: &'n ContentNode,
        index: usize,
        walk: &mut Walk<'n>,
        slots: &mut Vec<Slot>,
    ) {
        walk.names.push(&node.name);
        walk.address.push(index);

        self.collect_slots(container, node, walk, slots);
        for (child_index, child) in node.children.iter().enumerate() {
            self.visit(container, child, child_index, walk, slots);
        }

        walk.names.pop();
        walk.address.pop();
    }

    // A meshed `Picture` node carrying a changer yields one slot of each kind
    fn collect_slots(
        &self,
        container: &Container,
        node: &ContentNode,
        walk: &Walk<'_>,
        slots: &mut Vec<Slot>,
    ) {
        let geometry = Geometry {
            mesh_size: node.mesh.as_ref().map(|m| m.size),
            world_scale: node.world_scale,
        };
        let orientation = self
            .classifier
            .classify(walk.names.iter().rev().copied(), &geometry);
        let has_material = node.material.is_some();
        let slot = |kind: SlotKind, bindings: Vec<String>, sizes: Vec<(u32, u32)>| Slot {
            container: container.path.clone(),
            container_kind: container.kind,
            hierarchy_path: walk.names.join("/"),
            address: walk.address.clone(),
            kind,
            bindings,
            size_group: SizeGroup::from_dimensions(&sizes),
            sizes,
            orientation,
            has_material,
        };

        if let Some(changer) = &node.picture_changer {
            let mut sizes = self.resolve_all(&changer.images);
            if sizes.is_empty() {
                sizes = node
                    .material
                    .as_ref()
                    .and_then(|m| self.material_fallback(m))
                    .into_iter()
                    .collect();
            }
            slots.push(slot(SlotKind::Changer, changer.images.clone(), sizes));
        }

        if node.name == PICTURE_NODE_NAME && node.mesh.is_some() {
            let bindings: Vec<String> = node
                .material
                .as_ref()
                .and_then(|m| m.main_image.clone())
                .into_iter()
                .collect();
            let sizes = self.resolve_all(&bindings);
            slots.push(slot(SlotKind::MaterialPicture, bindings, sizes));
        }
    }

    fn resolve_all(&self, ids: &[String]) -> Vec<(u32, u32)> {
        ids.iter()
            .filter_map(|id| self.catalog.resolve(id))
            .map(|asset| (asset.width, asset.height))
            .collect()
    }

    // Main image first, then the first resolvable image-valued property
    fn material_fallback(&self, material: &Material) -> Option<(u32, u32)> {
        material
            .main_image
            .iter()
            .chain(material.images.values())
            .find_map(|id| self.catalog.resolve(id))
            .map(|asset| (asset.width, asset.height))
    }
}

/// Distinct size groups that get a per-size output folder
pub fn size_folder_names(slots: &[Slot]) -> BTreeSet<String> {
    slots
        .iter()
        .map(|slot| slot.size_group)
        .filter(|group| group.has_folder())
        .map(|group| group.to_string())
        .collect()
}

/// Frame slots whose size could not be pinned to a single `WxH`
pub fn frames_without_size<'s>(slots: &'s [Slot], marker: &str) -> Vec<&'s Slot> {
    slots
        .iter()
        .filter(|slot| slot.is_frame(marker) && !slot.size_group.has_folder())
        .collect()
}
