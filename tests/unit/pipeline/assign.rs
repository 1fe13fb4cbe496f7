//! Tests for orientation pools, random assignment and binding write-back

#[cfg(test)]
mod tests {
    use crate::fixtures::{changer, parent, picture, write_png};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use slotfill::catalog::slot::{Orientation, SizeGroup, Slot, SlotKind};
    use slotfill::io::assets::ImageAsset;
    use slotfill::io::image::PngResizer;
    use slotfill::io::manifest::{Container, ContainerKind};
    use slotfill::pipeline::assign::{
        OrientationPool, OrientationPools, RandomAssignmentEngine, load_compressed_variants,
        variant_id, write_bindings,
    };
    use std::collections::HashSet;
    use std::path::Path;
    use tempfile::TempDir;

    const MARKER: &str = "P_PictureFrame";

    fn slot(path: &str, orientation: Orientation, desired: usize) -> Slot {
        Slot {
            container: "Assets/Scenes/Main.unity".to_string(),
            container_kind: ContainerKind::ComposedScene,
            hierarchy_path: path.to_string(),
            address: vec![0],
            kind: SlotKind::Changer,
            bindings: (0..desired).map(|i| format!("Assets/old_{i}.png")).collect(),
            sizes: Vec::new(),
            size_group: SizeGroup::Unknown,
            orientation,
            has_material: true,
        }
    }

    fn variants(landscape: usize, portrait: usize) -> Vec<ImageAsset> {
        let mut all: Vec<ImageAsset> = (0..landscape)
            .map(|i| ImageAsset::new(format!("C/wide_{i}_1022x575.png"), 1022, 575))
            .collect();
        all.extend(
            (0..portrait).map(|i| ImageAsset::new(format!("C/tall_{i}_575x1022.png"), 575, 1022)),
        );
        all
    }

    fn ids(n: usize) -> Vec<ImageAsset> {
        (0..n).map(|i| ImageAsset::new(format!("img{i}"), 10, 5)).collect()
    }

    #[test]
    fn test_pool_draws_sequentially() {
        let mut pool = OrientationPool::new(ids(3));
        let first: Vec<String> = pool.draw(2).into_iter().map(|a| a.id).collect();
        assert_eq!(first, vec!["img0", "img1"]);
        assert_eq!(pool.cursor(), 2);
    }

    #[test]
    fn test_pool_wraps_when_exhausted() {
        let mut pool = OrientationPool::new(ids(3));
        pool.draw(2);
        let next: Vec<String> = pool.draw(3).into_iter().map(|a| a.id).collect();
        assert_eq!(next, vec!["img2", "img0", "img1"]);
    }

    #[test]
    fn test_pool_repeats_within_one_draw_when_too_small() {
        let mut pool = OrientationPool::new(ids(2));
        let picked: Vec<String> = pool.draw(5).into_iter().map(|a| a.id).collect();
        assert_eq!(picked, vec!["img0", "img1", "img0", "img1", "img0"]);
    }

    #[test]
    fn test_empty_pool_draws_nothing() {
        let mut pool = OrientationPool::default();
        assert!(pool.is_empty());
        assert!(pool.draw(3).is_empty());
    }

    #[test]
    fn test_pools_partition_by_orientation() {
        let mut all = variants(3, 2);
        all.push(ImageAsset::new("C/square_8x8.png", 8, 8));
        let pools = OrientationPools::build(&all, &mut StdRng::seed_from_u64(1));

        assert_eq!(pools.landscape.len(), 4);
        assert_eq!(pools.portrait.len(), 2);
        assert!(pools.landscape.items().iter().all(ImageAsset::is_landscape));
        assert!(pools.portrait.items().iter().all(|a| !a.is_landscape()));
    }

    #[test]
    fn test_assignment_is_orientation_pure() {
        let mut slots = vec![
            slot("Room/P_PictureFrame_A/Changer", Orientation::Landscape, 3),
            slot("Room/P_PictureFrame_B/Changer", Orientation::Portrait, 4),
        ];
        let engine = RandomAssignmentEngine::new(MARKER);
        let report = engine.assign(&mut slots, &variants(2, 2), &mut StdRng::seed_from_u64(5));

        assert_eq!(report.assigned, vec![0, 1]);
        assert_eq!(slots[0].bindings.len(), 3);
        assert!(slots[0].bindings.iter().all(|id| id.contains("wide")));
        assert_eq!(slots[1].bindings.len(), 4);
        assert!(slots[1].bindings.iter().all(|id| id.contains("tall")));
        assert!(slots[1].sizes.iter().all(|&(w, h)| w < h));
    }

    #[test]
    fn test_sufficient_pool_gives_distinct_images_per_batch() {
        let mut slots = vec![
            slot("P_PictureFrame_1/Changer", Orientation::Landscape, 2),
            slot("P_PictureFrame_2/Changer", Orientation::Landscape, 3),
            slot("P_PictureFrame_3/Changer", Orientation::Landscape, 1),
        ];
        let engine = RandomAssignmentEngine::new(MARKER);
        engine.assign(&mut slots, &variants(6, 0), &mut StdRng::seed_from_u64(11));

        let all: Vec<&String> = slots.iter().flat_map(|s| s.bindings.iter()).collect();
        let distinct: HashSet<&String> = all.iter().copied().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn test_empty_pool_leaves_slot_untouched() {
        let mut slots = vec![
            slot("P_PictureFrame_1/Changer", Orientation::Portrait, 2),
            slot("P_PictureFrame_2/Changer", Orientation::Landscape, 1),
        ];
        let before = slots[0].bindings.clone();
        let engine = RandomAssignmentEngine::new(MARKER);
        let report = engine.assign(&mut slots, &variants(1, 0), &mut StdRng::seed_from_u64(2));

        assert_eq!(report.skipped_empty_pool, 1);
        assert_eq!(report.assigned, vec![1]);
        assert_eq!(slots[0].bindings, before);
    }

    #[test]
    fn test_slots_outside_frames_are_ineligible() {
        let mut slots = vec![slot("Room/Poster/Changer", Orientation::Landscape, 1)];
        let before = slots[0].bindings.clone();
        let engine = RandomAssignmentEngine::new(MARKER);
        let report = engine.assign(&mut slots, &variants(3, 3), &mut StdRng::seed_from_u64(2));

        assert_eq!(report.ineligible, 1);
        assert!(report.assigned.is_empty());
        assert_eq!(slots[0].bindings, before);
    }

    #[test]
    fn test_material_picture_without_material_keeps_pool_cursor() {
        let mut bare = slot("P_PictureFrame_1/Picture", Orientation::Landscape, 0);
        bare.kind = SlotKind::MaterialPicture;
        bare.has_material = false;
        let mut slots = vec![bare, slot("P_PictureFrame_2/Changer", Orientation::Landscape, 1)];
        let engine = RandomAssignmentEngine::new(MARKER);
        let mut pools = OrientationPools {
            portrait: OrientationPool::default(),
            landscape: OrientationPool::new(ids(2)),
        };

        let report = engine.assign_from_pools(&mut slots, &mut pools);

        assert_eq!(report.ineligible, 1);
        assert_eq!(report.assigned, vec![1]);
        assert!(slots[0].bindings.is_empty());
        assert_eq!(slots[1].bindings, vec!["img0"]);
    }

    #[test]
    fn test_same_seed_gives_same_assignment() {
        let run = |seed: u64| {
            let mut slots = vec![
                slot("P_PictureFrame_1/Changer", Orientation::Landscape, 2),
                slot("P_PictureFrame_2/Changer", Orientation::Portrait, 2),
            ];
            RandomAssignmentEngine::new(MARKER).assign(
                &mut slots,
                &variants(8, 8),
                &mut StdRng::seed_from_u64(seed),
            );
            slots.into_iter().flat_map(|s| s.bindings).collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_cursor_persists_across_calls_with_shared_pools() {
        let engine = RandomAssignmentEngine::new(MARKER);
        let mut pools = OrientationPools {
            portrait: OrientationPool::default(),
            landscape: OrientationPool::new(ids(3)),
        };
        let mut first = vec![slot("P_PictureFrame/Changer", Orientation::Landscape, 2)];
        let mut second = vec![slot("P_PictureFrame/Changer", Orientation::Landscape, 2)];
        engine.assign_from_pools(&mut first, &mut pools);
        engine.assign_from_pools(&mut second, &mut pools);

        assert_eq!(first[0].bindings, vec!["img0", "img1"]);
        assert_eq!(second[0].bindings, vec!["img2", "img0"]);
    }

    #[test]
    fn test_write_bindings_for_both_slot_kinds() {
        let mut container = Container::new("Assets/Scenes/Main.unity", ContainerKind::ComposedScene);
        container.roots = vec![parent(
            "P_PictureFrame",
            vec![changer("Changer", &["old.png"]), picture(Some("old.png"))],
        )];

        let mut changer_slot = slot("P_PictureFrame/Changer", Orientation::Landscape, 0);
        changer_slot.address = vec![0, 0];
        changer_slot.bindings = vec!["new_a.png".to_string(), "new_b.png".to_string()];
        write_bindings(&mut container, &changer_slot).unwrap();

        let mut picture_slot = slot("P_PictureFrame/Picture", Orientation::Portrait, 0);
        picture_slot.kind = SlotKind::MaterialPicture;
        picture_slot.address = vec![0, 1];
        picture_slot.bindings = vec!["new_c.png".to_string()];
        write_bindings(&mut container, &picture_slot).unwrap();

        assert!(container.is_modified());
        let changer_node = container.node(&[0, 0]).unwrap();
        assert_eq!(
            changer_node.picture_changer.as_ref().unwrap().images,
            vec!["new_a.png".to_string(), "new_b.png".to_string()]
        );
        let picture_node = container.node(&[0, 1]).unwrap();
        assert_eq!(
            picture_node.material.as_ref().unwrap().main_image.as_deref(),
            Some("new_c.png")
        );
    }

    #[test]
    fn test_write_bindings_never_creates_a_material() {
        let mut container = Container::new("Assets/Scenes/Main.unity", ContainerKind::ComposedScene);
        let mut bare = picture(None);
        bare.material = None;
        container.roots = vec![parent("P_PictureFrame", vec![bare])];

        let mut picture_slot = slot("P_PictureFrame/Picture", Orientation::Portrait, 0);
        picture_slot.kind = SlotKind::MaterialPicture;
        picture_slot.address = vec![0, 0];
        picture_slot.bindings = vec!["new.png".to_string()];
        write_bindings(&mut container, &picture_slot).unwrap();

        assert!(container.node(&[0, 0]).unwrap().material.is_none());
        assert!(!container.is_modified());
    }

    #[test]
    fn test_write_bindings_reports_stale_address() {
        let mut container = Container::new("Assets/Scenes/Main.unity", ContainerKind::ComposedScene);
        let mut stale = slot("P_PictureFrame/Changer", Orientation::Landscape, 1);
        stale.address = vec![4, 2];

        assert!(write_bindings(&mut container, &stale).is_err());
        assert!(!container.is_modified());
    }

    #[test]
    fn test_load_compressed_variants_reads_folder() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("Compressed1023");
        write_png(&folder.join("b_10x5.png"), 10, 5);
        write_png(&folder.join("a_5x10.png"), 5, 10);
        std::fs::write(folder.join("readme.txt"), "ignored").unwrap();

        let loaded = load_compressed_variants(
            &folder,
            "Assets/PictureChanger/Compressed1023",
            &PngResizer::default(),
        );

        assert_eq!(
            loaded,
            vec![
                ImageAsset::new("Assets/PictureChanger/Compressed1023/a_5x10.png", 5, 10),
                ImageAsset::new("Assets/PictureChanger/Compressed1023/b_10x5.png", 10, 5),
            ]
        );
    }

    #[test]
    fn test_variant_id_joins_relative_components() {
        let folder = Path::new("/project/Assets/C");
        assert_eq!(
            variant_id(folder, "Assets/C/", Path::new("/project/Assets/C/sub/x.png")).as_deref(),
            Some("Assets/C/sub/x.png")
        );
        assert_eq!(variant_id(folder, "Assets/C", Path::new("/elsewhere/x.png")), None);
        assert_eq!(variant_id(folder, "Assets/C", folder), None);
    }
}
