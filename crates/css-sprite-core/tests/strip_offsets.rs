use css_sprite_core::prelude::*;
use image::{DynamicImage, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn offsets_are_prefix_sums_of_extents() {
    let mut rng = StdRng::seed_from_u64(7);
    for direction in [Direction::Vertical, Direction::Horizontal] {
        for _ in 0..30 {
            let count = rng.gen_range(1..=20);
            let items: Vec<(String, u32, u32)> = (0..count)
                .map(|i| (format!("img_{}.png", i), rng.gen_range(1..=40), rng.gen_range(1..=40)))
                .collect();
            let sheet = pack_layout(items.clone(), direction).expect("layout");

            let mut expected = 0i64;
            for (placement, (_, w, h)) in sheet.placements.iter().zip(&items) {
                assert_eq!(placement.offset, expected);
                assert_eq!((placement.width, placement.height), (*w, *h));
                expected += direction.main_extent(*w, *h) as i64;
            }
            // the last sprite ends exactly at the canvas edge
            let main = direction.main_extent(sheet.width, sheet.height) as i64;
            assert_eq!(main, expected);
        }
    }
}

#[test]
fn placements_keep_input_order() {
    let items = vec![("z.png", 5, 5), ("a.png", 50, 1), ("m.png", 1, 50)];
    let sheet = pack_layout(items, Direction::Vertical).expect("layout");
    let names: Vec<&str> = sheet.placements.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["z.png", "a.png", "m.png"]);
    let offsets: Vec<i64> = sheet.placements.iter().map(|p| p.offset).collect();
    assert_eq!(offsets, vec![0, 5, 6]);
}

#[test]
fn names_are_basenames_of_keys() {
    let items = vec![("icons/arrow.png", 4, 4), ("../shared/dot.gif", 2, 2)];
    let sheet = pack_layout(items, Direction::Horizontal).expect("layout");
    assert_eq!(sheet.placements[0].name, "arrow.png");
    assert_eq!(sheet.placements[1].name, "dot.gif");
}

#[test]
fn layout_matches_image_packing() {
    let sizes = vec![("a", 40, 20), ("b", 16, 32), ("c", 10, 10), ("d", 8, 48)];
    for direction in [Direction::Vertical, Direction::Horizontal] {
        let layout = pack_layout(sizes.clone(), direction).expect("layout");
        let images: Vec<SourceImage> = sizes
            .iter()
            .map(|(k, w, h)| SourceImage::new(*k, DynamicImage::ImageRgba8(RgbaImage::new(*w, *h))))
            .collect();
        let out = pack_images(&images, direction).expect("images");
        assert_eq!(layout, out.sheet);
    }
}

#[test]
fn stats_report_transparent_slack() {
    let sheet = pack_layout(vec![("a", 10, 20), ("b", 30, 5)], Direction::Vertical).expect("layout");
    let stats = sheet.stats();
    assert_eq!(stats.num_sprites, 2);
    assert_eq!(stats.total_area, 30 * 25);
    assert_eq!(stats.used_area, 10 * 20 + 30 * 5);
    assert_eq!(stats.wasted_area(), 30 * 25 - 350);
    assert!(stats.occupancy > 0.0 && stats.occupancy < 1.0);
    assert!(stats.summary().contains("Sprites: 2"));
}
