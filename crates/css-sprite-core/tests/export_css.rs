use css_sprite_core::prelude::*;

#[test]
fn vertical_rules_shift_along_y() {
    let sheet = pack_layout(vec![("a.png", 10, 20), ("b.png", 30, 5)], Direction::Vertical)
        .expect("layout");
    let css = to_css(&sheet, "master.png");
    let expected = "\
.a.png {
  background: transparent url(master.png) no-repeat 0 0px;
  width: 10px; height: 20px;
}
.b.png {
  background: transparent url(master.png) no-repeat 0 -20px;
  width: 30px; height: 5px;
}
";
    assert_eq!(css, expected);
}

#[test]
fn horizontal_rules_shift_along_x() {
    let sheet = pack_layout(
        vec![("a.png", 10, 10), ("b.png", 10, 10), ("c.png", 10, 10)],
        Direction::Horizontal,
    )
    .expect("layout");
    let css = to_css(&sheet, "sprites/all.png");
    assert!(css.contains("url(sprites/all.png) no-repeat 0px 0;"));
    assert!(css.contains("no-repeat -10px 0;"));
    assert!(css.contains("no-repeat -20px 0;"));
    assert_eq!(css.matches("width: 10px; height: 10px;").count(), 3);
    let first = css.find(".a.png").expect("a");
    let last = css.find(".c.png").expect("c");
    assert!(first < last);
}

#[test]
fn json_metadata_lists_sprites_in_order() {
    let sheet = pack_layout(vec![("x.png", 3, 4), ("y.png", 5, 6)], Direction::Vertical)
        .expect("layout");
    let v = to_json(&sheet, "master.png");
    assert_eq!(v["image"], "master.png");
    assert_eq!(v["direction"], "vertical");
    assert_eq!(v["size"]["w"], 5);
    assert_eq!(v["size"]["h"], 10);
    let sprites = v["sprites"].as_array().expect("array");
    assert_eq!(sprites.len(), 2);
    assert_eq!(sprites[1]["name"], "y.png");
    assert_eq!(sprites[1]["frame"]["y"], 4);
    assert_eq!(sprites[1]["backgroundPosition"]["y"], -4);

    let stats = css_sprite_core::stats_json(&sheet);
    assert_eq!(stats["sprites"], 2);
    assert_eq!(stats["total_area"], 50);
}
