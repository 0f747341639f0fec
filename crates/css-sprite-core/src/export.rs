use crate::model::Sheet;
use serde_json::{json, Value};

/// Serialize a sheet as `{ image, size, direction, sprites }` for tooling.
///
/// `sprites` keeps placement order; each entry carries the canvas position and
/// the matching CSS background-position.
pub fn to_json(sheet: &Sheet, master_name: &str) -> Value {
    let sprites: Vec<Value> = sheet
        .placements
        .iter()
        .map(|p| {
            let (x, y) = p.position(sheet.direction);
            let (bx, by) = p.background_position(sheet.direction);
            json!({
                "name": p.name,
                "offset": p.offset,
                "frame": {"x": x, "y": y, "w": p.width, "h": p.height},
                "backgroundPosition": {"x": bx, "y": by},
            })
        })
        .collect();
    json!({
        "image": master_name,
        "size": {"w": sheet.width, "h": sheet.height},
        "direction": sheet.direction,
        "sprites": sprites,
    })
}

/// Stats document written by `--export-stats`.
pub fn stats_json(sheet: &Sheet) -> Value {
    let stats = sheet.stats();
    json!({
        "sprites": stats.num_sprites,
        "width": stats.width,
        "height": stats.height,
        "used_area": stats.used_area,
        "total_area": stats.total_area,
        "occupancy": stats.occupancy,
    })
}
